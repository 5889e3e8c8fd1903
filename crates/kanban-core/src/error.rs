use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KanbanError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Presence check for a required text field.
///
/// Returns the trimmed value, or `InvalidInput` naming the field when the
/// value is empty or whitespace only.
pub fn require_field<'a>(field: &str, value: &'a str) -> Result<&'a str, KanbanError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KanbanError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_field_trims() {
        assert_eq!(require_field("Name", "  Sprint 1 "), Ok("Sprint 1"));
    }

    #[test]
    fn require_field_rejects_blank() {
        assert_eq!(
            require_field("Name", "   "),
            Err(KanbanError::InvalidInput("Name is required".into()))
        );
        assert!(require_field("Title", "").is_err());
    }
}
