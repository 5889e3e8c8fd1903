pub mod board;
pub mod column;
pub mod error;
pub mod subtodo;
pub mod todo;

pub use board::Board;
pub use column::Column;
pub use error::{require_field, KanbanError};
pub use subtodo::Subtodo;
pub use todo::Todo;

/// Generate a fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Deserialize an explicit `null` as the field's default, so `{"name": null}`
/// reads the same as a missing `name`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;

    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
