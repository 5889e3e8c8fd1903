use kanban_core::column::ColumnDraft;

/// Editable list of column drafts for the board form.
///
/// Every mutation hands the full updated list to `on_change`. Rows are
/// addressed by position; an index past the end is a no-op and does not
/// notify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRepeater {
    rows: Vec<ColumnDraft>,
}

impl ColumnRepeater {
    pub fn new(seed: &[ColumnDraft]) -> Self {
        Self {
            rows: seed.to_vec(),
        }
    }

    pub fn rows(&self) -> &[ColumnDraft] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add a blank row at the end.
    pub fn append(&mut self, on_change: impl FnOnce(&[ColumnDraft])) {
        self.rows.push(ColumnDraft::blank());
        on_change(&self.rows);
    }

    pub fn edit(&mut self, index: usize, name: &str, on_change: impl FnOnce(&[ColumnDraft])) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        row.name = name.to_string();
        on_change(&self.rows);
    }

    pub fn remove(&mut self, index: usize, on_change: impl FnOnce(&[ColumnDraft])) {
        if index >= self.rows.len() {
            return;
        }
        self.rows.remove(index);
        on_change(&self.rows);
    }
}
