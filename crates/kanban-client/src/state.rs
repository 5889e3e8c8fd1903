/// Which modal view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Check,
    Edit,
    Delete,
}

/// What kind of record the modal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Board,
    Todo,
}

/// The open modal: its kind and the record it is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveModal {
    pub kind: ModalKind,
    pub entity: EntityType,
    pub id: String,
}

impl ActiveModal {
    pub fn new(kind: ModalKind, entity: EntityType, id: impl Into<String>) -> Self {
        Self {
            kind,
            entity,
            id: id.into(),
        }
    }

    pub fn check_todo(id: impl Into<String>) -> Self {
        Self::new(ModalKind::Check, EntityType::Todo, id)
    }

    pub fn edit_todo(id: impl Into<String>) -> Self {
        Self::new(ModalKind::Edit, EntityType::Todo, id)
    }

    pub fn delete_todo(id: impl Into<String>) -> Self {
        Self::new(ModalKind::Delete, EntityType::Todo, id)
    }

    pub fn edit_board(id: impl Into<String>) -> Self {
        Self::new(ModalKind::Edit, EntityType::Board, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a modal, replacing any open one, or close with `None`.
    SwapModal(Option<ActiveModal>),
    SelectBoard(Option<String>),
    ToggleDarkMode,
}

/// App-wide UI state, owned by [`crate::App`] and handed to views by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub modal: Option<ActiveModal>,
    pub selected_board: Option<String>,
    pub dark_mode: bool,
}

impl AppState {
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SwapModal(modal) => self.modal = modal,
            Action::SelectBoard(board) => self.selected_board = board,
            Action::ToggleDarkMode => self.dark_mode = !self.dark_mode,
        }
    }

    pub fn is_open(&self, kind: ModalKind, entity: EntityType) -> bool {
        self.modal
            .as_ref()
            .is_some_and(|m| m.kind == kind && m.entity == entity)
    }
}
