use kanban_core::column::ColumnDraft;
use kanban_service::ServiceError;

use super::{Effect, Request, Response};
use crate::components::ColumnRepeater;
use crate::geometry::Rect;

const DEFAULT_BOUNDS: Rect = Rect::new(0, 279, 343, 430);

/// Form for renaming a board and editing its columns.
#[derive(Debug, Clone)]
pub struct EditBoardModal {
    board_id: String,
    name: String,
    columns: Vec<ColumnDraft>,
    repeater: ColumnRepeater,
    loaded: bool,
    name_edited: bool,
    saving: bool,
    error: Option<ServiceError>,
    bounds: Rect,
}

impl EditBoardModal {
    pub fn new(board_id: String) -> (Self, Request) {
        let load = Request::LoadBoard(board_id.clone());
        let modal = Self {
            board_id,
            name: String::new(),
            columns: Vec::new(),
            repeater: ColumnRepeater::default(),
            loaded: false,
            name_edited: false,
            saving: false,
            error: None,
            bounds: DEFAULT_BOUNDS,
        };
        (modal, load)
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column list as last reported by the repeater.
    pub fn columns(&self) -> &[ColumnDraft] {
        &self.columns
    }

    pub fn repeater(&self) -> &ColumnRepeater {
        &self.repeater
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&ServiceError> {
        self.error.as_ref()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.name_edited = true;
    }

    /// Column edits wait for the board's columns to arrive.
    pub fn add_column(&mut self) {
        if !self.loaded {
            return;
        }
        let columns = &mut self.columns;
        self.repeater.append(|rows| *columns = rows.to_vec());
    }

    pub fn rename_column(&mut self, index: usize, name: &str) {
        if !self.loaded {
            return;
        }
        let columns = &mut self.columns;
        self.repeater.edit(index, name, |rows| *columns = rows.to_vec());
    }

    pub fn remove_column(&mut self, index: usize) {
        if !self.loaded {
            return;
        }
        let columns = &mut self.columns;
        self.repeater.remove(index, |rows| *columns = rows.to_vec());
    }

    /// Saving replaces the whole column set, so nothing is sent until the
    /// current columns have loaded.
    pub fn submit(&mut self) -> Effect {
        if !self.loaded || self.saving {
            return Effect::None;
        }
        self.saving = true;
        self.error = None;
        Effect::Send(Request::SaveBoard {
            id: self.board_id.clone(),
            name: self.name.clone(),
            columns: self.columns.clone(),
        })
    }

    pub fn apply(&mut self, response: Response) -> Effect {
        match response {
            Response::BoardLoaded(Ok((board, columns))) => {
                if !self.name_edited {
                    self.name = board.name;
                }
                self.columns = columns.iter().map(ColumnDraft::from).collect();
                self.repeater = ColumnRepeater::new(&self.columns);
                self.loaded = true;
                Effect::None
            }
            Response::BoardSaved(Ok(columns)) => {
                tracing::debug!(board = %self.board_id, columns = columns.len(), "board saved");
                self.saving = false;
                Effect::Close
            }
            Response::BoardLoaded(Err(e)) => {
                self.error = Some(e);
                Effect::None
            }
            Response::BoardSaved(Err(e)) => {
                self.saving = false;
                self.error = Some(e);
                Effect::None
            }
            other => {
                tracing::debug!("edit board ignoring {other:?}");
                Effect::None
            }
        }
    }
}
