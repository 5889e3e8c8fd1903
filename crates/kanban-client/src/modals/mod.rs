pub mod check_todo;
pub mod delete_todo;
pub mod edit_board;

use kanban_core::board::UpdateBoard;
use kanban_core::column::{ColumnDraft, ReplaceColumns};
use kanban_core::{Board, Column, Subtodo, Todo};
use kanban_service::{KanbanService, ServiceError};

use crate::geometry::{Point, Rect};
use crate::state::{ActiveModal, EntityType, ModalKind};

pub use check_todo::CheckTodoModal;
pub use delete_todo::DeleteTodoModal;
pub use edit_board::EditBoardModal;

/// A service call a modal wants made on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadTodo(String),
    ToggleSubtodo(String),
    LoadBoard(String),
    SaveBoard {
        id: String,
        name: String,
        columns: Vec<ColumnDraft>,
    },
    DeleteTodo(String),
}

/// The result of a [`Request`], routed back to the modal that asked.
#[derive(Debug, Clone)]
pub enum Response {
    TodoLoaded(Result<(Todo, Vec<Subtodo>), ServiceError>),
    SubtodoToggled {
        id: String,
        result: Result<Subtodo, ServiceError>,
    },
    BoardLoaded(Result<(Board, Vec<Column>), ServiceError>),
    BoardSaved(Result<Vec<Column>, ServiceError>),
    TodoDeleted(Result<Todo, ServiceError>),
}

/// What the host does after a modal handles input or a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Close,
    Swap(ActiveModal),
    Send(Request),
}

impl Request {
    /// Reads that only feed the modal that asked. Everything else writes.
    pub fn is_load(&self) -> bool {
        matches!(self, Request::LoadTodo(_) | Request::LoadBoard(_))
    }

    pub async fn run(self, service: &dyn KanbanService) -> Response {
        match self {
            Request::LoadTodo(id) => Response::TodoLoaded(
                tokio::try_join!(service.get_todo(&id), service.list_todo_subtodos(&id)),
            ),
            Request::ToggleSubtodo(id) => {
                let result = service.toggle_subtodo(&id).await;
                Response::SubtodoToggled { id, result }
            }
            Request::LoadBoard(id) => Response::BoardLoaded(tokio::try_join!(
                service.get_board(&id),
                service.list_board_columns(&id)
            )),
            Request::SaveBoard { id, name, columns } => {
                Response::BoardSaved(save_board(service, &id, name, columns).await)
            }
            Request::DeleteTodo(id) => Response::TodoDeleted(service.delete_todo(&id).await),
        }
    }
}

/// Rename first; the column set is only replaced once the name is accepted.
async fn save_board(
    service: &dyn KanbanService,
    id: &str,
    name: String,
    columns: Vec<ColumnDraft>,
) -> Result<Vec<Column>, ServiceError> {
    service.update_board(id, &UpdateBoard { name }).await?;
    service
        .replace_board_columns(id, &ReplaceColumns { columns })
        .await
}

/// The view behind the open [`ActiveModal`].
#[derive(Debug, Clone)]
pub enum Modal {
    CheckTodo(CheckTodoModal),
    EditBoard(EditBoardModal),
    DeleteTodo(DeleteTodoModal),
}

impl Modal {
    /// Build the view for `active` along with its initial fetch, if any.
    /// Returns `None` when no view handles that kind and entity.
    pub fn open(active: &ActiveModal) -> Option<(Modal, Option<Request>)> {
        let id = active.id.clone();
        match (active.kind, active.entity) {
            (ModalKind::Check, EntityType::Todo) => {
                let (modal, load) = CheckTodoModal::new(id);
                Some((Modal::CheckTodo(modal), Some(load)))
            }
            (ModalKind::Edit, EntityType::Board) => {
                let (modal, load) = EditBoardModal::new(id);
                Some((Modal::EditBoard(modal), Some(load)))
            }
            (ModalKind::Delete, EntityType::Todo) => {
                Some((Modal::DeleteTodo(DeleteTodoModal::new(id)), None))
            }
            _ => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Modal::CheckTodo(m) => m.bounds(),
            Modal::EditBoard(m) => m.bounds(),
            Modal::DeleteTodo(m) => m.bounds(),
        }
    }

    /// Record where the front end actually laid the modal out.
    pub fn set_bounds(&mut self, bounds: Rect) {
        match self {
            Modal::CheckTodo(m) => m.set_bounds(bounds),
            Modal::EditBoard(m) => m.set_bounds(bounds),
            Modal::DeleteTodo(m) => m.set_bounds(bounds),
        }
    }

    /// Pointer press inside the modal's bounds.
    pub fn pointer_down(&mut self, p: Point) {
        if let Modal::CheckTodo(m) = self {
            m.pointer_down(p);
        }
    }

    pub fn apply(&mut self, response: Response) -> Effect {
        match self {
            Modal::CheckTodo(m) => m.apply(response),
            Modal::EditBoard(m) => m.apply(response),
            Modal::DeleteTodo(m) => m.apply(response),
        }
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            Modal::CheckTodo(m) => m.error(),
            Modal::EditBoard(m) => m.error(),
            Modal::DeleteTodo(m) => m.error(),
        }
    }

    pub fn as_check_todo(&self) -> Option<&CheckTodoModal> {
        match self {
            Modal::CheckTodo(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_check_todo_mut(&mut self) -> Option<&mut CheckTodoModal> {
        match self {
            Modal::CheckTodo(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_edit_board(&self) -> Option<&EditBoardModal> {
        match self {
            Modal::EditBoard(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_edit_board_mut(&mut self) -> Option<&mut EditBoardModal> {
        match self {
            Modal::EditBoard(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_delete_todo_mut(&mut self) -> Option<&mut DeleteTodoModal> {
        match self {
            Modal::DeleteTodo(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_maps_kinds_to_views() {
        let (check, load) = Modal::open(&ActiveModal::check_todo("t1")).unwrap();
        assert!(check.as_check_todo().is_some());
        assert_eq!(load, Some(Request::LoadTodo("t1".into())));

        let (edit, load) = Modal::open(&ActiveModal::edit_board("b1")).unwrap();
        assert!(edit.as_edit_board().is_some());
        assert_eq!(load, Some(Request::LoadBoard("b1".into())));

        let (_, load) = Modal::open(&ActiveModal::delete_todo("t1")).unwrap();
        assert_eq!(load, None);
    }

    #[test]
    fn unhandled_combinations_have_no_view() {
        assert!(Modal::open(&ActiveModal::edit_todo("t1")).is_none());
        assert!(Modal::open(&ActiveModal::new(ModalKind::Delete, EntityType::Board, "b1")).is_none());
    }
}
