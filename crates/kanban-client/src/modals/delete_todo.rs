use kanban_service::ServiceError;

use super::{Effect, Request, Response};
use crate::geometry::Rect;

const DEFAULT_BOUNDS: Rect = Rect::new(0, 250, 343, 260);

/// Confirmation before deleting a todo and its subtodos.
#[derive(Debug, Clone)]
pub struct DeleteTodoModal {
    todo_id: String,
    pending: bool,
    error: Option<ServiceError>,
    bounds: Rect,
}

impl DeleteTodoModal {
    pub fn new(todo_id: String) -> Self {
        Self {
            todo_id,
            pending: false,
            error: None,
            bounds: DEFAULT_BOUNDS,
        }
    }

    pub fn todo_id(&self) -> &str {
        &self.todo_id
    }

    pub fn title(&self) -> &'static str {
        "Delete this task?"
    }

    pub fn prompt(&self) -> &'static str {
        "Are you sure you want to delete this task and its subtasks? This action cannot be reversed."
    }

    pub fn pending(&self) -> bool {
        self.pending
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

    /// The modal stays open until the delete lands; closing first would cancel it.
    pub fn confirm(&mut self) -> Effect {
        if self.pending {
            return Effect::None;
        }
        self.pending = true;
        self.error = None;
        Effect::Send(Request::DeleteTodo(self.todo_id.clone()))
    }

    pub fn cancel(&self) -> Effect {
        Effect::Close
    }

    pub fn apply(&mut self, response: Response) -> Effect {
        match response {
            Response::TodoDeleted(result) => {
                self.pending = false;
                match result {
                    Ok(todo) => {
                        tracing::debug!(todo = %todo.id, "todo deleted");
                        Effect::Close
                    }
                    Err(e) => {
                        self.error = Some(e);
                        Effect::None
                    }
                }
            }
            other => {
                tracing::debug!("delete todo ignoring {other:?}");
                Effect::None
            }
        }
    }
}
