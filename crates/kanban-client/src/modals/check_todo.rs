use kanban_core::subtodo::completed_count;
use kanban_core::{Subtodo, Todo};
use kanban_service::ServiceError;

use super::{Effect, Request, Response};
use crate::geometry::{Point, Rect};
use crate::state::ActiveModal;

const DEFAULT_BOUNDS: Rect = Rect::new(0, 207, 343, 400);
const SETTINGS_WIDTH: i32 = 192;
const SETTINGS_HEIGHT: i32 = 94;
const SETTINGS_TOP: i32 = 80;
const SETTINGS_RIGHT: i32 = 16;

/// Read-only view of a todo with its checklist of subtodos.
#[derive(Debug, Clone)]
pub struct CheckTodoModal {
    todo_id: String,
    todo: Option<Todo>,
    subtodos: Vec<Subtodo>,
    error: Option<ServiceError>,
    settings_open: bool,
    bounds: Rect,
}

impl CheckTodoModal {
    pub fn new(todo_id: String) -> (Self, Request) {
        let load = Request::LoadTodo(todo_id.clone());
        let modal = Self {
            todo_id,
            todo: None,
            subtodos: Vec::new(),
            error: None,
            settings_open: false,
            bounds: DEFAULT_BOUNDS,
        };
        (modal, load)
    }

    pub fn todo_id(&self) -> &str {
        &self.todo_id
    }

    pub fn todo(&self) -> Option<&Todo> {
        self.todo.as_ref()
    }

    pub fn subtodos(&self) -> &[Subtodo] {
        &self.subtodos
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

    /// Checklist heading, e.g. "Subtasks (1 of 3)".
    pub fn summary(&self) -> String {
        format!(
            "Subtasks ({} of {})",
            completed_count(&self.subtodos),
            self.subtodos.len()
        )
    }

    /// Ask the server to flip a subtodo. Local state changes only once it succeeds.
    pub fn toggle(&self, subtodo_id: &str) -> Effect {
        Effect::Send(Request::ToggleSubtodo(subtodo_id.to_string()))
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn toggle_settings(&mut self) {
        self.settings_open = !self.settings_open;
    }

    /// The settings popover, anchored to the modal's top-right corner.
    pub fn settings_bounds(&self) -> Rect {
        Rect::new(
            self.bounds.right() - SETTINGS_RIGHT - SETTINGS_WIDTH,
            self.bounds.y + SETTINGS_TOP,
            SETTINGS_WIDTH,
            SETTINGS_HEIGHT,
        )
    }

    pub fn pointer_down(&mut self, p: Point) {
        if self.settings_open && !self.settings_bounds().contains(p) {
            self.settings_open = false;
        }
    }

    pub fn edit(&self) -> Effect {
        Effect::Swap(ActiveModal::edit_todo(self.todo_id.clone()))
    }

    pub fn delete(&self) -> Effect {
        Effect::Swap(ActiveModal::delete_todo(self.todo_id.clone()))
    }

    pub fn apply(&mut self, response: Response) -> Effect {
        match response {
            Response::TodoLoaded(Ok((todo, subtodos))) => {
                self.todo = Some(todo);
                self.subtodos = subtodos;
            }
            Response::SubtodoToggled { id, result: Ok(_) } => {
                if let Some(item) = self.subtodos.iter_mut().find(|s| s.id == id) {
                    item.is_completed = !item.is_completed;
                }
            }
            Response::TodoLoaded(Err(e)) | Response::SubtodoToggled { result: Err(e), .. } => {
                tracing::debug!(todo = %self.todo_id, "check todo request failed: {e}");
                self.error = Some(e);
            }
            other => tracing::debug!("check todo ignoring {other:?}"),
        }
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn subtodo(id: &str, done: bool) -> Subtodo {
        Subtodo {
            id: id.into(),
            todo_id: "t1".into(),
            title: format!("step {id}"),
            is_completed: done,
            created_at: Utc::now(),
        }
    }

    fn todo() -> Todo {
        Todo {
            id: "t1".into(),
            column_id: "c1".into(),
            title: "Build UI".into(),
            description: String::new(),
            status: "Todo".into(),
            subtodos: vec!["s1".into(), "s2".into()],
            created_at: Utc::now(),
        }
    }

    fn loaded() -> CheckTodoModal {
        let (mut modal, _) = CheckTodoModal::new("t1".into());
        modal.apply(Response::TodoLoaded(Ok((
            todo(),
            vec![subtodo("s1", false), subtodo("s2", true)],
        ))));
        modal
    }

    #[test]
    fn successful_toggle_flips_only_the_matching_item() {
        let mut modal = loaded();
        assert_eq!(modal.summary(), "Subtasks (1 of 2)");

        modal.apply(Response::SubtodoToggled {
            id: "s1".into(),
            result: Ok(subtodo("s1", true)),
        });
        assert!(modal.subtodos()[0].is_completed);
        assert!(modal.subtodos()[1].is_completed);
        assert_eq!(modal.summary(), "Subtasks (2 of 2)");
    }

    #[test]
    fn failed_toggle_keeps_state_and_records_error() {
        let mut modal = loaded();
        modal.apply(Response::SubtodoToggled {
            id: "s1".into(),
            result: Err(ServiceError::NotFound("No subtodo found".into())),
        });
        assert!(!modal.subtodos()[0].is_completed);
        assert!(matches!(modal.error(), Some(ServiceError::NotFound(_))));
    }

    #[test]
    fn failed_load_is_recorded() {
        let (mut modal, load) = CheckTodoModal::new("gone".into());
        assert_eq!(load, Request::LoadTodo("gone".into()));
        modal.apply(Response::TodoLoaded(Err(ServiceError::NotFound(
            "No todo found".into(),
        ))));
        assert!(modal.todo().is_none());
        assert_eq!(modal.summary(), "Subtasks (0 of 0)");
        assert!(modal.error().is_some());
    }

    #[test]
    fn settings_popover_closes_on_outside_press() {
        let mut modal = loaded();
        modal.toggle_settings();
        assert!(modal.settings_open());

        let popover = modal.settings_bounds();
        modal.pointer_down(Point::new(popover.x + 1, popover.y + 1));
        assert!(modal.settings_open());

        modal.pointer_down(Point::new(popover.x - 1, popover.y));
        assert!(!modal.settings_open());
    }

    #[test]
    fn settings_actions_swap_to_same_todo() {
        let modal = loaded();
        assert_eq!(modal.edit(), Effect::Swap(ActiveModal::edit_todo("t1")));
        assert_eq!(modal.delete(), Effect::Swap(ActiveModal::delete_todo("t1")));
        assert_eq!(
            modal.toggle("s2"),
            Effect::Send(Request::ToggleSubtodo("s2".into()))
        );
    }
}
