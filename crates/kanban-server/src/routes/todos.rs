use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use kanban_core::todo::{CreateTodo, UpdateTodo};
use kanban_service::KanbanService;

use super::extract::ApiJson;
use super::{created, ok, to_error, ApiResult, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/todos",
            get(list_todos).post(create_todo).delete(delete_all_todos),
        )
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/{id}/subtodos", get(list_todo_subtodos))
}

async fn list_todos(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .list_todos()
        .await
        .map(|t| ok("Successfully fetched todos", "todos", t))
        .map_err(to_error("Error fetching todos"))
}

async fn get_todo(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .get_todo(&id)
        .await
        .map(|t| ok("Successfully fetched todo", "todo", t))
        .map_err(to_error("Error fetching todo"))
}

async fn create_todo(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTodo>,
) -> ApiResult {
    state
        .service
        .create_todo(&input)
        .await
        .map(|t| created("Successfully added todo", "todo", t))
        .map_err(to_error("Error adding todo"))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateTodo>,
) -> ApiResult {
    state
        .service
        .update_todo(&id, &input)
        .await
        .map(|t| ok("Successfully updated todo", "todo", t))
        .map_err(to_error("Error updating todo"))
}

async fn delete_todo(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .delete_todo(&id)
        .await
        .map(|t| ok("Successfully deleted todo and associated subtodos", "todo", t))
        .map_err(to_error("Error deleting todo"))
}

async fn delete_all_todos(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .delete_all_todos()
        .await
        .map(|n| ok("Successfully deleted all todos", "deleted", n))
        .map_err(to_error("Error deleting todos"))
}

async fn list_todo_subtodos(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .list_todo_subtodos(&id)
        .await
        .map(|s| ok("Successfully fetched subtodos", "subtodos", s))
        .map_err(to_error("Error fetching todo subtodos"))
}
