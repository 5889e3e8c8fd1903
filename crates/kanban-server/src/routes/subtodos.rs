use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Router,
};
use kanban_core::subtodo::{CreateSubtodo, UpdateSubtodo};
use kanban_service::KanbanService;

use super::extract::ApiJson;
use super::{created, ok, to_error, ApiResult, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/subtodos",
            get(list_subtodos).post(create_subtodo).delete(delete_all_subtodos),
        )
        .route(
            "/api/subtodos/{id}",
            get(get_subtodo).put(update_subtodo).delete(delete_subtodo),
        )
        .route("/api/subtodos/toggle/{id}", patch(toggle_subtodo))
}

async fn list_subtodos(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .list_subtodos()
        .await
        .map(|s| ok("Successfully fetched subtodos", "subtodos", s))
        .map_err(to_error("Error fetching subtodos"))
}

async fn get_subtodo(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .get_subtodo(&id)
        .await
        .map(|s| ok("Successfully fetched subtodo", "subtodo", s))
        .map_err(to_error("Error fetching subtodo"))
}

async fn create_subtodo(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateSubtodo>,
) -> ApiResult {
    state
        .service
        .create_subtodo(&input)
        .await
        .map(|s| created("Successfully added subtodo", "subtodo", s))
        .map_err(to_error("Error adding subtodo"))
}

async fn update_subtodo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateSubtodo>,
) -> ApiResult {
    state
        .service
        .update_subtodo(&id, &input)
        .await
        .map(|s| ok("Successfully updated subtodo", "subtodo", s))
        .map_err(to_error("Error updating subtodo"))
}

async fn toggle_subtodo(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .toggle_subtodo(&id)
        .await
        .map(|s| ok("Successfully toggled subtodo", "subtodo", s))
        .map_err(to_error("Error toggling subtodo"))
}

async fn delete_subtodo(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .delete_subtodo(&id)
        .await
        .map(|s| ok("Successfully deleted subtodo", "subtodo", s))
        .map_err(to_error("Error deleting subtodo"))
}

async fn delete_all_subtodos(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .delete_all_subtodos()
        .await
        .map(|n| ok("Successfully deleted all subtodos", "deleted", n))
        .map_err(to_error("Error deleting subtodos"))
}
