use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use kanban_core::column::{CreateColumn, UpdateColumn};
use kanban_service::KanbanService;

use super::extract::ApiJson;
use super::{created, ok, to_error, ApiResult, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/columns",
            get(list_columns).post(create_column).delete(delete_all_columns),
        )
        .route(
            "/api/columns/{id}",
            get(get_column).put(update_column).delete(delete_column),
        )
        .route("/api/columns/{id}/todos", get(list_column_todos))
}

async fn list_columns(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .list_columns()
        .await
        .map(|c| ok("Successfully fetched columns", "columns", c))
        .map_err(to_error("Error fetching columns"))
}

async fn get_column(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .get_column(&id)
        .await
        .map(|c| ok("Successfully fetched column", "column", c))
        .map_err(to_error("Error fetching column"))
}

async fn create_column(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateColumn>,
) -> ApiResult {
    state
        .service
        .create_column(&input)
        .await
        .map(|c| created("Successfully added column", "column", c))
        .map_err(to_error("Error adding column"))
}

async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateColumn>,
) -> ApiResult {
    state
        .service
        .update_column(&id, &input)
        .await
        .map(|c| ok("Successfully updated column", "column", c))
        .map_err(to_error("Error updating column"))
}

async fn delete_column(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .delete_column(&id)
        .await
        .map(|c| ok("Successfully deleted column and associated todos", "column", c))
        .map_err(to_error("Error deleting column"))
}

async fn delete_all_columns(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .delete_all_columns()
        .await
        .map(|n| ok("Successfully deleted all columns", "deleted", n))
        .map_err(to_error("Error deleting columns"))
}

async fn list_column_todos(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .list_column_todos(&id)
        .await
        .map(|t| ok("Successfully fetched todos", "todos", t))
        .map_err(to_error("Error fetching column todos"))
}
