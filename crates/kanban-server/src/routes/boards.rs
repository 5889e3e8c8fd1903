use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use kanban_core::board::{CreateBoard, UpdateBoard};
use kanban_core::column::ReplaceColumns;
use kanban_service::KanbanService;

use super::extract::ApiJson;
use super::{created, ok, to_error, ApiResult, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/boards",
            get(list_boards).post(create_board).delete(delete_all_boards),
        )
        .route(
            "/api/boards/{id}",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route(
            "/api/boards/{id}/columns",
            get(list_board_columns).put(replace_board_columns),
        )
}

async fn list_boards(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .list_boards()
        .await
        .map(|b| ok("Successfully fetched boards", "boards", b))
        .map_err(to_error("Error fetching boards"))
}

async fn get_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .get_board(&id)
        .await
        .map(|b| ok("Successfully fetched board", "board", b))
        .map_err(to_error("Error fetching board"))
}

async fn create_board(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateBoard>,
) -> ApiResult {
    state
        .service
        .create_board(&input)
        .await
        .map(|b| created("Successfully added board", "board", b))
        .map_err(to_error("Error adding board"))
}

async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateBoard>,
) -> ApiResult {
    state
        .service
        .update_board(&id, &input)
        .await
        .map(|b| ok("Successfully updated board", "board", b))
        .map_err(to_error("Error updating board"))
}

async fn delete_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .service
        .delete_board(&id)
        .await
        .map(|b| {
            ok(
                "Successfully deleted board and associated columns",
                "board",
                b,
            )
        })
        .map_err(to_error("Error deleting board"))
}

async fn delete_all_boards(State(state): State<AppState>) -> ApiResult {
    state
        .service
        .delete_all_boards()
        .await
        .map(|n| {
            ok(
                "Successfully deleted all boards and associated columns",
                "deleted",
                n,
            )
        })
        .map_err(to_error("Error deleting boards"))
}

async fn list_board_columns(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    state
        .service
        .list_board_columns(&id)
        .await
        .map(|c| ok("Successfully fetched columns", "columns", c))
        .map_err(to_error("Error fetching board columns"))
}

async fn replace_board_columns(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ReplaceColumns>,
) -> ApiResult {
    state
        .service
        .replace_board_columns(&id, &input)
        .await
        .map(|c| ok("Successfully updated columns", "columns", c))
        .map_err(to_error("Error updating board columns"))
}
