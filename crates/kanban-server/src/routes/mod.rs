pub mod boards;
pub mod columns;
mod extract;
pub mod health;
pub mod subtodos;
pub mod todos;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use kanban_service::{LocalService, ServiceError};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct InnerAppState {
    pub service: LocalService,
}

pub type AppState = Arc<InnerAppState>;

/// Every response body is `{ "message": ..., <payload> }`.
pub(crate) type ApiResponse = (StatusCode, Json<Value>);
pub(crate) type ApiResult = Result<ApiResponse, ApiResponse>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(boards::routes())
        .merge(columns::routes())
        .merge(todos::routes())
        .merge(subtodos::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build a success envelope carrying `payload` under `key`.
pub(crate) fn envelope<T: serde::Serialize>(
    status: StatusCode,
    message: &str,
    key: &str,
    payload: T,
) -> ApiResponse {
    let mut body = json!({ "message": message });
    body[key] = json!(payload);
    (status, Json(body))
}

pub(crate) fn ok<T: serde::Serialize>(message: &str, key: &str, payload: T) -> ApiResponse {
    envelope(StatusCode::OK, message, key, payload)
}

pub(crate) fn created<T: serde::Serialize>(message: &str, key: &str, payload: T) -> ApiResponse {
    envelope(StatusCode::CREATED, message, key, payload)
}

/// Translate a service error into a status code and error envelope.
/// Internal details are logged, never returned.
pub(crate) fn to_error(context: &str) -> impl FnOnce(ServiceError) -> ApiResponse + '_ {
    move |e| {
        let (status, message) = match &e {
            ServiceError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServiceError::Conflict(m) | ServiceError::InvalidInput(m) => {
                (StatusCode::BAD_REQUEST, m.clone())
            }
            ServiceError::Internal(m) => {
                tracing::error!("{context}: {m}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message, "error": e.code() })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let (status, Json(body)) =
            to_error("Error fetching board")(ServiceError::Internal("disk on fire".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
        assert_eq!(body["error"], "internal");
    }

    #[test]
    fn conflict_and_bad_request_share_status() {
        let (conflict, Json(body)) =
            to_error("x")(ServiceError::Conflict("Board already exists".into()));
        let (bad, _) = to_error("x")(ServiceError::InvalidInput("Name is required".into()));
        assert_eq!(conflict, StatusCode::BAD_REQUEST);
        assert_eq!(bad, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["message"], "Board already exists");
    }

    #[test]
    fn envelope_carries_payload_under_key() {
        let (status, Json(body)) = created("Successfully added board", "board", json!({"id": "b1"}));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["board"]["id"], "b1");
        assert_eq!(body["message"], "Successfully added board");
    }
}
