use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::ApiResponse;

/// `Json` body extractor whose rejections use the error envelope.
///
/// Every rejection (bad syntax, wrong shape, missing content type) is a 400.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!("rejected request body: {rejection}");
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "message": format!("Invalid request body: {}", rejection.body_text()),
                        "error": "bad_request",
                    })),
                ))
            }
        }
    }
}
