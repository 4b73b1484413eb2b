use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    #[error("{0}")]
    UnusableGame(String),

    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::UnusableGame(msg) => {
                tracing::warn!("Unusable game data: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            AppError::Registry(e) => {
                tracing::error!("Registry error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load champions data".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
