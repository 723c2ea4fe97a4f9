use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key is missing. Please check your environment variables.")]
    MissingApiKey,
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    InvalidPayload(String),
    #[error("{0}")]
    Store(String),
}

impl IntoResponse for ApiError {
    // Failures ship as a 200 with an `{"error": ...}` body; the browser
    // client renders them as data rather than branching on status codes.
    fn into_response(self) -> Response {
        Json(ErrorBody {
            error: self.to_string(),
        })
        .into_response()
    }
}
