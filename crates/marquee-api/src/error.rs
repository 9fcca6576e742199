use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use marquee_core::{ImportError, StoreError};
use marquee_sources::SourceError;
use thiserror::Error;

use crate::response::ApiResponse;

/// Everything a handler can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request parameters failed validation
    #[error("{0}")]
    Validation(String),

    /// Search rejected by the provider
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Provider unreachable or answered garbage
    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Import(#[from] ImportError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl ApiError {
    /// Search failures: provider refusals are 400, transport problems 502
    pub fn from_search(e: SourceError) -> Self {
        if e.is_transport() {
            ApiError::Upstream(e.to_string())
        } else {
            ApiError::BadRequest(e.to_string())
        }
    }

    /// Details failures: provider refusals are 404, transport problems 502
    pub fn from_details(e: SourceError) -> Self {
        if e.is_transport() {
            ApiError::Upstream(e.to_string())
        } else {
            ApiError::NotFound(e.to_string())
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Upstream(msg) => {
                tracing::error!("Provider error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::Import(e) => match e {
                ImportError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
                ImportError::Provider(SourceError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }
                ImportError::Provider(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                ImportError::Transport(_) => {
                    tracing::error!("Provider error during import: {}", e);
                    (StatusCode::BAD_GATEWAY, e.to_string())
                }
                ImportError::Persistence(StoreError::Conflict { .. }) => {
                    (StatusCode::CONFLICT, e.to_string())
                }
                ImportError::Persistence(store) => {
                    tracing::error!("Persistence error during import: {}", store);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to save content".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ApiResponse::failure(message))).into_response()
    }
}
