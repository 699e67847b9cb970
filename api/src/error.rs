use crate::responses::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use doc_qa::{CompletionError, QaError, StoreError};

/// HTTP-facing error: a status code plus the `detail` string returned to the caller.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::Extraction(e) => {
                log::warn!("Rejected upload: {}", e);
                Self::bad_request(e.to_string())
            }
            QaError::Store(e @ StoreError::NotFound(_)) => {
                Self::new(StatusCode::NOT_FOUND, e.to_string())
            }
            QaError::Completion(e @ CompletionError::Upstream { .. }) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            QaError::Completion(e) => {
                log::error!("Completion failed: {}", e);
                Self::internal()
            }
            QaError::Task(e) => {
                log::error!("Extraction task failed: {}", e);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}
