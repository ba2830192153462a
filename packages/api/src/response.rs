// ABOUTME: Shared API response types and error handling
// ABOUTME: Maps storage errors onto HTTP status codes with a JSON error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

use storefront_storage::StorageError;

/// API response wrapper. Success payloads are returned bare, so the
/// envelope is only ever built for error bodies.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Handler-level error carrying a storage error into an HTTP response
pub struct ApiError(StorageError);

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            StorageError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            StorageError::DuplicateName(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}
