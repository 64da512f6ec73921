use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error envelope: status code plus `{"error": title, "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.title,
            "detail": self.detail,
        }));
        (self.status, body).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => {
                JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))
            }
            ServiceError::Duplicate(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(e.to_string()))
            }
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
            }
            ServiceError::Db(_) => {
                error!(err = %e, "database failure");
                JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    Some(e.to_string()),
                )
            }
        }
    }
}
