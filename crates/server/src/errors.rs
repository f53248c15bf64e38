use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body returned by every `/api` route.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self { status, error: error.to_string(), message }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, message = ?self.message, "api error");
        }
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = Some(e.to_string());
        match e {
            ServiceError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            ServiceError::Upload(_) => Self::new(StatusCode::BAD_REQUEST, "Upload Error", msg),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", msg),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let msg = Some(e.to_string());
        match e {
            AuthError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            AuthError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", msg),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", msg),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error("backend unavailable: {0}")]
    Backend(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::Validation("name".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Upload("type".into()), StatusCode::BAD_REQUEST),
            (ServiceError::record_not_found(), StatusCode::NOT_FOUND),
            (ServiceError::Db("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn auth_errors_map_to_status() {
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::Validation("x".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(JsonApiError::from(AuthError::Storage("x".into())).status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_carries_error_and_message() {
        let err = JsonApiError::from(ServiceError::record_not_found());
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["error"], "Not Found");
        assert!(body["message"].as_str().unwrap().contains("record not found"));
    }
}
