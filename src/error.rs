//! Application error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Upstream broker error: {message}")]
    Upstream {
        message: String,
        errorcode: Option<String>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the error surfaces with. Upstream and transport
    /// failures are caller-visible request failures, not server faults.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } | AppError::Http(_) => StatusCode::BAD_REQUEST,
            AppError::Serialization(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable error code for the response envelope. Upstream errors pass
    /// the broker's own errorcode through when it provided one.
    pub fn error_code(&self) -> String {
        match self {
            AppError::Http(_) => "HTTP_ERROR".to_string(),
            AppError::Serialization(_) => "SERIALIZATION_ERROR".to_string(),
            AppError::Auth(_) => "AUTH_FAILED".to_string(),
            AppError::Upstream { errorcode, .. } => errorcode
                .clone()
                .unwrap_or_else(|| "UPSTREAM_ERROR".to_string()),
            AppError::Validation(_) => "VALIDATION_ERROR".to_string(),
            AppError::Config(_) => "CONFIG_ERROR".to_string(),
            AppError::Internal(_) => "INTERNAL_ERROR".to_string(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Http(e) => e.to_string(),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::Auth(msg) | AppError::Validation(msg) => msg.clone(),
            // 5xx detail stays out of production responses; it is always logged.
            AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => {
                if cfg!(debug_assertions) {
                    self.to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "success": false,
            "message": self.client_message(),
            "errorCode": self.error_code(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Upstream {
                message: "x".into(),
                errorcode: None
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_errorcode_passthrough() {
        let err = AppError::Upstream {
            message: "Invalid totp".into(),
            errorcode: Some("AB1050".into()),
        };
        assert_eq!(err.error_code(), "AB1050");

        let err = AppError::Upstream {
            message: "Unknown".into(),
            errorcode: None,
        };
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_auth_defaults_to_auth_failed() {
        assert_eq!(AppError::Auth("nope".into()).error_code(), "AUTH_FAILED");
    }
}
