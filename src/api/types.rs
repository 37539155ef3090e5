//! Gateway request and response types
//!
//! Every handler answers with the same envelope:
//! `{ success, data?, message?, errorCode? }`. Absent fields are left
//! out of the JSON entirely.
//!
//! Request fields are all optional at the serde level so that a missing
//! field becomes a gateway validation error with a stable message
//! instead of a framework rejection.

use serde::{Deserialize, Serialize};

/// Standard response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "errorCode", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success_with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error_code: None,
        }
    }

    pub fn success_with_message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
            error_code: None,
        }
    }
}

/// Empty data type for responses without data
#[derive(Debug, Clone, Serialize)]
pub struct Empty {}

/// Health check response - the one endpoint that answers flat, with a
/// timestamp beside the message.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Login request - POST /api/auth/angel-one
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    pub password: Option<String>,
    pub totp: Option<String>,
}

/// LTP request - POST /api/ltp
#[derive(Debug, Clone, Deserialize)]
pub struct LtpBody {
    pub symbol: Option<String>,
    pub exchange: Option<String>,
}

/// Option chain query - GET /api/options/:symbol?expiry=YYYY-MM-DD
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsQuery {
    pub expiry: Option<String>,
}

/// Refresh request - POST /api/refresh-token
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub client_id: Option<String>,
    pub refresh_token: Option<String>,
}

/// Logout request - POST /api/logout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub client_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_absent_fields() {
        let response = ApiResponse::<Empty>::success_with_message("ok");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
        assert!(json.get("data").is_none());
        assert!(json.get("errorCode").is_none());
    }

    #[test]
    fn test_envelope_with_data_has_no_message() {
        let response = ApiResponse::success_with_data(vec![1, 2, 3]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_auth_request_accepts_partial_bodies() {
        let request: AuthRequest =
            serde_json::from_str(r#"{"apiKey":"k","clientId":"A100"}"#).unwrap();

        assert_eq!(request.api_key.as_deref(), Some("k"));
        assert_eq!(request.client_id.as_deref(), Some("A100"));
        assert!(request.password.is_none());
        assert!(request.totp.is_none());
    }
}
