//! Broker adapter module

pub mod angel;
pub mod instruments;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// Broker seam. The gateway talks to exactly one upstream today, but
/// handlers and services only see this trait so tests can substitute a
/// canned implementation.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Authenticate and obtain the session token set.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginTokens>;

    /// Last traded price for an instrument. Returns the upstream data
    /// payload verbatim; the gateway does not reshape it.
    async fn ltp(&self, auth_token: &str, request: LtpRequest) -> Result<serde_json::Value>;

    /// Exchange the refresh token for a fresh jwt/feed token pair.
    async fn refresh_tokens(
        &self,
        api_key: &str,
        auth_token: &str,
        refresh_token: &str,
    ) -> Result<RefreshedTokens>;

    /// Terminate the upstream session. Best-effort: callers observe the
    /// outcome for logging only.
    async fn logout(&self, auth_token: Option<&str>, client_id: &str) -> Result<()>;
}

/// Credentials for the password + TOTP login flow
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub api_key: String,
    pub client_id: String,
    pub password: String,
    pub totp: String,
}

/// Token set issued on login
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub jwt_token: String,
    pub feed_token: String,
    pub refresh_token: String,
}

/// Token pair issued on refresh
#[derive(Debug, Clone)]
pub struct RefreshedTokens {
    pub jwt_token: String,
    pub feed_token: String,
}

/// Instrument lookup inputs for the LTP endpoint
#[derive(Debug, Clone)]
pub struct LtpRequest {
    pub exchange: String,
    pub trading_symbol: String,
    pub symbol_token: String,
}
