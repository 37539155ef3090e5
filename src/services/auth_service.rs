//! Auth Service
//!
//! Login, token refresh and logout flows. Owns every session store
//! mutation: a successful login writes the record, a refresh replaces
//! the jwt/feed token pair, logout removes it.

use serde::Serialize;
use tracing::{info, warn};

use crate::brokers::LoginCredentials;
use crate::error::{AppError, Result};
use crate::sessions::SessionRecord;
use crate::state::AppState;

/// Token pair handed back to the caller. The refresh token stays inside
/// the gateway's session store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub jwt_token: String,
    pub feed_token: String,
}

/// Auth service for business logic
pub struct AuthService;

impl AuthService {
    /// Authenticate against the broker and store the session record,
    /// overwriting any previous session for the same client.
    pub async fn login(state: &AppState, credentials: LoginCredentials) -> Result<AuthTokens> {
        info!("AuthService::login - {}", credentials.client_id);

        let client_id = credentials.client_id.clone();
        let api_key = credentials.api_key.clone();

        let tokens = state.broker.login(credentials).await?;

        state.sessions.put(SessionRecord {
            client_id: client_id.clone(),
            api_key,
            jwt_token: tokens.jwt_token.clone(),
            feed_token: tokens.feed_token.clone(),
            refresh_token: tokens.refresh_token,
            created_at: chrono::Utc::now(),
        });

        info!("Broker login successful for {}", client_id);

        Ok(AuthTokens {
            jwt_token: tokens.jwt_token,
            feed_token: tokens.feed_token,
        })
    }

    /// Exchange a refresh token for a fresh jwt/feed pair. The stored
    /// session supplies the api key and bearer token; only the token
    /// pair is replaced in the record.
    pub async fn refresh(
        state: &AppState,
        client_id: &str,
        refresh_token: &str,
    ) -> Result<AuthTokens> {
        info!("AuthService::refresh - {}", client_id);

        let session = state
            .sessions
            .get(client_id)
            .ok_or_else(|| AppError::Auth(format!("No active session for client {}", client_id)))?;

        let refreshed = state
            .broker
            .refresh_tokens(&session.api_key, &session.jwt_token, refresh_token)
            .await?;

        state.sessions.put(SessionRecord {
            jwt_token: refreshed.jwt_token.clone(),
            feed_token: refreshed.feed_token.clone(),
            ..session
        });

        Ok(AuthTokens {
            jwt_token: refreshed.jwt_token,
            feed_token: refreshed.feed_token,
        })
    }

    /// Clear the local session and fire the upstream logout as a
    /// detached task. The upstream outcome is observed only for
    /// logging; local cleanup must always succeed.
    pub fn logout(state: &AppState, client_id: &str, auth_token: Option<String>) {
        info!("AuthService::logout - {}", client_id);

        let bearer = auth_token.or_else(|| {
            state
                .sessions
                .get(client_id)
                .map(|session| session.jwt_token)
        });

        let broker = state.broker.clone();
        let client = client_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = broker.logout(bearer.as_deref(), &client).await {
                warn!("Upstream logout for {} failed: {}", client, e);
            }
        });

        state.sessions.delete(client_id);
    }
}
