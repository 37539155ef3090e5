//! Gateway endpoint handlers
//!
//! Each handler validates input presence, delegates to a service and
//! wraps the outcome in the response envelope. Upstream failures are
//! converted at this boundary; nothing propagates as a raw fault.

use axum::extract::{Json, Path, Query, State};
use axum::http::{header, HeaderMap};
use chrono::NaiveDate;

use crate::api::types::{
    ApiResponse, AuthRequest, Empty, HealthResponse, LogoutRequest, LtpBody, OptionsQuery,
    RefreshRequest,
};
use crate::brokers::LoginCredentials;
use crate::error::{AppError, Result};
use crate::services::{AuthService, AuthTokens, OptionChainData, OptionsService, QuotesService};
use crate::state::AppState;

/// Health check endpoint - GET /api/health or GET /
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok("Angel One gateway is running"))
}

/// Broker login - POST /api/auth/angel-one
pub async fn angel_auth(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<ApiResponse<AuthTokens>>> {
    let (Some(api_key), Some(client_id), Some(password), Some(totp)) = (
        required(request.api_key),
        required(request.client_id),
        required(request.password),
        required(request.totp),
    ) else {
        return Err(AppError::Validation(
            "All fields are required: apiKey, clientId, password, totp".to_string(),
        ));
    };

    let tokens = AuthService::login(
        &state,
        LoginCredentials {
            api_key,
            client_id,
            password,
            totp,
        },
    )
    .await?;

    Ok(Json(ApiResponse::success_with_data(tokens)))
}

/// Last traded price - POST /api/ltp
pub async fn get_ltp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LtpBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let token = bearer_token(&headers)?;

    let symbol = required(request.symbol)
        .ok_or_else(|| AppError::Validation("Symbol is required".to_string()))?;

    let data = QuotesService::get_ltp(&state, &token, &symbol, request.exchange.as_deref()).await?;

    Ok(Json(ApiResponse::success_with_data(data)))
}

/// Option chain - GET /api/options/:symbol?expiry=YYYY-MM-DD
pub async fn get_option_chain(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<OptionsQuery>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<OptionChainData>>> {
    let token = bearer_token(&headers)?;

    let raw_expiry = required(query.expiry)
        .ok_or_else(|| AppError::Validation("Expiry date is required".to_string()))?;

    let expiry = NaiveDate::parse_from_str(&raw_expiry, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("Invalid expiry date: {}, expected YYYY-MM-DD", raw_expiry))
    })?;

    let chain = OptionsService::get_option_chain(&state, &token, &symbol, expiry).await?;

    Ok(Json(ApiResponse::success_with_data(chain)))
}

/// Token refresh - POST /api/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthTokens>>> {
    let (Some(client_id), Some(refresh)) = (
        required(request.client_id),
        required(request.refresh_token),
    ) else {
        return Err(AppError::Validation(
            "All fields are required: clientId, refreshToken".to_string(),
        ));
    };

    let tokens = AuthService::refresh(&state, &client_id, &refresh).await?;

    Ok(Json(ApiResponse::success_with_data(tokens)))
}

/// Logout - POST /api/logout
///
/// Always succeeds: the upstream call is detached and the local session
/// is cleared unconditionally, so the caller can always terminate its
/// session state.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<Empty>>> {
    let client_id = required(request.client_id)
        .ok_or_else(|| AppError::Validation("Client ID is required".to_string()))?;

    AuthService::logout(&state, &client_id, optional_bearer(&headers));

    Ok(Json(ApiResponse::success_with_message(
        "Logged out successfully",
    )))
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn optional_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Result<String> {
    optional_bearer(headers)
        .ok_or_else(|| AppError::Auth("Authorization token required".to_string()))
}
