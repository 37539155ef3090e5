//! Quotes Service
//!
//! Last traded price retrieval for index underlyings.

use tracing::info;

use crate::brokers::instruments::{instrument_token, DEFAULT_EXCHANGE};
use crate::brokers::LtpRequest;
use crate::error::Result;
use crate::state::AppState;

/// Quotes service for business logic
pub struct QuotesService;

impl QuotesService {
    /// Fetch the LTP payload for a symbol. The upstream data payload is
    /// returned verbatim.
    pub async fn get_ltp(
        state: &AppState,
        auth_token: &str,
        symbol: &str,
        exchange: Option<&str>,
    ) -> Result<serde_json::Value> {
        let exchange = exchange.unwrap_or(DEFAULT_EXCHANGE);
        info!("QuotesService::get_ltp - {} {}", exchange, symbol);

        let request = LtpRequest {
            exchange: exchange.to_string(),
            trading_symbol: symbol.to_string(),
            symbol_token: instrument_token(symbol).to_string(),
        };

        state.broker.ltp(auth_token, request).await
    }
}
