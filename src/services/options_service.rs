//! Options Service
//!
//! Strike ladder construction, expiry encoding and option chain
//! assembly. The per-strike call/put analytics are synthesized demo
//! values (random numbers in fixed ranges), not market data: the
//! gateway has no per-strike instrument tokens to quote against. They
//! are generated concurrently and any strike whose task fails is
//! dropped from the result.

use chrono::NaiveDate;
use futures_util::future;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::services::QuotesService;
use crate::state::AppState;

/// Strikes on each side of the at-the-money strike.
const LADDER_HALF_WIDTH: i32 = 15;

/// One rung of the option chain. Every analytics field is a synthetic
/// placeholder; only `strike` is derived from real data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeEntry {
    pub strike: f64,
    #[serde(rename = "callOI")]
    pub call_oi: i64,
    #[serde(rename = "callLTP")]
    pub call_ltp: f64,
    #[serde(rename = "callVolume")]
    pub call_volume: i64,
    #[serde(rename = "putOI")]
    pub put_oi: i64,
    #[serde(rename = "putLTP")]
    pub put_ltp: f64,
    #[serde(rename = "putVolume")]
    pub put_volume: i64,
}

/// Option chain response payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainData {
    pub current_price: f64,
    pub strikes: Vec<StrikeEntry>,
    pub timestamp: String,
    pub symbol: String,
    pub expiry: String,
}

/// Options service for business logic
pub struct OptionsService;

impl OptionsService {
    /// Build the option chain for an underlying: fetch its LTP, lay a
    /// 31-strike ladder around it and synthesize per-strike analytics.
    /// An empty strikes array is still a success.
    pub async fn get_option_chain(
        state: &AppState,
        auth_token: &str,
        symbol: &str,
        expiry: NaiveDate,
    ) -> Result<OptionChainData> {
        info!("OptionsService::get_option_chain - {} {}", symbol, expiry);

        let ltp_payload = QuotesService::get_ltp(state, auth_token, symbol, None).await?;

        let current_price = ltp_payload
            .get("ltp")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| AppError::Upstream {
                message: "No LTP in upstream response".to_string(),
                errorcode: None,
            })?;

        let ladder = build_strike_ladder(current_price, symbol)?;

        // One task per strike; a failed task drops only its own strike.
        let tasks: Vec<_> = ladder
            .into_iter()
            .map(|strike| tokio::spawn(async move { synthesize_strike(strike) }))
            .collect();

        let total = tasks.len();
        let strikes: Vec<StrikeEntry> = future::join_all(tasks)
            .await
            .into_iter()
            .filter_map(|joined| joined.ok())
            .collect();

        if strikes.len() < total {
            warn!(
                "Dropped {} of {} strikes for {}",
                total - strikes.len(),
                total,
                symbol
            );
        }

        Ok(OptionChainData {
            current_price,
            strikes,
            timestamp: chrono::Utc::now().to_rfc3339(),
            symbol: symbol.to_string(),
            expiry: format_expiry(expiry),
        })
    }
}

/// Strike spacing for an underlying. BANKNIFTY trades on a 100-point
/// grid, the other served indices on 50.
pub fn strike_step(symbol: &str) -> f64 {
    if symbol.eq_ignore_ascii_case("BANKNIFTY") {
        100.0
    } else {
        50.0
    }
}

/// Symmetric ladder of strikes around the current price: the nearest
/// step multiple plus 15 strikes on each side, ascending.
pub fn build_strike_ladder(current_price: f64, symbol: &str) -> Result<Vec<f64>> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(AppError::Validation(format!(
            "Invalid underlying price: {}",
            current_price
        )));
    }

    let step = strike_step(symbol);
    let base_strike = (current_price / step).round() * step;

    Ok((-LADDER_HALF_WIDTH..=LADDER_HALF_WIDTH)
        .map(|k| base_strike + f64::from(k) * step)
        .collect())
}

/// Encode a calendar date in the broker's DDMMMYY symbol format,
/// e.g. 2024-03-28 -> "28MAR24". The date is taken as given; callers
/// supply the exchange-local (IST) calendar date.
pub fn format_expiry(date: NaiveDate) -> String {
    date.format("%d%b%y").to_string().to_uppercase()
}

/// Demo analytics for one strike. Ranges match the values the chain
/// has always served: OI in [10000, 110000), LTP in [10, 210),
/// volume in [0, 50000).
fn synthesize_strike(strike: f64) -> StrikeEntry {
    let mut rng = rand::thread_rng();

    StrikeEntry {
        strike,
        call_oi: rng.gen_range(10_000..110_000),
        call_ltp: round_paise(rng.gen_range(10.0..210.0)),
        call_volume: rng.gen_range(0..50_000),
        put_oi: rng.gen_range(10_000..110_000),
        put_ltp: round_paise(rng.gen_range(10.0..210.0)),
        put_volume: rng.gen_range(0..50_000),
    }
}

fn round_paise(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_step() {
        assert_eq!(strike_step("NIFTY"), 50.0);
        assert_eq!(strike_step("BANKNIFTY"), 100.0);
        assert_eq!(strike_step("banknifty"), 100.0);
        assert_eq!(strike_step("FINNIFTY"), 50.0);
        assert_eq!(strike_step("SOMETHING"), 50.0);
    }

    #[test]
    fn test_nifty_ladder_centered_on_round_price() {
        let ladder = build_strike_ladder(22_500.0, "NIFTY").unwrap();

        assert_eq!(ladder.len(), 31);
        assert_eq!(ladder[0], 21_750.0);
        assert_eq!(ladder[15], 22_500.0);
        assert_eq!(ladder[30], 23_250.0);
    }

    #[test]
    fn test_banknifty_ladder_rounds_to_hundred() {
        let ladder = build_strike_ladder(48_230.0, "BANKNIFTY").unwrap();

        assert_eq!(ladder.len(), 31);
        assert_eq!(ladder[15], 48_200.0);
        assert_eq!(ladder[0], 46_700.0);
        assert_eq!(ladder[30], 49_700.0);
    }

    #[test]
    fn test_ladder_is_strictly_ascending_with_even_spacing() {
        let ladder = build_strike_ladder(19_873.4, "NIFTY").unwrap();

        for pair in ladder.windows(2) {
            assert_eq!(pair[1] - pair[0], 50.0);
        }
    }

    #[test]
    fn test_ladder_rejects_invalid_price() {
        assert!(build_strike_ladder(0.0, "NIFTY").is_err());
        assert!(build_strike_ladder(-120.0, "NIFTY").is_err());
        assert!(build_strike_ladder(f64::NAN, "NIFTY").is_err());
        assert!(build_strike_ladder(f64::INFINITY, "NIFTY").is_err());
    }

    #[test]
    fn test_format_expiry() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        assert_eq!(format_expiry(date), "28MAR24");

        let date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        assert_eq!(format_expiry(date), "05NOV24");
    }

    #[test]
    fn test_format_expiry_pads_day_and_truncates_year() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(format_expiry(date), "02JAN25");
    }

    #[test]
    fn test_synthesized_analytics_stay_in_range() {
        for _ in 0..100 {
            let entry = synthesize_strike(22_500.0);

            assert_eq!(entry.strike, 22_500.0);
            assert!((10_000..110_000).contains(&entry.call_oi));
            assert!((10_000..110_000).contains(&entry.put_oi));
            assert!(entry.call_ltp >= 10.0 && entry.call_ltp <= 210.0);
            assert!(entry.put_ltp >= 10.0 && entry.put_ltp <= 210.0);
            assert!((0..50_000).contains(&entry.call_volume));
            assert!((0..50_000).contains(&entry.put_volume));
        }
    }

    #[test]
    fn test_strike_entry_wire_field_names() {
        let entry = StrikeEntry {
            strike: 22_500.0,
            call_oi: 1,
            call_ltp: 2.0,
            call_volume: 3,
            put_oi: 4,
            put_ltp: 5.0,
            put_volume: 6,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("callOI").is_some());
        assert!(json.get("callLTP").is_some());
        assert!(json.get("callVolume").is_some());
        assert!(json.get("putOI").is_some());
        assert!(json.get("putLTP").is_some());
        assert!(json.get("putVolume").is_some());
    }
}
