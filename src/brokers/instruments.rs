//! Static index symbol to instrument token mapping
//!
//! Angel One identifies instruments by numeric tokens. The gateway only
//! serves the index underlyings below; new instruments are added here as
//! match arms, not as new code paths.

/// Instrument token used when a symbol is not in the table.
pub const NIFTY_TOKEN: &str = "99926000";

/// Resolve an index symbol to its Angel One instrument token.
/// Unknown symbols fall back to the NIFTY token.
pub fn instrument_token(symbol: &str) -> &'static str {
    match symbol.to_uppercase().as_str() {
        "NIFTY" => NIFTY_TOKEN,
        "BANKNIFTY" => "99926009",
        "FINNIFTY" => "99926037",
        _ => NIFTY_TOKEN,
    }
}

/// Exchange used when the caller does not name one.
pub const DEFAULT_EXCHANGE: &str = "NSE";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols() {
        assert_eq!(instrument_token("NIFTY"), "99926000");
        assert_eq!(instrument_token("BANKNIFTY"), "99926009");
        assert_eq!(instrument_token("FINNIFTY"), "99926037");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(instrument_token("banknifty"), "99926009");
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_nifty() {
        assert_eq!(instrument_token("MIDCPNIFTY"), NIFTY_TOKEN);
        assert_eq!(instrument_token(""), NIFTY_TOKEN);
    }
}
