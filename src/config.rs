//! Environment configuration
//!
//! Process-level settings only (listen address, CORS origin, environment
//! name). Everything request-scoped arrives with the request itself.

use std::env;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin. `None` means permissive (local development).
    pub cors_origin: Option<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let host = env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("GATEWAY_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("Invalid GATEWAY_PORT: {}", raw)))?,
            Err(_) => 4000,
        };
        let cors_origin = env::var("GATEWAY_CORS_ORIGIN").ok().filter(|v| !v.is_empty());
        let environment =
            env::var("GATEWAY_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            host,
            port,
            cors_origin,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
