//! Services Layer
//!
//! Business logic between the HTTP handlers and the broker adapter.
//! Handlers validate and translate; services own the broker calls and
//! the session store reads/writes.
//!
//! # Services
//!
//! - `AuthService` - Login, token refresh, logout
//! - `QuotesService` - Last traded price lookup
//! - `OptionsService` - Strike ladder, expiry encoding, demo chain data

pub mod auth_service;
pub mod options_service;
pub mod quotes_service;

pub use auth_service::{AuthService, AuthTokens};
pub use options_service::{OptionChainData, OptionsService, StrikeEntry};
pub use quotes_service::QuotesService;
