//! Angel One Gateway
//!
//! A thin HTTP gateway that forwards trading requests (authentication,
//! price lookup, options chain, token refresh, logout) to the Angel One
//! SmartAPI and keeps an in-memory table of per-client session tokens.

pub mod api;
pub mod brokers;
pub mod config;
pub mod error;
pub mod services;
pub mod sessions;
pub mod state;
