//! HTTP surface
//!
//! Router construction, endpoint handlers, request/response types and
//! the inbound rate limiter.

pub mod handlers;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::{build_router, serve};
