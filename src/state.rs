//! Application state management

use std::sync::Arc;

use crate::brokers::Broker;
use crate::config::Config;
use crate::sessions::SessionStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    /// Per-client broker session tokens
    pub sessions: Arc<dyn SessionStore>,

    /// Upstream broker adapter
    pub broker: Arc<dyn Broker>,
}

impl AppState {
    pub fn new(config: Config, sessions: Arc<dyn SessionStore>, broker: Arc<dyn Broker>) -> Self {
        Self {
            config,
            sessions,
            broker,
        }
    }
}
