//! Gateway binary entry point

use std::sync::Arc;

use angel_gateway::api;
use angel_gateway::brokers::angel::AngelBroker;
use angel_gateway::config::Config;
use angel_gateway::sessions::InMemorySessionStore;
use angel_gateway::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "angel_gateway=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    let broker = AngelBroker::new().expect("Failed to create broker client");

    let state = AppState::new(
        config,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(broker),
    );

    if let Err(e) = api::serve(state).await {
        tracing::error!("Gateway exited with error: {}", e);
        std::process::exit(1);
    }
}
