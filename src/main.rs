//! My Things - voice skill webhook
//!
//! Maps spoken intents to device-shadow reads and writes and answers with
//! speech, a reprompt and a display card.

mod api;
mod config;
mod shadow;
mod skill;

use api::{create_router, AppState};
use config::Config;
use shadow::{HttpShadowClient, LoggingShadowClient, ShadowClient};
use skill::Skill;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "my_things=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    tracing::info!(
        skill = %config.skill.skill_name,
        devices = ?config.skill.devices.names().collect::<Vec<_>>(),
        endpoint = %config.shadow.endpoint,
        timeout_secs = config.shadow.timeout.as_secs(),
        "Configuration loaded"
    );

    // Shadow service client
    let http: Arc<dyn ShadowClient> = Arc::new(HttpShadowClient::new(&config.shadow)?);
    let shadow: Arc<dyn ShadowClient> = Arc::new(LoggingShadowClient::new(http));

    // Create application state
    let skill = Skill::new(Arc::new(config.skill), shadow);
    let state = AppState::new(skill);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("My Things skill listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
