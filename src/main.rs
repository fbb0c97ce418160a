// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym-Tracker API Server
//!
//! Serves attendance, training types, calendar grids and statistics to the
//! web frontend.

use gym_tracker::{config::Config, db::BackendSelector, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Gym-Tracker API");

    // Pick the storage backend once; it does not change while running
    let backend = BackendSelector::resolve(&config).await?;
    tracing::info!(
        backend = %backend.mode(),
        using_fallback = backend.is_using_fallback(),
        "Storage ready"
    );

    let state = Arc::new(AppState::new(config.clone(), backend));

    // Build router
    let app = gym_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["gym_tracker=debug", "info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry().with(filter).with(format).init();
}
