use {
    axum::{Router, routing::get},
    courier_config::CourierConfig,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{
    routes::{conversation_handler, greeting_handler, health_handler},
    state::AppState,
};

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(greeting_handler))
        .route("/conversation", get(conversation_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `server.bind:server.port` and serve until the process is stopped.
pub async fn start_gateway(config: CourierConfig) -> anyhow::Result<()> {
    let bind = config.server.bind.clone();
    let port = config.server.port;
    let state = AppState::new(config)?;
    let app = build_gateway_app(state);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port)).await?;
    info!(addr = %listener.local_addr()?, "courier gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
