/// API server for sigwall.
///
/// A thin routing layer over the dispatcher. The server:
/// - Accepts key-generation requests and always answers with a usable result
/// - Lists the device catalog and cost estimates
/// - Reports health and service status
///
/// Private keys never leave the engine through this surface.
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Remote dispatch with local fallback.
    pub dispatcher: Dispatcher,
}

/// Build the Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health_routes())
        .merge(routes::generate_routes())
        .merge(routes::device_routes())
        .with_state(Arc::new(state))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the API server.
pub async fn serve(state: AppState, addr: &str) -> crate::error::Result<()> {
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(crate::error::SigwallError::Io)?;

    tracing::info!("sigwall API server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(crate::error::SigwallError::Io)?;

    Ok(())
}
