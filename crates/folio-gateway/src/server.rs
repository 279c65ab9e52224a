// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use folio_core::FolioError;
use folio_portfolio::JsonPortfolioStore;
use folio_router::QueryRouter;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers;

/// Health state for the health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Who the service answers for, shown on the banner.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub owner: String,
    pub title: String,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<QueryRouter>,
    pub portfolio: Arc<JsonPortfolioStore>,
    pub info: ServiceInfo,
    pub health: HealthState,
}

/// Gateway server configuration.
///
/// Mirrors `[server]` from `folio-config` so the gateway does not depend on
/// the config crate.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `"*"` allows any.
    pub cors_origins: Vec<String>,
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            max_request_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Build the application router with all routes and layers.
///
/// Routes:
/// - GET / and GET /health, GET /metrics
/// - POST /api/v1/chat
/// - GET /api/v1/portfolio-data, GET /api/v1/resume and the per-section endpoints
/// - GET /api/v1/demo/{project_id}
/// - GET /api/v1/cache/stats, POST /api/v1/cache/clear
pub fn build_app(config: &ServerConfig, state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/chat", post(handlers::post_chat))
        .route("/portfolio-data", get(handlers::get_portfolio_data))
        .route("/resume", get(handlers::get_resume))
        .route("/profile", get(handlers::get_profile))
        .route("/projects", get(handlers::get_projects))
        .route("/experience", get(handlers::get_experience))
        .route("/skills", get(handlers::get_skills))
        .route("/publications", get(handlers::get_publications))
        .route("/demo/{project_id}", get(handlers::get_demo))
        .route("/cache/stats", get(handlers::get_cache_stats))
        .route("/cache/clear", post(handlers::post_cache_clear));

    Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .nest("/api/v1", api_routes)
        .layer(DefaultBodyLimit::max(config.max_request_bytes))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Start the gateway HTTP server and serve until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), FolioError> {
    let app = build_app(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FolioError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FolioError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..ServerConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }

    #[test]
    fn invalid_cors_origins_are_skipped() {
        let _layer = cors_layer(&["http://ok.example".into(), "bad\norigin".into()]);
    }
}
