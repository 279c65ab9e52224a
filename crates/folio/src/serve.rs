// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio serve` command implementation.
//!
//! Loads the portfolio, creates the model client (if a credential is
//! configured) and the telemetry sink, assembles the query router and
//! hands everything to the HTTP gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use folio_config::FolioConfig;
use folio_core::{
    FolioError, HealthStatus, ModelClient, NoopTelemetry, PluginAdapter, TelemetrySink,
};
use folio_gateway::{AppState, HealthState, ServerConfig, ServiceInfo};
use folio_portfolio::JsonPortfolioStore;
use folio_router::{QueryRouter, RouterConfig};
use tracing::{info, warn};

#[cfg(feature = "gemini")]
use folio_gemini::GeminiProvider;

#[cfg(feature = "prometheus")]
use folio_prometheus::{MetricsTelemetry, PrometheusExporter};

/// Render function handed to the gateway's `/metrics` endpoint.
type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// The long-lived pieces shared by every command that answers queries.
pub(crate) struct Components {
    pub router: Arc<QueryRouter>,
    pub store: Arc<JsonPortfolioStore>,
}

/// Runs the `folio serve` command until Ctrl-C.
pub async fn run_serve(config: FolioConfig) -> Result<(), FolioError> {
    crate::init_tracing(&config.agent.log_level);

    info!(owner = %config.agent.owner, "starting folio serve");

    let model = model_client(&config).await?;
    let (telemetry, prometheus_render) = telemetry(&config)?;
    let components = build_components(&config, telemetry, model)?;
    log_adapter_health(components.store.as_ref()).await;

    let prometheus_render = prometheus_render.map(|render| {
        with_cache_gauge(render, components.router.clone())
    });

    let state = AppState {
        router: components.router,
        portfolio: components.store,
        info: ServiceInfo {
            owner: config.agent.owner.clone(),
            title: config.agent.title.clone(),
        },
        health: HealthState {
            start_time: Instant::now(),
            prometheus_render,
        },
    };

    folio_gateway::start_server(&server_config(&config), state).await?;

    info!("folio serve stopped");
    Ok(())
}

/// Load the portfolio and assemble the router around it.
pub(crate) fn build_components(
    config: &FolioConfig,
    telemetry: Arc<dyn TelemetrySink>,
    model: Option<Arc<dyn ModelClient>>,
) -> Result<Components, FolioError> {
    let store = Arc::new(JsonPortfolioStore::open(PathBuf::from(
        &config.portfolio.data_file,
    ))?);
    let router_config = RouterConfig::from_config(config, store.clone(), telemetry, model);
    let router = Arc::new(QueryRouter::new(router_config)?);
    Ok(Components { router, store })
}

/// The configured model client, or `None` for degraded mode.
#[cfg(feature = "gemini")]
pub(crate) async fn model_client(
    config: &FolioConfig,
) -> Result<Option<Arc<dyn ModelClient>>, FolioError> {
    match GeminiProvider::from_config(config)? {
        Some(provider) => {
            log_adapter_health(&provider).await;
            let client: Arc<dyn ModelClient> = Arc::new(provider);
            Ok(Some(client))
        }
        None => Ok(None),
    }
}

#[cfg(not(feature = "gemini"))]
pub(crate) async fn model_client(
    _config: &FolioConfig,
) -> Result<Option<Arc<dyn ModelClient>>, FolioError> {
    warn!("built without a model provider");
    Ok(None)
}

/// Telemetry sink plus the Prometheus render function when the exporter is on.
#[cfg(feature = "prometheus")]
fn telemetry(
    config: &FolioConfig,
) -> Result<(Arc<dyn TelemetrySink>, Option<MetricsRender>), FolioError> {
    if !config.telemetry.prometheus {
        info!("prometheus exporter disabled");
        return Ok((Arc::new(NoopTelemetry), None));
    }
    let exporter = PrometheusExporter::install()?;
    let render: MetricsRender = Arc::new(move || exporter.render());
    Ok((Arc::new(MetricsTelemetry), Some(render)))
}

#[cfg(not(feature = "prometheus"))]
fn telemetry(
    config: &FolioConfig,
) -> Result<(Arc<dyn TelemetrySink>, Option<MetricsRender>), FolioError> {
    if config.telemetry.prometheus {
        warn!("telemetry.prometheus is set but folio was built without prometheus support");
    }
    Ok((Arc::new(NoopTelemetry), None))
}

/// Refresh the cache-size gauge before each render.
fn with_cache_gauge(render: MetricsRender, router: Arc<QueryRouter>) -> MetricsRender {
    Arc::new(move || {
        refresh_cache_gauge(&router);
        render()
    })
}

#[cfg(feature = "prometheus")]
fn refresh_cache_gauge(router: &QueryRouter) {
    if let Some(cache) = router.cache() {
        folio_prometheus::set_cache_entries(cache.len());
    }
}

#[cfg(not(feature = "prometheus"))]
fn refresh_cache_gauge(_router: &QueryRouter) {}

async fn log_adapter_health(adapter: &dyn PluginAdapter) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => info!(
            adapter = adapter.name(),
            version = %adapter.version(),
            kind = %adapter.adapter_type(),
            "adapter ready"
        ),
        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), reason = %reason, "adapter not healthy")
        }
        Err(e) => warn!(adapter = adapter.name(), error = %e, "adapter health check failed"),
    }
}

fn server_config(config: &FolioConfig) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_origins: config.server.cors_origins.clone(),
        max_request_bytes: config.server.max_request_bytes,
    }
}

/// Default configuration pointed at the bundled sample portfolio.
#[cfg(test)]
pub(crate) fn offline_config() -> FolioConfig {
    let mut config = FolioConfig::default();
    config.portfolio.data_file =
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/portfolio.json").to_string();
    config
}
