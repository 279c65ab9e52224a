// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus telemetry for folio.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. [`MetricsTelemetry`]
//! is the router's telemetry sink; [`PrometheusExporter`] owns the installed
//! recorder and renders the text format served at `/metrics`.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use folio_core::{
    AdapterType, FolioError, HealthStatus, PluginAdapter, QueryEvent, TelemetrySink,
};

pub use recording::{
    record_cache_event, record_latency, record_query, register_metrics, set_cache_entries,
};

/// Installed Prometheus recorder.
pub struct PrometheusExporter {
    handle: PrometheusHandle,
}

impl PrometheusExporter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process. Returns an error if a
    /// recorder is already installed.
    pub fn install() -> Result<Self, FolioError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            FolioError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Wrap an existing handle, e.g. from a locally scoped recorder.
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusExporter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Telemetry
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        Ok(HealthStatus::Healthy)
    }
}

/// Telemetry sink that records events on the metrics facade.
///
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsTelemetry;

impl TelemetrySink for MetricsTelemetry {
    fn log_query(&self, event: &QueryEvent) -> Result<(), FolioError> {
        record_query(&event.handler_id, event.cached, event.errored);
        record_latency(&event.handler_id, event.latency.as_secs_f64());
        Ok(())
    }

    fn log_cache_hit(&self, _query_hash: &str) -> Result<(), FolioError> {
        record_cache_event("hit");
        Ok(())
    }

    fn log_cache_miss(&self, _query_hash: &str) -> Result<(), FolioError> {
        record_cache_event("miss");
        Ok(())
    }
}
