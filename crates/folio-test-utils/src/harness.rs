// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end router testing.
//!
//! `TestHarness` assembles a complete query router over the bundled sample
//! portfolio with a mock model and a recording telemetry sink.

use std::sync::Arc;

use folio_config::FolioConfig;
use folio_config::model::{CacheConfig, RoutingConfig};
use folio_core::{
    FolioError, ModelClient, PortfolioStore, QueryContext, StructuredResult, TelemetrySink,
};
use folio_portfolio::{JsonPortfolioStore, PortfolioData, parse_portfolio};
use folio_router::{QueryRouter, RouterConfig};

use crate::mock_model::MockModelClient;
use crate::recording_telemetry::RecordingTelemetry;

/// The bundled sample portfolio document.
pub const SAMPLE_PORTFOLIO: &str = include_str!("../../../data/portfolio.json");

/// Parsed sample portfolio.
pub fn sample_portfolio() -> PortfolioData {
    parse_portfolio(SAMPLE_PORTFOLIO).expect("bundled sample portfolio is valid")
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    answers: Vec<String>,
    offline: bool,
    routing: RoutingConfig,
    cache: CacheConfig,
    failing_telemetry: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            answers: Vec::new(),
            offline: false,
            routing: RoutingConfig::default(),
            cache: CacheConfig::default(),
            failing_telemetry: false,
        }
    }

    /// Pre-load answer replies on the mock model.
    pub fn with_answers(mut self, answers: Vec<String>) -> Self {
        self.answers = answers;
        self
    }

    /// Build without a model client so every answer is degraded.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Use a telemetry sink that rejects every event.
    pub fn with_failing_telemetry(mut self) -> Self {
        self.failing_telemetry = true;
        self
    }

    pub fn build(self) -> Result<TestHarness, FolioError> {
        let config = FolioConfig {
            routing: self.routing,
            cache: self.cache,
            ..FolioConfig::default()
        };

        let store = Arc::new(JsonPortfolioStore::from_data(sample_portfolio()));
        let telemetry = Arc::new(if self.failing_telemetry {
            RecordingTelemetry::failing()
        } else {
            RecordingTelemetry::new()
        });
        let model = (!self.offline).then(|| Arc::new(MockModelClient::with_answers(self.answers)));

        let router = QueryRouter::new(RouterConfig::from_config(
            &config,
            store.clone() as Arc<dyn PortfolioStore>,
            telemetry.clone() as Arc<dyn TelemetrySink>,
            model.clone().map(|m| m as Arc<dyn ModelClient>),
        ))?;

        Ok(TestHarness {
            router: Arc::new(router),
            model,
            telemetry,
            store,
            config,
        })
    }
}

/// A complete router with mock collaborators.
pub struct TestHarness {
    pub router: Arc<QueryRouter>,
    /// The mock model, `None` for offline harnesses.
    pub model: Option<Arc<MockModelClient>>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub store: Arc<JsonPortfolioStore>,
    pub config: FolioConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The mock model. Panics on offline harnesses.
    pub fn mock(&self) -> &MockModelClient {
        self.model.as_deref().expect("harness was built offline")
    }

    /// Send a query through the router with no caller context.
    pub async fn ask(&self, query: &str) -> StructuredResult {
        self.router.process_query(query, None).await
    }

    /// Send a query with caller context.
    pub async fn ask_with(&self, query: &str, context: &QueryContext) -> StructuredResult {
        self.router.process_query(query, Some(context)).await
    }
}
