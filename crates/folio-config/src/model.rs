// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the folio backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level folio configuration.
///
/// Every section is optional and defaults to values suitable for local
/// development against the bundled sample portfolio.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// Portfolio owner identity and log level.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Query routing thresholds and timeouts.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Response cache sizing.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Portfolio data source.
    #[serde(default)]
    pub portfolio: PortfolioConfig,

    /// Metrics export.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Identity of the person the portfolio describes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Name used in system prompts and the service banner.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Professional title shown alongside the owner name.
    #[serde(default = "default_title")]
    pub title: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            title: default_title(),
            log_level: default_log_level(),
        }
    }
}

fn default_owner() -> String {
    "Portfolio Owner".to_string()
}

fn default_title() -> String {
    "AI/ML Engineer".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by the CORS layer.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Upper bound on request body size in bytes.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

fn default_max_request_bytes() -> usize {
    10 * 1024 * 1024
}

/// Remote language model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// API key. `None` runs the service in degraded mode.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature for handler answers.
    #[serde(default = "default_answer_temperature")]
    pub answer_temperature: f32,

    /// Sampling temperature for routing verification calls.
    #[serde(default = "default_routing_temperature")]
    pub routing_temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Retries on transient HTTP statuses.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            answer_temperature: default_answer_temperature(),
            routing_temperature: default_routing_temperature(),
            max_output_tokens: default_max_output_tokens(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_answer_temperature() -> f32 {
    0.3
}

fn default_routing_temperature() -> f32 {
    0.1
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_max_retries() -> u32 {
    1
}

/// Classification and verification settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Ask the model to confirm low-confidence keyword classifications.
    #[serde(default = "default_true")]
    pub verify_with_model: bool,

    /// Confidence above which verification is skipped.
    #[serde(default = "default_fast_path_threshold")]
    pub fast_path_threshold: f64,

    /// Confidence above which the keyword result is only confirmed.
    #[serde(default = "default_confirm_threshold")]
    pub confirm_threshold: f64,

    /// Longest accepted query, in characters.
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,

    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,

    #[serde(default = "default_handler_timeout_secs")]
    pub handler_timeout_secs: u64,
}

impl RoutingConfig {
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            verify_with_model: true,
            fast_path_threshold: default_fast_path_threshold(),
            confirm_threshold: default_confirm_threshold(),
            max_query_chars: default_max_query_chars(),
            verify_timeout_secs: default_verify_timeout_secs(),
            handler_timeout_secs: default_handler_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fast_path_threshold() -> f64 {
    0.8
}

fn default_confirm_threshold() -> f64 {
    0.5
}

fn default_max_query_chars() -> usize {
    10_000
}

fn default_verify_timeout_secs() -> u64 {
    15
}

fn default_handler_timeout_secs() -> u64 {
    30
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum live entries before the oldest is evicted.
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,

    /// Entry lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: default_cache_max_size(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_max_size() -> usize {
    100
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

/// Portfolio data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Path to the portfolio JSON document.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

fn default_data_file() -> String {
    "data/portfolio.json".to_string()
}

/// Metrics export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub prometheus: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { prometheus: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = FolioConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.model, "gemini-2.0-flash");
        assert!(config.model.api_key.is_none());
        assert_eq!(config.routing.fast_path_threshold, 0.8);
        assert_eq!(config.routing.confirm_threshold, 0.5);
        assert_eq!(config.routing.verify_timeout(), Duration::from_secs(15));
        assert_eq!(config.routing.handler_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.max_size, 100);
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.server.max_request_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn defaults_serialize_to_toml() {
        let rendered = toml::to_string(&FolioConfig::default()).unwrap();
        assert!(rendered.contains("[routing]"));
        assert!(rendered.contains("data_file = \"data/portfolio.json\""));
    }
}
