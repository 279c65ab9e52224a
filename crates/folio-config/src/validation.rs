// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express. Every violation is collected
//! so a single run reports them all.

use crate::diagnostic::ConfigError;
use crate::model::FolioConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &FolioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.agent.log_level.to_lowercase();
    if !VALID_LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            VALID_LOG_LEVELS.join(", ")
        )));
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::validation("server.port must not be 0"));
    }

    if config.server.max_request_bytes == 0 {
        errors.push(ConfigError::validation(
            "server.max_request_bytes must be greater than 0",
        ));
    }

    let routing = &config.routing;
    if !(routing.confirm_threshold > 0.0
        && routing.confirm_threshold <= routing.fast_path_threshold
        && routing.fast_path_threshold <= 1.0)
    {
        errors.push(ConfigError::validation(format!(
            "routing thresholds must satisfy 0 < confirm_threshold ({}) <= fast_path_threshold ({}) <= 1",
            routing.confirm_threshold, routing.fast_path_threshold
        )));
    }

    if routing.max_query_chars == 0 {
        errors.push(ConfigError::validation(
            "routing.max_query_chars must be greater than 0",
        ));
    }

    if routing.verify_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "routing.verify_timeout_secs must be greater than 0",
        ));
    }

    if routing.handler_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "routing.handler_timeout_secs must be greater than 0",
        ));
    }

    if config.cache.enabled && config.cache.max_size == 0 {
        errors.push(ConfigError::validation(
            "cache.max_size must be greater than 0 when the cache is enabled",
        ));
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "cache.ttl_secs must be greater than 0",
        ));
    }

    for (name, value) in [
        ("model.answer_temperature", config.model.answer_temperature),
        ("model.routing_temperature", config.model.routing_temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            errors.push(ConfigError::validation(format!(
                "{name} must be within [0, 2], got {value}"
            )));
        }
    }

    if config.model.model.trim().is_empty() {
        errors.push(ConfigError::validation("model.model must not be empty"));
    }

    if config.portfolio.data_file.trim().is_empty() {
        errors.push(ConfigError::validation(
            "portfolio.data_file must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &FolioConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&FolioConfig::default()).is_ok());
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let mut config = FolioConfig::default();
        config.routing.confirm_threshold = 0.9;
        config.routing.fast_path_threshold = 0.6;
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("routing thresholds"));
    }

    #[test]
    fn zero_confirm_threshold_rejected() {
        let mut config = FolioConfig::default();
        config.routing.confirm_threshold = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn disabled_cache_may_have_zero_size() {
        let mut config = FolioConfig::default();
        config.cache.enabled = false;
        config.cache.max_size = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let mut config = FolioConfig::default();
        config.server.port = 0;
        config.server.host = String::new();
        config.cache.ttl_secs = 0;
        config.model.answer_temperature = 3.5;
        config.portfolio.data_file = " ".into();
        assert_eq!(messages(&config).len(), 5);
    }

    #[test]
    fn unknown_log_level_rejected() {
        let mut config = FolioConfig::default();
        config.agent.log_level = "verbose".into();
        assert!(messages(&config)[0].contains("agent.log_level"));
    }
}
