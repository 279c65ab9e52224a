// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the folio configuration system.

use folio_config::diagnostic::{ConfigError, suggest_key};
use folio_config::model::FolioConfig;
use folio_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[agent]
owner = "Ada Lovelace"
title = "Analytical Engineer"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9000
cors_origins = ["https://ada.dev"]

[model]
api_key = "g-123"
model = "gemini-1.5-pro"
answer_temperature = 0.5

[routing]
verify_with_model = false
fast_path_threshold = 0.9
confirm_threshold = 0.4

[cache]
max_size = 10
ttl_secs = 60

[portfolio]
data_file = "/srv/portfolio.json"

[telemetry]
prometheus = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.owner, "Ada Lovelace");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.cors_origins, vec!["https://ada.dev"]);
    assert_eq!(config.model.api_key.as_deref(), Some("g-123"));
    assert_eq!(config.model.answer_temperature, 0.5);
    assert!(!config.routing.verify_with_model);
    assert_eq!(config.routing.fast_path_threshold, 0.9);
    assert_eq!(config.cache.max_size, 10);
    assert_eq!(config.portfolio.data_file, "/srv/portfolio.json");
    assert!(!config.telemetry.prometheus);
    // Unspecified keys in a present section keep their defaults.
    assert_eq!(config.routing.max_query_chars, 10_000);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.agent.owner, "Portfolio Owner");
    assert_eq!(config.server.host, "127.0.0.1");
    assert!(config.model.api_key.is_none());
    assert!(config.cache.enabled);
    assert!(config.telemetry.prometheus);
}

#[test]
fn unknown_field_in_section_rejected() {
    let err = load_config_from_str("[cache]\nmax_sise = 5\n").expect_err("should reject");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_sise"),
        "error should mention the bad key, got: {err_str}"
    );
}

#[test]
fn unknown_top_level_section_rejected() {
    assert!(load_config_from_str("[telegram]\nbot_token = \"x\"\n").is_err());
}

#[test]
fn dotted_override_sets_nested_key() {
    use figment::{Figment, providers::Serialized};

    let config: FolioConfig = Figment::new()
        .merge(Serialized::defaults(FolioConfig::default()))
        .merge(("model.api_key", "from-env"))
        .merge(("routing.verify_timeout_secs", 5))
        .extract()
        .expect("should merge dotted overrides");

    assert_eq!(config.model.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.routing.verify_timeout_secs, 5);
}

#[test]
fn diagnostic_suggests_similar_key() {
    let errors = load_and_validate_str("[routing]\nfast_path_treshold = 0.9\n")
        .expect_err("should fail");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "fast_path_treshold");
            assert_eq!(suggestion.as_deref(), Some("fast_path_threshold"));
            assert!(valid_keys.contains("confirm_threshold"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn diagnostic_invalid_type() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").expect_err("should fail");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("port")),
        "got {:?}",
        errors[0]
    );
}

#[test]
fn suggest_key_prefers_closest() {
    let valid = &["max_size", "ttl_secs", "enabled"];
    assert_eq!(suggest_key("max_siz", valid), Some("max_size".to_string()));
}

#[test]
fn config_error_renders_with_miette() {
    let errors = load_and_validate_str("[model]\nmodle = \"x\"\n").expect_err("should fail");
    let handler = miette::GraphicalReportHandler::new();
    let mut out = String::new();
    handler
        .render_report(&mut out, &errors[0])
        .expect("should render");
    assert!(out.contains("modle"));
}

#[test]
fn validation_runs_after_parse() {
    let errors = load_and_validate_str("[server]\nport = 0\n[cache]\nttl_secs = 0\n")
        .expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn load_from_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.toml");
    std::fs::write(&path, "[agent]\nowner = \"File Owner\"\n").unwrap();

    let config = load_and_validate_path(&path).expect("file should load");
    assert_eq!(config.agent.owner, "File Owner");
}
