// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio config check|show`.
//!
//! Loading and validation already happened in `main`; invalid configuration
//! never reaches these functions.

use folio_config::FolioConfig;
use folio_core::FolioError;

const REDACTED: &str = "<redacted>";

/// Runs `folio config check`.
pub fn run_check(config: &FolioConfig) {
    println!("{}", check_report(config));
}

/// Runs `folio config show`.
pub fn run_show(config: &FolioConfig) -> Result<(), FolioError> {
    print!("{}", render_toml(config)?);
    Ok(())
}

fn check_report(config: &FolioConfig) -> String {
    let mode = if config.model.api_key.is_some() {
        "online"
    } else {
        "degraded (no model API key)"
    };
    let cache = if config.cache.enabled {
        format!(
            "{} entries, {}s ttl",
            config.cache.max_size, config.cache.ttl_secs
        )
    } else {
        "disabled".to_string()
    };
    format!(
        "config ok\n  owner:     {}\n  listen:    {}:{}\n  mode:      {mode}\n  cache:     {cache}\n  portfolio: {}",
        config.agent.owner, config.server.host, config.server.port, config.portfolio.data_file
    )
}

/// Effective configuration as TOML with the API key masked.
fn render_toml(config: &FolioConfig) -> Result<String, FolioError> {
    let mut shown = config.clone();
    if shown.model.api_key.is_some() {
        shown.model.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| FolioError::Internal(format!("failed to render config: {e}")))
}
