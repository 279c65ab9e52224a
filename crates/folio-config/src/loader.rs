// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/folio/folio.toml`, `~/.config/folio/folio.toml`, `./folio.toml`,
//! then `FOLIO_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FolioConfig;

/// System-wide configuration path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/folio/folio.toml";

/// Local configuration file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "folio.toml";

/// Credential variable honoured when `model.api_key` is unset.
pub const FALLBACK_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Config sections recognised in `FOLIO_<SECTION>_<KEY>` variable names.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "server",
    "model",
    "routing",
    "cache",
    "portfolio",
    "telemetry",
];

/// Path of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("folio").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<FolioConfig, figment::Error> {
    let config: FolioConfig = build_figment().extract()?;
    Ok(apply_credential_fallback(
        config,
        std::env::var(FALLBACK_API_KEY_VAR).ok(),
    ))
}

/// Load configuration from a TOML string over the defaults only.
///
/// No files and no environment variables are consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<FolioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FolioConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FolioConfig, figment::Error> {
    let config: FolioConfig = Figment::new()
        .merge(Serialized::defaults(FolioConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?;
    Ok(apply_credential_fallback(
        config,
        std::env::var(FALLBACK_API_KEY_VAR).ok(),
    ))
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FolioConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Fill in `model.api_key` from the fallback credential when unset.
///
/// Blank values on either side count as absent.
pub fn apply_credential_fallback(mut config: FolioConfig, fallback: Option<String>) -> FolioConfig {
    let configured = config
        .model
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !configured {
        config.model.api_key = fallback.filter(|k| !k.trim().is_empty());
    }
    config
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `model_api_key` maps to `model.api_key` and not `model.api.key`.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("FOLIO_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("model_api_key"), "model.api_key");
        assert_eq!(map_env_key("routing_fast_path_threshold"), "routing.fast_path_threshold");
        assert_eq!(map_env_key("cache_ttl_secs"), "cache.ttl_secs");
        assert_eq!(map_env_key("portfolio_data_file"), "portfolio.data_file");
    }

    #[test]
    fn unknown_section_passes_through() {
        assert_eq!(map_env_key("bogus_key"), "bogus_key");
    }

    #[test]
    fn fallback_fills_missing_key() {
        let config = apply_credential_fallback(FolioConfig::default(), Some("g-key".into()));
        assert_eq!(config.model.api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn fallback_never_overrides_configured_key() {
        let mut config = FolioConfig::default();
        config.model.api_key = Some("configured".into());
        let config = apply_credential_fallback(config, Some("g-key".into()));
        assert_eq!(config.model.api_key.as_deref(), Some("configured"));
    }

    #[test]
    fn blank_fallback_stays_unconfigured() {
        let config = apply_credential_fallback(FolioConfig::default(), Some("  ".into()));
        assert!(config.model.api_key.is_none());
    }
}
