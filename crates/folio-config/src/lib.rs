// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the folio portfolio backend.
//!
//! TOML files are layered with Figment, overridden by `FOLIO_*` environment
//! variables, rejected on unknown keys, and validated after deserialization.
//! Failures come back as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use folio_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("serving portfolio of {}", config.agent.owner);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::FolioConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<FolioConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<FolioConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<FolioConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read the config files that exist so diagnostics can point into them.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from(loader::SYSTEM_CONFIG_PATH)];
    candidates.extend(loader::user_config_path());
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into()),
    );

    candidates
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            tracing::debug!(path = %path.display(), "read config source");
            Some((path.display().to_string(), content))
        })
        .collect()
}
