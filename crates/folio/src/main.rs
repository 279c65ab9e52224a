// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folio - portfolio assistant backend.
//!
//! This is the binary entry point and composition root.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod query;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_config::FolioConfig;

/// Folio - portfolio assistant backend.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Answer one query and print the structured result as JSON.
    Chat {
        /// The question to ask.
        message: String,
        /// Caller context as a JSON object, e.g. '{"session_id":"cli"}'.
        #[arg(long)]
        context: Option<String>,
    },
    /// Show the keyword classification for a message.
    Classify {
        message: String,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate configuration and report problems.
    Check,
    /// Print the effective configuration as TOML (secrets redacted).
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            folio_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Chat { message, context }) => {
            query::run_chat(config, &message, context.as_deref()).await
        }
        Some(Commands::Classify { message }) => {
            query::run_classify(&message);
            Ok(())
        }
        Some(Commands::Config { action }) => match action {
            ConfigCommands::Check => {
                config::run_check(&config);
                Ok(())
            }
            ConfigCommands::Show => config::run_show(&config),
        },
        None => {
            println!("folio: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<FolioConfig, Vec<folio_config::ConfigError>> {
    match path {
        Some(path) => folio_config::load_and_validate_path(path),
        None => folio_config::load_and_validate(),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chat_accepts_context_flag() {
        let cli = Cli::parse_from([
            "folio",
            "chat",
            "what projects have you built?",
            "--context",
            r#"{"session_id":"cli"}"#,
        ]);
        match cli.command {
            Some(Commands::Chat { message, context }) => {
                assert_eq!(message, "what projects have you built?");
                assert_eq!(context.as_deref(), Some(r#"{"session_id":"cli"}"#));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_path_is_global() {
        let cli = Cli::parse_from(["folio", "config", "show", "--config", "folio.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("folio.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Show
            })
        ));
    }

    #[test]
    #[serial_test::serial]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[agent]\nowner = \"Avery Chen\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.agent.owner, "Avery Chen");
    }

    #[test]
    #[serial_test::serial]
    fn environment_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[agent]\nowner = \"Avery Chen\"\n").unwrap();

        // SAFETY: serialized with every other test that reads the environment.
        unsafe { std::env::set_var("FOLIO_AGENT_OWNER", "Jordan Lee") };
        let config = load_config(Some(&path));
        unsafe { std::env::remove_var("FOLIO_AGENT_OWNER") };

        assert_eq!(config.unwrap().agent.owner, "Jordan Lee");
    }
}
