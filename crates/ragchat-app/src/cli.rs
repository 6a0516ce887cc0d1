//! CLI argument definitions for the ragchat binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragchat: ask questions of a retrieval-augmented answer service.
///
/// Without a subcommand, starts an interactive terminal session.
#[derive(Parser, Debug)]
#[command(name = "ragchat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// URL of the answer service's query route.
    #[arg(short = 'e', long = "endpoint", global = true)]
    pub endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Default number of sources to request per question.
    #[arg(short = 'n', long = "results", global = true)]
    pub results: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the browser chat widget.
    Widget {
        /// Interface to bind.
        #[arg(long = "host")]
        host: Option<String>,

        /// Port to bind.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > RAGCHAT_CONFIG env var > ~/.ragchat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config_path_from(std::env::var("RAGCHAT_CONFIG").ok())
    }

    fn config_path_from(&self, env: Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend endpoint.
    ///
    /// Priority: --endpoint flag > RAGCHAT_ENDPOINT env var > config file value.
    pub fn resolve_endpoint(&self, config_endpoint: &str) -> String {
        self.endpoint_from(std::env::var("RAGCHAT_ENDPOINT").ok(), config_endpoint)
    }

    fn endpoint_from(&self, env: Option<String>, config_endpoint: &str) -> String {
        if let Some(ref e) = self.endpoint {
            return e.clone();
        }
        match env {
            Some(e) if !e.trim().is_empty() => e,
            _ => config_endpoint.to_string(),
        }
    }

    /// Resolve the default result count. A zero flag is ignored.
    pub fn resolve_result_count(&self, config_count: u32) -> u32 {
        self.results.filter(|n| *n >= 1).unwrap_or(config_count)
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value. RUST_LOG, when set,
    /// overrides both at subscriber setup.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".ragchat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".ragchat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
