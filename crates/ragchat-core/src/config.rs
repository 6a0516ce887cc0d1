use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RagchatError, Result};

/// Where a locally run answer service listens by default.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/query";

/// Number of source snippets requested when the user does not say otherwise.
pub const DEFAULT_RESULT_COUNT: u32 = 3;

/// Top-level configuration for ragchat.
///
/// Loaded from `~/.ragchat/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

impl RagchatConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RagchatConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check the values that cannot be repaired by falling back to a default.
    pub fn validate(&self) -> Result<()> {
        self.backend.endpoint_url()?;
        if self.backend.result_count == 0 {
            return Err(RagchatError::Config(
                "backend.result_count must be at least 1".to_string(),
            ));
        }
        if self.widget.port == 0 {
            return Err(RagchatError::Config(
                "widget.port must not be 0".to_string(),
            ));
        }
        self.widget.bind_addr()?;
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Where and how to reach the answer service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Full URL of the query route (POST target).
    pub endpoint: String,
    /// Default number of source snippets to request.
    pub result_count: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            result_count: DEFAULT_RESULT_COUNT,
        }
    }
}

impl BackendConfig {
    /// Parse the configured endpoint, accepting only absolute http(s) URLs.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            RagchatError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(RagchatError::Config(format!(
                "unsupported endpoint scheme '{}', expected http or https",
                other
            ))),
        }
    }
}

/// Terminal session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Prompt printed before every line of input.
    pub prompt: String,
    /// Status shown next to the spinner while a query is in flight.
    pub status_text: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            status_text: "Thinking...".to_string(),
        }
    }
}

/// Browser widget server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Interface the widget server binds to.
    pub host: String,
    /// Port the widget server binds to.
    pub port: u16,
    /// Status shown under the form while a query is in flight.
    pub status_text: String,
    /// Assistant entry shown once when the widget starts.
    pub welcome: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            status_text: "Thinking...".to_string(),
            welcome: "Hi! Ask me anything. Type your question below and press Enter."
                .to_string(),
        }
    }
}

impl WidgetConfig {
    /// Socket address to bind. `host` must be an IP literal or `localhost`.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host.parse::<IpAddr>().map_err(|e| {
                RagchatError::Config(format!("invalid widget.host '{}': {}", self.host, e))
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}
