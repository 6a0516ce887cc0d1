//! ragchat binary - composition root.
//!
//! 1. Parse the command line
//! 2. Load configuration from TOML and apply overrides
//! 3. Initialize tracing on stderr
//! 4. Build one chat session against the configured backend
//! 5. Run it through the terminal or serve it through the browser widget

mod cli;

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use ragchat_chat::{ChatSession, HttpDispatcher, QueryBuilder, ResponseRenderer, SnippetStyle};
use ragchat_core::{RagchatConfig, RagchatError};
use ragchat_terminal::{Banner, TerminalOptions};
use ragchat_widget::AppState;

use cli::{CliArgs, Command};

/// Read the config file without logging, so the outcome can be reported once
/// tracing is up. A missing file is not an error.
fn read_config(path: &Path) -> (RagchatConfig, Option<RagchatError>) {
    if !path.exists() {
        return (RagchatConfig::default(), None);
    }
    match RagchatConfig::load(path) {
        Ok(config) => (config, None),
        Err(e) => (RagchatConfig::default(), Some(e)),
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// One session against the configured backend.
fn build_session(
    config: &RagchatConfig,
    style: SnippetStyle,
    status_text: &str,
) -> Result<ChatSession, RagchatError> {
    let endpoint = config.backend.endpoint_url()?;
    tracing::info!(endpoint = %endpoint, "Backend endpoint");
    let dispatcher = HttpDispatcher::new(endpoint);
    Ok(ChatSession::new(
        Arc::new(dispatcher),
        QueryBuilder::new(config.backend.result_count),
        ResponseRenderer::new(style),
    )
    .with_status_text(status_text))
}

async fn run_terminal(config: &RagchatConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = build_session(config, SnippetStyle::COMPACT, &config.terminal.status_text)?;

    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let spinner = std::io::stderr().is_terminal();

    Banner {
        version: env!("CARGO_PKG_VERSION"),
        endpoint: &config.backend.endpoint,
        result_count: config.backend.result_count,
    }
    .write_to(&mut std::io::stdout(), color)?;

    let options = TerminalOptions::from_config(&config.terminal, config.backend.result_count)
        .with_color(color)
        .with_spinner(spinner);
    let mut surface = ragchat_terminal::stdio(options);

    let exchanges = session.run(&mut surface).await?;
    tracing::info!(exchanges, "Terminal session closed");
    Ok(())
}

async fn run_widget(config: &RagchatConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = build_session(config, SnippetStyle::RICH, &config.widget.status_text)?;
    let state = AppState::new(session, config.widget.clone());

    let addr = config.widget.bind_addr()?;
    println!("Serving the ragchat widget at http://{}/", addr);
    ragchat_widget::start_server(state).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = read_config(&config_file);

    // Tracing.
    init_tracing(&args.resolve_log_level(&config.general.log_level));
    tracing::info!("Starting ragchat v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config. Using defaults."
        ),
        None => tracing::debug!(path = %config_file.display(), "Configuration resolved"),
    }

    // Overrides.
    config.backend.endpoint = args.resolve_endpoint(&config.backend.endpoint);
    config.backend.result_count = args.resolve_result_count(config.backend.result_count);
    if let Some(Command::Widget { host, port }) = &args.command {
        if let Some(host) = host {
            config.widget.host = host.clone();
        }
        if let Some(port) = port {
            config.widget.port = *port;
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    match args.command {
        None => run_terminal(&config).await,
        Some(Command::Widget { .. }) => run_widget(&config).await,
    }
}
