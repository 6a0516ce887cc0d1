//! Router setup with the widget routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use ragchat_core::config::WidgetConfig;
use ragchat_core::RagchatError;

use crate::handlers;
use crate::state::AppState;

/// Largest request body the widget accepts.
pub const BODY_LIMIT: usize = 64 * 1024;

/// Origins the widget page itself is served from. A loopback bind is also
/// reachable as `localhost`.
fn widget_origins(config: &WidgetConfig) -> Vec<HeaderValue> {
    let Ok(addr) = config.bind_addr() else {
        return Vec::new();
    };
    let mut origins = vec![format!("http://{}", addr)];
    if addr.ip().is_loopback() {
        origins.push(format!("http://localhost:{}", addr.port()));
    }
    origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect()
}

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(widget_origins(&state.config)))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/session", get(handlers::session))
        .route("/api/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address and serve the widget until the process ends.
pub async fn start_server(state: AppState) -> Result<(), RagchatError> {
    let addr = state.config.bind_addr()?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RagchatError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Widget available at http://{}/", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| RagchatError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_origins_include_both_names() {
        let origins = widget_origins(&WidgetConfig::default());
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://127.0.0.1:8080"),
                HeaderValue::from_static("http://localhost:8080"),
            ]
        );
    }

    #[test]
    fn test_other_host_single_origin() {
        let config = WidgetConfig {
            host: "192.168.1.20".to_string(),
            port: 9000,
            ..WidgetConfig::default()
        };
        assert_eq!(
            widget_origins(&config),
            vec![HeaderValue::from_static("http://192.168.1.20:9000")]
        );
    }

    #[test]
    fn test_ipv6_origins_are_bracketed() {
        let config = WidgetConfig {
            host: "::1".to_string(),
            ..WidgetConfig::default()
        };
        assert_eq!(
            widget_origins(&config),
            vec![
                HeaderValue::from_static("http://[::1]:8080"),
                HeaderValue::from_static("http://localhost:8080"),
            ]
        );

        let config = WidgetConfig {
            host: "fe80::20".to_string(),
            port: 9000,
            ..WidgetConfig::default()
        };
        assert_eq!(
            widget_origins(&config),
            vec![HeaderValue::from_static("http://[fe80::20]:9000")]
        );
    }

    #[test]
    fn test_localhost_host_maps_to_loopback() {
        let config = WidgetConfig {
            host: "localhost".to_string(),
            ..WidgetConfig::default()
        };
        assert_eq!(
            widget_origins(&config),
            vec![
                HeaderValue::from_static("http://127.0.0.1:8080"),
                HeaderValue::from_static("http://localhost:8080"),
            ]
        );
    }
}
