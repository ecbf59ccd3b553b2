//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Initialize subsystems in dependency order: client, routing, dispatcher, server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The caller owns the upstream client and releases it after the server stops

use std::sync::Arc;

use thiserror::Error;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, ProxyConfig};
use crate::http::{AppState, HttpServer};
use crate::proxy::Dispatcher;
use crate::render::{PageRenderer, ShellRenderer};
use crate::routing::{RoutingError, UpstreamRouter};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

/// A wired application, ready to serve.
pub struct App {
    pub server: HttpServer,
    pub client: Arc<UpstreamClient>,
}

/// Build the application with the built-in page renderer.
pub fn build(config: ProxyConfig) -> Result<App, StartupError> {
    let renderer = Arc::new(ShellRenderer::new(&config.pages));
    build_with_renderer(config, renderer)
}

/// Build the application with a custom page renderer.
pub fn build_with_renderer(
    config: ProxyConfig,
    renderer: Arc<dyn PageRenderer>,
) -> Result<App, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let client = Arc::new(UpstreamClient::new(&config.upstream)?);
    let router = UpstreamRouter::from_config(&config)?;
    let dispatcher = Arc::new(Dispatcher::new(client.clone(), router));

    let server = HttpServer::new(
        config,
        AppState {
            dispatcher,
            renderer,
        },
    );

    Ok(App { server, client })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = ProxyConfig::default();
        config.routing.default_profile = "nowhere".into();

        let err = build(config).err().unwrap();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_build_default_config() {
        let app = build(ProxyConfig::default()).unwrap();
        assert!(!app.client.is_closed());
        assert_eq!(app.server.config().listener.bind_address, "0.0.0.0:8080");
    }
}
