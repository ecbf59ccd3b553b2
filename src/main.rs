//! Transit proxy binary.
//!
//! Serves the passenger pages and proxies org, route, stop and vehicle
//! lookups to the upstream transit API.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use transit_proxy::config::load_layered;
use transit_proxy::lifecycle::{self, signals, Shutdown};
use transit_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "transit-proxy")]
#[command(about = "Passenger pages and upstream proxy for the transit API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_layered(cli.config.as_deref(), cli.bind)?;

    logging::init_tracing(&config.observability.log_filter);
    tracing::info!("transit-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        profiles = config.profiles.len(),
        org_rules = config.org_routes.len(),
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let app = lifecycle::build(config)?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        }
    });

    let result = app.server.run(listener, server_shutdown).await;
    shutdown.finish(&app.client);
    result?;

    Ok(())
}
