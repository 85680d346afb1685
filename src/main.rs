//! Static Route Service Broker
//!
//! Composition root: config source → catalog preparation → broker → HTTP.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use route_service_broker::config::{BrokerConfig, CloudFoundrySource};
use route_service_broker::lifecycle::{self, signals, startup, Shutdown, StartupError};
use route_service_broker::observability::{logging, metrics};
use route_service_broker::{HttpServer, ServiceBroker};

#[derive(Parser)]
#[command(name = "route-service-broker")]
#[command(about = "Service broker exposing a static catalog of route services", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to VCAP_SERVICES, then ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log configuration loading at debug level
    #[arg(long)]
    debug_init: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = logging::with_bootstrap(cli.debug_init, || -> Result<_, StartupError> {
        let source = lifecycle::select_source(
            cli.config,
            std::env::var(CloudFoundrySource::ENV_VAR).ok(),
            Path::new(startup::DEFAULT_CONFIG_FILE),
        )?;
        lifecycle::load_config(source.as_ref(), |name| std::env::var(name).ok())
    });

    // No global subscriber exists yet, so configuration errors go to stderr.
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("route-service-broker: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.observability.log_level, config.observability.log_format) {
        eprintln!("route-service-broker: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "route-service-broker stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: BrokerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "route-service-broker starting");

    let broker: Arc<dyn ServiceBroker> = Arc::new(lifecycle::build_broker(&config)?);

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_socket_addr()?)?;
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(broker, &config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_shutdown().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
