//! rw-router - Main entry point.
//!
//! Connects the writer and reader pools, routes one probe through each, and
//! reports which pool served it.

use clap::Parser;
use rw_router::config::Config;
use rw_router::db::PoolMonitor;
use rw_router::router::Router;
use rw_router::runtime::build_runtime;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    if config.writer_url.is_none() || config.reader_url.is_none() {
        eprintln!("Error: Both a writer and a reader datasource must be configured.");
        eprintln!();
        eprintln!("Usage: rw-router --writer-url <URL> --reader-url <URL> [--mode sync|async]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!(
            "  rw-router --writer-url postgres://primary:5432/app --reader-url postgres://replica:5432/app"
        );
        eprintln!(
            "  rw-router --mode async --writer-url mysql://primary/app --writer-username app --writer-password secret \\"
        );
        eprintln!("            --reader-url mysql://replica/app --reader-username app_ro");
        eprintln!("  rw-router --writer-url sqlite:primary.db --reader-url sqlite:replica.db");
        std::process::exit(1);
    }

    info!(mode = %config.mode, "Starting rw-router v{}", env!("CARGO_PKG_VERSION"));

    let runtime = match config.runtime_options().and_then(|opts| build_runtime(&opts)) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Runtime setup failed");
            return Err(e.into());
        }
    };
    runtime.block_on(run(config))
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let router = match Router::from_config(&config).await {
        Ok(router) => router,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let monitor = config
        .monitor_interval()
        .map(|interval| PoolMonitor::start(router.pools(), interval));

    let result = router.probe().await;

    if let Some(monitor) = monitor {
        monitor.abort();
    }
    router.close().await;

    match result {
        Ok(results) => {
            for probe in &results {
                println!("{} -> {}", probe.target, probe.pool);
            }
            info!("Shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Probe failed");
            Err(e.into())
        }
    }
}
