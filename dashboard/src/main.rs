mod chart;
mod config;
mod feed;
mod price;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use gas_core::{demo_series, setup_logger, FeeStore, Mode};

use feed::{FeedSupervisor, WsFeedOpener};
use price::{run_price_poller, CoinGeckoSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Start in simulation mode (no network subscriptions)
    #[arg(long)]
    simulation: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    // The TUI owns stdout; logs go to logs/ only.
    let _log_guard = setup_logger();

    let args = Args::parse();
    info!("Loading config from: {}", args.config);

    let cfg = match config::load_config(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            eprintln!("Failed to load config: {}", e);
            return Ok(());
        }
    };

    info!("Tracking {} chain(s)", cfg.chains.len());

    let store = Arc::new(FeeStore::new(cfg.chain_names()));
    if args.simulation {
        store.set_mode(Mode::Simulation);
    }

    let shutdown = CancellationToken::new();

    let source = CoinGeckoSource::new(&cfg.price)?;
    let poller = tokio::spawn(run_price_poller(
        source,
        store.clone(),
        Duration::from_secs(cfg.price.poll_secs),
        shutdown.clone(),
    ));

    let supervisor = FeedSupervisor::new(WsFeedOpener, cfg.chains.clone(), store.clone());
    let supervisor_task = tokio::spawn(supervisor.run(shutdown.clone()));

    let result = ui::run(store.clone(), demo_series(), shutdown.clone()).await;

    // Tear down every subscription and timer before exiting.
    shutdown.cancel();
    let _ = poller.await;
    let _ = supervisor_task.await;

    info!("Shutdown complete");
    result
}
