//! Binary entry point: loads config, starts the node, the two recurring
//! schedulers, and the HTTP server; shuts down cleanly on Ctrl+C.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;

use xyj_node::config::Cli;
use xyj_node::network::scheduler::{MiningScheduler, NeighborScheduler};
use xyj_node::node::Node;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.into_node_config()?;

    log::info!(
        "starting node: address={} host={} port={} data_dir={}",
        config.blockchain_address,
        config.host,
        config.port,
        config.data_dir.display()
    );

    let host = config.host.clone();
    let port = config.port;
    let mining_interval = Duration::from_secs(config.timers.mining_timer_sec);
    let neighbor_interval = Duration::from_secs(config.timers.neighbor_sync_sec);

    let node = Arc::new(Node::new(config)?);
    log::info!("chain loaded: {} block(s)", node.chain.len());

    let mining_scheduler = MiningScheduler::new(Arc::clone(&node), mining_interval);
    tokio::spawn(async move {
        mining_scheduler.start().await;
    });

    let neighbor_scheduler = NeighborScheduler::new(Arc::clone(&node), neighbor_interval, host, port);
    tokio::spawn(async move {
        neighbor_scheduler.start().await;
    });

    let app = xyj_node::http::router(Arc::clone(&node));
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                log::error!("server error: {e}");
            }
        }
        _ = signal::ctrl_c() => {
            log::info!("shutdown signal received, exiting");
        }
    }

    Ok(())
}
