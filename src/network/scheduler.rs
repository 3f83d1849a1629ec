//! The two periodic background tasks (§5): a mining tick and a neighbor
//! refresh. Each owns its own `tokio::time::interval` loop and never holds
//! a lock across `.await`.

use std::sync::Arc;
use std::time::Duration;

use crate::node::Node;

pub struct MiningScheduler {
    node: Arc<Node>,
    interval: Duration,
}

impl MiningScheduler {
    pub fn new(node: Arc<Node>, interval: Duration) -> Self {
        MiningScheduler { node, interval }
    }

    /// Self-rescheduling per §4.8: ticks every `interval`, but only
    /// re-enters the mining step while `GET /mine/start` has armed it.
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            interval.tick().await;
            if !self.node.is_mining_armed() {
                continue;
            }
            match self.node.mine().await {
                Some(block) => log::info!("mined block {}", block.number),
                None => log::debug!("mempool empty, nothing to mine"),
            }
        }
    }
}

pub struct NeighborScheduler {
    node: Arc<Node>,
    interval: Duration,
    host: String,
    port: u16,
}

impl NeighborScheduler {
    pub fn new(node: Arc<Node>, interval: Duration, host: String, port: u16) -> Self {
        NeighborScheduler {
            node,
            interval,
            host,
            port,
        }
    }

    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            interval.tick().await;
            self.node
                .peers
                .discover(
                    self.node.http_client(),
                    &self.host,
                    self.port,
                    &self.node.config.neighbors,
                )
                .await;
            log::debug!("neighbor set now {:?}", self.node.peers.snapshot());

            if self.node.resolve_conflicts().await {
                log::info!("chain replaced by a longer peer chain");
            }
        }
    }
}
