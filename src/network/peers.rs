//! Neighbor discovery: scan a configured IP offset range × port range
//! relative to the node's own host; any reachable `host:port` joins the
//! peer set. Discovery overwrites the peer set each cycle (§4.10, §9).

use std::sync::Mutex;
use std::time::Duration;

use crate::config::NeighborConfig;

const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Default)]
pub struct PeerSet {
    peers: Mutex<Vec<String>>,
}

impl PeerSet {
    pub fn new() -> Self {
        PeerSet::default()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.peers.lock().unwrap().clone()
    }

    fn set(&self, peers: Vec<String>) {
        *self.peers.lock().unwrap() = peers;
    }

    /// Manually seeds the peer set, bypassing liveness probing. Useful for
    /// wiring known peers ahead of the first discovery pass.
    pub fn seed(&self, peers: Vec<String>) {
        self.set(peers);
    }

    /// Scans the candidate range and replaces the peer set with whichever
    /// candidates answer a liveness probe. Candidates matching the node's
    /// own `host:port` are skipped.
    pub async fn discover(&self, client: &reqwest::Client, host: &str, port: u16, cfg: &NeighborConfig) {
        let candidates = candidate_addresses(host, port, cfg);
        let mut reachable = Vec::new();
        for candidate in candidates {
            if is_reachable(client, &candidate).await {
                reachable.push(candidate);
            }
        }
        self.set(reachable);
    }
}

/// Builds every `host:port` in the configured offset/port ranges, skipping
/// the node's own address.
pub fn candidate_addresses(host: &str, port: u16, cfg: &NeighborConfig) -> Vec<String> {
    let octets: Vec<&str> = host.split('.').collect();
    let [a, b, c, d] = match octets.as_slice() {
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => return Vec::new(),
    };
    let Ok(last): Result<u8, _> = d.parse() else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for offset in cfg.ip_range_start..=cfg.ip_range_end {
        let candidate_last = last.wrapping_add(offset);
        let candidate_host = format!("{a}.{b}.{c}.{candidate_last}");
        for candidate_port in cfg.port_range_start..=cfg.port_range_end {
            if candidate_host == host && candidate_port == port {
                continue;
            }
            candidates.push(format!("{candidate_host}:{candidate_port}"));
        }
    }
    candidates
}

async fn is_reachable(client: &reqwest::Client, address: &str) -> bool {
    let url = format!("http://{address}/");
    match client.get(&url).timeout(LIVENESS_TIMEOUT).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(e) => {
            log::warn!("neighbor probe failed for {address}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_skip_self() {
        let cfg = NeighborConfig {
            ip_range_start: 0,
            ip_range_end: 0,
            port_range_start: 5000,
            port_range_end: 5002,
        };
        let candidates = candidate_addresses("127.0.0.1", 5000, &cfg);
        assert!(!candidates.contains(&"127.0.0.1:5000".to_string()));
        assert!(candidates.contains(&"127.0.0.1:5001".to_string()));
        assert!(candidates.contains(&"127.0.0.1:5002".to_string()));
    }

    #[test]
    fn candidates_cover_the_ip_offset_range() {
        let cfg = NeighborConfig {
            ip_range_start: 0,
            ip_range_end: 2,
            port_range_start: 5000,
            port_range_end: 5000,
        };
        let candidates = candidate_addresses("10.0.0.5", 5000, &cfg);
        assert!(candidates.contains(&"10.0.0.6:5000".to_string()));
        assert!(candidates.contains(&"10.0.0.7:5000".to_string()));
    }

    #[tokio::test]
    async fn discover_sets_only_reachable_peers() {
        let peer_set = PeerSet::new();
        let client = reqwest::Client::new();
        let cfg = NeighborConfig {
            ip_range_start: 0,
            ip_range_end: 0,
            port_range_start: 1,
            port_range_end: 1,
        };
        // Port 1 is reserved and never reachable in a test sandbox.
        peer_set.discover(&client, "127.0.0.1", 5000, &cfg).await;
        assert!(peer_set.snapshot().is_empty());
    }
}
