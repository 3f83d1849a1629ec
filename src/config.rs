//! Node configuration: listen port, miner identity, data directory, peer
//! scan range, and the tunable constants named in §6. TOML-loadable with
//! CLI overrides, grounded in the struct-of-Defaults shape this project
//! has always used for config.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborConfig {
    /// IP offset range scanned relative to the node's own host, inclusive.
    pub ip_range_start: u8,
    pub ip_range_end: u8,
    /// Port range scanned on each candidate host, inclusive.
    pub port_range_start: u16,
    pub port_range_end: u16,
}

impl Default for NeighborConfig {
    fn default() -> Self {
        NeighborConfig {
            ip_range_start: 0,
            ip_range_end: 0,
            port_range_start: 5000,
            port_range_end: 5003,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    pub mining_timer_sec: u64,
    pub neighbor_sync_sec: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            mining_timer_sec: 10,
            neighbor_sync_sec: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub blockchain_address: String,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub neighbors: NeighborConfig,
    pub timers: TimerConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            blockchain_address: "miner".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: PathBuf::from("./data"),
            neighbors: NeighborConfig::default(),
            timers: TimerConfig::default(),
        }
    }
}

impl NodeConfig {
    pub fn block_log_path(&self) -> PathBuf {
        self.data_dir.join("blockchain.txt")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// CLI overrides for `NodeConfig`.
#[derive(Debug, Parser)]
#[command(name = "xyj-node", about = "A small proof-of-work blockchain node")]
pub struct Cli {
    /// Path to a TOML config file; CLI flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub blockchain_address: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    pub fn into_node_config(self) -> Result<NodeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_file(path)?,
            None => NodeConfig::default(),
        };
        if let Some(address) = self.blockchain_address {
            config.blockchain_address = address;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        let config = NodeConfig {
            blockchain_address: "miner-1".to_string(),
            port: 6000,
            ..NodeConfig::default()
        };
        config.to_file(&path).unwrap();
        let loaded = NodeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.blockchain_address, "miner-1");
        assert_eq!(loaded.port, 6000);
    }

    #[test]
    fn defaults_match_the_constants_table() {
        let config = NodeConfig::default();
        assert_eq!(config.timers.mining_timer_sec, 10);
        assert_eq!(config.timers.neighbor_sync_sec, 10);
        assert_eq!(config.neighbors.port_range_start, 5000);
        assert_eq!(config.neighbors.port_range_end, 5003);
    }

    #[test]
    fn block_log_path_is_under_data_dir() {
        let config = NodeConfig {
            data_dir: PathBuf::from("/tmp/xyj"),
            ..NodeConfig::default()
        };
        assert_eq!(
            config.block_log_path(),
            PathBuf::from("/tmp/xyj/blockchain.txt")
        );
    }
}
