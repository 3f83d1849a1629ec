//! Header linking the previous block, a nonce, a timestamp, difficulty,
//! and an ordered transaction list — self-hashed two different ways
//! (§4.2, §9).

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::crypto::{hexfield, sha256};

use super::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: i64,
    pub nonce: u128,
    #[serde(with = "hexfield")]
    pub previous_hash: [u8; 32],
    pub transactions: Vec<Transaction>,
    #[serde(with = "hexfield")]
    pub hash: [u8; 32],
    pub number: u64,
    pub difficulty: u64,
    #[serde(rename = "txSize")]
    pub tx_size: u16,
}

/// Mirrors `Block`'s wire shape for hashing: `hash` is always read as
/// empty, and the PoW variant additionally zeros `timestamp`, `number`,
/// and `difficulty`/`txSize` (§4.2, §9).
#[derive(Serialize)]
struct BlockForHash<'a> {
    timestamp: i64,
    nonce: u128,
    previous_hash: String,
    transactions: &'a [Transaction],
    hash: &'a str,
    number: u64,
    difficulty: u64,
    #[serde(rename = "txSize")]
    tx_size: u16,
}

impl Block {
    pub fn new(
        number: u64,
        nonce: u128,
        previous_hash: [u8; 32],
        transactions: Vec<Transaction>,
        difficulty: u64,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is after the epoch")
            .as_nanos() as i64;
        let tx_size = transactions.len() as u16;
        let mut block = Block {
            timestamp,
            nonce,
            previous_hash,
            transactions,
            hash: [0u8; 32],
            number,
            difficulty,
            tx_size,
        };
        block.hash = block.hash_storage();
        block
    }

    /// The all-zero block used to seed the genesis block's `previous_hash`
    /// (§3) — never itself stored in the chain.
    pub fn empty() -> Self {
        Block {
            timestamp: 0,
            nonce: 0,
            previous_hash: [0u8; 32],
            transactions: Vec::new(),
            hash: [0u8; 32],
            number: 0,
            difficulty: 0,
            tx_size: 0,
        }
    }

    fn for_hash(&self, pow_variant: bool) -> BlockForHash<'_> {
        BlockForHash {
            timestamp: if pow_variant { 0 } else { self.timestamp },
            nonce: self.nonce,
            previous_hash: hex::encode(self.previous_hash),
            transactions: &self.transactions,
            hash: "",
            number: if pow_variant { 0 } else { self.number },
            difficulty: if pow_variant { 0 } else { self.difficulty },
            tx_size: if pow_variant { 0 } else { self.tx_size },
        }
    }

    /// Includes `timestamp`; used for persistence and `previous_hash`
    /// linkage between blocks.
    pub fn hash_storage(&self) -> [u8; 32] {
        let bytes =
            serde_json::to_vec(&self.for_hash(false)).expect("block preimage always serializes");
        sha256(&bytes)
    }

    /// Zeros `timestamp`, `number`, `difficulty`, `tx_size`; used for nonce
    /// search and PoW validation so peers can re-verify without knowing
    /// the miner's wall clock (§4.2).
    pub fn hash_pow(&self) -> [u8; 32] {
        let bytes =
            serde_json::to_vec(&self.for_hash(true)).expect("block preimage always serializes");
        sha256(&bytes)
    }
}
