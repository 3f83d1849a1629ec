//! Owns the ordered block sequence: balance queries, lookups, append-only
//! growth, and fork-choice validation (§4.5, §4.9).

use std::sync::Mutex;

use crate::consensus::difficulty::DifficultyController;
use crate::consensus::pow::{self, meets_difficulty};
use crate::persistence::BlockLog;

use super::{Block, Transaction, MINING_REWARD};

pub struct Chain {
    blocks: Mutex<Vec<Block>>,
    difficulty: DifficultyController,
    log: BlockLog,
}

impl Chain {
    /// Loads the chain from `log`; on decode failure, or if the log is
    /// empty, starts fresh and synthesizes + persists a genesis block
    /// (§4.3, §7).
    pub fn new(miner_address: &str, log: BlockLog) -> Self {
        let mut blocks = match log.load() {
            Ok(blocks) => blocks,
            Err(e) => {
                log::warn!("failed to decode blockchain log, starting empty: {e}");
                Vec::new()
            }
        };
        if blocks.is_empty() {
            let genesis = Self::genesis(miner_address);
            if let Err(e) = log.append(&genesis) {
                log::error!("persistence failure writing genesis block: {e}");
                std::process::exit(1);
            }
            blocks.push(genesis);
        }
        Chain {
            blocks: Mutex::new(blocks),
            difficulty: DifficultyController::new(),
            log,
        }
    }

    /// `number=0, nonce=0, previous_hash = hash(empty block)`, with a
    /// single zero-value coinbase to the miner address (scenario 1, §8).
    pub fn genesis(miner_address: &str) -> Block {
        let previous_hash = Block::empty().hash_storage();
        let coinbase = Transaction::coinbase(miner_address, 0);
        Block::new(
            0,
            0,
            previous_hash,
            vec![coinbase],
            DifficultyController::new().current(),
        )
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_difficulty(&self) -> u64 {
        self.difficulty.current()
    }

    pub fn last_block(&self) -> Block {
        self.blocks
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("chain always has at least a genesis block")
    }

    pub fn get_by_number(&self, number: u64) -> Option<Block> {
        self.blocks
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.number == number)
            .cloned()
    }

    pub fn get_by_hash(&self, hash: &[u8; 32]) -> Option<Block> {
        self.blocks
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.hash == hash)
            .cloned()
    }

    pub fn get_transaction(&self, hash: &[u8; 32]) -> Option<Transaction> {
        self.blocks
            .lock()
            .unwrap()
            .iter()
            .flat_map(|b| b.transactions.iter())
            .find(|t| &t.hash == hash)
            .cloned()
    }

    /// A full copy of the block sequence, for `GET /` and fork-choice
    /// polling by peers.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.lock().unwrap().clone()
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.blocks
            .lock()
            .unwrap()
            .iter()
            .flat_map(|b| b.transactions.clone())
            .collect()
    }

    /// Signed sum over the full chain: `+value` when `recipient == addr`,
    /// `-value` when `sender == addr`. Coinbase transactions never debit
    /// because their sender is the fixed reserved address (§4.5).
    pub fn calculate_balance(&self, address: &str) -> i128 {
        let mut balance: i128 = 0;
        for tx in self.all_transactions() {
            if tx.recipient_blockchain_address == address {
                balance += tx.value as i128;
            }
            if tx.sender_blockchain_address == address {
                balance -= tx.value as i128;
            }
        }
        balance
    }

    /// Runs the full mining step (§4.8) under the chain lock: adjusts
    /// difficulty from the two most recent blocks' timestamp gap, searches
    /// for a nonce, appends a coinbase of `MINING_REWARD`, and persists.
    /// Caller is responsible for checking the mempool isn't empty first.
    pub fn mine_block(&self, mut transactions: Vec<Transaction>, miner_address: &str) -> Block {
        let mut blocks = self.blocks.lock().unwrap();

        let gap = if blocks.len() >= 2 {
            let last = &blocks[blocks.len() - 1];
            let prior = &blocks[blocks.len() - 2];
            Some(last.timestamp - prior.timestamp)
        } else {
            None
        };
        let difficulty = self.difficulty.adjust(gap);

        let previous_hash = blocks.last().expect("chain never empty").hash;
        let number = blocks.len() as u64;

        transactions.push(Transaction::coinbase(miner_address, MINING_REWARD));
        let block = pow::mine(number, previous_hash, transactions, difficulty);

        if let Err(e) = self.log.append(&block) {
            log::error!("persistence failure writing block {}: {e}", block.number);
            std::process::exit(1);
        }
        blocks.push(block.clone());
        block
    }

    /// Replaces the in-memory chain wholesale. The on-disk log is *not*
    /// rewound — a known, intentionally preserved divergence (§9).
    pub fn replace(&self, candidate: Vec<Block>) {
        *self.blocks.lock().unwrap() = candidate;
    }

    /// Reloads the in-memory chain from the durable log — the discipline
    /// the mempool's `clear()` triggers after a remote-driven purge (§4.4).
    pub fn reload_from_log(&self) {
        match self.log.load() {
            Ok(blocks) if !blocks.is_empty() => *self.blocks.lock().unwrap() = blocks,
            Ok(_) => {}
            Err(e) => log::warn!("failed to reload chain from log: {e}"),
        }
    }

    /// For each `i ∈ [1, len)`: `chain[i].previous_hash == hash(chain[i-1])`
    /// and `valid_proof(chain[i])` against the *current* global difficulty.
    /// The genesis block is not re-validated (§4.9).
    pub fn valid_chain(&self, candidate: &[Block]) -> bool {
        let difficulty = self.current_difficulty();
        for i in 1..candidate.len() {
            if candidate[i].previous_hash != candidate[i - 1].hash_storage() {
                return false;
            }
            if !meets_difficulty(&candidate[i].hash_pow(), difficulty) {
                return false;
            }
        }
        true
    }
}
