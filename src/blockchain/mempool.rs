//! Unordered pending-transaction buffer guarded by a mutex (§4.4).

use std::sync::Mutex;

use super::Transaction;

#[derive(Default)]
pub struct Mempool {
    pending: Mutex<Vec<Transaction>>,
}

impl Mempool {
    pub fn new() -> Self {
        Mempool::default()
    }

    pub fn add(&self, tx: Transaction) {
        self.pending.lock().unwrap().push(tx);
    }

    /// Empties the mempool. Callers must separately reload the chain from
    /// disk afterwards — see `Chain::reload_from_log` — matching the
    /// source's discipline of re-syncing after a remote-driven purge.
    pub fn clear(&self) {
        self.pending.lock().unwrap().clear();
    }

    /// A copy for mining, taken under the lock.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.pending.lock().unwrap().clone()
    }

    /// For the `/transactions` GET endpoint.
    pub fn list(&self) -> Vec<Transaction> {
        self.snapshot()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}
