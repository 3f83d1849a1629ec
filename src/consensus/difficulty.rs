//! Bang-bang difficulty controller targeting ≥3s between mints, with a
//! floor of 13000 (§4.6).

use std::sync::atomic::{AtomicU64, Ordering};

/// `0x80000` — the difficulty a fresh chain starts at.
pub const INITIAL_DIFFICULTY: u64 = 0x8_0000;
pub const DIFFICULTY_FLOOR: u64 = 13_000;
pub const DIFFICULTY_STEP: u64 = 32;
/// 3 seconds, in nanoseconds — the target gap between the two most recent
/// blocks' timestamps.
pub const BLOCK_INTERVAL_TARGET_NANOS: i64 = 3_000_000_000;

/// An atomic field on the chain store rather than a process-global static
/// (§9): a read-modify-write only happens inside the mining step;
/// validators just read whatever is currently set.
#[derive(Debug)]
pub struct DifficultyController {
    current: AtomicU64,
}

impl DifficultyController {
    pub fn new() -> Self {
        DifficultyController {
            current: AtomicU64::new(INITIAL_DIFFICULTY),
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Adjusts difficulty immediately before a nonce search, given the gap
    /// in nanoseconds between the two most recent blocks' timestamps, or
    /// `None` if the chain has fewer than two blocks.
    pub fn adjust(&self, gap_nanos: Option<i64>) -> u64 {
        let increase = match gap_nanos {
            None => true,
            Some(gap) => gap < BLOCK_INTERVAL_TARGET_NANOS,
        };
        self.current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| {
                Some(if increase {
                    d + DIFFICULTY_STEP
                } else if d >= DIFFICULTY_FLOOR {
                    d - DIFFICULTY_STEP
                } else {
                    d
                })
            })
            .expect("update closure always returns Some");
        self.current()
    }
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new()
    }
}
