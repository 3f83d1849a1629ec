//! Nonce search against a difficulty target (§4.6).

use num_bigint::BigUint;
use num_traits::One;

use crate::blockchain::{Block, Transaction};

/// `2^256 / difficulty`.
pub fn target(difficulty: u64) -> BigUint {
    (BigUint::one() << 256u32) / BigUint::from(difficulty)
}

/// A block satisfies PoW iff the big-endian integer of its `hash_pow` is
/// strictly less than the target.
pub fn meets_difficulty(pow_hash: &[u8; 32], difficulty: u64) -> bool {
    BigUint::from_bytes_be(pow_hash) < target(difficulty)
}

/// Starting from `nonce = 0`, increments by 1 until the predicate holds.
/// No parallelism inside a single search; one search per mining tick.
pub fn mine(
    number: u64,
    previous_hash: [u8; 32],
    transactions: Vec<Transaction>,
    difficulty: u64,
) -> Block {
    let mut nonce: u128 = 0;
    loop {
        let candidate = Block::new(number, nonce, previous_hash, transactions.clone(), difficulty);
        if meets_difficulty(&candidate.hash_pow(), difficulty) {
            return candidate;
        }
        nonce += 1;
    }
}
