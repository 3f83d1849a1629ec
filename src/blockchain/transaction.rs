//! Immutable value-transfer records with a content hash (§4.1).

use serde::{Deserialize, Serialize};

use crate::crypto::{hexfield, sha256};

use super::MINING_ACCOUNT_ADDRESS;

/// A value transfer from `sender_blockchain_address` to
/// `recipient_blockchain_address`. Field names and ordering must match
/// exactly: the same shape is hashed for both the wire and the hash
/// preimage (§4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender_blockchain_address: String,
    pub recipient_blockchain_address: String,
    pub value: u128,
    #[serde(with = "hexfield")]
    pub hash: [u8; 32],
}

/// Mirrors `Transaction`'s wire shape but with `hash` read as an empty hex
/// string — used only to compute the fixed-point content hash.
#[derive(Serialize)]
struct TransactionForHash<'a> {
    sender_blockchain_address: &'a str,
    recipient_blockchain_address: &'a str,
    value: u128,
    hash: &'a str,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, value: u128) -> Self {
        let sender = sender.into();
        let recipient = recipient.into();
        let hash = Self::content_hash(&sender, &recipient, value);
        Transaction {
            sender_blockchain_address: sender,
            recipient_blockchain_address: recipient,
            value,
            hash,
        }
    }

    /// A coinbase crediting `recipient` with `MINING_REWARD` from the
    /// reserved mining account. Not signature-checked, no balance
    /// precondition (§4.1, §4.7).
    pub fn coinbase(recipient: impl Into<String>, value: u128) -> Self {
        Self::new(MINING_ACCOUNT_ADDRESS, recipient, value)
    }

    pub fn is_coinbase(&self) -> bool {
        self.sender_blockchain_address == MINING_ACCOUNT_ADDRESS
    }

    fn content_hash(sender: &str, recipient: &str, value: u128) -> [u8; 32] {
        let for_hash = TransactionForHash {
            sender_blockchain_address: sender,
            recipient_blockchain_address: recipient,
            value,
            hash: "",
        };
        let bytes =
            serde_json::to_vec(&for_hash).expect("transaction preimage is always serializable");
        sha256(&bytes)
    }
}
