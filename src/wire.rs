//! Wire DTOs shared between the HTTP adapter and the peer HTTP client
//! (§6).

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Transaction};

/// `TransactionRequest` — client submission and peer-sync body (§6).
/// `sender_public_key` is 128 hex chars (X‖Y, 64+64); `signature` is
/// `"R.S"` as hex-coded big integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub sender_blockchain_address: String,
    pub recipient_blockchain_address: String,
    pub sender_public_key: String,
    pub value: u128,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        StatusResponse {
            status: "success".to_string(),
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        StatusResponse {
            status: "fail".to_string(),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AmountRequest {
    pub blockchain_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AmountResponse {
    pub amount: i128,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub length: usize,
}
