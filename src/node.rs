//! Ties the chain, mempool, peer set, and configuration together — the
//! operations the HTTP layer and the scheduler call into (§4.7-§4.10).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::blockchain::{Block, Chain, Mempool, Transaction};
use crate::config::NodeConfig;
use crate::crypto::signatures;
use crate::error::{NodeError, Result};
use crate::network::client;
use crate::network::PeerSet;
use crate::persistence::BlockLog;
use crate::wire::TransactionRequest;

pub struct Node {
    pub chain: Chain,
    pub mempool: Mempool,
    pub peers: PeerSet,
    pub config: NodeConfig,
    http_client: reqwest::Client,
    /// Set by `GET /mine/start`; the mining scheduler only re-enters the
    /// mining step on its tick while this is armed (§4.8).
    mining_armed: AtomicBool,
    /// Serializes the drain-mempool-then-mine-block sequence in `mine()` so
    /// a scheduler tick racing a `GET /mine` can't drain the same mempool
    /// snapshot or interleave a block append (§4.8, §5).
    mining_lock: Mutex<()>,
}

impl Node {
    pub fn new(config: NodeConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let log = BlockLog::new(config.block_log_path());
        let chain = Chain::new(&config.blockchain_address, log);
        Ok(Node {
            chain,
            mempool: Mempool::new(),
            peers: PeerSet::new(),
            config,
            http_client: reqwest::Client::new(),
            mining_armed: AtomicBool::new(false),
            mining_lock: Mutex::new(()),
        })
    }

    /// Arms the recurring mining timer (`GET /mine/start`).
    pub fn arm_mining(&self) {
        self.mining_armed.store(true, Ordering::Relaxed);
    }

    pub fn is_mining_armed(&self) -> bool {
        self.mining_armed.load(Ordering::Relaxed)
    }

    /// `add_transaction(sender, recipient, value, public_key, signature)`
    /// (§4.7). Coinbase submissions bypass the balance and signature
    /// checks; only the mining step should call that path.
    pub fn add_transaction(
        &self,
        sender: &str,
        recipient: &str,
        value: u128,
        public_key: Option<&str>,
        signature: Option<(&str, &str)>,
    ) -> Result<Transaction> {
        let tx = Transaction::new(sender, recipient, value);

        if tx.is_coinbase() {
            self.mempool.add(tx.clone());
            return Ok(tx);
        }

        let balance = self.chain.calculate_balance(sender);
        if balance < value as i128 {
            return Err(NodeError::InsufficientFunds);
        }

        let (public_key, (r, s)) = match (public_key, signature) {
            (Some(pk), Some(sig)) => (pk, sig),
            _ => return Err(NodeError::BadSignature),
        };
        if !signatures::verify(public_key, &tx.hash, r, s) {
            return Err(NodeError::BadSignature);
        }

        self.mempool.add(tx.clone());
        Ok(tx)
    }

    /// `POST /transactions`: admits a client-submitted transaction and, on
    /// success, rebroadcasts it to every peer via the PUT "sync" variant
    /// (§4.10).
    pub async fn submit_transaction(&self, request: &TransactionRequest) -> Result<Transaction> {
        let tx = self.sync_transaction(request)?;
        for peer in self.peers.snapshot() {
            client::sync_transaction(&self.http_client, &peer, request).await;
        }
        Ok(tx)
    }

    /// `PUT /transactions`: admits a peer-originated transaction without
    /// rebroadcasting further (§4.10).
    pub fn sync_transaction(&self, request: &TransactionRequest) -> Result<Transaction> {
        let (r, s) = signatures::split_signature(&request.signature)
            .ok_or_else(|| NodeError::BadRequest("malformed signature".to_string()))?;
        self.add_transaction(
            &request.sender_blockchain_address,
            &request.recipient_blockchain_address,
            request.value,
            Some(&request.sender_public_key),
            Some((r, s)),
        )
    }

    /// Empties the mempool and reloads the chain from disk — the
    /// discipline a remote-driven purge follows (§4.4).
    pub fn purge_mempool(&self) {
        self.mempool.clear();
        self.chain.reload_from_log();
    }

    /// The mining step (§4.8): if the mempool is empty, does nothing and
    /// returns `None`; otherwise mines a block, clears the mempool, and
    /// notifies every peer to resolve conflicts and drop their stale
    /// mempool (§4.10). The drain-then-mine sequence runs under
    /// `mining_lock` so two concurrent callers can't race each other.
    pub async fn mine(&self) -> Option<Block> {
        let block = {
            let _guard = self.mining_lock.lock().unwrap();
            if self.mempool.is_empty() {
                return None;
            }
            let pending = self.mempool.snapshot();
            let block = self.chain.mine_block(pending, &self.config.blockchain_address);
            self.mempool.clear();
            block
        };

        for peer in self.peers.snapshot() {
            client::notify_consensus(&self.http_client, &peer).await;
            client::purge_mempool(&self.http_client, &peer).await;
        }

        Some(block)
    }

    /// `resolve_conflicts()` (§4.9): polls every peer's chain, keeps the
    /// longest one that's strictly longer than the local chain and passes
    /// `valid_chain`, and replaces the local chain if one is found.
    pub async fn resolve_conflicts(&self) -> bool {
        let mut max_len = self.chain.len();
        let mut best: Option<Vec<Block>> = None;

        for peer in self.peers.snapshot() {
            if let Some(remote) = client::fetch_chain(&self.http_client, &peer).await {
                if remote.len() > max_len && self.chain.valid_chain(&remote) {
                    max_len = remote.len();
                    best = Some(remote);
                }
            }
        }

        match best {
            Some(chain) => {
                self.chain.replace(chain);
                true
            }
            None => false,
        }
    }

    pub fn amount(&self, address: &str) -> i128 {
        self.chain.calculate_balance(address)
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::MINING_ACCOUNT_ADDRESS;
    use k256::ecdsa::signature::hazmat::PrehashSigner;
    use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
    use rand::rngs::OsRng;

    fn test_node() -> (Node, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            blockchain_address: "miner".to_string(),
            data_dir: dir.path().to_path_buf(),
            ..NodeConfig::default()
        };
        (Node::new(config).unwrap(), dir)
    }

    fn keypair() -> (SigningKey, String) {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let point = verifying_key.to_encoded_point(false);
        (signing_key, hex::encode(&point.as_bytes()[1..]))
    }

    #[tokio::test]
    async fn mine_empty_mempool_is_a_no_op() {
        let (node, _dir) = test_node();
        let before = node.chain.len();
        assert!(node.mine().await.is_none());
        assert_eq!(node.chain.len(), before);
    }

    #[tokio::test]
    async fn admit_and_mine_credits_recipient_and_miner() {
        let (node, _dir) = test_node();
        let (signing_key, public_key_hex) = keypair();

        node.add_transaction(MINING_ACCOUNT_ADDRESS, "alice", 5000, None, None)
            .unwrap();
        node.mine().await.unwrap();

        let tx = Transaction::new("alice", "bob", 10);
        let signature: Signature = signing_key.sign_prehash(&tx.hash).unwrap();
        let (r, s) = signature.split_bytes();
        node.add_transaction(
            "alice",
            "bob",
            10,
            Some(&public_key_hex),
            Some((&hex::encode(r), &hex::encode(s))),
        )
        .unwrap();

        let before_len = node.chain.len();
        let block = node.mine().await.unwrap();
        assert_eq!(node.chain.len(), before_len + 1);
        assert!(block.transactions.iter().any(|t| t.value == 10
            && t.sender_blockchain_address == "alice"
            && t.recipient_blockchain_address == "bob"));
        assert_eq!(node.amount("alice"), 5000 - 10);
        assert_eq!(node.amount("bob"), 10);
    }

    #[tokio::test]
    async fn rejects_underfunded_transaction() {
        let (node, _dir) = test_node();
        let err = node
            .add_transaction("alice", "bob", 1_000_000_000, None, None)
            .unwrap_err();
        assert!(matches!(err, NodeError::InsufficientFunds));
        assert!(node.mempool.is_empty());
    }

    #[tokio::test]
    async fn rejects_zero_signature() {
        let (node, _dir) = test_node();
        node.add_transaction(MINING_ACCOUNT_ADDRESS, "alice", 5000, None, None)
            .unwrap();
        node.mine().await.unwrap();

        let (_, public_key_hex) = keypair();
        let err = node
            .add_transaction("alice", "bob", 10, Some(&public_key_hex), Some(("0", "0")))
            .unwrap_err();
        assert!(matches!(err, NodeError::BadSignature));
    }
}
