//! Thin wrappers for the peer-to-peer calls §4.10 names. Failures are
//! logged at `warn` and swallowed — `PEER_UNREACHABLE` never surfaces to
//! callers (§5, §7).

use crate::blockchain::Block;
use crate::wire::{ChainResponse, TransactionRequest};

pub async fn notify_consensus(client: &reqwest::Client, peer: &str) {
    let url = format!("http://{peer}/consensus");
    if let Err(e) = client.put(&url).send().await {
        log::warn!("peer unreachable (consensus notify) {peer}: {e}");
    }
}

pub async fn sync_transaction(client: &reqwest::Client, peer: &str, request: &TransactionRequest) {
    let url = format!("http://{peer}/transactions");
    if let Err(e) = client.put(&url).json(request).send().await {
        log::warn!("peer unreachable (transaction sync) {peer}: {e}");
    }
}

pub async fn purge_mempool(client: &reqwest::Client, peer: &str) {
    let url = format!("http://{peer}/transactions");
    if let Err(e) = client.delete(&url).send().await {
        log::warn!("peer unreachable (mempool purge) {peer}: {e}");
    }
}

/// Fetches and decodes the peer's chain. Returns `None` on any network or
/// decode failure — the fork-choice pass just skips that peer (§4.9).
pub async fn fetch_chain(client: &reqwest::Client, peer: &str) -> Option<Vec<Block>> {
    let url = format!("http://{peer}/");
    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            log::warn!("peer unreachable (chain fetch) {peer}: {e}");
            return None;
        }
    };
    match response.json::<ChainResponse>().await {
        Ok(body) => Some(body.chain),
        Err(e) => {
            log::warn!("decode failure from peer {peer}: {e}");
            None
        }
    }
}
