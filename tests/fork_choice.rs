//! End-to-end fork-choice scenario (§8, scenario 6): a node with a shorter
//! chain adopts a peer's longer valid chain over `PUT /consensus`, and
//! rejects one with a tampered `previous_hash` link.

use std::net::SocketAddr;
use std::sync::Arc;

use xyj_node::blockchain::MINING_ACCOUNT_ADDRESS;
use xyj_node::config::NodeConfig;
use xyj_node::node::Node;

async fn spawn_node(blockchain_address: &str, data_dir: &std::path::Path) -> (Arc<Node>, SocketAddr) {
    let config = NodeConfig {
        blockchain_address: blockchain_address.to_string(),
        data_dir: data_dir.to_path_buf(),
        ..NodeConfig::default()
    };
    let node = Arc::new(Node::new(config).unwrap());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = xyj_node::http::router(Arc::clone(&node));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (node, addr)
}

async fn mine_n_blocks(node: &Node, n: usize) {
    for i in 0..n {
        node.add_transaction(MINING_ACCOUNT_ADDRESS, "alice", 1, None, None)
            .unwrap();
        assert!(node.mine().await.is_some(), "block {i} should have mined");
    }
}

#[tokio::test]
async fn adopts_a_longer_valid_peer_chain() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let (node_a, _addr_a) = spawn_node("miner-a", dir_a.path()).await;
    let (node_b, addr_b) = spawn_node("miner-b", dir_b.path()).await;

    mine_n_blocks(&node_a, 2).await;
    mine_n_blocks(&node_b, 4).await;

    assert_eq!(node_a.chain.len(), 3);
    assert_eq!(node_b.chain.len(), 5);

    node_a.peers.seed(vec![addr_b.to_string()]);

    let replaced = node_a.resolve_conflicts().await;
    assert!(replaced);
    assert_eq!(node_a.chain.len(), 5);
}

#[tokio::test]
async fn rejects_a_peer_chain_with_a_tampered_link() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let (node_a, _addr_a) = spawn_node("miner-a", dir_a.path()).await;
    let (node_b, addr_b) = spawn_node("miner-b", dir_b.path()).await;

    mine_n_blocks(&node_a, 2).await;
    mine_n_blocks(&node_b, 4).await;

    let mut tampered = node_b.chain.snapshot();
    tampered[2].previous_hash = [0xffu8; 32];
    node_b.chain.replace(tampered);

    node_a.peers.seed(vec![addr_b.to_string()]);

    let replaced = node_a.resolve_conflicts().await;
    assert!(!replaced);
    assert_eq!(node_a.chain.len(), 3);
}

#[tokio::test]
async fn does_not_replace_with_a_shorter_or_equal_chain() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let (node_a, _addr_a) = spawn_node("miner-a", dir_a.path()).await;
    let (node_b, addr_b) = spawn_node("miner-b", dir_b.path()).await;

    mine_n_blocks(&node_a, 3).await;
    mine_n_blocks(&node_b, 2).await;

    node_a.peers.seed(vec![addr_b.to_string()]);

    let replaced = node_a.resolve_conflicts().await;
    assert!(!replaced);
    assert_eq!(node_a.chain.len(), 4);
}

#[tokio::test]
async fn transaction_posted_to_one_node_is_mined_and_balance_reflects_it() {
    let dir_a = tempfile::tempdir().unwrap();
    let (node_a, addr_a) = spawn_node("miner-a", dir_a.path()).await;

    let client = reqwest::Client::new();

    node_a
        .add_transaction(MINING_ACCOUNT_ADDRESS, "alice", 100, None, None)
        .unwrap();
    node_a.mine().await.unwrap();

    let amount: xyj_node::wire::AmountResponse = client
        .post(format!("http://{addr_a}/amount"))
        .json(&xyj_node::wire::AmountRequest {
            blockchain_address: "alice".to_string(),
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(amount.amount, 100);
}
