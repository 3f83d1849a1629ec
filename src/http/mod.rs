//! HTTP adapter: the route table in spec.md §6, no more. Every handler is
//! a thin function that decodes the request, calls into `Node`, and
//! encodes the response — no business logic lives here.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::NodeError;
use crate::node::Node;
use crate::wire::{AmountRequest, AmountResponse, ChainResponse, StatusResponse, TransactionRequest, TransactionsResponse};

pub fn router(node: Arc<Node>) -> Router {
    Router::new()
        .route("/", get(get_chain))
        .route("/getBlockByNumber", get(get_block_by_number))
        .route("/getBlockByHash", get(get_block_by_hash))
        .route("/getTransactionByHash", get(get_transaction_by_hash))
        .route("/getTransactions", get(get_transactions))
        .route(
            "/transactions",
            get(list_mempool).post(post_transaction).put(put_transaction).delete(delete_mempool),
        )
        .route("/mine", get(mine_now))
        .route("/mine/start", get(mine_start))
        .route("/amount", post(amount))
        .route("/consensus", put(consensus))
        .layer(TraceLayer::new_for_http())
        .with_state(node)
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = match &self {
            NodeError::BadRequest(_)
            | NodeError::InsufficientFunds
            | NodeError::BadSignature
            | NodeError::Decode(_) => StatusCode::BAD_REQUEST,
            NodeError::NotFound(_) => StatusCode::OK,
            NodeError::PeerUnreachable(_) => StatusCode::BAD_GATEWAY,
            NodeError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(StatusResponse::fail(self.to_string()))).into_response()
    }
}

async fn get_chain(State(node): State<Arc<Node>>) -> Json<ChainResponse> {
    Json(ChainResponse {
        chain: node.chain.snapshot(),
    })
}

#[derive(Deserialize)]
struct NumberQuery {
    number: u64,
}

async fn get_block_by_number(
    State(node): State<Arc<Node>>,
    Query(query): Query<NumberQuery>,
) -> Response {
    match node.chain.get_by_number(query.number) {
        Some(block) => Json(block).into_response(),
        None => Json(StatusResponse::fail("该区块不存在")).into_response(),
    }
}

#[derive(Deserialize)]
struct HashQuery {
    hash: String,
}

fn decode_hash(hex_str: &str) -> std::result::Result<[u8; 32], Response> {
    let bytes = hex::decode(hex_str)
        .map_err(|_| Json(StatusResponse::fail("无法解码哈希字符串")).into_response())?;
    if bytes.len() != 32 {
        return Err(Json(StatusResponse::fail("无法解码哈希字符串")).into_response());
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

async fn get_block_by_hash(State(node): State<Arc<Node>>, Query(query): Query<HashQuery>) -> Response {
    let hash = match decode_hash(&query.hash) {
        Ok(h) => h,
        Err(resp) => return resp,
    };
    match node.chain.get_by_hash(&hash) {
        Some(block) => Json(block).into_response(),
        None => Json(StatusResponse::fail("该区块不存在")).into_response(),
    }
}

async fn get_transaction_by_hash(
    State(node): State<Arc<Node>>,
    Query(query): Query<HashQuery>,
) -> Response {
    let hash = match decode_hash(&query.hash) {
        Ok(h) => h,
        Err(resp) => return resp,
    };
    match node.chain.get_transaction(&hash) {
        Some(tx) => Json(tx).into_response(),
        None => Json(StatusResponse::fail("该交易不存在")).into_response(),
    }
}

async fn get_transactions(State(node): State<Arc<Node>>) -> Response {
    let transactions = node.chain.all_transactions();
    if transactions.is_empty() {
        Json(StatusResponse::fail("还没有交易信息")).into_response()
    } else {
        Json(transactions).into_response()
    }
}

async fn list_mempool(State(node): State<Arc<Node>>) -> Json<TransactionsResponse> {
    let transactions = node.mempool.list();
    Json(TransactionsResponse {
        length: transactions.len(),
        transactions,
    })
}

async fn post_transaction(
    State(node): State<Arc<Node>>,
    Json(request): Json<TransactionRequest>,
) -> Response {
    match node.submit_transaction(&request).await {
        Ok(_) => (StatusCode::CREATED, Json(StatusResponse::success())).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn put_transaction(
    State(node): State<Arc<Node>>,
    Json(request): Json<TransactionRequest>,
) -> Response {
    match node.sync_transaction(&request) {
        Ok(_) => Json(StatusResponse::success()).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_mempool(State(node): State<Arc<Node>>) -> Json<StatusResponse> {
    node.purge_mempool();
    Json(StatusResponse::success())
}

async fn mine_now(State(node): State<Arc<Node>>) -> Response {
    match node.mine().await {
        Some(_) => Json(StatusResponse::success()).into_response(),
        None => (StatusCode::BAD_REQUEST, Json(StatusResponse::fail("mempool is empty"))).into_response(),
    }
}

async fn mine_start(State(node): State<Arc<Node>>) -> Json<StatusResponse> {
    node.arm_mining();
    Json(StatusResponse::success())
}

async fn amount(State(node): State<Arc<Node>>, Json(request): Json<AmountRequest>) -> Json<AmountResponse> {
    Json(AmountResponse {
        amount: node.amount(&request.blockchain_address),
    })
}

async fn consensus(State(node): State<Arc<Node>>) -> Json<StatusResponse> {
    if node.resolve_conflicts().await {
        Json(StatusResponse::success())
    } else {
        Json(StatusResponse::fail("no longer chain found"))
    }
}
