use thiserror::Error;

/// Errors surfaced by the core blockchain engine.
///
/// `PeerUnreachable` is produced by the network layer but never propagated
/// to HTTP callers: it's logged at `warn` and swallowed.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("bad signature")]
    BadSignature,

    #[error("peer unreachable: {0}")]
    PeerUnreachable(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("decode failure: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;
