//! Crypto primitives: SHA-256 content hashing and secp256k1 ECDSA
//! verification (§1 of the expanded spec).

pub mod hexfield;
pub mod signatures;

use sha2::{Digest, Sha256};

/// SHA-256 over raw bytes, returned as a fixed-size digest.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Lower-case hex without a `0x` prefix, matching the wire format (§6).
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(s: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}
