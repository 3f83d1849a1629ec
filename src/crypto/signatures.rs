//! secp256k1 ECDSA verification over a raw `(r, s)` pair against a
//! pre-computed digest — mirrors `ecdsa.Verify(pk, hash[:], r, s)` in the
//! original source, not a DER-encoded, re-hashing verify.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use k256::EncodedPoint;

/// Left-pads a hex string to 32 bytes, big-endian. Returns `None` on
/// malformed hex or an integer too large to fit.
fn hex_to_field_bytes(hex_str: &str) -> Option<[u8; 32]> {
    let hex_str = hex_str.trim_start_matches("0x");
    let bytes = hex::decode(format!("{:0>64}", hex_str)).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Some(out)
}

/// Reconstructs a public key from the wire format: 128 hex chars of X‖Y
/// (64 + 64 hex chars), uncompressed-point coordinates with no SEC1 tag.
fn decode_public_key(public_key_hex: &str) -> Option<VerifyingKey> {
    let xy = hex::decode(public_key_hex).ok()?;
    if xy.len() != 64 {
        return None;
    }
    let mut sec1 = Vec::with_capacity(65);
    sec1.push(0x04);
    sec1.extend_from_slice(&xy);
    let point = EncodedPoint::from_bytes(&sec1).ok()?;
    VerifyingKey::from_encoded_point(&point).ok()
}

/// Verifies `(r, s)` against `hash`, the transaction's own content hash —
/// the hash is used directly as the ECDSA prehash, never re-hashed.
pub fn verify(public_key_hex: &str, hash: &[u8; 32], r_hex: &str, s_hex: &str) -> bool {
    let Some(verifying_key) = decode_public_key(public_key_hex) else {
        return false;
    };
    let Some(r) = hex_to_field_bytes(r_hex) else {
        return false;
    };
    let Some(s) = hex_to_field_bytes(s_hex) else {
        return false;
    };
    let Ok(signature) = Signature::from_scalars(r, s) else {
        return false;
    };
    verifying_key.verify_prehash(hash, &signature).is_ok()
}

/// Splits the wire `"R.S"` signature field into its two hex components.
pub fn split_signature(sig: &str) -> Option<(&str, &str)> {
    sig.split_once('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::signature::hazmat::PrehashSigner;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn keypair() -> (SigningKey, String) {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let point = verifying_key.to_encoded_point(false);
        let xy = &point.as_bytes()[1..];
        (signing_key, hex::encode(xy))
    }

    #[test]
    fn verifies_a_genuine_signature() {
        let (signing_key, public_key_hex) = keypair();
        let hash = [7u8; 32];
        let signature: Signature = signing_key.sign_prehash(&hash).unwrap();
        let (r, s) = signature.split_bytes();
        let r_hex = hex::encode(r);
        let s_hex = hex::encode(s);
        assert!(verify(&public_key_hex, &hash, &r_hex, &s_hex));
    }

    #[test]
    fn rejects_a_tampered_hash() {
        let (signing_key, public_key_hex) = keypair();
        let hash = [7u8; 32];
        let signature: Signature = signing_key.sign_prehash(&hash).unwrap();
        let (r, s) = signature.split_bytes();
        let other_hash = [8u8; 32];
        assert!(!verify(
            &public_key_hex,
            &other_hash,
            &hex::encode(r),
            &hex::encode(s)
        ));
    }

    #[test]
    fn rejects_zero_signature() {
        let (_, public_key_hex) = keypair();
        let hash = [7u8; 32];
        assert!(!verify(&public_key_hex, &hash, "0", "0"));
    }

    #[test]
    fn rejects_malformed_public_key() {
        let hash = [7u8; 32];
        assert!(!verify("not-hex", &hash, "1", "1"));
    }
}
