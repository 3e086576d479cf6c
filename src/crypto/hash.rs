//! Keccak-256 hashing
//!
//! Ethereum uses the original Keccak padding, not the finalized SHA3-256,
//! for addresses, signing hashes and transaction hashes.

use sha3::{Digest, Keccak256};

/// Computes the Keccak-256 digest of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Computes Keccak-256 and returns it as a `0x`-prefixed hex string
pub fn keccak256_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}
