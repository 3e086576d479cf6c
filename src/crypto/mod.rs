//! Cryptographic primitives for Ethereum accounts
//!
//! This module provides:
//! - Keccak-256 hashing
//! - ECDSA key management (secp256k1)
//! - Address derivation

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{derive_address, Address, ADDRESS_LENGTH};
pub use hash::{keccak256, keccak256_hex};
pub use keys::{public_key_from_bytes, KeyError, KeyPair, PRIVATE_KEY_LENGTH};
