//! ECDSA key management
//!
//! Key pair generation and deserialization over secp256k1, the curve used
//! by Ethereum accounts.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::fmt;
use thiserror::Error;

use super::address::{derive_address, Address};

/// Length of a serialized private key in bytes
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair from the OS entropy source
    ///
    /// Draws 32 bytes at a time until they form a scalar in `[1, n-1]`.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| KeyError::KeyGeneration(e.to_string()))?;
            if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
                return Ok(Self::from_secret_key(secret_key));
            }
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from 32 big-endian private key bytes
    pub fn from_private_key_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(KeyError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                bytes.len()
            )));
        }
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| {
            KeyError::InvalidPrivateKey("scalar is zero or not below the curve order".to_string())
        })?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a key pair from a hex-encoded private key (optional `0x`)
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let digits = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let bytes =
            hex::decode(digits).map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;
        Self::from_private_key_bytes(&bytes)
    }

    /// The private key as 32 big-endian bytes
    pub fn private_key_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.secret_key.secret_bytes()
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// The public key as 64 bytes X‖Y (uncompressed, no format byte)
    pub fn public_key_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&self.public_key.serialize_uncompressed()[1..]);
        out
    }

    /// Get the public key as a hex string (uncompressed X‖Y)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Derive the account address from the public key
    pub fn address(&self) -> Address {
        derive_address(&self.public_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Parse a public key from 64-byte X‖Y or any SEC1 encoding
pub fn public_key_from_bytes(bytes: &[u8]) -> Result<PublicKey, KeyError> {
    if bytes.len() == 64 {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(bytes);
        return PublicKey::from_slice(&sec1).map_err(|_| KeyError::InvalidPublicKey);
    }
    PublicKey::from_slice(bytes).map_err(|_| KeyError::InvalidPublicKey)
}
