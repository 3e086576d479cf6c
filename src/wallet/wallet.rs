//! Wallet implementation
//!
//! A wallet pairs an address with the private key that controls it, scoped
//! to a network and subnetwork. Wallets are only built by the account
//! validator, so the stored address always matches the stored key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::crypto::{Address, PRIVATE_KEY_LENGTH};

/// Network name for every wallet this crate produces
pub const NETWORK: &str = "ETH";

/// Opaque caller-supplied wallet metadata
pub type Metadata = Map<String, Value>;

/// An Ethereum account with its private key
#[derive(Clone, PartialEq, Eq)]
pub struct Wallet {
    address: Address,
    private_key: [u8; PRIVATE_KEY_LENGTH],
    subnetwork: String,
    metadata: Metadata,
}

impl Wallet {
    /// Callers must have checked that `address` derives from `private_key`
    pub(crate) fn new(
        address: Address,
        private_key: [u8; PRIVATE_KEY_LENGTH],
        subnetwork: &str,
        metadata: Metadata,
    ) -> Self {
        Self {
            address,
            private_key,
            subnetwork: subnetwork.to_string(),
            metadata,
        }
    }

    /// Get the wallet's address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the wallet's private key bytes
    /// WARNING: Keep this secret!
    pub fn private_key(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.private_key
    }

    /// Get the wallet's private key (hex)
    /// WARNING: Keep this secret!
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }

    pub fn network(&self) -> &str {
        NETWORK
    }

    pub fn subnetwork(&self) -> &str {
        &self.subnetwork
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Export wallet info (without private key)
    pub fn export_public_info(&self) -> WalletInfo {
        WalletInfo {
            address: self.address,
            network: NETWORK.to_string(),
            subnetwork: self.subnetwork.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("network", &NETWORK)
            .field("subnetwork", &self.subnetwork)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Public wallet information (safe to share)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: Address,
    pub network: String,
    pub subnetwork: String,
    pub metadata: Metadata,
}
