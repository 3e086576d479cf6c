//! Chain identifiers for replay protection (EIP-155)
//!
//! The chain id is bound into the signing pre-image and into the recovery
//! byte `v = recovery_id + 2 * chain_id + 35`, so a transaction signed for
//! one ledger cannot be replayed on another.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Offset added to `2 * chain_id + recovery_id` to form `v`
pub const EIP155_V_OFFSET: u64 = 35;

/// Largest chain id whose `v` still fits in a u64
pub const MAX_CHAIN_ID: u64 = (u64::MAX - EIP155_V_OFFSET - 1) / 2;

/// Chain id errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainIdError {
    #[error("Subnetwork identifier is empty")]
    EmptySubnetwork,
    #[error("Chain id must be positive")]
    Zero,
    #[error("Chain id {0} is too large")]
    TooLarge(u64),
    #[error("Recovery byte {0} does not carry a chain id")]
    NotReplayProtected(u64),
}

/// A positive chain id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ChainId(u64);

impl ChainId {
    pub fn new(id: u64) -> Result<Self, ChainIdError> {
        match id {
            0 => Err(ChainIdError::Zero),
            id if id > MAX_CHAIN_ID => Err(ChainIdError::TooLarge(id)),
            id => Ok(Self(id)),
        }
    }

    /// Chain id of a subnetwork: the first byte of its UTF-8 encoding.
    ///
    /// `"1"` maps to 49 (0x31), not to 1. Multi-character subnetworks only
    /// contribute their first byte, so `"4"` and `"42"` share a chain id.
    pub fn from_subnetwork(subnetwork: &str) -> Result<Self, ChainIdError> {
        let first = *subnetwork
            .as_bytes()
            .first()
            .ok_or(ChainIdError::EmptySubnetwork)?;
        Self::new(first as u64)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The replay-protected recovery byte for a raw recovery id (0 or 1)
    pub fn recovery_byte(&self, recovery_id: u8) -> u64 {
        recovery_id as u64 + self.0 * 2 + EIP155_V_OFFSET
    }

    /// Split `v` back into its chain id and raw recovery id
    pub fn split_recovery_byte(v: u64) -> Result<(ChainId, u8), ChainIdError> {
        if v < EIP155_V_OFFSET + 2 {
            return Err(ChainIdError::NotReplayProtected(v));
        }
        let rest = v - EIP155_V_OFFSET;
        let chain_id = ChainId::new(rest / 2)?;
        Ok((chain_id, (rest % 2) as u8))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for ChainId {
    type Error = ChainIdError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> u64 {
        id.0
    }
}
