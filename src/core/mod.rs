//! Core transaction components
//!
//! This module contains:
//! - Chain ids (EIP-155 replay protection)
//! - Unsigned and signed transactions with their canonical encodings
//! - Deterministic recoverable signing and sender recovery

pub mod chain_id;
pub mod signer;
pub mod transaction;

pub use chain_id::{ChainId, ChainIdError, EIP155_V_OFFSET, MAX_CHAIN_ID};
pub use signer::{recover_sender, serialize, sign, sign_with_chain_id, SigningError};
pub use transaction::{
    SignedTransaction, TransactionBuilder, TransactionError, UnsignedTransaction,
    TRANSFER_GAS_LIMIT, TX_FIELD_COUNT,
};
