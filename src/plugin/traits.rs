//! The network plugin interface and its request-scoped errors

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::SigningError;
use crate::crypto::Address;
use crate::wallet::{CreateWalletError, ImportWalletError, Metadata, Wallet};

use super::models::{Query, Transaction};
use super::params::ParamsError;

/// What went wrong while building a transaction
#[derive(Error, Debug)]
pub enum TransactionFailure {
    #[error("Invalid parameters: {0}")]
    Params(#[from] ParamsError),
    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),
    #[error("Worker failed: {0}")]
    WorkerFailed(String),
}

/// A failed `create_transaction`, with the request it came from.
///
/// Only the wallet's address is kept, never its key.
#[derive(Error, Debug)]
#[error("Failed to create transaction from {address} on subnetwork {subnetwork:?}: {kind}")]
pub struct CreateTransactionError {
    pub address: Address,
    pub subnetwork: String,
    pub params: Map<String, Value>,
    #[source]
    pub kind: TransactionFailure,
}

impl CreateTransactionError {
    pub fn new(
        wallet: &Wallet,
        subnetwork: &str,
        params: &Map<String, Value>,
        kind: impl Into<TransactionFailure>,
    ) -> Self {
        Self {
            address: wallet.address(),
            subnetwork: subnetwork.to_string(),
            params: params.clone(),
            kind: kind.into(),
        }
    }
}

/// A failed `create_query`
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to create query on subnetwork {subnetwork:?}: {message}")]
pub struct CreateQueryError {
    pub subnetwork: String,
    pub params: Map<String, Value>,
    pub decoder: Option<Map<String, Value>>,
    pub message: String,
}

/// A pluggable network backend.
///
/// Every operation is synchronous and touches no shared state, so a plugin
/// can be shared between threads behind an `Arc`.
pub trait NetworkPlugin: Send + Sync {
    /// Network name, e.g. `"ETH"`
    fn network(&self) -> &str;

    /// Subnetworks this plugin is configured for
    fn subnetworks(&self) -> &[String];

    /// Generate a new wallet on `subnetwork`
    fn create_wallet(
        &self,
        subnetwork: &str,
        metadata: Option<Metadata>,
    ) -> Result<Wallet, CreateWalletError>;

    /// Rebuild a wallet from a hex private key and the address it must control
    fn import_wallet(
        &self,
        private_key: &str,
        subnetwork: &str,
        address: &str,
        metadata: Option<Metadata>,
    ) -> Result<Wallet, ImportWalletError>;

    /// Sign the transaction described by `params`
    fn create_transaction(
        &self,
        wallet: &Wallet,
        subnetwork: &str,
        params: &Map<String, Value>,
    ) -> Result<Transaction, CreateTransactionError>;

    /// Describe a read-only RPC call
    fn create_query(
        &self,
        subnetwork: &str,
        params: &Map<String, Value>,
        decoder: Option<&Map<String, Value>>,
    ) -> Result<Query, CreateQueryError>;
}
