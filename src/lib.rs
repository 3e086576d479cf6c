//! ETH Wallet Plugin: Ethereum accounts and transaction signing in Rust
//!
//! This crate provides the core of an Ethereum network plugin:
//! - secp256k1 key pairs and Keccak-256 address derivation
//! - Account import/creation that re-checks the key controls the address
//! - RLP encoding with a strict canonical decoder
//! - EIP-155 replay-protected transaction signing and sender recovery
//! - A `NetworkPlugin` trait with sync, async and callback entry points
//!
//! # Example
//!
//! ```rust
//! use eth_wallet_plugin::plugin::{EthPlugin, NetworkPlugin, PluginConfig};
//! use serde_json::json;
//!
//! let plugin = EthPlugin::new(PluginConfig::default()).unwrap();
//!
//! // Create a wallet
//! let wallet = plugin.create_wallet("1", None).unwrap();
//! println!("Address: {}", wallet.address());
//!
//! // Sign a transfer
//! let params = json!({
//!     "nonce": 0,
//!     "gasPrice": "1000000000",
//!     "gasLimit": 21000,
//!     "to": "0x3535353535353535353535353535353535353535",
//!     "value": "1000000000000000000",
//!     "data": ""
//! });
//! let tx = plugin
//!     .create_transaction(&wallet, "1", params.as_object().unwrap())
//!     .unwrap();
//! println!("Signed: {}", tx.to_hex());
//! ```

pub mod cli;
pub mod codec;
pub mod core;
pub mod crypto;
pub mod plugin;
pub mod wallet;

// Re-export commonly used types
pub use codec::{Encodable, RlpError};
pub use core::{
    recover_sender, sign, ChainId, SignedTransaction, SigningError, TransactionBuilder,
    UnsignedTransaction,
};
pub use crypto::{Address, KeyError, KeyPair};
pub use plugin::{
    CreateQueryError, CreateTransactionError, EthPlugin, NetworkPlugin, PluginConfig, Query,
    Transaction,
};
pub use wallet::{
    create_account, import_account, CreateWalletError, ImportWalletError, Metadata, Wallet,
};
