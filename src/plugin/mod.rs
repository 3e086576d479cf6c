//! Network plugin surface
//!
//! The [`NetworkPlugin`] trait is what a host application drives.
//! [`EthPlugin`] implements it on top of the wallet and signing layers.

pub mod async_ops;
pub mod config;
pub mod eth;
pub mod models;
pub mod params;
pub mod traits;

pub use config::{ConfigError, PluginConfig};
pub use eth::EthPlugin;
pub use models::{Query, Transaction};
pub use params::{parse_transaction_params, ParamsError};
pub use traits::{CreateQueryError, CreateTransactionError, NetworkPlugin, TransactionFailure};
