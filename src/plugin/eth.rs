//! Ethereum implementation of [`NetworkPlugin`]

use serde_json::{Map, Value};

use crate::core::{serialize, sign};
use crate::crypto::{Address, KeyError};
use crate::wallet::{
    create_account, import_account, AccountError, CreateWalletError, ImportWalletError, Metadata,
    Wallet, NETWORK,
};

use super::config::{ConfigError, PluginConfig};
use super::models::{Query, Transaction};
use super::params::parse_transaction_params;
use super::traits::{CreateQueryError, CreateTransactionError, NetworkPlugin};

/// The Ethereum plugin
#[derive(Debug, Clone)]
pub struct EthPlugin {
    config: PluginConfig,
}

impl EthPlugin {
    /// Create a plugin from a validated configuration
    pub fn new(config: PluginConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "ETH plugin ready (node {}, subnetworks {:?})",
            config.node_url,
            config.subnetworks
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }
}

impl NetworkPlugin for EthPlugin {
    fn network(&self) -> &str {
        NETWORK
    }

    fn subnetworks(&self) -> &[String] {
        &self.config.subnetworks
    }

    fn create_wallet(
        &self,
        subnetwork: &str,
        metadata: Option<Metadata>,
    ) -> Result<Wallet, CreateWalletError> {
        create_account(subnetwork, metadata.unwrap_or_default())
    }

    fn import_wallet(
        &self,
        private_key: &str,
        subnetwork: &str,
        address: &str,
        metadata: Option<Metadata>,
    ) -> Result<Wallet, ImportWalletError> {
        let metadata = metadata.unwrap_or_default();

        let claimed: Address = match address.parse() {
            Ok(claimed) => claimed,
            Err(e) => return Err(ImportWalletError::new(address, metadata, AccountError::Key(e))),
        };

        let digits = private_key.strip_prefix("0x").unwrap_or(private_key);
        let key_bytes = match hex::decode(digits) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Err(ImportWalletError::new(
                    address,
                    metadata,
                    AccountError::Key(KeyError::InvalidPrivateKey(e.to_string())),
                ))
            }
        };

        import_account(&key_bytes, &claimed, subnetwork, metadata)
    }

    fn create_transaction(
        &self,
        wallet: &Wallet,
        subnetwork: &str,
        params: &Map<String, Value>,
    ) -> Result<Transaction, CreateTransactionError> {
        let tx = parse_transaction_params(params)
            .map_err(|e| CreateTransactionError::new(wallet, subnetwork, params, e))?;
        let signed = sign(wallet, tx, subnetwork)
            .map_err(|e| CreateTransactionError::new(wallet, subnetwork, params, e))?;

        log::info!(
            "Signed transaction from {} on subnetwork {}",
            wallet.address(),
            subnetwork
        );
        Ok(Transaction::new(NETWORK, subnetwork, serialize(&signed)))
    }

    fn create_query(
        &self,
        subnetwork: &str,
        params: &Map<String, Value>,
        decoder: Option<&Map<String, Value>>,
    ) -> Result<Query, CreateQueryError> {
        let query_error = |message: &str| CreateQueryError {
            subnetwork: subnetwork.to_string(),
            params: params.clone(),
            decoder: decoder.cloned(),
            message: message.to_string(),
        };

        let rpc_method = params
            .get("rpcMethod")
            .and_then(Value::as_str)
            .ok_or_else(|| query_error("rpcMethod must be a string"))?;
        let rpc_params = params
            .get("rpcParams")
            .and_then(Value::as_array)
            .ok_or_else(|| query_error("rpcParams must be an array"))?;

        let mut data = Map::new();
        data.insert("rpc_method".to_string(), Value::from(rpc_method));
        data.insert("rpc_params".to_string(), Value::Array(rpc_params.clone()));

        let decoder = match decoder.map(return_types) {
            Some(Ok(types)) => {
                let mut out = Map::new();
                out.insert("return_types".to_string(), Value::Array(types));
                out
            }
            Some(Err(reason)) => {
                log::warn!("Ignoring query decoder: {}", reason);
                Map::new()
            }
            None => {
                log::warn!("Ignoring query decoder: none given");
                Map::new()
            }
        };

        Ok(Query {
            network: NETWORK.to_string(),
            subnetwork: subnetwork.to_string(),
            data,
            decoder,
        })
    }
}

/// `decoder.returnTypes`, which must be an array of strings
fn return_types(decoder: &Map<String, Value>) -> Result<Vec<Value>, &'static str> {
    let types = decoder
        .get("returnTypes")
        .and_then(Value::as_array)
        .ok_or("returnTypes must be an array")?;
    if types.iter().all(Value::is_string) {
        Ok(types.clone())
    } else {
        Err("returnTypes must only contain strings")
    }
}
