//! Asynchronous plugin operations
//!
//! Each operation runs the synchronous plugin call on tokio's blocking pool
//! and yields exactly one result. The `*_with_callback` variants spawn the
//! work and hand the result to a continuation, which runs exactly once.
//! No timeouts or cancellation are applied here.

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

use crate::wallet::{AccountError, CreateWalletError, ImportWalletError, Metadata, Wallet};

use super::models::{Query, Transaction};
use super::traits::{CreateQueryError, CreateTransactionError, NetworkPlugin, TransactionFailure};

fn worker_failed(e: JoinError) -> String {
    log::error!("Plugin worker failed: {}", e);
    format!("worker failed: {}", e)
}

/// Generate a wallet off the async runtime
pub async fn create_wallet<P: NetworkPlugin + 'static>(
    plugin: Arc<P>,
    subnetwork: String,
    metadata: Option<Metadata>,
) -> Result<Wallet, CreateWalletError> {
    let fallback = metadata.clone().unwrap_or_default();
    tokio::task::spawn_blocking(move || plugin.create_wallet(&subnetwork, metadata))
        .await
        .map_err(|e| CreateWalletError {
            metadata: fallback,
            message: worker_failed(e),
        })?
}

/// Import a wallet off the async runtime
pub async fn import_wallet<P: NetworkPlugin + 'static>(
    plugin: Arc<P>,
    private_key: String,
    subnetwork: String,
    address: String,
    metadata: Option<Metadata>,
) -> Result<Wallet, ImportWalletError> {
    let fallback = (address.clone(), metadata.clone().unwrap_or_default());
    tokio::task::spawn_blocking(move || {
        plugin.import_wallet(&private_key, &subnetwork, &address, metadata)
    })
    .await
    .map_err(|e| {
        let (address, metadata) = fallback;
        ImportWalletError::new(address, metadata, AccountError::WorkerFailed(worker_failed(e)))
    })?
}

/// Sign a transaction off the async runtime
pub async fn create_transaction<P: NetworkPlugin + 'static>(
    plugin: Arc<P>,
    wallet: Wallet,
    subnetwork: String,
    params: Map<String, Value>,
) -> Result<Transaction, CreateTransactionError> {
    let fallback = (wallet.address(), subnetwork.clone(), params.clone());
    tokio::task::spawn_blocking(move || plugin.create_transaction(&wallet, &subnetwork, &params))
        .await
        .map_err(|e| {
            let (address, subnetwork, params) = fallback;
            CreateTransactionError {
                address,
                subnetwork,
                params,
                kind: TransactionFailure::WorkerFailed(worker_failed(e)),
            }
        })?
}

/// Build a query off the async runtime
pub async fn create_query<P: NetworkPlugin + 'static>(
    plugin: Arc<P>,
    subnetwork: String,
    params: Map<String, Value>,
    decoder: Option<Map<String, Value>>,
) -> Result<Query, CreateQueryError> {
    let fallback = (subnetwork.clone(), params.clone(), decoder.clone());
    tokio::task::spawn_blocking(move || {
        plugin.create_query(&subnetwork, &params, decoder.as_ref())
    })
    .await
    .map_err(|e| {
        let (subnetwork, params, decoder) = fallback;
        CreateQueryError {
            subnetwork,
            params,
            decoder,
            message: worker_failed(e),
        }
    })?
}

/// Generate a wallet in the background and pass the result to `callback`
pub fn create_wallet_with_callback<P, F>(
    plugin: Arc<P>,
    subnetwork: String,
    metadata: Option<Metadata>,
    callback: F,
) -> JoinHandle<()>
where
    P: NetworkPlugin + 'static,
    F: FnOnce(Result<Wallet, CreateWalletError>) + Send + 'static,
{
    tokio::spawn(async move {
        callback(create_wallet(plugin, subnetwork, metadata).await);
    })
}

/// Import a wallet in the background and pass the result to `callback`
pub fn import_wallet_with_callback<P, F>(
    plugin: Arc<P>,
    private_key: String,
    subnetwork: String,
    address: String,
    metadata: Option<Metadata>,
    callback: F,
) -> JoinHandle<()>
where
    P: NetworkPlugin + 'static,
    F: FnOnce(Result<Wallet, ImportWalletError>) + Send + 'static,
{
    tokio::spawn(async move {
        callback(import_wallet(plugin, private_key, subnetwork, address, metadata).await);
    })
}

/// Sign a transaction in the background and pass the result to `callback`
pub fn create_transaction_with_callback<P, F>(
    plugin: Arc<P>,
    wallet: Wallet,
    subnetwork: String,
    params: Map<String, Value>,
    callback: F,
) -> JoinHandle<()>
where
    P: NetworkPlugin + 'static,
    F: FnOnce(Result<Transaction, CreateTransactionError>) + Send + 'static,
{
    tokio::spawn(async move {
        callback(create_transaction(plugin, wallet, subnetwork, params).await);
    })
}

/// Build a query in the background and pass the result to `callback`
pub fn create_query_with_callback<P, F>(
    plugin: Arc<P>,
    subnetwork: String,
    params: Map<String, Value>,
    decoder: Option<Map<String, Value>>,
    callback: F,
) -> JoinHandle<()>
where
    P: NetworkPlugin + 'static,
    F: FnOnce(Result<Query, CreateQueryError>) + Send + 'static,
{
    tokio::spawn(async move {
        callback(create_query(plugin, subnetwork, params, decoder).await);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{EthPlugin, PluginConfig};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn plugin() -> Arc<EthPlugin> {
        Arc::new(EthPlugin::new(PluginConfig::default()).unwrap())
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn transfer_params() -> Map<String, Value> {
        object(json!({
            "nonce": "0x0",
            "gasPrice": "1000000000",
            "gasLimit": 21_000,
            "to": "0x3535353535353535353535353535353535353535",
            "value": "0",
            "data": "0x"
        }))
    }

    #[tokio::test]
    async fn test_async_create_and_sign() {
        let plugin = plugin();
        let wallet = create_wallet(plugin.clone(), "1".to_string(), None)
            .await
            .unwrap();

        let imported = import_wallet(
            plugin.clone(),
            wallet.private_key_hex(),
            "1".to_string(),
            wallet.address().to_hex(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(imported, wallet);

        let async_tx = create_transaction(
            plugin.clone(),
            wallet.clone(),
            "1".to_string(),
            transfer_params(),
        )
        .await
        .unwrap();
        let sync_tx = plugin
            .create_transaction(&wallet, "1", &transfer_params())
            .unwrap();
        assert_eq!(async_tx, sync_tx);
    }

    #[tokio::test]
    async fn test_async_errors_carry_context() {
        let plugin = plugin();
        let err = import_wallet(
            plugin.clone(),
            "zz".to_string(),
            "1".to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".to_string(),
            Some(object(json!({"label": "bad"}))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.address, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
        assert_eq!(err.metadata["label"], json!("bad"));

        let err = create_query(plugin, "1".to_string(), Map::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.subnetwork, "1");
    }

    #[tokio::test]
    async fn test_callback_runs_exactly_once() {
        let plugin = plugin();
        let calls = Arc::new(AtomicUsize::new(0));
        let result = Arc::new(Mutex::new(None));

        let wallet = create_wallet(plugin.clone(), "3".to_string(), None)
            .await
            .unwrap();

        let counter = calls.clone();
        let slot = result.clone();
        create_transaction_with_callback(
            plugin.clone(),
            wallet,
            "3".to_string(),
            transfer_params(),
            move |outcome| {
                counter.fetch_add(1, Ordering::SeqCst);
                *slot.lock().unwrap() = Some(outcome.is_ok());
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*result.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_callback_receives_errors() {
        let plugin = plugin();
        let received = Arc::new(Mutex::new(Vec::new()));

        let slot = received.clone();
        create_wallet_with_callback(plugin.clone(), "4".to_string(), None, move |outcome| {
            slot.lock().unwrap().push(outcome.is_ok());
        })
        .await
        .unwrap();

        let slot = received.clone();
        let params = object(json!({"rpcMethod": 7}));
        create_query_with_callback(plugin.clone(), "4".to_string(), params, None, move |outcome| {
            slot.lock().unwrap().push(outcome.is_ok());
        })
        .await
        .unwrap();

        let slot = received.clone();
        import_wallet_with_callback(
            plugin,
            String::new(),
            "4".to_string(),
            "0x00".to_string(),
            None,
            move |outcome| {
                slot.lock().unwrap().push(outcome.is_ok());
            },
        )
        .await
        .unwrap();

        assert_eq!(*received.lock().unwrap(), vec![true, false, false]);
    }
}
