//! CLI commands for the wallet plugin
//!
//! Implements all command handlers for the CLI interface.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::core::{recover_sender, SignedTransaction};
use crate::plugin::{EthPlugin, NetworkPlugin, PluginConfig};
use crate::wallet::Metadata;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Build the plugin from a config file, or from defaults
pub fn load_plugin(config_path: Option<&Path>) -> CliResult<EthPlugin> {
    let config = match config_path {
        Some(path) => {
            log::debug!("Loading config from {:?}", path);
            PluginConfig::from_file(path)?
        }
        None => PluginConfig::default(),
    };
    Ok(EthPlugin::new(config)?)
}

fn label_metadata(label: Option<&str>) -> Metadata {
    let mut metadata = Metadata::new();
    if let Some(label) = label {
        metadata.insert("label".to_string(), Value::from(label));
    }
    metadata
}

fn warn_unknown_subnetwork(plugin: &EthPlugin, subnetwork: &str) {
    if !plugin.config().supports(subnetwork) {
        println!(
            "⚠️  Subnetwork {:?} is not in the configured list {:?}",
            subnetwork,
            plugin.subnetworks()
        );
    }
}

/// Write a default configuration file
pub fn cmd_config_init(path: &Path) -> CliResult<()> {
    if path.exists() {
        println!("⚠️  Config already exists at {:?}", path);
        return Ok(());
    }
    let config = PluginConfig::default();
    config.save(path)?;

    println!("✅ Config written to {:?}", path);
    println!("   🌐 Node: {}", config.node_url);
    println!("   🔗 Subnetworks: {}", config.subnetworks.join(", "));
    Ok(())
}

/// Create a new wallet
pub fn cmd_wallet_create(
    plugin: &EthPlugin,
    subnetwork: &str,
    label: Option<&str>,
) -> CliResult<()> {
    warn_unknown_subnetwork(plugin, subnetwork);
    let wallet = plugin.create_wallet(subnetwork, Some(label_metadata(label)))?;

    println!("🔐 New wallet created!");
    println!("   📍 Address: {}", wallet.address());
    println!("   🔗 Network: {} / {}", wallet.network(), wallet.subnetwork());
    if let Some(l) = label {
        println!("   🏷️  Label: {}", l);
    }
    println!("   🔑 Private key: {}", wallet.private_key_hex());
    println!("\n   ⚠️  IMPORTANT: This is the only time the private key is shown.");
    println!("   Store it safely to keep access to your funds!");

    Ok(())
}

/// Import and verify an existing wallet
pub fn cmd_wallet_import(
    plugin: &EthPlugin,
    private_key: &str,
    address: &str,
    subnetwork: &str,
) -> CliResult<()> {
    warn_unknown_subnetwork(plugin, subnetwork);
    let wallet = plugin.import_wallet(private_key, subnetwork, address, None)?;

    println!("✅ Wallet verified!");
    println!("   📍 Address: {}", wallet.address());
    println!("   🔗 Network: {} / {}", wallet.network(), wallet.subnetwork());

    Ok(())
}

/// Read a parameter document from inline JSON or a file
fn read_params(inline: Option<&str>, file: Option<&Path>) -> CliResult<Map<String, Value>> {
    let text = match (inline, file) {
        (Some(json), None) => json.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        _ => return Err("Pass exactly one of --params or --params-file".into()),
    };
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        _ => Err("Transaction parameters must be a JSON object".into()),
    }
}

/// Sign a transaction
pub fn cmd_tx_sign(
    plugin: &EthPlugin,
    private_key: &str,
    address: &str,
    subnetwork: &str,
    params: Option<&str>,
    params_file: Option<&Path>,
) -> CliResult<()> {
    warn_unknown_subnetwork(plugin, subnetwork);
    let params = read_params(params, params_file)?;
    let wallet = plugin.import_wallet(private_key, subnetwork, address, None)?;
    let tx = plugin.create_transaction(&wallet, subnetwork, &params)?;
    let signed = tx.decode()?;

    println!("📤 Transaction signed:");
    println!("   From: {}", wallet.address());
    println!("   Hash: 0x{}", hex::encode(signed.hash()));
    println!("   Size: {} bytes", tx.serialized.len());
    println!("\n{}", tx.to_hex());

    Ok(())
}

/// Decode a signed transaction
pub fn cmd_tx_decode(raw: &str) -> CliResult<()> {
    let bytes = hex::decode(raw.trim().strip_prefix("0x").unwrap_or(raw.trim()))?;
    let signed = SignedTransaction::decode(&bytes)?;
    let tx = &signed.transaction;

    println!("🔍 Signed transaction");
    println!("   ├─ Hash: 0x{}", hex::encode(signed.hash()));
    println!("   ├─ Nonce: {}", tx.nonce);
    println!("   ├─ Gas price: {}", tx.gas_price);
    println!("   ├─ Gas limit: {}", tx.gas_limit);
    match &tx.to {
        Some(to) => println!("   ├─ To: {}", to),
        None => println!("   ├─ To: (contract creation)"),
    }
    println!("   ├─ Value: {}", tx.value);
    println!("   ├─ Data: 0x{}", hex::encode(&tx.data));
    match signed.chain_id() {
        Ok(chain_id) => println!("   ├─ Chain id: {} (v = {})", chain_id, signed.v),
        Err(e) => println!("   ├─ Chain id: ❌ {}", e),
    }
    match recover_sender(&signed) {
        Ok(sender) => println!("   └─ From: {}", sender),
        Err(e) => println!("   └─ From: ❌ {}", e),
    }

    Ok(())
}
