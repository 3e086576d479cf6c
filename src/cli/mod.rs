//! Command-line front end

pub mod commands;

pub use commands::{
    cmd_config_init, cmd_tx_decode, cmd_tx_sign, cmd_wallet_create, cmd_wallet_import,
    load_plugin, CliResult,
};
