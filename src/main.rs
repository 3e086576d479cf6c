//! ETH Wallet Plugin CLI Application
//!
//! A command-line interface for creating wallets and signing transactions.

use clap::{Parser, Subcommand};
use eth_wallet_plugin::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eth-wallet")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Ethereum account and transaction signing plugin", long_about = None)]
struct Cli {
    /// Plugin configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Transaction operations
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "eth-plugin.json")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a new wallet
    Create {
        /// Subnetwork the wallet is used on
        #[arg(short, long, default_value = "1")]
        subnetwork: String,

        /// Optional label for the wallet
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Import a wallet and check its address
    Import {
        /// Private key (hex)
        #[arg(short = 'k', long)]
        private_key: String,

        /// Address the key must control
        #[arg(short, long)]
        address: String,

        /// Subnetwork the wallet is used on
        #[arg(short, long, default_value = "1")]
        subnetwork: String,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// Sign a transaction
    Sign {
        /// Private key (hex)
        #[arg(short = 'k', long)]
        private_key: String,

        /// Sender's address
        #[arg(short, long)]
        address: String,

        /// Subnetwork to sign for
        #[arg(short, long, default_value = "1")]
        subnetwork: String,

        /// Transaction parameters as inline JSON
        #[arg(short, long)]
        params: Option<String>,

        /// Transaction parameters from a JSON file
        #[arg(long)]
        params_file: Option<PathBuf>,
    },

    /// Decode a signed transaction
    Decode {
        /// Signed transaction bytes (hex)
        raw: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigCommands::Init { output } => {
                cli::cmd_config_init(&output)?;
            }
        },

        Commands::Wallet { action } => {
            let plugin = cli::load_plugin(cli.config.as_deref())?;
            match action {
                WalletCommands::Create { subnetwork, label } => {
                    cli::cmd_wallet_create(&plugin, &subnetwork, label.as_deref())?;
                }
                WalletCommands::Import {
                    private_key,
                    address,
                    subnetwork,
                } => {
                    cli::cmd_wallet_import(&plugin, &private_key, &address, &subnetwork)?;
                }
            }
        }

        Commands::Tx { action } => match action {
            TxCommands::Sign {
                private_key,
                address,
                subnetwork,
                params,
                params_file,
            } => {
                let plugin = cli::load_plugin(cli.config.as_deref())?;
                cli::cmd_tx_sign(
                    &plugin,
                    &private_key,
                    &address,
                    &subnetwork,
                    params.as_deref(),
                    params_file.as_deref(),
                )?;
            }
            TxCommands::Decode { raw } => {
                cli::cmd_tx_decode(&raw)?;
            }
        },
    }

    Ok(())
}
