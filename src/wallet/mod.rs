//! Wallets and the account validator that produces them

pub mod validator;
pub mod wallet;

pub use validator::{
    create_account, import_account, AccountError, CreateWalletError, ImportWalletError,
};
pub use wallet::{Metadata, Wallet, WalletInfo, NETWORK};
