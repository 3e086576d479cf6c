//! Account validation
//!
//! `import_account` and `create_account` are the only ways to obtain a
//! [`Wallet`]. Both re-derive the address from the private key and refuse
//! to hand back a wallet whose address does not match.

use thiserror::Error;

use crate::crypto::{Address, KeyError, KeyPair};

use super::wallet::{Metadata, Wallet};

/// Why an account could not be imported
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Address mismatch: claimed {claimed}, derived {derived}")]
    AddressMismatch { claimed: Address, derived: Address },
    #[error("Worker failed: {0}")]
    WorkerFailed(String),
}

/// A failed import, with the request it came from.
///
/// Carries the claimed address and the metadata, never the private key.
#[derive(Error, Debug)]
#[error("Failed to import wallet {address}: {kind}")]
pub struct ImportWalletError {
    pub address: String,
    pub metadata: Metadata,
    #[source]
    pub kind: AccountError,
}

impl ImportWalletError {
    pub fn new(address: impl Into<String>, metadata: Metadata, kind: AccountError) -> Self {
        Self {
            address: address.into(),
            metadata,
            kind,
        }
    }

    pub fn is_address_mismatch(&self) -> bool {
        matches!(self.kind, AccountError::AddressMismatch { .. })
    }
}

/// A failed account creation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to create wallet: {message}")]
pub struct CreateWalletError {
    pub metadata: Metadata,
    pub message: String,
}

/// Build a wallet from a private key and the address the caller expects it
/// to control.
pub fn import_account(
    private_key: &[u8],
    claimed: &Address,
    subnetwork: &str,
    metadata: Metadata,
) -> Result<Wallet, ImportWalletError> {
    let key_pair = match KeyPair::from_private_key_bytes(private_key) {
        Ok(key_pair) => key_pair,
        Err(e) => {
            log::debug!("Rejected private key for {}: {}", claimed, e);
            return Err(ImportWalletError::new(claimed.to_hex(), metadata, e.into()));
        }
    };

    let derived = key_pair.address();
    if derived != *claimed {
        log::debug!("Address mismatch: claimed {}, derived {}", claimed, derived);
        return Err(ImportWalletError::new(
            claimed.to_hex(),
            metadata,
            AccountError::AddressMismatch {
                claimed: *claimed,
                derived,
            },
        ));
    }

    log::info!("Imported wallet {} on subnetwork {}", derived, subnetwork);
    Ok(Wallet::new(
        derived,
        key_pair.private_key_bytes(),
        subnetwork,
        metadata,
    ))
}

/// Generate a fresh account and validate it through `import_account`
pub fn create_account(subnetwork: &str, metadata: Metadata) -> Result<Wallet, CreateWalletError> {
    let key_pair = KeyPair::generate().map_err(|e| CreateWalletError {
        metadata: metadata.clone(),
        message: e.to_string(),
    })?;

    import_account(
        &key_pair.private_key_bytes(),
        &key_pair.address(),
        subnetwork,
        metadata,
    )
    .map_err(|e| CreateWalletError {
        message: e.kind.to_string(),
        metadata: e.metadata,
    })
}
