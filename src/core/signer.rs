//! Transaction signing
//!
//! Signs the Keccak-256 digest of the EIP-155 pre-image with a recoverable
//! secp256k1 signature. Nonces are derived per RFC 6979, so signing the same
//! transaction with the same key always yields the same `(v, r, s)`.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};
use thiserror::Error;

use crate::crypto::{derive_address, Address, KeyError, KeyPair};
use crate::wallet::Wallet;

use super::chain_id::{ChainId, ChainIdError};
use super::transaction::{SignedTransaction, UnsignedTransaction};

/// Signing errors
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Chain id error: {0}")]
    ChainId(#[from] ChainIdError),
    #[error("Secp256k1 error: {0}")]
    Secp256k1(#[from] secp256k1::Error),
}

/// Sign `tx` with the wallet's key for the chain named by `subnetwork`
pub fn sign(
    wallet: &Wallet,
    tx: UnsignedTransaction,
    subnetwork: &str,
) -> Result<SignedTransaction, SigningError> {
    let chain_id = ChainId::from_subnetwork(subnetwork)?;
    let key_pair = KeyPair::from_private_key_bytes(wallet.private_key())?;
    sign_with_chain_id(&key_pair, tx, chain_id)
}

/// Sign `tx` for an explicit chain id
pub fn sign_with_chain_id(
    key_pair: &KeyPair,
    tx: UnsignedTransaction,
    chain_id: ChainId,
) -> Result<SignedTransaction, SigningError> {
    let digest = tx.signing_hash(chain_id);
    let message = Message::from_digest_slice(&digest)?;

    let secp = Secp256k1::signing_only();
    let signature = secp.sign_ecdsa_recoverable(&message, &key_pair.secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);
    let v = chain_id.recovery_byte(recovery_id.to_i32() as u8);

    log::debug!("Signed transaction for chain {} (v = {})", chain_id, v);

    Ok(SignedTransaction {
        transaction: tx,
        v,
        r,
        s,
    })
}

/// The bytes submitted to the network
pub fn serialize(signed: &SignedTransaction) -> Vec<u8> {
    signed.encode_signed()
}

/// Recover the address that signed `signed`
pub fn recover_sender(signed: &SignedTransaction) -> Result<Address, SigningError> {
    let (chain_id, recovery_id) = ChainId::split_recovery_byte(signed.v)?;
    let digest = signed.transaction.signing_hash(chain_id);
    let message = Message::from_digest_slice(&digest)?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&signed.r);
    compact[32..].copy_from_slice(&signed.s);
    let recovery_id = RecoveryId::from_i32(recovery_id as i32)?;
    let signature = RecoverableSignature::from_compact(&compact, recovery_id)?;

    let secp = Secp256k1::verification_only();
    let public_key = secp.recover_ecdsa(&message, &signature)?;
    Ok(derive_address(&public_key))
}
