//! Legacy Ethereum transactions
//!
//! Field layout and canonical encodings:
//! - Unsigned pre-image (EIP-155): `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`
//! - Signed transaction: `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`
//!
//! All integers are arbitrary precision and encoded without leading zeros.

use num_bigint::BigUint;
use thiserror::Error;

use crate::codec::rlp::{self, encode_list, Encodable, RlpError};
use crate::crypto::{keccak256, Address, KeyPair};

use super::chain_id::{ChainId, ChainIdError};
use super::signer::{sign_with_chain_id, SigningError};

// =============================================================================
// Constants
// =============================================================================

/// Gas used by a plain value transfer
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Number of fields in an encoded transaction (pre-image or signed)
pub const TX_FIELD_COUNT: usize = 9;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("RLP error: {0}")]
    Rlp(#[from] RlpError),
    #[error("Recipient must be empty or 20 bytes, got {0} bytes")]
    InvalidRecipient(usize),
    #[error("Chain id error: {0}")]
    ChainId(#[from] ChainIdError),
}

// =============================================================================
// Unsigned Transaction
// =============================================================================

/// A transaction before signing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnsignedTransaction {
    pub nonce: BigUint,
    pub gas_price: BigUint,
    pub gas_limit: BigUint,
    /// `None` creates a contract
    pub to: Option<Address>,
    pub value: BigUint,
    pub data: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// The EIP-155 signing pre-image for `chain_id`
    pub fn encode_unsigned(&self, chain_id: ChainId) -> Vec<u8> {
        let chain_id = chain_id.value();
        let empty: &[u8] = &[];
        encode_list(&[
            &self.nonce,
            &self.gas_price,
            &self.gas_limit,
            &self.to,
            &self.value,
            &self.data,
            &chain_id,
            &empty,
            &empty,
        ])
    }

    /// Keccak-256 of the signing pre-image
    pub fn signing_hash(&self, chain_id: ChainId) -> [u8; 32] {
        keccak256(&self.encode_unsigned(chain_id))
    }
}

// =============================================================================
// Signed Transaction
// =============================================================================

/// A transaction with its replay-protected signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    /// `recovery_id + 2 * chain_id + 35`
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl SignedTransaction {
    /// Canonical wire encoding
    pub fn encode_signed(&self) -> Vec<u8> {
        let tx = &self.transaction;
        let r = BigUint::from_bytes_be(&self.r);
        let s = BigUint::from_bytes_be(&self.s);
        encode_list(&[
            &tx.nonce,
            &tx.gas_price,
            &tx.gas_limit,
            &tx.to,
            &tx.value,
            &tx.data,
            &self.v,
            &r,
            &s,
        ])
    }

    /// Parse a canonical signed encoding back into its nine fields
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        let item = rlp::decode(bytes)?;
        let fields = item.as_list_of(TX_FIELD_COUNT)?;

        let to = match fields[3].as_bytes()? {
            [] => None,
            raw if raw.len() == 20 => {
                let mut out = [0u8; 20];
                out.copy_from_slice(raw);
                Some(Address::new(out))
            }
            raw => return Err(TransactionError::InvalidRecipient(raw.len())),
        };

        Ok(Self {
            transaction: UnsignedTransaction {
                nonce: fields[0].as_biguint()?,
                gas_price: fields[1].as_biguint()?,
                gas_limit: fields[2].as_biguint()?,
                to,
                value: fields[4].as_biguint()?,
                data: fields[5].as_bytes()?.to_vec(),
            },
            v: fields[6].as_u64()?,
            r: fields[7].as_uint_array::<32>()?,
            s: fields[8].as_uint_array::<32>()?,
        })
    }

    /// Transaction hash: Keccak-256 of the signed encoding
    pub fn hash(&self) -> [u8; 32] {
        keccak256(&self.encode_signed())
    }

    /// The chain id bound into `v`
    pub fn chain_id(&self) -> Result<ChainId, TransactionError> {
        Ok(ChainId::split_recovery_byte(self.v)?.0)
    }
}

// =============================================================================
// Transaction Builder
// =============================================================================

/// Builder for unsigned transactions
pub struct TransactionBuilder {
    tx: UnsignedTransaction,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            tx: UnsignedTransaction {
                gas_limit: BigUint::from(TRANSFER_GAS_LIMIT),
                ..Default::default()
            },
        }
    }

    pub fn nonce(mut self, nonce: impl Into<BigUint>) -> Self {
        self.tx.nonce = nonce.into();
        self
    }

    pub fn gas_price(mut self, gas_price: impl Into<BigUint>) -> Self {
        self.tx.gas_price = gas_price.into();
        self
    }

    pub fn gas_limit(mut self, gas_limit: impl Into<BigUint>) -> Self {
        self.tx.gas_limit = gas_limit.into();
        self
    }

    /// Set the recipient
    pub fn to(mut self, to: Address) -> Self {
        self.tx.to = Some(to);
        self
    }

    /// Clear the recipient, making this a contract creation
    pub fn create_contract(mut self) -> Self {
        self.tx.to = None;
        self
    }

    pub fn value(mut self, value: impl Into<BigUint>) -> Self {
        self.tx.value = value.into();
        self
    }

    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.tx.data = data.into();
        self
    }

    /// Build and sign the transaction
    pub fn build_and_sign(
        self,
        key_pair: &KeyPair,
        chain_id: ChainId,
    ) -> Result<SignedTransaction, SigningError> {
        sign_with_chain_id(key_pair, self.build(), chain_id)
    }

    /// Build without signing
    pub fn build(self) -> UnsignedTransaction {
        self.tx
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
