//! Values handed back to the caller of a plugin

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{SignedTransaction, TransactionError};

/// A signed transaction ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub network: String,
    pub subnetwork: String,
    /// Canonical signed encoding
    #[serde(with = "hex_bytes")]
    pub serialized: Vec<u8>,
}

impl Transaction {
    pub fn new(network: &str, subnetwork: &str, serialized: Vec<u8>) -> Self {
        Self {
            network: network.to_string(),
            subnetwork: subnetwork.to_string(),
            serialized,
        }
    }

    /// `0x`-prefixed lowercase hex of the signed bytes
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.serialized))
    }

    /// The signed bytes read as UTF-8, with invalid sequences replaced.
    ///
    /// Lossy: the bytes cannot be recovered from this string. Use `to_hex`
    /// for anything that will be submitted.
    pub fn legacy_string(&self) -> String {
        String::from_utf8_lossy(&self.serialized).into_owned()
    }

    /// Parse the signed bytes back into their fields
    pub fn decode(&self) -> Result<SignedTransaction, TransactionError> {
        SignedTransaction::decode(&self.serialized)
    }
}

/// A read-only RPC request description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub network: String,
    pub subnetwork: String,
    /// `{ "rpc_method": .., "rpc_params": [..] }`
    pub data: Map<String, Value>,
    /// `{ "return_types": [..] }`, or empty
    pub decoder: Map<String, Value>,
}

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(D::Error::custom)
    }
}
