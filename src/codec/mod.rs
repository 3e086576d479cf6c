//! Canonical byte encodings
//!
//! RLP is used both as the signing pre-image and as the wire format of
//! signed transactions.

pub mod rlp;

pub use rlp::{decode, encode_list, Encodable, Item, RlpError};
