//! Transaction parameter documents
//!
//! A parameter document is a JSON object with the keys `nonce`, `gasPrice`,
//! `gasLimit`, `to`, `value` and `data`. Quantities may be given as JSON
//! integers, decimal strings or `0x` hex strings. `to` and `data` are hex
//! strings; an empty `to` (or bare `"0x"`) creates a contract.

use num_bigint::BigUint;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::UnsignedTransaction;
use crate::crypto::Address;

/// Parameter parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("Missing parameter: {0}")]
    Missing(&'static str),
    #[error("Parameter {field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Parameter {field} is not a non-negative integer: {value}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("Parameter {field} is not valid hex: {reason}")]
    InvalidHex { field: &'static str, reason: String },
    #[error("Recipient must be empty or 20 bytes, got {0} bytes")]
    InvalidRecipient(usize),
}

/// Build an unsigned transaction from a parameter document
pub fn parse_transaction_params(
    params: &Map<String, Value>,
) -> Result<UnsignedTransaction, ParamsError> {
    Ok(UnsignedTransaction {
        nonce: quantity(params, "nonce")?,
        gas_price: quantity(params, "gasPrice")?,
        gas_limit: quantity(params, "gasLimit")?,
        to: recipient(params)?,
        value: quantity(params, "value")?,
        data: hex_field(params, "data")?,
    })
}

fn field<'a>(params: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ParamsError> {
    params.get(name).ok_or(ParamsError::Missing(name))
}

fn string_field<'a>(
    params: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, ParamsError> {
    field(params, name)?
        .as_str()
        .ok_or(ParamsError::InvalidType {
            field: name,
            expected: "a hex string",
        })
}

fn quantity(params: &Map<String, Value>, name: &'static str) -> Result<BigUint, ParamsError> {
    match field(params, name)? {
        Value::Number(n) => n.as_u64().map(BigUint::from).ok_or_else(|| {
            ParamsError::InvalidInteger {
                field: name,
                value: n.to_string(),
            }
        }),
        Value::String(s) => parse_quantity(s).ok_or_else(|| ParamsError::InvalidInteger {
            field: name,
            value: s.clone(),
        }),
        _ => Err(ParamsError::InvalidType {
            field: name,
            expected: "an integer or a numeric string",
        }),
    }
}

/// `0x` hex or plain decimal, digits only
fn parse_quantity(s: &str) -> Option<BigUint> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex_digits) => (hex_digits, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
}

fn decode_hex(field: &'static str, s: &str) -> Result<Vec<u8>, ParamsError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| ParamsError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}

fn hex_field(params: &Map<String, Value>, name: &'static str) -> Result<Vec<u8>, ParamsError> {
    decode_hex(name, string_field(params, name)?)
}

fn recipient(params: &Map<String, Value>) -> Result<Option<Address>, ParamsError> {
    let bytes = hex_field(params, "to")?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Address::from_slice(&bytes)
        .map(Some)
        .map_err(|_| ParamsError::InvalidRecipient(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn transfer() -> Map<String, Value> {
        params(json!({
            "nonce": 0,
            "gasPrice": "1000000000",
            "gasLimit": "0x5208",
            "to": "0x0000000000000000000000000000000000000000",
            "value": 1_000_000_000u64,
            "data": ""
        }))
    }

    #[test]
    fn test_parse_transfer() {
        let tx = parse_transaction_params(&transfer()).unwrap();
        assert_eq!(tx.nonce, BigUint::from(0u32));
        assert_eq!(tx.gas_price, BigUint::from(1_000_000_000u64));
        assert_eq!(tx.gas_limit, BigUint::from(21_000u32));
        assert_eq!(tx.to, Some(Address::ZERO));
        assert_eq!(tx.value, BigUint::from(1_000_000_000u64));
        assert!(tx.data.is_empty());
    }

    #[test]
    fn test_parse_contract_creation() {
        for to in ["", "0x"] {
            let mut p = transfer();
            p.insert("to".to_string(), json!(to));
            p.insert("data".to_string(), json!("0x6080"));
            let tx = parse_transaction_params(&p).unwrap();
            assert!(tx.is_contract_creation());
            assert_eq!(tx.data, vec![0x60, 0x80]);
        }
    }

    #[test]
    fn test_parse_values_beyond_u64() {
        let mut p = transfer();
        p.insert(
            "value".to_string(),
            json!("115792089237316195423570985008687907853269984665640564039457584007913129639935"),
        );
        let tx = parse_transaction_params(&p).unwrap();
        assert_eq!(tx.value.bits(), 256);
    }

    #[test]
    fn test_missing_field() {
        let mut p = transfer();
        p.remove("gasLimit");
        assert_eq!(
            parse_transaction_params(&p),
            Err(ParamsError::Missing("gasLimit"))
        );
    }

    #[test]
    fn test_rejects_negative_and_fractional() {
        for bad in [json!(-1), json!(1.5), json!("-1"), json!("+1"), json!("1_000"), json!("0x")] {
            let mut p = transfer();
            p.insert("nonce".to_string(), bad);
            assert!(matches!(
                parse_transaction_params(&p),
                Err(ParamsError::InvalidInteger { field: "nonce", .. })
            ));
        }

        let mut p = transfer();
        p.insert("value".to_string(), json!(true));
        assert!(matches!(
            parse_transaction_params(&p),
            Err(ParamsError::InvalidType { field: "value", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_recipient_and_data() {
        let mut p = transfer();
        p.insert("to".to_string(), json!("0x0"));
        assert!(matches!(
            parse_transaction_params(&p),
            Err(ParamsError::InvalidHex { field: "to", .. })
        ));

        let mut p = transfer();
        p.insert("to".to_string(), json!("0x00"));
        assert_eq!(
            parse_transaction_params(&p),
            Err(ParamsError::InvalidRecipient(1))
        );

        let mut p = transfer();
        p.insert("data".to_string(), json!("0xzz"));
        assert!(matches!(
            parse_transaction_params(&p),
            Err(ParamsError::InvalidHex { field: "data", .. })
        ));

        let mut p = transfer();
        p.insert("to".to_string(), json!(5));
        assert!(matches!(
            parse_transaction_params(&p),
            Err(ParamsError::InvalidType { field: "to", .. })
        ));
    }
}
