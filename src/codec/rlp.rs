//! Recursive Length Prefix (RLP) encoding
//!
//! Every value is either a byte string or a list of values. Each item is
//! length-prefixed and there is exactly one valid encoding per value:
//!
//! | first byte  | meaning                                          |
//! |-------------|--------------------------------------------------|
//! | 0x00..=0x7f | the byte itself (single-byte string)             |
//! | 0x80..=0xb7 | string of 0..=55 bytes, length = prefix - 0x80   |
//! | 0xb8..=0xbf | long string, next (prefix - 0xb7) bytes = length |
//! | 0xc0..=0xf7 | list with 0..=55 payload bytes                   |
//! | 0xf8..=0xff | long list, next (prefix - 0xf7) bytes = length   |
//!
//! Integers are written as their minimal big-endian bytes, so zero is the
//! empty string (0x80) and never 0x00.

use num_bigint::BigUint;
use thiserror::Error;

use crate::crypto::Address;

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
/// Payloads shorter than this use the single-byte length prefix
const SHORT_LIMIT: usize = 56;

/// Maximum list nesting accepted by the decoder
pub const MAX_DEPTH: usize = 16;

/// Errors produced while decoding RLP input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RlpError {
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("{0} trailing bytes after the top-level item")]
    TrailingBytes(usize),
    #[error("Single byte below 0x80 must not carry a length prefix")]
    NonCanonicalSingleByte,
    #[error("Payload shorter than 56 bytes written with a long length prefix")]
    NonCanonicalLength,
    #[error("Length prefix has leading zero bytes")]
    LeadingZeroLength,
    #[error("Declared length does not fit in memory")]
    LengthOverflow,
    #[error("List nesting deeper than {}", MAX_DEPTH)]
    TooDeep,
    #[error("Expected a byte string, found a list")]
    ExpectedBytes,
    #[error("Expected a list, found a byte string")]
    ExpectedList,
    #[error("Integer has leading zero bytes")]
    LeadingZeroInteger,
    #[error("Integer of {have} bytes exceeds {max} bytes")]
    IntegerTooLarge { have: usize, max: usize },
    #[error("Expected {expected} list items, found {have}")]
    WrongItemCount { expected: usize, have: usize },
}

// =============================================================================
// Encoding
// =============================================================================

/// A value with a canonical RLP encoding
pub trait Encodable {
    fn rlp_append(&self, out: &mut Vec<u8>);

    fn rlp_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.rlp_append(&mut out);
        out
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

fn append_length(len: usize, offset: u8, out: &mut Vec<u8>) {
    if len < SHORT_LIMIT {
        out.push(offset + len as u8);
    } else {
        let be = len.to_be_bytes();
        let len_bytes = trim_leading_zeros(&be);
        out.push(offset + (SHORT_LIMIT - 1) as u8 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

/// Append a byte string
pub fn append_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
        out.push(bytes[0]);
    } else {
        append_length(bytes.len(), STRING_OFFSET, out);
        out.extend_from_slice(bytes);
    }
}

/// Append a big-endian unsigned integer, dropping any leading zeros
pub fn append_uint(be_bytes: &[u8], out: &mut Vec<u8>) {
    append_bytes(trim_leading_zeros(be_bytes), out);
}

/// Encode a list from its items
pub fn encode_list(items: &[&dyn Encodable]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        item.rlp_append(&mut payload);
    }
    let mut out = Vec::with_capacity(payload.len() + 9);
    append_length(payload.len(), LIST_OFFSET, &mut out);
    out.extend_from_slice(&payload);
    out
}

impl Encodable for [u8] {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        append_bytes(self, out);
    }
}

impl Encodable for Vec<u8> {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        append_bytes(self, out);
    }
}

impl Encodable for str {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        append_bytes(self.as_bytes(), out);
    }
}

impl Encodable for u64 {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        append_uint(&self.to_be_bytes(), out);
    }
}

impl Encodable for BigUint {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        if self.bits() == 0 {
            append_bytes(&[], out);
        } else {
            append_bytes(&self.to_bytes_be(), out);
        }
    }
}

impl Encodable for Address {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        append_bytes(self.as_bytes(), out);
    }
}

/// `None` is the empty string (contract creation)
impl Encodable for Option<Address> {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        match self {
            Some(address) => address.rlp_append(out),
            None => append_bytes(&[], out),
        }
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        (**self).rlp_append(out);
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// A decoded item borrowing from the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    Bytes(&'a [u8]),
    List(Vec<Item<'a>>),
}

impl<'a> Item<'a> {
    pub fn as_bytes(&self) -> Result<&'a [u8], RlpError> {
        match self {
            Item::Bytes(b) => Ok(*b),
            Item::List(_) => Err(RlpError::ExpectedBytes),
        }
    }

    pub fn as_list(&self) -> Result<&[Item<'a>], RlpError> {
        match self {
            Item::List(items) => Ok(items.as_slice()),
            Item::Bytes(_) => Err(RlpError::ExpectedList),
        }
    }

    /// A list with exactly `n` items
    pub fn as_list_of(&self, n: usize) -> Result<&[Item<'a>], RlpError> {
        let items = self.as_list()?;
        if items.len() != n {
            return Err(RlpError::WrongItemCount {
                expected: n,
                have: items.len(),
            });
        }
        Ok(items)
    }

    /// Canonical integer bytes: no leading zeros
    fn uint_bytes(&self) -> Result<&'a [u8], RlpError> {
        let bytes = self.as_bytes()?;
        if bytes.first() == Some(&0) {
            return Err(RlpError::LeadingZeroInteger);
        }
        Ok(bytes)
    }

    pub fn as_biguint(&self) -> Result<BigUint, RlpError> {
        Ok(BigUint::from_bytes_be(self.uint_bytes()?))
    }

    pub fn as_u64(&self) -> Result<u64, RlpError> {
        let bytes = self.uint_bytes()?;
        if bytes.len() > 8 {
            return Err(RlpError::IntegerTooLarge {
                have: bytes.len(),
                max: 8,
            });
        }
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
    }

    /// An integer of at most `N` bytes, left-padded to exactly `N`
    pub fn as_uint_array<const N: usize>(&self) -> Result<[u8; N], RlpError> {
        let bytes = self.uint_bytes()?;
        if bytes.len() > N {
            return Err(RlpError::IntegerTooLarge {
                have: bytes.len(),
                max: N,
            });
        }
        let mut out = [0u8; N];
        out[N - bytes.len()..].copy_from_slice(bytes);
        Ok(out)
    }
}

impl Encodable for Item<'_> {
    fn rlp_append(&self, out: &mut Vec<u8>) {
        match self {
            Item::Bytes(b) => append_bytes(b, out),
            Item::List(items) => {
                let refs: Vec<&dyn Encodable> =
                    items.iter().map(|i| i as &dyn Encodable).collect();
                out.extend_from_slice(&encode_list(&refs));
            }
        }
    }
}

/// Decode exactly one item spanning the whole input
pub fn decode(input: &[u8]) -> Result<Item<'_>, RlpError> {
    let (item, used) = decode_item(input, 0)?;
    if used != input.len() {
        return Err(RlpError::TrailingBytes(input.len() - used));
    }
    Ok(item)
}

fn take(input: &[u8], start: usize, len: usize) -> Result<&[u8], RlpError> {
    let end = start.checked_add(len).ok_or(RlpError::LengthOverflow)?;
    input.get(start..end).ok_or(RlpError::UnexpectedEof)
}

/// Read a big-endian length of `len_of_len` bytes that must be >= 56
fn read_long_length(input: &[u8], len_of_len: usize) -> Result<usize, RlpError> {
    let bytes = take(input, 1, len_of_len)?;
    if bytes[0] == 0 {
        return Err(RlpError::LeadingZeroLength);
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let len = bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
    if len < SHORT_LIMIT {
        return Err(RlpError::NonCanonicalLength);
    }
    Ok(len)
}

/// Returns the item and the number of input bytes it occupied
fn decode_item(input: &[u8], depth: usize) -> Result<(Item<'_>, usize), RlpError> {
    let prefix = *input.first().ok_or(RlpError::UnexpectedEof)?;
    match prefix {
        0x00..=0x7f => Ok((Item::Bytes(&input[..1]), 1)),
        0x80..=0xb7 => {
            let len = (prefix - STRING_OFFSET) as usize;
            let payload = take(input, 1, len)?;
            if len == 1 && payload[0] < STRING_OFFSET {
                return Err(RlpError::NonCanonicalSingleByte);
            }
            Ok((Item::Bytes(payload), 1 + len))
        }
        0xb8..=0xbf => {
            let len_of_len = (prefix - 0xb7) as usize;
            let len = read_long_length(input, len_of_len)?;
            let payload = take(input, 1 + len_of_len, len)?;
            Ok((Item::Bytes(payload), 1 + len_of_len + len))
        }
        0xc0..=0xf7 => {
            let len = (prefix - LIST_OFFSET) as usize;
            let payload = take(input, 1, len)?;
            Ok((Item::List(decode_list_payload(payload, depth)?), 1 + len))
        }
        0xf8..=0xff => {
            let len_of_len = (prefix - 0xf7) as usize;
            let len = read_long_length(input, len_of_len)?;
            let payload = take(input, 1 + len_of_len, len)?;
            Ok((
                Item::List(decode_list_payload(payload, depth)?),
                1 + len_of_len + len,
            ))
        }
    }
}

fn decode_list_payload(mut payload: &[u8], depth: usize) -> Result<Vec<Item<'_>>, RlpError> {
    if depth >= MAX_DEPTH {
        return Err(RlpError::TooDeep);
    }
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (item, used) = decode_item(payload, depth + 1)?;
        items.push(item);
        payload = &payload[used..];
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc<T: Encodable + ?Sized>(v: &T) -> String {
        hex::encode(v.rlp_bytes())
    }

    #[test]
    fn test_encode_strings() {
        assert_eq!(enc("dog"), "83646f67");
        assert_eq!(enc(""), "80");
        assert_eq!(enc(&[0x00u8][..]), "00");
        assert_eq!(enc(&[0x0fu8][..]), "0f");
        assert_eq!(enc(&[0x7fu8][..]), "7f");
        assert_eq!(enc(&[0x80u8][..]), "8180");
    }

    #[test]
    fn test_encode_long_string() {
        let s = "Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        assert_eq!(s.len(), 56);
        let out = s.rlp_bytes();
        assert_eq!(&out[..2], &[0xb8, 0x38]);
        assert_eq!(&out[2..], s.as_bytes());

        let big = vec![0xaau8; 1024];
        let out = big.rlp_bytes();
        assert_eq!(&out[..3], &[0xb9, 0x04, 0x00]);
        assert_eq!(out.len(), 1027);
    }

    #[test]
    fn test_encode_integers() {
        assert_eq!(enc(&0u64), "80");
        assert_eq!(enc(&15u64), "0f");
        assert_eq!(enc(&127u64), "7f");
        assert_eq!(enc(&128u64), "8180");
        assert_eq!(enc(&1024u64), "820400");
        assert_eq!(enc(&BigUint::from(0u32)), "80");
        assert_eq!(enc(&BigUint::from(1024u32)), "820400");
    }

    #[test]
    fn test_encode_integer_wider_than_u64() {
        // 2^64 needs nine bytes
        let v = BigUint::from(u64::MAX) + BigUint::from(1u32);
        assert_eq!(enc(&v), "89010000000000000000");
    }

    #[test]
    fn test_encode_lists() {
        let empty: [&dyn Encodable; 0] = [];
        assert_eq!(hex::encode(encode_list(&empty)), "c0");
        assert_eq!(
            hex::encode(encode_list(&[&"cat", &"dog"])),
            "c88363617483646f67"
        );
    }

    #[test]
    fn test_encode_nested_empty_lists() {
        // [ [], [[]], [ [], [[]] ] ]
        let e = Item::List(vec![]);
        let one = Item::List(vec![e.clone()]);
        let two = Item::List(vec![e.clone(), one.clone()]);
        let all = Item::List(vec![e, one, two]);
        assert_eq!(hex::encode(all.rlp_bytes()), "c7c0c1c0c3c0c1c0");
    }

    #[test]
    fn test_encode_long_list() {
        let items: Vec<Vec<u8>> = (0..20).map(|_| b"abc".to_vec()).collect();
        let refs: Vec<&dyn Encodable> = items.iter().map(|i| i as &dyn Encodable).collect();
        let out = encode_list(&refs);
        // 20 * 4 = 80 payload bytes
        assert_eq!(&out[..2], &[0xf8, 80]);
        assert_eq!(out.len(), 82);
    }

    #[test]
    fn test_option_address() {
        let none: Option<Address> = None;
        assert_eq!(enc(&none), "80");
        let some = Some(Address::new([0x35; 20]));
        assert_eq!(enc(&some), format!("94{}", "35".repeat(20)));
    }

    #[test]
    fn test_decode_reencodes_identically() {
        let cases = [
            "80",
            "00",
            "83646f67",
            "c0",
            "c88363617483646f67",
            "c7c0c1c0c3c0c1c0",
            "820400",
        ];
        for case in cases {
            let bytes = hex::decode(case).unwrap();
            let item = decode(&bytes).unwrap();
            assert_eq!(hex::encode(item.rlp_bytes()), case);
        }
    }

    #[test]
    fn test_decode_long_forms() {
        let s = vec![0x61u8; 60];
        let encoded = s.rlp_bytes();
        assert_eq!(decode(&encoded).unwrap(), Item::Bytes(&s));

        let items: Vec<Vec<u8>> = (0..20).map(|_| b"abc".to_vec()).collect();
        let refs: Vec<&dyn Encodable> = items.iter().map(|i| i as &dyn Encodable).collect();
        let encoded = encode_list(&refs);
        assert_eq!(decode(&encoded).unwrap().as_list().unwrap().len(), 20);
    }

    #[test]
    fn test_decode_rejects_non_canonical() {
        // 0x05 wrapped in a prefix
        assert_eq!(decode(&[0x81, 0x05]), Err(RlpError::NonCanonicalSingleByte));
        // 3-byte string written with the long form
        assert_eq!(
            decode(&[0xb8, 0x03, 0x61, 0x62, 0x63]),
            Err(RlpError::NonCanonicalLength)
        );
        // length with a leading zero
        let mut long = vec![0xb9, 0x00, 0x38];
        long.extend(vec![0x61; 56]);
        assert_eq!(decode(&long), Err(RlpError::LeadingZeroLength));
        // short list written with the long form
        assert_eq!(decode(&[0xf8, 0x01, 0x80]), Err(RlpError::NonCanonicalLength));
    }

    #[test]
    fn test_decode_rejects_truncated_and_trailing() {
        assert_eq!(decode(&[]), Err(RlpError::UnexpectedEof));
        assert_eq!(decode(&[0x83, 0x64, 0x6f]), Err(RlpError::UnexpectedEof));
        assert_eq!(decode(&[0xc2, 0x80]), Err(RlpError::UnexpectedEof));
        assert_eq!(decode(&[0x80, 0x80]), Err(RlpError::TrailingBytes(1)));
    }

    #[test]
    fn test_decode_rejects_deep_nesting() {
        let mut bytes = vec![0xc0u8];
        for _ in 0..MAX_DEPTH + 1 {
            let mut outer = vec![0xc0 + bytes.len() as u8];
            outer.extend_from_slice(&bytes);
            bytes = outer;
        }
        assert_eq!(decode(&bytes), Err(RlpError::TooDeep));
    }

    #[test]
    fn test_integer_accessors() {
        let bytes = [0x82, 0x04, 0x00];
        let item = decode(&bytes).unwrap();
        assert_eq!(item.as_u64().unwrap(), 1024);
        assert_eq!(item.as_biguint().unwrap(), BigUint::from(1024u32));
        assert_eq!(item.as_uint_array::<4>().unwrap(), [0, 0, 4, 0]);
        assert!(matches!(
            item.as_uint_array::<1>(),
            Err(RlpError::IntegerTooLarge { have: 2, max: 1 })
        ));

        let zero_padded = [0x82, 0x00, 0x01];
        assert_eq!(
            decode(&zero_padded).unwrap().as_u64(),
            Err(RlpError::LeadingZeroInteger)
        );

        let empty = decode(&[0x80]).unwrap();
        assert_eq!(empty.as_u64().unwrap(), 0);
        assert_eq!(empty.as_biguint().unwrap(), BigUint::from(0u32));
    }

    #[test]
    fn test_item_kind_mismatch() {
        let list = decode(&[0xc0]).unwrap();
        assert_eq!(list.as_bytes(), Err(RlpError::ExpectedBytes));
        let bytes = decode(&[0x80]).unwrap();
        assert_eq!(bytes.as_list().map(|l| l.len()), Err(RlpError::ExpectedList));
        assert_eq!(
            list.as_list_of(2).map(|l| l.len()),
            Err(RlpError::WrongItemCount {
                expected: 2,
                have: 0
            })
        );
    }
}
