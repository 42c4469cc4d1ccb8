//! CBOR binding for persisted artifacts.
//!
//! Encoded buffers start with the self-describing tag 55799
//! (`0xD9 0xD9 0xF7`) so [`crate::sniff_artifact`] recognises them without
//! extra context. Decoding accepts buffers with or without the tag.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::encoding::CBOR_TAG;

/// Error produced by CBOR encoding and decoding operations.
#[derive(Debug)]
pub enum CborError {
    /// Encoding the value to CBOR bytes failed.
    Encode(String),
    /// Decoding the CBOR bytes failed, or they did not match the target type.
    Decode(String),
}

impl std::fmt::Display for CborError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CborError::Encode(msg) => write!(f, "CBOR encode error: {msg}"),
            CborError::Decode(msg) => write!(f, "CBOR decode error: {msg}"),
        }
    }
}

impl std::error::Error for CborError {}

/// Encodes `value` to tagged CBOR bytes.
pub fn encode_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CborError> {
    let mut buf = CBOR_TAG.to_vec();
    ciborium::into_writer(value, &mut buf).map_err(|e| CborError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Decodes CBOR bytes, stripping the self-describing tag when present.
pub fn decode_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CborError> {
    let body = bytes.strip_prefix(CBOR_TAG.as_slice()).unwrap_or(bytes);
    ciborium::from_reader(body).map_err(|e| CborError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn encoded_bytes_carry_the_tag() {
        let bytes = encode_cbor(&vec![1u32, 2, 3]).expect("encode");
        assert!(bytes.starts_with(&CBOR_TAG));
    }

    #[test]
    fn untagged_input_is_accepted() {
        let mut raw = Vec::new();
        ciborium::into_writer(&vec![7u64, 8], &mut raw).expect("raw encode");
        let decoded: Vec<u64> = decode_cbor(&raw).expect("decode");
        assert_eq!(decoded, vec![7, 8]);
    }

    #[test]
    fn tagged_input_decodes() {
        let mut map = BTreeMap::new();
        map.insert("gene".to_owned(), 4usize);
        let bytes = encode_cbor(&map).expect("encode");
        let back: BTreeMap<String, usize> = decode_cbor(&bytes).expect("decode");
        assert_eq!(back, map);
    }

    #[test]
    fn type_mismatch_is_a_decode_error() {
        let bytes = encode_cbor(&"text").expect("encode");
        let err = decode_cbor::<Vec<u32>>(&bytes).expect_err("mismatch");
        assert!(matches!(err, CborError::Decode(_)));
    }
}
