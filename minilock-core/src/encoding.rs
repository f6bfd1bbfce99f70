//! Encoding utilities — base64 and base58.
//!
//! miniLock uses two alphabets: standard Base64 (with padding) for every
//! byte field inside the JSON header, and Base58 with the Bitcoin
//! alphabet for human-shareable IDs. The serde adapters below make byte
//! fields serialize exactly the way Go's `encoding/json` renders
//! `[]byte`, which is what the reference containers carry.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::errors::MiniLockError;

/// Encode bytes to standard base64 (RFC 4648, with padding).
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64 to bytes.
///
/// # Errors
/// Returns `MiniLockError::BadEncoding` on invalid base64 input.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, MiniLockError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| MiniLockError::BadEncoding(format!("invalid base64: {e}")))
}

/// Encode bytes to Base58 (Bitcoin alphabet, as used by miniLock.io).
pub fn to_base58(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a Base58 string (Bitcoin alphabet) to bytes.
///
/// # Errors
/// Returns `MiniLockError::InvalidID` on characters outside the
/// alphabet. This decoder is only ever fed miniLock IDs.
pub fn from_base58(encoded: &str) -> Result<Vec<u8>, MiniLockError> {
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| MiniLockError::InvalidID(format!("invalid base58: {e}")))
}

/// Serde adapter: a byte field as a standard-base64 JSON string.
pub mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: a string-keyed map whose values are base64 byte blobs.
pub mod b64_map {
    use std::collections::HashMap;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(map: &HashMap<String, Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(map.iter().map(|(k, v)| (k, STANDARD.encode(v))))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(k, v)| Ok((k, STANDARD.decode(v).map_err(serde::de::Error::custom)?)))
            .collect()
    }
}
