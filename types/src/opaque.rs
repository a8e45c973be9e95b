//! Caller-held opaque values.
//!
//! Metadata and credentials arrive already encoded (possibly encrypted) by the
//! caller. The registry stores and returns them verbatim and defines no
//! operations on their contents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque byte blob. Serialized as a lowercase hex string.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OpaqueValue(Vec<u8>);

impl OpaqueValue {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.0[..self.0.len().min(4)];
        write!(f, "OpaqueValue({}, {} bytes)", hex::encode(head), self.0.len())
    }
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl TryFrom<String> for OpaqueValue {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        hex::decode(s.trim_start_matches("0x")).map(Self)
    }
}

impl From<OpaqueValue> for String {
    fn from(v: OpaqueValue) -> Self {
        hex::encode(v.0)
    }
}

impl From<&[u8]> for OpaqueValue {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_hex_string() {
        let v = OpaqueValue::new(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"deadbeef\"");
        let back: OpaqueValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn accepts_0x_prefix() {
        let v: OpaqueValue = serde_json::from_str("\"0x0102\"").unwrap();
        assert_eq!(v.as_bytes(), &[1, 2]);
    }

    #[test]
    fn rejects_non_hex() {
        assert!(serde_json::from_str::<OpaqueValue>("\"zz\"").is_err());
    }

    #[test]
    fn debug_truncates_contents() {
        let v = OpaqueValue::new(vec![1u8; 64]);
        assert_eq!(format!("{v:?}"), "OpaqueValue(01010101, 64 bytes)");
    }
}
