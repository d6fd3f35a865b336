//! Strong type definitions shared by entries and wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Checkpoint schema variant.
///
/// Serialized as the upper-case discriminator used on the wire
/// (`"LEGACY"`, `"GLOBAL"`, `"STREAM"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateType {
    /// Schema-free blob.
    Legacy,
    /// One shared payload plus per-stream sub-states.
    Global,
    /// One independent entry per stream.
    Stream,
}

impl StateType {
    /// The wire discriminator for this type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StateType::Legacy => "LEGACY",
            StateType::Global => "GLOBAL",
            StateType::Stream => "STREAM",
        }
    }

    /// Parse a wire discriminator. Matching is exact.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "LEGACY" => Some(StateType::Legacy),
            "GLOBAL" => Some(StateType::Global),
            "STREAM" => Some(StateType::Stream),
            _ => None,
        }
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a stream by name and optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl StreamDescriptor {
    /// A descriptor without a namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// A descriptor inside `namespace`.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A 32-byte checkpoint fingerprint, computed by [`crate::StateWrapper::fingerprint`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckpointHash(pub [u8; 32]);

impl CheckpointHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for CheckpointHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckpointHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for CheckpointHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
