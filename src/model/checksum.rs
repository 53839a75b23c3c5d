//! BLAKE3 checksum guarding opaque record payloads

use std::fmt;

/// A 32-byte BLAKE3 digest of a stored payload
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    /// Width of the digest in bytes
    pub const LEN: usize = 32;

    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Checksum(bytes)
    }

    /// Checksum arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        Checksum(*blake3::hash(data).as_bytes())
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 7 hex chars, for display
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Check `data` against this checksum
    pub fn verify(&self, data: &[u8]) -> bool {
        Checksum::digest(data) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.short())
    }
}
