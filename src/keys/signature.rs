//! Compact ECDSA signature.

use std::fmt;

use crate::native::COMPACT_SIGNATURE_SIZE;

/// A 64-byte compact ECDSA signature: 32-byte R followed by 32-byte low S.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactSignature([u8; COMPACT_SIGNATURE_SIZE]);

impl CompactSignature {
    /// Wraps raw compact signature bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; COMPACT_SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; COMPACT_SIGNATURE_SIZE] {
        &self.0
    }

    /// The R component.
    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    /// The S component, always in the lower half of the curve order.
    pub fn s(&self) -> &[u8] {
        &self.0[32..]
    }

    /// Returns the signature as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature({})", self.to_hex())
    }
}

impl fmt::Display for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
