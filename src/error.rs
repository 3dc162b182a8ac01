//! Error types for key operations.

use thiserror::Error;

/// Errors that can occur during key operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Input byte count differs from the fixed size the operation needs.
    #[error("Invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The scalar is zero or not below the curve order.
    #[error("Invalid private key: scalar out of range")]
    InvalidPrivateKey,

    /// The WIF string is not valid base58check or carries a malformed payload.
    #[error("Invalid WIF: {0}")]
    InvalidWif(String),

    /// The WIF version byte does not match the expected network.
    #[error("WIF version mismatch: expected 0x{expected:02x}, got 0x{actual:02x}")]
    WifVersionMismatch { expected: u8, actual: u8 },

    /// An operation ran before the crypto context was initialized.
    #[error("Crypto context not initialized")]
    NotInitialized,

    /// A native primitive failed on input that had already been validated.
    #[error("Native operation failed: {0}")]
    NativeOperationFailed(&'static str),
}

impl KeyError {
    /// Returns false for errors that indicate a defect (call order or
    /// corrupted native state) rather than bad caller input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            KeyError::NotInitialized | KeyError::NativeOperationFailed(_)
        )
    }
}

/// Result alias for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;
