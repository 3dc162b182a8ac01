//! Fixed-size byte regions handed to libsecp256k1.

use zeroize::Zeroize;

use crate::error::{KeyError, Result};

/// A fixed-capacity byte region dedicated to one role (private key,
/// message hash, serialized public key, serialized signature).
///
/// The buffer lives as long as its owning context and is reused across
/// calls, so every input goes through [`ScratchBuffer::load`], which only
/// accepts a full-size write.
pub struct ScratchBuffer<const N: usize> {
    /// Role name, used in length errors
    role: &'static str,
    bytes: [u8; N],
}

impl<const N: usize> ScratchBuffer<N> {
    /// Creates a zeroed buffer for the given role.
    pub const fn new(role: &'static str) -> Self {
        Self {
            role,
            bytes: [0u8; N],
        }
    }

    /// Overwrites the whole buffer with `input`.
    ///
    /// Fails without touching the buffer if `input` is not exactly `N` bytes.
    pub fn load(&mut self, input: &[u8]) -> Result<()> {
        if input.len() != N {
            return Err(KeyError::InvalidLength {
                what: self.role,
                expected: N,
                actual: input.len(),
            });
        }
        self.bytes.copy_from_slice(input);
        Ok(())
    }

    /// Returns a copy of the first `len` bytes.
    ///
    /// Callers pass the logical length of the last native write, so bytes
    /// left over from an earlier, longer write never escape.
    pub fn read_prefix(&self, len: usize) -> Result<Vec<u8>> {
        if len > N {
            return Err(KeyError::InvalidLength {
                what: self.role,
                expected: N,
                actual: len,
            });
        }
        Ok(self.bytes[..len].to_vec())
    }

    /// Address for native reads.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Address for native writes.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    /// Declared capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Zeroes the buffer.
    pub fn wipe(&mut self) {
        self.bytes.zeroize();
    }
}
