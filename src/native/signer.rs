//! Deterministic ECDSA signing.

use std::ptr;

use secp256k1_sys as ffi;
use tracing::error;

use super::context::Session;
use super::COMPACT_SIGNATURE_SIZE;
use crate::error::{KeyError, Result};

impl Session<'_> {
    /// Signs a 32-byte `hash` with an already validated `scalar` and returns
    /// the compact `R || S` encoding.
    ///
    /// No nonce function or nonce data is passed, so the library uses its
    /// default RFC6979 nonces: equal inputs always give equal signatures.
    /// S is always in the lower half of the order.
    pub(crate) fn sign_compact(
        &mut self,
        hash: &[u8],
        scalar: &[u8],
    ) -> Result<[u8; COMPACT_SIGNATURE_SIZE]> {
        let ctx = self.handle.as_ptr();
        let scratch = &mut *self.scratch;

        scratch.msg_hash.load(hash)?;
        scratch.secret_key.load(scalar)?;

        let signed = unsafe {
            ffi::secp256k1_ecdsa_sign(
                ctx,
                &mut scratch.signature,
                scratch.msg_hash.as_ptr(),
                scratch.secret_key.as_ptr(),
                None,
                ptr::null(),
            )
        };
        if signed != 1 {
            error!("secp256k1_ecdsa_sign rejected a validated scalar");
            return Err(KeyError::NativeOperationFailed("ecdsa_sign"));
        }

        let serialized = unsafe {
            ffi::secp256k1_ecdsa_signature_serialize_compact(
                ctx,
                scratch.signature_out.as_mut_ptr(),
                &scratch.signature,
            )
        };
        if serialized != 1 {
            error!("secp256k1_ecdsa_signature_serialize_compact failed");
            return Err(KeyError::NativeOperationFailed("ecdsa_signature_serialize_compact"));
        }

        let mut out = [0u8; COMPACT_SIGNATURE_SIZE];
        out.copy_from_slice(&scratch.signature_out.read_prefix(COMPACT_SIGNATURE_SIZE)?);
        Ok(out)
    }
}
