//! Public key derivation and serialization.

use secp256k1_sys as ffi;
use tracing::error;

use super::context::Session;
use super::{COMPRESSED_PUBLIC_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use crate::error::{KeyError, Result};

impl Session<'_> {
    /// Computes the public key for an already validated `scalar` and returns
    /// its 33-byte (compressed) or 65-byte (uncompressed) SEC1 encoding.
    pub(crate) fn derive_public_key(&mut self, scalar: &[u8], compressed: bool) -> Result<Vec<u8>> {
        let ctx = self.handle.as_ptr();
        let scratch = &mut *self.scratch;

        scratch.secret_key.load(scalar)?;
        let created = unsafe {
            ffi::secp256k1_ec_pubkey_create(ctx, &mut scratch.public_key, scratch.secret_key.as_ptr())
        };
        if created != 1 {
            error!("secp256k1_ec_pubkey_create rejected a validated scalar");
            return Err(KeyError::NativeOperationFailed("ec_pubkey_create"));
        }

        let (len, flags) = if compressed {
            (COMPRESSED_PUBLIC_KEY_SIZE, ffi::SECP256K1_SER_COMPRESSED)
        } else {
            (UNCOMPRESSED_PUBLIC_KEY_SIZE, ffi::SECP256K1_SER_UNCOMPRESSED)
        };

        scratch.out_len = scratch.public_key_out.capacity();
        let serialized = unsafe {
            ffi::secp256k1_ec_pubkey_serialize(
                ctx,
                scratch.public_key_out.as_mut_ptr(),
                &mut scratch.out_len,
                &scratch.public_key,
                flags,
            )
        };
        if serialized != 1 || scratch.out_len != len {
            error!(
                written = scratch.out_len,
                expected = len,
                "secp256k1_ec_pubkey_serialize failed"
            );
            return Err(KeyError::NativeOperationFailed("ec_pubkey_serialize"));
        }

        // Only the bytes written by this call; an earlier 65-byte write
        // must not leak into a 33-byte result.
        scratch.public_key_out.read_prefix(len)
    }
}
