//! Private key range check.

use secp256k1_sys as ffi;

use super::context::Session;
use crate::error::Result;

impl Session<'_> {
    /// Returns whether `scalar` is a valid private key, i.e. `1 <= scalar < n`.
    ///
    /// An out-of-range scalar is an ordinary `Ok(false)`; only a wrong input
    /// length is an error.
    pub(crate) fn verify_secret_key(&mut self, scalar: &[u8]) -> Result<bool> {
        let ctx = self.handle.as_ptr();
        let scratch = &mut *self.scratch;

        scratch.secret_key.load(scalar)?;
        let status = unsafe { ffi::secp256k1_ec_seckey_verify(ctx, scratch.secret_key.as_ptr()) };

        Ok(status == 1)
    }
}
