//! Binding layer over libsecp256k1.
//!
//! This module provides:
//! - Fixed-size scratch buffers passed to the native library
//! - A one-time initialized context that owns them
//! - Private key validation, public key derivation and deterministic signing
//!
//! Everything above this module talks to it through [`KeyBackend`].

mod context;
mod deriver;
mod scratch;
mod signer;
mod validator;

pub use context::CryptoContext;
pub use scratch::ScratchBuffer;

use crate::error::Result;

/// Private key scalar size.
pub const SECRET_KEY_SIZE: usize = 32;
/// Message hash size.
pub const HASH_SIZE: usize = 32;
/// SEC1 compressed public key size.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;
/// SEC1 uncompressed public key size.
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;
/// Compact `R || S` signature size.
pub const COMPACT_SIGNATURE_SIZE: usize = 64;

/// The primitive operations key management is built on.
pub trait KeyBackend: Send + Sync {
    /// Prepares the backend. Idempotent.
    fn initialize(&self);

    /// Returns whether `scalar` lies in `[1, n - 1]`.
    fn verify_secret_key(&self, scalar: &[u8]) -> Result<bool>;

    /// Derives and serializes the public key of a valid scalar.
    fn derive_public_key(&self, scalar: &[u8], compressed: bool) -> Result<Vec<u8>>;

    /// Signs a 32-byte hash, returning the compact low-S encoding.
    fn sign_compact(&self, hash: &[u8], scalar: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE]>;
}
