//! Key management built on the native binding.
//!
//! This module provides:
//! - `PrivateKey`: validated scalar, WIF codec, cached public key, signing
//! - `PublicKey` and `CompactSignature` value types
//! - WIF network presets

mod private_key;
mod public_key;
mod signature;
pub mod wif;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::CompactSignature;
pub use wif::Network;
