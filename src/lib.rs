//! # keysmith
//!
//! secp256k1 private key management on top of libsecp256k1.
//!
//! ## Architecture
//!
//! - `native`: Scratch buffers, the one-time initialized context, and the
//!   validate / derive / sign primitives
//! - `keys`: Private key entity, WIF codec, public key and signature types
//! - `worker`: Parallel batch key generation
//! - `config`: CLI configuration
//! - `logging`: Tracing subscriber setup

pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod native;
pub mod worker;

pub use config::Config;
pub use error::{KeyError, Result};
pub use keys::{CompactSignature, Network, PrivateKey, PublicKey};
pub use native::{CryptoContext, KeyBackend};
pub use worker::{BatchError, BatchGenerator};
