//! The libsecp256k1 context and the scratch state shared by every call.

use std::ptr::NonNull;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{Mutex, MutexGuard};
use secp256k1_sys as ffi;
use tracing::debug;

use super::scratch::ScratchBuffer;
use super::{
    KeyBackend, COMPACT_SIGNATURE_SIZE, HASH_SIZE, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
use crate::error::{KeyError, Result};

static GLOBAL: Lazy<CryptoContext> = Lazy::new(|| {
    let ctx = CryptoContext::new();
    ctx.initialize();
    ctx
});

/// Owned pointer to a native context.
pub(super) struct ContextHandle(NonNull<ffi::Context>);

// libsecp256k1 contexts are read-only after creation; every primitive used
// here takes `*const Context`, so sharing the pointer across threads is sound.
unsafe impl Send for ContextHandle {}
unsafe impl Sync for ContextHandle {}

impl ContextHandle {
    fn create() -> Self {
        let raw = unsafe { ffi::secp256k1_context_create(ffi::SECP256K1_START_NONE) };
        Self(raw)
    }

    #[inline]
    pub(super) fn as_ptr(&self) -> *const ffi::Context {
        self.0.as_ptr()
    }
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        unsafe { ffi::secp256k1_context_destroy(self.0) }
    }
}

/// Buffers and native out-parameters reused across calls.
pub(super) struct Scratch {
    pub(super) secret_key: ScratchBuffer<SECRET_KEY_SIZE>,
    pub(super) msg_hash: ScratchBuffer<HASH_SIZE>,
    pub(super) public_key_out: ScratchBuffer<UNCOMPRESSED_PUBLIC_KEY_SIZE>,
    pub(super) signature_out: ScratchBuffer<COMPACT_SIGNATURE_SIZE>,
    /// Native public key handle (opaque 64-byte struct)
    pub(super) public_key: ffi::PublicKey,
    /// Native signature handle (opaque 64-byte struct)
    pub(super) signature: ffi::Signature,
    /// In/out length for public key serialization
    pub(super) out_len: usize,
}

impl Scratch {
    fn new() -> Self {
        Self {
            secret_key: ScratchBuffer::new("private key"),
            msg_hash: ScratchBuffer::new("message hash"),
            public_key_out: ScratchBuffer::new("serialized public key"),
            signature_out: ScratchBuffer::new("serialized signature"),
            // Both are only ever used as out-pointers before being read.
            public_key: unsafe { ffi::PublicKey::new() },
            signature: unsafe { ffi::Signature::new() },
            out_len: 0,
        }
    }
}

/// Exclusive access to an initialized context and its scratch state.
///
/// The validator, deriver and signer are implemented on this type; holding
/// one keeps every other caller of the same context waiting.
pub(crate) struct Session<'a> {
    pub(super) handle: &'a ContextHandle,
    pub(super) scratch: MutexGuard<'a, Scratch>,
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.scratch.secret_key.wipe();
        self.scratch.msg_hash.wipe();
    }
}

/// A native secp256k1 context plus the scratch buffers every operation uses.
///
/// Created uninitialized; [`CryptoContext::initialize`] must run before any
/// operation, otherwise operations fail with [`KeyError::NotInitialized`].
/// Calls through one context are serialized by an internal lock.
pub struct CryptoContext {
    handle: OnceCell<ContextHandle>,
    scratch: Mutex<Scratch>,
}

impl CryptoContext {
    /// Creates an uninitialized context.
    pub fn new() -> Self {
        Self {
            handle: OnceCell::new(),
            scratch: Mutex::new(Scratch::new()),
        }
    }

    /// Returns the process-wide context, initializing it on first use.
    pub fn global() -> &'static CryptoContext {
        &GLOBAL
    }

    /// Creates the native context. Runs at most once; later calls, including
    /// racing ones, return after the first has finished.
    pub fn initialize(&self) {
        self.handle.get_or_init(|| {
            debug!("Creating secp256k1 context");
            ContextHandle::create()
        });
    }

    /// Returns true once [`CryptoContext::initialize`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.handle.get().is_some()
    }

    pub(crate) fn session(&self) -> Result<Session<'_>> {
        let handle = self.handle.get().ok_or(KeyError::NotInitialized)?;
        Ok(Session {
            handle,
            scratch: self.scratch.lock(),
        })
    }
}

impl Default for CryptoContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBackend for CryptoContext {
    fn initialize(&self) {
        CryptoContext::initialize(self)
    }

    fn verify_secret_key(&self, scalar: &[u8]) -> Result<bool> {
        self.session()?.verify_secret_key(scalar)
    }

    fn derive_public_key(&self, scalar: &[u8], compressed: bool) -> Result<Vec<u8>> {
        self.session()?.derive_public_key(scalar, compressed)
    }

    fn sign_compact(&self, hash: &[u8], scalar: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE]> {
        self.session()?.sign_compact(hash, scalar)
    }
}
