//! secp256k1 private key entity.

use std::fmt;

use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use super::wif::{self, Network};
use super::{CompactSignature, PublicKey};
use crate::error::{KeyError, Result};
use crate::native::{CryptoContext, KeyBackend, HASH_SIZE, SECRET_KEY_SIZE};

/// A validated private key scalar plus its public key compression preference.
///
/// Immutable after construction. The serialized public key is derived on
/// first access and cached; concurrent first reads derive it once.
/// The scalar is zeroized on drop.
///
/// Every operation has a convenience form that runs on
/// [`CryptoContext::global`] and an `_in` form taking any [`KeyBackend`].
#[derive(Clone)]
pub struct PrivateKey {
    /// Big-endian scalar in `[1, n - 1]`
    scalar: [u8; SECRET_KEY_SIZE],
    /// Whether the public key serializes to 33 bytes
    compressed: bool,
    /// Serialized public key, filled on first read
    public_key: OnceCell<PublicKey>,
}

impl PrivateKey {
    /// Creates a key from 32 big-endian bytes.
    ///
    /// # Errors
    /// - [`KeyError::InvalidLength`] if `bytes` is not 32 bytes long
    /// - [`KeyError::InvalidPrivateKey`] if the scalar is 0 or not below the order
    pub fn from_bytes(bytes: &[u8], compressed: bool) -> Result<Self> {
        Self::from_bytes_in(CryptoContext::global(), bytes, compressed)
    }

    /// Same as [`PrivateKey::from_bytes`] on an explicit backend.
    pub fn from_bytes_in<B>(backend: &B, bytes: &[u8], compressed: bool) -> Result<Self>
    where
        B: KeyBackend + ?Sized,
    {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(KeyError::InvalidLength {
                what: "private key",
                expected: SECRET_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        if !backend.verify_secret_key(bytes)? {
            return Err(KeyError::InvalidPrivateKey);
        }

        let mut scalar = [0u8; SECRET_KEY_SIZE];
        scalar.copy_from_slice(bytes);
        Ok(Self::from_valid(scalar, compressed))
    }

    /// Decodes a mainnet WIF string.
    pub fn from_wif(wif: &str) -> Result<Self> {
        Self::from_wif_with_version(wif, Network::default().wif_version())
    }

    /// Decodes a WIF string whose version byte must equal `version`.
    ///
    /// # Errors
    /// - [`KeyError::InvalidWif`] on bad base58check or a malformed payload
    /// - [`KeyError::WifVersionMismatch`] if the version byte differs
    /// - [`KeyError::InvalidPrivateKey`] if the scalar is out of range
    pub fn from_wif_with_version(wif: &str, version: u8) -> Result<Self> {
        Self::from_wif_in(CryptoContext::global(), wif, version)
    }

    /// Same as [`PrivateKey::from_wif_with_version`] on an explicit backend.
    pub fn from_wif_in<B>(backend: &B, wif: &str, version: u8) -> Result<Self>
    where
        B: KeyBackend + ?Sized,
    {
        let (scalar, compressed) = wif::decode(wif, version)?;
        Self::from_bytes_in(backend, scalar.as_slice(), compressed)
    }

    /// Generates a new random compressed key from the OS random source.
    pub fn generate() -> Result<Self> {
        Self::generate_with_compression(true)
    }

    /// Generates a new random key from the OS random source.
    pub fn generate_with_compression(compressed: bool) -> Result<Self> {
        Self::generate_in(CryptoContext::global(), &mut OsRng, compressed)
    }

    /// Generates a key from `rng`, redrawing until the scalar is in range.
    pub fn generate_in<B, R>(backend: &B, rng: &mut R, compressed: bool) -> Result<Self>
    where
        B: KeyBackend + ?Sized,
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut candidate = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        loop {
            rng.fill_bytes(&mut candidate[..]);
            if backend.verify_secret_key(&candidate[..])? {
                debug!(compressed, "Generated private key");
                return Ok(Self::from_valid(*candidate, compressed));
            }
            debug!("Random scalar out of range, redrawing");
        }
    }

    fn from_valid(scalar: [u8; SECRET_KEY_SIZE], compressed: bool) -> Self {
        Self {
            scalar,
            compressed,
            public_key: OnceCell::new(),
        }
    }

    /// Returns the serialized public key, deriving it on first call.
    pub fn public_key(&self) -> Result<&PublicKey> {
        self.public_key_in(CryptoContext::global())
    }

    /// Same as [`PrivateKey::public_key`] on an explicit backend.
    ///
    /// Once cached, the backend is not consulted again.
    pub fn public_key_in<B>(&self, backend: &B) -> Result<&PublicKey>
    where
        B: KeyBackend + ?Sized,
    {
        self.public_key.get_or_try_init(|| {
            backend
                .derive_public_key(&self.scalar, self.compressed)
                .map(PublicKey::from_serialized)
        })
    }

    /// Returns true if the public key has already been derived.
    pub fn has_cached_public_key(&self) -> bool {
        self.public_key.get().is_some()
    }

    /// Signs a 32-byte hash with RFC6979 nonces.
    ///
    /// # Errors
    /// [`KeyError::InvalidLength`] if `hash` is not 32 bytes long.
    pub fn sign(&self, hash: &[u8]) -> Result<CompactSignature> {
        self.sign_in(CryptoContext::global(), hash)
    }

    /// Same as [`PrivateKey::sign`] on an explicit backend.
    pub fn sign_in<B>(&self, backend: &B, hash: &[u8]) -> Result<CompactSignature>
    where
        B: KeyBackend + ?Sized,
    {
        if hash.len() != HASH_SIZE {
            return Err(KeyError::InvalidLength {
                what: "message hash",
                expected: HASH_SIZE,
                actual: hash.len(),
            });
        }
        backend
            .sign_compact(hash, &self.scalar)
            .map(CompactSignature::from_bytes)
    }

    /// Encodes the key as a mainnet WIF string.
    pub fn to_wif(&self) -> String {
        self.to_wif_with_version(Network::default().wif_version())
    }

    /// Encodes the key as a WIF string with the given version byte.
    pub fn to_wif_with_version(&self, version: u8) -> String {
        wif::encode(version, &self.scalar, self.compressed)
    }

    /// Returns the scalar bytes.
    pub fn secret_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.scalar
    }

    /// Returns the scalar as a hex string (without 0x prefix).
    pub fn secret_hex(&self) -> String {
        hex::encode(self.scalar)
    }

    /// Returns the compression preference.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("compressed", &self.compressed)
            .field("public_key", &self.public_key.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use super::*;
    use crate::native::COMPACT_SIGNATURE_SIZE;

    /// Counts calls into a real context.
    struct CountingBackend {
        inner: CryptoContext,
        verifications: AtomicUsize,
        derivations: AtomicUsize,
    }

    impl CountingBackend {
        fn new() -> Self {
            let inner = CryptoContext::new();
            inner.initialize();
            Self {
                inner,
                verifications: AtomicUsize::new(0),
                derivations: AtomicUsize::new(0),
            }
        }
    }

    impl KeyBackend for CountingBackend {
        fn initialize(&self) {
            self.inner.initialize()
        }

        fn verify_secret_key(&self, scalar: &[u8]) -> Result<bool> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            self.inner.verify_secret_key(scalar)
        }

        fn derive_public_key(&self, scalar: &[u8], compressed: bool) -> Result<Vec<u8>> {
            self.derivations.fetch_add(1, Ordering::SeqCst);
            self.inner.derive_public_key(scalar, compressed)
        }

        fn sign_compact(&self, hash: &[u8], scalar: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE]> {
            self.inner.sign_compact(hash, scalar)
        }
    }

    /// Hands out scripted 32-byte blocks.
    struct ScriptedRng {
        blocks: Vec<[u8; 32]>,
        next: usize,
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let block = self.blocks[self.next];
            self.next += 1;
            dest.copy_from_slice(&block[..dest.len()]);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ScriptedRng {}

    fn one() -> [u8; 32] {
        let mut b = [0u8; 32];
        b[31] = 1;
        b
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        for len in [0usize, 31, 33] {
            // All-zero input would also be out of range; length must win
            let err = PrivateKey::from_bytes(&vec![0u8; len], true).unwrap_err();
            assert_eq!(
                err,
                KeyError::InvalidLength {
                    what: "private key",
                    expected: 32,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn test_from_bytes_out_of_range() {
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32], true).unwrap_err(),
            KeyError::InvalidPrivateKey
        );
        assert_eq!(
            PrivateKey::from_bytes(&[0xff; 32], false).unwrap_err(),
            KeyError::InvalidPrivateKey
        );
    }

    #[test]
    fn test_uninitialized_backend() {
        let ctx = CryptoContext::new();
        assert_eq!(
            PrivateKey::from_bytes_in(&ctx, &one(), true).unwrap_err(),
            KeyError::NotInitialized
        );
    }

    #[test]
    fn test_sign_known_vector() {
        let key = PrivateKey::from_bytes(&one(), true).unwrap();
        let hash: Vec<u8> = (0u8..32).collect();
        let sig = key.sign(&hash).unwrap();
        assert_eq!(
            sig.to_hex(),
            "a951b0cf98bd51c614c802a65a418fa42482dc5c45c9394e39c0d98773c51cd5\
             30104fdc36d91582b5757e1de73d982e803cc14d75e82c65daf924e38d27d834"
        );
        assert_eq!(key.sign(&hash).unwrap(), sig);
    }

    #[test]
    fn test_sign_rejects_bad_hash_length() {
        let key = PrivateKey::from_bytes(&one(), true).unwrap();
        assert!(matches!(
            key.sign(&[0u8; 33]),
            Err(KeyError::InvalidLength { actual: 33, .. })
        ));
    }

    #[test]
    fn test_signature_verifies_against_public_key() {
        let secp = secp256k1::Secp256k1::verification_only();
        let key = PrivateKey::generate().unwrap();
        let hash = [0x24u8; 32];
        let sig = key.sign(&hash).unwrap();

        let pk = secp256k1::PublicKey::from_slice(key.public_key().unwrap().as_bytes()).unwrap();
        let sig = secp256k1::ecdsa::Signature::from_compact(sig.as_bytes()).unwrap();
        secp.verify_ecdsa(&secp256k1::Message::from_digest(hash), &sig, &pk)
            .unwrap();
    }

    #[test]
    fn test_public_key_cached() {
        let backend = CountingBackend::new();
        let key = PrivateKey::from_bytes_in(&backend, &one(), true).unwrap();
        assert!(!key.has_cached_public_key());

        let first = key.public_key_in(&backend).unwrap().clone();
        let second = key.public_key_in(&backend).unwrap();

        assert_eq!(&first, second);
        assert!(key.has_cached_public_key());
        assert_eq!(backend.derivations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_public_key_cached_across_threads() {
        let backend = CountingBackend::new();
        let key = PrivateKey::from_bytes_in(&backend, &[0x33; 32], false).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| key.public_key_in(&backend).unwrap().clone()))
                .collect();
            let keys: Vec<PublicKey> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert!(keys.windows(2).all(|w| w[0] == w[1]));
            assert_eq!(keys[0].as_bytes().len(), 65);
        });

        assert_eq!(backend.derivations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_generate_redraws_out_of_range() {
        let backend = CountingBackend::new();
        let mut rng = ScriptedRng {
            blocks: vec![[0u8; 32], [0xff; 32], [0x42; 32]],
            next: 0,
        };

        let key = PrivateKey::generate_in(&backend, &mut rng, true).unwrap();

        assert_eq!(key.secret_bytes(), &[0x42; 32]);
        assert!(key.is_compressed());
        assert_eq!(backend.verifications.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_generate_distinct_and_valid() {
        let a = PrivateKey::generate().unwrap();
        let b = PrivateKey::generate_with_compression(false).unwrap();
        assert_ne!(a.secret_bytes(), b.secret_bytes());
        assert!(a.is_compressed());
        assert!(!b.is_compressed());

        let ctx = CryptoContext::global();
        assert!(ctx.verify_secret_key(a.secret_bytes()).unwrap());
        assert!(ctx.verify_secret_key(b.secret_bytes()).unwrap());
    }

    #[test]
    fn test_known_wif() {
        let key = PrivateKey::from_wif("5JYkZjmN7PVMjJUfJWfRFwtuXTGB439XV6faajeHPAM9Z2PT2R3").unwrap();
        assert!(!key.is_compressed());
        assert_eq!(
            key.public_key().unwrap().to_hex(),
            "042e58afe51f9ed8ad3cc7897f634d881fdbe49a81564629ded8156bebd2ffd1af\
             191923a2964c177f5b5923ae500fca49e99492d534aa3759d6b25a8bc971b133"
        );

        let compressed = PrivateKey::from_bytes(key.secret_bytes(), true).unwrap();
        assert_eq!(
            compressed.public_key().unwrap().to_hex(),
            "032e58afe51f9ed8ad3cc7897f634d881fdbe49a81564629ded8156bebd2ffd1af"
        );
    }

    #[test]
    fn test_wif_version_mismatch() {
        let testnet = "cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy";
        assert_eq!(
            PrivateKey::from_wif(testnet).unwrap_err(),
            KeyError::WifVersionMismatch {
                expected: 0x80,
                actual: 0xef
            }
        );

        let key = PrivateKey::from_wif_with_version(testnet, Network::Testnet.wif_version()).unwrap();
        assert!(key.is_compressed());
        assert_eq!(key.to_wif_with_version(0xef), testnet);

        // Override that matches neither preset
        assert!(matches!(
            PrivateKey::from_wif_with_version(testnet, 0xb0),
            Err(KeyError::WifVersionMismatch { expected: 0xb0, .. })
        ));
    }

    #[test]
    fn test_wif_with_zero_scalar() {
        let mut bytes = vec![0x80];
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(0x01);
        let wif = bs58::encode(bytes).with_check().into_string();
        assert_eq!(
            PrivateKey::from_wif(&wif).unwrap_err(),
            KeyError::InvalidPrivateKey
        );
    }

    #[test]
    fn test_debug_redacts_scalar() {
        let key = PrivateKey::from_bytes(&[0xab; 32], true).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("ab"));
        assert!(rendered.contains("compressed: true"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_wif_round_trip(bytes in any::<[u8; 32]>(), compressed in any::<bool>(), version in any::<u8>()) {
            let key = PrivateKey::from_bytes(&bytes, compressed);
            prop_assume!(key.is_ok());
            let key = key.unwrap();

            let decoded = PrivateKey::from_wif_with_version(&key.to_wif_with_version(version), version).unwrap();
            prop_assert_eq!(decoded.secret_bytes(), key.secret_bytes());
            prop_assert_eq!(decoded.is_compressed(), compressed);
        }
    }
}
