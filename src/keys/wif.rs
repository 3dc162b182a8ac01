//! Wallet Import Format (WIF) codec.
//!
//! Layout before base58check: `version || scalar(32) [|| 0x01]`, where the
//! trailing marker is present iff the key is compressed.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use crate::error::{KeyError, Result};
use crate::native::SECRET_KEY_SIZE;

/// Suffix byte marking a compressed key.
pub const COMPRESSED_MARKER: u8 = 0x01;

/// Networks with a well-known WIF version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Version byte 0x80
    #[default]
    Mainnet,
    /// Version byte 0xef (testnet, signet, regtest)
    Testnet,
}

impl Network {
    /// Returns the WIF version byte.
    pub const fn wif_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x80,
            Network::Testnet => 0xef,
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" | "regtest" | "signet" => Ok(Network::Testnet),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// Encodes a scalar as a WIF string.
pub(crate) fn encode(version: u8, scalar: &[u8; SECRET_KEY_SIZE], compressed: bool) -> String {
    let mut payload = Zeroizing::new(Vec::with_capacity(SECRET_KEY_SIZE + 2));
    payload.push(version);
    payload.extend_from_slice(scalar);
    if compressed {
        payload.push(COMPRESSED_MARKER);
    }
    bs58::encode(payload.as_slice()).with_check().into_string()
}

/// Decodes a WIF string into its scalar and compression flag.
///
/// The version byte is checked before the payload, so a foreign-network
/// string reports [`KeyError::WifVersionMismatch`] whatever its payload.
/// The scalar is not range-checked here.
pub(crate) fn decode(wif: &str, expected_version: u8) -> Result<(Zeroizing<[u8; SECRET_KEY_SIZE]>, bool)> {
    let data = Zeroizing::new(
        bs58::decode(wif)
            .with_check(None)
            .into_vec()
            .map_err(|e| KeyError::InvalidWif(e.to_string()))?,
    );

    let (&version, payload) = data
        .split_first()
        .ok_or_else(|| KeyError::InvalidWif("empty payload".into()))?;

    if version != expected_version {
        return Err(KeyError::WifVersionMismatch {
            expected: expected_version,
            actual: version,
        });
    }

    let compressed = match payload.len() {
        SECRET_KEY_SIZE => false,
        len if len == SECRET_KEY_SIZE + 1 => {
            let marker = payload[SECRET_KEY_SIZE];
            if marker != COMPRESSED_MARKER {
                return Err(KeyError::InvalidWif(format!(
                    "bad compression marker 0x{:02x}",
                    marker
                )));
            }
            true
        }
        len => {
            return Err(KeyError::InvalidWif(format!(
                "payload is {} bytes, expected {} or {}",
                len,
                SECRET_KEY_SIZE,
                SECRET_KEY_SIZE + 1
            )))
        }
    };

    let mut scalar = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
    scalar.copy_from_slice(&payload[..SECRET_KEY_SIZE]);
    Ok((scalar, compressed))
}
