//! Runtime configuration for the keysmith CLI.

use clap::{Parser, Subcommand};

use crate::keys::Network;
use crate::logging::DEFAULT_FILTER;
use crate::native::HASH_SIZE;

/// secp256k1 private key tool: generate, inspect and sign with WIF keys
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Network whose WIF version byte is used: mainnet or testnet
    #[arg(short = 'N', long, default_value = "mainnet", global = true)]
    pub network: Network,

    /// Explicit WIF version byte, overrides --network (e.g. 0xb0 or 176)
    #[arg(long, value_parser = parse_version_byte, global = true)]
    pub version_byte: Option<u8>,

    /// Log filter, RUST_LOG takes precedence
    #[arg(long, default_value = DEFAULT_FILTER, global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new private keys
    Generate {
        /// Number of keys to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Use the 65-byte public key encoding
        #[arg(short = 'u', long, default_value = "false")]
        uncompressed: bool,

        /// Number of worker threads (default: number of CPU cores)
        #[arg(short = 'w', long)]
        workers: Option<usize>,
    },

    /// Show the public key of a WIF private key
    Inspect {
        /// WIF-encoded private key
        wif: String,
    },

    /// Sign a 32-byte hash with a WIF private key
    Sign {
        /// WIF-encoded private key
        wif: String,

        /// Hash to sign, 64 hex characters
        hash: String,
    },
}

impl Config {
    /// Returns the WIF version byte in effect.
    pub fn wif_version(&self) -> u8 {
        self.version_byte
            .unwrap_or_else(|| self.network.wif_version())
    }

    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        match &self.command {
            Command::Generate {
                workers: Some(workers),
                ..
            } => *workers,
            _ => num_cpus::get(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.command {
            Command::Generate { count, workers, .. } => {
                if *count == 0 {
                    return Err(ConfigError::InvalidCount);
                }
                if *workers == Some(0) {
                    return Err(ConfigError::InvalidWorkers);
                }
            }
            Command::Sign { hash, .. } => {
                parse_hash(hash)?;
            }
            Command::Inspect { .. } => {}
        }
        Ok(())
    }
}

/// Decodes a hex hash, accepting an optional 0x prefix.
pub fn parse_hash(hash: &str) -> Result<Vec<u8>, ConfigError> {
    let digits = hash.strip_prefix("0x").unwrap_or(hash);
    let bytes = hex::decode(digits).map_err(|e| ConfigError::InvalidHash(e.to_string()))?;
    if bytes.len() != HASH_SIZE {
        return Err(ConfigError::InvalidHash(format!(
            "expected {} bytes, got {}",
            HASH_SIZE,
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn parse_version_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("Invalid version byte '{}': {}", s, e))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Key count must be at least 1")]
    InvalidCount,

    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("Invalid hash: {0}")]
    InvalidHash(String),
}
