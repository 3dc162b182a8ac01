//! keysmith CLI
//!
//! Usage:
//!   keysmith generate -n 3                 # Three compressed mainnet keys
//!   keysmith -N testnet generate -u        # One uncompressed testnet key
//!   keysmith inspect <WIF>                 # Public key of a WIF key
//!   keysmith sign <WIF> <HASH_HEX>         # Compact signature over a hash

use std::error::Error;
use std::process;

use clap::Parser;

use keysmith::config::{parse_hash, Command};
use keysmith::logging::init_tracing;
use keysmith::{BatchGenerator, Config, PrivateKey};

fn main() {
    let config = Config::parse();

    if let Err(e) = init_tracing(&config.log) {
        eprintln!("Logging setup failed: {}", e);
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let version = config.wif_version();

    match &config.command {
        Command::Generate {
            count,
            uncompressed,
            ..
        } => {
            let generator = BatchGenerator::new(config.worker_count(), !uncompressed)?;
            let keys = generator.generate(*count)?;
            for (index, key) in keys.iter().enumerate() {
                print_key(key, version, index + 1)?;
            }
        }
        Command::Inspect { wif } => {
            let key = PrivateKey::from_wif_with_version(wif, version)?;
            print_key(&key, version, 1)?;
        }
        Command::Sign { wif, hash } => {
            let key = PrivateKey::from_wif_with_version(wif, version)?;
            let signature = key.sign(&parse_hash(hash)?)?;
            println!("{}", signature);
        }
    }

    Ok(())
}

fn print_key(key: &PrivateKey, version: u8, index: usize) -> Result<(), Box<dyn Error>> {
    println!("=== Key #{} ===", index);
    println!("WIF:        {}", key.to_wif_with_version(version));
    println!("Public Key: {}", key.public_key()?);
    println!("Compressed: {}", key.is_compressed());
    println!();
    Ok(())
}
