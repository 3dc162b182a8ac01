//! Worker pool management.

use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::KeyError;
use crate::keys::PrivateKey;

/// Errors that can occur during batch generation.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Worker pool initialization failed: {0}")]
    PoolInit(String),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Generates private keys on a dedicated pool of worker threads.
pub struct BatchGenerator {
    /// Number of workers
    num_workers: usize,
    /// Compression preference for generated keys
    compressed: bool,
    /// Worker threads
    pool: ThreadPool,
}

impl BatchGenerator {
    /// Creates a generator with `num_workers` threads.
    pub fn new(num_workers: usize, compressed: bool) -> Result<Self, BatchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|id| format!("keysmith-worker-{}", id))
            .build()
            .map_err(|e| BatchError::PoolInit(e.to_string()))?;

        Ok(Self {
            num_workers,
            compressed,
            pool,
        })
    }

    /// Generates `count` keys with their public keys already derived.
    pub fn generate(&self, count: usize) -> Result<Vec<PrivateKey>, BatchError> {
        let compressed = self.compressed;
        let start = Instant::now();

        let keys = self.pool.install(|| {
            (0..count)
                .into_par_iter()
                .map(|_| {
                    let key = PrivateKey::generate_with_compression(compressed)?;
                    key.public_key()?;
                    Ok(key)
                })
                .collect::<Result<Vec<_>, KeyError>>()
        })?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(
            count,
            workers = self.num_workers,
            elapsed_ms,
            "Generated key batch"
        );
        Ok(keys)
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the compression preference.
    pub fn compressed(&self) -> bool {
        self.compressed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_batch_keys_distinct_and_derived() {
        let generator = BatchGenerator::new(4, true).unwrap();
        let keys = generator.generate(32).unwrap();

        assert_eq!(keys.len(), 32);
        let unique: HashSet<[u8; 32]> = keys.iter().map(|k| *k.secret_bytes()).collect();
        assert_eq!(unique.len(), 32);

        for key in &keys {
            assert!(key.is_compressed());
            assert!(key.has_cached_public_key());
            assert_eq!(key.public_key().unwrap().as_bytes().len(), 33);
        }
    }

    #[test]
    fn test_uncompressed_batch() {
        let generator = BatchGenerator::new(2, false).unwrap();
        assert_eq!(generator.num_workers(), 2);
        assert!(!generator.compressed());

        let keys = generator.generate(3).unwrap();
        assert!(keys.iter().all(|k| k.public_key().unwrap().as_bytes().len() == 65));
    }

    #[test]
    fn test_empty_batch() {
        let generator = BatchGenerator::new(1, true).unwrap();
        assert!(generator.generate(0).unwrap().is_empty());
    }
}
