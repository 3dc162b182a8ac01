//! Parallel batch key generation.
//!
//! All workers share the process-wide crypto context, so native calls are
//! serialized by its lock while random draws and bookkeeping run in parallel.

mod pool;

pub use pool::{BatchError, BatchGenerator};
