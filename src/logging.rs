//! Tracing setup for the CLI.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. Secret scalars are never part of any event.

use tracing::debug;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor `--log` say otherwise.
pub const DEFAULT_FILTER: &str = "keysmith=warn";

/// Installs a compact stderr subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;

    debug!("Logging initialized");
    Ok(())
}
