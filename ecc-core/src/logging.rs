//! # Logging Utilities
//!
//! Structured logging for the key module. Log events carry curve names and
//! lengths, never key bytes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ecc_core::logging::{init_tracing, sanitize_data};
//!
//! // Sets the global tracing subscriber; call once per process.
//! init_tracing().expect("Failed to init tracing");
//!
//! let der = [0u8; 121];
//! tracing::info!("Exported private key: {}", sanitize_data(&der));
//! ```

use std::fmt;

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an `EnvFilter` (`RUST_LOG`, default
/// `ecc_core=info`) and a compact formatter.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ecc_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(true)
                .compact(),
        )
        .try_init()?;

    info!("ECC logging initialized");
    Ok(())
}

/// Wrap bytes so that formatting shows only their length.
#[must_use]
pub fn sanitize_data(data: &[u8]) -> SanitizedData<'_> {
    SanitizedData(data)
}

/// Display wrapper returned by [`sanitize_data`].
pub struct SanitizedData<'a>(&'a [u8]);

impl fmt::Display for SanitizedData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} bytes]", self.0.len())
    }
}

impl fmt::Debug for SanitizedData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
