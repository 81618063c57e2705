//! Configuration for ECC keys.
//!
//! One [`EccConfig`] is cloned into every key created with
//! [`EccKey::with_config`](crate::EccKey::with_config).

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use ecc_primitives::CurveId;
use serde::{Deserialize, Serialize};

use crate::error::{EccError, Result};

/// Key behaviour settings.
///
/// # Examples
/// ```rust
/// use ecc_core::config::EccConfig;
/// use ecc_primitives::CurveId;
///
/// let config = EccConfig::new()
///     .with_default_curve(CurveId::Secp384r1)
///     .with_accept_compressed_points(false)
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.default_curve, CurveId::Secp384r1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EccConfig {
    /// Curve used when `generate` is called with key size 0 and no curve
    /// has been selected.
    ///
    /// Default: `CurveId::Secp256r1`
    pub default_curve: CurveId,

    /// Whether `import_x963` accepts compressed points.
    ///
    /// Default: `true`
    pub accept_compressed_points: bool,

    /// Whether imported and decoded keys are validated before use.
    ///
    /// Default: `true`
    pub validate_imported_keys: bool,

    /// Name given to background key generation threads.
    ///
    /// Default: `"ecc-keygen"`
    pub worker_thread_name: String,
}

impl Default for EccConfig {
    fn default() -> Self {
        Self {
            default_curve: CurveId::Secp256r1,
            accept_compressed_points: true,
            validate_imported_keys: true,
            worker_thread_name: "ecc-keygen".to_string(),
        }
    }
}

impl EccConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for development: skips validation of imported keys.
    #[must_use]
    pub fn for_development() -> Self {
        Self::default().with_validate_imported_keys(false)
    }

    /// Configuration for production: validates imports and only accepts
    /// uncompressed points.
    #[must_use]
    pub fn for_production() -> Self {
        Self::default().with_validate_imported_keys(true).with_accept_compressed_points(false)
    }

    /// Set the default curve and return self for method chaining.
    #[must_use]
    pub fn with_default_curve(mut self, curve: CurveId) -> Self {
        self.default_curve = curve;
        self
    }

    /// Set compressed point acceptance and return self for method chaining.
    #[must_use]
    pub fn with_accept_compressed_points(mut self, enabled: bool) -> Self {
        self.accept_compressed_points = enabled;
        self
    }

    /// Set import validation and return self for method chaining.
    #[must_use]
    pub fn with_validate_imported_keys(mut self, enabled: bool) -> Self {
        self.validate_imported_keys = enabled;
        self
    }

    /// Set the worker thread name and return self for method chaining.
    #[must_use]
    pub fn with_worker_thread_name(mut self, name: impl Into<String>) -> Self {
        self.worker_thread_name = name.into();
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if [`validate`](Self::validate) fails.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Validates the configuration settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread name is empty or contains a NUL
    /// byte.
    pub fn validate(&self) -> Result<()> {
        if self.worker_thread_name.is_empty() {
            return Err(EccError::ConfigurationError(
                "worker thread name must not be empty".to_string(),
            ));
        }
        if self.worker_thread_name.contains('\0') {
            return Err(EccError::ConfigurationError(
                "worker thread name must not contain NUL bytes".to_string(),
            ));
        }
        Ok(())
    }
}
