#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # ECC Core
//!
//! Lifecycle and operations of a single elliptic-curve key over a pluggable
//! curve backend.
//!
//! ## Key Features
//!
//! - **Lifecycle**: allocate, generate or import, free exactly once
//! - **Interop**: X9.63 points, DER `SubjectPublicKeyInfo`, SEC1 and PKCS#8
//! - **ECDH**: raw shared secrets in zeroizing buffers
//! - **ECDSA**: deterministic DER signatures over caller-supplied hashes
//! - **Generation styles**: blocking, callback on a worker thread, or a future
//!
//! ## Quick Start
//!
//! ```rust
//! use ecc_core::EccKey;
//!
//! let mut alice = EccKey::new()?;
//! let mut bob = EccKey::new()?;
//! alice.generate(32)?;
//! bob.generate(32)?;
//!
//! // Only the public point travels.
//! let mut bob_public = EccKey::new()?;
//! bob_public.import_x963(bob.export_x963()?)?;
//!
//! let secret = alice.shared_secret(&bob_public)?;
//! assert_eq!(secret.len(), 32);
//! # Ok::<(), ecc_core::EccError>(())
//! ```
//!
//! ## Curves
//!
//! | Key size (bytes) | Curve |
//! |------------------|-------|
//! | 0 | configured default (P-256) |
//! | 1..=32 | P-256 |
//! | 33..=48 | P-384 |
//! | 49..=66 | P-521 |
//!
//! secp256k1 is available through [`EccKey::set_curve`].

pub mod config;
pub mod error;
pub mod key;
pub mod keygen;
pub mod logging;
pub mod sized;

pub use config::EccConfig;
pub use error::{EccError, Result};
pub use key::{EccKey, KeyState};
pub use keygen::KeyGenFuture;
pub use sized::sized_operation;

pub use ecc_primitives::{CURVE_DEFAULT, CurveBackend, CurveId, SoftwareBackend};

/// Library version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
