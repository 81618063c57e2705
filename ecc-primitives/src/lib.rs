#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # ECC Primitives
//!
//! Elliptic-curve building blocks for the `ecc-core` key module.
//!
//! ## Contents
//!
//! - **curve**: the named-curve table (native ids, sizes, OIDs, size mapping)
//! - **error**: `BackendError` and native-style status codes
//! - **ec**: generic key material, per-curve ECDSA and DER/X9.63 codecs
//! - **backend**: the `CurveBackend` trait and the bundled `SoftwareBackend`
//!
//! ## Curves
//!
//! | Curve | Crate | ECDSA | ECDH |
//! |-------|-------|-------|------|
//! | P-256 | `p256` | Yes | Yes |
//! | P-384 | `p384` | Yes | Yes |
//! | P-521 | `p521` | Yes | Yes |
//! | secp256k1 | `k256` | Yes | Yes |

pub mod backend;
pub mod curve;
pub mod ec;
pub mod error;

pub use backend::{CurveBackend, SoftwareBackend};
pub use curve::{CURVE_DEFAULT, CurveId};
pub use ec::KeyMaterial;
pub use error::{BackendError, Result, status};
