#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # Elliptic Curve Operations
//!
//! Software implementations of the primitives behind the key module.
//!
//! ## Supported Curves
//!
//! - **P-256 / P-384 / P-521**: NIST prime curves, selectable by key size
//! - **secp256k1**: selectable by explicit curve id
//!
//! ## Layout
//!
//! - `traits`: `EcdsaCurve`, the per-curve ECDSA hook
//! - `nist_p256`, `nist_p384`, `nist_p521`, `secp256k1`: one `EcdsaCurve` impl per curve
//! - `keypair`: generic key material (ECDH, X9.63, DER) and its curve-erased handle
//! - `codec`: outer DER structures that decide which curve a key lives on

/// Per-curve ECDSA trait
pub mod traits;

/// Key material
pub mod keypair;

/// DER and X9.63 decoding with curve detection
pub mod codec;

/// P-256 ECDSA
pub mod nist_p256;

/// P-384 ECDSA
pub mod nist_p384;

/// P-521 ECDSA
pub mod nist_p521;

/// secp256k1 ECDSA
pub mod secp256k1;

// Re-exports
pub use keypair::{KeyMaterial, KeyPair};
pub use traits::{EcdsaCurve, normalize_prehash};
