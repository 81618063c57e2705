#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # Curve Arithmetic Backend
//!
//! [`CurveBackend`] is the seam between key management and the code that
//! actually does point arithmetic. Size queries come first; fill operations
//! then write into a caller-provided buffer and report how many bytes they
//! wrote, the same protocol a native ECC library exposes.
//!
//! [`SoftwareBackend`] is the bundled implementation on top of the RustCrypto
//! curve crates.

use std::fmt;

use crate::curve::CurveId;
use crate::ec::KeyMaterial;
use crate::error::Result;

/// RustCrypto-based backend
pub mod software;

pub use software::SoftwareBackend;

/// Operations the key module needs from an ECC implementation.
///
/// Implementations must be usable from several threads at once; each key
/// shares one backend through an `Arc<dyn CurveBackend>`.
pub trait CurveBackend: Send + Sync + fmt::Debug {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    // Key lifecycle

    /// Reserve whatever per-key state the backend needs.
    ///
    /// # Errors
    /// Returns `ResourceExhausted` when no more keys can be created.
    fn init_key(&self) -> Result<()>;

    /// Release a key's material. `None` releases an empty key.
    ///
    /// # Errors
    /// Returns the backend status when releasing fails.
    fn free_key(&self, material: Option<KeyMaterial>) -> Result<()>;

    /// Resolve a native curve id, or a key size when the id is
    /// [`CURVE_DEFAULT`](crate::curve::CURVE_DEFAULT).
    ///
    /// # Errors
    /// Returns `UnknownCurveId` or `UnsupportedKeySize`.
    fn resolve_curve(&self, key_size: usize, curve_id: i32) -> Result<CurveId>;

    /// Generate a fresh keypair on `curve`.
    ///
    /// # Errors
    /// Returns `RandomFailure` or another backend error if generation fails.
    fn make_key(&self, curve: CurveId) -> Result<KeyMaterial>;

    /// Validate the public point and, when present, the private scalar.
    ///
    /// # Errors
    /// Returns `KeyValidationFailed` when the key is inconsistent.
    fn check_key(&self, key: &KeyMaterial) -> Result<()>;

    // Size queries

    /// Length of the X9.63 encoding of a point on `curve`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot size the encoding.
    fn x963_size(&self, curve: CurveId, compressed: bool) -> Result<usize>;

    /// Length of `key`'s DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot size the encoding.
    fn public_der_size(&self, key: &KeyMaterial) -> Result<usize>;

    /// Length of `key`'s DER SEC1 `ECPrivateKey`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` for public-only keys.
    fn private_der_size(&self, key: &KeyMaterial) -> Result<usize>;

    /// Length of `key`'s DER PKCS#8 `PrivateKeyInfo`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` for public-only keys.
    fn pkcs8_size(&self, key: &KeyMaterial) -> Result<usize>;

    /// Upper bound of a DER signature on `curve`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot size the signature.
    fn signature_size(&self, curve: CurveId) -> Result<usize>;

    /// Length of an ECDH secret on `curve`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot size the secret.
    fn shared_secret_size(&self, curve: CurveId) -> Result<usize>;

    // Codecs

    /// Write `key`'s public point in X9.63 form.
    ///
    /// # Errors
    /// Returns `BufferTooSmall` if `out` is shorter than [`x963_size`](Self::x963_size).
    fn export_x963(&self, key: &KeyMaterial, compressed: bool, out: &mut [u8]) -> Result<usize>;

    /// Parse an X9.63 point into a public-only key.
    ///
    /// `preferred` is the caller's curve choice, used when its point length
    /// matches `bytes`.
    ///
    /// # Errors
    /// Returns `InvalidPoint` for bad lengths or points off the curve.
    fn import_x963(&self, bytes: &[u8], preferred: Option<CurveId>) -> Result<KeyMaterial>;

    /// Write `key`'s DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    /// Returns `BufferTooSmall` if `out` is too short.
    fn public_key_to_der(&self, key: &KeyMaterial, out: &mut [u8]) -> Result<usize>;

    /// Parse a DER `SubjectPublicKeyInfo` into a public-only key.
    ///
    /// # Errors
    /// Returns `MalformedDer` or `UnknownCurve`.
    fn public_key_decode(&self, bytes: &[u8]) -> Result<KeyMaterial>;

    /// Write `key`'s DER SEC1 `ECPrivateKey`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` or `BufferTooSmall`.
    fn private_key_to_der(&self, key: &KeyMaterial, out: &mut [u8]) -> Result<usize>;

    /// Write `key`'s DER PKCS#8 `PrivateKeyInfo`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` or `BufferTooSmall`.
    fn private_key_to_pkcs8(&self, key: &KeyMaterial, out: &mut [u8]) -> Result<usize>;

    /// Parse a DER SEC1 or PKCS#8 private key.
    ///
    /// `preferred` supplies the curve when the encoding names none.
    ///
    /// # Errors
    /// Returns `MalformedDer`, `UnknownCurve` or `CurveMismatch`.
    fn private_key_decode(&self, bytes: &[u8], preferred: Option<CurveId>) -> Result<KeyMaterial>;

    // Primitives

    /// Write the ECDH secret between `private` and `peer`.
    ///
    /// # Errors
    /// Returns `CurveMismatch`, `MissingPrivateKey` or `BufferTooSmall`.
    fn shared_secret(
        &self,
        private: &KeyMaterial,
        peer: &KeyMaterial,
        out: &mut [u8],
    ) -> Result<usize>;

    /// Write a DER ECDSA signature over `hash`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey`, `SigningFailed` or `BufferTooSmall`.
    fn sign_hash(&self, key: &KeyMaterial, hash: &[u8], out: &mut [u8]) -> Result<usize>;

    /// Verify a DER ECDSA signature over `hash`.
    ///
    /// `Ok(false)` means well-formed but not matching.
    ///
    /// # Errors
    /// Returns `MalformedSignature` for structurally invalid signatures.
    fn verify_hash(&self, key: &KeyMaterial, signature: &[u8], hash: &[u8]) -> Result<bool>;
}
