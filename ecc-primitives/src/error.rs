//! Error types for ecc-primitives crate.
//!
//! Every backend failure maps to a native-style negative status code so that
//! callers above the backend boundary can report the same diagnostics a
//! native ECC library would.

use crate::curve::CurveId;

/// Native-style status codes reported by backend operations.
///
/// Values follow the conventions of common C ECC libraries so that a native
/// backend can pass its own codes through unchanged.
pub mod status {
    /// Out of memory or resource exhausted.
    pub const MEMORY_E: i32 = -125;
    /// Output buffer too small.
    pub const BUFFER_E: i32 = -132;
    /// ASN.1 parsing error.
    pub const ASN_PARSE_E: i32 = -140;
    /// Bad ECC input argument.
    pub const ECC_BAD_ARG_E: i32 = -170;
    /// ASN.1 ECC key error.
    pub const ASN_ECC_KEY_E: i32 = -171;
    /// Unknown or unsupported curve OID.
    pub const ECC_CURVE_OID_E: i32 = -172;
    /// Bad function argument.
    pub const BAD_FUNC_ARG: i32 = -173;
    /// Random number generator failure.
    pub const RNG_FAILURE_E: i32 = -199;
    /// Point is not on the curve.
    pub const IS_POINT_E: i32 = -214;
    /// Private key does not match the public key.
    pub const ECC_PRIV_KEY_E: i32 = -216;
    /// Value out of range (malformed signature integers).
    pub const ECC_OUT_OF_RANGE_E: i32 = -217;
    /// Signature primitive failure.
    pub const SIG_VERIFY_E: i32 = -229;
}

/// Errors that can occur in curve backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No curve in the table matches the requested key size.
    #[error("Unsupported key size: {0} bytes")]
    UnsupportedKeySize(usize),

    /// The native curve id is not in the curve table.
    #[error("Unknown curve id: {0}")]
    UnknownCurveId(i32),

    /// X9.63 bytes do not encode a valid point on any usable curve.
    #[error("Invalid point encoding: {0}")]
    InvalidPoint(String),

    /// DER input is structurally invalid.
    #[error("Malformed DER: {0}")]
    MalformedDer(String),

    /// The encoded curve is absent or not recognized.
    #[error("Unrecognized curve: {0}")]
    UnknownCurve(String),

    /// Two keys (or a key and an encoding) live on different curves.
    #[error("Curve mismatch: expected {expected}, found {found}")]
    CurveMismatch {
        /// Curve the operation required.
        expected: CurveId,
        /// Curve that was supplied.
        found: CurveId,
    },

    /// The operation needs a private scalar but the key is public-only.
    #[error("Key has no private scalar")]
    MissingPrivateKey,

    /// Signature bytes are not a valid DER `ECDSA-Sig-Value`.
    #[error("Malformed signature")]
    MalformedSignature,

    /// Output buffer is shorter than the reported size.
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The randomness source failed.
    #[error("Random number generation failed")]
    RandomFailure,

    /// The backend ran out of resources.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Pairwise or point validation failed.
    #[error("Key validation failed: {0}")]
    KeyValidationFailed(String),

    /// The signing primitive failed.
    #[error("Signing failed")]
    SigningFailed,

    /// Encoding key material failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Raw status code from a foreign backend.
    #[error("Backend returned status {0}")]
    Status(i32),
}

impl BackendError {
    /// Native status code for this error. Always negative.
    #[must_use]
    pub fn status(&self) -> i32 {
        match self {
            Self::UnsupportedKeySize(_) => status::ECC_BAD_ARG_E,
            Self::UnknownCurveId(_) | Self::UnknownCurve(_) => status::ECC_CURVE_OID_E,
            Self::InvalidPoint(_) => status::IS_POINT_E,
            Self::MalformedDer(_) => status::ASN_PARSE_E,
            Self::CurveMismatch { .. } => status::ECC_BAD_ARG_E,
            Self::MissingPrivateKey => status::BAD_FUNC_ARG,
            Self::MalformedSignature => status::ECC_OUT_OF_RANGE_E,
            Self::BufferTooSmall { .. } => status::BUFFER_E,
            Self::RandomFailure => status::RNG_FAILURE_E,
            Self::ResourceExhausted(_) => status::MEMORY_E,
            Self::KeyValidationFailed(_) => status::ECC_PRIV_KEY_E,
            Self::SigningFailed => status::SIG_VERIFY_E,
            Self::EncodingFailed(_) => status::ASN_ECC_KEY_E,
            Self::Status(code) => {
                if *code < 0 {
                    *code
                } else {
                    status::BAD_FUNC_ARG
                }
            }
        }
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
