//! Error types for ECC key operations.
//!
//! Every failure a caller can observe is one [`EccError`] variant. Backend
//! failures without a more specific variant surface as
//! [`EccError::OperationFailed`] carrying the backend's native status code.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use ecc_primitives::BackendError;
use thiserror::Error;

/// Errors that can occur during ECC key operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EccError {
    /// The key has been freed (or was never allocated).
    #[error("Key is not allocated")]
    NotAllocated,

    /// The key is allocated but holds no key material yet.
    #[error("Key holds no key material")]
    MissingKeyMaterial,

    /// The operation needs a private scalar but the key is public-only.
    #[error("Operation requires a private key; this key is public-only")]
    PublicKeyOnly,

    /// No curve in the table matches the requested key size.
    #[error("Unsupported curve for key size {key_size} bytes")]
    UnsupportedCurve {
        /// Requested key size in bytes.
        key_size: usize,
    },

    /// The native curve id is not in the curve table.
    #[error("Invalid curve id: {curve_id}")]
    InvalidCurve {
        /// Requested native curve id.
        curve_id: i32,
    },

    /// Keys or encodings disagree about the curve.
    #[error("Curve mismatch: expected {expected}, found {found}")]
    CurveMismatch {
        /// Curve the operation required.
        expected: String,
        /// Curve that was found.
        found: String,
    },

    /// X9.63 bytes are not a valid point encoding.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// DER input is structurally invalid.
    #[error("Malformed DER: {0}")]
    MalformedDer(String),

    /// The backend reported a negative status.
    #[error("{operation} failed with status {status}")]
    OperationFailed {
        /// Name of the failing operation.
        operation: &'static str,
        /// Native status code reported by the backend.
        status: i32,
    },

    /// Resources for a key or a worker could not be obtained.
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    /// A background generation worker stopped without reporting a result.
    #[error("Key generation aborted: {0}")]
    GenerationAborted(String),

    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl EccError {
    /// Translate a backend failure raised by `operation`.
    #[must_use]
    pub fn from_backend(operation: &'static str, err: BackendError) -> Self {
        match err {
            BackendError::UnsupportedKeySize(key_size) => Self::UnsupportedCurve { key_size },
            BackendError::UnknownCurveId(curve_id) => Self::InvalidCurve { curve_id },
            BackendError::InvalidPoint(reason) => Self::InvalidEncoding(reason),
            BackendError::MalformedDer(reason) => Self::MalformedDer(reason),
            BackendError::UnknownCurve(found) => {
                Self::CurveMismatch { expected: "a supported named curve".to_string(), found }
            }
            BackendError::CurveMismatch { expected, found } => {
                Self::CurveMismatch { expected: expected.to_string(), found: found.to_string() }
            }
            BackendError::MissingPrivateKey => Self::PublicKeyOnly,
            other => Self::OperationFailed { operation, status: other.status() },
        }
    }

    /// Native status code, when the error came from the backend.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::OperationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for ECC key operations.
pub type Result<T> = std::result::Result<T, EccError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ecc_primitives::{CurveId, status};

    #[test]
    fn test_backend_mapping() {
        assert_eq!(
            EccError::from_backend("generate", BackendError::UnsupportedKeySize(80)),
            EccError::UnsupportedCurve { key_size: 80 }
        );
        assert_eq!(
            EccError::from_backend("set_curve", BackendError::UnknownCurveId(3)),
            EccError::InvalidCurve { curve_id: 3 }
        );
        assert_eq!(
            EccError::from_backend("sign_hash", BackendError::MissingPrivateKey),
            EccError::PublicKeyOnly
        );
        assert_eq!(
            EccError::from_backend(
                "shared_secret",
                BackendError::CurveMismatch {
                    expected: CurveId::Secp256r1,
                    found: CurveId::Secp384r1,
                },
            ),
            EccError::CurveMismatch {
                expected: "SECP256R1".to_string(),
                found: "SECP384R1".to_string(),
            }
        );
    }

    #[test]
    fn test_unmapped_errors_keep_status() {
        let err = EccError::from_backend("verify_hash", BackendError::MalformedSignature);
        assert_eq!(
            err,
            EccError::OperationFailed {
                operation: "verify_hash",
                status: status::ECC_OUT_OF_RANGE_E,
            }
        );
        assert_eq!(err.status(), Some(-217));
        assert_eq!(err.to_string(), "verify_hash failed with status -217");
        assert_eq!(EccError::NotAllocated.status(), None);
    }
}
