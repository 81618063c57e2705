#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # Per-Curve ECDSA Hooks
//!
//! Everything except ECDSA is generic over `elliptic_curve`. Signing and
//! verification go through each curve crate's own `ecdsa` types, so every
//! supported curve implements [`EcdsaCurve`] in its own module.

use std::borrow::Cow;

use elliptic_curve::{CurveArithmetic, PublicKey, SecretKey};
use pkcs8::AssociatedOid;

use crate::curve::CurveId;
use crate::error::Result;

/// ECDSA over raw (pre-hashed) input for one named curve.
pub trait EcdsaCurve: CurveArithmetic + AssociatedOid {
    /// Entry of this curve in the curve table.
    const ID: CurveId;

    /// Sign `prehash` and return a DER `ECDSA-Sig-Value`.
    ///
    /// `prehash` has already been normalized with [`normalize_prehash`].
    ///
    /// # Errors
    /// Returns an error if the signing primitive fails.
    fn sign_prehash(secret: &SecretKey<Self>, prehash: &[u8]) -> Result<Vec<u8>>;

    /// Verify a DER signature over `prehash`.
    ///
    /// Returns `Ok(false)` when the signature is well-formed but does not
    /// match.
    ///
    /// # Errors
    /// Returns `MalformedSignature` if `signature` is not valid DER or its
    /// integers are out of range.
    fn verify_prehash(public: &PublicKey<Self>, prehash: &[u8], signature: &[u8]) -> Result<bool>;
}

/// Bring caller-supplied hash bytes to the curve's field size.
///
/// Input shorter than `field_size` is read as a big-endian integer and
/// left-padded with zeros. Longer input is passed through; the ECDSA
/// implementation keeps only its leftmost `field_size` bytes.
#[must_use]
pub fn normalize_prehash(data: &[u8], field_size: usize) -> Cow<'_, [u8]> {
    if data.len() >= field_size {
        return Cow::Borrowed(data);
    }
    let mut padded = vec![0u8; field_size];
    padded[field_size - data.len()..].copy_from_slice(data);
    Cow::Owned(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prehash_is_left_padded() {
        let padded = normalize_prehash(b"\x01\x02", 4);
        assert_eq!(padded.as_ref(), &[0, 0, 1, 2]);
    }

    #[test]
    fn test_empty_prehash_becomes_zero() {
        let padded = normalize_prehash(&[], 32);
        assert_eq!(padded.len(), 32);
        assert!(padded.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_long_prehash_is_borrowed() {
        let data = [0xAAu8; 64];
        let normalized = normalize_prehash(&data, 32);
        assert!(matches!(normalized, Cow::Borrowed(_)));
        assert_eq!(normalized.len(), 64);
    }
}
