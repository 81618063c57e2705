//! # Key Material
//!
//! [`KeyPair`] holds the public point and, when known, the private scalar for
//! one curve. [`KeyMaterial`] is the curve-erased handle the backend trait
//! passes around.
//!
//! Private scalars live in `elliptic_curve::SecretKey`, which zeroizes on
//! drop.

use std::fmt;

use elliptic_curve::ecdh::diffie_hellman;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{AffinePoint, FieldBytesSize, PublicKey, SecretKey};
use k256::Secp256k1;
use p256::NistP256;
use p384::NistP384;
use p521::NistP521;
use pkcs8::{DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rand::rngs::OsRng;
use sec1::der::Encode;
use sec1::{EcParameters, EcPrivateKey};
use zeroize::Zeroizing;

use super::traits::{EcdsaCurve, normalize_prehash};
use crate::curve::CurveId;
use crate::error::{BackendError, Result};

/// Public point plus optional private scalar on curve `C`.
#[derive(Clone)]
pub struct KeyPair<C: EcdsaCurve> {
    secret: Option<SecretKey<C>>,
    public: PublicKey<C>,
}

impl<C> KeyPair<C>
where
    C: EcdsaCurve,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    /// Generate a fresh keypair from the OS randomness source.
    #[must_use]
    pub fn generate() -> Self {
        let secret = SecretKey::<C>::random(&mut OsRng);
        let public = secret.public_key();
        Self { secret: Some(secret), public }
    }

    /// Public-only key from an X9.63 point (compressed or uncompressed).
    ///
    /// # Errors
    /// Returns `InvalidPoint` if the bytes are not a point on the curve.
    pub fn from_point(bytes: &[u8]) -> Result<Self> {
        let public = PublicKey::<C>::from_sec1_bytes(bytes)
            .map_err(|_e| BackendError::InvalidPoint(format!("not a {} point", C::ID)))?;
        Ok(Self { secret: None, public })
    }

    /// Public-only key from a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    /// Returns `MalformedDer` if the structure or the embedded point is invalid.
    pub fn from_spki_der(bytes: &[u8]) -> Result<Self> {
        let public = PublicKey::<C>::from_public_key_der(bytes)
            .map_err(|e| BackendError::MalformedDer(e.to_string()))?;
        Ok(Self { secret: None, public })
    }

    /// Private key from a parsed SEC1 `ECPrivateKey`.
    ///
    /// An embedded public key, when present, must match the scalar.
    ///
    /// # Errors
    /// Returns `MalformedDer` for an invalid scalar or embedded point, and
    /// `KeyValidationFailed` when the embedded point does not match.
    pub fn from_ec_private_key(key: &EcPrivateKey<'_>) -> Result<Self> {
        let secret = SecretKey::<C>::from_slice(key.private_key)
            .map_err(|_e| BackendError::MalformedDer("invalid private scalar".to_string()))?;
        let public = secret.public_key();

        if let Some(embedded) = key.public_key {
            let embedded = PublicKey::<C>::from_sec1_bytes(embedded)
                .map_err(|_e| {
                    BackendError::MalformedDer("invalid embedded public key".to_string())
                })?;
            if embedded.as_affine() != public.as_affine() {
                return Err(BackendError::KeyValidationFailed(
                    "embedded public key does not match private scalar".to_string(),
                ));
            }
        }

        Ok(Self { secret: Some(secret), public })
    }

    /// Whether the private scalar is present.
    #[must_use]
    pub fn has_private(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&SecretKey<C>> {
        self.secret.as_ref().ok_or(BackendError::MissingPrivateKey)
    }

    /// X9.63 encoding of the public point.
    #[must_use]
    pub fn to_point(&self, compressed: bool) -> Vec<u8> {
        self.public.to_encoded_point(compressed).as_bytes().to_vec()
    }

    /// DER `SubjectPublicKeyInfo` with the named-curve parameter.
    ///
    /// # Errors
    /// Returns `EncodingFailed` if DER encoding fails.
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let document = self
            .public
            .to_public_key_der()
            .map_err(|e| BackendError::EncodingFailed(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    /// DER SEC1 `ECPrivateKey` carrying the curve OID and the public point.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` for public-only keys and `EncodingFailed`
    /// if DER encoding fails.
    pub fn to_sec1_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let secret = self.secret()?;
        let scalar = Zeroizing::new(secret.to_bytes());
        let point = self.public.to_encoded_point(false);

        let ec_private_key = EcPrivateKey {
            private_key: &scalar[..],
            parameters: Some(EcParameters::NamedCurve(C::OID)),
            public_key: Some(point.as_bytes()),
        };
        let der = ec_private_key.to_der().map_err(|e| BackendError::EncodingFailed(e.to_string()))?;
        Ok(Zeroizing::new(der))
    }

    /// DER PKCS#8 `PrivateKeyInfo`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` for public-only keys and `EncodingFailed`
    /// if DER encoding fails.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let document = self
            .secret()?
            .to_pkcs8_der()
            .map_err(|e| BackendError::EncodingFailed(e.to_string()))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// ECDH: x-coordinate of `secret * peer.public`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` if this key is public-only.
    pub fn diffie_hellman(&self, peer: &Self) -> Result<Zeroizing<Vec<u8>>> {
        let secret = self.secret()?;
        let shared = diffie_hellman(secret.to_nonzero_scalar(), peer.public.as_affine());
        Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
    }

    /// ECDSA signature (DER) over caller-supplied hash bytes.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` if this key is public-only.
    pub fn sign(&self, hash: &[u8]) -> Result<Vec<u8>> {
        let secret = self.secret()?;
        let prehash = normalize_prehash(hash, C::ID.size());
        C::sign_prehash(secret, &prehash)
    }

    /// ECDSA verification over caller-supplied hash bytes.
    ///
    /// # Errors
    /// Returns `MalformedSignature` if the signature is not valid DER.
    pub fn verify(&self, signature: &[u8], hash: &[u8]) -> Result<bool> {
        let prehash = normalize_prehash(hash, C::ID.size());
        C::verify_prehash(&self.public, &prehash, signature)
    }

    /// Pairwise consistency check: the scalar must generate the public point.
    ///
    /// # Errors
    /// Returns `KeyValidationFailed` when they disagree.
    pub fn check(&self) -> Result<()> {
        match &self.secret {
            Some(secret) if secret.public_key().as_affine() != self.public.as_affine() => Err(
                BackendError::KeyValidationFailed("public point does not match scalar".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Curve-erased key material handle.
#[derive(Clone)]
pub enum KeyMaterial {
    /// NIST P-256 key
    P256(KeyPair<NistP256>),
    /// NIST P-384 key
    P384(KeyPair<NistP384>),
    /// NIST P-521 key
    P521(KeyPair<NistP521>),
    /// secp256k1 key
    Secp256k1(KeyPair<Secp256k1>),
}

/// Run `$body` with `$pair` bound to the curve-specific keypair.
macro_rules! with_pair {
    ($material:expr, $pair:ident => $body:expr) => {
        match $material {
            KeyMaterial::P256($pair) => $body,
            KeyMaterial::P384($pair) => $body,
            KeyMaterial::P521($pair) => $body,
            KeyMaterial::Secp256k1($pair) => $body,
        }
    };
}

impl KeyMaterial {
    /// Generate a fresh keypair on `curve`.
    #[must_use]
    pub fn generate(curve: CurveId) -> Self {
        match curve {
            CurveId::Secp256r1 => Self::P256(KeyPair::generate()),
            CurveId::Secp384r1 => Self::P384(KeyPair::generate()),
            CurveId::Secp521r1 => Self::P521(KeyPair::generate()),
            CurveId::Secp256k1 => Self::Secp256k1(KeyPair::generate()),
        }
    }

    /// Public-only key from an X9.63 point on `curve`.
    ///
    /// # Errors
    /// Returns `InvalidPoint` if the bytes are not a point on `curve`.
    pub fn from_point(curve: CurveId, bytes: &[u8]) -> Result<Self> {
        Ok(match curve {
            CurveId::Secp256r1 => Self::P256(KeyPair::from_point(bytes)?),
            CurveId::Secp384r1 => Self::P384(KeyPair::from_point(bytes)?),
            CurveId::Secp521r1 => Self::P521(KeyPair::from_point(bytes)?),
            CurveId::Secp256k1 => Self::Secp256k1(KeyPair::from_point(bytes)?),
        })
    }

    /// Public-only key from a `SubjectPublicKeyInfo` whose curve is `curve`.
    ///
    /// # Errors
    /// Returns `MalformedDer` if the encoding is invalid.
    pub fn from_spki_der(curve: CurveId, bytes: &[u8]) -> Result<Self> {
        Ok(match curve {
            CurveId::Secp256r1 => Self::P256(KeyPair::from_spki_der(bytes)?),
            CurveId::Secp384r1 => Self::P384(KeyPair::from_spki_der(bytes)?),
            CurveId::Secp521r1 => Self::P521(KeyPair::from_spki_der(bytes)?),
            CurveId::Secp256k1 => Self::Secp256k1(KeyPair::from_spki_der(bytes)?),
        })
    }

    /// Private key from a parsed SEC1 structure on `curve`.
    ///
    /// # Errors
    /// See [`KeyPair::from_ec_private_key`].
    pub fn from_ec_private_key(curve: CurveId, key: &EcPrivateKey<'_>) -> Result<Self> {
        Ok(match curve {
            CurveId::Secp256r1 => Self::P256(KeyPair::from_ec_private_key(key)?),
            CurveId::Secp384r1 => Self::P384(KeyPair::from_ec_private_key(key)?),
            CurveId::Secp521r1 => Self::P521(KeyPair::from_ec_private_key(key)?),
            CurveId::Secp256k1 => Self::Secp256k1(KeyPair::from_ec_private_key(key)?),
        })
    }

    /// Curve this material lives on.
    #[must_use]
    pub fn curve(&self) -> CurveId {
        match self {
            Self::P256(_) => CurveId::Secp256r1,
            Self::P384(_) => CurveId::Secp384r1,
            Self::P521(_) => CurveId::Secp521r1,
            Self::Secp256k1(_) => CurveId::Secp256k1,
        }
    }

    /// Whether the private scalar is present.
    #[must_use]
    pub fn has_private(&self) -> bool {
        with_pair!(self, pair => pair.has_private())
    }

    /// X9.63 encoding of the public point.
    #[must_use]
    pub fn to_point(&self, compressed: bool) -> Vec<u8> {
        with_pair!(self, pair => pair.to_point(compressed))
    }

    /// DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    /// Returns `EncodingFailed` if DER encoding fails.
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        with_pair!(self, pair => pair.to_spki_der())
    }

    /// DER SEC1 `ECPrivateKey`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` for public-only keys.
    pub fn to_sec1_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        with_pair!(self, pair => pair.to_sec1_der())
    }

    /// DER PKCS#8 `PrivateKeyInfo`.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` for public-only keys.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        with_pair!(self, pair => pair.to_pkcs8_der())
    }

    /// ECDH with `peer`, which must be on the same curve.
    ///
    /// # Errors
    /// Returns `CurveMismatch` for different curves and `MissingPrivateKey`
    /// if this key is public-only.
    pub fn diffie_hellman(&self, peer: &Self) -> Result<Zeroizing<Vec<u8>>> {
        match (self, peer) {
            (Self::P256(ours), Self::P256(theirs)) => ours.diffie_hellman(theirs),
            (Self::P384(ours), Self::P384(theirs)) => ours.diffie_hellman(theirs),
            (Self::P521(ours), Self::P521(theirs)) => ours.diffie_hellman(theirs),
            (Self::Secp256k1(ours), Self::Secp256k1(theirs)) => ours.diffie_hellman(theirs),
            _ => Err(BackendError::CurveMismatch { expected: self.curve(), found: peer.curve() }),
        }
    }

    /// ECDSA signature over caller-supplied hash bytes.
    ///
    /// # Errors
    /// Returns `MissingPrivateKey` if this key is public-only.
    pub fn sign(&self, hash: &[u8]) -> Result<Vec<u8>> {
        with_pair!(self, pair => pair.sign(hash))
    }

    /// ECDSA verification over caller-supplied hash bytes.
    ///
    /// # Errors
    /// Returns `MalformedSignature` if the signature is not valid DER.
    pub fn verify(&self, signature: &[u8], hash: &[u8]) -> Result<bool> {
        with_pair!(self, pair => pair.verify(signature, hash))
    }

    /// Pairwise consistency check.
    ///
    /// # Errors
    /// Returns `KeyValidationFailed` when the scalar and point disagree.
    pub fn check(&self) -> Result<()> {
        with_pair!(self, pair => pair.check())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("curve", &self.curve())
            .field("private", &if self.has_private() { "[REDACTED]" } else { "absent" })
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sec1::der::Decode;

    #[test]
    fn test_generate_every_curve() {
        for curve in CurveId::ALL {
            let material = KeyMaterial::generate(curve);
            assert_eq!(material.curve(), curve);
            assert!(material.has_private());
            assert_eq!(material.to_point(false).len(), curve.x963_len(false));
            assert_eq!(material.to_point(true).len(), curve.x963_len(true));
            material.check().unwrap();
        }
    }

    #[test]
    fn test_point_roundtrip_is_public_only() {
        let material = KeyMaterial::generate(CurveId::Secp384r1);
        let point = material.to_point(false);
        let public = KeyMaterial::from_point(CurveId::Secp384r1, &point).unwrap();

        assert!(!public.has_private());
        assert_eq!(public.to_point(false), point);
        assert_eq!(public.sign(b"data").unwrap_err(), BackendError::MissingPrivateKey);
    }

    #[test]
    fn test_compressed_point_roundtrip() {
        let material = KeyMaterial::generate(CurveId::Secp256r1);
        let compressed = material.to_point(true);
        let public = KeyMaterial::from_point(CurveId::Secp256r1, &compressed).unwrap();
        assert_eq!(public.to_point(false), material.to_point(false));
    }

    #[test]
    fn test_point_off_curve_rejected() {
        let mut point = vec![0x04u8];
        point.extend_from_slice(&[0x11u8; 64]);
        let result = KeyMaterial::from_point(CurveId::Secp256r1, &point);
        assert!(matches!(result, Err(BackendError::InvalidPoint(_))));
    }

    #[test]
    fn test_sec1_der_carries_curve_and_public_key() {
        let material = KeyMaterial::generate(CurveId::Secp521r1);
        let der = material.to_sec1_der().unwrap();
        let parsed = EcPrivateKey::from_der(&der).unwrap();

        assert_eq!(
            parsed.parameters.and_then(|p| p.named_curve()),
            Some(CurveId::Secp521r1.oid())
        );
        assert_eq!(parsed.public_key, Some(material.to_point(false).as_slice()));

        let restored = KeyMaterial::from_ec_private_key(CurveId::Secp521r1, &parsed).unwrap();
        assert_eq!(restored.to_sec1_der().unwrap(), der);
    }

    #[test]
    fn test_sec1_mismatched_public_key_rejected() {
        let material = KeyMaterial::generate(CurveId::Secp256r1);
        let other = KeyMaterial::generate(CurveId::Secp256r1);
        let der = material.to_sec1_der().unwrap();
        let parsed = EcPrivateKey::from_der(&der).unwrap();
        let other_point = other.to_point(false);

        let forged = EcPrivateKey { public_key: Some(other_point.as_slice()), ..parsed };
        let result = KeyMaterial::from_ec_private_key(CurveId::Secp256r1, &forged);
        assert!(matches!(result, Err(BackendError::KeyValidationFailed(_))));
    }

    #[test]
    fn test_diffie_hellman_symmetry_and_mismatch() {
        let alice = KeyMaterial::generate(CurveId::Secp256k1);
        let bob = KeyMaterial::generate(CurveId::Secp256k1);

        let ab = alice.diffie_hellman(&bob).unwrap();
        let ba = bob.diffie_hellman(&alice).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 32);

        let carol = KeyMaterial::generate(CurveId::Secp256r1);
        assert_eq!(
            alice.diffie_hellman(&carol).unwrap_err(),
            BackendError::CurveMismatch {
                expected: CurveId::Secp256k1,
                found: CurveId::Secp256r1
            }
        );
    }

    #[test]
    fn test_debug_redacts_private_scalar() {
        let material = KeyMaterial::generate(CurveId::Secp256r1);
        let rendered = format!("{material:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(rendered.contains("Secp256r1"));
    }
}
