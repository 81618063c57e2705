//! # NIST P-521 ECDSA
//!
//! ECDSA hooks for secp521r1. The `p521` newtypes sign prehashes with a
//! random nonce, so this goes through the generic `ecdsa` keys to get the
//! RFC 6979 nonce the other curves use.

use ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use ecdsa::{Signature, SigningKey, VerifyingKey};
use p521::{NistP521, PublicKey, SecretKey};

use super::traits::EcdsaCurve;
use crate::curve::CurveId;
use crate::error::{BackendError, Result};

impl EcdsaCurve for NistP521 {
    const ID: CurveId = CurveId::Secp521r1;

    fn sign_prehash(secret: &SecretKey, prehash: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::<NistP521>::from(secret);
        let signature: Signature<NistP521> =
            signing_key.sign_prehash(prehash).map_err(|_e| BackendError::SigningFailed)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify_prehash(public: &PublicKey, prehash: &[u8], signature: &[u8]) -> Result<bool> {
        let signature = Signature::<NistP521>::from_der(signature)
            .map_err(|_e| BackendError::MalformedSignature)?;
        let verifying_key = VerifyingKey::<NistP521>::from(public);
        Ok(verifying_key.verify_prehash(prehash, &signature).is_ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ec::traits::normalize_prehash;
    use rand::rngs::OsRng;

    #[test]
    fn test_p521_sign_verify() {
        let secret = SecretKey::random(&mut OsRng);
        let prehash = normalize_prehash(b"p521 message", 66);

        let signature = NistP521::sign_prehash(&secret, &prehash).unwrap();
        assert!(signature.len() <= CurveId::Secp521r1.max_signature_size());
        assert!(NistP521::verify_prehash(&secret.public_key(), &prehash, &signature).unwrap());

        let tampered = normalize_prehash(b"p521 messagf", 66);
        assert!(!NistP521::verify_prehash(&secret.public_key(), &tampered, &signature).unwrap());
    }

    #[test]
    fn test_p521_signing_is_deterministic() {
        let secret = SecretKey::random(&mut OsRng);
        let prehash = normalize_prehash(b"Hello WolfSSL!", 66);
        let first = NistP521::sign_prehash(&secret, &prehash).unwrap();
        let second = NistP521::sign_prehash(&secret, &prehash).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_p521_signature_verifies_with_curve_crate_key() {
        let secret = SecretKey::random(&mut OsRng);
        let prehash = [0x21u8; 66];
        let der = NistP521::sign_prehash(&secret, &prehash).unwrap();

        let encoded = p521::elliptic_curve::sec1::ToEncodedPoint::to_encoded_point(
            &secret.public_key(),
            false,
        );
        let verifying_key = p521::ecdsa::VerifyingKey::from_sec1_bytes(encoded.as_bytes()).unwrap();
        let signature = p521::ecdsa::Signature::from_der(&der).unwrap();
        assert!(verifying_key.verify_prehash(&prehash, &signature).is_ok());
    }
}
