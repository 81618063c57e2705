//! # NIST P-384 ECDSA
//!
//! ECDSA hooks for secp384r1 using the `p384` crate.

use p384::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p384::ecdsa::{Signature, SigningKey, VerifyingKey};
use p384::{NistP384, PublicKey, SecretKey};

use super::traits::EcdsaCurve;
use crate::curve::CurveId;
use crate::error::{BackendError, Result};

impl EcdsaCurve for NistP384 {
    const ID: CurveId = CurveId::Secp384r1;

    fn sign_prehash(secret: &SecretKey, prehash: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::from(secret);
        let signature: Signature =
            signing_key.sign_prehash(prehash).map_err(|_e| BackendError::SigningFailed)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify_prehash(public: &PublicKey, prehash: &[u8], signature: &[u8]) -> Result<bool> {
        let signature =
            Signature::from_der(signature).map_err(|_e| BackendError::MalformedSignature)?;
        let verifying_key = VerifyingKey::from(public);
        Ok(verifying_key.verify_prehash(prehash, &signature).is_ok())
    }
}
