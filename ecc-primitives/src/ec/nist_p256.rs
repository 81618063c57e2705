//! # NIST P-256 ECDSA
//!
//! ECDSA hooks for secp256r1 using the `p256` crate.

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::{NistP256, PublicKey, SecretKey};

use super::traits::EcdsaCurve;
use crate::curve::CurveId;
use crate::error::{BackendError, Result};

impl EcdsaCurve for NistP256 {
    const ID: CurveId = CurveId::Secp256r1;

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
