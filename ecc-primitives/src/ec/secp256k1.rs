#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # secp256k1 ECDSA
//!
//! ECDSA hooks for secp256k1 using the k256 crate. The curve is never picked
//! by key size; callers select it explicitly by native id.
//!
//! k256 emits low-S signatures and rejects high-S ones on verification, so a
//! high-S signature produced elsewhere verifies as `false`.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::{PublicKey, Secp256k1, SecretKey};

use super::traits::EcdsaCurve;
use crate::curve::CurveId;
use crate::error::{BackendError, Result};

impl EcdsaCurve for Secp256k1 {
    const ID: CurveId = CurveId::Secp256k1;

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
