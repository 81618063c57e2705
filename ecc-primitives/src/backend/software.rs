//! Software backend built on `p256`, `p384`, `p521` and `k256`.

use tracing::{debug, trace};

use super::CurveBackend;
use crate::curve::{CURVE_DEFAULT, CurveId};
use crate::ec::KeyMaterial;
use crate::ec::codec;
use crate::error::{BackendError, Result};

/// Copy `bytes` to the front of `out`.
fn write_into(out: &mut [u8], bytes: &[u8]) -> Result<usize> {
    let actual = out.len();
    let target = out
        .get_mut(..bytes.len())
        .ok_or(BackendError::BufferTooSmall { needed: bytes.len(), actual })?;
    target.copy_from_slice(bytes);
    Ok(bytes.len())
}

/// Pure-Rust curve backend.
///
/// Stateless: key material lives entirely in [`KeyMaterial`], randomness comes
/// from `OsRng`, and every encoding is canonical so re-encoding a decoded key
/// reproduces the input bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    /// Create the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CurveBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn init_key(&self) -> Result<()> {
        Ok(())
    }

    fn free_key(&self, material: Option<KeyMaterial>) -> Result<()> {
        if let Some(material) = material {
            trace!(curve = %material.curve(), "Releasing key material");
        }
        Ok(())
    }

    fn resolve_curve(&self, key_size: usize, curve_id: i32) -> Result<CurveId> {
        if curve_id == CURVE_DEFAULT {
            return CurveId::for_key_size(key_size)
                .ok_or(BackendError::UnsupportedKeySize(key_size));
        }
        CurveId::from_native_id(curve_id).ok_or(BackendError::UnknownCurveId(curve_id))
    }

    fn make_key(&self, curve: CurveId) -> Result<KeyMaterial> {
        debug!(curve = %curve, "Generating keypair");
        Ok(KeyMaterial::generate(curve))
    }

    fn check_key(&self, key: &KeyMaterial) -> Result<()> {
        key.check()
    }

    fn x963_size(&self, curve: CurveId, compressed: bool) -> Result<usize> {
        Ok(curve.x963_len(compressed))
    }

    fn public_der_size(&self, key: &KeyMaterial) -> Result<usize> {
        Ok(key.to_spki_der()?.len())
    }

    fn private_der_size(&self, key: &KeyMaterial) -> Result<usize> {
        Ok(key.to_sec1_der()?.len())
    }

    fn pkcs8_size(&self, key: &KeyMaterial) -> Result<usize> {
        Ok(key.to_pkcs8_der()?.len())
    }

    fn signature_size(&self, curve: CurveId) -> Result<usize> {
        Ok(curve.max_signature_size())
    }

    fn shared_secret_size(&self, curve: CurveId) -> Result<usize> {
        Ok(curve.size())
    }

    fn export_x963(&self, key: &KeyMaterial, compressed: bool, out: &mut [u8]) -> Result<usize> {
        write_into(out, &key.to_point(compressed))
    }

    fn import_x963(&self, bytes: &[u8], preferred: Option<CurveId>) -> Result<KeyMaterial> {
        codec::decode_point(bytes, preferred)
    }

    fn public_key_to_der(&self, key: &KeyMaterial, out: &mut [u8]) -> Result<usize> {
        write_into(out, &key.to_spki_der()?)
    }

    fn public_key_decode(&self, bytes: &[u8]) -> Result<KeyMaterial> {
        codec::decode_spki(bytes)
    }

    fn private_key_to_der(&self, key: &KeyMaterial, out: &mut [u8]) -> Result<usize> {
        write_into(out, &key.to_sec1_der()?)
    }

    fn private_key_to_pkcs8(&self, key: &KeyMaterial, out: &mut [u8]) -> Result<usize> {
        write_into(out, &key.to_pkcs8_der()?)
    }

    fn private_key_decode(&self, bytes: &[u8], preferred: Option<CurveId>) -> Result<KeyMaterial> {
        codec::decode_private(bytes, preferred)
    }

    fn shared_secret(
        &self,
        private: &KeyMaterial,
        peer: &KeyMaterial,
        out: &mut [u8],
    ) -> Result<usize> {
        let secret = private.diffie_hellman(peer)?;
        write_into(out, &secret)
    }

    fn sign_hash(&self, key: &KeyMaterial, hash: &[u8], out: &mut [u8]) -> Result<usize> {
        let signature = key.sign(hash)?;
        write_into(out, &signature)
    }

    fn verify_hash(&self, key: &KeyMaterial, signature: &[u8], hash: &[u8]) -> Result<bool> {
        key.verify(signature, hash)
    }
}
