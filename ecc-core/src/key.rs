#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! ECC Key Lifecycle
//!
//! [`EccKey`] owns one elliptic-curve keypair from allocation to release.
//!
//! # Key States
//!
//! - **Allocated**: created, possibly with a curve selected, possibly holding
//!   key material (full keypair or public point only)
//! - **Freed**: material released; every operation fails with `NotAllocated`
//!
//! Population (generate, import, decode) either installs complete material or
//! leaves the key exactly as it was.
//!
//! # Example
//!
//! ```
//! use ecc_core::EccKey;
//!
//! let mut alice = EccKey::new().expect("allocate");
//! alice.generate(32).expect("generate");
//!
//! let signature = alice.sign_hash("Hello WolfSSL!").expect("sign");
//! assert!(alice.verify_hash(&signature, "Hello WolfSSL!").expect("verify"));
//!
//! alice.free().expect("free");
//! assert!(alice.free().is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use ecc_primitives::{
    BackendError, CURVE_DEFAULT, CurveBackend, CurveId, KeyMaterial, SoftwareBackend,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::EccConfig;
use crate::error::{EccError, Result};
use crate::keygen::{self, KeyGenFuture};
use crate::sized::sized_operation;

/// Allocation state of an [`EccKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    /// Usable: curve and material may or may not be present yet.
    Allocated,
    /// Released; no further operations are possible.
    Freed,
}

/// Contents of an allocated key.
struct Slot {
    /// Selected curve; always the material's curve once material exists.
    curve: Option<CurveId>,
    material: Option<KeyMaterial>,
}

fn failed(operation: &'static str) -> impl FnOnce(BackendError) -> EccError {
    move |err| EccError::from_backend(operation, err)
}

/// One elliptic-curve key.
///
/// Private scalars are zeroized when the key is freed, replaced or dropped.
pub struct EccKey {
    backend: Arc<dyn CurveBackend>,
    config: EccConfig,
    /// `None` once freed.
    slot: Option<Slot>,
}

impl EccKey {
    /// Allocate an empty key on the software backend with default settings.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the backend is out of resources.
    pub fn new() -> Result<Self> {
        Self::with_config(EccConfig::default())
    }

    /// Allocate an empty key on the software backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an invalid config and
    /// `AllocationFailed` if the backend is out of resources.
    pub fn with_config(config: EccConfig) -> Result<Self> {
        Self::with_backend(Arc::new(SoftwareBackend::new()), config)
    }

    /// Allocate an empty key on `backend`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an invalid config, `AllocationFailed`
    /// if the backend is out of resources and `OperationFailed` for any other
    /// backend status.
    pub fn with_backend(backend: Arc<dyn CurveBackend>, config: EccConfig) -> Result<Self> {
        config.validate()?;
        backend.init_key().map_err(|err| match err {
            BackendError::ResourceExhausted(reason) => EccError::AllocationFailed(reason),
            other => EccError::from_backend("init_key", other),
        })?;
        debug!(backend = backend.name(), "Allocated ECC key");
        Ok(Self { backend, config, slot: Some(Slot { curve: None, material: None }) })
    }

    fn slot(&self) -> Result<&Slot> {
        self.slot.as_ref().ok_or(EccError::NotAllocated)
    }

    fn material(&self) -> Result<&KeyMaterial> {
        self.slot()?.material.as_ref().ok_or(EccError::MissingKeyMaterial)
    }

    fn private_material(&self) -> Result<&KeyMaterial> {
        let material = self.material()?;
        if material.has_private() {
            Ok(material)
        } else {
            Err(EccError::PublicKeyOnly)
        }
    }

    /// Replace the key's material. The previous material is dropped.
    fn install(&mut self, material: KeyMaterial) -> Result<()> {
        let slot = self.slot.as_mut().ok_or(EccError::NotAllocated)?;
        slot.curve = Some(material.curve());
        slot.material = Some(material);
        Ok(())
    }

    fn install_imported(&mut self, material: KeyMaterial, operation: &'static str) -> Result<()> {
        if self.config.validate_imported_keys {
            self.backend.check_key(&material).map_err(failed("check_key"))?;
        }
        debug!(
            operation,
            curve = %material.curve(),
            private = material.has_private(),
            "Imported key material"
        );
        self.install(material)
    }

    // Lifecycle

    /// Current allocation state.
    #[must_use]
    pub fn state(&self) -> KeyState {
        if self.slot.is_some() { KeyState::Allocated } else { KeyState::Freed }
    }

    /// Selected curve, if any.
    #[must_use]
    pub fn curve(&self) -> Option<CurveId> {
        self.slot.as_ref().and_then(|slot| slot.curve)
    }

    /// Whether the key holds a private scalar.
    #[must_use]
    pub fn has_private_key(&self) -> bool {
        self.material().is_ok_and(KeyMaterial::has_private)
    }

    /// Key size in bytes of the selected curve.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` after free and `MissingKeyMaterial` when no
    /// curve is selected.
    pub fn key_size(&self) -> Result<usize> {
        self.slot()?.curve.map(CurveId::size).ok_or(EccError::MissingKeyMaterial)
    }

    /// Largest signature this key can produce.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` after free and `MissingKeyMaterial` when no
    /// curve is selected.
    pub fn signature_size(&self) -> Result<usize> {
        let curve = self.slot()?.curve.ok_or(EccError::MissingKeyMaterial)?;
        self.backend.signature_size(curve).map_err(failed("signature_size"))
    }

    /// Select the curve explicitly.
    ///
    /// A `curve_id` of [`CURVE_DEFAULT`] selects by `key_size` instead. With
    /// an explicit id, `key_size` is ignored. Material on a different curve
    /// is discarded.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `InvalidCurve` for an unknown id or
    /// `UnsupportedCurve` when mapping by size fails.
    pub fn set_curve(&mut self, key_size: usize, curve_id: i32) -> Result<()> {
        let slot = self.slot.as_mut().ok_or(EccError::NotAllocated)?;
        let curve = self.backend.resolve_curve(key_size, curve_id).map_err(failed("set_curve"))?;

        if slot.material.as_ref().is_some_and(|material| material.curve() != curve) {
            debug!(curve = %curve, "Discarding key material on curve change");
            slot.material = None;
        }
        slot.curve = Some(curve);
        debug!(curve = %curve, "Selected curve");
        Ok(())
    }

    /// Release the key.
    ///
    /// The key is marked freed before the backend's release status is
    /// examined, so a failed release still cannot be retried into a double
    /// release.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` if already freed and `OperationFailed` if the
    /// backend reports a failure while releasing.
    pub fn free(&mut self) -> Result<()> {
        let slot = self.slot.take().ok_or(EccError::NotAllocated)?;
        info!(curve = ?slot.curve, "Freeing ECC key");
        self.backend.free_key(slot.material).map_err(failed("free_key"))
    }

    // Generation

    fn target_curve(&self, key_size: usize) -> Result<CurveId> {
        match self.slot()?.curve {
            Some(curve) if key_size == 0 || key_size == curve.size() => Ok(curve),
            _ if key_size == 0 => Ok(self.config.default_curve),
            _ => self.backend.resolve_curve(key_size, CURVE_DEFAULT).map_err(failed("generate")),
        }
    }

    /// Generate a keypair, blocking until done.
    ///
    /// `key_size` 0 uses the selected curve, or the configured default when
    /// none is selected. A size equal to the selected curve's size keeps that
    /// curve, otherwise the smallest NIST curve that fits is used.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `UnsupportedCurve` or the backend failure.
    pub fn generate(&mut self, key_size: usize) -> Result<()> {
        let curve = self.target_curve(key_size)?;
        let material = self.backend.make_key(curve).map_err(failed("make_key"))?;
        info!(curve = %curve, key_size, "Generated ECC keypair");
        self.install(material)
    }

    /// Generate a keypair on a worker thread and pass the populated key to
    /// `callback` on that thread.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` before dispatching, or `AllocationFailed` if no
    /// worker could be started. Generation errors go to `callback`.
    pub fn generate_with_callback<F>(self, key_size: usize, callback: F) -> Result<()>
    where
        F: FnOnce(Result<EccKey>) + Send + 'static,
    {
        self.slot()?;
        let worker = self.config.worker_thread_name.clone();
        keygen::dispatch(&worker, move || self.generate_owned(key_size), callback)
    }

    /// Generate a keypair on a worker thread; the returned future resolves to
    /// the populated key.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` before dispatching, or `AllocationFailed` if no
    /// worker could be started. Generation errors resolve the future.
    pub fn generate_async(self, key_size: usize) -> Result<KeyGenFuture> {
        self.slot()?;
        let worker = self.config.worker_thread_name.clone();
        let (sender, receiver) = oneshot::channel();
        keygen::dispatch(&worker, move || self.generate_owned(key_size), move |result| {
            if sender.send(result).is_err() {
                debug!("Key generation result dropped by receiver");
            }
        })?;
        Ok(KeyGenFuture::new(receiver))
    }

    fn generate_owned(mut self, key_size: usize) -> Result<Self> {
        self.generate(key_size)?;
        Ok(self)
    }

    /// Validate the key's point and scalar.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MissingKeyMaterial` or `OperationFailed`
    /// with `ECC_PRIV_KEY_E`.
    pub fn check_key(&self) -> Result<()> {
        self.backend.check_key(self.material()?).map_err(failed("check_key"))
    }

    // X9.63

    fn x963(&self, compressed: bool) -> Result<Vec<u8>> {
        let material = self.material()?;
        let curve = material.curve();
        let point = sized_operation(
            || self.backend.x963_size(curve, compressed).map_err(failed("x963_size")),
            |out| {
                self.backend
                    .export_x963(material, compressed, out)
                    .map_err(failed("export_x963"))
            },
        )?;
        Ok(point.to_vec())
    }

    /// Public point as `0x04 || X || Y`.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` or `MissingKeyMaterial`.
    pub fn export_x963(&self) -> Result<Vec<u8>> {
        self.x963(false)
    }

    /// Public point as `0x02/0x03 || X`.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` or `MissingKeyMaterial`.
    pub fn export_x963_compressed(&self) -> Result<Vec<u8>> {
        self.x963(true)
    }

    /// Replace the key's contents with the public point in `bytes`.
    ///
    /// The curve is the selected one if its point length matches, otherwise
    /// the NIST curve with that point length.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` or `InvalidEncoding`.
    pub fn import_x963(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let bytes = bytes.as_ref();
        let preferred = self.slot()?.curve;
        if !self.config.accept_compressed_points && matches!(bytes.first(), Some(0x02 | 0x03)) {
            return Err(EccError::InvalidEncoding("compressed points are disabled".to_string()));
        }
        let material = self.backend.import_x963(bytes, preferred).map_err(failed("import_x963"))?;
        self.install_imported(material, "import_x963")
    }

    // DER

    /// DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` or `MissingKeyMaterial`.
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        let material = self.material()?;
        let der = sized_operation(
            || self.backend.public_der_size(material).map_err(failed("public_der_size")),
            |out| {
                self.backend
                    .public_key_to_der(material, out)
                    .map_err(failed("public_key_to_der"))
            },
        )?;
        Ok(der.to_vec())
    }

    /// DER SEC1 `ECPrivateKey` with curve parameters and public key.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MissingKeyMaterial` or `PublicKeyOnly`.
    pub fn private_key_to_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let material = self.private_material()?;
        sized_operation(
            || self.backend.private_der_size(material).map_err(failed("private_der_size")),
            |out| {
                self.backend
                    .private_key_to_der(material, out)
                    .map_err(failed("private_key_to_der"))
            },
        )
    }

    /// DER PKCS#8 `PrivateKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MissingKeyMaterial` or `PublicKeyOnly`.
    pub fn private_key_to_pkcs8(&self) -> Result<Zeroizing<Vec<u8>>> {
        let material = self.private_material()?;
        sized_operation(
            || self.backend.pkcs8_size(material).map_err(failed("pkcs8_size")),
            |out| {
                self.backend
                    .private_key_to_pkcs8(material, out)
                    .map_err(failed("private_key_to_pkcs8"))
            },
        )
    }

    /// Replace the key's contents with a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MalformedDer` or `CurveMismatch` for an
    /// unrecognized curve.
    pub fn public_key_decode(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        self.slot()?;
        let material =
            self.backend.public_key_decode(bytes.as_ref()).map_err(failed("public_key_decode"))?;
        self.install_imported(material, "public_key_decode")
    }

    /// Replace the key's contents with a DER SEC1 or PKCS#8 private key.
    ///
    /// A SEC1 key without curve parameters uses the selected curve.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MalformedDer` or `CurveMismatch`.
    pub fn private_key_decode(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let preferred = self.slot()?.curve;
        let material = self
            .backend
            .private_key_decode(bytes.as_ref(), preferred)
            .map_err(failed("private_key_decode"))?;
        self.install_imported(material, "private_key_decode")
    }

    // ECDH / ECDSA

    /// ECDH secret between this key's scalar and `peer`'s public point.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated` or `MissingKeyMaterial` for either key,
    /// `CurveMismatch` for different curves and `PublicKeyOnly` when this key
    /// has no scalar.
    pub fn shared_secret(&self, peer: &EccKey) -> Result<Zeroizing<Vec<u8>>> {
        let ours = self.material()?;
        let theirs = peer.material()?;
        let curve = ours.curve();
        if theirs.curve() != curve {
            return Err(EccError::CurveMismatch {
                expected: curve.to_string(),
                found: theirs.curve().to_string(),
            });
        }
        if !ours.has_private() {
            return Err(EccError::PublicKeyOnly);
        }

        sized_operation(
            || self.backend.shared_secret_size(curve).map_err(failed("shared_secret_size")),
            |out| self.backend.shared_secret(ours, theirs, out).map_err(failed("shared_secret")),
        )
    }

    /// ECDSA-sign `data`, a caller-computed hash or any other byte string.
    ///
    /// Short input is read as a big-endian integer; long input keeps its
    /// leftmost `key_size()` bytes, so on P-521 that is 528 bits rather than
    /// 521. The signature is deterministic.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MissingKeyMaterial` or `PublicKeyOnly`.
    pub fn sign_hash(&self, data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let material = self.private_material()?;
        let curve = material.curve();
        let signature = sized_operation(
            || self.backend.signature_size(curve).map_err(failed("signature_size")),
            |out| self.backend.sign_hash(material, data.as_ref(), out).map_err(failed("sign_hash")),
        )?;
        Ok(signature.to_vec())
    }

    /// Verify a DER ECDSA signature over `data`.
    ///
    /// A well-formed signature that does not match is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `NotAllocated`, `MissingKeyMaterial`, or `OperationFailed`
    /// when the signature bytes are not a valid `ECDSA-Sig-Value`.
    pub fn verify_hash(&self, signature: impl AsRef<[u8]>, data: impl AsRef<[u8]>) -> Result<bool> {
        let material = self.material()?;
        self.backend
            .verify_hash(material, signature.as_ref(), data.as_ref())
            .map_err(failed("verify_hash"))
    }
}

impl Drop for EccKey {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            if let Err(err) = self.backend.free_key(slot.material) {
                warn!(status = err.status(), "Releasing dropped ECC key failed");
            }
        }
    }
}

impl fmt::Debug for EccKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EccKey")
            .field("backend", &self.backend.name())
            .field("state", &self.state())
            .field("curve", &self.curve())
            .field("private", &self.has_private_key())
            .finish()
    }
}
