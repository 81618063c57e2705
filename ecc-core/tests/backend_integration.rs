//! Behaviour of the key module over a custom backend
//!
//! `FaultyBackend` delegates to the software backend and injects failures so
//! that status propagation, allocation failure and release accounting can be
//! observed.

#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ecc_core::{CurveBackend, CurveId, EccConfig, EccError, EccKey, KeyState, SoftwareBackend};
use ecc_primitives::{BackendError, KeyMaterial, status};

const FOREIGN_STATUS: i32 = -12345;

#[derive(Debug, Default)]
struct FaultyBackend {
    inner: SoftwareBackend,
    exhausted: bool,
    fail_rng: bool,
    fail_sign: bool,
    fail_free: bool,
    short_signature_size: bool,
    frees: AtomicUsize,
}

impl CurveBackend for FaultyBackend {
    fn name(&self) -> &'static str {
        "faulty"
    }

    fn init_key(&self) -> ecc_primitives::Result<()> {
        if self.exhausted {
            return Err(BackendError::ResourceExhausted("key table full".to_string()));
        }
        self.inner.init_key()
    }

    fn free_key(&self, material: Option<KeyMaterial>) -> ecc_primitives::Result<()> {
        self.frees.fetch_add(1, Ordering::SeqCst);
        if self.fail_free {
            return Err(BackendError::Status(FOREIGN_STATUS));
        }
        self.inner.free_key(material)
    }

    fn resolve_curve(&self, key_size: usize, curve_id: i32) -> ecc_primitives::Result<CurveId> {
        self.inner.resolve_curve(key_size, curve_id)
    }

    fn make_key(&self, curve: CurveId) -> ecc_primitives::Result<KeyMaterial> {
        if self.fail_rng {
            return Err(BackendError::RandomFailure);
        }
        self.inner.make_key(curve)
    }

    fn check_key(&self, key: &KeyMaterial) -> ecc_primitives::Result<()> {
        self.inner.check_key(key)
    }

    fn x963_size(&self, curve: CurveId, compressed: bool) -> ecc_primitives::Result<usize> {
        self.inner.x963_size(curve, compressed)
    }

    fn public_der_size(&self, key: &KeyMaterial) -> ecc_primitives::Result<usize> {
        self.inner.public_der_size(key)
    }

    fn private_der_size(&self, key: &KeyMaterial) -> ecc_primitives::Result<usize> {
        self.inner.private_der_size(key)
    }

    fn pkcs8_size(&self, key: &KeyMaterial) -> ecc_primitives::Result<usize> {
        self.inner.pkcs8_size(key)
    }

    fn signature_size(&self, curve: CurveId) -> ecc_primitives::Result<usize> {
        if self.short_signature_size {
            return Ok(8);
        }
        self.inner.signature_size(curve)
    }

    fn shared_secret_size(&self, curve: CurveId) -> ecc_primitives::Result<usize> {
        self.inner.shared_secret_size(curve)
    }

    fn export_x963(
        &self,
        key: &KeyMaterial,
        compressed: bool,
        out: &mut [u8],
    ) -> ecc_primitives::Result<usize> {
        self.inner.export_x963(key, compressed, out)
    }

    fn import_x963(
        &self,
        bytes: &[u8],
        preferred: Option<CurveId>,
    ) -> ecc_primitives::Result<KeyMaterial> {
        self.inner.import_x963(bytes, preferred)
    }

    fn public_key_to_der(
        &self,
        key: &KeyMaterial,
        out: &mut [u8],
    ) -> ecc_primitives::Result<usize> {
        self.inner.public_key_to_der(key, out)
    }

    fn public_key_decode(&self, bytes: &[u8]) -> ecc_primitives::Result<KeyMaterial> {
        self.inner.public_key_decode(bytes)
    }

    fn private_key_to_der(
        &self,
        key: &KeyMaterial,
        out: &mut [u8],
    ) -> ecc_primitives::Result<usize> {
        self.inner.private_key_to_der(key, out)
    }

    fn private_key_to_pkcs8(
        &self,
        key: &KeyMaterial,
        out: &mut [u8],
    ) -> ecc_primitives::Result<usize> {
        self.inner.private_key_to_pkcs8(key, out)
    }

    fn private_key_decode(
        &self,
        bytes: &[u8],
        preferred: Option<CurveId>,
    ) -> ecc_primitives::Result<KeyMaterial> {
        self.inner.private_key_decode(bytes, preferred)
    }

    fn shared_secret(
        &self,
        private: &KeyMaterial,
        peer: &KeyMaterial,
        out: &mut [u8],
    ) -> ecc_primitives::Result<usize> {
        self.inner.shared_secret(private, peer, out)
    }

    fn sign_hash(
        &self,
        key: &KeyMaterial,
        hash: &[u8],
        out: &mut [u8],
    ) -> ecc_primitives::Result<usize> {
        if self.fail_sign {
            return Err(BackendError::Status(FOREIGN_STATUS));
        }
        self.inner.sign_hash(key, hash, out)
    }

    fn verify_hash(
        &self,
        key: &KeyMaterial,
        signature: &[u8],
        hash: &[u8],
    ) -> ecc_primitives::Result<bool> {
        self.inner.verify_hash(key, signature, hash)
    }
}

fn key_on(backend: &Arc<FaultyBackend>) -> EccKey {
    let backend: Arc<dyn CurveBackend> = Arc::clone(backend) as Arc<dyn CurveBackend>;
    EccKey::with_backend(backend, EccConfig::default()).expect("allocate")
}

#[test]
fn test_exhausted_backend_fails_allocation() {
    let backend = Arc::new(FaultyBackend { exhausted: true, ..FaultyBackend::default() });
    let result = EccKey::with_backend(backend, EccConfig::default());
    assert!(matches!(
        result,
        Err(EccError::AllocationFailed(reason)) if reason == "key table full"
    ));
}

#[test]
fn test_foreign_status_is_preserved() {
    let backend = Arc::new(FaultyBackend { fail_sign: true, ..FaultyBackend::default() });
    let mut key = key_on(&backend);
    key.generate(32).expect("generate");

    let err = key.sign_hash(b"data").expect_err("sign fails");
    assert_eq!(err, EccError::OperationFailed { operation: "sign_hash", status: FOREIGN_STATUS });
    assert_eq!(err.status(), Some(FOREIGN_STATUS));
}

#[test]
fn test_short_size_query_surfaces_buffer_error() {
    let backend =
        Arc::new(FaultyBackend { short_signature_size: true, ..FaultyBackend::default() });
    let mut key = key_on(&backend);
    key.generate(32).expect("generate");

    let err = key.sign_hash(b"data").expect_err("buffer too small");
    assert_eq!(err.status(), Some(status::BUFFER_E));
}

#[test]
fn test_rng_failure_blocking_and_async() {
    let backend = Arc::new(FaultyBackend { fail_rng: true, ..FaultyBackend::default() });

    let mut key = key_on(&backend);
    let err = key.generate(32).expect_err("rng fails");
    assert_eq!(
        err,
        EccError::OperationFailed { operation: "make_key", status: status::RNG_FAILURE_E }
    );
    assert_eq!(key.curve(), None);

    let runtime = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
    let result = runtime.block_on(key_on(&backend).generate_async(32).expect("dispatch"));
    assert_eq!(result.map(|_| ()), Err(err));
}

#[test]
fn test_failed_release_still_frees() {
    let backend = Arc::new(FaultyBackend { fail_free: true, ..FaultyBackend::default() });
    let mut key = key_on(&backend);
    key.generate(32).expect("generate");

    let err = key.free().expect_err("release fails");
    assert_eq!(err, EccError::OperationFailed { operation: "free_key", status: FOREIGN_STATUS });
    assert_eq!(key.state(), KeyState::Freed);

    assert_eq!(key.free(), Err(EccError::NotAllocated));
    drop(key);
    assert_eq!(backend.frees.load(Ordering::SeqCst), 1, "released exactly once");
}

#[test]
fn test_drop_releases_unfreed_key() {
    let backend = Arc::new(FaultyBackend::default());
    {
        let mut key = key_on(&backend);
        key.generate(48).expect("generate");
    }
    let mut freed = key_on(&backend);
    freed.free().expect("free");
    drop(freed);

    assert_eq!(backend.frees.load(Ordering::SeqCst), 2);
}

#[test]
fn test_debug_names_backend() {
    let backend = Arc::new(FaultyBackend::default());
    let key = key_on(&backend);
    assert!(format!("{key:?}").contains("faulty"));
}
