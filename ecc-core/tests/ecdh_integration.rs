//! Integration tests for ECDH shared secrets
//!
//! Both sides of an exchange must derive byte-identical secrets, including
//! when the keys were generated concurrently.

#![allow(clippy::expect_used)]

use ecc_core::{CurveId, EccError, EccKey};

async fn generate_pair(size: usize) -> (EccKey, EccKey) {
    let alice = EccKey::new().expect("allocate").generate_async(size).expect("dispatch");
    let bob = EccKey::new().expect("allocate").generate_async(size).expect("dispatch");
    let (alice, bob) = tokio::join!(alice, bob);
    (alice.expect("alice generation"), bob.expect("bob generation"))
}

#[tokio::test]
async fn test_concurrent_32_byte_keys_agree() {
    let (alice, bob) = generate_pair(32).await;

    let ab = hex::encode(alice.shared_secret(&bob).expect("alice side").as_slice());
    let ba = hex::encode(bob.shared_secret(&alice).expect("bob side").as_slice());

    assert_eq!(ab.len(), ba.len());
    assert_eq!(ab.len(), 64);
    assert_eq!(ab, ba);
    assert_eq!(ab, ab.to_lowercase());
}

#[tokio::test]
async fn test_concurrent_64_byte_keys_agree() {
    let (alice, bob) = generate_pair(64).await;
    assert_eq!(alice.curve(), Some(CurveId::Secp521r1));

    let ab = alice.shared_secret(&bob).expect("alice side");
    let ba = bob.shared_secret(&alice).expect("bob side");
    assert_eq!(ab.len(), 66);
    assert_eq!(hex::encode(ab.as_slice()), hex::encode(ba.as_slice()));
}

#[test]
fn test_every_curve_agrees_through_exported_points() {
    for curve in CurveId::ALL {
        let mut alice = EccKey::new().expect("allocate");
        let mut bob = EccKey::new().expect("allocate");
        for key in [&mut alice, &mut bob] {
            key.set_curve(0, curve.native_id()).expect("set curve");
            key.generate(0).expect("generate");
        }

        // Each side only sees the other's public point.
        let mut bob_public = EccKey::new().expect("allocate");
        bob_public.set_curve(0, curve.native_id()).expect("set curve");
        bob_public.import_x963(bob.export_x963().expect("export")).expect("import");
        let mut alice_public = EccKey::new().expect("allocate");
        alice_public.set_curve(0, curve.native_id()).expect("set curve");
        alice_public.import_x963(alice.export_x963().expect("export")).expect("import");

        let ab = alice.shared_secret(&bob_public).expect("alice side");
        let ba = bob.shared_secret(&alice_public).expect("bob side");
        assert_eq!(ab.len(), curve.size(), "{curve}");
        assert_eq!(ab, ba, "{curve}");
    }
}

#[test]
fn test_mismatched_curves_are_rejected() {
    let mut p256 = EccKey::new().expect("allocate");
    p256.generate(32).expect("generate");
    let mut p384 = EccKey::new().expect("allocate");
    p384.generate(48).expect("generate");

    let err = p256.shared_secret(&p384).map(|_| ()).expect_err("curve mismatch");
    assert_eq!(
        err,
        EccError::CurveMismatch {
            expected: "SECP256R1".to_string(),
            found: "SECP384R1".to_string(),
        }
    );
}

#[test]
fn test_secret_differs_between_peers() {
    let mut alice = EccKey::new().expect("allocate");
    let mut bob = EccKey::new().expect("allocate");
    let mut carol = EccKey::new().expect("allocate");
    for key in [&mut alice, &mut bob, &mut carol] {
        key.generate(32).expect("generate");
    }

    let with_bob = alice.shared_secret(&bob).expect("bob");
    let with_carol = alice.shared_secret(&carol).expect("carol");
    assert_ne!(with_bob, with_carol);
}
