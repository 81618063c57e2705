//! # Curve Detection for Encoded Keys
//!
//! X9.63 points carry no curve identifier, so the curve is inferred from the
//! encoding length. DER structures name their curve with an OID; PKCS#8
//! wraps a SEC1 key and may name it in both layers, in which case they must
//! agree.

use elliptic_curve::ALGORITHM_OID;
use pkcs8::{PrivateKeyInfo, SubjectPublicKeyInfoRef};
use sec1::EcPrivateKey;
use sec1::der::Decode;

use super::keypair::KeyMaterial;
use crate::curve::CurveId;
use crate::error::{BackendError, Result};

/// Decode an X9.63 point.
///
/// `preferred` wins when its encoding length matches; otherwise the curve is
/// the size-mapped curve with that point length.
///
/// # Errors
/// Returns `InvalidPoint` for a length no curve uses or a point off the curve.
pub fn decode_point(bytes: &[u8], preferred: Option<CurveId>) -> Result<KeyMaterial> {
    let curve = match preferred {
        Some(curve) if curve.accepts_point_len(bytes.len()) => curve,
        _ => CurveId::from_point_len(bytes.len()).ok_or_else(|| {
            BackendError::InvalidPoint(format!("no curve uses {}-byte points", bytes.len()))
        })?,
    };
    KeyMaterial::from_point(curve, bytes)
}

/// Decode a DER `SubjectPublicKeyInfo`.
///
/// # Errors
/// Returns `MalformedDer` for invalid structure and `UnknownCurve` when the
/// algorithm is not `id-ecPublicKey` or the curve is not in the table.
pub fn decode_spki(bytes: &[u8]) -> Result<KeyMaterial> {
    let spki = SubjectPublicKeyInfoRef::from_der(bytes)
        .map_err(|e| BackendError::MalformedDer(e.to_string()))?;

    if spki.algorithm.oid != ALGORITHM_OID {
        return Err(BackendError::UnknownCurve(format!(
            "algorithm {} is not id-ecPublicKey",
            spki.algorithm.oid
        )));
    }
    let curve_oid = spki
        .algorithm
        .parameters_oid()
        .map_err(|_e| BackendError::UnknownCurve("missing named-curve parameter".to_string()))?;
    let curve = CurveId::from_oid(&curve_oid)
        .ok_or_else(|| BackendError::UnknownCurve(curve_oid.to_string()))?;

    KeyMaterial::from_spki_der(curve, bytes)
}

/// Decode a DER private key, either SEC1 `ECPrivateKey` or PKCS#8.
///
/// `preferred` is used only when the encoding names no curve at all.
///
/// # Errors
/// Returns `MalformedDer` for invalid structure, `UnknownCurve` for an absent
/// or unrecognized curve and `CurveMismatch` when the PKCS#8 and SEC1 layers
/// disagree.
pub fn decode_private(bytes: &[u8], preferred: Option<CurveId>) -> Result<KeyMaterial> {
    if let Ok(info) = PrivateKeyInfo::from_der(bytes) {
        return decode_pkcs8(&info, preferred);
    }
    let key = EcPrivateKey::from_der(bytes).map_err(|e| BackendError::MalformedDer(e.to_string()))?;
    decode_sec1(&key, None, preferred)
}

fn decode_pkcs8(info: &PrivateKeyInfo<'_>, preferred: Option<CurveId>) -> Result<KeyMaterial> {
    if info.algorithm.oid != ALGORITHM_OID {
        return Err(BackendError::UnknownCurve(format!(
            "algorithm {} is not id-ecPublicKey",
            info.algorithm.oid
        )));
    }
    let outer = match info.algorithm.parameters_oid() {
        Ok(oid) => {
            let curve = CurveId::from_oid(&oid)
                .ok_or_else(|| BackendError::UnknownCurve(oid.to_string()))?;
            Some(curve)
        }
        Err(_) => None,
    };
    let key = EcPrivateKey::from_der(info.private_key)
        .map_err(|e| BackendError::MalformedDer(e.to_string()))?;
    decode_sec1(&key, outer, preferred)
}

fn decode_sec1(
    key: &EcPrivateKey<'_>,
    outer: Option<CurveId>,
    preferred: Option<CurveId>,
) -> Result<KeyMaterial> {
    let embedded = match key.parameters.and_then(|params| params.named_curve()) {
        Some(oid) => {
            let curve = CurveId::from_oid(&oid)
                .ok_or_else(|| BackendError::UnknownCurve(oid.to_string()))?;
            Some(curve)
        }
        None => None,
    };

    let curve = match (outer, embedded) {
        (Some(outer), Some(inner)) if outer != inner => {
            return Err(BackendError::CurveMismatch { expected: outer, found: inner });
        }
        (Some(curve), _) | (None, Some(curve)) => curve,
        (None, None) => preferred
            .filter(|curve| curve.size() == key.private_key.len())
            .ok_or_else(|| BackendError::UnknownCurve("no named-curve parameter".to_string()))?,
    };

    KeyMaterial::from_ec_private_key(curve, key)
}
