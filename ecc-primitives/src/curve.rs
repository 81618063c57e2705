//! # Curve Table
//!
//! Named curves supported by the key module, their native identifiers, sizes
//! and ASN.1 object identifiers.
//!
//! | Curve | Native id | Size | Selected by key size |
//! |-------|-----------|------|----------------------|
//! | P-256 (secp256r1) | 7 | 32 | 1..=32 |
//! | P-384 (secp384r1) | 15 | 48 | 33..=48 |
//! | P-521 (secp521r1) | 16 | 66 | 49..=66 |
//! | secp256k1 | 20 | 32 | explicit id only |

use std::fmt;

use pkcs8::{AssociatedOid, ObjectIdentifier};
use serde::{Deserialize, Serialize};

/// Native curve id meaning "select the curve from the key size".
pub const CURVE_DEFAULT: i32 = 0;

/// Named curve identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveId {
    /// NIST P-256 (secp256r1, prime256v1)
    Secp256r1,
    /// NIST P-384 (secp384r1)
    Secp384r1,
    /// NIST P-521 (secp521r1)
    Secp521r1,
    /// secp256k1 (Koblitz curve)
    Secp256k1,
}

impl Default for CurveId {
    fn default() -> Self {
        Self::Secp256r1
    }
}

impl CurveId {
    /// Every curve in the table.
    pub const ALL: [CurveId; 4] = [
        CurveId::Secp256r1,
        CurveId::Secp384r1,
        CurveId::Secp521r1,
        CurveId::Secp256k1,
    ];

    /// Curves reachable through key-size mapping, ordered by size.
    pub const SIZE_MAPPED: [CurveId; 3] =
        [CurveId::Secp256r1, CurveId::Secp384r1, CurveId::Secp521r1];

    /// Native curve identifier.
    #[must_use]
    pub const fn native_id(self) -> i32 {
        match self {
            Self::Secp256r1 => 7,
            Self::Secp384r1 => 15,
            Self::Secp521r1 => 16,
            Self::Secp256k1 => 20,
        }
    }

    /// Look up a curve by native identifier.
    #[must_use]
    pub fn from_native_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|curve| curve.native_id() == id)
    }

    /// Field element size in bytes. Also the key size and the ECDH secret size.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Secp256r1 | Self::Secp256k1 => 32,
            Self::Secp384r1 => 48,
            Self::Secp521r1 => 66,
        }
    }

    /// Standard curve name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Secp256r1 => "SECP256R1",
            Self::Secp384r1 => "SECP384R1",
            Self::Secp521r1 => "SECP521R1",
            Self::Secp256k1 => "SECP256K1",
        }
    }

    /// Named-curve object identifier.
    #[must_use]
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            Self::Secp256r1 => p256::NistP256::OID,
            Self::Secp384r1 => p384::NistP384::OID,
            Self::Secp521r1 => p521::NistP521::OID,
            Self::Secp256k1 => k256::Secp256k1::OID,
        }
    }

    /// Look up a curve by named-curve object identifier.
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.into_iter().find(|curve| curve.oid() == *oid)
    }

    /// Smallest size-mapped curve able to hold a `key_size`-byte key.
    ///
    /// Returns `None` for 0 and for sizes larger than the biggest curve.
    #[must_use]
    pub fn for_key_size(key_size: usize) -> Option<Self> {
        if key_size == 0 {
            return None;
        }
        Self::SIZE_MAPPED.into_iter().find(|curve| curve.size() >= key_size)
    }

    /// Length of the X9.63 point encoding.
    #[must_use]
    pub const fn x963_len(self, compressed: bool) -> usize {
        if compressed {
            1 + self.size()
        } else {
            1 + 2 * self.size()
        }
    }

    /// Whether `len` is a valid X9.63 length (either form) for this curve.
    #[must_use]
    pub const fn accepts_point_len(self, len: usize) -> bool {
        len == self.x963_len(false) || len == self.x963_len(true)
    }

    /// Size-mapped curve whose X9.63 encoding has length `len`.
    #[must_use]
    pub fn from_point_len(len: usize) -> Option<Self> {
        Self::SIZE_MAPPED.into_iter().find(|curve| curve.accepts_point_len(len))
    }

    /// Upper bound of a DER `ECDSA-Sig-Value` on this curve.
    #[must_use]
    pub const fn max_signature_size(self) -> usize {
        // Two INTEGERs of at most size + 1 content bytes, short-form lengths.
        let body = 2 * (self.size() + 3);
        if body < 0x80 {
            body + 2
        } else {
            body + 3
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
