//! Registry of supported curves and their TLS identifiers.

/// Identifier of a supported curve.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum CurveId {
    /// NIST P-256 / secp256r1 / prime256v1.
    Secp256r1,
    /// NIST P-384 / secp384r1.
    Secp384r1,
    /// Curve25519, x-only (RFC 7748).
    #[cfg(feature = "x25519")]
    Curve25519,
}

/// Registry entry for one curve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CurveInfo {
    /// Internal identifier.
    pub id: CurveId,
    /// IANA NamedCurve value (RFC 8422 §5.1.1).
    pub tls_id: u16,
    /// Curve size in bits.
    pub bit_size: u16,
    /// Printable name.
    pub name: &'static str,
}

/// All registered curves, ordered by preference.
static CURVES: &[CurveInfo] = &[
    CurveInfo {
        id: CurveId::Secp256r1,
        tls_id: 23,
        bit_size: 256,
        name: "secp256r1",
    },
    CurveInfo {
        id: CurveId::Secp384r1,
        tls_id: 24,
        bit_size: 384,
        name: "secp384r1",
    },
    #[cfg(feature = "x25519")]
    CurveInfo {
        id: CurveId::Curve25519,
        tls_id: 29,
        bit_size: 256,
        name: "x25519",
    },
];

/// Curves the TLS layer advertises by default, most common first.
///
/// Deliberately shorter than the registry: extension curves are usable
/// when negotiated but are not offered.
static PRESET: &[CurveId] = &[CurveId::Secp256r1, CurveId::Secp384r1];

/// All registered curves.
pub fn curves() -> &'static [CurveInfo] {
    CURVES
}

/// The default preference list for TLS negotiation.
pub fn preset_curves() -> &'static [CurveId] {
    PRESET
}

/// Registry entry for an internal identifier.
pub fn curve_info(id: CurveId) -> &'static CurveInfo {
    CURVES
        .iter()
        .find(|info| info.id == id)
        .expect("registry covers every CurveId")
}

/// Registry entry for a TLS NamedCurve value, if supported.
pub fn curve_info_from_tls_id(tls_id: u16) -> Option<&'static CurveInfo> {
    CURVES.iter().find(|info| info.tls_id == tls_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_ids_follow_rfc8422() {
        assert_eq!(curve_info(CurveId::Secp256r1).tls_id, 23);
        assert_eq!(curve_info(CurveId::Secp384r1).tls_id, 24);
        assert!(curve_info_from_tls_id(22).is_none());
    }

    #[test]
    fn preset_is_a_subset_of_the_registry() {
        for id in preset_curves() {
            assert!(curves().iter().any(|info| info.id == *id));
        }
        assert_eq!(preset_curves().first(), Some(&CurveId::Secp256r1));
    }

    #[cfg(feature = "x25519")]
    #[test]
    fn x25519_is_registered_but_not_preset() {
        assert_eq!(curve_info(CurveId::Curve25519).tls_id, 29);
        assert!(!preset_curves().contains(&CurveId::Curve25519));
    }
}
