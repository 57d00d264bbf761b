//! Curve parameter sets.
//!
//! Each supported curve is a zero-sized marker type binding a base field,
//! the short Weierstrass coefficients (or the ladder constant for
//! Montgomery curves) and the subgroup order. The `a` coefficient is a
//! tagged value so the `a = −3` fast paths are selected by type, not by
//! an "empty integer" sentinel.

use crypto_bigint::{U256, U384};

use crate::arithmetic::FieldElement;
use crate::registry::CurveId;

/// The `a` coefficient of a short Weierstrass equation.
#[derive(Clone, Copy, Debug)]
pub(crate) enum CurveA<Fe> {
    /// `a = −3`, the common NIST choice, with dedicated formulas.
    MinusThree,
    /// Any other coefficient.
    #[allow(dead_code)]
    General(Fe),
}

/// A short Weierstrass curve `y² = x³ + a·x + b` over a prime field.
pub(crate) trait Curve: Copy + Clone + core::fmt::Debug + 'static {
    /// Base field element type.
    type Fe: FieldElement;

    /// Bit size of the curve.
    const BITS: usize;

    /// Coefficient `a`.
    const A: CurveA<Self::Fe>;

    /// Coefficient `b`.
    const B: Self::Fe;

    /// Affine coordinates of the base point.
    const GENERATOR: (Self::Fe, Self::Fe);

    /// Subgroup order `n`, big-endian, `Fe::BYTES` long. Odd for every
    /// registered curve, which the scalar recoding relies on.
    const ORDER: &'static [u8];

    /// Registry identifier.
    const ID: CurveId;
}

/// A Montgomery curve `B·y² = x³ + A·x² + x`, used x-only.
#[cfg(feature = "x25519")]
pub(crate) trait MontgomeryCurve: Copy + Clone + core::fmt::Debug + 'static {
    /// Base field element type.
    type Fe: FieldElement;

    /// Bit position of the fixed top bit of a clamped scalar; scalars
    /// have bit length exactly `BITS + 1`.
    const BITS: usize;

    /// The ladder constant `(A + 2) / 4`.
    const A24: Self::Fe;

    /// x-coordinate of the base point.
    const GX: Self::Fe;

    /// Registry identifier.
    const ID: CurveId;
}

/// NIST P-256, a.k.a. secp256r1.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NistP256;

impl Curve for NistP256 {
    type Fe = crate::arithmetic::p256::FieldElement;

    const BITS: usize = 256;

    const A: CurveA<Self::Fe> = CurveA::MinusThree;

    const B: Self::Fe = Self::Fe::from_uint_unchecked(U256::from_be_hex(
        "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
    ));

    const GENERATOR: (Self::Fe, Self::Fe) = (
        Self::Fe::from_uint_unchecked(U256::from_be_hex(
            "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
        )),
        Self::Fe::from_uint_unchecked(U256::from_be_hex(
            "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
        )),
    );

    const ORDER: &'static [u8] = &[
        0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84,
        0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x51,
    ];

    const ID: CurveId = CurveId::Secp256r1;
}

/// NIST P-384, a.k.a. secp384r1.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NistP384;

impl Curve for NistP384 {
    type Fe = crate::arithmetic::p384::FieldElement;

    const BITS: usize = 384;

    const A: CurveA<Self::Fe> = CurveA::MinusThree;

    const B: Self::Fe = Self::Fe::from_uint_unchecked(U384::from_be_hex(
        "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef",
    ));

    const GENERATOR: (Self::Fe, Self::Fe) = (
        Self::Fe::from_uint_unchecked(U384::from_be_hex(
            "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7",
        )),
        Self::Fe::from_uint_unchecked(U384::from_be_hex(
            "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f",
        )),
    );

    const ORDER: &'static [u8] = &[
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xc7, 0x63, 0x4d, 0x81, 0xf4, 0x37, 0x2d, 0xdf,
        0x58, 0x1a, 0x0d, 0xb2, 0x48, 0xb0, 0xa7, 0x7a,
        0xec, 0xec, 0x19, 0x6a, 0xcc, 0xc5, 0x29, 0x73,
    ];

    const ID: CurveId = CurveId::Secp384r1;
}

/// Curve25519, used x-only as in RFC 7748.
#[cfg(feature = "x25519")]
#[derive(Clone, Copy, Debug)]
pub(crate) struct Curve25519;

#[cfg(feature = "x25519")]
impl MontgomeryCurve for Curve25519 {
    type Fe = crate::arithmetic::x25519::FieldElement;

    const BITS: usize = 254;

    // (486662 + 2) / 4
    const A24: Self::Fe = Self::Fe::from_uint_unchecked(U256::from_u64(121666));

    const GX: Self::Fe = Self::Fe::from_uint_unchecked(U256::from_u64(9));

    const ID: CurveId = CurveId::Curve25519;
}
