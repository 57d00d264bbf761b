//! Field arithmetic modulo p = 2^255 − 19 (Curve25519).

use crypto_bigint::{Encoding, Limb, U256};
use subtle::{Choice, ConditionallySelectable, CtOption};

use super::{impl_field_element, pow_vartime};

/// p = 2^255 − 19
pub(crate) const MODULUS: U256 =
    U256::from_be_hex("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed");

const MODULUS_M2: U256 = MODULUS.wrapping_sub(&U256::from_u8(2));

/// An element in the finite field modulo 2^255 − 19.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement(pub(crate) U256);

impl_field_element!(FieldElement, U256, 32, 255);

impl FieldElement {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::ONE);

    /// Wrap a raw integer. The caller guarantees `w < p`.
    pub(crate) const fn from_uint_unchecked(w: U256) -> Self {
        Self(w)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self(self.0.add_mod(&rhs.0, &MODULUS))
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        Self(self.0.sub_mod(&rhs.0, &MODULUS))
    }

    pub fn neg(&self) -> Self {
        Self(U256::ZERO.sub_mod(&self.0, &MODULUS))
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        let (lo, hi) = self.0.mul_wide(&rhs.0);
        Self(reduce_wide(&lo, &hi))
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Multiplicative inverse via Fermat: a^{p−2} mod p.
    ///
    /// Zero maps to zero under the exponentiation, which is exactly the
    /// RFC 7748 convention the ladder relies on when normalising a point
    /// with `Z = 0`; callers that need the distinction use the `CtOption`.
    pub fn invert(&self) -> CtOption<Self> {
        let inv = pow_vartime(self, &MODULUS_M2.to_be_bytes());
        CtOption::new(inv, !crate::arithmetic::FieldElement::is_zero(self))
    }

    pub fn from_be_bytes(bytes: &[u8]) -> CtOption<Self> {
        debug_assert_eq!(bytes.len(), 32);
        let w = U256::from_be_slice(bytes);
        CtOption::new(Self(w), lt_p(&w))
    }

    /// Parse a big-endian encoding of a value below 2^256, reducing it
    /// into the field. Wire u-coordinates are accepted non-canonically
    /// per RFC 7748 after the top bit has been masked.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), 32);
        let w = U256::from_be_slice(bytes);
        Self(sub_p_once(&sub_p_once(&w)))
    }

    pub fn write_be_bytes(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0.to_be_bytes());
    }
}

/// Whether `w < p`.
fn lt_p(w: &U256) -> Choice {
    let (_, borrow) = w.sbb(&MODULUS, Limb::ZERO);
    Choice::from((borrow.0 & 1) as u8)
}

/// One conditional subtraction of `p`.
fn sub_p_once(v: &U256) -> U256 {
    let (r, borrow) = v.sbb(&MODULUS, Limb::ZERO);
    U256::conditional_select(&r, v, Choice::from((borrow.0 & 1) as u8))
}

/// Reduce a 512-bit product: the high half folds in as 2^256 ≡ 38 (mod p).
fn reduce_wide(lo: &U256, hi: &U256) -> U256 {
    const THIRTY_EIGHT: U256 = U256::from_u64(38);

    // First fold: lo + 38 * hi. The second-order overflow of that sum is
    // tiny (hi < 2^254, so 38 * hi >> 256 < 10) and folds in turn.
    let (l2, h2) = hi.mul_wide(&THIRTY_EIGHT);
    let (r, c1) = lo.adc(&l2, Limb::ZERO);

    let h2_lo = u64::from(h2.to_be_bytes()[31]);
    let t = (h2_lo + (c1.0 as u64 & 1)) * 38;
    let (r, c2) = r.adc(&U256::from_u64(t), Limb::ZERO);
    let r = r.wrapping_add(&U256::from_u64((c2.0 as u64 & 1) * 38));

    sub_p_once(&sub_p_once(&r))
}
