//! Field arithmetic modulo p = 2^{224}(2^{32} − 1) + 2^{192} + 2^{96} − 1 (NIST P-256).

use crypto_bigint::{Encoding, Limb, U256};
use subtle::{Choice, ConditionallySelectable, CtOption};

use super::{gather_words, impl_field_element, pow_vartime};

/// p = 2^{224}(2^{32} − 1) + 2^{192} + 2^{96} − 1
pub(crate) const MODULUS: U256 =
    U256::from_be_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");

const MODULUS_M2: U256 = MODULUS.wrapping_sub(&U256::from_u8(2));

/// An element in the finite field modulo the P-256 prime.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement(pub(crate) U256);

impl_field_element!(FieldElement, U256, 32, 256);

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
    pub fn invert(&self) -> CtOption<Self> {
        let inv = pow_vartime(self, &MODULUS_M2.to_be_bytes());
        CtOption::new(inv, !crate::arithmetic::FieldElement::is_zero(self))
    }

    pub fn from_be_bytes(bytes: &[u8]) -> CtOption<Self> {
        debug_assert_eq!(bytes.len(), 32);
        let w = U256::from_be_slice(bytes);
        CtOption::new(Self(w), lt_p(&w))
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

/// Bring a value below `2p` into `[0, p)` with one conditional subtraction.
fn sub_p_once(v: &U256) -> U256 {
    let (r, borrow) = v.sbb(&MODULUS, Limb::ZERO);
    U256::conditional_select(&r, v, Choice::from((borrow.0 & 1) as u8))
}

/// FIPS 186-3 D.2 fast reduction of a 512-bit product.
///
/// With c0..c15 the 32-bit words of the input (c0 least significant), the
/// result is s1 + 2·s2 + 2·s3 + s4 + s5 − s6 − s7 − s8 − s9 mod p, each
/// term a 256-bit concatenation of input words.
fn reduce_wide(lo: &U256, hi: &U256) -> U256 {
    let mut w = [0u8; 64];
    w[..32].copy_from_slice(&hi.to_be_bytes());
    w[32..].copy_from_slice(&lo.to_be_bytes());

    let term = |idx: &[i8]| -> U256 {
        let b: [u8; 32] = gather_words(&w, idx);
        sub_p_once(&U256::from_be_slice(&b))
    };

    let s1 = term(&[7, 6, 5, 4, 3, 2, 1, 0]);
    let s2 = term(&[15, 14, 13, 12, 11, -1, -1, -1]);
    let s3 = term(&[-1, 15, 14, 13, 12, -1, -1, -1]);
    let s4 = term(&[15, 14, -1, -1, -1, 10, 9, 8]);
    let s5 = term(&[8, 13, 15, 14, 13, 11, 10, 9]);
    let s6 = term(&[10, 8, -1, -1, -1, 13, 12, 11]);
    let s7 = term(&[11, 9, -1, -1, 15, 14, 13, 12]);
    let s8 = term(&[12, -1, 10, 9, 8, 15, 14, 13]);
    let s9 = term(&[13, -1, 11, 10, 9, -1, 15, 14]);

    let mut r = s1;
    r = r.add_mod(&s2, &MODULUS);
    r = r.add_mod(&s2, &MODULUS);
    r = r.add_mod(&s3, &MODULUS);
    r = r.add_mod(&s3, &MODULUS);
    r = r.add_mod(&s4, &MODULUS);
    r = r.add_mod(&s5, &MODULUS);
    r = r.sub_mod(&s6, &MODULUS);
    r = r.sub_mod(&s7, &MODULUS);
    r = r.sub_mod(&s8, &MODULUS);
    r = r.sub_mod(&s9, &MODULUS);
    r
}

#[cfg(test)]
mod tests {
    use super::FieldElement;
    use crypto_bigint::{Encoding, U256};
    use hex_literal::hex;

    fn fe(bytes: &[u8; 32]) -> FieldElement {
        FieldElement::from_be_bytes(bytes).unwrap()
    }

    #[test]
    fn one_is_neutral() {
        let b = fe(&hex!(
            "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"
        ));
        assert_eq!(b.mul(&FieldElement::ONE), b);
    }

    #[test]
    fn p_minus_one_squares_to_one() {
        let m1 = FieldElement::ZERO.sub(&FieldElement::ONE);
        assert_eq!(m1.square(), FieldElement::ONE);
        assert_eq!(m1.add(&FieldElement::ONE), FieldElement::ZERO);
    }

    #[test]
    fn distributivity() {
        let a = fe(&hex!(
            "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
        ));
        let b = fe(&hex!(
            "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
        ));
        let c = fe(&hex!(
            "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"
        ));
        assert_eq!(a.add(&b).mul(&c), a.mul(&c).add(&b.mul(&c)));
        assert_eq!(a.square(), a.mul(&a));
    }

    #[test]
    fn inversion_round_trips() {
        let a = fe(&hex!(
            "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
        ));
        let inv = a.invert().unwrap();
        assert_eq!(a.mul(&inv), FieldElement::ONE);
        assert!(bool::from(FieldElement::ZERO.invert().is_none()));
    }

    #[test]
    fn decoding_enforces_range() {
        let p = super::MODULUS.to_be_bytes();
        assert!(bool::from(FieldElement::from_be_bytes(&p).is_none()));
        let p_m1 = super::MODULUS.wrapping_sub(&U256::ONE).to_be_bytes();
        assert!(bool::from(FieldElement::from_be_bytes(&p_m1).is_some()));
    }
}
