//! Field arithmetic modulo p = 2^384 − 2^128 − 2^96 + 2^32 − 1 (NIST P-384).

use crypto_bigint::{Encoding, Limb, U384};
use subtle::{Choice, ConditionallySelectable, CtOption};

use super::{gather_words, impl_field_element, pow_vartime};

/// p = 2^384 − 2^128 − 2^96 + 2^32 − 1
pub(crate) const MODULUS: U384 = U384::from_be_hex(
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff",
);

const MODULUS_M2: U384 = MODULUS.wrapping_sub(&U384::from_u8(2));

/// An element in the finite field modulo the P-384 prime.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement(pub(crate) U384);

impl_field_element!(FieldElement, U384, 48, 384);

impl FieldElement {
    pub const ZERO: Self = Self(U384::ZERO);
    pub const ONE: Self = Self(U384::ONE);

    /// Wrap a raw integer. The caller guarantees `w < p`.
    pub(crate) const fn from_uint_unchecked(w: U384) -> Self {
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
        Self(U384::ZERO.sub_mod(&self.0, &MODULUS))
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
        debug_assert_eq!(bytes.len(), 48);
        let w = U384::from_be_slice(bytes);
        CtOption::new(Self(w), lt_p(&w))
    }

    pub fn write_be_bytes(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0.to_be_bytes());
    }
}

/// Whether `w < p`.
fn lt_p(w: &U384) -> Choice {
    let (_, borrow) = w.sbb(&MODULUS, Limb::ZERO);
    Choice::from((borrow.0 & 1) as u8)
}

/// Bring a value below `2p` into `[0, p)` with one conditional subtraction.
fn sub_p_once(v: &U384) -> U384 {
    let (r, borrow) = v.sbb(&MODULUS, Limb::ZERO);
    U384::conditional_select(&r, v, Choice::from((borrow.0 & 1) as u8))
}

/// FIPS 186-3 D.2 fast reduction of a 768-bit product.
///
/// With c0..c23 the 32-bit words of the input (c0 least significant), the
/// result is s1 + 2·s2 + s3 + s4 + s5 + s6 + s7 − s8 − s9 − s10 mod p.
fn reduce_wide(lo: &U384, hi: &U384) -> U384 {
    let mut w = [0u8; 96];
    w[..48].copy_from_slice(&hi.to_be_bytes());
    w[48..].copy_from_slice(&lo.to_be_bytes());

    let term = |idx: &[i8]| -> U384 {
        let b: [u8; 48] = gather_words(&w, idx);
        sub_p_once(&U384::from_be_slice(&b))
    };

    let s1 = term(&[11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    let s2 = term(&[-1, -1, -1, -1, -1, 23, 22, 21, -1, -1, -1, -1]);
    let s3 = term(&[23, 22, 21, 20, 19, 18, 17, 16, 15, 14, 13, 12]);
    let s4 = term(&[20, 19, 18, 17, 16, 15, 14, 13, 12, 23, 22, 21]);
    let s5 = term(&[19, 18, 17, 16, 15, 14, 13, 12, 20, -1, 23, -1]);
    let s6 = term(&[-1, -1, -1, -1, 23, 22, 21, 20, -1, -1, -1, -1]);
    let s7 = term(&[-1, -1, -1, -1, -1, -1, 23, 22, 21, -1, -1, 20]);
    let s8 = term(&[22, 21, 20, 19, 18, 17, 16, 15, 14, 13, 12, 23]);
    let s9 = term(&[-1, -1, -1, -1, -1, -1, -1, 23, 22, 21, 20, -1]);
    let s10 = term(&[-1, -1, -1, -1, -1, -1, -1, 23, 23, -1, -1, -1]);

    let mut r = s1;
    r = r.add_mod(&s2, &MODULUS);
    r = r.add_mod(&s2, &MODULUS);
    r = r.add_mod(&s3, &MODULUS);
    r = r.add_mod(&s4, &MODULUS);
    r = r.add_mod(&s5, &MODULUS);
    r = r.add_mod(&s6, &MODULUS);
    r = r.add_mod(&s7, &MODULUS);
    r = r.sub_mod(&s8, &MODULUS);
    r = r.sub_mod(&s9, &MODULUS);
    r = r.sub_mod(&s10, &MODULUS);
    r
}

#[cfg(test)]
mod tests {
    use super::FieldElement;
    use hex_literal::hex;

    fn fe(bytes: &[u8; 48]) -> FieldElement {
        FieldElement::from_be_bytes(bytes).unwrap()
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
            "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7"
        ));
        let b = fe(&hex!(
            "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f"
        ));
        let c = fe(&hex!(
            "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef"
        ));
        assert_eq!(a.add(&b).mul(&c), a.mul(&c).add(&b.mul(&c)));
        assert_eq!(a.square(), a.mul(&a));
    }

    #[test]
    fn inversion_round_trips() {
        let a = fe(&hex!(
            "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7"
        ));
        let inv = a.invert().unwrap();
        assert_eq!(a.mul(&inv), FieldElement::ONE);
    }
}
