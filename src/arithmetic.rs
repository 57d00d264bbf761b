//! Base-field arithmetic for the supported curves.
//!
//! Each curve gets its own field element newtype over a `crypto-bigint`
//! unsigned integer, with multiplication implemented as a wide multiply
//! followed by the curve's fast reduction (FIPS 186-3 style word sums for
//! the NIST primes, high-half folding for 2^255 − 19). Every public
//! operation returns a fully reduced value in `[0, p)`.

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

pub(crate) mod p256;
pub(crate) mod p384;
#[cfg(feature = "x25519")]
pub(crate) mod x25519;

/// Element of a prime base field.
///
/// The contract every implementation upholds: outputs of `add`, `sub`,
/// `double`, `neg`, `mul` and `square` are reduced into `[0, p)`, and no
/// operation branches or indexes memory on the value of an element.
pub(crate) trait FieldElement:
    Copy
    + Clone
    + Debug
    + Default
    + PartialEq
    + Eq
    + ConditionallySelectable
    + ConstantTimeEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;

    /// Multiplicative identity.
    const ONE: Self;

    /// Serialized length of an element in bytes.
    const BYTES: usize;

    /// Bit length of the field modulus.
    const P_BITS: usize;

    /// Returns `2 * self`.
    fn double(&self) -> Self;

    /// Returns `self * self`.
    fn square(&self) -> Self;

    /// Multiplicative inverse, `None` for zero.
    fn invert(&self) -> CtOption<Self>;

    /// Whether this element is zero.
    fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Parse a big-endian, `Self::BYTES`-long encoding; `None` if the
    /// value does not lie below the modulus.
    fn from_be_bytes(bytes: &[u8]) -> CtOption<Self>;

    /// Serialize big-endian into `out`, which must be `Self::BYTES` long.
    fn write_be_bytes(&self, out: &mut [u8]);
}

/// Exponentiation with a public exponent (big-endian bytes).
///
/// Square-and-multiply; variable-time in the exponent only, which is a
/// fixed curve constant (p − 2) at every call site.
pub(crate) fn pow_vartime<F: FieldElement>(base: &F, exp: &[u8]) -> F {
    let mut r = F::ONE;
    for byte in exp {
        for bit in (0..8).rev() {
            r = r.square();
            if (byte >> bit) & 1 == 1 {
                r = r * *base;
            }
        }
    }
    r
}

/// Draw a uniform field element in `(1, p)` for projective blinding.
///
/// Rejection-sampled with the modulus-width mask; gives up after
/// [`crate::RNG_RETRIES`] out-of-range draws. The acceptance branch leaks
/// only the number of rejected samples, which is independent of the value
/// finally kept.
pub(crate) fn random_blinder<F, R>(rng: &mut R) -> crate::error::Result<F>
where
    F: FieldElement,
    R: rand_core::RngCore + rand_core::CryptoRng + ?Sized,
{
    use zeroize::Zeroize;

    let mut buf = [0u8; crate::MAX_FE_BYTES];
    let mut picked = None;

    for _ in 0..crate::RNG_RETRIES {
        let bytes = &mut buf[..F::BYTES];
        rng.fill_bytes(bytes);
        bytes[0] &= 0xff >> (8 * F::BYTES - F::P_BITS);

        if let Some(fe) = Option::<F>::from(F::from_be_bytes(bytes)) {
            if bool::from(!fe.is_zero() & !fe.ct_eq(&F::ONE)) {
                picked = Some(fe);
                break;
            }
        }
    }

    buf.zeroize();
    picked.ok_or(crate::error::Error::RandomFailed)
}

/// Gather 32-bit words of a wide product into a big-endian buffer.
///
/// `idx` lists word indices most significant first; a negative index
/// selects a zero word. Word `i` of the product occupies the big-endian
/// byte range `[IN - 4(i+1), IN - 4i)`.
pub(crate) fn gather_words<const IN: usize, const OUT: usize>(
    wide: &[u8; IN],
    idx: &[i8],
) -> [u8; OUT] {
    debug_assert_eq!(idx.len() * 4, OUT);
    let mut out = [0u8; OUT];
    for (k, &i) in idx.iter().enumerate() {
        if i >= 0 {
            let src = IN - 4 * (i as usize + 1);
            out[4 * k..4 * k + 4].copy_from_slice(&wide[src..src + 4]);
        }
    }
    out
}

/// Implements the [`FieldElement`] trait plus the operator and `subtle`
/// trait suite for a field newtype with inherent arithmetic.
macro_rules! impl_field_element {
    ($fe:ty, $uint:ty, $bytes:expr, $p_bits:expr) => {
        impl crate::arithmetic::FieldElement for $fe {
            const ZERO: Self = <$fe>::ZERO;
            const ONE: Self = <$fe>::ONE;
            const BYTES: usize = $bytes;
            const P_BITS: usize = $p_bits;

            fn double(&self) -> Self {
                <$fe>::double(self)
            }

            fn square(&self) -> Self {
                <$fe>::square(self)
            }

            fn invert(&self) -> subtle::CtOption<Self> {
                <$fe>::invert(self)
            }

            fn from_be_bytes(bytes: &[u8]) -> subtle::CtOption<Self> {
                <$fe>::from_be_bytes(bytes)
            }

            fn write_be_bytes(&self, out: &mut [u8]) {
                <$fe>::write_be_bytes(self, out)
            }
        }

        impl core::ops::Add for $fe {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                <$fe>::add(&self, &rhs)
            }
        }

        impl core::ops::Sub for $fe {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                <$fe>::sub(&self, &rhs)
            }
        }

        impl core::ops::Mul for $fe {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                <$fe>::mul(&self, &rhs)
            }
        }

        impl core::ops::Neg for $fe {
            type Output = Self;

            fn neg(self) -> Self {
                <$fe>::neg(&self)
            }
        }

        impl subtle::ConditionallySelectable for $fe {
            fn conditional_select(a: &Self, b: &Self, choice: subtle::Choice) -> Self {
                Self(<$uint as subtle::ConditionallySelectable>::conditional_select(
                    &a.0, &b.0, choice,
                ))
            }
        }

        impl subtle::ConstantTimeEq for $fe {
            fn ct_eq(&self, other: &Self) -> subtle::Choice {
                subtle::ConstantTimeEq::ct_eq(&self.0, &other.0)
            }
        }

        impl Default for $fe {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl PartialEq for $fe {
            fn eq(&self, other: &Self) -> bool {
                bool::from(subtle::ConstantTimeEq::ct_eq(self, other))
            }
        }

        impl Eq for $fe {}
    };
}

pub(crate) use impl_field_element;
