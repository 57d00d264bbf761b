//! x/z projective points and the Montgomery ladder.
//!
//! Montgomery curves are used x-only: a point is `(X, Z)` with
//! `x = X/Z` and `Z = 0` for infinity, the y-coordinate is never
//! materialised. One ladder step computes a doubling and a differential
//! addition together ([Montgomery 1987], 5M + 4S + 1 multiplication by
//! the curve constant), and the two running points are exchanged with
//! constant-time swaps driven by the scalar bits.

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable};

use crate::arithmetic::{random_blinder, FieldElement};
use crate::curve::MontgomeryCurve;
use crate::error::Result;
use crate::scalar;

/// Point on a Montgomery curve in x/z coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MxzPoint<C: MontgomeryCurve> {
    pub(crate) x: C::Fe,
    pub(crate) z: C::Fe,
}

impl<C: MontgomeryCurve> MxzPoint<C> {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: <C::Fe as FieldElement>::ONE,
        z: <C::Fe as FieldElement>::ZERO,
    };

    /// Lift an affine x-coordinate.
    pub fn from_x(x: C::Fe) -> Self {
        Self { x, z: C::Fe::ONE }
    }

    /// Normalise to the affine x-coordinate.
    ///
    /// Division happens through the Fermat inverse, which maps `Z = 0`
    /// to zero — the RFC 7748 convention for the result of multiplying
    /// a small-order point.
    pub fn to_affine_x(&self) -> C::Fe {
        self.x * self.z.invert().unwrap_or(C::Fe::ZERO)
    }

    /// Exchange two points iff `swap` is set, in constant time.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, swap: Choice) {
        C::Fe::conditional_swap(&mut a.x, &mut b.x, swap);
        C::Fe::conditional_swap(&mut a.z, &mut b.z, swap);
    }

    /// Multiplicative blinding of the projective representation by a
    /// fresh `l ∈ (1, p)`.
    pub fn randomize<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let l = random_blinder::<C::Fe, R>(rng)?;
        self.x = self.x * l;
        self.z = self.z * l;
        Ok(())
    }

    /// One ladder step: `r ← 2·r` and `s ← r + s`, where `d` is the
    /// affine x-coordinate of the difference of the two inputs.
    pub fn double_add(r: &mut Self, s: &mut Self, d: &C::Fe) {
        let a = r.x + r.z;
        let aa = a.square();
        let b = r.x - r.z;
        let bb = b.square();
        let e = aa - bb;

        let c = s.x + s.z;
        let cd = s.x - s.z;
        let da = cd * a;
        let cb = c * b;

        s.x = (da + cb).square();
        s.z = *d * (da - cb).square();
        r.x = aa * bb;
        r.z = e * (bb + C::A24 * e);
    }
}

/// Constant-time x-only scalar multiplication `m · P`.
///
/// Scans a fixed window of `BITS + 1` scalar bits regardless of the
/// value; `px` is the affine x-coordinate of `P`, which also serves as
/// the ladder's difference point.
pub(crate) fn mul_mxz<C, R>(m: &[u8], px: &C::Fe, rng: Option<&mut R>) -> Result<C::Fe>
where
    C: MontgomeryCurve,
    R: RngCore + CryptoRng + ?Sized,
{
    let mut r = MxzPoint::<C>::IDENTITY;
    let mut rp = MxzPoint::<C>::from_x(*px);
    if let Some(rng) = rng {
        rp.randomize(rng)?;
    }

    for i in (0..=C::BITS).rev() {
        let b = Choice::from(scalar::bit(m, i));
        MxzPoint::conditional_swap(&mut r, &mut rp, b);
        MxzPoint::double_add(&mut r, &mut rp, px);
        MxzPoint::conditional_swap(&mut r, &mut rp, b);
    }

    Ok(r.to_affine_x())
}
