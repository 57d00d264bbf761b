//! Affine and Jacobian-coordinate points on short Weierstrass curves.
//!
//! Jacobian coordinates `(X, Y, Z)` map to affine `(X/Z², Y/Z³)`; `Z = 0`
//! encodes the point at infinity, while affine points carry an explicit
//! infinity flag. The addition law is the mixed-coordinate
//! [madd-2008-g] formula and doubling is [dbl-1998-cmo-2] with the
//! dedicated `a = −3` branch.
//!
//! [madd-2008-g]: https://hyperelliptic.org/EFD/g1p/auto-shortw-jacobian.html
//! [dbl-1998-cmo-2]: https://hyperelliptic.org/EFD/g1p/auto-shortw-jacobian.html

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::arithmetic::{random_blinder, FieldElement};
use crate::curve::{Curve, CurveA};
use crate::error::Result;

/// Largest batch [`JacPoint::to_affine_batch`] accepts; sized for a full
/// comb table at the maximum window width.
pub(crate) const MAX_BATCH: usize = 64;

/// Point on a short Weierstrass curve in affine coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AffinePoint<C: Curve> {
    pub(crate) x: C::Fe,
    pub(crate) y: C::Fe,
    /// 1 for the point at infinity, 0 otherwise. A `Choice` proxy kept as
    /// `u8` so the `IDENTITY`/`GENERATOR` constructors can be `const`.
    pub(crate) infinity: u8,
}

impl<C: Curve> AffinePoint<C> {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: <C::Fe as FieldElement>::ZERO,
        y: <C::Fe as FieldElement>::ZERO,
        infinity: 1,
    };

    /// The base point of the curve.
    pub const GENERATOR: Self = Self {
        x: C::GENERATOR.0,
        y: C::GENERATOR.1,
        infinity: 0,
    };

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }

    /// Whether the coordinates satisfy `y² = x³ + a·x + b`.
    ///
    /// False for the point at infinity; callers reject it separately.
    pub fn is_on_curve(&self) -> Choice {
        let xx = self.x.square();
        let rhs = match C::A {
            CurveA::MinusThree => {
                let three = C::Fe::ONE.double() + C::Fe::ONE;
                (xx - three) * self.x + C::B
            }
            CurveA::General(a) => (xx + a) * self.x + C::B,
        };
        self.y.square().ct_eq(&rhs) & !self.is_identity()
    }
}

impl<C: Curve> ConditionallySelectable for AffinePoint<C> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: C::Fe::conditional_select(&a.x, &b.x, choice),
            y: C::Fe::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl<C: Curve> ConstantTimeEq for AffinePoint<C> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & self.infinity.ct_eq(&other.infinity)
    }
}

impl<C: Curve> PartialEq for AffinePoint<C> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<C: Curve> Eq for AffinePoint<C> {}

/// Point on a short Weierstrass curve in Jacobian coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct JacPoint<C: Curve> {
    pub(crate) x: C::Fe,
    pub(crate) y: C::Fe,
    pub(crate) z: C::Fe,
}

impl<C: Curve> JacPoint<C> {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: <C::Fe as FieldElement>::ONE,
        y: <C::Fe as FieldElement>::ONE,
        z: <C::Fe as FieldElement>::ZERO,
    };

    /// Lift an affine point, mapping the infinity flag onto `Z = 0`.
    pub fn from_affine(p: &AffinePoint<C>) -> Self {
        let lifted = Self {
            x: p.x,
            y: p.y,
            z: C::Fe::ONE,
        };
        Self::conditional_select(&lifted, &Self::IDENTITY, p.is_identity())
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Normalise to affine coordinates. Cost: 1I + 3M + 1S.
    pub fn to_affine(&self) -> AffinePoint<C> {
        self.z
            .invert()
            .map(|zinv| self.to_affine_with(zinv))
            .unwrap_or(AffinePoint::IDENTITY)
    }

    fn to_affine_with(&self, zinv: C::Fe) -> AffinePoint<C> {
        let zinv2 = zinv.square();
        AffinePoint {
            x: self.x * zinv2,
            y: self.y * zinv2 * zinv,
            infinity: 0,
        }
    }

    /// Normalise a batch with Montgomery's trick: one inversion for the
    /// whole run, 1I + (6t − 3)M + 1S in total.
    ///
    /// Every input must have `Z ≠ 0`; the comb precomputation guarantees
    /// this by construction.
    pub fn to_affine_batch(points: &[Self], out: &mut [AffinePoint<C>]) {
        debug_assert_eq!(points.len(), out.len());
        debug_assert!(points.len() <= MAX_BATCH);
        debug_assert!(points.iter().all(|p| !bool::from(p.is_identity())));

        let t = points.len();
        if t == 0 {
            return;
        }

        // c[i] = Z_0 · … · Z_i
        let mut c = [C::Fe::ZERO; MAX_BATCH];
        c[0] = points[0].z;
        for i in 1..t {
            c[i] = c[i - 1] * points[i].z;
        }

        let mut u = c[t - 1].invert().unwrap_or(C::Fe::ZERO);

        for i in (1..t).rev() {
            out[i] = points[i].to_affine_with(u * c[i - 1]);
            u = u * points[i].z;
        }
        out[0] = points[0].to_affine_with(u);
    }

    /// Point doubling, formula dbl-1998-cmo-2. Output is not normalised.
    pub fn double(&self) -> Self {
        let zz = self.z.square();

        // M = 3(X + Z²)(X − Z²) on a = −3 curves, 3X² + a·Z⁴ otherwise
        let m = match C::A {
            CurveA::MinusThree => {
                let t = (self.x + zz) * (self.x - zz);
                t.double() + t
            }
            CurveA::General(a) => {
                let xx = self.x.square();
                xx.double() + xx + a * zz.square()
            }
        };

        let yy = self.y.square();
        let s = (self.x * yy).double().double(); // 4XY²
        let t8 = yy.square().double().double().double(); // 8Y⁴
        let x3 = m.square() - s.double();
        let y3 = m * (s - x3) - t8;
        let z3 = (self.y * self.z).double();

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Mixed addition `self + rhs`, formula madd-2008-g.
    ///
    /// The degenerate inputs are dispatched up front: either operand at
    /// infinity, equal points (delegated to [`Self::double`]) and opposite
    /// points (infinity). These branches are structural: on the scalar
    /// multiplication path the odd-digit recoding guarantees none of them
    /// is taken, so no secret reaches a branch condition.
    pub fn add_mixed(&self, rhs: &AffinePoint<C>) -> Self {
        if bool::from(rhs.is_identity()) {
            return *self;
        }
        if bool::from(self.is_identity()) {
            return Self::from_affine(rhs);
        }

        let z1z1 = self.z.square();
        let u2 = rhs.x * z1z1;
        let s2 = rhs.y * z1z1 * self.z;
        let h = u2 - self.x;
        let r = s2 - self.y;

        if bool::from(h.is_zero()) {
            return if bool::from(r.is_zero()) {
                self.double()
            } else {
                Self::IDENTITY
            };
        }

        let hh = h.square();
        let hhh = hh * h;
        let v = self.x * hh;

        let x3 = r.square() - hhh - v.double();
        let y3 = r * (v - x3) - self.y * hhh;
        let z3 = self.z * h;

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Replace `Y` with `−Y` iff `negate` is set, in constant time.
    pub fn conditional_negate(&mut self, negate: Choice) {
        let neg = -self.y;
        self.y.conditional_assign(&neg, negate);
    }

    /// Coron's projective-coordinate blinding: rescale by a fresh
    /// `l ∈ (1, p)` as `(l²X, l³Y, lZ)`.
    pub fn randomize<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let l = random_blinder::<C::Fe, R>(rng)?;
        let ll = l.square();
        self.x = self.x * ll;
        self.y = self.y * ll * l;
        self.z = self.z * l;
        Ok(())
    }
}

impl<C: Curve> ConditionallySelectable for JacPoint<C> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: C::Fe::conditional_select(&a.x, &b.x, choice),
            y: C::Fe::conditional_select(&a.y, &b.y, choice),
            z: C::Fe::conditional_select(&a.z, &b.z, choice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AffinePoint, JacPoint};
    use crate::curve::NistP256;
    use rand_core::OsRng;
    use subtle::Choice;

    type Affine = AffinePoint<NistP256>;
    type Jac = JacPoint<NistP256>;

    #[test]
    fn generator_is_on_curve() {
        assert!(bool::from(Affine::GENERATOR.is_on_curve()));
        assert!(!bool::from(Affine::IDENTITY.is_on_curve()));
    }

    #[test]
    fn double_matches_self_addition() {
        let g = Jac::from_affine(&Affine::GENERATOR);
        let doubled = g.double().to_affine();
        let added = g.add_mixed(&Affine::GENERATOR).to_affine();
        assert_eq!(doubled, added);
        assert!(bool::from(doubled.is_on_curve()));
    }

    #[test]
    fn addition_with_identity() {
        let g = Jac::from_affine(&Affine::GENERATOR);
        assert_eq!(g.add_mixed(&Affine::IDENTITY).to_affine(), g.to_affine());
        assert_eq!(
            Jac::IDENTITY.add_mixed(&Affine::GENERATOR).to_affine(),
            Affine::GENERATOR
        );
    }

    #[test]
    fn addition_with_opposite_is_identity() {
        let g = Jac::from_affine(&Affine::GENERATOR);
        let sum = g.add_mixed(&Affine::GENERATOR.neg());
        assert!(bool::from(sum.is_identity()));
        assert_eq!(sum.to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn conditional_negate() {
        let mut g = Jac::from_affine(&Affine::GENERATOR);
        g.conditional_negate(Choice::from(0));
        assert_eq!(g.to_affine(), Affine::GENERATOR);
        g.conditional_negate(Choice::from(1));
        assert_eq!(g.to_affine(), Affine::GENERATOR.neg());
    }

    #[test]
    fn batch_normalisation_matches_single() {
        let mut points = [Jac::IDENTITY; 5];
        let mut cur = Jac::from_affine(&Affine::GENERATOR);
        for slot in points.iter_mut() {
            *slot = cur;
            cur = cur.double();
        }

        let mut batch = [Affine::IDENTITY; 5];
        Jac::to_affine_batch(&points, &mut batch);

        for (p, a) in points.iter().zip(batch.iter()) {
            assert_eq!(p.to_affine(), *a);
        }
    }

    #[test]
    fn randomisation_preserves_the_point() {
        let mut p = Jac::from_affine(&Affine::GENERATOR).double();
        let before = p.to_affine();
        p.randomize(&mut OsRng).unwrap();
        assert_eq!(p.to_affine(), before);
    }
}
