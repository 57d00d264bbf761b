//! Comb-method scalar multiplication for short Weierstrass curves.
//!
//! Fixed-window comb with signed odd digits, following Hedabou, Pinel and
//! Bénéteau's SPA-resistant variant: every recoded digit is odd, so the
//! main loop performs exactly one doubling and one (never-degenerate)
//! mixed addition per digit, and the table lookup touches every entry.
//! DPA is addressed separately by projective-coordinate blinding of the
//! accumulator.

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::arithmetic::FieldElement;
use crate::curve::Curve;
use crate::error::Result;
use crate::jacobian::{AffinePoint, JacPoint};
use crate::scalar;

/// Maximum comb window width.
const COMB_MAX_W: usize = 7;

/// Maximum number of digits: ⌈bits/w⌉ with w ≥ 2 over up-to-384-bit curves.
const COMB_MAX_D: usize = (384 + 1) / 2;

/// Maximum table size, 2^(w − 1).
const COMB_MAX_POINTS: usize = 1 << (COMB_MAX_W - 1);

/// Window width for a curve: 5 for 384-bit sizes, 4 below.
///
/// The generator's table is cached across handshakes, which pays for one
/// extra bit of window.
pub(crate) fn window_width<C: Curve>(base_is_generator: bool) -> usize {
    let w = if C::BITS >= 384 { 5 } else { 4 };
    let w = if base_is_generator { w + 1 } else { w };
    w.min(COMB_MAX_W)
}

/// Recode an odd scalar `m` into `d + 1` signed odd comb digits.
///
/// Digit `i` holds the classical comb column bits `m[i + d·j]` in bit
/// positions `j < w`; bit 7 is the sign. After the adjustment sweep the
/// low seven bits of every digit are odd, so the scalar-multiply loop has
/// no zero digit to hide.
///
/// An even digit borrows its predecessor: XOR-ing digit `i − 1` into
/// digit `i` while negating digit `i − 1` preserves the represented value
/// (2·2^{i−1+d·j} = 2^{i+d·j}); bit collisions carry into the next
/// column at the same row through `c`, again because doubling a column
/// weight moves one column up.
fn recode<C: Curve>(m: &[u8], d: usize, w: usize, x: &mut [u8]) {
    debug_assert!(bool::from(scalar::is_odd(m)));
    debug_assert_eq!(x.len(), d + 1);

    for b in x.iter_mut() {
        *b = 0;
    }
    for i in 0..d {
        for j in 0..w {
            x[i] |= scalar::bit(m, i + d * j) << j;
        }
    }

    let mut c: u8 = 0;
    for i in 1..=d {
        // fold the incoming carry into this column
        let cc = x[i] & c;
        x[i] ^= c;
        c = cc;

        // make the digit odd, pushing the sign onto its predecessor
        let adjust = 1 - (x[i] & 1);
        let mask = x[i - 1].wrapping_mul(adjust);
        c |= x[i] & mask;
        x[i] ^= mask;
        x[i - 1] |= adjust << 7;
    }
}

/// Precomputed comb table for a fixed base point.
///
/// Entry `i` holds `(i_{w−1}·2^{(w−1)d} + … + i_1·2^d + 1) · P` where
/// `i_j` are the bits of `i`, i.e. the point selected by the odd digit
/// `2i + 1`. All entries are affine with non-zero `y`.
pub(crate) struct CombTable<C: Curve> {
    points: [AffinePoint<C>; COMB_MAX_POINTS],
    len: usize,
    w: usize,
    d: usize,
}

impl<C: Curve> CombTable<C> {
    /// Build the table for `base`: doubling chains for the power-of-two
    /// indices, one mixed addition for each remaining index, one batch
    /// normalisation per phase.
    pub(crate) fn precompute(base: &AffinePoint<C>, w: usize) -> Self {
        debug_assert!((2..=COMB_MAX_W).contains(&w));
        let d = C::BITS.div_ceil(w);
        let t_len = 1usize << (w - 1);

        let mut aff = [AffinePoint::IDENTITY; COMB_MAX_POINTS];
        aff[0] = *base;

        // T[2^k] = 2^{d(k+1)} P, then normalise the chain in one batch
        let mut pow_jac = [JacPoint::IDENTITY; COMB_MAX_W];
        let mut count = 0;
        let mut cur = JacPoint::from_affine(base);
        let mut i = 1;
        while i < t_len {
            for _ in 0..d {
                cur = cur.double();
            }
            pow_jac[count] = cur;
            count += 1;
            i <<= 1;
        }

        let mut pow_aff = [AffinePoint::IDENTITY; COMB_MAX_W];
        JacPoint::to_affine_batch(&pow_jac[..count], &mut pow_aff[..count]);

        let mut i = 1;
        let mut k = 0;
        while i < t_len {
            aff[i] = pow_aff[k];
            k += 1;
            i <<= 1;
        }

        // T[i + j] = T[j] + T[i] for each power i and j < i, taking care
        // to update T[i] itself (j = 0) only after it has been used
        let mut work = [JacPoint::IDENTITY; COMB_MAX_POINTS];
        work[0] = JacPoint::from_affine(base);
        let mut i = 1;
        while i < t_len {
            let power = aff[i];
            for j in (0..i).rev() {
                work[i + j] = work[j].add_mixed(&power);
            }
            i <<= 1;
        }

        JacPoint::to_affine_batch(&work[1..t_len], &mut aff[1..t_len]);

        Self {
            points: aff,
            len: t_len,
            w,
            d,
        }
    }

    /// Look up the point for a signed digit, reading every table entry.
    ///
    /// The scan plus conditional assignment keeps the access pattern
    /// independent of the digit; the sign bit is applied afterwards with
    /// a conditional negation.
    pub(crate) fn select(&self, digit: u8) -> AffinePoint<C> {
        let idx = (digit & 0x7f) >> 1;

        let mut r = AffinePoint::IDENTITY;
        for (j, entry) in self.points[..self.len].iter().enumerate() {
            r.conditional_assign(entry, (j as u8).ct_eq(&idx));
        }

        let neg = r.neg();
        r.conditional_assign(&neg, Choice::from(digit >> 7));
        r
    }
}

/// Core multiply loop over a recoded scalar.
///
/// `m` must be odd and in `(0, n)`; the entry points below establish this
/// with the odd-scalar substitution, which is also what keeps the mixed
/// additions away from their degenerate cases.
fn mul_core<C, R>(table: &CombTable<C>, m: &[u8], rng: Option<&mut R>) -> Result<JacPoint<C>>
where
    C: Curve,
    R: RngCore + CryptoRng + ?Sized,
{
    let mut digits = Zeroizing::new([0u8; COMB_MAX_D + 1]);
    recode::<C>(m, table.d, table.w, &mut digits[..table.d + 1]);

    let mut r = JacPoint::from_affine(&table.select(digits[table.d]));
    if let Some(rng) = rng {
        r.randomize(rng)?;
    }

    for i in (0..table.d).rev() {
        r = r.double();
        r = r.add_mixed(&table.select(digits[i]));
    }

    Ok(r)
}

/// Multiply `m · P` for the base point the table was built for.
///
/// Requires the group order to be odd. An even `m` is replaced by
/// `n − m` (constant-time selection) so the core always sees an odd
/// scalar; the substitution is undone by negating the result.
pub(crate) fn mul_with_table<C, R>(
    table: &CombTable<C>,
    m: &[u8],
    rng: Option<&mut R>,
) -> Result<AffinePoint<C>>
where
    C: Curve,
    R: RngCore + CryptoRng + ?Sized,
{
    let len = C::Fe::BYTES;
    debug_assert_eq!(m.len(), len);

    let mut mm = Zeroizing::new([0u8; crate::MAX_FE_BYTES]);
    let mut neg = Zeroizing::new([0u8; crate::MAX_FE_BYTES]);

    scalar::sub(C::ORDER, m, &mut neg[..len]);
    mm[..len].copy_from_slice(m);
    let even = !scalar::is_odd(m);
    scalar::conditional_assign(&mut mm[..len], &neg[..len], even);

    let mut r = mul_core(table, &mm[..len], rng)?;
    r.conditional_negate(even);
    Ok(r.to_affine())
}

/// Multiply `m · P` for an arbitrary base point, building a transient
/// table that is dropped on return.
pub(crate) fn mul_point<C, R>(
    m: &[u8],
    p: &AffinePoint<C>,
    rng: Option<&mut R>,
) -> Result<AffinePoint<C>>
where
    C: Curve,
    R: RngCore + CryptoRng + ?Sized,
{
    let table = CombTable::precompute(p, window_width::<C>(false));
    mul_with_table(&table, m, rng)
}
