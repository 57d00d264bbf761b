//! Runtime curve groups and points — the boundary the TLS layer works
//! against.
//!
//! A [`Group`] is an immutable descriptor of one registered curve; the
//! typed arithmetic underneath is selected per call. Points cross this
//! boundary in affine (or x-only) form, so every value a peer can hand
//! us is normalised by construction.

use once_cell::sync::OnceCell;
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};

use crate::arithmetic::FieldElement;
use crate::comb::{self, CombTable};
use crate::curve::{Curve, NistP256, NistP384};
use crate::encoding;
use crate::error::{Error, Result};
use crate::jacobian::{AffinePoint, JacPoint};
use crate::registry::{self, CurveId, CurveInfo};
use crate::scalar;

#[cfg(feature = "x25519")]
use crate::curve::{Curve25519, MontgomeryCurve};
#[cfg(feature = "x25519")]
use crate::mxz;

/// ECParameters curve-type byte for a named curve (RFC 8422 §5.4).
const CURVE_TYPE_NAMED: u8 = 0x03;

// Cached comb tables for the generators, built once on first use and
// immutable afterwards.
static P256_GEN_TABLE: OnceCell<CombTable<NistP256>> = OnceCell::new();
static P384_GEN_TABLE: OnceCell<CombTable<NistP384>> = OnceCell::new();

fn p256_gen_table() -> &'static CombTable<NistP256> {
    P256_GEN_TABLE.get_or_init(|| {
        CombTable::precompute(&AffinePoint::GENERATOR, comb::window_width::<NistP256>(true))
    })
}

fn p384_gen_table() -> &'static CombTable<NistP384> {
    P384_GEN_TABLE.get_or_init(|| {
        CombTable::precompute(&AffinePoint::GENERATOR, comb::window_width::<NistP384>(true))
    })
}

/// One registered elliptic curve group.
///
/// Cheap to copy and safe to share: the only mutable state behind it is
/// the lazily-built generator table, which sits behind a one-time latch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Group {
    info: &'static CurveInfo,
}

/// A point exchanged through a [`Group`].
///
/// Weierstrass points are affine coordinates plus an infinity flag;
/// Montgomery points are the bare x-coordinate.
#[derive(Clone, Copy, Debug)]
pub struct EcPoint {
    pub(crate) inner: PointRepr,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum PointRepr {
    P256(AffinePoint<NistP256>),
    P384(AffinePoint<NistP384>),
    #[cfg(feature = "x25519")]
    X25519(crate::arithmetic::x25519::FieldElement),
}

impl EcPoint {
    /// Which curve this point belongs to.
    pub fn curve_id(&self) -> CurveId {
        match &self.inner {
            PointRepr::P256(_) => CurveId::Secp256r1,
            PointRepr::P384(_) => CurveId::Secp384r1,
            #[cfg(feature = "x25519")]
            PointRepr::X25519(_) => CurveId::Curve25519,
        }
    }

    /// Whether this is the identity (point at infinity; zero x-coordinate
    /// for x-only curves).
    pub fn is_identity(&self) -> bool {
        match &self.inner {
            PointRepr::P256(p) => bool::from(p.is_identity()),
            PointRepr::P384(p) => bool::from(p.is_identity()),
            #[cfg(feature = "x25519")]
            PointRepr::X25519(x) => bool::from(x.is_zero()),
        }
    }

    /// Serialize the x-coordinate alone (the ECDH shared secret):
    /// big-endian for Weierstrass curves, little-endian for x-only
    /// curves. Returns the number of bytes written.
    pub fn write_x(&self, out: &mut [u8]) -> Result<usize> {
        match &self.inner {
            PointRepr::P256(p) => write_affine_x(p, out),
            PointRepr::P384(p) => write_affine_x(p, out),
            #[cfg(feature = "x25519")]
            PointRepr::X25519(x) => encoding::write_mxz_x(x, out),
        }
    }
}

impl ConstantTimeEq for EcPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        match (&self.inner, &other.inner) {
            (PointRepr::P256(a), PointRepr::P256(b)) => a.ct_eq(b),
            (PointRepr::P384(a), PointRepr::P384(b)) => a.ct_eq(b),
            #[cfg(feature = "x25519")]
            (PointRepr::X25519(a), PointRepr::X25519(b)) => a.ct_eq(b),
            _ => Choice::from(0),
        }
    }
}

impl PartialEq for EcPoint {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl Eq for EcPoint {}

fn write_affine_x<C: Curve>(p: &AffinePoint<C>, out: &mut [u8]) -> Result<usize> {
    if bool::from(p.is_identity()) {
        return Err(Error::Invalid);
    }
    if out.len() < C::Fe::BYTES {
        return Err(Error::NoSpace);
    }
    p.x.write_be_bytes(&mut out[..C::Fe::BYTES]);
    Ok(C::Fe::BYTES)
}

impl Group {
    /// The group for a registered curve.
    pub fn new(id: CurveId) -> Self {
        Self {
            info: registry::curve_info(id),
        }
    }

    /// The group for a TLS NamedCurve value.
    pub fn from_tls_id(tls_id: u16) -> Result<Self> {
        registry::curve_info_from_tls_id(tls_id)
            .map(|info| Self { info })
            .ok_or(Error::FeatureUnavailable)
    }

    /// Internal curve identifier.
    pub fn id(&self) -> CurveId {
        self.info.id
    }

    /// IANA NamedCurve value.
    pub fn tls_id(&self) -> u16 {
        self.info.tls_id
    }

    /// Curve size in bits.
    pub fn bits(&self) -> usize {
        usize::from(self.info.bit_size)
    }

    /// Printable curve name.
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    /// Length of a private scalar in bytes.
    pub fn scalar_len(&self) -> usize {
        (self.bits() + 7) / 8
    }

    /// The base point of the group.
    pub fn generator(&self) -> EcPoint {
        let inner = match self.id() {
            CurveId::Secp256r1 => PointRepr::P256(AffinePoint::GENERATOR),
            CurveId::Secp384r1 => PointRepr::P384(AffinePoint::GENERATOR),
            #[cfg(feature = "x25519")]
            CurveId::Curve25519 => PointRepr::X25519(Curve25519::GX),
        };
        EcPoint { inner }
    }

    /// Constant-time scalar multiplication `m · P` with projective
    /// blinding, for secret scalars.
    ///
    /// Both operands are validated first: `m` must pass
    /// [`Group::check_privkey`] and `P` must pass [`Group::check_pubkey`].
    /// The result is normalised affine.
    pub fn mul<R>(&self, rng: &mut R, m: &[u8], p: &EcPoint) -> Result<EcPoint>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.check_privkey(m)?;
        self.check_pubkey(p)?;

        let inner = match &p.inner {
            PointRepr::P256(a) => {
                PointRepr::P256(mul_weierstrass::<NistP256, R>(p256_gen_table, a, m, Some(rng))?)
            }
            PointRepr::P384(a) => {
                PointRepr::P384(mul_weierstrass::<NistP384, R>(p384_gen_table, a, m, Some(rng))?)
            }
            #[cfg(feature = "x25519")]
            PointRepr::X25519(x) => {
                PointRepr::X25519(mxz::mul_mxz::<Curve25519, R>(m, x, Some(rng))?)
            }
        };
        Ok(EcPoint { inner })
    }

    /// `m · G` with the cached generator table.
    pub fn mul_base<R>(&self, rng: &mut R, m: &[u8]) -> Result<EcPoint>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.mul(rng, m, &self.generator())
    }

    /// `m · G + n · Q`, variable time.
    ///
    /// This is the combination ECDSA verification needs; both scalars and
    /// `Q` are public there, and the implementation takes shortcuts for
    /// `m ∈ {1, n − 1}` and skips blinding. It must never be called with
    /// secret scalars. Not defined for x-only curves.
    pub fn muladd_vartime(&self, m: &[u8], n: &[u8], q: &EcPoint) -> Result<EcPoint> {
        self.check_privkey(m)?;
        self.check_privkey(n)?;
        self.check_pubkey(q)?;

        let inner = match &q.inner {
            PointRepr::P256(a) => {
                PointRepr::P256(muladd_weierstrass::<NistP256>(p256_gen_table, m, n, a)?)
            }
            PointRepr::P384(a) => {
                PointRepr::P384(muladd_weierstrass::<NistP384>(p384_gen_table, m, n, a)?)
            }
            #[cfg(feature = "x25519")]
            PointRepr::X25519(_) => return Err(Error::Invalid),
        };
        Ok(EcPoint { inner })
    }

    /// Validate a peer's public point: on the right curve, affine, and
    /// satisfying the curve equation. For x-only curves the encoding
    /// width is the only requirement, which the type already enforces.
    pub fn check_pubkey(&self, p: &EcPoint) -> Result<()> {
        if p.curve_id() != self.id() {
            return Err(Error::Invalid);
        }
        match &p.inner {
            PointRepr::P256(a) => check_weierstrass_pubkey(a),
            PointRepr::P384(a) => check_weierstrass_pubkey(a),
            #[cfg(feature = "x25519")]
            PointRepr::X25519(_) => Ok(()),
        }
    }

    /// Validate a private scalar: `1 ≤ d < n` for Weierstrass curves,
    /// clamped shape (low bits clear, fixed top bit) for x-only curves.
    pub fn check_privkey(&self, d: &[u8]) -> Result<()> {
        if d.len() != self.scalar_len() {
            return Err(Error::Invalid);
        }
        match self.id() {
            CurveId::Secp256r1 => check_weierstrass_privkey::<NistP256>(d),
            CurveId::Secp384r1 => check_weierstrass_privkey::<NistP384>(d),
            #[cfg(feature = "x25519")]
            CurveId::Curve25519 => check_clamped_privkey(d),
        }
    }

    /// Serialize a point: SEC1 uncompressed (or the raw little-endian
    /// x-coordinate for x-only curves). Returns the number of bytes
    /// written.
    pub fn write_point(&self, p: &EcPoint, out: &mut [u8]) -> Result<usize> {
        if p.curve_id() != self.id() {
            return Err(Error::Invalid);
        }
        match &p.inner {
            PointRepr::P256(a) => encoding::write_affine::<NistP256>(a, out),
            PointRepr::P384(a) => encoding::write_affine::<NistP384>(a, out),
            #[cfg(feature = "x25519")]
            PointRepr::X25519(x) => encoding::write_mxz_x(x, out),
        }
    }

    /// Parse a point in the format `write_point` produces.
    ///
    /// The curve equation is not checked here; call
    /// [`Group::check_pubkey`] on anything received from a peer.
    pub fn read_point(&self, buf: &[u8]) -> Result<EcPoint> {
        let inner = match self.id() {
            CurveId::Secp256r1 => PointRepr::P256(encoding::read_affine::<NistP256>(buf)?),
            CurveId::Secp384r1 => PointRepr::P384(encoding::read_affine::<NistP384>(buf)?),
            #[cfg(feature = "x25519")]
            CurveId::Curve25519 => PointRepr::X25519(encoding::read_mxz_x(buf)?),
        };
        Ok(EcPoint { inner })
    }

    /// Serialize a TLS ECPoint: one-byte length then the point
    /// (RFC 8422 §5.4).
    pub fn write_tls_point(&self, p: &EcPoint, out: &mut [u8]) -> Result<usize> {
        if out.is_empty() {
            return Err(Error::NoSpace);
        }
        let n = self.write_point(p, &mut out[1..])?;
        out[0] = n as u8;
        Ok(n + 1)
    }

    /// Parse a TLS ECPoint; returns the point and the bytes consumed.
    pub fn read_tls_point(&self, buf: &[u8]) -> Result<(EcPoint, usize)> {
        let (&len, rest) = buf.split_first().ok_or(Error::BadInput)?;
        let len = usize::from(len);
        if len == 0 || rest.len() < len {
            return Err(Error::BadInput);
        }
        Ok((self.read_point(&rest[..len])?, len + 1))
    }

    /// Serialize the TLS ECParameters for this group:
    /// `0x03 ‖ NamedCurve(u16)`.
    pub fn write_tls_params(&self, out: &mut [u8]) -> Result<usize> {
        if out.len() < 3 {
            return Err(Error::NoSpace);
        }
        out[0] = CURVE_TYPE_NAMED;
        out[1..3].copy_from_slice(&self.tls_id().to_be_bytes());
        Ok(3)
    }

    /// Parse TLS ECParameters; returns the group and the bytes consumed.
    ///
    /// Only the named-curve form is defined; any other curve-type byte is
    /// malformed, and an unknown NamedCurve is unsupported rather than
    /// malformed.
    pub fn read_tls_params(buf: &[u8]) -> Result<(Group, usize)> {
        if buf.len() < 3 {
            return Err(Error::BadInput);
        }
        if buf[0] != CURVE_TYPE_NAMED {
            return Err(Error::BadInput);
        }
        let group = Self::from_tls_id(u16::from_be_bytes([buf[1], buf[2]]))?;
        Ok((group, 3))
    }
}

fn mul_weierstrass<C, R>(
    gen_table: fn() -> &'static CombTable<C>,
    base: &AffinePoint<C>,
    m: &[u8],
    rng: Option<&mut R>,
) -> Result<AffinePoint<C>>
where
    C: Curve,
    R: RngCore + CryptoRng + ?Sized,
{
    // Whether the base is the generator is public, so this branch is
    // fine; it selects the cached wide table over a transient one.
    if bool::from(base.ct_eq(&AffinePoint::GENERATOR)) {
        comb::mul_with_table(gen_table(), m, rng)
    } else {
        comb::mul_point(m, base, rng)
    }
}

fn muladd_weierstrass<C: Curve>(
    gen_table: fn() -> &'static CombTable<C>,
    m: &[u8],
    n: &[u8],
    q: &AffinePoint<C>,
) -> Result<AffinePoint<C>> {
    let len = C::Fe::BYTES;

    let mut one = [0u8; crate::MAX_FE_BYTES];
    one[len - 1] = 1;
    let mut n_m1 = [0u8; crate::MAX_FE_BYTES];
    scalar::sub(C::ORDER, &one[..len], &mut n_m1[..len]);

    // Public-input shortcuts for the common ECDSA verification shapes.
    let mg = if m == &one[..len] {
        AffinePoint::GENERATOR
    } else if m == &n_m1[..len] {
        AffinePoint::GENERATOR.neg()
    } else {
        comb::mul_with_table(gen_table(), m, None::<&mut NoRng>)?
    };

    let nq = comb::mul_point(n, q, None::<&mut NoRng>)?;
    Ok(JacPoint::from_affine(&mg).add_mixed(&nq).to_affine())
}

fn check_weierstrass_pubkey<C: Curve>(p: &AffinePoint<C>) -> Result<()> {
    if bool::from(p.is_on_curve()) {
        Ok(())
    } else {
        Err(Error::Invalid)
    }
}

fn check_weierstrass_privkey<C: Curve>(d: &[u8]) -> Result<()> {
    let valid = !scalar::is_zero(d) & scalar::lt(d, C::ORDER);
    if bool::from(valid) {
        Ok(())
    } else {
        Err(Error::Invalid)
    }
}

/// A clamped x25519 scalar has its three low bits clear and bit 254 as
/// its highest set bit (bit length exactly 255).
#[cfg(feature = "x25519")]
fn check_clamped_privkey(d: &[u8]) -> Result<()> {
    if d[31] & 0x07 == 0 && d[0] & 0xc0 == 0x40 {
        Ok(())
    } else {
        Err(Error::Invalid)
    }
}

/// Uninhabited RNG for the unblinded, public-input paths.
enum NoRng {}

impl RngCore for NoRng {
    fn next_u32(&mut self) -> u32 {
        match *self {}
    }

    fn next_u64(&mut self) -> u64 {
        match *self {}
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        match *self {}
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        match *self {}
    }
}

impl CryptoRng for NoRng {}
