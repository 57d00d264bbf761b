//! Private scalars, keypairs and key generation.

use core::fmt;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::group::{EcPoint, Group};
use crate::registry::CurveId;
#[cfg(feature = "x25519")]
use crate::scalar;

/// A private scalar, zeroized on drop.
///
/// Held as big-endian bytes at the curve's scalar width for every curve,
/// including x-only ones.
#[derive(Clone)]
pub struct SecretScalar {
    curve: CurveId,
    len: usize,
    bytes: Zeroizing<[u8; crate::MAX_FE_BYTES]>,
}

impl SecretScalar {
    pub(crate) fn new(curve: CurveId, raw: &[u8]) -> Self {
        let mut bytes = Zeroizing::new([0u8; crate::MAX_FE_BYTES]);
        bytes[..raw.len()].copy_from_slice(raw);
        Self {
            curve,
            len: raw.len(),
            bytes,
        }
    }

    /// Wrap caller-supplied big-endian key material after validation.
    pub fn from_bytes(group: &Group, raw: &[u8]) -> Result<Self> {
        group.check_privkey(raw)?;
        Ok(Self::new(group.id(), raw))
    }

    /// Which curve this scalar belongs to.
    pub fn curve_id(&self) -> CurveId {
        self.curve
    }

    /// The scalar as big-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScalar")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// A private scalar together with its public point `Q = d·G`.
#[derive(Clone, Debug)]
pub struct Keypair {
    d: SecretScalar,
    q: EcPoint,
}

impl Keypair {
    /// The private scalar.
    pub fn private_key(&self) -> &SecretScalar {
        &self.d
    }

    /// The public point, normalised affine.
    pub fn public_key(&self) -> &EcPoint {
        &self.q
    }
}

impl Group {
    /// Generate a private scalar.
    ///
    /// Weierstrass curves use rejection sampling into `[1, n)`; x-only
    /// curves draw until nonzero and clamp. Both give up with
    /// [`Error::RandomFailed`] after ten out-of-range draws.
    pub fn gen_privkey<R>(&self, rng: &mut R) -> Result<SecretScalar>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let len = self.scalar_len();
        let mut buf = Zeroizing::new([0u8; crate::MAX_FE_BYTES]);

        match self.id() {
            CurveId::Secp256r1 | CurveId::Secp384r1 => {
                let shift = 8 * len - self.bits();
                for _ in 0..crate::RNG_RETRIES {
                    rng.fill_bytes(&mut buf[..len]);
                    buf[0] >>= shift;
                    if self.check_privkey(&buf[..len]).is_ok() {
                        return Ok(SecretScalar::new(self.id(), &buf[..len]));
                    }
                }
                Err(Error::RandomFailed)
            }
            #[cfg(feature = "x25519")]
            CurveId::Curve25519 => {
                for _ in 0..crate::RNG_RETRIES {
                    rng.fill_bytes(&mut buf[..len]);
                    if !bool::from(scalar::is_zero(&buf[..len])) {
                        clamp(&mut buf[..len]);
                        return Ok(SecretScalar::new(self.id(), &buf[..len]));
                    }
                }
                Err(Error::RandomFailed)
            }
        }
    }

    /// Import a private key.
    ///
    /// Weierstrass keys are big-endian and validated against the group
    /// order. x-only keys are the RFC 7748 little-endian form and are
    /// clamped here, mirroring what every X25519 implementation does on
    /// use.
    pub fn read_privkey(&self, raw: &[u8]) -> Result<SecretScalar> {
        if raw.len() != self.scalar_len() {
            return Err(Error::Invalid);
        }
        match self.id() {
            CurveId::Secp256r1 | CurveId::Secp384r1 => SecretScalar::from_bytes(self, raw),
            #[cfg(feature = "x25519")]
            CurveId::Curve25519 => {
                let mut be = Zeroizing::new([0u8; 32]);
                be.copy_from_slice(raw);
                be.reverse();
                clamp(&mut be[..]);
                Ok(SecretScalar::new(self.id(), &be[..]))
            }
        }
    }

    /// Generate a keypair: a fresh private scalar and its blinded
    /// base-point multiple, validated before it is returned.
    pub fn gen_keypair<R>(&self, rng: &mut R) -> Result<Keypair>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let d = self.gen_privkey(rng)?;
        let q = self.mul_base(rng, d.as_bytes())?;
        self.check_pubkey(&q)?;
        Ok(Keypair { d, q })
    }
}

/// RFC 7748 clamping on a big-endian scalar: clear the three low bits,
/// clear bit 255, set bit 254.
#[cfg(feature = "x25519")]
fn clamp(be: &mut [u8]) {
    be[31] &= 0xf8;
    be[0] &= 0x7f;
    be[0] |= 0x40;
}
