//! SEC1 point encoding (§2.3.3 / §2.3.4, uncompressed forms only).
//!
//! Weierstrass points serialize as `0x04 ‖ X ‖ Y` with both coordinates
//! big-endian at the field width, or as the single byte `0x00` for the
//! point at infinity. Montgomery points serialize as the raw
//! little-endian x-coordinate per RFC 7748. The TLS framing on top of
//! these lives with the runtime [`crate::group::Group`].

use crate::arithmetic::FieldElement;
use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::jacobian::AffinePoint;

/// SEC1 tag for the point at infinity.
const TAG_INFINITY: u8 = 0x00;
/// SEC1 tag for an uncompressed point.
const TAG_UNCOMPRESSED: u8 = 0x04;
/// SEC1 tags for compressed points (unsupported).
const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;

/// Encoded length of a non-infinity point.
pub(crate) fn encoded_len<C: Curve>() -> usize {
    2 * C::Fe::BYTES + 1
}

/// Serialize a point; returns the number of bytes written.
pub(crate) fn write_affine<C: Curve>(p: &AffinePoint<C>, out: &mut [u8]) -> Result<usize> {
    if bool::from(p.is_identity()) {
        if out.is_empty() {
            return Err(Error::NoSpace);
        }
        out[0] = TAG_INFINITY;
        return Ok(1);
    }

    let plen = C::Fe::BYTES;
    if out.len() < encoded_len::<C>() {
        return Err(Error::NoSpace);
    }
    out[0] = TAG_UNCOMPRESSED;
    p.x.write_be_bytes(&mut out[1..1 + plen]);
    p.y.write_be_bytes(&mut out[1 + plen..1 + 2 * plen]);
    Ok(encoded_len::<C>())
}

/// Parse a SEC1 encoding.
///
/// Accepts exactly the two forms `write_affine` produces. The curve
/// equation is *not* checked here; public-key validation is a separate,
/// explicit step.
pub(crate) fn read_affine<C: Curve>(buf: &[u8]) -> Result<AffinePoint<C>> {
    match buf.first() {
        None => Err(Error::BadInput),
        Some(&TAG_INFINITY) if buf.len() == 1 => Ok(AffinePoint::IDENTITY),
        Some(&TAG_INFINITY) => Err(Error::BadInput),
        Some(&TAG_UNCOMPRESSED) => {
            let plen = C::Fe::BYTES;
            if buf.len() != encoded_len::<C>() {
                return Err(Error::BadInput);
            }
            let x = Option::from(C::Fe::from_be_bytes(&buf[1..1 + plen]));
            let y = Option::from(C::Fe::from_be_bytes(&buf[1 + plen..1 + 2 * plen]));
            match (x, y) {
                (Some(x), Some(y)) => Ok(AffinePoint { x, y, infinity: 0 }),
                _ => Err(Error::BadInput),
            }
        }
        Some(&TAG_COMPRESSED_EVEN) | Some(&TAG_COMPRESSED_ODD) => Err(Error::FeatureUnavailable),
        Some(_) => Err(Error::BadInput),
    }
}

/// Serialize a Montgomery x-coordinate, little-endian at field width.
#[cfg(feature = "x25519")]
pub(crate) fn write_mxz_x<F: FieldElement>(x: &F, out: &mut [u8]) -> Result<usize> {
    if out.len() < F::BYTES {
        return Err(Error::NoSpace);
    }
    x.write_be_bytes(&mut out[..F::BYTES]);
    out[..F::BYTES].reverse();
    Ok(F::BYTES)
}

/// Parse a little-endian Montgomery x-coordinate.
///
/// The high bit of the last byte is masked and non-canonical values are
/// reduced, as RFC 7748 prescribes.
#[cfg(feature = "x25519")]
pub(crate) fn read_mxz_x(buf: &[u8]) -> Result<crate::arithmetic::x25519::FieldElement> {
    if buf.len() != 32 {
        return Err(Error::BadInput);
    }
    let mut be = [0u8; 32];
    be.copy_from_slice(buf);
    be.reverse();
    be[0] &= 0x7f;
    Ok(crate::arithmetic::x25519::FieldElement::from_be_bytes_reduced(&be))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::NistP256;

    type Affine = AffinePoint<NistP256>;

    #[test]
    fn uncompressed_round_trip() {
        let mut buf = [0u8; 65];
        let n = write_affine::<NistP256>(&Affine::GENERATOR, &mut buf).unwrap();
        assert_eq!(n, 65);
        assert_eq!(buf[0], 0x04);
        assert_eq!(read_affine::<NistP256>(&buf).unwrap(), Affine::GENERATOR);
    }

    #[test]
    fn infinity_is_a_single_zero_byte() {
        let mut buf = [0u8; 65];
        let n = write_affine::<NistP256>(&Affine::IDENTITY, &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x00]);
        let p = read_affine::<NistP256>(&buf[..1]).unwrap();
        assert!(bool::from(p.is_identity()));
    }

    #[test]
    fn compressed_forms_are_unsupported() {
        let mut buf = [0u8; 65];
        write_affine::<NistP256>(&Affine::GENERATOR, &mut buf).unwrap();
        buf[0] = 0x02;
        assert_eq!(
            read_affine::<NistP256>(&buf[..33]),
            Err(Error::FeatureUnavailable)
        );
        buf[0] = 0x07;
        assert_eq!(read_affine::<NistP256>(&buf), Err(Error::BadInput));
    }

    #[test]
    fn length_mismatches_are_rejected() {
        let mut buf = [0u8; 65];
        write_affine::<NistP256>(&Affine::GENERATOR, &mut buf).unwrap();
        assert_eq!(read_affine::<NistP256>(&buf[..64]), Err(Error::BadInput));
        assert_eq!(read_affine::<NistP256>(&[]), Err(Error::BadInput));
        assert_eq!(read_affine::<NistP256>(&[0x00, 0x01]), Err(Error::BadInput));
    }

    #[test]
    fn short_output_buffers_are_rejected() {
        let mut buf = [0u8; 64];
        assert_eq!(
            write_affine::<NistP256>(&Affine::GENERATOR, &mut buf),
            Err(Error::NoSpace)
        );
        let mut empty: [u8; 0] = [];
        assert_eq!(
            write_affine::<NistP256>(&Affine::IDENTITY, &mut empty),
            Err(Error::NoSpace)
        );
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut buf = [0u8; 65];
        write_affine::<NistP256>(&Affine::GENERATOR, &mut buf).unwrap();
        // X = p is not a field element
        buf[1..33].copy_from_slice(&[
            0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff,
        ]);
        assert_eq!(read_affine::<NistP256>(&buf), Err(Error::BadInput));
    }

    #[cfg(feature = "x25519")]
    #[test]
    fn montgomery_x_round_trip() {
        let mut le = [0u8; 32];
        le[0] = 9;
        let x = read_mxz_x(&le).unwrap();
        let mut out = [0u8; 32];
        assert_eq!(write_mxz_x(&x, &mut out).unwrap(), 32);
        assert_eq!(out, le);
        assert_eq!(read_mxz_x(&le[..31]), Err(Error::BadInput));
    }
}
