//! RFC 8422 wire-format tests: ECParameters and ECPoint framing.

use ecp::{CurveId, Error, Group};
use rand_core::OsRng;

#[test]
fn ecparameters_encode_as_named_curve() {
    let group = Group::new(CurveId::Secp256r1);
    let mut buf = [0u8; 3];
    assert_eq!(group.write_tls_params(&mut buf).unwrap(), 3);
    assert_eq!(buf, [0x03, 0x00, 23]);

    let (parsed, used) = Group::read_tls_params(&buf).unwrap();
    assert_eq!(used, 3);
    assert_eq!(parsed.id(), CurveId::Secp256r1);
}

#[test]
fn ecparameters_reject_other_curve_types() {
    // 0x01 = explicit_prime, deliberately unsupported
    assert_eq!(
        Group::read_tls_params(&[0x01, 0x00, 23]),
        Err(Error::BadInput)
    );
    assert_eq!(Group::read_tls_params(&[0x03, 0x00]), Err(Error::BadInput));
}

#[test]
fn unknown_named_curves_are_unavailable() {
    assert_eq!(
        Group::read_tls_params(&[0x03, 0x00, 22]).map(|_| ()),
        Err(Error::FeatureUnavailable)
    );
    assert_eq!(Group::from_tls_id(0xffff).map(|_| ()), Err(Error::FeatureUnavailable));
}

#[test]
fn tls_point_framing_round_trips() {
    let group = Group::new(CurveId::Secp256r1);
    let kp = group.gen_keypair(&mut OsRng).unwrap();

    let mut buf = [0u8; 66];
    let n = group.write_tls_point(kp.public_key(), &mut buf).unwrap();
    assert_eq!(n, 66);
    assert_eq!(buf[0], 65);

    let (parsed, used) = group.read_tls_point(&buf).unwrap();
    assert_eq!(used, 66);
    assert_eq!(&parsed, kp.public_key());
}

#[test]
fn tls_point_framing_for_p384() {
    let group = Group::new(CurveId::Secp384r1);
    let kp = group.gen_keypair(&mut OsRng).unwrap();

    let mut buf = [0u8; 98];
    let n = group.write_tls_point(kp.public_key(), &mut buf).unwrap();
    assert_eq!(n, 98);
    assert_eq!(buf[0], 97);
}

#[test]
fn tls_point_length_errors() {
    let group = Group::new(CurveId::Secp256r1);
    // empty buffer, zero length, truncated payload
    assert_eq!(group.read_tls_point(&[]).map(|_| ()), Err(Error::BadInput));
    assert_eq!(
        group.read_tls_point(&[0x00]).map(|_| ()),
        Err(Error::BadInput)
    );
    assert_eq!(
        group.read_tls_point(&[0x41, 0x04, 0x00]).map(|_| ()),
        Err(Error::BadInput)
    );

    let kp = group.gen_keypair(&mut OsRng).unwrap();
    let mut small = [0u8; 65];
    assert_eq!(
        group.write_tls_point(kp.public_key(), &mut small),
        Err(Error::NoSpace)
    );
}

#[test]
fn infinity_frames_as_a_single_zero_byte() {
    let group = Group::new(CurveId::Secp256r1);
    let infinity = group.read_point(&[0x00]).unwrap();
    assert!(infinity.is_identity());

    let mut buf = [0u8; 2];
    let n = group.write_tls_point(&infinity, &mut buf).unwrap();
    assert_eq!(&buf[..n], &[0x01, 0x00]);
}
