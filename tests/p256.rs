//! NIST P-256 end-to-end tests against published vectors.

use ecp::{CurveId, Error, Group};
use hex_literal::hex;
use rand_core::OsRng;

const G_UNCOMPRESSED: [u8; 65] = hex!(
    "04"
    "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
    "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
);

// NIST point-multiplication vector, k = 2
const TWO_G_UNCOMPRESSED: [u8; 65] = hex!(
    "04"
    "7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978"
    "07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1"
);

const ORDER_MINUS_ONE: [u8; 32] =
    hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632550");

fn group() -> Group {
    Group::new(CurveId::Secp256r1)
}

fn scalar(k: u8) -> [u8; 32] {
    let mut m = [0u8; 32];
    m[31] = k;
    m
}

fn encode(group: &Group, p: &ecp::EcPoint) -> Vec<u8> {
    let mut buf = [0u8; 65];
    let n = group.write_point(p, &mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn one_times_g_is_g() {
    let group = group();
    let r = group.mul_base(&mut OsRng, &scalar(1)).unwrap();
    assert_eq!(encode(&group, &r), G_UNCOMPRESSED);
}

#[test]
fn two_times_g_matches_the_nist_vector() {
    let group = group();
    let r = group.mul_base(&mut OsRng, &scalar(2)).unwrap();
    assert_eq!(encode(&group, &r), TWO_G_UNCOMPRESSED);
}

#[test]
fn multiplication_distributes_over_scalar_addition() {
    let group = group();
    let g = group.generator();
    // 2·G + 3·G = 5·G
    let lhs = group.muladd_vartime(&scalar(2), &scalar(3), &g).unwrap();
    let rhs = group.mul_base(&mut OsRng, &scalar(5)).unwrap();
    assert_eq!(lhs, rhs);
}

#[test]
fn adding_the_opposite_yields_infinity() {
    let group = group();
    let g = group.generator();
    // 1·G + (n − 1)·G = 0
    let sum = group.muladd_vartime(&scalar(1), &ORDER_MINUS_ONE, &g).unwrap();
    assert!(sum.is_identity());
    assert_eq!(encode(&group, &sum), [0x00]);
}

#[test]
fn ecdh_agreement() {
    let group = group();
    let alice = group.gen_keypair(&mut OsRng).unwrap();
    let bob = group.gen_keypair(&mut OsRng).unwrap();

    let alice_shared = group
        .mul(&mut OsRng, alice.private_key().as_bytes(), bob.public_key())
        .unwrap();
    let bob_shared = group
        .mul(&mut OsRng, bob.private_key().as_bytes(), alice.public_key())
        .unwrap();

    assert_eq!(alice_shared, bob_shared);

    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    alice_shared.write_x(&mut a).unwrap();
    bob_shared.write_x(&mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn off_curve_points_are_rejected() {
    let group = group();
    let mut bad = G_UNCOMPRESSED;
    bad[64] ^= 1;
    let p = group.read_point(&bad).unwrap();
    assert_eq!(group.check_pubkey(&p), Err(Error::Invalid));

    let alice = group.gen_keypair(&mut OsRng).unwrap();
    assert_eq!(
        group.mul(&mut OsRng, alice.private_key().as_bytes(), &p),
        Err(Error::Invalid)
    );
}

#[test]
fn out_of_range_scalars_are_rejected() {
    let group = group();
    let g = group.generator();
    assert_eq!(
        group.mul(&mut OsRng, &scalar(0), &g),
        Err(Error::Invalid)
    );

    let order = hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");
    assert_eq!(group.mul(&mut OsRng, &order, &g), Err(Error::Invalid));

    // n − 1 is the largest valid scalar
    assert!(group.mul(&mut OsRng, &ORDER_MINUS_ONE, &g).is_ok());
}

#[test]
fn generated_points_round_trip_through_sec1() {
    let group = group();
    let kp = group.gen_keypair(&mut OsRng).unwrap();
    let encoded = encode(&group, kp.public_key());
    assert_eq!(encoded.len(), 65);
    let decoded = group.read_point(&encoded).unwrap();
    assert_eq!(&decoded, kp.public_key());
}
