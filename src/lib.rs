//! Constant-time elliptic curve group arithmetic for TLS.
//!
//! This crate is the curve core of a TLS stack: scalar multiplication on
//! the short Weierstrass curves NIST P-256 and P-384 (comb method with
//! signed odd digits, constant-time table scans and projective-coordinate
//! blinding) and, behind the `x25519` feature, the x-only Montgomery
//! ladder for Curve25519. Around the arithmetic sit the pieces the
//! handshake needs: SEC1 and RFC 8422 point encodings, the NamedCurve
//! registry, key generation and key/point validation.
//!
//! Everything operating on secret data executes a fixed sequence of
//! base-field operations and memory accesses; see the individual modules
//! for the countermeasures applied.
//!
//! ## ECDHE
//!
//! ```
//! use ecp::{CurveId, Group};
//! use rand_core::OsRng;
//!
//! let group = Group::new(CurveId::Secp256r1);
//! let alice = group.gen_keypair(&mut OsRng)?;
//! let bob = group.gen_keypair(&mut OsRng)?;
//!
//! let alice_shared = group.mul(&mut OsRng, alice.private_key().as_bytes(), bob.public_key())?;
//! let bob_shared = group.mul(&mut OsRng, bob.private_key().as_bytes(), alice.public_key())?;
//! assert_eq!(alice_shared, bob_shared);
//! # Ok::<(), ecp::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

mod arithmetic;
mod comb;
mod curve;
mod encoding;
mod error;
mod group;
mod jacobian;
mod keys;
#[cfg(feature = "x25519")]
mod mxz;
mod registry;
mod scalar;

pub use crate::error::{Error, Result};
pub use crate::group::{EcPoint, Group};
pub use crate::keys::{Keypair, SecretScalar};
pub use crate::registry::{
    curve_info, curve_info_from_tls_id, curves, preset_curves, CurveId, CurveInfo,
};

/// Widest field element in bytes across the registered curves (P-384).
pub(crate) const MAX_FE_BYTES: usize = 48;

/// Bounded redraw count shared by every rejection-sampling loop.
pub(crate) const RNG_RETRIES: usize = 10;
