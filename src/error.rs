//! Error types.

/// Result type with the `ecp` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Opaque error kinds surfaced by the curve core.
///
/// Variants deliberately carry no payload: neither the value nor the timing
/// of an error may depend on secret material.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed wire encoding: wrong length, unknown leading tag byte,
    /// or a coordinate that does not fit the base field.
    #[error("malformed input")]
    BadInput,

    /// The requested curve or point format is not supported by this build
    /// (unknown TLS curve identifier, compressed point forms).
    #[error("feature unavailable")]
    FeatureUnavailable,

    /// The output buffer is too small for the encoding being written.
    #[error("buffer too small")]
    NoSpace,

    /// Key or point validation failed, or the operands belong to a
    /// different curve than the group they were used with.
    #[error("invalid key or point")]
    Invalid,

    /// The CRNG failed to produce an acceptable value after the bounded
    /// number of redraws.
    #[error("random number generation failed")]
    RandomFailed,
}
