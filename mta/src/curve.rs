//! Scalar/Point facade over the secp256k1 group, backed by [`k256`].
//!
//! This module is deliberately thin: field and group arithmetic, modular
//! bignum reduction and point compression are all provided by `k256`
//! (RustCrypto's pure-Rust secp256k1 implementation). The functions here
//! only adapt `k256`'s API to the exact shapes the OT/COT/MtA layers need
//! (32-byte big-endian scalars, 33-byte compressed points, rejection
//! sampling for nonzero scalars).

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::U256;
use rand::{CryptoRng, RngCore};

use crate::Error;

/// An element of the secp256k1 scalar field, always reduced mod `n`.
pub(crate) type Scalar = k256::Scalar;

/// A point on the secp256k1 curve, including the identity.
pub(crate) type Point = k256::ProjectivePoint;

/// 33-byte SEC1 compressed point encoding: `0x02|0x03 || x_be`.
pub(crate) type CompressedPoint = [u8; 33];

/// 32-byte big-endian scalar encoding.
pub(crate) type ScalarBytes = [u8; 32];

/// Draws a uniform scalar in `[1, n-1]` by rejection sampling.
pub(crate) fn scalar_random_nonzero<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = Scalar::random(&mut *rng);
        if !bool::from(s.is_zero()) {
            return s;
        }
    }
}

/// Draws a uniform scalar in `[0, n-1]`.
///
/// Single reduction of a uniform 256-bit draw; see the design notes on
/// the resulting (negligible) statistical bias.
pub(crate) fn scalar_random<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// Decodes a 32-byte big-endian buffer into a scalar, reducing mod `n`.
pub(crate) fn scalar_from_bytes_be(bytes: &ScalarBytes) -> Scalar {
    let field_bytes = k256::FieldBytes::from(*bytes);
    <Scalar as Reduce<U256>>::reduce_bytes(&field_bytes)
}

/// Encodes a scalar as 32 bytes big-endian.
pub(crate) fn scalar_to_bytes_be(s: &Scalar) -> ScalarBytes {
    s.to_repr().into()
}

pub(crate) fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
    a + b
}

pub(crate) fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
    a - b
}

pub(crate) fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
    a * b
}

pub(crate) fn scalar_neg(a: &Scalar) -> Scalar {
    -a
}

/// The value of bit `i` of `s`, for `0 <= i < 256`.
pub(crate) fn scalar_bit(s: &Scalar, i: usize) -> bool {
    debug_assert!(i < 256);
    let bytes = scalar_to_bytes_be(s);
    let byte = bytes[31 - i / 8];
    (byte >> (i % 8)) & 1 == 1
}

/// The scalar `2^i mod n`.
pub(crate) fn scalar_pow2(i: usize) -> Scalar {
    debug_assert!(i < 256);
    let mut bytes = [0u8; 32];
    bytes[31 - i / 8] = 1 << (i % 8);
    scalar_from_bytes_be(&bytes)
}

pub(crate) fn point_generator() -> Point {
    Point::GENERATOR
}

pub(crate) fn point_identity() -> Point {
    Point::IDENTITY
}

pub(crate) fn point_is_identity(p: &Point) -> bool {
    bool::from(Group::is_identity(p))
}

pub(crate) fn point_add(p: &Point, q: &Point) -> Point {
    p + q
}

pub(crate) fn point_neg(p: &Point) -> Point {
    -p
}

pub(crate) fn point_double(p: &Point) -> Point {
    p.double()
}

/// `k·G`.
pub(crate) fn mul_base(k: &Scalar) -> Point {
    Point::GENERATOR * k
}

/// `k·P`.
pub(crate) fn mul_point(k: &Scalar, p: &Point) -> Point {
    p * k
}

/// Compresses a point to its 33-byte SEC1 form.
///
/// Callers must not pass the identity: the OT layer never compresses an
/// identity point onto the wire (see invariant 2 in the data model).
pub(crate) fn compress(p: &Point) -> CompressedPoint {
    let encoded = p.to_affine().to_encoded_point(true);
    let bytes = encoded.as_bytes();
    let mut out = [0u8; 33];
    out.copy_from_slice(bytes);
    out
}

/// Decompresses a 33-byte SEC1 buffer, rejecting off-curve points and the
/// identity.
pub(crate) fn decompress(bytes: &CompressedPoint) -> Result<Point, Error> {
    let encoded = k256::EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidPoint)?;
    let affine = k256::AffinePoint::from_encoded_point(&encoded);
    let affine: k256::AffinePoint = Option::from(affine).ok_or(Error::InvalidPoint)?;
    let point = Point::from(affine);
    if point_is_identity(&point) {
        return Err(Error::InvalidPoint);
    }
    Ok(point)
}

/// The raw, uncompressed `X || Y` bytes fed into the key-derivation hash.
///
/// The OT layer prepends the `0x04` SEC1 tag itself so that the derived
/// key depends on the full uncompressed encoding, per spec.
pub(crate) fn point_xy_be(p: &Point) -> [u8; 64] {
    let affine = p.to_affine();
    let encoded = affine.to_encoded_point(false);
    let mut out = [0u8; 64];
    out.copy_from_slice(&encoded.as_bytes()[1..]);
    out
}
