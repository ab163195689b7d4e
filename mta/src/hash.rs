//! Key derivation and stream encryption for the OT layer.
//!
//! Both primitives are defined directly in terms of SHA-256: a key is the
//! hash of an uncompressed point encoding, and encryption XORs a 32-byte
//! plaintext against the single repeating SHA-256 block `SHA-256(key)`.
//! This construction is only sound for messages of at most 32 bytes, which
//! is all the OT/COT/MtA layers above ever encrypt.

use sha2::{Digest, Sha256};

use crate::curve::{self, Point};

/// A 32-byte key derived from an elliptic curve point.
pub(crate) type OtKey = [u8; 32];

/// Derives a key from a point as `H(0x04 || X || Y)`, the uncompressed
/// SEC1 tag and coordinates.
pub(crate) fn derive_key_from_point(p: &Point) -> OtKey {
    let mut hasher = Sha256::new();
    hasher.update([0x04]);
    hasher.update(curve::point_xy_be(p));
    hasher.finalize().into()
}

/// XORs `data` against the single-block SHA-256 keystream of `key`.
///
/// Self-inverse: applying this twice with the same key returns the
/// original data.
pub(crate) fn xor_with_keystream(data: &[u8; 32], key: &OtKey) -> [u8; 32] {
    let keystream: [u8; 32] = Sha256::digest(key).into();
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = data[i] ^ keystream[i];
    }
    out
}
