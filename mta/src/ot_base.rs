//! Chou-Orlandi-style 1-of-2 base oblivious transfer over secp256k1.
//!
//! Sender inputs `(m0, m1)`, receiver inputs a choice bit `c`, receiver
//! outputs `m_c`. Security is Diffie-Hellman key agreement: the sender
//! publishes `A = a·G`; the receiver picks `B = b·G` or `B = b·G + A`
//! depending on `c`, so that exactly one of the sender's two derivable
//! keys (`a·B` and `a·(B-A)`) matches the receiver's own `b·A`.

use rand::{CryptoRng, RngCore};

use crate::curve::{self, CompressedPoint, Scalar};
use crate::hash::{self, OtKey};
use crate::Error;

pub(crate) const MSG_LEN: usize = 32;

/// The type of message exchanged once a choice bit has been resolved.
pub(crate) type OtMessage = [u8; MSG_LEN];

/// Sender step 1: publish `A = a·G`.
///
/// `m0`/`m1` are accepted only because callers above this layer schedule
/// "begin session" and "commit these two plaintexts" together; the
/// plaintexts play no role until [`base_ot_encrypt`]. [`crate::cot`] takes
/// advantage of this by calling with placeholder plaintexts.
pub(crate) fn base_ot_sender_init<R: RngCore + CryptoRng>(
    _m0: &OtMessage,
    _m1: &OtMessage,
    rng: &mut R,
) -> (CompressedPoint, Scalar) {
    let a = curve::scalar_random_nonzero(rng);
    let big_a = curve::mul_base(&a);
    (curve::compress(&big_a), a)
}

/// Receiver step: derive `B` and the receiver's key `k_c`.
pub(crate) fn base_ot_receiver_choice<R: RngCore + CryptoRng>(
    msg_a: &CompressedPoint,
    choice: bool,
    rng: &mut R,
) -> Result<(CompressedPoint, OtKey), Error> {
    let big_a = curve::decompress(msg_a)?;
    let b = curve::scalar_random_nonzero(rng);
    let big_b_g = curve::mul_base(&b);
    let big_b = if choice {
        curve::point_add(&big_b_g, &big_a)
    } else {
        big_b_g
    };
    let shared = curve::mul_point(&b, &big_a);
    let k_c = hash::derive_key_from_point(&shared);
    Ok((curve::compress(&big_b), k_c))
}

/// Sender step 2: derive both candidate keys from the receiver's reply.
pub(crate) fn base_ot_sender_keys(
    a: &Scalar,
    msg_b: &CompressedPoint,
) -> Result<(OtKey, OtKey), Error> {
    let big_b = curve::decompress(msg_b)?;
    let big_a = curve::mul_base(a);
    let k0_point = curve::mul_point(a, &big_b);
    let b_minus_a = curve::point_add(&big_b, &curve::point_neg(&big_a));
    let k1_point = curve::mul_point(a, &b_minus_a);
    Ok((
        hash::derive_key_from_point(&k0_point),
        hash::derive_key_from_point(&k1_point),
    ))
}

/// Encrypts `m0` under `k0` and `m1` under `k1`.
pub(crate) fn base_ot_encrypt(
    m0: &OtMessage,
    m1: &OtMessage,
    k0: &OtKey,
    k1: &OtKey,
) -> (OtMessage, OtMessage) {
    (
        hash::xor_with_keystream(m0, k0),
        hash::xor_with_keystream(m1, k1),
    )
}

/// Receiver step 2: recover the chosen plaintext.
pub(crate) fn base_ot_receive(
    choice: bool,
    k_c: &OtKey,
    c0: &OtMessage,
    c1: &OtMessage,
) -> OtMessage {
    let chosen = if choice { c1 } else { c0 };
    hash::xor_with_keystream(chosen, k_c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn run(choice: bool, m0: OtMessage, m1: OtMessage) -> OtMessage {
        let (msg_a, a) = base_ot_sender_init(&m0, &m1, &mut OsRng);
        let (msg_b, k_c) = base_ot_receiver_choice(&msg_a, choice, &mut OsRng).unwrap();
        let (k0, k1) = base_ot_sender_keys(&a, &msg_b).unwrap();
        let (c0, c1) = base_ot_encrypt(&m0, &m1, &k0, &k1);
        base_ot_receive(choice, &k_c, &c0, &c1)
    }

    #[test]
    fn receiver_recovers_chosen_message() {
        let m0 = [0xAAu8; 32];
        let m1 = [0x55u8; 32];
        assert_eq!(run(false, m0, m1), m0);
        assert_eq!(run(true, m0, m1), m1);
    }

    #[test]
    fn scenario_e_base_ot_alone() {
        let m0 = [0xAAu8; 32];
        let m1 = [0x55u8; 32];
        assert_eq!(run(true, m0, m1), m1);
    }

    #[test]
    fn rejects_garbled_sender_message() {
        let mut garbage = [0u8; 33];
        garbage[0] = 0x02;
        assert!(base_ot_receiver_choice(&garbage, false, &mut OsRng).is_err());
    }

    #[test]
    fn rejects_garbled_receiver_message() {
        let (_, a) = base_ot_sender_init(&[0u8; 32], &[0u8; 32], &mut OsRng);
        let mut garbage = [0u8; 33];
        garbage[0] = 0x03;
        assert!(base_ot_sender_keys(&a, &garbage).is_err());
    }
}
