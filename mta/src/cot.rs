//! Correlated oblivious transfer (COT): a thin reduction to [`crate::ot_base`].
//!
//! The sender supplies `m0` and a correlation `Δ`; `m1` is fixed as
//! `m0 ⊕ Δ`. The only commitment the sender makes beyond a random `m0` is
//! `Δ`, and the receiver learns only the chosen output.

use rand::{CryptoRng, RngCore};

use crate::curve::{CompressedPoint, Scalar};
use crate::hash::OtKey;
use crate::ot_base::{self, OtMessage};
use crate::Error;

/// Sender step 1, with placeholder plaintexts: `Δ` is not needed until
/// [`cot_transfer`].
pub(crate) fn cot_sender_init<R: RngCore + CryptoRng>(rng: &mut R) -> (CompressedPoint, Scalar) {
    let placeholder = [0u8; 32];
    ot_base::base_ot_sender_init(&placeholder, &placeholder, rng)
}

/// Receiver step: identical to the base OT receiver step.
pub(crate) fn cot_receiver_choice<R: RngCore + CryptoRng>(
    msg_a: &CompressedPoint,
    choice: bool,
    rng: &mut R,
) -> Result<(CompressedPoint, OtKey), Error> {
    ot_base::base_ot_receiver_choice(msg_a, choice, rng)
}

/// Sender step 2: bind `m0` and the correlation `Δ`, then delegate to the
/// base OT's key derivation and encryption.
pub(crate) fn cot_transfer(
    delta: &OtMessage,
    a: &Scalar,
    msg_b: &CompressedPoint,
    m0: &OtMessage,
) -> Result<(OtMessage, OtMessage), Error> {
    let mut m1 = [0u8; 32];
    for i in 0..32 {
        m1[i] = m0[i] ^ delta[i];
    }
    let (k0, k1) = ot_base::base_ot_sender_keys(a, msg_b)?;
    Ok(ot_base::base_ot_encrypt(m0, &m1, &k0, &k1))
}

/// Receiver step 2: identical to the base OT receiver output step.
pub(crate) fn cot_receive(choice: bool, k_c: &OtKey, c0: &OtMessage, c1: &OtMessage) -> OtMessage {
    ot_base::base_ot_receive(choice, k_c, c0, c1)
}
