//! The bit-sliced MtA driver: 256 parallel COT instances, one per bit of
//! the receiver's share, accumulated into additive shares.
//!
//! [`Sender`] and [`Receiver`] are distinct public types rather than two
//! arms of one tagged context, so that a sender-only operation cannot even
//! be named on a receiver's handle, let alone called on one at the wrong
//! time; see the crate's design notes on this choice.

use rand::{CryptoRng, RngCore};
use rand_chacha::ChaCha20Rng;
use tracing::{instrument, trace};
use zeroize::Zeroize;

use crate::cot;
use crate::curve::{self, Scalar, ScalarBytes};
use crate::hash::OtKey;
use crate::Error;

/// The number of bits in a secp256k1 scalar, and the number of parallel
/// COT instances a full MtA session runs.
pub const NUM_BITS: usize = 256;

/// A private scalar share, reduced mod the secp256k1 group order.
///
/// The same type represents both multiplicative inputs (`a`, `b`) and
/// additive outputs (`c`, `d`): all four live in the same scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share(ScalarBytes);

impl Share {
    /// Draws a uniform share.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Share(curve::scalar_to_bytes_be(&curve::scalar_random(rng)))
    }

    /// Wraps a 32-byte big-endian value, reducing it mod the group order.
    pub fn from_bytes_be(bytes: [u8; 32]) -> Self {
        Share(curve::scalar_to_bytes_be(&curve::scalar_from_bytes_be(
            &bytes,
        )))
    }

    /// Encodes the share as 32 bytes big-endian.
    pub fn to_bytes_be(self) -> [u8; 32] {
        self.0
    }

    fn scalar(&self) -> Scalar {
        curve::scalar_from_bytes_be(&self.0)
    }
}

/// The wire message a [`Sender`] sends to a [`Receiver`] to begin a bit's
/// OT exchange: a compressed point `A_i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMessageA(pub [u8; 33]);

/// The wire message a [`Receiver`] sends back: a compressed point `B_i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMessageB(pub [u8; 33]);

/// The pair of ciphertexts a [`Sender`] sends after deriving its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCiphertexts {
    /// Encryption of `m0_i` under `k0_i`.
    pub c0: [u8; 32],
    /// Encryption of `m1_i` under `k1_i`.
    pub c1: [u8; 32],
}

#[derive(Clone, Copy)]
enum SenderBitState {
    Pending,
    AwaitingReply {
        secret: ScalarBytes,
        m0: [u8; 32],
        m1: [u8; 32],
    },
    KeysDerived {
        m0: [u8; 32],
        m1: [u8; 32],
        k0: OtKey,
        k1: OtKey,
    },
    Done,
}

#[derive(Clone, Copy)]
enum ReceiverBitState {
    Pending,
    Responded { k_c: OtKey, choice: bool },
    Done,
}

/// The party holding the multiplicative share `a`.
///
/// Drives the sender side of 256 independent COT instances and, once
/// every bit is [`Sender::bit_encrypt`]-ed, computes the additive share
/// `c = -Σ U_i (mod n)`.
pub struct Sender {
    share: ScalarBytes,
    rng: ChaCha20Rng,
    masks: Box<[ScalarBytes; NUM_BITS]>,
    bits: Box<[SenderBitState; NUM_BITS]>,
}

impl Sender {
    /// Starts a new session holding multiplicative share `a`.
    ///
    /// All 256 per-bit masks `U_i` are drawn up front.
    #[instrument(skip_all)]
    pub fn new(share: Share, mut rng: ChaCha20Rng) -> Self {
        let masks = Box::new(std::array::from_fn(|_| {
            curve::scalar_to_bytes_be(&curve::scalar_random(&mut rng))
        }));
        trace!("sender session initialized");
        Self {
            share: share.0,
            rng,
            masks,
            bits: Box::new(std::array::from_fn(|_| SenderBitState::Pending)),
        }
    }

    /// Step (a): constructs the base-OT sender message for bit `i`.
    pub fn bit_message(&mut self, i: usize) -> Result<BitMessageA, Error> {
        let state = self.bits.get(i).ok_or(Error::InvalidArgument)?;
        if !matches!(state, SenderBitState::Pending) {
            return Err(Error::PhaseViolation);
        }

        let u_i = curve::scalar_from_bytes_be(&self.masks[i]);
        let a = curve::scalar_from_bytes_be(&self.share);
        let weighted = curve::scalar_mul(&a, &curve::scalar_pow2(i));

        let m0 = curve::scalar_to_bytes_be(&u_i);
        let m1 = curve::scalar_to_bytes_be(&curve::scalar_add(&u_i, &weighted));

        let (msg_a, secret) = crate::ot_base::base_ot_sender_init(&m0, &m1, &mut self.rng);
        self.bits[i] = SenderBitState::AwaitingReply {
            secret: curve::scalar_to_bytes_be(&secret),
            m0,
            m1,
        };
        Ok(BitMessageA(msg_a))
    }

    /// Step (c): derives this bit's OT keys from the receiver's reply.
    pub fn bit_keys(&mut self, i: usize, msg_b: &BitMessageB) -> Result<(), Error> {
        let state = self.bits.get(i).copied().ok_or(Error::InvalidArgument)?;
        let (secret, m0, m1) = match state {
            SenderBitState::AwaitingReply { secret, m0, m1 } => (secret, m0, m1),
            _ => return Err(Error::PhaseViolation),
        };
        let secret = curve::scalar_from_bytes_be(&secret);
        let (k0, k1) = crate::ot_base::base_ot_sender_keys(&secret, &msg_b.0)?;
        self.bits[i] = SenderBitState::KeysDerived { m0, m1, k0, k1 };
        Ok(())
    }

    /// Step (d): encrypts this bit's two plaintexts under its derived keys.
    pub fn bit_encrypt(&mut self, i: usize) -> Result<BitCiphertexts, Error> {
        let slot = self.bits.get_mut(i).ok_or(Error::InvalidArgument)?;
        let state = std::mem::replace(slot, SenderBitState::Pending);
        match state {
            SenderBitState::KeysDerived { m0, m1, k0, k1 } => {
                let (c0, c1) = crate::ot_base::base_ot_encrypt(&m0, &m1, &k0, &k1);
                self.bits[i] = SenderBitState::Done;
                Ok(BitCiphertexts { c0, c1 })
            }
            other => {
                self.bits[i] = other;
                Err(Error::PhaseViolation)
            }
        }
    }

    /// Computes `c = -Σ U_i (mod n)` once every bit has reached
    /// [`SenderBitState::Done`], zeroizing the masks afterward.
    #[instrument(skip_all)]
    pub fn finalize(&mut self) -> Result<Share, Error> {
        if !self.bits.iter().all(|b| matches!(b, SenderBitState::Done)) {
            return Err(Error::PhaseViolation);
        }
        let mut sum = curve::scalar_from_bytes_be(&[0u8; 32]);
        for mask in self.masks.iter() {
            sum = curve::scalar_add(&sum, &curve::scalar_from_bytes_be(mask));
        }
        let c = curve::scalar_neg(&sum);
        for mask in self.masks.iter_mut() {
            mask.zeroize();
        }
        trace!("sender finalized");
        Ok(Share(curve::scalar_to_bytes_be(&c)))
    }
}

impl Drop for Sender {
    fn drop(&mut self) {
        self.share.zeroize();
        for mask in self.masks.iter_mut() {
            mask.zeroize();
        }
        for bit in self.bits.iter_mut() {
            match bit {
                SenderBitState::AwaitingReply { secret, m0, m1 } => {
                    secret.zeroize();
                    m0.zeroize();
                    m1.zeroize();
                }
                SenderBitState::KeysDerived { m0, m1, k0, k1 } => {
                    m0.zeroize();
                    m1.zeroize();
                    k0.zeroize();
                    k1.zeroize();
                }
                SenderBitState::Pending | SenderBitState::Done => {}
            }
        }
    }
}

/// The party holding the multiplicative share `b`.
///
/// Drives the receiver side of 256 independent COT instances, picking a
/// choice bit from `b` for each one, and accumulates the additive share
/// `d = Σ m_i (mod n)`.
pub struct Receiver {
    share: ScalarBytes,
    rng: ChaCha20Rng,
    bits: Box<[ReceiverBitState; NUM_BITS]>,
    accumulator: ScalarBytes,
}

impl Receiver {
    /// Starts a new session holding multiplicative share `b`.
    #[instrument(skip_all)]
    pub fn new(share: Share, rng: ChaCha20Rng) -> Self {
        trace!("receiver session initialized");
        Self {
            share: share.0,
            rng,
            bits: Box::new(std::array::from_fn(|_| ReceiverBitState::Pending)),
            accumulator: [0u8; 32],
        }
    }

    /// Step (b): picks bit `i` of `b` as the choice bit and responds to
    /// the sender's base-OT message.
    pub fn bit_response(&mut self, i: usize, msg_a: &BitMessageA) -> Result<BitMessageB, Error> {
        let state = self.bits.get(i).ok_or(Error::InvalidArgument)?;
        if !matches!(state, ReceiverBitState::Pending) {
            return Err(Error::PhaseViolation);
        }

        let b = curve::scalar_from_bytes_be(&self.share);
        let choice = curve::scalar_bit(&b, i);

        let (msg_b, k_c) = cot::cot_receiver_choice(&msg_a.0, choice, &mut self.rng)?;
        self.bits[i] = ReceiverBitState::Responded { k_c, choice };
        Ok(BitMessageB(msg_b))
    }

    /// Step (e): decrypts the chosen ciphertext and folds it into the
    /// running additive accumulator.
    pub fn bit_complete(&mut self, i: usize, ct: &BitCiphertexts) -> Result<(), Error> {
        let slot = self.bits.get_mut(i).ok_or(Error::InvalidArgument)?;
        let state = std::mem::replace(slot, ReceiverBitState::Pending);
        match state {
            ReceiverBitState::Responded { k_c, choice } => {
                let m = crate::ot_base::base_ot_receive(choice, &k_c, &ct.c0, &ct.c1);
                let m = curve::scalar_from_bytes_be(&m);
                let acc = curve::scalar_add(&curve::scalar_from_bytes_be(&self.accumulator), &m);
                self.accumulator = curve::scalar_to_bytes_be(&acc);
                self.bits[i] = ReceiverBitState::Done;
                Ok(())
            }
            other => {
                self.bits[i] = other;
                Err(Error::PhaseViolation)
            }
        }
    }

    /// Exposes the additive share `d` once every bit has completed.
    #[instrument(skip_all)]
    pub fn finalize(&mut self) -> Result<Share, Error> {
        if !self
            .bits
            .iter()
            .all(|b| matches!(b, ReceiverBitState::Done))
        {
            return Err(Error::PhaseViolation);
        }
        trace!("receiver finalized");
        Ok(Share(self.accumulator))
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.share.zeroize();
        self.accumulator.zeroize();
        for bit in self.bits.iter_mut() {
            if let ReceiverBitState::Responded { k_c, .. } = bit {
                k_c.zeroize();
            }
        }
    }
}

/// Testing helper: verifies `(a · b) mod n = (c + d) mod n`.
pub fn mta_verify(a: Share, b: Share, c: Share, d: Share) -> bool {
    let lhs = curve::scalar_mul(&a.scalar(), &b.scalar());
    let rhs = curve::scalar_add(&c.scalar(), &d.scalar());
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn run_session(a: Share, b: Share) -> (Share, Share) {
        let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
        let mut receiver = Receiver::new(b, ChaCha20Rng::from_entropy());

        for i in 0..NUM_BITS {
            let msg_a = sender.bit_message(i).unwrap();
            let msg_b = receiver.bit_response(i, &msg_a).unwrap();
            sender.bit_keys(i, &msg_b).unwrap();
            let ct = sender.bit_encrypt(i).unwrap();
            receiver.bit_complete(i, &ct).unwrap();
        }

        (sender.finalize().unwrap(), receiver.finalize().unwrap())
    }

    #[test]
    fn scenario_a_tiny_values() {
        let a = Share::from_bytes_be({
            let mut b = [0u8; 32];
            b[31] = 3;
            b
        });
        let b = Share::from_bytes_be({
            let mut b = [0u8; 32];
            b[31] = 5;
            b
        });
        let (c, d) = run_session(a, b);
        assert!(mta_verify(a, b, c, d));
    }

    #[test]
    fn scenario_d_full_width_operands() {
        let mut a_bytes = [0xFFu8; 32];
        a_bytes[31] = 0x00;
        let a = Share::from_bytes_be(a_bytes);

        let mut b_bytes = [0u8; 32];
        b_bytes[0] = 0x01;
        b_bytes[1] = 0x23;
        b_bytes[30] = 0xCD;
        b_bytes[31] = 0xEF;
        let b = Share::from_bytes_be(b_bytes);

        let (c, d) = run_session(a, b);
        assert!(mta_verify(a, b, c, d));
    }

    #[test]
    fn correctness_random_trials() {
        use rand::rngs::OsRng;
        for _ in 0..5 {
            let a = Share::random(&mut OsRng);
            let b = Share::random(&mut OsRng);
            let (c, d) = run_session(a, b);
            assert!(mta_verify(a, b, c, d));
        }
    }

    #[test]
    fn out_of_order_bit_index_is_rejected() {
        let a = Share::random(&mut rand::rngs::OsRng);
        let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
        assert_eq!(sender.bit_message(NUM_BITS), Err(Error::InvalidArgument));
    }

    #[test]
    fn phase_violations_are_rejected_without_mutation() {
        let a = Share::random(&mut rand::rngs::OsRng);
        let b = Share::random(&mut rand::rngs::OsRng);
        let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
        let mut receiver = Receiver::new(b, ChaCha20Rng::from_entropy());

        // Can't derive keys before the bit has even started.
        let bogus_msg_b = BitMessageB([0u8; 33]);
        assert_eq!(
            sender.bit_keys(0, &bogus_msg_b),
            Err(Error::PhaseViolation)
        );
        // Can't encrypt before keys are derived.
        assert_eq!(sender.bit_encrypt(0), Err(Error::PhaseViolation));

        let msg_a = sender.bit_message(0).unwrap();
        // Can't encrypt before the receiver's reply has produced keys.
        assert_eq!(sender.bit_encrypt(0), Err(Error::PhaseViolation));

        let msg_b = receiver.bit_response(0, &msg_a).unwrap();
        // Can't respond to the same bit twice.
        assert_eq!(
            receiver.bit_response(0, &msg_a),
            Err(Error::PhaseViolation)
        );

        sender.bit_keys(0, &msg_b).unwrap();
        let ct = sender.bit_encrypt(0).unwrap();
        // Can't re-derive keys for a bit already encrypted.
        assert_eq!(sender.bit_keys(0, &msg_b), Err(Error::PhaseViolation));

        receiver.bit_complete(0, &ct).unwrap();
        assert_eq!(receiver.bit_complete(0, &ct), Err(Error::PhaseViolation));
    }

    #[test]
    fn finalize_before_all_bits_done_is_rejected() {
        let a = Share::random(&mut rand::rngs::OsRng);
        let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
        assert_eq!(sender.finalize(), Err(Error::PhaseViolation));
    }

    #[test]
    fn bit_order_independence() {
        let a = Share::random(&mut rand::rngs::OsRng);
        let b = Share::random(&mut rand::rngs::OsRng);

        let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
        let mut receiver = Receiver::new(b, ChaCha20Rng::from_entropy());

        let mut order: Vec<usize> = (0..NUM_BITS).collect();
        // Deterministic pseudo-shuffle: reverse, independent of any RNG.
        order.reverse();

        for i in order {
            let msg_a = sender.bit_message(i).unwrap();
            let msg_b = receiver.bit_response(i, &msg_a).unwrap();
            sender.bit_keys(i, &msg_b).unwrap();
            let ct = sender.bit_encrypt(i).unwrap();
            receiver.bit_complete(i, &ct).unwrap();
        }

        let c = sender.finalize().unwrap();
        let d = receiver.finalize().unwrap();
        assert!(mta_verify(a, b, c, d));
    }
}
