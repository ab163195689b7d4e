//! Two-party Multiplicative-to-Additive (MtA) share conversion over the
//! secp256k1 scalar field.
//!
//! Given a private scalar `a` held by a [`mta::Sender`](Sender) and a
//! private scalar `b` held by a [`mta::Receiver`](Receiver), running the
//! protocol produces private scalars `c` (to the sender) and `d` (to the
//! receiver) such that
//!
//! ```text
//! a * b = c + d (mod n)
//! ```
//!
//! where `n` is the order of the secp256k1 group, and neither party
//! learns anything about the other's input beyond what its own output
//! implies. This is the standard MtA conversion used as a building block
//! in threshold ECDSA.
//!
//! The protocol is layered:
//!
//! * [`curve`] — a facade over secp256k1 field/group operations, backed
//!   by [`k256`].
//! * [`ot_base`] — a Chou-Orlandi-style 1-of-2 base oblivious transfer.
//! * [`cot`] — a correlated OT built on top of the base OT.
//! * [`mta`] — the bit-sliced driver that runs 256 parallel COT instances,
//!   one per bit of the receiver's share, and accumulates the shares.
//!
//! Communication channels are deliberately _not_ part of this crate: the
//! sending and receiving of messages between [`Sender`] and [`Receiver`]
//! is left to the caller, so the protocol can be driven over any
//! transport, synchronously or asynchronously.
//!
//! # Examples
//!
//! ```
//! use mta::{mta_verify, Receiver, Sender, Share};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! # fn main() -> Result<(), mta::Error> {
//! let a = Share::random(&mut rand::rngs::OsRng);
//! let b = Share::random(&mut rand::rngs::OsRng);
//!
//! let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
//! let mut receiver = Receiver::new(b, ChaCha20Rng::from_entropy());
//!
//! for i in 0..mta::NUM_BITS {
//!     let msg_a = sender.bit_message(i)?;
//!     let msg_b = receiver.bit_response(i, &msg_a)?;
//!     sender.bit_keys(i, &msg_b)?;
//!     let ct = sender.bit_encrypt(i)?;
//!     receiver.bit_complete(i, &ct)?;
//! }
//!
//! let c = sender.finalize()?;
//! let d = receiver.finalize()?;
//! assert!(mta_verify(a, b, c, d));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod cot;
pub(crate) mod curve;
mod hash;
pub mod mta;
mod ot_base;

pub use mta::{mta_verify, BitCiphertexts, BitMessageA, BitMessageB, Receiver, Sender, Share, NUM_BITS};

/// Errors occurring during the setup or execution of the MtA protocol and
/// its OT/COT building blocks.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// A required argument was missing, out of range, or otherwise
    /// malformed (e.g. a choice bit outside `{0,1}`, or a bit index
    /// outside `[0, 256)`).
    InvalidArgument,
    /// A point failed to decode, was not on the curve, or was the
    /// identity where a non-identity OT public key was required.
    InvalidPoint,
    /// A scalar value was degenerate where a nonzero value was required.
    InvalidScalar,
    /// The configured random source failed to produce entropy.
    EntropyFailure,
    /// The operation was invoked on a context of the wrong role (e.g. a
    /// sender-only operation called on a [`Receiver`]).
    WrongRole,
    /// The operation was invoked out of the causal order required for
    /// the affected bit (e.g. encrypting before the OT keys for that bit
    /// have been derived).
    PhaseViolation,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::InvalidPoint => {
                f.write_str("point failed to decode, was off-curve, or was the identity")
            }
            Error::InvalidScalar => f.write_str("scalar value was degenerate"),
            Error::EntropyFailure => f.write_str("random source failed to produce entropy"),
            Error::WrongRole => f.write_str("operation called on a context of the wrong role"),
            Error::PhaseViolation => {
                f.write_str("operation called out of order for this bit index")
            }
        }
    }
}
