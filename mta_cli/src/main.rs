#![cfg(not(target_arch = "wasm32"))]

use clap::Parser;
use mta::{mta_verify, Receiver, Sender, Share, NUM_BITS};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

/// Runs a local two-party demonstration of the secp256k1 MtA protocol.
///
/// Both parties' shares are drawn in-process, so this binary is a
/// correctness demo and microbenchmark harness, not a networked client:
/// see the crate docs for driving the protocol across a real channel.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Sender's multiplicative share `a`, as a decimal integer. Random if
    /// omitted.
    #[arg(long)]
    a: Option<u64>,

    /// Receiver's multiplicative share `b`, as a decimal integer. Random
    /// if omitted.
    #[arg(long)]
    b: Option<u64>,
}

fn share_from_cli(value: Option<u64>, rng: &mut ChaCha20Rng) -> Share {
    match value {
        Some(v) => {
            let mut bytes = [0u8; 32];
            bytes[24..].copy_from_slice(&v.to_be_bytes());
            Share::from_bytes_be(bytes)
        }
        None => Share::random(rng),
    }
}

fn to_hex(bytes: [u8; 32]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut seed_rng = ChaCha20Rng::from_entropy();

    let a = share_from_cli(cli.a, &mut seed_rng);
    let b = share_from_cli(cli.b, &mut seed_rng);

    let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
    let mut receiver = Receiver::new(b, ChaCha20Rng::from_entropy());

    info!("running {} bit-sliced COT instances", NUM_BITS);
    for i in 0..NUM_BITS {
        let msg_a = sender.bit_message(i)?;
        let msg_b = receiver.bit_response(i, &msg_a)?;
        sender.bit_keys(i, &msg_b)?;
        let ct = sender.bit_encrypt(i)?;
        receiver.bit_complete(i, &ct)?;
    }

    let c = sender.finalize()?;
    let d = receiver.finalize()?;

    println!("c = {}", to_hex(c.to_bytes_be()));
    println!("d = {}", to_hex(d.to_bytes_be()));
    println!("a*b = c+d (mod n): {}", mta_verify(a, b, c, d));

    Ok(())
}
