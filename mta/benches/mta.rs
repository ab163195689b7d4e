use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion};
use mta::{Receiver, Sender, Share, NUM_BITS};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn full_session_benchmark(c: &mut Criterion) {
    let setup_start = Instant::now();
    let a = Share::random(&mut rand::rngs::OsRng);
    let b = Share::random(&mut rand::rngs::OsRng);
    println!("share setup took {:?}", setup_start.elapsed());

    c.bench_function("mta 256-bit session", |bencher| {
        bencher.iter(|| {
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
        })
    });
}

fn single_bit_benchmark(c: &mut Criterion) {
    let a = Share::random(&mut rand::rngs::OsRng);
    let b = Share::random(&mut rand::rngs::OsRng);

    c.bench_function("mta single bit exchange", |bencher| {
        bencher.iter(|| {
            let mut sender = Sender::new(a, ChaCha20Rng::from_entropy());
            let mut receiver = Receiver::new(b, ChaCha20Rng::from_entropy());

            let msg_a = sender.bit_message(0).unwrap();
            let msg_b = receiver.bit_response(0, &msg_a).unwrap();
            sender.bit_keys(0, &msg_b).unwrap();
            sender.bit_encrypt(0).unwrap()
        })
    });
}

criterion_group!(benches, full_session_benchmark, single_bit_benchmark);
criterion_main!(benches);
