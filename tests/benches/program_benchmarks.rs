//! # E-Voting Program Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Address derivation | canonical bump search for proposals and votes |
//! | Authorization | sign and verify a transaction |
//! | Transitions | create + vote through the in-memory service |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ed25519_dalek::SigningKey;
use evote_program::prelude::*;
use rand::rngs::OsRng;
use std::time::Duration;

// ============================================================================
// Address Derivation
// ============================================================================

fn bench_address_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("address-derivation");
    let program = default_program_id();
    let author = Address::new(SigningKey::generate(&mut OsRng).verifying_key().to_bytes());

    group.bench_function("find_proposal_address", |b| {
        b.iter(|| find_proposal_address(black_box(&program), black_box(&author), black_box(7)))
    });

    let (proposal, _) = find_proposal_address(&program, &author, 7).expect("derivable");
    group.bench_function("find_vote_address", |b| {
        b.iter(|| find_vote_address(black_box(&program), black_box(&proposal), black_box(&author)))
    });

    group.finish();
}

// ============================================================================
// Authorization
// ============================================================================

fn bench_transaction_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction-signatures");
    let program = default_program_id();
    let key = SigningKey::generate(&mut OsRng);
    let instruction = Instruction::VoteYes {
        proposal: Address::new([7u8; 32]),
    };

    group.bench_function("sign", |b| {
        b.iter(|| Transaction::sign(&key, &program, black_box(instruction.clone())))
    });

    let tx = Transaction::sign(&key, &program, instruction).expect("signable");
    group.bench_function("verify", |b| b.iter(|| black_box(&tx).verify(&program)));

    group.finish();
}

// ============================================================================
// Transitions
// ============================================================================

fn bench_voting_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("voting-session");
    group.measurement_time(Duration::from_secs(10));
    let runtime = tokio::runtime::Runtime::new().expect("runtime");

    for voters in [10u32, 100, 500] {
        group.throughput(Throughput::Elements(u64::from(voters)));
        group.bench_with_input(BenchmarkId::new("votes", voters), &voters, |b, &voters| {
            b.iter(|| {
                runtime.block_on(async {
                    let service = create_test_service();
                    let proposal = service
                        .create(&SigningKey::from_bytes(&[1u8; 32]), 0, "bench".into())
                        .await
                        .expect("created")
                        .proposal_address();
                    for i in 0..voters {
                        let mut seed = [0u8; 32];
                        seed[..4].copy_from_slice(&i.to_le_bytes());
                        service
                            .vote_yes(&SigningKey::from_bytes(&seed), proposal)
                            .await
                            .expect("vote accepted");
                    }
                    black_box(service.stats().await)
                })
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_address_derivation,
    bench_transaction_signatures,
    bench_voting_session
);
criterion_main!(benches);
