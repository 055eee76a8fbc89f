//! Benchmarks for native commitments and witness generation
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use zk_pedersen_circuits::{synthesize_outputs, PedersenCircuit, PedersenGenerators};
use zk_pedersen_engine::{
    bits::{field_to_bits, CIRCUIT_BITS},
    commitment::{HashSumScheme, PedersenScheme},
    randomness::RandomnessSource,
    FieldElement,
};

fn bench_pedersen_commit(c: &mut Criterion) {
    let scheme = PedersenScheme::new(PedersenGenerators::default(), CIRCUIT_BITS);
    let mut rng = RandomnessSource::from_rng(StdRng::seed_from_u64(42));
    let value = FieldElement::from(42u64);
    let blinding = rng.next_curve_scalar().unwrap();

    c.bench_function("Pedersen commit (252-bit)", |b| {
        b.iter(|| scheme.commit(&value, &blinding).unwrap());
    });
}

fn bench_hash_sum_commit(c: &mut Criterion) {
    let scheme = HashSumScheme::poseidon(3, CIRCUIT_BITS);
    let mut rng = RandomnessSource::from_rng(StdRng::seed_from_u64(7));
    let values = [1u64, 2, 8].map(FieldElement::from);
    let blindings: Vec<_> = (0..3).map(|_| rng.next_field_element().unwrap()).collect();

    c.bench_function("Poseidon hash-sum commit (n = 3)", |b| {
        b.iter(|| scheme.commit(&values, &blindings).unwrap());
    });
}

fn bench_pedersen_witness(c: &mut Criterion) {
    let generators = PedersenGenerators::default();
    let value = field_to_bits(&FieldElement::from(42u64), CIRCUIT_BITS).unwrap();
    let blinding = field_to_bits(&FieldElement::from(123_456_789u64), CIRCUIT_BITS).unwrap();

    c.bench_function("PedersenCircuit witness generation", |b| {
        b.iter(|| {
            let circuit = PedersenCircuit::new(value.clone(), blinding.clone(), generators);
            let outputs = synthesize_outputs(circuit).unwrap();
            assert!(outputs.satisfied);
        });
    });
}

criterion_group!(benches, bench_pedersen_commit, bench_hash_sum_commit, bench_pedersen_witness);
criterion_main!(benches);
