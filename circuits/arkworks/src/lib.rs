//! arkworks R1CS Commitment Circuits
//!
//! Groth16 circuits over BN254 for two commitment schemes.
//!
//! # Available Circuits
//!
//! | Circuit | Statement | Public signals |
//! |---------|-----------|----------------|
//! | PedersenCircuit | C = v·G + r·H on Baby-Jubjub | C.x, C.y |
//! | HashSumCircuit | c_i = Poseidon(x_i, r_i), total = Σ x_i | c_1..c_n, total |
//!
//! # Public Signal Ordering
//!
//! Outputs are computed inside the circuit and allocated as instance
//! variables before anything else, so `public_signals[0]` is always the
//! first output. Callers rely on this positional contract.
//!
//! # Interview Q&A
//!
//! Q: 왜 Baby-Jubjub 위에서 Pedersen commitment를 계산하는가?
//! A: 좌표가 BN254 scalar field 원소이기 때문
//!    - 회로 안에서 non-native 연산 없이 점 덧셈 가능
//!    - Groth16 (BN254) 검증기를 그대로 EVM에 배포 가능

pub mod generators;
pub mod hash_sum;
pub mod pedersen;
pub mod poseidon;

pub use generators::PedersenGenerators;
pub use hash_sum::HashSumCircuit;
pub use pedersen::PedersenCircuit;

use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, SynthesisError};

/// Common type alias
pub type ConstraintF = Fr;

/// Result of witness generation
#[derive(Debug, Clone)]
pub struct CircuitOutputs {
    /// Instance assignment without the leading constant one
    pub public_signals: Vec<Fr>,
    /// Whether every constraint holds for this witness
    pub satisfied: bool,
}

/// Synthesize a circuit and read back its public signals
///
/// This is the witness-generation step: the circuit computes its own
/// outputs, and the instance assignment is returned in allocation order.
pub fn synthesize_outputs<C: ConstraintSynthesizer<Fr>>(circuit: C) -> Result<CircuitOutputs, SynthesisError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone())?;

    let satisfied = cs.is_satisfied()?;
    let public_signals = cs
        .borrow()
        .map(|inner| inner.instance_assignment[1..].to_vec())
        .ok_or(SynthesisError::MissingCS)?;

    Ok(CircuitOutputs {
        public_signals,
        satisfied,
    })
}
