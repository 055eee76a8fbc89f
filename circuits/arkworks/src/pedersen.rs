//! PedersenCircuit - single value elliptic commitment
//!
//! Proves knowledge of (value, blinding) such that
//! `commitment = value·G + blinding·H` on Baby-Jubjub.
//!
//! # Circuit Constraints
//! 1. Booleanity: every bit of value and blinding is 0 or 1
//! 2. Range: value, blinding < 2^num_bits (implied by the bit count)
//! 3. Scalar mul: double-and-add over the little-endian bits (G, H constant)
//! 4. Output: commitment.x, commitment.y exposed as public inputs
//!
//! # Public Inputs (in order)
//!
//! | Index | Signal |
//! |-------|--------|
//! | 0 | commitment.x |
//! | 1 | commitment.y |
//!
//! The outputs are computed inside the circuit and allocated as instance
//! variables, so the prover (not the caller) decides the public signals.

use ark_bn254::Fr;
use ark_ec::AffineRepr;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    eq::EqGadget,
    fields::fp::FpVar,
    groups::CurveVar,
    R1CSVar,
};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::generators::PedersenGenerators;

/// Bit length used by the published circuits (one bit short of the field)
pub const DEFAULT_NUM_BITS: usize = 252;

/// Number of public signals
pub const NUM_PUBLIC_SIGNALS: usize = 2;

/// Pedersen commitment circuit
#[derive(Clone)]
pub struct PedersenCircuit {
    /// Private: value bits (little-endian)
    pub value_bits: Option<Vec<bool>>,
    /// Private: blinding bits (little-endian)
    pub blinding_bits: Option<Vec<bool>>,
    /// Constant generators baked into the circuit
    pub generators: PedersenGenerators,
    /// Bit length of both scalars
    pub num_bits: usize,
}

impl PedersenCircuit {
    /// Create a new circuit with witness values
    pub fn new(value_bits: Vec<bool>, blinding_bits: Vec<bool>, generators: PedersenGenerators) -> Self {
        let num_bits = value_bits.len();
        Self {
            value_bits: Some(value_bits),
            blinding_bits: Some(blinding_bits),
            generators,
            num_bits,
        }
    }

    /// Create empty circuit for setup
    pub fn empty(generators: PedersenGenerators, num_bits: usize) -> Self {
        Self {
            value_bits: None,
            blinding_bits: None,
            generators,
            num_bits,
        }
    }
}

/// Allocate `n` boolean witnesses from an optional bit vector
pub(crate) fn alloc_bits(
    cs: &ConstraintSystemRef<Fr>,
    bits: Option<&[bool]>,
    n: usize,
) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    if let Some(bits) = bits {
        if bits.len() != n {
            return Err(SynthesisError::AssignmentMissing);
        }
    }

    (0..n)
        .map(|i| {
            Boolean::new_witness(cs.clone(), || {
                bits.and_then(|b| b.get(i).copied())
                    .ok_or(SynthesisError::AssignmentMissing)
            })
        })
        .collect()
}

impl ConstraintSynthesizer<Fr> for PedersenCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // ======== Allocate Private Inputs ========

        let value_bits = alloc_bits(&cs, self.value_bits.as_deref(), self.num_bits)?;
        let blinding_bits = alloc_bits(&cs, self.blinding_bits.as_deref(), self.num_bits)?;

        // ======== Constant Generators ========

        let g = EdwardsVar::constant(self.generators.g.into_group());
        let h = EdwardsVar::constant(self.generators.h.into_group());

        // ======== Commitment: value·G + blinding·H ========

        let commitment = g.scalar_mul_le(value_bits.iter())? + h.scalar_mul_le(blinding_bits.iter())?;

        // ======== Public Outputs (x, y) ========

        let x = FpVar::new_input(cs.clone(), || commitment.x.value())?;
        let y = FpVar::new_input(cs.clone(), || commitment.y.value())?;

        commitment.x.enforce_equal(&x)?;
        commitment.y.enforce_equal(&y)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesize_outputs;
    use ark_ed_on_bn254::EdwardsAffine;

    fn to_bits(x: u64, n: usize) -> Vec<bool> {
        (0..n).map(|i| i < 64 && (x >> i) & 1 == 1).collect()
    }

    fn native(gens: &PedersenGenerators, value: u64, blinding: u64) -> EdwardsAffine {
        gens.commit([value], [blinding])
    }

    #[test]
    fn test_outputs_match_native_commitment() {
        let gens = PedersenGenerators::default();
        let circuit = PedersenCircuit::new(
            to_bits(42, DEFAULT_NUM_BITS),
            to_bits(123_456_789, DEFAULT_NUM_BITS),
            gens,
        );

        let outputs = synthesize_outputs(circuit).unwrap();
        let expected = native(&gens, 42, 123_456_789);

        assert!(outputs.satisfied);
        assert_eq!(outputs.public_signals, vec![expected.x, expected.y]);
    }

    #[test]
    fn test_zero_value_and_blinding() {
        // 0·G + 0·H = identity (0, 1)
        let gens = PedersenGenerators::default();
        let circuit = PedersenCircuit::new(to_bits(0, 16), to_bits(0, 16), gens);

        let outputs = synthesize_outputs(circuit).unwrap();
        assert!(outputs.satisfied);
        assert_eq!(outputs.public_signals, vec![Fr::from(0u64), Fr::from(1u64)]);
    }

    #[test]
    fn test_bit_length_mismatch_rejected() {
        let gens = PedersenGenerators::default();
        let mut circuit = PedersenCircuit::new(to_bits(1, 16), to_bits(1, 8), gens);
        circuit.num_bits = 16;

        assert!(synthesize_outputs(circuit).is_err());
    }

    #[test]
    fn test_constraint_count() {
        use ark_relations::r1cs::ConstraintSystem;

        let gens = PedersenGenerators::default();
        let circuit = PedersenCircuit::new(
            to_bits(42, DEFAULT_NUM_BITS),
            to_bits(7, DEFAULT_NUM_BITS),
            gens,
        );

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();

        println!("\n=== PedersenCircuit R1CS Statistics ===");
        println!("Constraints: {}", cs.num_constraints());
        println!("Witness variables: {}", cs.num_witness_variables());
        println!("Public inputs: {}", cs.num_instance_variables());

        // 1 (constant) + x + y
        assert_eq!(cs.num_instance_variables(), 1 + NUM_PUBLIC_SIGNALS);
        // 2 × 252 booleanity constraints at minimum
        assert!(cs.num_constraints() > 2 * DEFAULT_NUM_BITS);
    }

    #[test]
    fn test_groth16_proof() {
        use ark_bn254::Bn254;
        use ark_groth16::Groth16;
        use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
        use ark_std::rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let gens = PedersenGenerators::default();

        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(
            PedersenCircuit::empty(gens, DEFAULT_NUM_BITS),
            &mut rng,
        ).unwrap();

        let circuit = PedersenCircuit::new(
            to_bits(42, DEFAULT_NUM_BITS),
            to_bits(99_999, DEFAULT_NUM_BITS),
            gens,
        );
        let proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng).unwrap();

        let commitment = native(&gens, 42, 99_999);
        let valid = Groth16::<Bn254>::verify(&vk, &[commitment.x, commitment.y], &proof).unwrap();
        assert!(valid, "Groth16 proof should be valid");

        // A + B + C, compressed: 32 + 64 + 32
        use ark_serialize::CanonicalSerialize;
        assert_eq!(proof.compressed_size(), 128);

        // Commitment to a different value must not verify
        let other = native(&gens, 43, 99_999);
        let invalid = Groth16::<Bn254>::verify(&vk, &[other.x, other.y], &proof).unwrap();
        assert!(!invalid);
    }
}
