//! HashSumCircuit - batched Poseidon commitments with a public total
//!
//! For n values x_1..x_n with independent blindings r_1..r_n:
//!
//! ```text
//! commitment_i = Poseidon(x_i, r_i)
//! x_total      = x_1 + ... + x_n   (mod p)
//! ```
//!
//! # Circuit Constraints
//! 1. Booleanity + range: each x_i decomposed into num_bits bits
//! 2. Recomposition: x_i = Σ bit_j · 2^j
//! 3. Hash: commitment_i == Poseidon(x_i, r_i)
//! 4. Sum: x_total == Σ x_i
//!
//! # Public Inputs (in order)
//!
//! | Index | Signal |
//! |-------|--------|
//! | 0..n | commitment_i |
//! | n | x_total |

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::Zero;
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    R1CSVar,
};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::pedersen::alloc_bits;
use crate::poseidon::{hash_pair, hash_pair_var, poseidon_config};

/// Arity of the published batch example (x = [1, 2, 8])
pub const DEFAULT_ARITY: usize = 3;

/// Batched hash commitment circuit
#[derive(Clone)]
pub struct HashSumCircuit {
    /// Private: value bits per item (little-endian)
    pub value_bits: Option<Vec<Vec<bool>>>,
    /// Private: blinding per item
    pub blindings: Option<Vec<Fr>>,
    /// Number of items (fixed per instantiation)
    pub arity: usize,
    /// Bit length of each value
    pub num_bits: usize,
    poseidon: PoseidonConfig<Fr>,
}

impl HashSumCircuit {
    /// Create a new circuit with witness values
    pub fn new(value_bits: Vec<Vec<bool>>, blindings: Vec<Fr>, num_bits: usize) -> Self {
        let arity = value_bits.len();
        Self {
            value_bits: Some(value_bits),
            blindings: Some(blindings),
            arity,
            num_bits,
            poseidon: poseidon_config(),
        }
    }

    /// Create empty circuit for setup
    pub fn empty(arity: usize, num_bits: usize) -> Self {
        Self {
            value_bits: None,
            blindings: None,
            arity,
            num_bits,
            poseidon: poseidon_config(),
        }
    }

    /// Number of public signals: n commitments + total
    pub fn num_public_signals(&self) -> usize {
        self.arity + 1
    }

    /// Native computation of all public signals
    pub fn compute_outputs(config: &PoseidonConfig<Fr>, values: &[Fr], blindings: &[Fr]) -> (Vec<Fr>, Fr) {
        let commitments = values
            .iter()
            .zip(blindings)
            .map(|(x, r)| hash_pair(config, *x, *r))
            .collect();
        let total = values.iter().fold(Fr::zero(), |acc, x| acc + x);
        (commitments, total)
    }
}

impl ConstraintSynthesizer<Fr> for HashSumCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        if let Some(values) = &self.value_bits {
            if values.len() != self.arity {
                return Err(SynthesisError::AssignmentMissing);
            }
        }
        if let Some(blindings) = &self.blindings {
            if blindings.len() != self.arity {
                return Err(SynthesisError::AssignmentMissing);
            }
        }

        let mut commitments = Vec::with_capacity(self.arity);
        let mut total = FpVar::<Fr>::zero();

        for i in 0..self.arity {
            // ======== Private Inputs ========

            let bits = self.value_bits.as_ref().map(|v| v[i].as_slice());
            let bits = alloc_bits(&cs, bits, self.num_bits)?;
            let value = Boolean::le_bits_to_fp_var(&bits)?;

            let blinding = FpVar::new_witness(cs.clone(), || {
                self.blindings
                    .as_ref()
                    .map(|r| r[i])
                    .ok_or(SynthesisError::AssignmentMissing)
            })?;

            // ======== Per-item Commitment ========

            commitments.push(hash_pair_var(cs.clone(), &self.poseidon, &value, &blinding)?);
            total += &value;
        }

        // ======== Public Outputs: commitments, then total ========

        for commitment in &commitments {
            let public = FpVar::new_input(cs.clone(), || commitment.value())?;
            commitment.enforce_equal(&public)?;
        }

        let total_public = FpVar::new_input(cs.clone(), || total.value())?;
        total.enforce_equal(&total_public)?;

        Ok(())
    }
}
