//! Batched hash-sum commitment
//!
//! c_i = hash(x_i, r_i) for independent r_i, and x_total = Σ x_i mod p.
//! The prover emits x_total as its last public signal; equality with the
//! locally summed values is the core correctness check.

use rand_core::{CryptoRng, RngCore};

use super::{ensure_fits, CommitmentHasher, PoseidonHasher};
use crate::error::{EngineError, EngineResult};
use crate::field::{self, FieldElement};
use crate::randomness::RandomnessSource;
use crate::types::HashSumOpening;

/// Per-item commitments and the public total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCommitment {
    pub commitments: Vec<FieldElement>,
    pub total: FieldElement,
}

/// Hash-sum scheme with a fixed arity
pub struct HashSumScheme<H: CommitmentHasher = PoseidonHasher> {
    hasher: H,
    arity: usize,
    num_bits: usize,
}

impl HashSumScheme<PoseidonHasher> {
    /// Poseidon-backed scheme matching `HashSumCircuit`
    pub fn poseidon(arity: usize, num_bits: usize) -> Self {
        Self::with_hasher(PoseidonHasher::new(), arity, num_bits)
    }
}

impl<H: CommitmentHasher> HashSumScheme<H> {
    pub fn with_hasher(hasher: H, arity: usize, num_bits: usize) -> Self {
        Self {
            hasher,
            arity,
            num_bits,
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    fn check_shape(&self, values: &[FieldElement], blindings: &[FieldElement]) -> EngineResult<()> {
        if values.len() != self.arity {
            return Err(EngineError::ShapeMismatch {
                what: "values",
                expected: self.arity,
                actual: values.len(),
            });
        }
        if blindings.len() != values.len() {
            return Err(EngineError::ShapeMismatch {
                what: "blindings",
                expected: values.len(),
                actual: blindings.len(),
            });
        }
        Ok(())
    }

    pub fn commit(&self, values: &[FieldElement], blindings: &[FieldElement]) -> EngineResult<BatchCommitment> {
        self.check_shape(values, blindings)?;
        for value in values {
            ensure_fits("x_i", value, self.num_bits)?;
        }

        let commitments = values
            .iter()
            .zip(blindings)
            .map(|(x, r)| self.hasher.hash(x, r))
            .collect();

        Ok(BatchCommitment {
            commitments,
            total: field::sum(values),
        })
    }

    /// Draw one blinding per value and commit
    pub fn commit_fresh<R: RngCore + CryptoRng>(
        &self,
        values: &[FieldElement],
        rng: &mut RandomnessSource<R>,
    ) -> EngineResult<HashSumOpening> {
        let blindings = values
            .iter()
            .map(|_| rng.next_field_element())
            .collect::<EngineResult<Vec<_>>>()?;
        let batch = self.commit(values, &blindings)?;

        tracing::debug!(arity = self.arity, "hash-sum commitment created");

        Ok(HashSumOpening {
            values: values.to_vec(),
            blindings,
            commitments: batch.commitments,
            total: batch.total,
        })
    }

    /// Recompute every item and the total
    pub fn open(&self, commitment: &BatchCommitment, values: &[FieldElement], blindings: &[FieldElement]) -> bool {
        match self.commit(values, blindings) {
            Ok(recomputed) => recomputed == *commitment,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::CIRCUIT_BITS;
    use rand::{rngs::StdRng, SeedableRng};

    /// Deterministic stand-in: hash(x, r) = 7x + r
    struct LinearHasher;

    impl CommitmentHasher for LinearHasher {
        fn hash(&self, value: &FieldElement, blinding: &FieldElement) -> FieldElement {
            FieldElement::from(7u64) * value + blinding
        }
    }

    fn fe(values: &[u64]) -> Vec<FieldElement> {
        values.iter().map(|v| FieldElement::from(*v)).collect()
    }

    #[test]
    fn test_commit_with_mock_hasher() {
        let scheme = HashSumScheme::with_hasher(LinearHasher, 3, CIRCUIT_BITS);
        let batch = scheme.commit(&fe(&[1, 2, 8]), &fe(&[10, 20, 30])).unwrap();

        assert_eq!(batch.commitments, fe(&[17, 34, 86]));
        assert_eq!(batch.total, FieldElement::from(11u64));
    }

    #[test]
    fn test_total_wraps_modulo_p() {
        let p_minus_one = field::reduce(&(field::modulus() - 1u32));
        let scheme = HashSumScheme::with_hasher(LinearHasher, 2, 254);
        let batch = scheme
            .commit(&[p_minus_one, FieldElement::from(2u64)], &fe(&[0, 0]))
            .unwrap();
        assert_eq!(batch.total, FieldElement::from(1u64));
    }

    #[test]
    fn test_shape_mismatch() {
        let scheme = HashSumScheme::with_hasher(LinearHasher, 3, CIRCUIT_BITS);

        let err = scheme.commit(&fe(&[1, 2, 8]), &fe(&[1, 2])).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch { what: "blindings", expected: 3, actual: 2 }));

        let err = scheme.commit(&fe(&[1, 2]), &fe(&[1, 2])).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch { what: "values", expected: 3, actual: 2 }));
    }

    #[test]
    fn test_poseidon_commit_fresh_and_open() {
        let scheme = HashSumScheme::poseidon(3, CIRCUIT_BITS);
        let mut rng = RandomnessSource::from_rng(StdRng::seed_from_u64(3));
        let values = fe(&[1, 2, 8]);

        let opening = scheme.commit_fresh(&values, &mut rng).unwrap();
        assert_eq!(opening.total, FieldElement::from(11u64));
        assert_eq!(opening.commitments.len(), 3);

        let batch = BatchCommitment {
            commitments: opening.commitments.clone(),
            total: opening.total,
        };
        assert!(scheme.open(&batch, &values, &opening.blindings));

        let mut tampered = opening.blindings.clone();
        tampered[1] += FieldElement::from(1u64);
        assert!(!scheme.open(&batch, &values, &tampered));
    }

    #[test]
    fn test_equal_values_get_distinct_commitments() {
        let scheme = HashSumScheme::poseidon(2, CIRCUIT_BITS);
        let mut rng = RandomnessSource::os();
        let opening = scheme.commit_fresh(&fe(&[5, 5]), &mut rng).unwrap();
        assert_ne!(opening.commitments[0], opening.commitments[1]);
    }
}
