//! Single-value elliptic commitment: C = value·G + blinding·H

use ark_ed_on_bn254::Fr as ScalarField;
use ark_ff::PrimeField;
use rand_core::{CryptoRng, RngCore};
use zk_pedersen_circuits::PedersenGenerators;

use super::{ensure_curve_scalar, ensure_fits};
use crate::error::EngineResult;
use crate::field::FieldElement;
use crate::randomness::RandomnessSource;
use crate::types::{CurvePoint, PedersenOpening};

/// Pedersen commitment scheme over Baby-Jubjub
#[derive(Debug, Clone)]
pub struct PedersenScheme {
    generators: PedersenGenerators,
    num_bits: usize,
}

impl PedersenScheme {
    pub fn new(generators: PedersenGenerators, num_bits: usize) -> Self {
        if generators.is_toy() {
            tracing::warn!("Pedersen scheme uses toy generators (H = 1·G); commitments are NOT binding");
        }
        Self { generators, num_bits }
    }

    pub fn generators(&self) -> &PedersenGenerators {
        &self.generators
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// value·G + blinding·H
    ///
    /// Both scalars must fit `num_bits`, the width the circuit decomposes
    /// them into, and lie below the subgroup order l.
    pub fn commit(&self, value: &FieldElement, blinding: &FieldElement) -> EngineResult<CurvePoint> {
        self.check_scalar("value", value)?;
        self.check_scalar("blinding", blinding)?;

        let point = self
            .generators
            .commit(value.into_bigint(), blinding.into_bigint());
        Ok(CurvePoint::from(point))
    }

    fn check_scalar(&self, what: &str, scalar: &FieldElement) -> EngineResult<()> {
        ensure_fits(what, scalar, self.num_bits)?;
        ensure_curve_scalar(what, scalar)
    }

    /// Recompute and compare coordinates
    ///
    /// Out-of-range scalars cannot have produced a commitment, so they do not open it.
    pub fn open(&self, commitment: &CurvePoint, value: &FieldElement, blinding: &FieldElement) -> bool {
        match self.commit(value, blinding) {
            Ok(recomputed) => recomputed == *commitment,
            Err(_) => false,
        }
    }

    /// Draw a blinding factor and commit
    pub fn commit_fresh<R: RngCore + CryptoRng>(
        &self,
        value: &FieldElement,
        rng: &mut RandomnessSource<R>,
    ) -> EngineResult<PedersenOpening> {
        self.check_scalar("value", value)?;
        // uniform below l when the width allows it, else uniform below 2^num_bits (< l)
        let blinding = if self.num_bits >= ScalarField::MODULUS_BIT_SIZE as usize {
            rng.next_curve_scalar()?
        } else {
            rng.next_bounded(self.num_bits)?
        };
        let commitment = self.commit(value, &blinding)?;

        tracing::debug!(num_bits = self.num_bits, "Pedersen commitment created");

        Ok(PedersenOpening {
            value: *value,
            blinding,
            commitment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::CIRCUIT_BITS;
    use crate::error::EngineError;
    use ark_ec::{AffineRepr, CurveGroup};
    use num_bigint::BigUint;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn scheme() -> PedersenScheme {
        PedersenScheme::new(PedersenGenerators::default(), CIRCUIT_BITS)
    }

    #[test]
    fn test_commit_deterministic() {
        let scheme = scheme();
        let v = FieldElement::from(42u64);
        let r = FieldElement::from(123_456_789u64);

        assert_eq!(scheme.commit(&v, &r).unwrap(), scheme.commit(&v, &r).unwrap());
    }

    #[test]
    fn test_commit_matches_group_law() {
        let scheme = scheme();
        let gens = scheme.generators();
        let c = scheme
            .commit(&FieldElement::from(3u64), &FieldElement::from(5u64))
            .unwrap();

        let expected = (gens.g * ScalarField::from(3u64) + gens.h * ScalarField::from(5u64)).into_affine();
        assert_eq!(c, CurvePoint::from(expected));
    }

    #[test]
    fn test_hiding_over_many_blindings() {
        let scheme = scheme();
        let mut rng = RandomnessSource::os();
        let v = FieldElement::from(42u64);

        let commitments: HashSet<_> = (0..1000)
            .map(|_| {
                let opening = scheme.commit_fresh(&v, &mut rng).unwrap();
                (opening.commitment.x, opening.commitment.y)
            })
            .collect();

        assert_eq!(commitments.len(), 1000);
    }

    #[test]
    fn test_open() {
        let scheme = scheme();
        let mut rng = RandomnessSource::from_rng(StdRng::seed_from_u64(7));
        let v = FieldElement::from(42u64);

        let opening = scheme.commit_fresh(&v, &mut rng).unwrap();
        assert!(scheme.open(&opening.commitment, &v, &opening.blinding));

        let other = opening.blinding + FieldElement::from(1u64);
        assert!(!scheme.open(&opening.commitment, &v, &other));
        assert!(!scheme.open(&opening.commitment, &FieldElement::from(43u64), &opening.blinding));
    }

    #[test]
    fn test_fresh_blinding_fits_circuit() {
        let scheme = scheme();
        let mut rng = RandomnessSource::from_rng(StdRng::seed_from_u64(11));
        for _ in 0..100 {
            let opening = scheme.commit_fresh(&FieldElement::from(1u64), &mut rng).unwrap();
            assert!(crate::field::to_integer(&opening.blinding).bits() <= CIRCUIT_BITS as u64);
        }
    }

    #[test]
    fn test_rejects_oversized_value() {
        let scheme = PedersenScheme::new(PedersenGenerators::default(), 8);
        let err = scheme
            .commit(&FieldElement::from(256u64), &FieldElement::from(1u64))
            .unwrap_err();
        assert!(matches!(err, EngineError::ValueOutOfRange(_)));

        let c = scheme
            .commit(&FieldElement::from(255u64), &FieldElement::from(1u64))
            .unwrap();
        assert!(!scheme.open(&c, &FieldElement::from(256u64), &FieldElement::from(0u64)));
    }

    fn subgroup_order() -> BigUint {
        BigUint::from(ScalarField::MODULUS)
    }

    #[test]
    fn test_scalars_aliasing_mod_l_do_not_open() {
        let scheme = scheme();
        let v = FieldElement::from(42u64);
        let b = FieldElement::from(5u64);
        let c = scheme.commit(&v, &b).unwrap();

        // b + l and v + l fit in 252 bits and name the same point
        let b_alias = crate::field::reduce(&(subgroup_order() + 5u32));
        let v_alias = crate::field::reduce(&(subgroup_order() + 42u32));
        assert!(crate::field::to_integer(&b_alias).bits() <= CIRCUIT_BITS as u64);

        assert!(!scheme.open(&c, &v, &b_alias));
        assert!(!scheme.open(&c, &v_alias, &b));
        assert!(matches!(
            scheme.commit(&v, &b_alias).unwrap_err(),
            EngineError::ValueOutOfRange(_)
        ));
        assert!(matches!(
            scheme.commit_fresh(&v_alias, &mut RandomnessSource::os()).unwrap_err(),
            EngineError::ValueOutOfRange(_)
        ));

        // l - 1 is the largest accepted scalar
        let top = crate::field::reduce(&(subgroup_order() - 1u32));
        assert!(scheme.commit(&v, &top).is_ok());
    }

    #[test]
    fn test_fresh_blinding_below_subgroup_order() {
        let scheme = scheme();
        let mut rng = RandomnessSource::from_rng(StdRng::seed_from_u64(13));
        let l = subgroup_order();
        for _ in 0..200 {
            let opening = scheme.commit_fresh(&FieldElement::from(7u64), &mut rng).unwrap();
            assert!(crate::field::to_integer(&opening.blinding) < l);
        }
    }

    #[test]
    fn test_zero_opens_to_identity() {
        let scheme = scheme();
        let zero = FieldElement::from(0u64);
        let c = scheme.commit(&zero, &zero).unwrap();
        assert_eq!(c, CurvePoint::from(ark_ed_on_bn254::EdwardsAffine::zero()));
    }
}
