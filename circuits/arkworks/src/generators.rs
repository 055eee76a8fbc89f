//! Pedersen Generators on Baby-Jubjub
//!
//! Baby-Jubjub (`ark-ed-on-bn254`) is a twisted Edwards curve whose base field
//! is the BN254 scalar field, so commitment coordinates are native circuit
//! field elements.
//!
//! # Generator Derivation
//!
//! | Mode | G | H | Binding |
//! |------|---|---|---------|
//! | `derive(domain)` | subgroup generator | hash-to-curve(domain) | yes |
//! | `toy()` | subgroup generator | 1·G | **no** |
//!
//! With H = 1·G anyone can open `v·G + r·H` to any (v', r') with
//! v' + r' = v + r. The toy mode exists only to reproduce the published
//! small example and must never be used for real commitments.

use ark_ec::{twisted_edwards::TECurveConfig, AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig, Fq};
use ark_ff::{Field, One, PrimeField};
use sha3::{Digest, Keccak256};

/// Domain separator prefix for hash-to-curve
const HASH_TO_CURVE_DST: &[u8] = b"zk-pedersen/hash-to-curve/v1";

/// Default domain for the second generator
pub const DEFAULT_H_DOMAIN: &[u8] = b"zk-pedersen/H";

/// Generator pair (G, H) for `value·G + blinding·H`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PedersenGenerators {
    pub g: EdwardsAffine,
    pub h: EdwardsAffine,
    toy: bool,
}

impl PedersenGenerators {
    /// G = subgroup generator, H = hash-to-curve(domain)
    pub fn derive(domain: &[u8]) -> Self {
        let g = EdwardsAffine::generator();
        let mut counter = 0u32;
        let h = loop {
            if let Some(point) = hash_to_curve(domain, counter) {
                if point != g {
                    break point;
                }
            }
            counter += 1;
        };

        Self { g, h, toy: false }
    }

    /// Published example derivation: H = 1·G (NOT binding)
    pub fn toy() -> Self {
        let g = EdwardsAffine::generator();
        let h = g.mul_bigint([1u64]).into_affine();
        Self { g, h, toy: true }
    }

    pub fn is_toy(&self) -> bool {
        self.toy
    }

    /// Native commitment: value·G + blinding·H
    ///
    /// Scalars are little-endian u64 limbs and are multiplied as plain
    /// integers, exactly like the bitwise double-and-add in the circuit.
    pub fn commit(&self, value: impl AsRef<[u64]>, blinding: impl AsRef<[u64]>) -> EdwardsAffine {
        (self.g.mul_bigint(value) + self.h.mul_bigint(blinding)).into_affine()
    }
}

impl Default for PedersenGenerators {
    fn default() -> Self {
        Self::derive(DEFAULT_H_DOMAIN)
    }
}

/// Try-and-increment: y = Keccak256(dst || domain || counter) mod q,
/// recover x from the curve equation, clear the cofactor.
fn hash_to_curve(domain: &[u8], counter: u32) -> Option<EdwardsAffine> {
    let mut hasher = Keccak256::new();
    hasher.update(HASH_TO_CURVE_DST);
    hasher.update(domain);
    hasher.update(counter.to_le_bytes());
    let y = Fq::from_le_bytes_mod_order(&hasher.finalize());

    // a·x² + y² = 1 + d·x²·y²  →  x² = (1 - y²) / (a - d·y²)
    let y2 = y.square();
    let numerator = Fq::one() - y2;
    let denominator = EdwardsConfig::COEFF_A - EdwardsConfig::COEFF_D * y2;
    let x = (numerator * denominator.inverse()?).sqrt()?;

    let candidate = EdwardsAffine::new_unchecked(x, y);
    if !candidate.is_on_curve() {
        return None;
    }

    let point = candidate.clear_cofactor();
    if point.is_zero() {
        return None;
    }
    Some(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ed_on_bn254::Fr as ScalarField;

    #[test]
    fn test_derived_generators_are_valid() {
        let gens = PedersenGenerators::default();

        assert!(!gens.g.is_zero());
        assert!(!gens.h.is_zero());
        assert_ne!(gens.g, gens.h);
        assert!(gens.h.is_on_curve());
        assert!(gens.h.is_in_correct_subgroup_assuming_on_curve());
        assert!(!gens.is_toy());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = PedersenGenerators::derive(b"domain-a");
        let b = PedersenGenerators::derive(b"domain-a");
        let c = PedersenGenerators::derive(b"domain-b");

        assert_eq!(a, b);
        assert_ne!(a.h, c.h, "Different domains should give different H");
    }

    #[test]
    fn test_toy_h_equals_g() {
        let gens = PedersenGenerators::toy();
        assert_eq!(gens.g, gens.h);
        assert!(gens.is_toy());
    }

    #[test]
    fn test_toy_commitment_is_not_binding() {
        // 3·G + 5·H == 5·G + 3·H when H = G
        let gens = PedersenGenerators::toy();
        assert_eq!(gens.commit([3u64], [5u64]), gens.commit([5u64], [3u64]));

        let gens = PedersenGenerators::default();
        assert_ne!(gens.commit([3u64], [5u64]), gens.commit([5u64], [3u64]));
    }

    #[test]
    fn test_commit_zero_is_identity() {
        let gens = PedersenGenerators::default();
        let empty: [u64; 0] = [];
        assert!(gens.commit(empty, empty).is_zero());
    }

    #[test]
    fn test_commit_matches_group_scalar_mul() {
        // Integer limbs and subgroup-scalar multiplication agree
        let gens = PedersenGenerators::default();
        let v = ScalarField::from(42u64);
        let r = ScalarField::from(7_777_777u64);

        let expected = (gens.g * v + gens.h * r).into_affine();
        let actual = gens.commit(v.into_bigint(), r.into_bigint());

        assert_eq!(expected, actual);
    }
}
