//! Commitment Engine
//!
//! # Schemes
//!
//! | Scheme | Commitment | Hiding | Binding |
//! |--------|------------|--------|---------|
//! | `PedersenScheme` | v·G + r·H (Baby-Jubjub point), v, r < l | perfect (r uniform below l) | DL of H w.r.t. G |
//! | `HashSumScheme` | Poseidon(x_i, r_i) per item + Σ x_i | computational | collision resistance |
//!
//! l is the order of the Baby-Jubjub prime subgroup (251 bits). Pedersen
//! scalars at or above l alias `s mod l`, so they are rejected outright.
//!
//! # Interview Q&A
//!
//! Q: 해시 커밋먼트는 왜 trait 뒤에 두었는가?
//! A: 해시 함수는 외부 capability로 취급
//!    - 프로덕션: Poseidon (회로와 동일한 파라미터)
//!    - 테스트: 결정적 mock으로 shape/합계 로직만 검증
//!    - 곡선 연산은 arkworks가 결정적으로 제공하므로 mock 불필요

mod hash_sum;
mod pedersen;

pub use hash_sum::{BatchCommitment, HashSumScheme};
pub use pedersen::PedersenScheme;

use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::PrimeField;
use zk_pedersen_circuits::poseidon::{hash_pair, poseidon_config};

use crate::error::{EngineError, EngineResult};
use crate::field::{self, FieldElement};

/// hash(value, blinding) capability
pub trait CommitmentHasher: Send + Sync {
    fn hash(&self, value: &FieldElement, blinding: &FieldElement) -> FieldElement;
}

/// Poseidon with the exact parameters baked into `HashSumCircuit`
#[derive(Clone)]
pub struct PoseidonHasher {
    config: PoseidonConfig<FieldElement>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self {
            config: poseidon_config(),
        }
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitmentHasher for PoseidonHasher {
    fn hash(&self, value: &FieldElement, blinding: &FieldElement) -> FieldElement {
        hash_pair(&self.config, *value, *blinding)
    }
}

/// value must fit the circuit's bit encoding
pub(crate) fn ensure_fits(what: &str, value: &FieldElement, num_bits: usize) -> EngineResult<()> {
    if field::to_integer(value).bits() > num_bits as u64 {
        return Err(EngineError::ValueOutOfRange(format!(
            "{} does not fit in {} bits",
            what, num_bits
        )));
    }
    Ok(())
}

/// value must be a canonical Baby-Jubjub scalar (< l)
pub(crate) fn ensure_curve_scalar(what: &str, value: &FieldElement) -> EngineResult<()> {
    if value.into_bigint() >= ark_ed_on_bn254::Fr::MODULUS {
        return Err(EngineError::ValueOutOfRange(format!(
            "{} is not below the curve subgroup order",
            what
        )));
    }
    Ok(())
}
