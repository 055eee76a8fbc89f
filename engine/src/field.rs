//! Field Arithmetic over the BN254 scalar field
//!
//! Every value that reaches the prover is an element of this field. Using a
//! different modulus does not crash anything; it silently produces values
//! the circuit cannot open, so the modulus is pinned by a test.

use ark_ff::{BigInteger, PrimeField, Zero};
use num_bigint::BigUint;

use crate::error::{EngineError, EngineResult};

/// Field element (integer in [0, p))
pub type FieldElement = ark_bn254::Fr;

/// p = BN254 scalar field modulus (decimal)
pub const MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// p as an arbitrary-precision integer
pub fn modulus() -> BigUint {
    BigUint::from_bytes_le(&FieldElement::MODULUS.to_bytes_le())
}

/// (a + b) mod p
pub fn add(a: &FieldElement, b: &FieldElement) -> FieldElement {
    *a + b
}

/// (a · b) mod p
pub fn mul(a: &FieldElement, b: &FieldElement) -> FieldElement {
    *a * b
}

/// Σ values mod p
pub fn sum<'a>(values: impl IntoIterator<Item = &'a FieldElement>) -> FieldElement {
    values.into_iter().fold(FieldElement::zero(), |acc, v| acc + v)
}

/// x mod p (never fails)
pub fn reduce(x: &BigUint) -> FieldElement {
    FieldElement::from_le_bytes_mod_order(&x.to_bytes_le())
}

/// Strict conversion: x must already lie in [0, p)
pub fn from_integer(x: &BigUint) -> EngineResult<FieldElement> {
    if *x >= modulus() {
        return Err(EngineError::ValueOutOfRange(format!(
            "{} is not below the field modulus",
            x
        )));
    }
    Ok(reduce(x))
}

/// Canonical integer representative in [0, p)
pub fn to_integer(a: &FieldElement) -> BigUint {
    BigUint::from_bytes_le(&a.into_bigint().to_bytes_le())
}

/// Canonical decimal string (the form the prover and the contract accept)
pub fn to_canonical_string(a: &FieldElement) -> String {
    to_integer(a).to_str_radix(10)
}

/// Parse a canonical decimal string, rejecting values >= p
pub fn parse_canonical(s: &str) -> EngineResult<FieldElement> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::ValueOutOfRange(format!(
            "'{}' is not a decimal field element",
            s
        )));
    }

    let x = BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(|| {
        EngineError::ValueOutOfRange(format!("'{}' is not a decimal field element", s))
    })?;
    from_integer(&x)
}
