//! Bit Decomposition
//!
//! Arbitrary-precision integer ⇄ fixed-length little-endian bit vector.
//! bit i = ⌊x / 2^i⌋ mod 2. Values that do not fit are rejected, never
//! truncated.

use num_bigint::BigUint;

use crate::error::{EngineError, EngineResult};
use crate::field::{self, FieldElement};

/// Bit length of the published circuits
pub const CIRCUIT_BITS: usize = 252;

/// x → [b_0, ..., b_{length-1}]
///
/// Fails with `ValueOutOfRange` if x ≥ 2^length or x ≥ p.
pub fn to_bits(x: &BigUint, length: usize) -> EngineResult<Vec<bool>> {
    if x.bits() > length as u64 {
        return Err(EngineError::ValueOutOfRange(format!(
            "{} does not fit in {} bits",
            x, length
        )));
    }
    if *x >= field::modulus() {
        return Err(EngineError::ValueOutOfRange(format!(
            "{} is not below the field modulus",
            x
        )));
    }

    let bytes = x.to_bytes_le();
    Ok((0..length)
        .map(|i| {
            bytes
                .get(i / 8)
                .map(|byte| (byte >> (i % 8)) & 1 == 1)
                .unwrap_or(false)
        })
        .collect())
}

/// Σ b_i · 2^i
pub fn from_bits(bits: &[bool]) -> BigUint {
    let mut bytes = vec![0u8; (bits.len() + 7) / 8];
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    BigUint::from_bytes_le(&bytes)
}

/// Field element → bits (canonical representative)
pub fn field_to_bits(a: &FieldElement, length: usize) -> EngineResult<Vec<bool>> {
    to_bits(&field::to_integer(a), length)
}
