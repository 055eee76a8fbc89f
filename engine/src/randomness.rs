//! Randomness Source
//!
//! Blinding factors come from a CSPRNG (`OsRng` in production). 32 raw bytes
//! (256 bits) are drawn per element, two bits above the 254-bit modulus.

use ark_ff::PrimeField;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};

use crate::error::{EngineError, EngineResult};
use crate::field::FieldElement;

/// Raw bytes drawn per field element
const RAW_BYTES: usize = 32;

/// Raw bytes drawn per curve scalar; 512 bits keeps the mod-l bias negligible
const WIDE_BYTES: usize = 64;

/// 암호학적으로 안전한 스칼라 생성기
///
/// `CryptoRng` bound로 비암호학적 PRNG 주입을 컴파일 타임에 차단
pub struct RandomnessSource<R: RngCore + CryptoRng = OsRng> {
    rng: R,
}

impl RandomnessSource<OsRng> {
    /// OS entropy source
    pub fn os() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for RandomnessSource<OsRng> {
    fn default() -> Self {
        Self::os()
    }
}

impl<R: RngCore + CryptoRng> RandomnessSource<R> {
    /// Inject a specific CSPRNG (seeded `StdRng` in tests)
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    fn raw_bytes<const N: usize>(&mut self) -> EngineResult<[u8; N]> {
        let mut bytes = [0u8; N];
        self.rng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| EngineError::InsufficientEntropy(e.to_string()))?;
        Ok(bytes)
    }

    /// Uniform field element: 256 random bits reduced mod p
    pub fn next_field_element(&mut self) -> EngineResult<FieldElement> {
        let bytes = self.raw_bytes::<RAW_BYTES>()?;
        Ok(FieldElement::from_le_bytes_mod_order(&bytes))
    }

    /// Uniform Baby-Jubjub scalar in [0, l), embedded in the BN254 field (l < p)
    pub fn next_curve_scalar(&mut self) -> EngineResult<FieldElement> {
        let bytes = self.raw_bytes::<WIDE_BYTES>()?;
        let scalar = ark_ed_on_bn254::Fr::from_le_bytes_mod_order(&bytes);
        FieldElement::from_bigint(scalar.into_bigint())
            .ok_or_else(|| EngineError::ValueOutOfRange("curve scalar above the field modulus".into()))
    }

    /// Uniform integer in [0, 2^bits), bits <= 253 (always below p)
    ///
    /// Used for blinding factors that must fit the circuit's bit encoding.
    pub fn next_bounded(&mut self, bits: usize) -> EngineResult<FieldElement> {
        if bits == 0 || bits >= FieldElement::MODULUS_BIT_SIZE as usize {
            return Err(EngineError::ValueOutOfRange(format!(
                "cannot sample {} bits below the field modulus",
                bits
            )));
        }

        let mut bytes = self.raw_bytes::<RAW_BYTES>()?;
        let full_bytes = bits / 8;
        let rem_bits = bits % 8;
        if rem_bits > 0 {
            bytes[full_bytes] &= (1u8 << rem_bits) - 1;
            bytes[full_bytes + 1..].fill(0);
        } else {
            bytes[full_bytes..].fill(0);
        }

        Ok(FieldElement::from_le_bytes_mod_order(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::to_integer;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;
    use std::num::NonZeroU32;

    /// RNG whose entropy source is gone
    struct DeadRng;

    impl RngCore for DeadRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0)
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
            let code = NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap();
            Err(rand_core::Error::from(code))
        }
    }

    impl CryptoRng for DeadRng {}

    #[test]
    fn test_successive_draws_differ() {
        let mut source = RandomnessSource::os();
        let mut distinct = 0;
        for _ in 0..1000 {
            let a = source.next_field_element().unwrap();
            let b = source.next_field_element().unwrap();
            if a != b {
                distinct += 1;
            }
        }
        assert!(distinct >= 999, "only {} of 1000 pairs were distinct", distinct);
    }

    #[test]
    fn test_no_collisions_over_many_draws() {
        let mut source = RandomnessSource::os();
        let draws: HashSet<_> = (0..1000).map(|_| source.next_field_element().unwrap()).collect();
        assert_eq!(draws.len(), 1000);
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let mut a = RandomnessSource::from_rng(StdRng::seed_from_u64(1));
        let mut b = RandomnessSource::from_rng(StdRng::seed_from_u64(1));
        assert_eq!(a.next_field_element().unwrap(), b.next_field_element().unwrap());
    }

    #[test]
    fn test_bounded_draw_fits_bits() {
        let mut source = RandomnessSource::from_rng(StdRng::seed_from_u64(9));
        for bits in [1usize, 8, 63, 64, 65, 252, 253] {
            for _ in 0..50 {
                let x = source.next_bounded(bits).unwrap();
                assert!(to_integer(&x).bits() <= bits as u64);
            }
        }
    }

    #[test]
    fn test_bounded_draw_rejects_oversized_request() {
        let mut source = RandomnessSource::os();
        assert!(source.next_bounded(0).is_err());
        assert!(source.next_bounded(254).is_err());
    }

    #[test]
    fn test_curve_scalar_below_subgroup_order() {
        let mut source = RandomnessSource::from_rng(StdRng::seed_from_u64(3));
        let l = num_bigint::BigUint::from(ark_ed_on_bn254::Fr::MODULUS);
        let draws: HashSet<_> = (0..500)
            .map(|_| {
                let x = source.next_curve_scalar().unwrap();
                assert!(to_integer(&x) < l);
                x
            })
            .collect();
        assert_eq!(draws.len(), 500);
    }

    #[test]
    fn test_dead_source_reports_insufficient_entropy() {
        let mut source = RandomnessSource::from_rng(DeadRng);
        let err = source.next_field_element().unwrap_err();
        assert!(matches!(err, EngineError::InsufficientEntropy(_)));
        assert!(matches!(
            source.next_curve_scalar().unwrap_err(),
            EngineError::InsufficientEntropy(_)
        ));
    }
}
