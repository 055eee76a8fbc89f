//! Common Types Module
//!
//! 엔진 전반에서 사용되는 공통 타입 정의.
//! Field elements always cross a serialization boundary as canonical
//! decimal strings.

use serde::{Deserialize, Serialize};

use ark_ed_on_bn254::EdwardsAffine;

use crate::field::FieldElement;

/// Serde adapter: field element ⇄ decimal string
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::field::{parse_canonical, to_canonical_string, FieldElement};

    pub fn serialize<S: Serializer>(value: &FieldElement, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_canonical_string(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldElement, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_canonical(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter: field element sequence ⇄ decimal string array
pub mod decimal_vec {
    use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    use crate::field::{parse_canonical, to_canonical_string, FieldElement};

    pub fn serialize<S: Serializer>(values: &[FieldElement], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&to_canonical_string(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<FieldElement>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| parse_canonical(s).map_err(de::Error::custom))
            .collect()
    }
}

/// Baby-Jubjub 위의 점 (x, y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    #[serde(with = "decimal")]
    pub x: FieldElement,
    #[serde(with = "decimal")]
    pub y: FieldElement,
}

impl From<EdwardsAffine> for CurvePoint {
    fn from(point: EdwardsAffine) -> Self {
        Self { x: point.x, y: point.y }
    }
}

/// Commitment (두 형태는 절대 섞이지 않음)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Commitment {
    /// value·G + blinding·H
    Pedersen { point: CurvePoint },
    /// Poseidon(value, blinding)
    Hash {
        #[serde(with = "decimal")]
        digest: FieldElement,
    },
}

impl Commitment {
    /// Field elements this commitment contributes to a public signal set
    pub fn public_values(&self) -> Vec<FieldElement> {
        match self {
            Commitment::Pedersen { point } => vec![point.x, point.y],
            Commitment::Hash { digest } => vec![*digest],
        }
    }
}

/// Opening record for a single-value Pedersen commitment
///
/// The only form in which a blinding factor is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedersenOpening {
    #[serde(with = "decimal")]
    pub value: FieldElement,
    #[serde(with = "decimal")]
    pub blinding: FieldElement,
    pub commitment: CurvePoint,
}

/// Opening record for a batched hash-sum commitment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSumOpening {
    #[serde(with = "decimal_vec")]
    pub values: Vec<FieldElement>,
    #[serde(with = "decimal_vec")]
    pub blindings: Vec<FieldElement>,
    #[serde(with = "decimal_vec")]
    pub commitments: Vec<FieldElement>,
    /// Σ values mod p
    #[serde(with = "decimal")]
    pub total: FieldElement,
}

/// Ordered public signals emitted by the prover (public.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicSignals(#[serde(with = "decimal_vec")] pub Vec<FieldElement>);

impl PublicSignals {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldElement> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[FieldElement] {
        &self.0
    }
}

/// Groth16 proof (snarkjs JSON layout, decimal coordinates)
///
/// ```text
/// pi_a: [x, y, "1"]
/// pi_b: [[x.c0, x.c1], [y.c0, y.c1], ["1", "0"]]
/// pi_c: [x, y, "1"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    pub pi_a: [String; 3],
    pub pi_b: [[String; 2]; 3],
    pub pi_c: [String; 3],
    pub protocol: String,
    pub curve: String,
}

/// Groth16 verification key (snarkjs JSON layout)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeyArtifact {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: [String; 3],
    pub vk_beta_2: [[String; 2]; 3],
    pub vk_gamma_2: [[String; 2]; 3],
    pub vk_delta_2: [[String; 2]; 3],
    #[serde(rename = "IC")]
    pub ic: Vec<[String; 3]>,
}

/// Proof + the public signals it was produced with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofBundle {
    pub proof: ProofArtifact,
    pub public_signals: PublicSignals,
}

/// 검증 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerificationResult {
    pub fn valid() -> Self {
        Self { valid: true, reason: None }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Verifier contract call data (decimal strings)
///
/// Shapes: a (2), b (2×2, Fq2 limbs swapped), c (2), inputs (k)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallData {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
    pub inputs: Vec<String>,
}

/// Structured prover input for the Pedersen circuit (input.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PedersenInputs {
    /// value bits, little-endian, 0/1
    pub value: Vec<u8>,
    /// blinding bits, little-endian, 0/1
    pub blinding: Vec<u8>,
}

/// Structured prover input for the hash-sum circuit (input.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashSumInputs {
    /// per-item value bits, little-endian, 0/1
    pub x: Vec<Vec<u8>>,
    /// per-item blinding, decimal string
    pub r: Vec<String>,
}

/// 회로 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitVariant {
    Pedersen,
    HashSum { arity: usize },
}

impl CircuitVariant {
    /// Directory / CLI name
    pub fn name(&self) -> &'static str {
        match self {
            CircuitVariant::Pedersen => "pedersen",
            CircuitVariant::HashSum { .. } => "hash-sum",
        }
    }

    /// Parse a CLI name; the hash-sum arity comes from configuration
    pub fn parse(name: &str, arity: usize) -> Option<Self> {
        match name {
            "pedersen" => Some(CircuitVariant::Pedersen),
            "hash-sum" | "hash_sum" => Some(CircuitVariant::HashSum { arity }),
            _ => None,
        }
    }

    pub fn num_public_signals(&self) -> usize {
        match self {
            CircuitVariant::Pedersen => zk_pedersen_circuits::pedersen::NUM_PUBLIC_SIGNALS,
            CircuitVariant::HashSum { arity } => arity + 1,
        }
    }
}

impl std::fmt::Display for CircuitVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitVariant::Pedersen => f.write_str("pedersen"),
            CircuitVariant::HashSum { arity } => write!(f, "hash-sum(n={})", arity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;

    #[test]
    fn test_public_signals_json_is_decimal_strings() {
        let signals = PublicSignals(vec![FieldElement::from(11u64), FieldElement::from(0u64)]);
        let json = serde_json::to_string(&signals).unwrap();
        assert_eq!(json, r#"["11","0"]"#);

        let back: PublicSignals = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signals);
    }

    #[test]
    fn test_public_signals_reject_out_of_field() {
        let json = format!(r#"["{}"]"#, crate::field::MODULUS_DECIMAL);
        assert!(serde_json::from_str::<PublicSignals>(&json).is_err());
    }

    #[test]
    fn test_commitment_forms_are_distinct() {
        let identity = CurvePoint::from(EdwardsAffine::zero());
        let point = Commitment::Pedersen { point: identity };
        let hash = Commitment::Hash { digest: FieldElement::from(1u64) };

        assert_eq!(point.public_values(), vec![FieldElement::from(0u64), FieldElement::from(1u64)]);
        assert_eq!(hash.public_values(), vec![FieldElement::from(1u64)]);
        assert_ne!(
            serde_json::to_value(point).unwrap()["kind"],
            serde_json::to_value(hash).unwrap()["kind"]
        );
    }

    #[test]
    fn test_inputs_reject_unknown_fields() {
        let json = r#"{"value":[1],"blinding":[0],"extra":1}"#;
        assert!(serde_json::from_str::<PedersenInputs>(json).is_err());
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(CircuitVariant::parse("pedersen", 3), Some(CircuitVariant::Pedersen));
        assert_eq!(
            CircuitVariant::parse("hash-sum", 3),
            Some(CircuitVariant::HashSum { arity: 3 })
        );
        assert_eq!(CircuitVariant::parse("ltv", 3), None);
        assert_eq!(CircuitVariant::HashSum { arity: 3 }.num_public_signals(), 4);
    }
}
