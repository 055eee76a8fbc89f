//! ZK Prover Service - Groth16 Integration
//!
//! # Interview Q&A
//!
//! Q: 증명 생성 과정을 설명해주세요
//! A: 4단계 과정
//!
//!    1. Circuit Setup (일회성)
//!       - 빈 회로로 circuit_specific_setup → Proving Key + Verification Key
//!       - PK는 파일(proving_key.bin)로 저장, VK는 snarkjs JSON
//!
//!    2. Witness 생성
//!       - input.json (bits + decimal strings) 파싱
//!       - 회로가 출력(commitment, x_total)을 직접 계산 → public signals
//!
//!    3. Proof 생성
//!       - Groth16::prove(PK, circuit, rng)
//!       - CPU 집약적 작업 → spawn_blocking
//!
//!    4. Proof 직렬화
//!       - snarkjs 호환 JSON (proof.json, public.json)
//!
//! Q: 왜 prover를 trait 뒤에 두었는가?
//! A: 외부 capability 경계
//!    - 프로덕션: Groth16Backend (arkworks)
//!    - 테스트: MockBackend (결정적, 빠름)
//!    - Orchestrator는 입력 shape과 타임아웃만 책임짐

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey};
use ark_relations::r1cs::ConstraintSynthesizer;
use ark_ed_on_bn254::EdwardsAffine;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde_json::Value;

use zk_pedersen_circuits::{synthesize_outputs, HashSumCircuit, PedersenCircuit, PedersenGenerators};

use super::snarkjs;
use crate::bits::field_to_bits;
use crate::error::{EngineError, EngineResult, ExternalCall, ProverFailureKind};
use crate::field::{parse_canonical, to_canonical_string, FieldElement};
use crate::types::{
    CircuitVariant, HashSumInputs, PedersenInputs, ProofArtifact, ProofBundle, PublicSignals,
    VerificationKeyArtifact, VerificationResult,
};

/// Proving / verification capability
///
/// Synchronous and CPU-bound; callers run it on the blocking pool.
pub trait ProvingBackend: Send + Sync + 'static {
    /// Circuit this backend proves
    fn variant(&self) -> CircuitVariant;

    /// structured inputs → (proof, public signals computed by the circuit)
    fn prove(&self, inputs: &Value) -> EngineResult<ProofBundle>;

    /// Groth16 pairing check against a verification key
    fn verify(
        &self,
        vk: &VerificationKeyArtifact,
        signals: &PublicSignals,
        proof: &ProofArtifact,
    ) -> EngineResult<bool>;
}

/// Groth16 over BN254
///
/// # Design Decision
///
/// 백엔드 하나 = 회로 하나
/// - Proving Key는 생성 후 불변 → Arc로 공유, lock 불필요
/// - 회로 상수(G, H, bit 길이)는 키와 함께 고정
pub struct Groth16Backend {
    variant: CircuitVariant,
    generators: PedersenGenerators,
    num_bits: usize,
    pk: ProvingKey<Bn254>,
}

impl Groth16Backend {
    fn empty_circuit_setup<R: RngCore + CryptoRng>(
        variant: CircuitVariant,
        generators: PedersenGenerators,
        num_bits: usize,
        rng: &mut R,
    ) -> EngineResult<ProvingKey<Bn254>> {
        let result = match variant {
            CircuitVariant::Pedersen => {
                Groth16::<Bn254>::circuit_specific_setup(PedersenCircuit::empty(generators, num_bits), rng)
            }
            CircuitVariant::HashSum { arity } => {
                Groth16::<Bn254>::circuit_specific_setup(HashSumCircuit::empty(arity, num_bits), rng)
            }
        };

        result
            .map(|(pk, _vk)| pk)
            .map_err(|e| EngineError::prover(ProverFailureKind::Internal, format!("setup failed: {}", e)))
    }

    /// Development trusted setup (single party, toxic waste from `rng`)
    pub fn setup<R: RngCore + CryptoRng>(
        variant: CircuitVariant,
        generators: PedersenGenerators,
        num_bits: usize,
        rng: &mut R,
    ) -> EngineResult<(Self, VerificationKeyArtifact)> {
        let started = Instant::now();
        tracing::info!(%variant, num_bits, "Running Groth16 circuit-specific setup...");

        let pk = Self::empty_circuit_setup(variant, generators, num_bits, rng)?;
        let vk = snarkjs::vk_to_json(&pk.vk);

        tracing::info!(
            %variant,
            n_public = vk.n_public,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Setup completed"
        );

        Ok((
            Self {
                variant,
                generators,
                num_bits,
                pk,
            },
            vk,
        ))
    }

    /// Load a proving key written by `save_proving_key`
    ///
    /// The file starts with the bit width and generators the key was made
    /// for; a key from a different `BIT_LENGTH` or generator pair is a
    /// `KeyMismatch`, not a proof that later fails the pairing check.
    pub fn load(
        variant: CircuitVariant,
        generators: PedersenGenerators,
        num_bits: usize,
        pk_path: &Path,
    ) -> EngineResult<Self> {
        let bytes = super::artifacts::read_bytes(pk_path)?;
        let malformed = |e: SerializationError| {
            EngineError::prover(
                ProverFailureKind::MalformedArtifact,
                format!("{}: {}", pk_path.display(), e),
            )
        };
        let mismatch = |detail: String| {
            EngineError::prover(
                ProverFailureKind::KeyMismatch,
                format!("key at {}: {}", pk_path.display(), detail),
            )
        };

        let mut reader = bytes.as_slice();
        let key_bits = u64::deserialize_compressed(&mut reader).map_err(malformed)?;
        let key_g = EdwardsAffine::deserialize_compressed(&mut reader).map_err(malformed)?;
        let key_h = EdwardsAffine::deserialize_compressed(&mut reader).map_err(malformed)?;
        let pk = ProvingKey::<Bn254>::deserialize_compressed(&mut reader).map_err(malformed)?;

        if key_bits != num_bits as u64 {
            return Err(mismatch(format!(
                "made for {}-bit inputs, BIT_LENGTH is {}",
                key_bits, num_bits
            )));
        }
        // generators are baked into the Pedersen circuit only
        if variant == CircuitVariant::Pedersen && (key_g, key_h) != (generators.g, generators.h) {
            return Err(mismatch("made for a different generator pair (GENERATOR_MODE / GENERATOR_DOMAIN)".into()));
        }

        let expected = variant.num_public_signals();
        let actual = pk.vk.gamma_abc_g1.len().saturating_sub(1);
        if actual != expected {
            return Err(mismatch(format!(
                "{} expects {} public signals, key has {}",
                variant, expected, actual
            )));
        }

        let fingerprint = snarkjs::vk_fingerprint(&pk.vk)?;
        tracing::info!(%variant, path = %pk_path.display(), %fingerprint, "Proving key loaded");

        Ok(Self {
            variant,
            generators,
            num_bits,
            pk,
        })
    }

    /// `[num_bits][G][H][proving key]`, all arkworks-compressed
    pub fn save_proving_key(&self, pk_path: &Path) -> EngineResult<()> {
        let artifact_error = |e: SerializationError| EngineError::Artifact {
            path: pk_path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut bytes = Vec::new();
        (self.num_bits as u64)
            .serialize_compressed(&mut bytes)
            .map_err(artifact_error)?;
        self.generators.g.serialize_compressed(&mut bytes).map_err(artifact_error)?;
        self.generators.h.serialize_compressed(&mut bytes).map_err(artifact_error)?;
        self.pk.serialize_compressed(&mut bytes).map_err(artifact_error)?;
        super::artifacts::write_bytes(pk_path, &bytes)
    }

    pub fn verification_key(&self) -> VerificationKeyArtifact {
        snarkjs::vk_to_json(&self.pk.vk)
    }

    /// Keccak256 fingerprint of the embedded verification key
    pub fn fingerprint(&self) -> EngineResult<String> {
        snarkjs::vk_fingerprint(&self.pk.vk)
    }

    fn malformed_input(msg: impl Into<String>) -> EngineError {
        EngineError::prover(ProverFailureKind::MalformedInput, msg)
    }

    fn decode_bits(what: &str, bits: &[u8], num_bits: usize) -> EngineResult<Vec<bool>> {
        if bits.len() != num_bits {
            return Err(Self::malformed_input(format!(
                "{} has {} bits, circuit expects {}",
                what,
                bits.len(),
                num_bits
            )));
        }
        bits.iter()
            .map(|b| match b {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(Self::malformed_input(format!("{} contains non-bit {}", what, other))),
            })
            .collect()
    }

    /// input.json → circuit with witness
    fn parse_pedersen(&self, inputs: &Value) -> EngineResult<PedersenCircuit> {
        let parsed: PedersenInputs =
            serde_json::from_value(inputs.clone()).map_err(|e| Self::malformed_input(e.to_string()))?;

        let value = Self::decode_bits("value", &parsed.value, self.num_bits)?;
        let blinding = Self::decode_bits("blinding", &parsed.blinding, self.num_bits)?;
        Ok(PedersenCircuit::new(value, blinding, self.generators))
    }

    fn parse_hash_sum(&self, inputs: &Value, arity: usize) -> EngineResult<HashSumCircuit> {
        let parsed: HashSumInputs =
            serde_json::from_value(inputs.clone()).map_err(|e| Self::malformed_input(e.to_string()))?;

        if parsed.x.len() != arity || parsed.r.len() != arity {
            return Err(Self::malformed_input(format!(
                "expected {} items, got x={} r={}",
                arity,
                parsed.x.len(),
                parsed.r.len()
            )));
        }

        let values = parsed
            .x
            .iter()
            .enumerate()
            .map(|(i, bits)| Self::decode_bits(&format!("x[{}]", i), bits, self.num_bits))
            .collect::<EngineResult<Vec<_>>>()?;
        let blindings = parsed
            .r
            .iter()
            .map(|r| parse_canonical(r).map_err(|e| Self::malformed_input(e.to_string())))
            .collect::<EngineResult<Vec<Fr>>>()?;

        Ok(HashSumCircuit::new(values, blindings, self.num_bits))
    }

    fn prove_circuit<C>(&self, circuit: C) -> EngineResult<ProofBundle>
    where
        C: ConstraintSynthesizer<Fr> + Clone,
    {
        // Witness generation: the circuit computes its own public outputs
        let outputs = synthesize_outputs(circuit.clone())
            .map_err(|e| Self::malformed_input(format!("witness generation failed: {}", e)))?;
        if !outputs.satisfied {
            return Err(EngineError::prover(
                ProverFailureKind::UnsatisfiedWitness,
                format!("{} witness violates a circuit constraint", self.variant),
            ));
        }

        let expected = self.pk.vk.gamma_abc_g1.len().saturating_sub(1);
        if outputs.public_signals.len() != expected {
            return Err(EngineError::prover(
                ProverFailureKind::KeyMismatch,
                format!(
                    "circuit emits {} public signals, proving key expects {}",
                    outputs.public_signals.len(),
                    expected
                ),
            ));
        }

        let proof = Groth16::<Bn254>::prove(&self.pk, circuit, &mut OsRng)
            .map_err(|e| EngineError::prover(ProverFailureKind::Internal, e.to_string()))?;

        Ok(ProofBundle {
            proof: snarkjs::proof_to_json(&proof),
            public_signals: PublicSignals(outputs.public_signals),
        })
    }
}

impl ProvingBackend for Groth16Backend {
    fn variant(&self) -> CircuitVariant {
        self.variant
    }

    fn prove(&self, inputs: &Value) -> EngineResult<ProofBundle> {
        match self.variant {
            CircuitVariant::Pedersen => self.prove_circuit(self.parse_pedersen(inputs)?),
            CircuitVariant::HashSum { arity } => self.prove_circuit(self.parse_hash_sum(inputs, arity)?),
        }
    }

    fn verify(
        &self,
        vk: &VerificationKeyArtifact,
        signals: &PublicSignals,
        proof: &ProofArtifact,
    ) -> EngineResult<bool> {
        let vk = snarkjs::vk_from_json(vk)?;
        let proof = snarkjs::proof_from_json(proof)?;

        if signals.len() + 1 != vk.gamma_abc_g1.len() {
            return Err(EngineError::prover(
                ProverFailureKind::MalformedArtifact,
                format!(
                    "{} public signals for a key with {} inputs",
                    signals.len(),
                    vk.gamma_abc_g1.len() - 1
                ),
            ));
        }

        Groth16::<Bn254>::verify(&vk, signals.as_slice(), &proof)
            .map_err(|e| EngineError::prover(ProverFailureKind::Internal, e.to_string()))
    }
}

fn bits_json(value: &FieldElement, num_bits: usize) -> EngineResult<Vec<u8>> {
    Ok(field_to_bits(value, num_bits)?.into_iter().map(u8::from).collect())
}

fn to_json<T: serde::Serialize>(inputs: T) -> EngineResult<Value> {
    serde_json::to_value(inputs).map_err(|e| EngineError::prover(ProverFailureKind::Internal, e.to_string()))
}

/// `{"value": [bits], "blinding": [bits]}`
///
/// Every private scalar goes through the bit decomposer; out-of-range
/// values fail here, before the prover is ever called.
pub fn pedersen_inputs(num_bits: usize, value: &FieldElement, blinding: &FieldElement) -> EngineResult<Value> {
    to_json(PedersenInputs {
        value: bits_json(value, num_bits)?,
        blinding: bits_json(blinding, num_bits)?,
    })
}

/// `{"x": [[bits] × n], "r": ["decimal" × n]}`
pub fn hash_sum_inputs(num_bits: usize, values: &[FieldElement], blindings: &[FieldElement]) -> EngineResult<Value> {
    if blindings.len() != values.len() {
        return Err(EngineError::ShapeMismatch {
            what: "blindings",
            expected: values.len(),
            actual: blindings.len(),
        });
    }

    to_json(HashSumInputs {
        x: values
            .iter()
            .map(|x| bits_json(x, num_bits))
            .collect::<EngineResult<Vec<_>>>()?,
        r: blindings.iter().map(to_canonical_string).collect(),
    })
}

/// Proof request orchestration
///
/// Builds the structured input object, runs the backend on the blocking pool
/// under a timeout, and packages the result. No retries.
pub struct ProofOrchestrator<B: ProvingBackend> {
    backend: Arc<B>,
    num_bits: usize,
    prove_timeout: Duration,
}

impl<B: ProvingBackend> Clone for ProofOrchestrator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            num_bits: self.num_bits,
            prove_timeout: self.prove_timeout,
        }
    }
}

impl<B: ProvingBackend> ProofOrchestrator<B> {
    pub fn new(backend: Arc<B>, num_bits: usize, prove_timeout: Duration) -> Self {
        Self {
            backend,
            num_bits,
            prove_timeout,
        }
    }

    pub fn variant(&self) -> CircuitVariant {
        self.backend.variant()
    }

    /// Structured Pedersen input for this orchestrator's bit width
    pub fn pedersen_inputs(&self, value: &FieldElement, blinding: &FieldElement) -> EngineResult<Value> {
        pedersen_inputs(self.num_bits, value, blinding)
    }

    /// Structured hash-sum input; the item count must match the circuit arity
    pub fn hash_sum_inputs(&self, values: &[FieldElement], blindings: &[FieldElement]) -> EngineResult<Value> {
        if let CircuitVariant::HashSum { arity } = self.variant() {
            if values.len() != arity {
                return Err(EngineError::ShapeMismatch {
                    what: "values",
                    expected: arity,
                    actual: values.len(),
                });
            }
        }
        hash_sum_inputs(self.num_bits, values, blindings)
    }

    /// 증명 생성 (blocking pool + timeout)
    pub async fn prove(&self, inputs: Value) -> EngineResult<ProofBundle> {
        let variant = self.variant();
        let started = Instant::now();
        tracing::info!(%variant, "Generating proof...");

        let backend = Arc::clone(&self.backend);
        let task = tokio::task::spawn_blocking(move || backend.prove(&inputs));

        let bundle = match tokio::time::timeout(self.prove_timeout, task).await {
            Err(_) => {
                tracing::error!(%variant, timeout_secs = self.prove_timeout.as_secs(), "Prover timed out");
                return Err(EngineError::ExternalCallTimeout {
                    call: ExternalCall::Prove,
                    timeout: self.prove_timeout,
                });
            }
            Ok(Err(join)) => {
                return Err(EngineError::prover(
                    ProverFailureKind::Internal,
                    format!("prover task aborted: {}", join),
                ))
            }
            Ok(Ok(result)) => result?,
        };

        tracing::info!(
            %variant,
            public_signals = bundle.public_signals.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Proof generated"
        );

        Ok(bundle)
    }

    /// 로컬 검증
    pub async fn verify_local(
        &self,
        vk: VerificationKeyArtifact,
        signals: PublicSignals,
        proof: ProofArtifact,
    ) -> EngineResult<VerificationResult> {
        let variant = self.variant();
        let backend = Arc::clone(&self.backend);
        let task = tokio::task::spawn_blocking(move || backend.verify(&vk, &signals, &proof));

        let valid = match tokio::time::timeout(self.prove_timeout, task).await {
            Err(_) => {
                return Err(EngineError::ExternalCallTimeout {
                    call: ExternalCall::VerifyLocal,
                    timeout: self.prove_timeout,
                })
            }
            Ok(Err(join)) => {
                return Err(EngineError::prover(
                    ProverFailureKind::Internal,
                    format!("verifier task aborted: {}", join),
                ))
            }
            Ok(Ok(result)) => result?,
        };

        tracing::info!(%variant, valid, "Local verification finished");

        Ok(if valid {
            VerificationResult::valid()
        } else {
            VerificationResult::invalid("Groth16 pairing check failed")
        })
    }
}
