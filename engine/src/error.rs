//! Error Handling Module
//!
//! Closed error taxonomy for the commitment engine.
//! Uses thiserror for domain errors; every variant maps to the layer that
//! produced it so a failure summary can point at local computation, the
//! circuit/proof result, or the on-chain result.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 엔진 에러 타입
///
/// # Design Decision
///
/// 외부 capability(prover, 컨트랙트)의 실패는 경계에서 바로 분류됨
/// - 에러 메시지 문자열 매칭으로 원인을 추측하지 않음
/// - 로컬 전제조건 위반은 재시도하지 않음 (호출자 버그)
#[derive(Debug, Error)]
pub enum EngineError {
    // ============ Local computation ============
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Insufficient entropy: {0}")]
    InsufficientEntropy(String),

    // ============ Circuit / proof ============
    #[error("Missing artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("External prover failure ({kind}): {message}")]
    ExternalProverFailure {
        kind: ProverFailureKind,
        message: String,
    },

    #[error("Consistency mismatch at signal indices {indices:?}")]
    ConsistencyMismatch { indices: Vec<usize> },

    // ============ On-chain ============
    #[error("On-chain verifier reverted: {reason}")]
    OnChainRevert { reason: String },

    #[error("On-chain transport failure: {reason}")]
    OnChainTransport { reason: String },

    // ============ Boundary ============
    #[error("{call} timed out after {timeout:?}")]
    ExternalCallTimeout {
        call: ExternalCall,
        timeout: Duration,
    },

    #[error("Artifact {} could not be read or written: {reason}", path.display())]
    Artifact { path: PathBuf, reason: String },
}

/// Prover 실패 분류 (closed enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverFailureKind {
    /// Witness violates a circuit constraint ("out of bounds" class)
    UnsatisfiedWitness,
    /// Structured inputs do not have the circuit's shape
    MalformedInput,
    /// Proof / key / signal JSON cannot be decoded into curve points
    MalformedArtifact,
    /// Proving key does not belong to this circuit
    KeyMismatch,
    /// Anything else raised inside the proving library
    Internal,
}

impl std::fmt::Display for ProverFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProverFailureKind::UnsatisfiedWitness => "unsatisfied witness",
            ProverFailureKind::MalformedInput => "malformed input",
            ProverFailureKind::MalformedArtifact => "malformed artifact",
            ProverFailureKind::KeyMismatch => "key mismatch",
            ProverFailureKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// 타임아웃이 적용되는 외부 호출 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalCall {
    Prove,
    VerifyLocal,
    VerifierContract,
}

impl std::fmt::Display for ExternalCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalCall::Prove => f.write_str("prover call"),
            ExternalCall::VerifyLocal => f.write_str("local verification"),
            ExternalCall::VerifierContract => f.write_str("verifier contract call"),
        }
    }
}

/// 실패가 발생한 레이어
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    LocalComputation,
    CircuitProof,
    OnChain,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::LocalComputation => f.write_str("local computation"),
            Layer::CircuitProof => f.write_str("circuit/proof result"),
            Layer::OnChain => f.write_str("on-chain result"),
        }
    }
}

impl EngineError {
    pub fn prover(kind: ProverFailureKind, message: impl Into<String>) -> Self {
        EngineError::ExternalProverFailure {
            kind,
            message: message.into(),
        }
    }

    /// 에러를 레이어에 매핑
    pub fn layer(&self) -> Layer {
        match self {
            EngineError::ValueOutOfRange(_)
            | EngineError::ShapeMismatch { .. }
            | EngineError::InsufficientEntropy(_) => Layer::LocalComputation,

            EngineError::MissingArtifact { .. }
            | EngineError::ExternalProverFailure { .. }
            | EngineError::ConsistencyMismatch { .. }
            | EngineError::Artifact { .. } => Layer::CircuitProof,

            EngineError::OnChainRevert { .. }
            | EngineError::OnChainTransport { .. }
            | EngineError::ExternalCallTimeout {
                call: ExternalCall::VerifierContract,
                ..
            } => Layer::OnChain,

            EngineError::ExternalCallTimeout { .. } => Layer::CircuitProof,
        }
    }

    /// 로컬 전제조건 위반 여부 (재시도 무의미)
    pub fn is_precondition_violation(&self) -> bool {
        self.layer() == Layer::LocalComputation
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
