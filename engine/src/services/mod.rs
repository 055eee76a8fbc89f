//! Services Module
//!
//! 외부 capability 경계를 담당하는 서비스 레이어
//!
//! # Services
//! - `ProofOrchestrator`: 증명 입력 구성, prover 호출 (Groth16 / mock)
//! - `ConsistencyChecker`: public signals vs 로컬 계산 값 비교
//! - `OnChainVerifierClient`: verifier 컨트랙트 호출
//! - `artifacts`: JSON / key 파일 입출력

pub mod artifacts;
mod blockchain;
mod consistency;
pub mod snarkjs;
mod zk_prover;

pub use artifacts::ArtifactPaths;
pub use blockchain::{
    to_call_data, BlockchainConfig, EthersVerifierContract, OnChainVerifierClient, VerifierContract,
};
pub use consistency::{compare, ConsistencyChecker, ConsistencyReport, FieldCheck, SignalLayout, SignalSlot};
pub use zk_prover::{hash_sum_inputs, pedersen_inputs, Groth16Backend, ProofOrchestrator, ProvingBackend};

#[cfg(test)]
pub(crate) use zk_prover::mock::MockBackend;
