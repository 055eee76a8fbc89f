//! ZK Pedersen Commitment Engine
//!
//! # Overview
//!
//! 비공개 값에 대한 Pedersen commitment를 계산하고, Groth16 증명의 public
//! signals가 로컬에서 독립적으로 계산한 값과 일치하는지 검증합니다.
//!
//! ## Architecture
//!
//! ```text
//! RandomnessSource → CommitmentEngine → BitDecomposer
//!        → ProofOrchestrator → ConsistencyChecker → OnChainVerifierClient
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Engine                             │
//! │  ┌────────┐  ┌────────┐  ┌────────────┐  ┌──────────┐    │
//! │  │ field  │  │  bits  │  │ commitment │  │  types   │    │
//! │  └────────┘  └────────┘  └────────────┘  └──────────┘    │
//! │  ┌──────────────────────────────────────────────────┐    │
//! │  │ services: prover · consistency · chain · files   │    │
//! │  └──────────────────────────────────────────────────┘    │
//! └──────────────────────────┬───────────────────────────────┘
//!                            ▼
//!              ┌───────────────────────────┐
//!              │  Groth16 verifier (EVM)   │
//!              └───────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 레이어 매핑
//! - `field`, `bits`, `randomness`: 스칼라 연산 / bit 인코딩 / blinding 생성
//! - `commitment`: Pedersen, hash-sum commitment
//! - `services`: prover, consistency checker, verifier contract, artifacts
//! - `report`: 3단계 결과 요약
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zk_pedersen_engine::{commitment::PedersenScheme, randomness::RandomnessSource, Config};
//!
//! let config = Config::from_env()?;
//! let scheme = PedersenScheme::new(config.generators(), config.bit_length);
//! let opening = scheme.commit_fresh(&42u64.into(), &mut RandomnessSource::os())?;
//! ```

pub mod bits;
pub mod commitment;
pub mod config;
pub mod error;
pub mod field;
pub mod randomness;
pub mod report;
pub mod services;
pub mod types;


// Re-exports for convenience
pub use config::Config;
pub use error::{EngineError, EngineResult, Layer};
pub use field::FieldElement;
