//! Configuration Module
//!
//! # Interview Q&A
//!
//! Q: 환경변수 vs 설정 파일, 어떤 방식을 선택했고 왜인가?
//! A: 환경변수를 선택
//!    - CI/로컬 체인(anvil)/프로덕션 간 설정 분리 용이
//!    - `.env` 파일은 dotenvy로 로드 (개발 편의)
//!
//! Q: 설정 검증은 어떻게 하는가?
//! A: from_env()에서 모든 값 검증 → 잘못되면 즉시 실패 (fail-fast)
//!    - BIT_LENGTH는 field 크기 이내여야 함
//!    - 프로덕션에서 toy generator(H = 1·G)는 거부

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use zk_pedersen_circuits::{generators::DEFAULT_H_DOMAIN, PedersenGenerators};

use crate::bits::CIRCUIT_BITS;
use crate::services::BlockchainConfig;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 아티팩트 루트 디렉토리 (기본값: generated)
    pub artifact_dir: PathBuf,

    /// value / blinding bit 길이 (기본값: 252)
    pub bit_length: usize,

    /// hash-sum 회로의 item 수 (기본값: 3)
    pub hash_sum_arity: usize,

    /// H 생성 방식
    pub generator_mode: GeneratorMode,

    /// hash-to-curve 도메인
    pub generator_domain: String,

    /// 증명 생성 타임아웃
    pub prove_timeout: Duration,

    /// Ethereum RPC URL
    pub eth_rpc_url: String,

    /// Chain ID (기본값: 31337, anvil)
    pub chain_id: u64,

    /// 배포된 verifier 컨트랙트 주소 (옵션)
    pub verifier_address: Option<String>,

    /// 컨트랙트 호출 타임아웃
    pub chain_timeout: Duration,

    /// 환경 (development, staging, production)
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorMode {
    /// H = hash-to-curve(domain)
    Derived,
    /// H = 1·G (published example, NOT binding)
    Toy,
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Optional Environment Variables
    ///
    /// - `ARTIFACT_DIR`: 아티팩트 디렉토리
    /// - `BIT_LENGTH`: 1..=253
    /// - `HASH_SUM_ARITY`: >= 1
    /// - `GENERATOR_MODE`: derived | toy
    /// - `GENERATOR_DOMAIN`: hash-to-curve 도메인
    /// - `PROVE_TIMEOUT_SECS`, `CHAIN_TIMEOUT_SECS`
    /// - `ETH_RPC_URL`, `CHAIN_ID`, `VERIFIER_ADDRESS`
    /// - `ENVIRONMENT`: development | staging | production
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = match get("ENVIRONMENT", "development").to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let generator_mode = match get("GENERATOR_MODE", "derived").to_lowercase().as_str() {
            "derived" => GeneratorMode::Derived,
            "toy" => GeneratorMode::Toy,
            other => bail!("GENERATOR_MODE must be 'derived' or 'toy', got '{}'", other),
        };

        let bit_length: usize = get("BIT_LENGTH", &CIRCUIT_BITS.to_string())
            .parse()
            .context("BIT_LENGTH must be a valid number")?;
        if !(1..=253).contains(&bit_length) {
            bail!("BIT_LENGTH must be between 1 and 253, got {}", bit_length);
        }

        let hash_sum_arity: usize = get("HASH_SUM_ARITY", "3")
            .parse()
            .context("HASH_SUM_ARITY must be a valid number")?;
        if hash_sum_arity == 0 {
            bail!("HASH_SUM_ARITY must be at least 1");
        }

        let config = Config {
            artifact_dir: PathBuf::from(get("ARTIFACT_DIR", "generated")),
            bit_length,
            hash_sum_arity,
            generator_mode,
            generator_domain: lookup("GENERATOR_DOMAIN")
                .unwrap_or_else(|| String::from_utf8_lossy(DEFAULT_H_DOMAIN).into_owned()),
            prove_timeout: Duration::from_secs(
                get("PROVE_TIMEOUT_SECS", "300")
                    .parse()
                    .context("PROVE_TIMEOUT_SECS must be a valid number")?,
            ),
            eth_rpc_url: get("ETH_RPC_URL", "http://127.0.0.1:8545"),
            chain_id: get("CHAIN_ID", "31337").parse().context("Invalid CHAIN_ID")?,
            verifier_address: lookup("VERIFIER_ADDRESS").filter(|s| !s.is_empty()),
            chain_timeout: Duration::from_secs(
                get("CHAIN_TIMEOUT_SECS", "30")
                    .parse()
                    .context("CHAIN_TIMEOUT_SECS must be a valid number")?,
            ),
            environment,
        };

        if config.is_production() && config.generator_mode == GeneratorMode::Toy {
            bail!("GENERATOR_MODE=toy is not allowed in production (H = 1·G is not binding)");
        }

        Ok(config)
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Generator pair selected by `GENERATOR_MODE`
    pub fn generators(&self) -> PedersenGenerators {
        match self.generator_mode {
            GeneratorMode::Derived => PedersenGenerators::derive(self.generator_domain.as_bytes()),
            GeneratorMode::Toy => {
                tracing::warn!("Using toy generators (H = 1·G); commitments are NOT binding");
                PedersenGenerators::toy()
            }
        }
    }

    pub fn blockchain_config(&self) -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: self.eth_rpc_url.clone(),
            chain_id: self.chain_id,
            verifier_address: self.verifier_address.clone(),
            call_timeout: self.chain_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bit_length, 252);
        assert_eq!(config.hash_sum_arity, 3);
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.generator_mode, GeneratorMode::Derived);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.artifact_dir, PathBuf::from("generated"));
        assert!(config.verifier_address.is_none());
    }

    #[test]
    fn test_bit_length_bounds() {
        assert!(config_from(&[("BIT_LENGTH", "253")]).is_ok());
        assert!(config_from(&[("BIT_LENGTH", "254")]).is_err());
        assert!(config_from(&[("BIT_LENGTH", "0")]).is_err());
        assert!(config_from(&[("BIT_LENGTH", "many")]).is_err());
    }

    #[test]
    fn test_toy_generators_refused_in_production() {
        assert!(config_from(&[("GENERATOR_MODE", "toy")]).is_ok());
        assert!(config_from(&[("GENERATOR_MODE", "toy"), ("ENVIRONMENT", "production")]).is_err());
        assert!(config_from(&[("GENERATOR_MODE", "random")]).is_err());
    }

    #[test]
    fn test_generators_follow_mode() {
        let toy = config_from(&[("GENERATOR_MODE", "toy")]).unwrap();
        assert!(toy.generators().is_toy());

        let derived = config_from(&[]).unwrap();
        assert_eq!(derived.generators(), PedersenGenerators::default());
    }

    #[test]
    fn test_blockchain_config() {
        let config = config_from(&[("VERIFIER_ADDRESS", "0x5FbDB2315678afecb367f032d93F642f64180aa3")]).unwrap();
        let chain = config.blockchain_config();
        assert_eq!(chain.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(chain.verifier_address.as_deref(), Some("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
    }
}
