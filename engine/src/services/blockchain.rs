//! Blockchain Service
//!
//! Calls a deployed Groth16 verifier contract.
//!
//! # Features
//! - Proof → verifier call data reshaping (pure)
//! - Read-only `verifyProof` call through ethers (no signing)
//! - Revert reason decoding, timeout on the RPC call
//!
//! # Interview Q&A
//!
//! Q: 왜 pi_b의 좌표 순서를 뒤집는가?
//! A: EVM pairing precompile (EIP-197)의 Fq2 인코딩 규칙
//!    - snarkjs/arkworks: (c0, c1)
//!    - precompile: (c1, c0) → 순서를 바꾸지 않으면 검증이 항상 실패

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ethers::{
    contract::abigen,
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
};

use crate::error::{EngineError, EngineResult, ExternalCall, ProverFailureKind};
use crate::field::to_canonical_string;
use crate::types::{CallData, ProofArtifact, PublicSignals, VerificationResult};

abigen!(
    Groth16Verifier,
    r#"[
        function verifyProof(uint256[2] _pA, uint256[2][2] _pB, uint256[2] _pC, uint256[] _pubSignals) external view returns (bool)
    ]"#
);

/// 블록체인 네트워크 설정
#[derive(Debug, Clone)]
pub struct BlockchainConfig {
    /// RPC URL
    pub rpc_url: String,
    /// Chain ID
    pub chain_id: u64,
    /// Deployed verifier contract
    pub verifier_address: Option<String>,
    /// Timeout for a single contract call
    pub call_timeout: Duration,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337, // Anvil default
            verifier_address: None,
            call_timeout: Duration::from_secs(30),
        }
    }
}

/// Proof + signals → (A, B, C, inputs)
///
/// B swaps the Fq2 limbs of both coordinates.
pub fn to_call_data(proof: &ProofArtifact, signals: &PublicSignals) -> CallData {
    let [a_x, a_y, _] = &proof.pi_a;
    let [b_x, b_y, _] = &proof.pi_b;
    let [c_x, c_y, _] = &proof.pi_c;

    CallData {
        a: [a_x.clone(), a_y.clone()],
        b: [
            [b_x[1].clone(), b_x[0].clone()],
            [b_y[1].clone(), b_y[0].clone()],
        ],
        c: [c_x.clone(), c_y.clone()],
        inputs: signals.as_slice().iter().map(to_canonical_string).collect(),
    }
}

/// verifyProof capability
pub trait VerifierContract: Send + Sync {
    /// Ok(bool) is the contract's answer; reverts and RPC failures are errors
    fn verify_proof(&self, call: &CallData) -> impl Future<Output = EngineResult<bool>> + Send;
}

fn transport(reason: impl Into<String>) -> EngineError {
    EngineError::OnChainTransport { reason: reason.into() }
}

fn uint(s: &str) -> EngineResult<U256> {
    U256::from_dec_str(s).map_err(|e| {
        EngineError::prover(
            ProverFailureKind::MalformedArtifact,
            format!("'{}' is not a uint256: {}", s, e),
        )
    })
}

/// ethers-backed verifier contract (read-only `eth_call`)
pub struct EthersVerifierContract {
    contract: Groth16Verifier<Provider<Http>>,
}

impl EthersVerifierContract {
    /// Connect and check that the node serves the configured chain
    pub async fn connect(config: &BlockchainConfig) -> EngineResult<Self> {
        let address_str = config
            .verifier_address
            .as_deref()
            .ok_or_else(|| transport("VERIFIER_ADDRESS is not set"))?;
        let address: Address = address_str
            .parse()
            .map_err(|e| transport(format!("invalid verifier address {}: {}", address_str, e)))?;

        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| transport(format!("invalid RPC URL {}: {}", config.rpc_url, e)))?;

        let chain_id = tokio::time::timeout(config.call_timeout, provider.get_chainid())
            .await
            .map_err(|_| EngineError::ExternalCallTimeout {
                call: ExternalCall::VerifierContract,
                timeout: config.call_timeout,
            })?
            .map_err(|e| transport(e.to_string()))?;
        if chain_id != U256::from(config.chain_id) {
            return Err(transport(format!(
                "node reports chain id {}, expected {}",
                chain_id, config.chain_id
            )));
        }

        tracing::info!(rpc = %config.rpc_url, chain_id = config.chain_id, verifier = %address, "Verifier contract connected");

        Ok(Self {
            contract: Groth16Verifier::new(address, Arc::new(provider)),
        })
    }
}

impl VerifierContract for EthersVerifierContract {
    async fn verify_proof(&self, call: &CallData) -> EngineResult<bool> {
        let a = [uint(&call.a[0])?, uint(&call.a[1])?];
        let b = [
            [uint(&call.b[0][0])?, uint(&call.b[0][1])?],
            [uint(&call.b[1][0])?, uint(&call.b[1][1])?],
        ];
        let c = [uint(&call.c[0])?, uint(&call.c[1])?];
        let inputs = call
            .inputs
            .iter()
            .map(|s| uint(s))
            .collect::<EngineResult<Vec<_>>>()?;

        match self.contract.verify_proof(a, b, c, inputs).call().await {
            Ok(valid) => Ok(valid),
            Err(e) if e.is_revert() => Err(EngineError::OnChainRevert {
                reason: e
                    .decode_revert::<String>()
                    .unwrap_or_else(|| "execution reverted".to_string()),
            }),
            Err(e) => Err(transport(e.to_string())),
        }
    }
}

/// Reshapes proofs and invokes the verifier under a timeout
pub struct OnChainVerifierClient<V: VerifierContract> {
    contract: V,
    call_timeout: Duration,
}

impl<V: VerifierContract> OnChainVerifierClient<V> {
    pub fn new(contract: V, call_timeout: Duration) -> Self {
        Self {
            contract,
            call_timeout,
        }
    }

    pub async fn invoke(&self, call: &CallData) -> EngineResult<VerificationResult> {
        tracing::info!(inputs = call.inputs.len(), "Calling verifyProof...");

        let valid = tokio::time::timeout(self.call_timeout, self.contract.verify_proof(call))
            .await
            .map_err(|_| EngineError::ExternalCallTimeout {
                call: ExternalCall::VerifierContract,
                timeout: self.call_timeout,
            })??;

        tracing::info!(valid, "Verifier contract answered");

        Ok(if valid {
            VerificationResult::valid()
        } else {
            VerificationResult::invalid("verifier contract returned false")
        })
    }

    /// to_call_data + invoke
    pub async fn verify(&self, proof: &ProofArtifact, signals: &PublicSignals) -> EngineResult<VerificationResult> {
        self.invoke(&to_call_data(proof, signals)).await
    }
}
