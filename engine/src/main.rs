//! ZK Pedersen CLI
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  zk-pedersen <command>                                      │
//! │  setup · commit · commit-sum · prove · onchain · demo       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  local computation   field · bits · commitment · randomness │
//! ├─────────────────────────────────────────────────────────────┤
//! │  circuit / proof     Groth16 prove · verify · consistency   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  on-chain            verifyProof (eth_call)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Artifacts live under `$ARTIFACT_DIR/<pedersen|hash-sum>/`.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zk_pedersen_engine::{
    commitment::{BatchCommitment, HashSumScheme, PedersenScheme},
    error::Layer,
    field::{self, FieldElement},
    randomness::RandomnessSource,
    report::Summary,
    services::{
        artifacts, hash_sum_inputs, pedersen_inputs, ArtifactPaths, ConsistencyChecker, ConsistencyReport,
        EthersVerifierContract, FieldCheck, Groth16Backend, OnChainVerifierClient, ProofOrchestrator,
    },
    types::{
        CircuitVariant, HashSumOpening, PedersenOpening, ProofArtifact, PublicSignals, VerificationKeyArtifact,
        VerificationResult,
    },
    Config, EngineResult,
};

#[derive(Parser)]
#[command(name = "zk-pedersen")]
#[command(about = "Pedersen / hash-sum commitments with Groth16 consistency checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Development trusted setup, writes proving and verification keys
    Setup {
        #[arg(value_enum)]
        circuit: CircuitArg,
    },

    /// Fresh Pedersen commitment, writes input + opening
    Commit {
        /// Decimal value to commit to
        value: String,
    },

    /// Fresh hash-sum commitment, writes input + opening
    CommitSum {
        /// Decimal values, exactly HASH_SUM_ARITY of them
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Prove, verify locally and check consistency
    Prove {
        #[arg(value_enum)]
        circuit: CircuitArg,
    },

    /// Call the deployed verifier contract
    Onchain {
        #[arg(value_enum)]
        circuit: CircuitArg,
    },

    /// In-memory run of both schemes
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum CircuitArg {
    Pedersen,
    HashSum,
}

impl CircuitArg {
    fn variant(self, config: &Config) -> CircuitVariant {
        match self {
            CircuitArg::Pedersen => CircuitVariant::Pedersen,
            CircuitArg::HashSum => CircuitVariant::HashSum {
                arity: config.hash_sum_arity,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zk_pedersen_engine=info,zk_pedersen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(artifact_dir = %config.artifact_dir.display(), bits = config.bit_length, "📋 Configuration loaded");

    let summary = match cli.command {
        Commands::Setup { circuit } => return setup(&config, circuit.variant(&config)),
        Commands::Commit { value } => return commit(&config, &value),
        Commands::CommitSum { values } => return commit_sum(&config, &values),
        Commands::Prove { circuit } => prove(&config, circuit.variant(&config)).await?,
        Commands::Onchain { circuit } => onchain(&config, circuit.variant(&config)).await?,
        Commands::Demo => demo(&config).await?,
    };

    println!("\n{}", summary);
    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_value(s: &str) -> anyhow::Result<FieldElement> {
    let x = BigUint::parse_bytes(s.as_bytes(), 10).with_context(|| format!("'{}' is not a decimal integer", s))?;
    Ok(field::from_integer(&x)?)
}

fn orchestrator(config: &Config, backend: Groth16Backend) -> ProofOrchestrator<Groth16Backend> {
    ProofOrchestrator::new(Arc::new(backend), config.bit_length, config.prove_timeout)
}

/// setup <variant>
fn setup(config: &Config, variant: CircuitVariant) -> anyhow::Result<()> {
    let paths = ArtifactPaths::new(&config.artifact_dir, variant);
    paths.ensure_dir()?;

    tracing::warn!("Single-party setup: keys are for development only");
    let (backend, vk) = Groth16Backend::setup(variant, config.generators(), config.bit_length, &mut OsRng)?;
    backend.save_proving_key(&paths.proving_key())?;
    artifacts::write_json(&paths.verification_key(), &vk)?;

    println!("✓ Keys written to {}", paths.dir().display());
    println!("✓ Verification key fingerprint: {}", backend.fingerprint()?);
    Ok(())
}

/// commit <value>
fn commit(config: &Config, value: &str) -> anyhow::Result<()> {
    let value = parse_value(value)?;
    let scheme = PedersenScheme::new(config.generators(), config.bit_length);
    let opening = scheme.commit_fresh(&value, &mut RandomnessSource::os())?;

    let paths = ArtifactPaths::new(&config.artifact_dir, CircuitVariant::Pedersen);
    paths.ensure_dir()?;
    let inputs = pedersen_inputs(config.bit_length, &opening.value, &opening.blinding)?;
    artifacts::write_json(&paths.input(), &inputs)?;
    artifacts::write_json(&paths.opening(), &opening)?;

    println!(
        "✓ C = ({}, {})",
        field::to_canonical_string(&opening.commitment.x),
        field::to_canonical_string(&opening.commitment.y)
    );
    println!("✓ Opening written to {}", paths.opening().display());
    Ok(())
}

/// commit-sum <x1> <x2> ...
fn commit_sum(config: &Config, values: &[String]) -> anyhow::Result<()> {
    let values = values.iter().map(|s| parse_value(s)).collect::<anyhow::Result<Vec<_>>>()?;
    let scheme = HashSumScheme::poseidon(config.hash_sum_arity, config.bit_length);
    let opening = scheme.commit_fresh(&values, &mut RandomnessSource::os())?;

    let variant = CircuitVariant::HashSum {
        arity: config.hash_sum_arity,
    };
    let paths = ArtifactPaths::new(&config.artifact_dir, variant);
    paths.ensure_dir()?;
    let inputs = hash_sum_inputs(config.bit_length, &opening.values, &opening.blindings)?;
    artifacts::write_json(&paths.input(), &inputs)?;
    artifacts::write_json(&paths.opening(), &opening)?;

    for (i, c) in opening.commitments.iter().enumerate() {
        println!("✓ commitment[{}] = {}", i, field::to_canonical_string(c));
    }
    println!("✓ x_total = {}", field::to_canonical_string(&opening.total));
    Ok(())
}

/// Local reference values for a variant, recomputed from the opening
fn local_check(
    config: &Config,
    variant: CircuitVariant,
    paths: &ArtifactPaths,
    signals: &PublicSignals,
) -> EngineResult<ConsistencyReport> {
    let checker = ConsistencyChecker::for_variant(variant);
    match variant {
        CircuitVariant::Pedersen => {
            let opening: PedersenOpening = artifacts::read_json(&paths.opening())?;
            let scheme = PedersenScheme::new(config.generators(), config.bit_length);
            let commitment = scheme.commit(&opening.value, &opening.blinding)?;
            Ok(checker.check_pedersen(signals, &commitment))
        }
        CircuitVariant::HashSum { arity } => {
            let opening: HashSumOpening = artifacts::read_json(&paths.opening())?;
            let scheme = HashSumScheme::poseidon(arity, config.bit_length);
            let BatchCommitment { commitments, .. } = scheme.commit(&opening.values, &opening.blindings)?;
            Ok(checker.check_hash_sum(signals, &commitments, &opening.values))
        }
    }
}

/// prove <variant>
async fn prove(config: &Config, variant: CircuitVariant) -> anyhow::Result<Summary> {
    let paths = ArtifactPaths::new(&config.artifact_dir, variant);
    let mut summary = Summary::new();

    let backend = match Groth16Backend::load(variant, config.generators(), config.bit_length, &paths.proving_key()) {
        Ok(backend) => backend,
        Err(e) => {
            summary.record_error(&e);
            return Ok(summary);
        }
    };
    let orchestrator = orchestrator(config, backend);

    let bundle = match async {
        let inputs = artifacts::read_json(&paths.input())?;
        orchestrator.prove(inputs).await
    }
    .await
    {
        Ok(bundle) => bundle,
        Err(e) => {
            tracing::error!(error = %e, "Proof generation failed");
            summary.record_error(&e);
            return Ok(summary);
        }
    };

    artifacts::write_json(&paths.proof(), &bundle.proof)?;
    artifacts::write_json(&paths.public(), &bundle.public_signals)?;
    println!("✓ Proof written to {}", paths.proof().display());

    // local computation
    let report = match local_check(config, variant, &paths, &bundle.public_signals) {
        Ok(report) => {
            summary.pass(Layer::LocalComputation, "reference values recomputed from opening");
            report
        }
        Err(e) => {
            summary.record_error(&e);
            return Ok(summary);
        }
    };

    // circuit / proof
    println!("\nPublic signal consistency:\n{}", report);
    let verification = async {
        let vk: VerificationKeyArtifact = artifacts::read_json(&paths.verification_key())?;
        orchestrator
            .verify_local(vk, bundle.public_signals.clone(), bundle.proof)
            .await
    }
    .await;
    summary.record_circuit(verification, &report);

    summary.skip(Layer::OnChain, "run `zk-pedersen onchain` to call the verifier");
    Ok(summary)
}

/// onchain <variant>
async fn onchain(config: &Config, variant: CircuitVariant) -> anyhow::Result<Summary> {
    let paths = ArtifactPaths::new(&config.artifact_dir, variant);
    let mut summary = Summary::new();

    let proof: ProofArtifact = artifacts::read_json(&paths.proof())?;
    let signals: PublicSignals = artifacts::read_json(&paths.public())?;
    summary.skip(Layer::LocalComputation, "artifacts read from disk");
    summary.skip(Layer::CircuitProof, "see `zk-pedersen prove`");

    let chain = config.blockchain_config();
    if chain.verifier_address.is_none() {
        summary.skip(Layer::OnChain, "VERIFIER_ADDRESS not set");
        return Ok(summary);
    }

    let result = async {
        let contract = EthersVerifierContract::connect(&chain).await?;
        OnChainVerifierClient::new(contract, chain.call_timeout)
            .verify(&proof, &signals)
            .await
    }
    .await;

    match result {
        Ok(r) if r.valid => summary.pass(Layer::OnChain, "verifyProof returned true"),
        Ok(r) => summary.fail(Layer::OnChain, r.reason.unwrap_or_default()),
        Err(e) => summary.record_error(&e),
    }
    Ok(summary)
}

/// demo: value 42 (Pedersen), x = [1, 2, 8] (hash-sum), no files
async fn demo(config: &Config) -> anyhow::Result<Summary> {
    let mut summary = Summary::new();
    let mut rng = RandomnessSource::os();
    let generators = config.generators();
    let bits = config.bit_length;

    // ======== Pedersen ========
    let pedersen = PedersenScheme::new(generators, bits);
    let opening = pedersen.commit_fresh(&FieldElement::from(42u64), &mut rng)?;

    let (backend, vk) = Groth16Backend::setup(CircuitVariant::Pedersen, generators, bits, &mut OsRng)?;
    let prover = orchestrator(config, backend);
    let bundle = prover
        .prove(prover.pedersen_inputs(&opening.value, &opening.blinding)?)
        .await?;
    let pedersen_verification = prover
        .verify_local(vk, bundle.public_signals.clone(), bundle.proof)
        .await;
    let pedersen_report =
        ConsistencyChecker::for_variant(CircuitVariant::Pedersen).check_pedersen(&bundle.public_signals, &opening.commitment);

    // ======== Hash-sum ========
    let variant = CircuitVariant::HashSum { arity: 3 };
    let hash_sum = HashSumScheme::poseidon(3, bits);
    let batch = hash_sum.commit_fresh(&[1u64, 2, 8].map(FieldElement::from), &mut rng)?;

    let (backend, vk) = Groth16Backend::setup(variant, generators, bits, &mut OsRng)?;
    let prover = orchestrator(config, backend);
    let bundle = prover
        .prove(prover.hash_sum_inputs(&batch.values, &batch.blindings)?)
        .await?;
    let hash_sum_verification = prover
        .verify_local(vk, bundle.public_signals.clone(), bundle.proof)
        .await;
    let hash_sum_report = ConsistencyChecker::for_variant(variant).check_hash_sum(
        &bundle.public_signals,
        &batch.commitments,
        &batch.values,
    );

    summary.pass(
        Layer::LocalComputation,
        format!("C(42) and x_total = {} computed", field::to_canonical_string(&batch.total)),
    );
    println!("\nPedersen signal consistency:\n{}", pedersen_report);
    println!("Hash-sum signal consistency:\n{}", hash_sum_report);

    let verification = pedersen_verification.and_then(|p| {
        hash_sum_verification.map(|h| match (p.valid, h.valid) {
            (true, true) => VerificationResult::valid(),
            (false, true) => VerificationResult::invalid("Pedersen proof rejected"),
            (true, false) => VerificationResult::invalid("hash-sum proof rejected"),
            (false, false) => VerificationResult::invalid("both proofs rejected"),
        })
    });
    let combined = ConsistencyReport {
        checks: pedersen_report
            .checks
            .into_iter()
            .map(|c| ("pedersen", c))
            .chain(hash_sum_report.checks.into_iter().map(|c| ("hash-sum", c)))
            .enumerate()
            .map(|(index, (scheme, check))| FieldCheck {
                index,
                name: format!("{} {}", scheme, check.name),
                ..check
            })
            .collect(),
    };
    summary.record_circuit(verification, &combined);
    summary.skip(Layer::OnChain, "demo runs in memory");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["zk-pedersen", "bogus"]).is_err());
        assert!(Cli::try_parse_from(["zk-pedersen"]).is_err());
        assert!(Cli::try_parse_from(["zk-pedersen", "prove", "plonk"]).is_err());
        assert!(Cli::try_parse_from(["zk-pedersen", "commit-sum"]).is_err());
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["zk-pedersen", "prove", "hash-sum"]).unwrap();
        assert!(matches!(cli.command, Commands::Prove { circuit: CircuitArg::HashSum }));

        let cli = Cli::try_parse_from(["zk-pedersen", "commit-sum", "1", "2", "8"]).unwrap();
        match cli.command {
            Commands::CommitSum { values } => assert_eq!(values, vec!["1", "2", "8"]),
            _ => panic!("expected commit-sum"),
        }

        let cli = Cli::try_parse_from(["zk-pedersen", "setup", "pedersen"]).unwrap();
        assert!(matches!(cli.command, Commands::Setup { circuit: CircuitArg::Pedersen }));
    }
}
