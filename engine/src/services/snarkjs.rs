//! snarkjs-compatible JSON encoding of Groth16 objects
//!
//! Points are affine with a trailing projective flag: G1 `[x, y, "1"]`,
//! G2 `[[x.c0, x.c1], [y.c0, y.c1], ["1", "0"]]`. The point at infinity is
//! `["0", "1", "0"]` (G1) and `[["0","0"], ["1","0"], ["0","0"]]` (G2).
//! Decoding checks that every point is on the curve and in the subgroup.

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_groth16::{Proof, VerifyingKey};
use ark_serialize::CanonicalSerialize;
use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

use crate::error::{EngineError, EngineResult, ProverFailureKind};
use crate::types::{ProofArtifact, VerificationKeyArtifact};

pub const PROTOCOL: &str = "groth16";
pub const CURVE: &str = "bn128";

fn malformed(msg: impl Into<String>) -> EngineError {
    EngineError::prover(ProverFailureKind::MalformedArtifact, msg)
}

fn fq_to_dec<F: PrimeField>(f: &F) -> String {
    BigUint::from_bytes_le(&f.into_bigint().to_bytes_le()).to_string()
}

fn fq_from_dec<F: PrimeField>(s: &str) -> EngineResult<F> {
    let x = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| malformed(format!("'{}' is not a decimal coordinate", s)))?;
    let modulus = BigUint::from_bytes_le(&F::MODULUS.to_bytes_le());
    if x >= modulus {
        return Err(malformed(format!("coordinate {} exceeds the base field", s)));
    }
    Ok(F::from_le_bytes_mod_order(&x.to_bytes_le()))
}

fn g1_to_json(p: &G1Affine) -> [String; 3] {
    if p.is_zero() {
        return ["0".into(), "1".into(), "0".into()];
    }
    [fq_to_dec(&p.x), fq_to_dec(&p.y), "1".into()]
}

fn g1_from_json(p: &[String; 3]) -> EngineResult<G1Affine> {
    if p[2] == "0" {
        return Ok(G1Affine::zero());
    }
    let point = G1Affine::new_unchecked(fq_from_dec::<Fq>(&p[0])?, fq_from_dec::<Fq>(&p[1])?);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed("G1 point is not on the curve"));
    }
    Ok(point)
}

fn fq2_to_json(f: &Fq2) -> [String; 2] {
    [fq_to_dec(&f.c0), fq_to_dec(&f.c1)]
}

fn fq2_from_json(f: &[String; 2]) -> EngineResult<Fq2> {
    Ok(Fq2::new(fq_from_dec::<Fq>(&f[0])?, fq_from_dec::<Fq>(&f[1])?))
}

fn g2_to_json(p: &G2Affine) -> [[String; 2]; 3] {
    if p.is_zero() {
        return [
            ["0".into(), "0".into()],
            ["1".into(), "0".into()],
            ["0".into(), "0".into()],
        ];
    }
    [fq2_to_json(&p.x), fq2_to_json(&p.y), ["1".into(), "0".into()]]
}

fn g2_from_json(p: &[[String; 2]; 3]) -> EngineResult<G2Affine> {
    if fq2_from_json(&p[2])?.is_zero() {
        return Ok(G2Affine::zero());
    }
    let point = G2Affine::new_unchecked(fq2_from_json(&p[0])?, fq2_from_json(&p[1])?);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed("G2 point is not on the curve or not in the subgroup"));
    }
    Ok(point)
}

fn check_header(protocol: &str, curve: &str) -> EngineResult<()> {
    if protocol != PROTOCOL || curve != CURVE {
        return Err(malformed(format!(
            "expected {}/{}, found {}/{}",
            PROTOCOL, CURVE, protocol, curve
        )));
    }
    Ok(())
}

pub fn proof_to_json(proof: &Proof<Bn254>) -> ProofArtifact {
    ProofArtifact {
        pi_a: g1_to_json(&proof.a),
        pi_b: g2_to_json(&proof.b),
        pi_c: g1_to_json(&proof.c),
        protocol: PROTOCOL.into(),
        curve: CURVE.into(),
    }
}

pub fn proof_from_json(artifact: &ProofArtifact) -> EngineResult<Proof<Bn254>> {
    check_header(&artifact.protocol, &artifact.curve)?;
    Ok(Proof {
        a: g1_from_json(&artifact.pi_a)?,
        b: g2_from_json(&artifact.pi_b)?,
        c: g1_from_json(&artifact.pi_c)?,
    })
}

pub fn vk_to_json(vk: &VerifyingKey<Bn254>) -> VerificationKeyArtifact {
    VerificationKeyArtifact {
        protocol: PROTOCOL.into(),
        curve: CURVE.into(),
        n_public: vk.gamma_abc_g1.len().saturating_sub(1),
        vk_alpha_1: g1_to_json(&vk.alpha_g1),
        vk_beta_2: g2_to_json(&vk.beta_g2),
        vk_gamma_2: g2_to_json(&vk.gamma_g2),
        vk_delta_2: g2_to_json(&vk.delta_g2),
        ic: vk.gamma_abc_g1.iter().map(g1_to_json).collect(),
    }
}

pub fn vk_from_json(artifact: &VerificationKeyArtifact) -> EngineResult<VerifyingKey<Bn254>> {
    check_header(&artifact.protocol, &artifact.curve)?;
    if artifact.ic.len().checked_sub(1) != Some(artifact.n_public) {
        return Err(malformed(format!(
            "verification key declares {} public inputs but carries {} IC points",
            artifact.n_public,
            artifact.ic.len()
        )));
    }

    Ok(VerifyingKey {
        alpha_g1: g1_from_json(&artifact.vk_alpha_1)?,
        beta_g2: g2_from_json(&artifact.vk_beta_2)?,
        gamma_g2: g2_from_json(&artifact.vk_gamma_2)?,
        delta_g2: g2_from_json(&artifact.vk_delta_2)?,
        gamma_abc_g1: artifact
            .ic
            .iter()
            .map(g1_from_json)
            .collect::<EngineResult<Vec<_>>>()?,
    })
}

/// Keccak256 over the compressed verification key, `0x`-prefixed
///
/// Printed at setup and logged at load so a prover and a deployed verifier
/// can be matched to the same ceremony.
pub fn vk_fingerprint(vk: &VerifyingKey<Bn254>) -> EngineResult<String> {
    let mut bytes = Vec::new();
    vk.serialize_compressed(&mut bytes)
        .map_err(|e| EngineError::prover(ProverFailureKind::Internal, e.to_string()))?;

    let mut hasher = Keccak256::new();
    hasher.update(&bytes);
    Ok(format!("0x{}", hex::encode(hasher.finalize())))
}
