//! Three-layer run summary
//!
//! ```text
//! local computation     ✅ commitment + x_total computed
//! circuit/proof result  ✅ proof verified, 4/4 signals consistent
//! on-chain result       ⏭  skipped (VERIFIER_ADDRESS not set)
//! ```
//!
//! A failure is attributed to the layer its error maps to, so the summary
//! points at where to look.

use std::fmt;

use crate::error::{EngineError, EngineResult, Layer};
use crate::services::ConsistencyReport;
use crate::types::VerificationResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed(String),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    local: Outcome,
    circuit: Outcome,
    onchain: Outcome,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            local: Outcome::Skipped("not run".into()),
            circuit: Outcome::Skipped("not run".into()),
            onchain: Outcome::Skipped("not run".into()),
        }
    }
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, layer: Layer) -> &mut Outcome {
        match layer {
            Layer::LocalComputation => &mut self.local,
            Layer::CircuitProof => &mut self.circuit,
            Layer::OnChain => &mut self.onchain,
        }
    }

    pub fn pass(&mut self, layer: Layer, detail: impl Into<String>) {
        *self.slot(layer) = Outcome::Passed(detail.into());
    }

    pub fn fail(&mut self, layer: Layer, detail: impl Into<String>) {
        *self.slot(layer) = Outcome::Failed(detail.into());
    }

    pub fn skip(&mut self, layer: Layer, detail: impl Into<String>) {
        *self.slot(layer) = Outcome::Skipped(detail.into());
    }

    /// Attribute an error to its layer
    pub fn record_error(&mut self, err: &EngineError) {
        self.fail(err.layer(), err.to_string());
    }

    /// Circuit/proof verdict from local verification and the consistency report
    ///
    /// Both are always recorded: a rejected proof does not hide signal
    /// mismatches, and mismatches do not hide a rejected proof.
    pub fn record_circuit(&mut self, verification: EngineResult<VerificationResult>, report: &ConsistencyReport) {
        let mut failures = Vec::new();
        match verification {
            Ok(result) if result.valid => {}
            Ok(result) => failures.push(result.reason.unwrap_or_else(|| "proof rejected".into())),
            Err(e) => failures.push(e.to_string()),
        }
        if !report.all_matched() {
            let err = EngineError::ConsistencyMismatch {
                indices: report.mismatched_indices(),
            };
            failures.push(err.to_string());
        }

        if failures.is_empty() {
            let matched = report.checks.iter().filter(|c| c.matched).count();
            self.pass(
                Layer::CircuitProof,
                format!("proof verified, {}/{} signals consistent", matched, report.checks.len()),
            );
        } else {
            self.fail(Layer::CircuitProof, failures.join("; "));
        }
    }

    pub fn outcome(&self, layer: Layer) -> &Outcome {
        match layer {
            Layer::LocalComputation => &self.local,
            Layer::CircuitProof => &self.circuit,
            Layer::OnChain => &self.onchain,
        }
    }

    pub fn is_success(&self) -> bool {
        [&self.local, &self.circuit, &self.onchain]
            .iter()
            .all(|o| !matches!(o, Outcome::Failed(_)))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in [Layer::LocalComputation, Layer::CircuitProof, Layer::OnChain] {
            let (mark, detail) = match self.outcome(layer) {
                Outcome::Passed(d) => ("✅", d),
                Outcome::Failed(d) => ("❌", d),
                Outcome::Skipped(d) => ("⏭ ", d),
            };
            writeln!(f, "{:<22}{} {}", layer.to_string(), mark, detail)?;
        }
        Ok(())
    }
}
