//! Consistency Checker
//!
//! Positional comparison of the prover's public signals against values
//! computed locally. Every position is evaluated; a mismatch never stops
//! the check early.
//!
//! # Signal Layouts
//!
//! | Variant | Index | Signal |
//! |---------|-------|--------|
//! | Pedersen | 0 | commitment.x |
//! | Pedersen | 1 | commitment.y |
//! | HashSum(n) | 0..n | commitment[i] |
//! | HashSum(n) | n | x_total |

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::field::{self, FieldElement};
use crate::types::{CircuitVariant, Commitment, CurvePoint, PublicSignals};

/// Named public-signal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSlot {
    CommitmentX,
    CommitmentY,
    ItemCommitment(usize),
    Total,
}

impl std::fmt::Display for SignalSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSlot::CommitmentX => f.write_str("commitment.x"),
            SignalSlot::CommitmentY => f.write_str("commitment.y"),
            SignalSlot::ItemCommitment(i) => write!(f, "commitment[{}]", i),
            SignalSlot::Total => f.write_str("x_total"),
        }
    }
}

/// Ordered slots of one circuit's public signals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalLayout {
    slots: Vec<SignalSlot>,
}

impl SignalLayout {
    pub fn pedersen() -> Self {
        Self {
            slots: vec![SignalSlot::CommitmentX, SignalSlot::CommitmentY],
        }
    }

    pub fn hash_sum(arity: usize) -> Self {
        let mut slots: Vec<_> = (0..arity).map(SignalSlot::ItemCommitment).collect();
        slots.push(SignalSlot::Total);
        Self { slots }
    }

    pub fn for_variant(variant: CircuitVariant) -> Self {
        match variant {
            CircuitVariant::Pedersen => Self::pedersen(),
            CircuitVariant::HashSum { arity } => Self::hash_sum(arity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn index_of(&self, slot: SignalSlot) -> Option<usize> {
        self.slots.iter().position(|s| *s == slot)
    }

    /// Slot name, or `signal[i]` past the end of the layout
    pub fn name(&self, index: usize) -> String {
        self.slots
            .get(index)
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("signal[{}]", index))
    }
}

/// One compared position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub index: usize,
    pub name: String,
    /// Local value (None: the prover emitted a surplus signal)
    pub expected: Option<String>,
    /// Prover value (None: the prover omitted this signal)
    pub actual: Option<String>,
    pub matched: bool,
}

/// Per-field comparison result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub checks: Vec<FieldCheck>,
}

impl ConsistencyReport {
    pub fn all_matched(&self) -> bool {
        self.checks.iter().all(|c| c.matched)
    }

    pub fn mismatched_indices(&self) -> Vec<usize> {
        self.checks
            .iter()
            .filter(|c| !c.matched)
            .map(|c| c.index)
            .collect()
    }

    /// Report with mismatches → `ConsistencyMismatch`
    pub fn into_result(self) -> EngineResult<Self> {
        let indices = self.mismatched_indices();
        if indices.is_empty() {
            Ok(self)
        } else {
            Err(EngineError::ConsistencyMismatch { indices })
        }
    }
}

/// One line per field: `✓ [0] commitment.x  expected=…  actual=…`
impl std::fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for check in &self.checks {
            writeln!(
                f,
                "{} [{}] {:<16} expected={}  actual={}",
                if check.matched { "✓" } else { "✗" },
                check.index,
                check.name,
                check.expected.as_deref().unwrap_or("<none>"),
                check.actual.as_deref().unwrap_or("<none>"),
            )?;
        }
        Ok(())
    }
}

/// Positional comparison; surplus or missing positions are unmatched
pub fn compare(public_signals: &[FieldElement], local_values: &[FieldElement]) -> Vec<(usize, bool)> {
    let len = public_signals.len().max(local_values.len());
    (0..len)
        .map(|i| {
            let matched = matches!(
                (public_signals.get(i), local_values.get(i)),
                (Some(a), Some(b)) if a == b
            );
            (i, matched)
        })
        .collect()
}

/// Compares prover output against local reference values
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    layout: SignalLayout,
}

impl ConsistencyChecker {
    pub fn new(layout: SignalLayout) -> Self {
        Self { layout }
    }

    pub fn for_variant(variant: CircuitVariant) -> Self {
        Self::new(SignalLayout::for_variant(variant))
    }

    pub fn layout(&self) -> &SignalLayout {
        &self.layout
    }

    pub fn check(&self, signals: &PublicSignals, local_values: &[FieldElement]) -> ConsistencyReport {
        let checks = compare(signals.as_slice(), local_values)
            .into_iter()
            .map(|(index, matched)| FieldCheck {
                index,
                name: self.layout.name(index),
                expected: local_values.get(index).map(field::to_canonical_string),
                actual: signals.get(index).map(field::to_canonical_string),
                matched,
            })
            .collect::<Vec<_>>();

        let mismatches = checks.iter().filter(|c| !c.matched).count();
        if mismatches == 0 {
            tracing::info!(signals = checks.len(), "Public signals match local values");
        } else {
            for check in checks.iter().filter(|c| !c.matched) {
                tracing::warn!(
                    index = check.index,
                    name = %check.name,
                    expected = ?check.expected,
                    actual = ?check.actual,
                    "Public signal mismatch"
                );
            }
        }

        ConsistencyReport { checks }
    }

    /// publicSignals[0..2] == (C.x, C.y)
    pub fn check_pedersen(&self, signals: &PublicSignals, commitment: &CurvePoint) -> ConsistencyReport {
        let local = Commitment::Pedersen { point: *commitment }.public_values();
        self.check(signals, &local)
    }

    /// publicSignals[i] == c_i and publicSignals[n] == Σ values
    ///
    /// The total is summed here from the values, never taken from the prover.
    pub fn check_hash_sum(
        &self,
        signals: &PublicSignals,
        commitments: &[FieldElement],
        values: &[FieldElement],
    ) -> ConsistencyReport {
        let mut local: Vec<FieldElement> = commitments
            .iter()
            .flat_map(|c| Commitment::Hash { digest: *c }.public_values())
            .collect();
        local.push(field::sum(values));
        self.check(signals, &local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(values: &[u64]) -> Vec<FieldElement> {
        values.iter().map(|v| FieldElement::from(*v)).collect()
    }

    #[test]
    fn test_compare_positional() {
        assert_eq!(compare(&fe(&[1, 2, 3]), &fe(&[1, 9, 3])), vec![(0, true), (1, false), (2, true)]);
    }

    #[test]
    fn test_compare_reports_length_mismatch() {
        assert_eq!(compare(&fe(&[1, 2, 3]), &fe(&[1, 2])), vec![(0, true), (1, true), (2, false)]);
        assert_eq!(compare(&fe(&[1]), &fe(&[1, 2])), vec![(0, true), (1, false)]);
    }

    #[test]
    fn test_layouts() {
        let layout = SignalLayout::hash_sum(3);
        assert_eq!(layout.len(), 4);
        assert_eq!(layout.index_of(SignalSlot::Total), Some(3));
        assert_eq!(layout.name(1), "commitment[1]");
        assert_eq!(layout.name(7), "signal[7]");

        let pedersen = SignalLayout::pedersen();
        assert_eq!(pedersen.index_of(SignalSlot::CommitmentY), Some(1));
    }

    #[test]
    fn test_hash_sum_total_check() {
        let checker = ConsistencyChecker::for_variant(CircuitVariant::HashSum { arity: 3 });
        let commitments = fe(&[100, 200, 300]);
        let values = fe(&[1, 2, 8]);

        let good = PublicSignals(fe(&[100, 200, 300, 11]));
        let report = checker.check_hash_sum(&good, &commitments, &values);
        assert!(report.all_matched());
        assert_eq!(report.checks[3].name, "x_total");
        assert_eq!(report.checks[3].expected.as_deref(), Some("11"));

        let bad = PublicSignals(fe(&[100, 201, 300, 12]));
        let report = checker.check_hash_sum(&bad, &commitments, &values);
        assert_eq!(report.checks.len(), 4);
        assert_eq!(report.mismatched_indices(), vec![1, 3]);

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, EngineError::ConsistencyMismatch { ref indices } if indices == &vec![1, 3]));
    }

    #[test]
    fn test_pedersen_check_with_missing_signal() {
        let checker = ConsistencyChecker::for_variant(CircuitVariant::Pedersen);
        let point = CurvePoint {
            x: FieldElement::from(5u64),
            y: FieldElement::from(6u64),
        };

        let report = checker.check_pedersen(&PublicSignals(fe(&[5])), &point);
        assert_eq!(report.mismatched_indices(), vec![1]);
        assert_eq!(report.checks[1].actual, None);
        assert_eq!(report.checks[1].name, "commitment.y");

        let report = checker.check_pedersen(&PublicSignals(fe(&[5, 6])), &point);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_report_lists_every_field() {
        let checker = ConsistencyChecker::for_variant(CircuitVariant::HashSum { arity: 2 });
        let report = checker.check_hash_sum(&PublicSignals(fe(&[7, 9, 4])), &fe(&[7, 8]), &fe(&[1, 2]));

        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("✓ [0] commitment[0]"));
        assert!(lines[1].starts_with("✗ [1] commitment[1]"));
        assert!(lines[1].contains("expected=8") && lines[1].contains("actual=9"));
        assert!(lines[2].contains("x_total") && lines[2].contains("expected=3"));
    }
}
