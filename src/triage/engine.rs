use super::config::{AdvisoryPolicy, ClassificationConfig, ClassificationMode};
use super::dedupe::SeenKeyStore;
use super::domain::{JobRecord, Verdict};
use super::gates::{self, GateOutcome};
use chrono::{DateTime, Utc};

pub const REASON_SEPARATOR: &str = " | ";

/// Runs the gate sequence for one record at a time under a fixed configuration.
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    config: ClassificationConfig,
}

impl ClassificationEngine {
    pub fn new(config: ClassificationConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    pub fn classify<S>(&self, record: &JobRecord, seen: &mut S) -> Verdict
    where
        S: SeenKeyStore + ?Sized,
    {
        self.classify_at(record, seen, Utc::now())
    }

    /// Classify against an explicit clock, used by the staleness gate.
    pub fn classify_at<S>(&self, record: &JobRecord, seen: &mut S, now: DateTime<Utc>) -> Verdict
    where
        S: SeenKeyStore + ?Sized,
    {
        let outcomes = self.evaluate_at(record, seen, now);
        aggregate(self.config.mode, self.config.advisory_policy, &outcomes)
    }

    /// Every gate's outcome in execution order. No gate is skipped.
    pub fn evaluate_at<S>(
        &self,
        record: &JobRecord,
        seen: &mut S,
        now: DateTime<Utc>,
    ) -> Vec<GateOutcome>
    where
        S: SeenKeyStore + ?Sized,
    {
        let config = &self.config;
        vec![
            gates::core_fields_gate(record),
            gates::dedupe_gate(record, seen),
            gates::region_gate(record),
            gates::location_gate(record, config),
            gates::role_gate(record),
            gates::salary_gate(record, config),
            gates::staleness_gate(record, config, now),
        ]
    }
}

/// Fold gate outcomes into a verdict.
pub fn aggregate(
    mode: ClassificationMode,
    policy: AdvisoryPolicy,
    outcomes: &[GateOutcome],
) -> Verdict {
    let advisories: Vec<String> = outcomes
        .iter()
        .filter_map(GateOutcome::advisory)
        .map(str::to_string)
        .collect();

    let reasons: Vec<&str> = outcomes
        .iter()
        .filter_map(|outcome| match policy {
            AdvisoryPolicy::Mixed => outcome.reason.filter(|reason| !reason.is_empty()),
            AdvisoryPolicy::Separate if !outcome.passed => outcome.reason,
            AdvisoryPolicy::Separate => None,
        })
        .collect();

    if reasons.is_empty() {
        return Verdict::keep().with_advisories(advisories);
    }

    let render = match mode {
        ClassificationMode::Review => render_all,
        ClassificationMode::Strict => render_first,
    };
    Verdict::skip(render(&reasons)).with_advisories(advisories)
}

fn render_all(reasons: &[&str]) -> String {
    reasons.join(REASON_SEPARATOR)
}

fn render_first(reasons: &[&str]) -> String {
    reasons.first().map(|reason| reason.to_string()).unwrap_or_default()
}
