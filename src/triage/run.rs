use super::config::ClassificationConfig;
use super::dedupe::SeenKeys;
use super::domain::{JobRecord, Verdict};
use super::engine::{ClassificationEngine, REASON_SEPARATOR};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A record together with the verdict it received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriagedRecord {
    pub record: JobRecord,
    pub verdict: Verdict,
}

/// One classification batch. Owns the dedupe set for exactly as long as the batch lives.
pub struct TriageRun {
    engine: ClassificationEngine,
    seen: SeenKeys,
    now: DateTime<Utc>,
    kept: Vec<TriagedRecord>,
    skipped: Vec<TriagedRecord>,
}

impl TriageRun {
    pub fn new(config: ClassificationConfig) -> Self {
        Self::starting_at(config, Utc::now())
    }

    /// Pin the run clock so every record in the batch ages against the same instant.
    pub fn starting_at(config: ClassificationConfig, now: DateTime<Utc>) -> Self {
        Self {
            engine: ClassificationEngine::new(config),
            seen: SeenKeys::new(),
            now,
            kept: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn process(&mut self, record: JobRecord) -> &Verdict {
        let verdict = self.engine.classify_at(&record, &mut self.seen, self.now);
        let bucket = if verdict.keep {
            &mut self.kept
        } else {
            debug!(
                title = %record.title,
                company = %record.company,
                reason = %verdict.reason,
                "skipping posting"
            );
            &mut self.skipped
        };

        bucket.push(TriagedRecord { record, verdict });
        let index = bucket.len() - 1;
        &bucket[index].verdict
    }

    pub fn process_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = JobRecord>,
    {
        for record in records {
            self.process(record);
        }
    }

    pub fn kept(&self) -> &[TriagedRecord] {
        &self.kept
    }

    pub fn skipped(&self) -> &[TriagedRecord] {
        &self.skipped
    }

    pub fn summary(&self) -> RunSummary {
        let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
        for triaged in &self.skipped {
            for reason in triaged.verdict.reason.split(REASON_SEPARATOR) {
                *reason_counts.entry(reason.to_string()).or_default() += 1;
            }
        }

        let advisory_count = self
            .kept
            .iter()
            .chain(&self.skipped)
            .filter(|triaged| !triaged.verdict.advisories.is_empty())
            .count();

        RunSummary {
            mode: self.engine.config().mode.label(),
            total: self.kept.len() + self.skipped.len(),
            kept: self.kept.len(),
            skipped: self.skipped.len(),
            with_advisories: advisory_count,
            reason_counts,
        }
    }

    /// Close the run, discarding the dedupe set.
    pub fn finish(self) -> RunOutput {
        let summary = self.summary();
        info!(
            mode = summary.mode,
            total = summary.total,
            kept = summary.kept,
            skipped = summary.skipped,
            "triage run finished"
        );

        RunOutput {
            summary,
            kept: self.kept,
            skipped: self.skipped,
        }
    }
}

/// Aggregate counts for a finished or in-flight run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub mode: &'static str,
    pub total: usize,
    pub kept: usize,
    pub skipped: usize,
    pub with_advisories: usize,
    pub reason_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub kept: Vec<TriagedRecord>,
    pub skipped: Vec<TriagedRecord>,
}
