use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::triage::config::{AdvisoryPolicy, ClassificationConfig, ClassificationMode};
use crate::triage::dedupe::SeenKeys;
use crate::triage::domain::{JobRecord, LocationChips, RemoteRule, SalaryStatus, UsRule, Verdict};
use crate::triage::engine::ClassificationEngine;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 16, 30, 0)
        .single()
        .expect("valid clock")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn days_ago(days: i64) -> String {
    (today() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Record that clears every gate under the default configuration.
pub(super) fn eligible_record() -> JobRecord {
    JobRecord {
        title: "Senior Product Manager".to_string(),
        company: "Acme".to_string(),
        job_url: "https://x/1".to_string(),
        us_rule: UsRule::Pass,
        remote_rule: RemoteRule::Remote,
        location_chips: LocationChips::from(vec!["US"]),
        salary_status: SalaryStatus::AtOrAbove,
        posting_date: today().format("%Y-%m-%d").to_string(),
        ..JobRecord::default()
    }
}

pub(super) fn config(mode: ClassificationMode) -> ClassificationConfig {
    ClassificationConfig::default().with_mode(mode)
}

pub(super) fn engine(mode: ClassificationMode) -> ClassificationEngine {
    ClassificationEngine::new(config(mode))
}

pub(super) fn separate_engine(mode: ClassificationMode) -> ClassificationEngine {
    ClassificationEngine::new(config(mode).with_advisory_policy(AdvisoryPolicy::Separate))
}

pub(super) fn classify_fresh(engine: &ClassificationEngine, record: &JobRecord) -> Verdict {
    let mut seen = SeenKeys::new();
    engine.classify_at(record, &mut seen, now())
}
