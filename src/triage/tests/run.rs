use super::common::*;
use crate::triage::config::ClassificationMode;
use crate::triage::domain::SalaryStatus;
use crate::triage::gates;
use crate::triage::run::TriageRun;

#[test]
fn run_routes_records_into_kept_and_skipped() {
    let mut run = TriageRun::starting_at(config(ClassificationMode::Review), now());

    let mut near_min = eligible_record();
    near_min.job_url = "https://x/2".to_string();
    near_min.salary_status = SalaryStatus::NearMin;

    run.process_all([eligible_record(), eligible_record(), near_min]);

    assert_eq!(run.kept().len(), 1);
    assert_eq!(run.skipped().len(), 2);
    assert_eq!(run.skipped()[0].verdict.reason, gates::DUPLICATE_IN_RUN);

    let summary = run.summary();
    assert_eq!(summary.mode, "review");
    assert_eq!(summary.total, 3);
    assert_eq!(summary.with_advisories, 1);
    assert_eq!(summary.reason_counts.get(gates::DUPLICATE_IN_RUN), Some(&1));
    assert_eq!(summary.reason_counts.get(gates::SALARY_NEAR_MIN), Some(&1));
}

#[test]
fn each_run_starts_with_an_empty_dedupe_set() {
    for _ in 0..2 {
        let mut run = TriageRun::starting_at(config(ClassificationMode::Strict), now());
        let verdict = run.process(eligible_record());
        assert!(verdict.keep);
    }
}

#[test]
fn finish_hands_back_both_collections() {
    let mut run = TriageRun::starting_at(config(ClassificationMode::Strict), now());
    let mut skipped = eligible_record();
    skipped.title = "Account Executive".to_string();

    run.process_all([eligible_record(), skipped]);
    let output = run.finish();

    assert_eq!(output.kept.len(), 1);
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].verdict.reason, gates::NOT_TARGET_ROLE);
    assert_eq!(output.summary.skipped, 1);
}
