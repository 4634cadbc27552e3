use chrono::{DateTime, TimeZone, Utc};
use jobsieve::intake::{RecordFormat, RecordImporter};
use jobsieve::triage::{
    AdvisoryPolicy, ClassificationConfig, ClassificationEngine, ClassificationMode, JobRecord,
    SeenKeys, TriageRun,
};

fn run_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 16, 30, 0)
        .single()
        .expect("valid clock")
}

fn fixture_records() -> Vec<JobRecord> {
    let data = include_bytes!("fixtures/postings.csv");
    RecordImporter::from_reader(&data[..], RecordFormat::Csv).expect("fixture imports")
}

fn reasons(config: ClassificationConfig) -> Vec<(bool, String)> {
    let mut run = TriageRun::starting_at(config, run_clock());
    fixture_records()
        .into_iter()
        .map(|record| {
            let verdict = run.process(record);
            (verdict.keep, verdict.reason.clone())
        })
        .collect()
}

#[test]
fn review_mode_reports_every_reason_for_the_fixture() {
    let verdicts = reasons(ClassificationConfig::default());

    let expected = vec![
        (true, ""),
        (false, "Salary near minimum threshold"),
        (
            false,
            "Not eligible for US/Canada applicants | Location or remote rules not met",
        ),
        (false, "Not a target role | Salary missing; manual review"),
        (false, "Duplicate in current run"),
        (false, "Salary below floor | Posting expired; manual review"),
        (false, "Missing core fields (Title, Company, Job URL)"),
    ];
    let expected: Vec<(bool, String)> = expected
        .into_iter()
        .map(|(keep, reason)| (keep, reason.to_string()))
        .collect();
    assert_eq!(verdicts, expected);
}

#[test]
fn strict_mode_keeps_only_the_first_reason() {
    let review = reasons(ClassificationConfig::default());
    let strict = reasons(ClassificationConfig::default().with_mode(ClassificationMode::Strict));

    for ((review_keep, review_reason), (strict_keep, strict_reason)) in review.iter().zip(&strict)
    {
        assert_eq!(review_keep, strict_keep);
        assert_eq!(
            strict_reason,
            review_reason.split(" | ").next().unwrap_or_default()
        );
    }
    assert_eq!(strict[3].1, "Not a target role");
}

#[test]
fn separate_advisories_keep_borderline_postings() {
    let config = ClassificationConfig::default().with_advisory_policy(AdvisoryPolicy::Separate);
    let mut run = TriageRun::starting_at(config, run_clock());
    run.process_all(fixture_records());

    let kept: Vec<&str> = run
        .kept()
        .iter()
        .map(|triaged| triaged.record.company.as_str())
        .collect();
    assert_eq!(kept, vec!["Acme", "Initech"]);
    assert_eq!(
        run.kept()[1].verdict.advisories,
        vec!["Salary near minimum threshold".to_string()]
    );

    let summary = run.summary();
    assert_eq!(summary.total, 7);
    assert_eq!(summary.skipped, 5);
    assert_eq!(summary.reason_counts.get("Salary below floor"), Some(&1));
}

#[test]
fn engine_is_usable_without_a_run() {
    let engine = ClassificationEngine::new(ClassificationConfig::default());
    let mut seen = SeenKeys::new();
    let record = fixture_records().remove(0);

    let first = engine.classify_at(&record, &mut seen, run_clock());
    let second = engine.classify_at(&record, &mut seen, run_clock());

    assert!(first.keep);
    assert_eq!(second.reason, "Duplicate in current run");
    assert_eq!(seen.len(), 1);
}

#[test]
fn all_empty_record_is_classified_without_panicking() {
    let engine = ClassificationEngine::new(
        ClassificationConfig::default().with_mode(ClassificationMode::Strict),
    );
    let verdict = engine.classify(&JobRecord::default(), &mut SeenKeys::new());

    assert!(!verdict.keep);
    assert_eq!(verdict.reason, "Missing core fields (Title, Company, Job URL)");
}
