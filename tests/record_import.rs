use chrono::{TimeZone, Utc};
use jobsieve::intake::{RecordFormat, RecordImporter};
use jobsieve::triage::{
    ClassificationConfig, LocationChips, RemoteRule, SalaryStatus, TriageRun, UsRule,
};

#[test]
fn csv_fixture_maps_every_column() {
    let data = include_bytes!("fixtures/postings.csv");
    let records =
        RecordImporter::from_reader(&data[..], RecordFormat::Csv).expect("fixture imports");

    assert_eq!(records.len(), 7);

    let globex = &records[2];
    assert_eq!(globex.company, "Globex");
    assert_eq!(globex.us_rule, UsRule::Pass);
    assert_eq!(globex.applicant_regions, vec!["EU Only".to_string()]);
    assert_eq!(globex.remote_rule, RemoteRule::Remote);
    assert_eq!(
        globex.location_chips,
        LocationChips::Joined("Lisbon, Portugal".to_string())
    );
    assert_eq!(globex.posting_date, "2025/10/05");

    let vandelay = &records[5];
    assert_eq!(vandelay.salary_status, SalaryStatus::BelowFloor);
    assert_eq!(vandelay.valid_through, "2025-09-30");
    assert!(records[6].title.is_empty());
}

#[test]
fn json_records_default_missing_fields() {
    let json = br#"[{"title": "Product Owner", "company": "Acme", "jobURL": "https://x/1",
        "usRule": "FAIL", "remoteRule": "on-site"}]"#;

    let records =
        RecordImporter::from_reader(&json[..], RecordFormat::Json).expect("json imports");

    let record = &records[0];
    assert_eq!(record.us_rule, UsRule::Fail);
    assert_eq!(record.remote_rule, RemoteRule::Unknown);
    assert_eq!(record.salary_status, SalaryStatus::Unknown);
    assert!(record.applicant_regions.is_empty());
    assert!(record.location_chips.tokens().is_empty());
}

#[test]
fn json_nulls_are_treated_as_missing_and_still_classify() {
    let json = br#"[{"title": "Senior Product Manager", "company": "Acme",
        "jobURL": "https://x/1", "jobKey": null, "usRule": null, "applicantRegions": null,
        "remoteRule": "remote", "locationChips": null, "titleText": null,
        "salaryStatus": null, "postingDate": null, "validThrough": null}]"#;

    let records = RecordImporter::from_reader(&json[..], RecordFormat::Json)
        .expect("nulls import");

    let record = &records[0];
    assert_eq!(record.us_rule, UsRule::Unknown);
    assert_eq!(record.salary_status, SalaryStatus::Unknown);
    assert!(record.applicant_regions.is_empty());
    assert!(record.location_chips.tokens().is_empty());
    assert!(record.posting_date.is_empty());
    assert!(record.valid_through.is_empty());

    let clock = Utc
        .with_ymd_and_hms(2025, 10, 15, 16, 30, 0)
        .single()
        .expect("valid clock");
    let mut run = TriageRun::starting_at(ClassificationConfig::default(), clock);
    let verdict = run.process(record.clone());
    assert!(verdict.keep, "unexpected reason: {}", verdict.reason);
}

#[test]
fn short_csv_rows_default_missing_cells() {
    let csv = "title,company,jobURL\nProduct Owner,Acme\n";
    let records = RecordImporter::from_reader(csv.as_bytes(), RecordFormat::Csv)
        .expect("flexible rows import");

    assert_eq!(records[0].company, "Acme");
    assert!(records[0].job_url.is_empty());
}
