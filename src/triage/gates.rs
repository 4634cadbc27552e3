use super::config::ClassificationConfig;
use super::dedupe::SeenKeyStore;
use super::domain::{JobRecord, RemoteRule, SalaryStatus, UsRule};
use super::signals::{extract_signals, LocationSignals};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

pub const MISSING_CORE_FIELDS: &str = "Missing core fields (Title, Company, Job URL)";
pub const MISSING_JOB_KEY: &str = "Missing job key";
pub const DUPLICATE_IN_RUN: &str = "Duplicate in current run";
pub const REGION_INELIGIBLE: &str = "Not eligible for US/Canada applicants";
pub const LOCATION_RULES_NOT_MET: &str = "Location or remote rules not met";
pub const NOT_TARGET_ROLE: &str = "Not a target role";
pub const SALARY_BELOW_FLOOR: &str = "Salary below floor";
pub const SALARY_NEAR_MIN: &str = "Salary near minimum threshold";
pub const SALARY_MISSING_REVIEW: &str = "Salary missing; manual review";
pub const SALARY_MISSING: &str = "Salary missing";
pub const POSTING_EXPIRED: &str = "Posting expired";
pub const POSTING_EXPIRED_REVIEW: &str = "Posting expired; manual review";
pub const POSTING_TOO_OLD: &str = "Posting too old";
pub const POSTING_OLDER_THAN_PREFERRED: &str = "Posting older than preferred range";

const EXCLUDED_REGIONS: &[&str] = &["eu only", "europe only", "uk only", "apac only"];

const EXCLUDED_ROLE_KEYWORDS: &[&str] = &[
    "sales development",
    "account executive",
    "sdr",
    "marketing manager",
    "data engineer",
    "devops",
    "systems administrator",
];

const TARGET_ROLE_KEYWORDS: &[&str] = &[
    "product manager",
    "product owner",
    "product management",
    "business analyst",
    "business systems analyst",
];

/// Accepted date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Eligibility gates in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GateKind {
    CoreFields,
    Dedupe,
    Region,
    Location,
    Role,
    Salary,
    Staleness,
}

impl GateKind {
    pub const ORDER: [GateKind; 7] = [
        GateKind::CoreFields,
        GateKind::Dedupe,
        GateKind::Region,
        GateKind::Location,
        GateKind::Role,
        GateKind::Salary,
        GateKind::Staleness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GateKind::CoreFields => "core_fields",
            GateKind::Dedupe => "dedupe",
            GateKind::Region => "region",
            GateKind::Location => "location",
            GateKind::Role => "role",
            GateKind::Salary => "salary",
            GateKind::Staleness => "staleness",
        }
    }
}

/// Result of one gate. A passing gate may still carry an informational reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    pub gate: GateKind,
    pub passed: bool,
    pub reason: Option<&'static str>,
}

impl GateOutcome {
    fn pass(gate: GateKind) -> Self {
        Self {
            gate,
            passed: true,
            reason: None,
        }
    }

    fn advise(gate: GateKind, reason: &'static str) -> Self {
        Self {
            gate,
            passed: true,
            reason: Some(reason),
        }
    }

    fn fail(gate: GateKind, reason: &'static str) -> Self {
        Self {
            gate,
            passed: false,
            reason: Some(reason),
        }
    }

    fn check(gate: GateKind, passed: bool, reason: &'static str) -> Self {
        if passed {
            Self::pass(gate)
        } else {
            Self::fail(gate, reason)
        }
    }

    /// Informational reason carried by a passing gate.
    pub fn advisory(&self) -> Option<&'static str> {
        if self.passed {
            self.reason.filter(|reason| !reason.is_empty())
        } else {
            None
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn intersects(left: &BTreeSet<String>, right: &BTreeSet<String>) -> bool {
    left.iter().any(|value| right.contains(value))
}

pub fn core_fields_gate(record: &JobRecord) -> GateOutcome {
    let complete =
        !is_blank(&record.title) && !is_blank(&record.company) && !is_blank(&record.job_url);
    GateOutcome::check(GateKind::CoreFields, complete, MISSING_CORE_FIELDS)
}

/// Explicit key when present, otherwise `company|title|url` lowercased.
pub fn job_key(record: &JobRecord) -> String {
    let explicit = record.job_key.trim();
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    [&record.company, &record.title, &record.job_url]
        .map(|part| part.trim().to_lowercase())
        .join("|")
}

pub fn dedupe_gate<S>(record: &JobRecord, seen: &mut S) -> GateOutcome
where
    S: SeenKeyStore + ?Sized,
{
    let key = job_key(record);
    if key.is_empty() {
        return GateOutcome::fail(GateKind::Dedupe, MISSING_JOB_KEY);
    }

    GateOutcome::check(GateKind::Dedupe, seen.first_sighting(&key), DUPLICATE_IN_RUN)
}

pub fn region_gate(record: &JobRecord) -> GateOutcome {
    let excluded = record.applicant_regions.iter().any(|region| {
        let region = region.trim().to_lowercase();
        EXCLUDED_REGIONS.contains(&region.as_str())
    });

    let eligible = !excluded && record.us_rule != UsRule::Fail;
    GateOutcome::check(GateKind::Region, eligible, REGION_INELIGIBLE)
}

pub fn location_gate(record: &JobRecord, config: &ClassificationConfig) -> GateOutcome {
    let signals = extract_signals(&record.location_chips, config);
    let passed = location_allows(record.remote_rule, &signals, config);
    GateOutcome::check(GateKind::Location, passed, LOCATION_RULES_NOT_MET)
}

fn location_allows(
    rule: RemoteRule,
    signals: &LocationSignals,
    config: &ClassificationConfig,
) -> bool {
    let city_allowed = intersects(&signals.cities, &config.allowed_cities);
    let state_allowed = intersects(&signals.states, &config.allowed_states);
    let countries_allowed = !signals.countries.is_empty()
        && signals
            .countries
            .iter()
            .all(|country| config.allowed_countries.contains(country));
    let foreign_country = signals
        .countries
        .iter()
        .any(|country| !config.allowed_countries.contains(country));
    let no_cities = signals.cities.is_empty();

    match rule {
        RemoteRule::Onsite => city_allowed || (state_allowed && no_cities),
        RemoteRule::Remote | RemoteRule::Hybrid => {
            if state_allowed || countries_allowed {
                true
            } else if foreign_country {
                city_allowed || no_cities
            } else {
                true
            }
        }
        // No state check here; only a foreign country plus unlisted cities disqualifies.
        RemoteRule::Unknown => {
            if countries_allowed {
                true
            } else {
                !(foreign_country && !no_cities && !city_allowed)
            }
        }
    }
}

pub fn role_gate(record: &JobRecord) -> GateOutcome {
    let blob = [
        record.title.as_str(),
        record.title_text.as_str(),
        record.description_snippet.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    if EXCLUDED_ROLE_KEYWORDS
        .iter()
        .any(|keyword| blob.contains(keyword))
    {
        return GateOutcome::fail(GateKind::Role, NOT_TARGET_ROLE);
    }

    let targeted = TARGET_ROLE_KEYWORDS
        .iter()
        .any(|keyword| blob.contains(keyword));
    GateOutcome::check(GateKind::Role, targeted, NOT_TARGET_ROLE)
}

pub fn salary_gate(record: &JobRecord, config: &ClassificationConfig) -> GateOutcome {
    match record.salary_status {
        SalaryStatus::BelowFloor => GateOutcome::fail(GateKind::Salary, SALARY_BELOW_FLOOR),
        SalaryStatus::NearMin => GateOutcome {
            gate: GateKind::Salary,
            passed: config.allow_near_min_salary,
            reason: Some(SALARY_NEAR_MIN),
        },
        SalaryStatus::Missing | SalaryStatus::SignalOnly => {
            if config.allow_missing_salary {
                GateOutcome::advise(GateKind::Salary, SALARY_MISSING_REVIEW)
            } else {
                GateOutcome::fail(GateKind::Salary, SALARY_MISSING)
            }
        }
        SalaryStatus::AtOrAbove | SalaryStatus::Unknown => GateOutcome::pass(GateKind::Salary),
    }
}

pub fn staleness_gate(
    record: &JobRecord,
    config: &ClassificationConfig,
    now: DateTime<Utc>,
) -> GateOutcome {
    if let Some(valid_through) = parse_posting_date(&record.valid_through) {
        if start_of_day(valid_through) < now {
            return if config.strict_age_policy {
                GateOutcome::fail(GateKind::Staleness, POSTING_EXPIRED)
            } else {
                GateOutcome::advise(GateKind::Staleness, POSTING_EXPIRED_REVIEW)
            };
        }
    }

    if let Some(posted) = parse_posting_date(&record.posting_date) {
        let age_days = (now - start_of_day(posted)).num_days();
        if age_days > config.max_post_age_days {
            return if config.strict_age_policy {
                GateOutcome::fail(GateKind::Staleness, POSTING_TOO_OLD)
            } else {
                GateOutcome::advise(GateKind::Staleness, POSTING_OLDER_THAN_PREFERRED)
            };
        }
    }

    GateOutcome::pass(GateKind::Staleness)
}

/// Parse a scraped date with the first matching layout; anything else is treated as absent.
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
