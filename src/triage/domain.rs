use serde::{Deserialize, Deserializer, Serialize};

/// Harvested posting as handed over by a source scraper.
///
/// Every field is optional on the wire. Absent or `null` values deserialize to an empty
/// string, an empty list, or `Unknown`, so the gates only ever test for blankness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(
        rename = "jobURL",
        alias = "jobUrl",
        deserialize_with = "null_as_default"
    )]
    pub job_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub us_rule: UsRule,
    #[serde(deserialize_with = "null_as_default")]
    pub applicant_regions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub remote_rule: RemoteRule,
    #[serde(deserialize_with = "null_as_default")]
    pub location_chips: LocationChips,
    #[serde(deserialize_with = "null_as_default")]
    pub title_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description_snippet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub salary_status: SalaryStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub posting_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub valid_through: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl JobRecord {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        job_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            job_url: job_url.into(),
            ..Self::default()
        }
    }
}

/// Source-side verdict on whether US applicants are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UsRule {
    Pass,
    Fail,
    #[default]
    Unknown,
}

impl UsRule {
    pub fn label(&self) -> &'static str {
        match self {
            UsRule::Pass => "pass",
            UsRule::Fail => "fail",
            UsRule::Unknown => "unknown",
        }
    }
}

impl From<&str> for UsRule {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for UsRule {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<UsRule> for String {
    fn from(value: UsRule) -> Self {
        value.label().to_string()
    }
}

/// Work arrangement advertised by the posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemoteRule {
    Onsite,
    Remote,
    Hybrid,
    #[default]
    Unknown,
}

impl RemoteRule {
    pub fn label(&self) -> &'static str {
        match self {
            RemoteRule::Onsite => "onsite",
            RemoteRule::Remote => "remote",
            RemoteRule::Hybrid => "hybrid",
            RemoteRule::Unknown => "unknown",
        }
    }
}

impl From<&str> for RemoteRule {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "onsite" => Self::Onsite,
            "remote" => Self::Remote,
            "hybrid" => Self::Hybrid,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for RemoteRule {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RemoteRule> for String {
    fn from(value: RemoteRule) -> Self {
        value.label().to_string()
    }
}

/// Compensation tier assigned upstream from the advertised pay range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SalaryStatus {
    BelowFloor,
    NearMin,
    Missing,
    SignalOnly,
    AtOrAbove,
    #[default]
    Unknown,
}

impl SalaryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SalaryStatus::BelowFloor => "below_floor",
            SalaryStatus::NearMin => "near_min",
            SalaryStatus::Missing => "missing",
            SalaryStatus::SignalOnly => "signal_only",
            SalaryStatus::AtOrAbove => "at_or_above",
            SalaryStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for SalaryStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "below_floor" => Self::BelowFloor,
            "near_min" => Self::NearMin,
            "missing" => Self::Missing,
            "signal_only" => Self::SignalOnly,
            "at_or_above" => Self::AtOrAbove,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for SalaryStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SalaryStatus> for String {
    fn from(value: SalaryStatus) -> Self {
        value.label().to_string()
    }
}

/// Location chips exactly as scraped: either a list of tokens or one comma-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationChips {
    List(Vec<String>),
    Joined(String),
}

impl Default for LocationChips {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl LocationChips {
    /// Trimmed, lowercased, non-empty tokens in their original order.
    pub fn tokens(&self) -> Vec<String> {
        let normalize = |raw: &str| raw.trim().to_lowercase();
        let tokens: Vec<String> = match self {
            LocationChips::List(items) => items.iter().map(|item| normalize(item)).collect(),
            LocationChips::Joined(joined) => joined.split(',').map(normalize).collect(),
        };
        tokens.into_iter().filter(|token| !token.is_empty()).collect()
    }
}

impl From<Vec<&str>> for LocationChips {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&str> for LocationChips {
    fn from(value: &str) -> Self {
        Self::Joined(value.to_string())
    }
}

/// Final keep/skip decision for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub keep: bool,
    pub reason: String,
    /// Informational messages from gates that passed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}

impl Verdict {
    pub fn keep() -> Self {
        Self {
            keep: true,
            reason: String::new(),
            advisories: Vec::new(),
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            keep: false,
            reason: reason.into(),
            advisories: Vec::new(),
        }
    }

    pub fn with_advisories(mut self, advisories: Vec<String>) -> Self {
        self.advisories = advisories;
        self
    }

    pub fn label(&self) -> &'static str {
        if self.keep {
            "keep"
        } else {
            "skip"
        }
    }
}
