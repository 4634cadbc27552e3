use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_MAX_POST_AGE_DAYS: i64 = 90;

/// How the engine turns the collected reasons into a single reason string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    /// Surface every reason, joined with `" | "`.
    #[default]
    Review,
    /// Surface the first reason only.
    Strict,
}

impl ClassificationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "review" => Some(Self::Review),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassificationMode::Review => "review",
            ClassificationMode::Strict => "strict",
        }
    }
}

/// Treatment of informational reasons emitted by gates that passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryPolicy {
    /// Advisories share the reason list with failures and therefore skip the record.
    #[default]
    Mixed,
    /// Only failures decide keep/skip and build the reason; advisories are reported apart.
    Separate,
}

impl AdvisoryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mixed" => Some(Self::Mixed),
            "separate" => Some(Self::Separate),
            _ => None,
        }
    }
}

/// Run-wide classification settings. Built once, never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationConfig {
    pub mode: ClassificationMode,
    pub advisory_policy: AdvisoryPolicy,
    pub allow_missing_salary: bool,
    pub allow_near_min_salary: bool,
    pub strict_age_policy: bool,
    pub max_post_age_days: i64,
    pub allowed_cities: BTreeSet<String>,
    pub allowed_states: BTreeSet<String>,
    pub allowed_countries: BTreeSet<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            mode: ClassificationMode::Review,
            advisory_policy: AdvisoryPolicy::Mixed,
            allow_missing_salary: true,
            allow_near_min_salary: true,
            strict_age_policy: false,
            max_post_age_days: DEFAULT_MAX_POST_AGE_DAYS,
            allowed_cities: token_set(["seattle"]),
            allowed_states: token_set(["wa", "washington"]),
            allowed_countries: token_set(["us", "ca"]),
        }
    }
}

impl ClassificationConfig {
    pub fn with_mode(mut self, mode: ClassificationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_advisory_policy(mut self, policy: AdvisoryPolicy) -> Self {
        self.advisory_policy = policy;
        self
    }

    /// Lowercase and trim every allowed-location entry, dropping blanks.
    pub fn normalized(mut self) -> Self {
        self.allowed_cities = token_set(self.allowed_cities.iter().map(String::as_str));
        self.allowed_states = token_set(self.allowed_states.iter().map(String::as_str));
        self.allowed_countries = token_set(self.allowed_countries.iter().map(String::as_str));
        self
    }
}

pub fn token_set<'a, I>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_home_market() {
        let config = ClassificationConfig::default();
        assert_eq!(config.mode, ClassificationMode::Review);
        assert_eq!(config.max_post_age_days, 90);
        assert!(config.allowed_cities.contains("seattle"));
        assert!(config.allowed_states.contains("washington"));
        assert_eq!(config.allowed_countries, token_set(["us", "ca"]));
    }

    #[test]
    fn normalized_lowercases_allowed_sets() {
        let mut config = ClassificationConfig::default();
        config.allowed_cities = ["  Atlanta ", "", "SEATTLE"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let config = config.normalized();

        assert_eq!(config.allowed_cities, token_set(["atlanta", "seattle"]));
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!(
            ClassificationMode::parse(" Strict "),
            Some(ClassificationMode::Strict)
        );
        assert_eq!(ClassificationMode::parse("loose"), None);
        assert_eq!(
            AdvisoryPolicy::parse("SEPARATE"),
            Some(AdvisoryPolicy::Separate)
        );
    }
}
