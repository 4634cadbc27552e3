use super::config::ClassificationConfig;
use super::domain::LocationChips;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use tracing::trace;

/// Structured location facts recovered from a record's chips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSignals {
    pub countries: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl LocationSignals {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.states.is_empty() && self.cities.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Country(&'static str),
    State(&'static str),
    City(&'static str),
}

static TOKEN_MAP: OnceLock<HashMap<&'static str, Signal>> = OnceLock::new();

fn token_map() -> &'static HashMap<&'static str, Signal> {
    TOKEN_MAP.get_or_init(|| {
        const TOKEN_TO_SIGNAL: &[(&str, Signal)] = &[
            // Countries
            ("us", Signal::Country("us")),
            ("united states", Signal::Country("us")),
            ("usa", Signal::Country("us")),
            ("canada", Signal::Country("ca")),
            ("ca", Signal::Country("ca")),
            ("portugal", Signal::Country("pt")),
            ("pt", Signal::Country("pt")),
            // States
            ("wa", Signal::State("wa")),
            ("washington", Signal::State("wa")),
            // Cities
            ("atlanta", Signal::City("atlanta")),
            ("seattle", Signal::City("seattle")),
            ("lisboa", Signal::City("lisboa")),
            ("lisbon", Signal::City("lisbon")),
            ("vancouver", Signal::City("vancouver")),
        ];

        TOKEN_TO_SIGNAL.iter().copied().collect()
    })
}

/// Sort location chips into country, state and city sets.
///
/// Tokens with no known mapping are dropped. The config is accepted so callers can hand the
/// run settings straight through; the mapping itself is fixed.
pub fn extract_signals(chips: &LocationChips, _config: &ClassificationConfig) -> LocationSignals {
    let mut signals = LocationSignals::default();

    for token in chips.tokens() {
        match token_map().get(token.as_str()) {
            Some(Signal::Country(code)) => {
                signals.countries.insert((*code).to_string());
            }
            Some(Signal::State(code)) => {
                signals.states.insert((*code).to_string());
            }
            Some(Signal::City(name)) => {
                signals.cities.insert((*name).to_string());
            }
            None => {}
        }
    }

    trace!(
        countries = ?signals.countries,
        states = ?signals.states,
        cities = ?signals.cities,
        "resolved location signals"
    );

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(chips: LocationChips) -> LocationSignals {
        extract_signals(&chips, &ClassificationConfig::default())
    }

    #[test]
    fn joined_string_is_split_on_commas() {
        let signals = extract(LocationChips::from(" Seattle, WA ,United States"));

        assert!(signals.cities.contains("seattle"));
        assert!(signals.states.contains("wa"));
        assert!(signals.countries.contains("us"));
    }

    #[test]
    fn list_elements_are_not_split() {
        let signals = extract(LocationChips::from(vec!["Seattle, WA"]));
        assert!(signals.is_empty());
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let signals = extract(LocationChips::from(vec!["Remote", "Berlin", "  "]));
        assert!(signals.is_empty());
    }
}
