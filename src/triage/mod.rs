//! Keep/skip classification for harvested job postings.
//!
//! Every record passes through the same seven gates in a fixed order. The engine never
//! short-circuits, so review mode can report every failing gate while strict mode reports the
//! first one. The only state is the run's dedupe set, owned by the caller.

pub mod config;
pub mod dedupe;
pub mod domain;
pub mod engine;
pub mod gates;
pub mod run;
pub mod signals;

#[cfg(test)]
mod tests;

pub use config::{AdvisoryPolicy, ClassificationConfig, ClassificationMode};
pub use dedupe::{SeenKeyStore, SeenKeys, SharedSeenKeys};
pub use domain::{JobRecord, LocationChips, RemoteRule, SalaryStatus, UsRule, Verdict};
pub use engine::ClassificationEngine;
pub use gates::{GateKind, GateOutcome};
pub use run::{RunOutput, RunSummary, TriageRun, TriagedRecord};
pub use signals::{extract_signals, LocationSignals};
