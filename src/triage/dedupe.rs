use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Check-and-insert access to the run's set of seen job keys.
pub trait SeenKeyStore {
    /// Record `key`, returning `true` only the first time it is offered.
    fn first_sighting(&mut self, key: &str) -> bool;
}

/// Job keys observed during one run. Dropped when the run ends.
#[derive(Debug, Clone, Default)]
pub struct SeenKeys {
    keys: HashSet<String>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SeenKeyStore for SeenKeys {
    fn first_sighting(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string())
    }
}

/// Cloneable handle for workers classifying one run in parallel.
///
/// The lookup and the insert happen under one lock so exactly one worker wins each key.
#[derive(Debug, Clone, Default)]
pub struct SharedSeenKeys {
    inner: Arc<Mutex<SeenKeys>>,
}

impl SharedSeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeenKeyStore for SharedSeenKeys {
    fn first_sighting(&mut self, key: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .first_sighting(key)
    }
}
