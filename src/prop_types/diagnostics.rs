//! Diagnostics sink
//!
//! Remembers which failure messages were already reported so each distinct
//! failure is logged once. The set only grows; [`Diagnostics::reset`] exists
//! for tests and hot-reload style tooling.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::log::PROP_TYPES_TARGET;

#[derive(Debug, Default)]
struct DiagnosticsState {
    /// Message -> time it was first reported
    warned: HashMap<String, DateTime<Utc>>,
    /// Every warning printed, in order
    emitted: Vec<String>,
}

/// Log-once diagnostics sink shared by validator dispatchers
#[derive(Debug, Default)]
pub struct Diagnostics {
    state: Mutex<DiagnosticsState>,
}

static GLOBAL: OnceLock<Arc<Diagnostics>> = OnceLock::new();

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide sink used when no other sink is injected
    pub fn global() -> Arc<Diagnostics> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Diagnostics::new())))
    }

    /// Mark a failure message as reported. Returns true the first time only.
    pub fn first_time(&self, message: &str) -> bool {
        let mut state = self.state.lock();
        if state.warned.contains_key(message) {
            return false;
        }
        state.warned.insert(message.to_string(), Utc::now());
        true
    }

    /// Print a warning
    pub fn warn(&self, text: &str) {
        let message = format!("Warning: {}", text);
        tracing::warn!(target: PROP_TYPES_TARGET, "{}", message);
        self.state.lock().emitted.push(message);
    }

    /// Warnings printed so far
    pub fn emitted(&self) -> Vec<String> {
        self.state.lock().emitted.clone()
    }

    /// Number of distinct failure messages reported
    pub fn seen_count(&self) -> usize {
        self.state.lock().warned.len()
    }

    pub fn first_seen(&self, message: &str) -> Option<DateTime<Utc>> {
        self.state.lock().warned.get(message).copied()
    }

    /// Forget everything reported so far
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.warned.clear();
        state.emitted.clear();
    }
}
