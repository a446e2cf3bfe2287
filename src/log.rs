//! Logging setup
//!
//! Diagnostics are emitted through `tracing`. Call [`init`] once at startup to
//! install a formatting subscriber; without it, events go to whatever
//! subscriber the embedding application installed.

use std::fs::OpenOptions;
use std::sync::{Mutex, Once};

use tracing_subscriber::EnvFilter;

use crate::shared::config::LogConfig;

static INIT: Once = Once::new();

/// Target used for validator diagnostics
pub const PROP_TYPES_TARGET: &str = "ameliorate::prop_types";

/// Target used for lifecycle tracing in the component bridge
pub const COMPONENT_TARGET: &str = "ameliorate::component";

/// Build the filter directive string for a configuration
pub fn filter_directives(config: &LogConfig) -> String {
    format!("warn,ameliorate={}", config.level)
}

/// Initialize the global subscriber. Subsequent calls are no-ops.
pub fn init(config: &LogConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.include_target);

        let file = config.file.as_ref().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .ok()
        });

        // Ignore the error if the host already installed a subscriber
        let _ = match file {
            Some(file) => builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init(),
            None => builder.with_ansi(config.ansi).try_init(),
        };
    });

    tracing::debug!(target: COMPONENT_TARGET, "=== ameliorate logging started ===");
}
