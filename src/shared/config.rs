//! Runtime Configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

/// Environment variable overriding the build mode (`production` / `development`)
pub const MODE_ENV_VAR: &str = "AMELIORATE_ENV";

/// Configuration file name searched for by [`Config::find_config_path`]
pub const CONFIG_FILE_NAME: &str = "ameliorate.toml";

// ============================================================================
// BUILD MODE
// ============================================================================

/// Whether development-time safety nets (prop-type validation) run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl Default for BuildMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

impl BuildMode {
    pub fn is_development(&self) -> bool {
        matches!(self, BuildMode::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, BuildMode::Production)
    }

    /// Parse a mode name as found in the environment
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(BuildMode::Production),
            "development" | "dev" | "test" => Ok(BuildMode::Development),
            other => Err(ConfigError::InvalidValue {
                key: MODE_ENV_VAR.to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// Mode from `AMELIORATE_ENV`, falling back to the compile-time default
    pub fn from_env() -> Self {
        match std::env::var(MODE_ENV_VAR) {
            Ok(value) => Self::parse(&value).unwrap_or_else(|e| {
                tracing::warn!("{}; using default build mode", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

/// What happens when a validator is called without the dispatcher's token
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectAccess {
    /// Fail with an invariant violation
    #[default]
    Throw,
    /// Print a deprecation warning (rate limited) and validate anyway
    Warn,
}

// ============================================================================
// LOGGING CONFIGURATION
// ============================================================================

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level filter (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Optional log file; stderr when absent
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Whether to use ANSI colors (ignored for file output)
    #[serde(default = "default_true")]
    pub ansi: bool,

    /// Whether to include the event target
    #[serde(default)]
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            ansi: true,
            include_target: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// APPLICATION CONFIGURATION
// ============================================================================

/// Runtime configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Build mode; validation is skipped entirely in production
    #[serde(default)]
    pub build_mode: BuildMode,

    /// Policy for validators invoked outside the dispatcher
    #[serde(default)]
    pub direct_access: DirectAccess,

    /// Logging section
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::from_env(),
            direct_access: DirectAccess::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Find ameliorate.toml in standard locations
    pub fn find_config_path() -> Option<PathBuf> {
        // Check in order: config dir, cwd
        let candidates = [
            dirs::config_dir().map(|p| p.join("ameliorate").join(CONFIG_FILE_NAME)),
            Some(PathBuf::from(CONFIG_FILE_NAME)),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Load configuration from the standard locations, returning defaults if not found
    pub fn load() -> Self {
        match Self::find_config_path() {
            Some(path) => Self::load_from_path(&path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load {:?}: {}", path, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific path.
    /// `AMELIORATE_ENV` still wins over the file's build mode.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        Ok(config.with_mode_override(std::env::var(MODE_ENV_VAR).ok().as_deref()))
    }

    /// Apply an `AMELIORATE_ENV` value over the configured build mode.
    /// An unparsable value is logged and the configured mode kept.
    pub fn with_mode_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match BuildMode::parse(value) {
                Ok(mode) => self.build_mode = mode,
                Err(e) => tracing::warn!("{}; keeping configured build mode", e),
            }
        }
        self
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_build_mode(mut self, mode: BuildMode) -> Self {
        self.build_mode = mode;
        self
    }

    pub fn with_direct_access(mut self, policy: DirectAccess) -> Self {
        self.direct_access = policy;
        self
    }
}
