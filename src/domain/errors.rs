//! Error types
//!
//! Validation failures are plain values ([`PropTypeError`]); everything else
//! that can go wrong in the bridge or the validator engine is an enum here.

use thiserror::Error;

use crate::prop_types::Location;

/// A failed prop-type check. Carries only the human readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PropTypeError {
    message: String,
}

impl PropTypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by the component bridge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The definition has no constructor (abstract or unregistered)
    #[error("TypeError: `{0}` expected a constructible component definition but didn't receive one")]
    NotConstructible(String),

    /// No method with this name is declared by the component logic
    #[error("Method `{method}` not found on `{component}`")]
    UnknownMethod { component: String, method: String },

    /// The method exists but is excluded from proxying onto the wrapper
    #[error("Method `{method}` is not proxied onto `{component}`")]
    MethodNotProxied { component: String, method: String },

    /// Re-entrant call while the instance is already borrowed
    #[error("`{0}` is busy; re-entrant calls are not supported")]
    Busy(String),

    /// Lifecycle call made out of host order
    #[error("Invalid lifecycle transition on `{component}`: {message}")]
    Lifecycle { component: String, message: String },
}

/// Errors raised by the validator engine itself (not validation failures)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropTypesError {
    /// A validator was invoked without the dispatcher's secret token
    #[error(
        "Invariant Violation: Calling prop-type validators directly is not supported. \
         Use `PropTypes::check_prop_types()` to call them."
    )]
    DirectAccess,

    /// A spec entry is not a validator
    #[error("{component}: {location} type `{name}` is invalid; it must be a validator, but received `{received}`.")]
    InvalidTypeSpec {
        component: String,
        location: Location,
        name: String,
        received: String,
    },

    /// A custom validator panicked
    #[error("{component}: {location} type `{name}` failed unexpectedly: {message}")]
    ValidatorPanicked {
        component: String,
        location: Location,
        name: String,
        message: String,
    },

    /// A declarative spec document could not be read
    #[error("Invalid prop-type document: {0}")]
    Schema(String),
}

impl From<serde_json::Error> for PropTypesError {
    fn from(err: serde_json::Error) -> Self {
        PropTypesError::Schema(err.to_string())
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
