//! Runtime prop-type validation
//!
//! Validators are built with the constructor functions re-exported here
//! (`string()`, `array_of(number())`, `shape([...])`, ...) and grouped into a
//! [`PropTypeSpecs`] per component. A [`PropTypes`] handle carries the build
//! mode, the direct-access policy and the diagnostics sink, and is the only way
//! to run validators: [`PropTypes::check_prop_types`] for a whole spec, or
//! [`PropTypes::call_direct`] for a single validator outside the dispatcher.

mod check;
pub mod diagnostics;
pub mod dispatch;
pub mod schema;
pub mod validator;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::errors::{PropTypeError, PropTypesError};
use crate::domain::value::Props;
use crate::shared::config::{BuildMode, Config, DirectAccess};

pub use diagnostics::Diagnostics;
pub use dispatch::{PropTypeSpecs, TypeSpec};
pub use validator::{
    any, array, array_of, bool, custom_array_prop, custom_prop, element, exact, func,
    instance_of, node, number, object, object_of, one_of, one_of_type, shape, string, symbol,
    CustomArgs, CustomCheck, PropType, ShapeSpec, Validator,
};

use check::{check, Secret, Site};

/// Maximum number of direct-call deprecation warnings per handle
const MAX_DIRECT_CALL_WARNINGS: usize = 3;

/// Where a checked value comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Prop,
    Context,
    ChildContext,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Location::Prop => "prop",
            Location::Context => "context",
            Location::ChildContext => "child context",
        })
    }
}

#[derive(Debug, Default)]
struct DirectCalls {
    warned: HashSet<String>,
    count: usize,
}

#[derive(Debug)]
struct Inner {
    mode: BuildMode,
    direct_access: DirectAccess,
    diagnostics: Arc<Diagnostics>,
    direct_calls: Mutex<DirectCalls>,
}

/// Validator entry point: build mode, direct-access policy and diagnostics sink
#[derive(Clone, Debug)]
pub struct PropTypes {
    inner: Arc<Inner>,
}

impl PropTypes {
    pub fn new(mode: BuildMode, direct_access: DirectAccess, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            inner: Arc::new(Inner {
                mode,
                direct_access,
                diagnostics,
                direct_calls: Mutex::new(DirectCalls::default()),
            }),
        }
    }

    /// Handle configured from `config`, reporting to the process-wide sink
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.build_mode, config.direct_access, Diagnostics::global())
    }

    pub fn mode(&self) -> BuildMode {
        self.inner.mode
    }

    pub fn direct_access(&self) -> DirectAccess {
        self.inner.direct_access
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.inner.diagnostics
    }

    /// Run one validator without going through the dispatcher.
    ///
    /// In production this is a silent no-op. In development it is an invariant
    /// violation unless the handle was configured with [`DirectAccess::Warn`],
    /// in which case a deprecation warning is printed (once per
    /// `component:prop`, at most three times) and the validator runs.
    pub fn call_direct(
        &self,
        validator: &Validator,
        props: &Props,
        prop_name: &str,
        component_name: &str,
        location: Location,
        full_name: Option<&str>,
    ) -> Result<Option<PropTypeError>, PropTypesError> {
        if self.mode().is_production() {
            return Ok(None);
        }

        if self.direct_access() == DirectAccess::Throw {
            return Err(PropTypesError::DirectAccess);
        }

        let full_name = full_name.unwrap_or(prop_name);
        self.warn_direct_call(component_name, prop_name, full_name);

        let value = props.value(prop_name);
        let site = Site::root(component_name, location, prop_name).with_full_name(full_name);
        Ok(check(validator, &value, &site, &Secret::new()))
    }

    fn warn_direct_call(&self, component_name: &str, prop_name: &str, full_name: &str) {
        let key = format!("{}:{}", component_name, prop_name);
        {
            let mut calls = self.inner.direct_calls.lock();
            if calls.warned.contains(&key) || calls.count >= MAX_DIRECT_CALL_WARNINGS {
                return;
            }
            calls.warned.insert(key);
            calls.count += 1;
        }

        self.diagnostics().warn(&format!(
            "You are manually calling a prop-type validation function for the `{}` prop on `{}`. \
             This is deprecated; use `PropTypes::check_prop_types()` instead.",
            full_name, component_name
        ));
    }
}

impl Default for PropTypes {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
