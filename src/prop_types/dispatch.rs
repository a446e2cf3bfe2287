//! Property specs and the `check_prop_types` dispatcher

use std::cell::Cell;
use std::panic::{self, catch_unwind, AssertUnwindSafe};
use std::sync::Once;

use indexmap::IndexMap;

use crate::domain::errors::{PropTypeError, PropTypesError};
use crate::domain::value::Props;

use super::check::{check, Secret, Site};
use super::validator::Validator;
use super::{Location, PropTypes};

/// One entry of a property spec
#[derive(Clone, Debug)]
pub enum TypeSpec {
    Validator(Validator),
    /// Something that is not a validator (typically from a declarative document);
    /// `received` is its runtime type name
    Invalid { received: String },
}

/// Mapping from property name to validator, attached to a component definition
#[derive(Clone, Debug, Default)]
pub struct PropTypeSpecs {
    entries: IndexMap<String, TypeSpec>,
}

impl PropTypeSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, validator: Validator) -> Self {
        self.insert(name, validator);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, validator: Validator) {
        self.entries
            .insert(name.into(), TypeSpec::Validator(validator));
    }

    pub fn insert_spec(&mut self, name: impl Into<String>, spec: TypeSpec) {
        self.entries.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&TypeSpec> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeSpec)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer `other` over these specs (a derived component extending its parent's specs)
    pub fn extend(&mut self, other: PropTypeSpecs) {
        self.entries.extend(other.entries);
    }
}

impl<K: Into<String>> FromIterator<(K, Validator)> for PropTypeSpecs {
    fn from_iter<I: IntoIterator<Item = (K, Validator)>>(iter: I) -> Self {
        let mut specs = PropTypeSpecs::new();
        for (name, validator) in iter {
            specs.insert(name, validator);
        }
        specs
    }
}

impl PropTypes {
    /// Run every spec against `props`.
    ///
    /// Failures are returned and each distinct message is logged once through
    /// the diagnostics sink. Misconfigured specs and panicking validators are
    /// reported as failures instead of propagating. Production builds skip
    /// everything and return no failures.
    pub fn check_prop_types(
        &self,
        specs: &PropTypeSpecs,
        props: &Props,
        location: Location,
        component_name: &str,
        get_stack: Option<&dyn Fn() -> Option<String>>,
    ) -> Vec<PropTypeError> {
        if self.mode().is_production() {
            return Vec::new();
        }

        let secret = Secret::new();
        let mut failures = Vec::new();

        for (name, spec) in specs.iter() {
            let error = match spec {
                TypeSpec::Invalid { received } => Some(PropTypeError::new(
                    PropTypesError::InvalidTypeSpec {
                        component: display_component(component_name),
                        location,
                        name: name.to_string(),
                        received: received.clone(),
                    }
                    .to_string(),
                )),
                TypeSpec::Validator(validator) => {
                    let value = props.value(name);
                    let site = Site::root(component_name, location, name);
                    catch_quietly(|| check(validator, &value, &site, &secret))
                        .unwrap_or_else(|panic| {
                            Some(PropTypeError::new(
                                PropTypesError::ValidatorPanicked {
                                    component: display_component(component_name),
                                    location,
                                    name: name.to_string(),
                                    message: panic_message(panic.as_ref()),
                                }
                                .to_string(),
                            ))
                        })
                }
            };

            let Some(error) = error else {
                continue;
            };

            if self.diagnostics().first_time(error.message()) {
                let stack = get_stack.and_then(|f| f()).unwrap_or_default();
                self.diagnostics().warn(&format!(
                    "Failed {} type: {}{}",
                    location,
                    error.message(),
                    stack
                ));
            }
            failures.push(error);
        }

        failures
    }
}

fn display_component(component_name: &str) -> String {
    if component_name.is_empty() {
        "Component".to_string()
    } else {
        component_name.to_string()
    }
}

thread_local! {
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

/// Chain a panic hook that stays silent while this thread runs a validator
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !panics_silenced() {
                previous(info);
            }
        }));
    });
}

fn panics_silenced() -> bool {
    QUIET_DEPTH.with(|depth| depth.get() > 0)
}

/// Run a validator, catching a panic without the default hook printing it.
/// The dispatcher reports the failure itself.
fn catch_quietly<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    install_quiet_hook();
    QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = catch_unwind(AssertUnwindSafe(f));
    QUIET_DEPTH.with(|depth| depth.set(depth.get() - 1));
    result
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::validator::*;
    use super::super::Diagnostics;
    use super::*;
    use crate::shared::config::{BuildMode, DirectAccess};

    fn dev() -> (PropTypes, Arc<Diagnostics>) {
        let diagnostics = Arc::new(Diagnostics::new());
        let checker = PropTypes::new(
            BuildMode::Development,
            DirectAccess::Throw,
            Arc::clone(&diagnostics),
        );
        (checker, diagnostics)
    }

    #[test]
    fn test_logs_each_failure_once() {
        let (checker, diagnostics) = dev();
        let specs = PropTypeSpecs::new().with("size", number());
        let props = Props::new().with("size", "big");

        let first = checker.check_prop_types(&specs, &props, Location::Prop, "Button", None);
        let second = checker.check_prop_types(&specs, &props, Location::Prop, "Button", None);

        assert_eq!(first.len(), 1);
        assert_eq!(second, first);
        assert_eq!(
            diagnostics.emitted(),
            vec![
                "Warning: Failed prop type: Invalid prop `size` of type `string` supplied to `Button`, expected `number`."
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_stack_is_appended() {
        let (checker, diagnostics) = dev();
        let specs = PropTypeSpecs::new().with("title", string().is_required());
        let stack = || Some("\n    in Modal".to_string());

        checker.check_prop_types(&specs, &Props::new(), Location::Prop, "Modal", Some(&stack));

        assert_eq!(
            diagnostics.emitted(),
            vec![
                "Warning: Failed prop type: The prop `title` is marked as required in `Modal`, but its value is `undefined`.\n    in Modal"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_spec_is_reported_not_raised() {
        let (checker, diagnostics) = dev();
        let mut specs = PropTypeSpecs::new().with("ok", any());
        specs.insert_spec(
            "broken",
            TypeSpec::Invalid {
                received: "number".to_string(),
            },
        );

        let failures = checker.check_prop_types(&specs, &Props::new(), Location::Context, "", None);

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message(),
            "Component: context type `broken` is invalid; it must be a validator, but received `number`."
        );
        assert_eq!(diagnostics.emitted().len(), 1);
    }

    #[test]
    fn test_panicking_validator_is_caught() {
        let (checker, _) = dev();
        let specs = PropTypeSpecs::new()
            .with("explodes", custom_prop(|_| panic!("boom")))
            .with("fine", number());
        let props = Props::new().with("explodes", 1).with("fine", 2);

        let failures = checker.check_prop_types(&specs, &props, Location::Prop, "Widget", None);

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message(),
            "Widget: prop type `explodes` failed unexpectedly: boom"
        );
    }

    #[test]
    fn test_validator_panics_are_silenced_only_while_checking() {
        let (checker, diagnostics) = dev();
        let specs = PropTypeSpecs::new()
            .with(
                "inside",
                custom_prop(|_| {
                    assert!(panics_silenced());
                    None
                }),
            )
            .with("explodes", custom_prop(|_| panic!("boom")));

        let failures =
            checker.check_prop_types(&specs, &Props::new().with("explodes", 1), Location::Prop, "Widget", None);

        assert_eq!(failures.len(), 1);
        assert_eq!(diagnostics.emitted().len(), 1);
        assert!(!panics_silenced());
    }

    #[test]
    fn test_production_skips_validation() {
        let diagnostics = Arc::new(Diagnostics::new());
        let checker = PropTypes::new(
            BuildMode::Production,
            DirectAccess::Throw,
            Arc::clone(&diagnostics),
        );
        let specs = PropTypeSpecs::new().with("size", number().is_required());

        let failures = checker.check_prop_types(&specs, &Props::new(), Location::Prop, "Button", None);

        assert!(failures.is_empty());
        assert!(diagnostics.emitted().is_empty());
    }

    #[test]
    fn test_specs_extend_overrides() {
        let mut base = PropTypeSpecs::new().with("a", number()).with("b", string());
        base.extend(PropTypeSpecs::new().with("b", bool()));
        assert_eq!(base.len(), 2);
        match base.get("b") {
            Some(TypeSpec::Validator(v)) => assert_eq!(v.name(), "bool"),
            other => panic!("unexpected spec {:?}", other),
        }
    }
}
