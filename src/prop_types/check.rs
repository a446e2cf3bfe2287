//! Recursive-descent evaluation of validators

use crate::domain::errors::PropTypeError;
use crate::domain::value::{json_stringify, PropValue, TypeTag};

use super::validator::{CustomArgs, CustomCheck, PropType, ShapeSpec, Validator};
use super::Location;

/// Authorization token. Only the dispatcher (and handles it vouches for) can
/// construct one, so validators cannot be run without going through it.
pub struct Secret(());

impl Secret {
    pub(crate) fn new() -> Self {
        Secret(())
    }
}

/// Where a value sits: owning component, prop location and path
#[derive(Debug)]
pub struct Site<'a> {
    pub(crate) component: &'a str,
    pub(crate) location: Location,
    pub(crate) prop_name: String,
    pub(crate) full_name: String,
}

impl<'a> Site<'a> {
    pub(crate) fn root(component: &'a str, location: Location, prop_name: &str) -> Self {
        Self {
            component,
            location,
            prop_name: prop_name.to_string(),
            full_name: prop_name.to_string(),
        }
    }

    pub(crate) fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    pub(crate) fn child_index(&self, index: usize) -> Site<'a> {
        Site {
            component: self.component,
            location: self.location,
            prop_name: index.to_string(),
            full_name: format!("{}[{}]", self.full_name, index),
        }
    }

    pub(crate) fn child_key(&self, key: &str) -> Site<'a> {
        Site {
            component: self.component,
            location: self.location,
            prop_name: key.to_string(),
            full_name: format!("{}.{}", self.full_name, key),
        }
    }

    fn invalid(&self, detail: impl std::fmt::Display) -> PropTypeError {
        PropTypeError::new(format!(
            "Invalid {} `{}` {}",
            self.location, self.full_name, detail
        ))
    }

    fn type_mismatch(&self, actual: &str, expected: &str) -> PropTypeError {
        self.invalid(format_args!(
            "of type `{}` supplied to `{}`, expected {}.",
            actual, self.component, expected
        ))
    }
}

/// Check one value. `None` means valid.
pub(crate) fn check(
    validator: &Validator,
    value: &PropValue,
    site: &Site<'_>,
    secret: &Secret,
) -> Option<PropTypeError> {
    if value.is_nullish() {
        if validator.required() {
            return Some(PropTypeError::new(format!(
                "The {} `{}` is marked as required in `{}`, but its value is `{}`.",
                site.location,
                site.full_name,
                site.component,
                value.to_js_string()
            )));
        }
        return None;
    }

    check_kind(validator.kind(), value, site, secret)
}

fn check_kind(
    kind: &PropType,
    value: &PropValue,
    site: &Site<'_>,
    secret: &Secret,
) -> Option<PropTypeError> {
    match kind {
        PropType::Any => None,
        PropType::Bool => expect_tags(value, site, &[TypeTag::Boolean], "boolean"),
        PropType::Number => expect_tags(value, site, &[TypeTag::Number], "number"),
        PropType::String => expect_tags(value, site, &[TypeTag::String], "string"),
        PropType::Symbol => expect_tags(value, site, &[TypeTag::Symbol], "symbol"),
        PropType::Func => expect_tags(value, site, &[TypeTag::Function], "function"),
        PropType::Array => expect_tags(value, site, &[TypeTag::Array], "array"),
        PropType::Object => expect_tags(
            value,
            site,
            &[TypeTag::Object, TypeTag::Date, TypeTag::RegExp, TypeTag::Array],
            "object",
        ),
        PropType::Node => {
            if is_node_invalid(value) {
                Some(site.invalid(format_args!(
                    "supplied to `{}`, expected a renderable node.",
                    site.component
                )))
            } else {
                None
            }
        }
        PropType::Element => match value {
            PropValue::Element(_) => None,
            _ => Some(site.type_mismatch(value.type_tag().as_str(), "a single element")),
        },
        PropType::InstanceOf(class) => match value {
            PropValue::Instance(instance) if instance.is_instance_of(class) => None,
            _ => {
                let actual = value
                    .class_name()
                    .unwrap_or_else(|| "<<anonymous>>".to_string());
                Some(site.type_mismatch(
                    &actual,
                    &format!("instance of `{}`", class.name()),
                ))
            }
        },
        PropType::OneOf(values) => {
            if values.is_empty() || values.iter().any(|allowed| allowed.same_value(value)) {
                return None;
            }
            let allowed = PropValue::array(values.clone());
            Some(site.invalid(format_args!(
                "of value `{}` supplied to `{}`, expected one of {}.",
                value.to_js_string(),
                site.component,
                json_stringify(&allowed, false)
            )))
        }
        PropType::OneOfType(checkers) => {
            if checkers.is_empty()
                || checkers
                    .iter()
                    .any(|checker| check(checker, value, site, secret).is_none())
            {
                return None;
            }
            // Sub-checker failures are deliberately not aggregated
            Some(site.invalid(format_args!("supplied to `{}`.", site.component)))
        }
        PropType::ArrayOf(checker) => {
            each_element(value, site, |element, child| check(checker, element, child, secret))
        }
        PropType::ObjectOf(checker) => {
            if value.type_tag() != TypeTag::Object {
                return Some(site.type_mismatch(value.type_tag().as_str(), "an object"));
            }
            let map = value.as_object()?;
            map.iter().find_map(|(key, entry)| {
                let child = site.child_key(key);
                check(checker, entry, &child, secret)
            })
        }
        PropType::Shape(spec) => check_shape(spec, false, value, site, secret),
        PropType::Exact(spec) => check_shape(spec, true, value, site, secret),
        PropType::Custom(custom) => run_custom(custom, value, site, secret),
        PropType::CustomArray(custom) => each_element(value, site, |element, child| {
            run_custom(custom, element, child, secret)
        }),
    }
}

fn expect_tags(
    value: &PropValue,
    site: &Site<'_>,
    accepted: &[TypeTag],
    expected: &str,
) -> Option<PropTypeError> {
    let tag = value.type_tag();
    if accepted.contains(&tag) {
        None
    } else {
        Some(site.type_mismatch(tag.as_str(), &format!("`{}`", expected)))
    }
}

/// Walk an array, or any iterable through its iterator, stopping at the first error
fn each_element(
    value: &PropValue,
    site: &Site<'_>,
    mut check_one: impl FnMut(&PropValue, &Site<'_>) -> Option<PropTypeError>,
) -> Option<PropTypeError> {
    match value {
        PropValue::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(index, item)| check_one(item, &site.child_index(index))),
        PropValue::Iterable(iterable) => iterable
            .iter_values()
            .enumerate()
            .find_map(|(index, item)| check_one(&item, &site.child_index(index))),
        _ => Some(site.type_mismatch(value.type_tag().as_str(), "an array")),
    }
}

fn check_shape(
    spec: &ShapeSpec,
    must_be_exact: bool,
    value: &PropValue,
    site: &Site<'_>,
    secret: &Secret,
) -> Option<PropTypeError> {
    let tag = value.type_tag();
    if tag != TypeTag::Object {
        return Some(site.type_mismatch(tag.as_str(), "`object`"));
    }

    // Provided keys first, then expected keys the value does not have
    let provided: Vec<&str> = value
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let missing = spec
        .keys()
        .map(String::as_str)
        .filter(|key| !provided.contains(key));
    let keys: Vec<&str> = provided.iter().copied().chain(missing).collect();

    for key in keys {
        let Some(checker) = spec.get(key) else {
            if must_be_exact {
                let valid_keys =
                    PropValue::array(spec.keys().map(|k| PropValue::from(k.as_str())).collect());
                return Some(PropTypeError::new(format!(
                    "Invalid {} `{}` key `{}` supplied to `{}`.\nBad object: {}\nValid keys: {}",
                    site.location,
                    site.full_name,
                    key,
                    site.component,
                    json_stringify(value, true),
                    json_stringify(&valid_keys, true)
                )));
            }
            continue;
        };

        let entry = value.get(key).cloned().unwrap_or_default();
        let child = site.child_key(key);
        if let Some(error) = check(checker, &entry, &child, secret) {
            return Some(error);
        }
    }

    None
}

fn run_custom(
    custom: &CustomCheck,
    value: &PropValue,
    site: &Site<'_>,
    secret: &Secret,
) -> Option<PropTypeError> {
    custom.call(&CustomArgs {
        value,
        site,
        secret,
    })
}

/// Renderable content: numbers, strings, nullish, `false`, elements and lists of those
fn is_node_invalid(value: &PropValue) -> bool {
    match value {
        PropValue::Number(_)
        | PropValue::String(_)
        | PropValue::Undefined
        | PropValue::Null
        | PropValue::Element(_) => false,
        PropValue::Bool(b) => *b,
        PropValue::Array(items) => items.iter().any(is_node_invalid),
        PropValue::Iterable(iterable) => iterable.iter_values().any(|v| is_node_invalid(&v)),
        _ => true,
    }
}
