//! Validator definitions
//!
//! Every checker is a tagged variant with its captured arguments. The free
//! functions in this module are the public constructors (`string()`,
//! `array_of(..)`, `shape(..)`, ...); `.is_required()` turns any of them into
//! the required variant.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::domain::errors::PropTypeError;
use crate::domain::value::{ClassRef, PropValue};

use super::check::{check, Secret, Site};
use super::Location;

/// Arguments handed to a custom validator
pub struct CustomArgs<'a> {
    pub(crate) value: &'a PropValue,
    pub(crate) site: &'a Site<'a>,
    pub(crate) secret: &'a Secret,
}

impl<'a> CustomArgs<'a> {
    /// The value under test
    pub fn value(&self) -> &PropValue {
        self.value
    }

    /// Name of the prop (or array index) being checked
    pub fn prop_name(&self) -> &str {
        &self.site.prop_name
    }

    /// Full path of the value, e.g. `tabs[2].caption`
    pub fn full_name(&self) -> &str {
        &self.site.full_name
    }

    pub fn component_name(&self) -> &str {
        self.site.component
    }

    pub fn location(&self) -> Location {
        self.site.location
    }

    /// Run another validator against a nested value, keeping the dispatcher's authorization
    pub fn check_nested(
        &self,
        validator: &Validator,
        value: &PropValue,
        key: &str,
    ) -> Option<PropTypeError> {
        let site = self.site.child_key(key);
        check(validator, value, &site, self.secret)
    }

    /// Convenience for building a failure that names this prop
    pub fn error(&self, reason: &str) -> PropTypeError {
        PropTypeError::new(format!(
            "Invalid {} `{}` supplied to `{}`: {}",
            self.site.location, self.site.full_name, self.site.component, reason
        ))
    }
}

/// User supplied check function
#[derive(Clone)]
pub struct CustomCheck(Rc<dyn Fn(&CustomArgs<'_>) -> Option<PropTypeError>>);

impl CustomCheck {
    pub fn new(f: impl Fn(&CustomArgs<'_>) -> Option<PropTypeError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, args: &CustomArgs<'_>) -> Option<PropTypeError> {
        (self.0)(args)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck")
    }
}

/// Expected keys of a `shape` or `exact` checker
pub type ShapeSpec = IndexMap<String, Validator>;

/// Checker kinds with their captured arguments
#[derive(Clone, Debug)]
pub enum PropType {
    Any,
    Bool,
    Number,
    String,
    Symbol,
    Func,
    Array,
    Object,
    Node,
    Element,
    InstanceOf(ClassRef),
    OneOf(Vec<PropValue>),
    OneOfType(Vec<Validator>),
    ArrayOf(Box<Validator>),
    ObjectOf(Box<Validator>),
    Shape(ShapeSpec),
    Exact(ShapeSpec),
    Custom(CustomCheck),
    CustomArray(CustomCheck),
}

impl PropType {
    /// Public name of the checker
    pub fn name(&self) -> &'static str {
        match self {
            PropType::Any => "any",
            PropType::Bool => "bool",
            PropType::Number => "number",
            PropType::String => "string",
            PropType::Symbol => "symbol",
            PropType::Func => "func",
            PropType::Array => "array",
            PropType::Object => "object",
            PropType::Node => "node",
            PropType::Element => "element",
            PropType::InstanceOf(_) => "instanceOf",
            PropType::OneOf(_) => "oneOf",
            PropType::OneOfType(_) => "oneOfType",
            PropType::ArrayOf(_) => "arrayOf",
            PropType::ObjectOf(_) => "objectOf",
            PropType::Shape(_) => "shape",
            PropType::Exact(_) => "exact",
            PropType::Custom(_) => "customProp",
            PropType::CustomArray(_) => "customArrayProp",
        }
    }
}

/// A checker plus its required flag
#[derive(Clone, Debug)]
pub struct Validator {
    kind: PropType,
    required: bool,
}

impl Validator {
    pub fn new(kind: PropType) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    /// Required variant: `null`/`undefined` become errors
    pub fn is_required(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            required: true,
        }
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &PropType {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl From<PropType> for Validator {
    fn from(kind: PropType) -> Self {
        Validator::new(kind)
    }
}

pub fn any() -> Validator {
    Validator::new(PropType::Any)
}

pub fn bool() -> Validator {
    Validator::new(PropType::Bool)
}

pub fn number() -> Validator {
    Validator::new(PropType::Number)
}

pub fn string() -> Validator {
    Validator::new(PropType::String)
}

pub fn symbol() -> Validator {
    Validator::new(PropType::Symbol)
}

pub fn func() -> Validator {
    Validator::new(PropType::Func)
}

pub fn array() -> Validator {
    Validator::new(PropType::Array)
}

pub fn object() -> Validator {
    Validator::new(PropType::Object)
}

/// Anything renderable: numbers, strings, elements, or lists of those
pub fn node() -> Validator {
    Validator::new(PropType::Node)
}

/// A single element
pub fn element() -> Validator {
    Validator::new(PropType::Element)
}

pub fn instance_of(class: ClassRef) -> Validator {
    Validator::new(PropType::InstanceOf(class))
}

/// Value must be SameValue-equal to one of `values`; an empty list accepts anything
pub fn one_of(values: Vec<PropValue>) -> Validator {
    Validator::new(PropType::OneOf(values))
}

/// Value must satisfy at least one checker; an empty list accepts anything
pub fn one_of_type(checkers: Vec<Validator>) -> Validator {
    Validator::new(PropType::OneOfType(checkers))
}

pub fn array_of(checker: Validator) -> Validator {
    Validator::new(PropType::ArrayOf(Box::new(checker)))
}

pub fn object_of(checker: Validator) -> Validator {
    Validator::new(PropType::ObjectOf(Box::new(checker)))
}

/// Object with the given keys checked; extra keys are tolerated
pub fn shape<K: Into<String>>(spec: impl IntoIterator<Item = (K, Validator)>) -> Validator {
    Validator::new(PropType::Shape(collect_spec(spec)))
}

/// Object with the given keys checked; extra keys are rejected
pub fn exact<K: Into<String>>(spec: impl IntoIterator<Item = (K, Validator)>) -> Validator {
    Validator::new(PropType::Exact(collect_spec(spec)))
}

pub fn custom_prop(
    f: impl Fn(&CustomArgs<'_>) -> Option<PropTypeError> + 'static,
) -> Validator {
    Validator::new(PropType::Custom(CustomCheck::new(f)))
}

/// Custom check applied to every element of an array
pub fn custom_array_prop(
    f: impl Fn(&CustomArgs<'_>) -> Option<PropTypeError> + 'static,
) -> Validator {
    Validator::new(PropType::CustomArray(CustomCheck::new(f)))
}

fn collect_spec<K: Into<String>>(spec: impl IntoIterator<Item = (K, Validator)>) -> ShapeSpec {
    spec.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
