//! Dynamic property values
//!
//! Props and state are loosely typed bags. Every value carries a runtime type
//! tag which the validators compare against, and reference-like values
//! (arrays, objects, functions, elements) compare by identity the same way a
//! host framework diffs them.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as Json};

use super::element::{Element, Node};

/// Key/value storage used by objects, props and state, in insertion order
pub type PropMap = IndexMap<String, PropValue>;

/// Component state shares the prop bag representation
pub type State = Props;

/// Runtime type tag of a value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Function,
    Array,
    Object,
    Date,
    RegExp,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Function => "function",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Date => "date",
            TypeTag::RegExp => "regexp",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique symbol value; two symbols are equal only if they are the same symbol
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(description: &str) -> Self {
        Self(Rc::from(description))
    }

    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Callable prop value (event handlers, render callbacks, lazy props)
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&[PropValue]) -> PropValue>);

impl Callback {
    pub fn new(f: impl Fn(&[PropValue]) -> PropValue + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[PropValue]) -> PropValue {
        (self.0)(args)
    }

    /// Identity comparison (same closure allocation)
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// Runtime class identity used by `instance_of`
#[derive(Clone, Copy, Debug)]
pub struct ClassRef {
    type_id: TypeId,
    name: &'static str,
}

impl ClassRef {
    /// Class reference for a Rust type, named after the last path segment
    pub fn of<T: Any>() -> Self {
        let full = std::any::type_name::<T>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self {
            type_id: TypeId::of::<T>(),
            name,
        }
    }

    /// Class reference with an explicit display name
    pub fn named<T: Any>(name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

/// An instance of some host class carried as a prop
#[derive(Clone)]
pub struct InstanceRef {
    class: ClassRef,
    value: Rc<dyn Any>,
}

impl InstanceRef {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            class: ClassRef::of::<T>(),
            value: Rc::new(value),
        }
    }

    pub fn class(&self) -> ClassRef {
        self.class
    }

    pub fn is_instance_of(&self, class: &ClassRef) -> bool {
        self.class == *class
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &InstanceRef) -> bool {
        Rc::as_ptr(&self.value) as *const () == Rc::as_ptr(&other.value) as *const ()
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ .. }}", self.class.name)
    }
}

/// Non-array value that can be walked with an iterator
pub trait Iterable: fmt::Debug {
    /// Class name reported in diagnostics
    fn class_name(&self) -> &str;

    /// Yields the element values (for keyed collections, the entry values)
    fn iter_values(&self) -> Box<dyn Iterator<Item = PropValue> + '_>;
}

/// Ordered collection implementing [`Iterable`] (a set, or a map's entries)
#[derive(Debug)]
pub struct Collection {
    class_name: &'static str,
    entries: Vec<(PropValue, PropValue)>,
}

impl Collection {
    /// Set-like collection; iteration yields the items
    pub fn set(items: Vec<PropValue>) -> Self {
        Self {
            class_name: "Set",
            entries: items.into_iter().map(|v| (v.clone(), v)).collect(),
        }
    }

    /// Map-like collection; iteration yields the entry values
    pub fn map(entries: Vec<(PropValue, PropValue)>) -> Self {
        Self {
            class_name: "Map",
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Iterable for Collection {
    fn class_name(&self) -> &str {
        self.class_name
    }

    fn iter_values(&self) -> Box<dyn Iterator<Item = PropValue> + '_> {
        Box::new(self.entries.iter().map(|(_, v)| v.clone()))
    }
}

/// A dynamically typed property value
#[derive(Clone, Debug, Default)]
pub enum PropValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Function(Callback),
    Array(Rc<Vec<PropValue>>),
    Object(Rc<PropMap>),
    Date(Rc<DateTime<Utc>>),
    RegExp(Rc<str>),
    Element(Rc<Element>),
    Instance(InstanceRef),
    Iterable(Rc<dyn Iterable>),
}

impl PropValue {
    pub fn array(items: Vec<PropValue>) -> Self {
        PropValue::Array(Rc::new(items))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, PropValue)>) -> Self {
        PropValue::Object(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn function(f: impl Fn(&[PropValue]) -> PropValue + 'static) -> Self {
        PropValue::Function(Callback::new(f))
    }

    pub fn iterable(collection: impl Iterable + 'static) -> Self {
        PropValue::Iterable(Rc::new(collection))
    }

    pub fn regexp(source: &str) -> Self {
        PropValue::RegExp(Rc::from(source))
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        PropValue::Date(Rc::new(at))
    }

    /// Runtime type tag
    pub fn type_tag(&self) -> TypeTag {
        match self {
            PropValue::Undefined => TypeTag::Undefined,
            PropValue::Null => TypeTag::Null,
            PropValue::Bool(_) => TypeTag::Boolean,
            PropValue::Number(_) => TypeTag::Number,
            PropValue::String(_) => TypeTag::String,
            PropValue::Symbol(_) => TypeTag::Symbol,
            PropValue::Function(_) => TypeTag::Function,
            PropValue::Array(_) => TypeTag::Array,
            PropValue::Date(_) => TypeTag::Date,
            PropValue::RegExp(_) => TypeTag::RegExp,
            PropValue::Object(_)
            | PropValue::Element(_)
            | PropValue::Instance(_)
            | PropValue::Iterable(_) => TypeTag::Object,
        }
    }

    /// `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, PropValue::Undefined | PropValue::Null)
    }

    /// Truthiness as a host framework evaluates it
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Undefined | PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Strict equality: primitives by value, everything else by identity.
    /// NaN is never equal to itself and +0 equals -0.
    pub fn strict_eq(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            _ => self.identity_eq(other),
        }
    }

    /// SameValue equality: NaN equals NaN, +0 and -0 are distinct
    pub fn same_value(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Number(a), PropValue::Number(b)) => {
                if a == b {
                    *a != 0.0 || a.is_sign_negative() == b.is_sign_negative()
                } else {
                    a.is_nan() && b.is_nan()
                }
            }
            _ => self.identity_eq(other),
        }
    }

    fn identity_eq(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Undefined, PropValue::Undefined) => true,
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::String(a), PropValue::String(b)) => a == b,
            (PropValue::Symbol(a), PropValue::Symbol(b)) => a == b,
            (PropValue::Function(a), PropValue::Function(b)) => a.ptr_eq(b),
            (PropValue::Array(a), PropValue::Array(b)) => Rc::ptr_eq(a, b),
            (PropValue::Object(a), PropValue::Object(b)) => Rc::ptr_eq(a, b),
            (PropValue::Date(a), PropValue::Date(b)) => Rc::ptr_eq(a, b),
            (PropValue::RegExp(a), PropValue::RegExp(b)) => Rc::ptr_eq(a, b),
            (PropValue::Element(a), PropValue::Element(b)) => Rc::ptr_eq(a, b),
            (PropValue::Instance(a), PropValue::Instance(b)) => a.ptr_eq(b),
            (PropValue::Iterable(a), PropValue::Iterable(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }

    /// Constructor name of the value, used by `instance_of` diagnostics
    pub fn class_name(&self) -> Option<String> {
        let name = match self {
            PropValue::Undefined | PropValue::Null => return None,
            PropValue::Bool(_) => "Boolean",
            PropValue::Number(_) => "Number",
            PropValue::String(_) => "String",
            PropValue::Symbol(_) => "Symbol",
            PropValue::Function(_) => "Function",
            PropValue::Array(_) => "Array",
            PropValue::Object(_) | PropValue::Element(_) => "Object",
            PropValue::Date(_) => "Date",
            PropValue::RegExp(_) => "RegExp",
            PropValue::Instance(i) => i.class().name(),
            PropValue::Iterable(it) => return Some(it.class_name().to_string()),
        };
        Some(name.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropValue]> {
        match self {
            PropValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&PropMap> {
        match self {
            PropValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Callback> {
        match self {
            PropValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Own property lookup on an object value
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// String conversion as performed by template concatenation
    pub fn to_js_string(&self) -> String {
        match self {
            PropValue::Undefined => "undefined".to_string(),
            PropValue::Null => "null".to_string(),
            PropValue::Bool(b) => b.to_string(),
            PropValue::Number(n) => format_number(*n),
            PropValue::String(s) => s.clone(),
            PropValue::Symbol(s) => format!("Symbol({})", s.description()),
            PropValue::Function(_) => "function".to_string(),
            PropValue::Array(items) => items
                .iter()
                .map(|v| {
                    if v.is_nullish() {
                        String::new()
                    } else {
                        v.to_js_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            PropValue::Date(at) => at.to_rfc2822(),
            PropValue::RegExp(src) => format!("/{}/", src),
            PropValue::Object(_) | PropValue::Element(_) | PropValue::Instance(_) => {
                "[object Object]".to_string()
            }
            PropValue::Iterable(it) => format!("[object {}]", it.class_name()),
        }
    }

    /// JSON form of the value; `None` where JSON has no representation
    /// (undefined, functions, symbols)
    pub fn to_json(&self) -> Option<Json> {
        match self {
            PropValue::Undefined | PropValue::Function(_) | PropValue::Symbol(_) => None,
            PropValue::Null => Some(Json::Null),
            PropValue::Bool(b) => Some(Json::Bool(*b)),
            PropValue::Number(n) => Some(number_to_json(*n)),
            PropValue::String(s) => Some(Json::String(s.clone())),
            PropValue::Array(items) => Some(Json::Array(
                items
                    .iter()
                    .map(|v| v.to_json().unwrap_or(Json::Null))
                    .collect(),
            )),
            PropValue::Object(map) => Some(map_to_json(map)),
            PropValue::Date(at) => Some(Json::String(
                at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            PropValue::Element(el) => {
                let mut out = JsonMap::new();
                out.insert("type".to_string(), Json::String(el.kind().to_string()));
                out.insert(
                    "key".to_string(),
                    el.key_str().map_or(Json::Null, |k| Json::String(k.to_string())),
                );
                out.insert("props".to_string(), map_to_json(el.prop_values().as_map()));
                Some(Json::Object(out))
            }
            PropValue::RegExp(_) | PropValue::Instance(_) | PropValue::Iterable(_) => {
                Some(Json::Object(JsonMap::new()))
            }
        }
    }

    /// Convert plain JSON into a value tree
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => PropValue::Null,
            Json::Bool(b) => PropValue::Bool(*b),
            Json::Number(n) => PropValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => PropValue::String(s.clone()),
            Json::Array(items) => PropValue::array(items.iter().map(PropValue::from_json).collect()),
            Json::Object(map) => {
                PropValue::object(map.iter().map(|(k, v)| (k.clone(), PropValue::from_json(v))))
            }
        }
    }
}

fn map_to_json(map: &PropMap) -> Json {
    let mut out = JsonMap::new();
    for (key, value) in map {
        if let Some(json) = value.to_json() {
            out.insert(key.clone(), json);
        }
    }
    Json::Object(out)
}

fn number_to_json(n: f64) -> Json {
    // Integral values print without a fraction, non-finite values become null
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Json::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Json::Number)
            .unwrap_or(Json::Null)
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Serialize values the way diagnostics print them (`undefined` when JSON has no form)
pub fn json_stringify(value: &PropValue, pretty: bool) -> String {
    match value.to_json() {
        Some(json) => {
            let rendered = if pretty {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            };
            rendered.unwrap_or_else(|_| "undefined".to_string())
        }
        None => "undefined".to_string(),
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<usize> for PropValue {
    fn from(n: usize) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::String(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::String(s)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(items: Vec<PropValue>) -> Self {
        PropValue::array(items)
    }
}

impl From<Callback> for PropValue {
    fn from(f: Callback) -> Self {
        PropValue::Function(f)
    }
}

impl From<Symbol> for PropValue {
    fn from(s: Symbol) -> Self {
        PropValue::Symbol(s)
    }
}

impl From<InstanceRef> for PropValue {
    fn from(i: InstanceRef) -> Self {
        PropValue::Instance(i)
    }
}

impl From<Element> for PropValue {
    fn from(el: Element) -> Self {
        PropValue::Element(Rc::new(el))
    }
}

impl From<Props> for PropValue {
    fn from(props: Props) -> Self {
        PropValue::Object(Rc::new(props.0))
    }
}

impl From<Node> for PropValue {
    fn from(node: Node) -> Self {
        match node {
            Node::Empty => PropValue::Null,
            Node::Text(text) => PropValue::String(text),
            Node::Element(el) => PropValue::Element(el),
            Node::Fragment(nodes) => {
                PropValue::array(nodes.into_iter().map(PropValue::from).collect())
            }
        }
    }
}

/// `==` is strict equality (`===`)
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Undefined, Into::into)
    }
}

/// Property bag handed to a component (also used for state)
#[derive(Clone, Debug, Default)]
pub struct Props(PropMap);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    /// Value for a key, `undefined` when absent
    pub fn value(&self, key: &str) -> PropValue {
        self.0.get(key).cloned().unwrap_or_default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &PropMap {
        &self.0
    }

    /// Shallow-assign every key of `patch` over this bag
    pub fn merge(&mut self, patch: Props) {
        self.0.extend(patch.0);
    }

    /// Shallow equality: identical own key sets and strictly equal values per key
    pub fn shallow_eq(&self, other: &Props) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        self.0.iter().all(|(key, value)| {
            other
                .0
                .get(key)
                .map_or(false, |other_value| value.strict_eq(other_value))
        })
    }
}

impl From<PropMap> for Props {
    fn from(map: PropMap) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, PropValue)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, PropValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = indexmap::map::IntoIter<String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(PropValue::Undefined.type_tag().as_str(), "undefined");
        assert_eq!(PropValue::Null.type_tag().as_str(), "null");
        assert_eq!(PropValue::from(true).type_tag().as_str(), "boolean");
        assert_eq!(PropValue::from(1).type_tag().as_str(), "number");
        assert_eq!(PropValue::from("x").type_tag().as_str(), "string");
        assert_eq!(PropValue::array(vec![]).type_tag().as_str(), "array");
        assert_eq!(PropValue::regexp("a+").type_tag().as_str(), "regexp");
        assert_eq!(PropValue::date(Utc::now()).type_tag().as_str(), "date");
        assert_eq!(
            PropValue::iterable(Collection::set(vec![])).type_tag(),
            TypeTag::Object
        );
        assert_eq!(PropValue::from(Element::new("View")).type_tag(), TypeTag::Object);
    }

    #[test]
    fn test_same_value_semantics() {
        let nan = PropValue::Number(f64::NAN);
        assert!(nan.same_value(&PropValue::Number(f64::NAN)));
        assert!(!nan.strict_eq(&PropValue::Number(f64::NAN)));

        let zero = PropValue::Number(0.0);
        let neg_zero = PropValue::Number(-0.0);
        assert!(zero.strict_eq(&neg_zero));
        assert!(!zero.same_value(&neg_zero));
        assert!(zero.same_value(&PropValue::Number(0.0)));
    }

    #[test]
    fn test_reference_identity() {
        let a = PropValue::array(vec![PropValue::from(1)]);
        let b = PropValue::array(vec![PropValue::from(1)]);
        assert!(a.strict_eq(&a.clone()));
        assert!(!a.strict_eq(&b));

        let f = PropValue::function(|_| PropValue::Undefined);
        assert!(f.strict_eq(&f.clone()));
        assert!(!f.strict_eq(&PropValue::function(|_| PropValue::Undefined)));

        assert!(PropValue::from("x").strict_eq(&PropValue::from("x")));
    }

    #[test]
    fn test_shallow_eq() {
        let shared = PropValue::array(vec![]);
        let a = Props::new().with("x", 1).with("list", shared.clone());
        let b = Props::new().with("x", 1).with("list", shared);
        assert!(a.shallow_eq(&b));

        let c = b.clone().with("y", 2);
        assert!(!a.shallow_eq(&c));

        let d = Props::new().with("x", 1).with("list", PropValue::array(vec![]));
        assert!(!a.shallow_eq(&d));

        // Same size, different key
        let e = Props::new().with("x", 1).with("other", PropValue::Undefined);
        assert!(!a.shallow_eq(&e));
    }

    #[test]
    fn test_js_string_conversion() {
        assert_eq!(PropValue::from(1).to_js_string(), "1");
        assert_eq!(PropValue::from(1.5).to_js_string(), "1.5");
        assert_eq!(PropValue::Number(-0.0).to_js_string(), "0");
        assert_eq!(PropValue::Number(f64::NAN).to_js_string(), "NaN");
        assert_eq!(
            PropValue::array(vec![PropValue::from(1), PropValue::Null, PropValue::from("a")])
                .to_js_string(),
            "1,,a"
        );
        assert_eq!(
            PropValue::object([("a", PropValue::from(1))]).to_js_string(),
            "[object Object]"
        );
    }

    #[test]
    fn test_json_stringify() {
        let value = PropValue::array(vec![
            PropValue::from(1),
            PropValue::from("b"),
            PropValue::Undefined,
            PropValue::Number(f64::NAN),
        ]);
        assert_eq!(json_stringify(&value, false), r#"[1,"b",null,null]"#);

        let obj = PropValue::object([
            ("a", PropValue::from(true)),
            ("skip", PropValue::function(|_| PropValue::Undefined)),
        ]);
        assert_eq!(json_stringify(&obj, false), r#"{"a":true}"#);
        assert_eq!(json_stringify(&PropValue::Undefined, false), "undefined");
    }

    #[test]
    fn test_class_names() {
        struct Widget;
        let instance = PropValue::from(InstanceRef::new(Widget));
        assert_eq!(instance.class_name().as_deref(), Some("Widget"));
        assert_eq!(PropValue::Null.class_name(), None);
        assert_eq!(PropValue::from(3).class_name().as_deref(), Some("Number"));
    }
}
