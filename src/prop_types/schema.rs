//! Declarative prop-type documents
//!
//! Specs can be described in JSON so they can live next to style sheets and be
//! shared between components:
//!
//! ```json
//! {
//!   "tabs": { "oneOfType": ["array", "func"], "isRequired": true },
//!   "direction": { "oneOf": ["horizontal", "vertical"] },
//!   "activeTab": "number",
//!   "title": "string.isRequired"
//! }
//! ```
//!
//! Entries that do not describe a validator are kept as [`TypeSpec::Invalid`]
//! and reported by the dispatcher, the same as any other misconfigured spec.

use serde_json::{Map, Value as Json};

use crate::domain::errors::PropTypesError;
use crate::domain::value::PropValue;

use super::dispatch::{PropTypeSpecs, TypeSpec};
use super::validator::{self, ShapeSpec, Validator};

const REQUIRED_SUFFIX: &str = ".isRequired";

impl PropTypeSpecs {
    /// Build specs from a JSON object of `name -> description`
    pub fn from_json(document: &Json) -> Result<Self, PropTypesError> {
        let Json::Object(entries) = document else {
            return Err(PropTypesError::Schema(format!(
                "expected an object of prop descriptions, got {}",
                json_type_name(document)
            )));
        };

        let mut specs = PropTypeSpecs::new();
        for (name, description) in entries {
            let spec = match parse_description(description) {
                Some(validator) => TypeSpec::Validator(validator),
                None => TypeSpec::Invalid {
                    received: json_type_name(description).to_string(),
                },
            };
            specs.insert_spec(name.clone(), spec);
        }
        Ok(specs)
    }

    /// Parse specs from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, PropTypesError> {
        let document: Json = serde_json::from_str(text)?;
        Self::from_json(&document)
    }
}

/// Runtime type name of a JSON value as a dynamically typed host would report it
fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null | Json::Array(_) | Json::Object(_) => "object",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
    }
}

fn parse_description(description: &Json) -> Option<Validator> {
    match description {
        Json::String(name) => parse_named(name),
        Json::Object(map) => parse_object(map),
        _ => None,
    }
}

fn parse_named(name: &str) -> Option<Validator> {
    let (base, required) = match name.strip_suffix(REQUIRED_SUFFIX) {
        Some(base) => (base, true),
        None => (name, false),
    };

    let validator = match base {
        "any" => validator::any(),
        "bool" => validator::bool(),
        "number" => validator::number(),
        "string" => validator::string(),
        "symbol" => validator::symbol(),
        "func" => validator::func(),
        "array" => validator::array(),
        "object" => validator::object(),
        "node" => validator::node(),
        "element" => validator::element(),
        _ => return None,
    };

    Some(if required {
        validator.is_required()
    } else {
        validator
    })
}

fn parse_object(map: &Map<String, Json>) -> Option<Validator> {
    let required = match map.get("isRequired") {
        None => false,
        Some(Json::Bool(b)) => *b,
        Some(_) => return None,
    };

    let mut kinds = map.iter().filter(|(key, _)| key.as_str() != "isRequired");
    let (kind, argument) = kinds.next()?;
    if kinds.next().is_some() {
        return None;
    }

    let validator = match kind.as_str() {
        "type" => match argument {
            Json::String(name) => parse_named(name)?,
            _ => return None,
        },
        "oneOf" => {
            let values = argument.as_array()?;
            validator::one_of(values.iter().map(PropValue::from_json).collect())
        }
        "oneOfType" => {
            let checkers = argument
                .as_array()?
                .iter()
                .map(parse_description)
                .collect::<Option<Vec<_>>>()?;
            validator::one_of_type(checkers)
        }
        "arrayOf" => validator::array_of(parse_description(argument)?),
        "objectOf" => validator::object_of(parse_description(argument)?),
        "shape" => validator::shape(parse_shape(argument)?),
        "exact" => validator::exact(parse_shape(argument)?),
        _ => return None,
    };

    Some(if required {
        validator.is_required()
    } else {
        validator
    })
}

fn parse_shape(argument: &Json) -> Option<ShapeSpec> {
    argument
        .as_object()?
        .iter()
        .map(|(key, description)| Some((key.clone(), parse_description(description)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::domain::value::Props;
    use crate::prop_types::{Diagnostics, Location, PropTypes};
    use crate::shared::config::{BuildMode, DirectAccess};

    fn validator_name(specs: &PropTypeSpecs, name: &str) -> Option<(&'static str, bool)> {
        match specs.get(name)? {
            TypeSpec::Validator(v) => Some((v.name(), v.required())),
            TypeSpec::Invalid { .. } => None,
        }
    }

    #[test]
    fn test_parse_document() {
        let specs = PropTypeSpecs::from_json(&json!({
            "tabs": { "oneOfType": ["array", "func"], "isRequired": true },
            "direction": { "oneOf": ["horizontal", "vertical"] },
            "activeTab": "number",
            "title": "string.isRequired",
            "style": { "shape": { "flex": "number" } },
            "items": { "arrayOf": { "exact": { "id": "string.isRequired" } } },
            "explicit": { "type": "bool" }
        }))
        .unwrap();

        assert_eq!(specs.len(), 7);
        assert_eq!(validator_name(&specs, "tabs"), Some(("oneOfType", true)));
        assert_eq!(validator_name(&specs, "direction"), Some(("oneOf", false)));
        assert_eq!(validator_name(&specs, "activeTab"), Some(("number", false)));
        assert_eq!(validator_name(&specs, "title"), Some(("string", true)));
        assert_eq!(validator_name(&specs, "style"), Some(("shape", false)));
        assert_eq!(validator_name(&specs, "items"), Some(("arrayOf", false)));
        assert_eq!(validator_name(&specs, "explicit"), Some(("bool", false)));
    }

    #[test]
    fn test_invalid_entries_are_kept() {
        let specs = PropTypeSpecs::from_json(&json!({
            "count": 3,
            "unknown": "colour",
            "mixed": { "arrayOf": "string", "oneOf": [] },
            "nested": { "arrayOf": "nope" }
        }))
        .unwrap();

        let received = |name: &str| match specs.get(name) {
            Some(TypeSpec::Invalid { received }) => received.clone(),
            other => panic!("expected invalid spec for {}, got {:?}", name, other),
        };
        assert_eq!(received("count"), "number");
        assert_eq!(received("unknown"), "string");
        assert_eq!(received("mixed"), "object");
        assert_eq!(received("nested"), "object");
    }

    #[test]
    fn test_document_must_be_object() {
        assert!(matches!(
            PropTypeSpecs::from_json(&json!(["string"])),
            Err(PropTypesError::Schema(_))
        ));
        assert!(PropTypeSpecs::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_parsed_specs_validate() {
        let checker = PropTypes::new(
            BuildMode::Development,
            DirectAccess::Throw,
            Arc::new(Diagnostics::new()),
        );
        let specs = PropTypeSpecs::from_json_str(
            r#"{ "direction": { "oneOf": ["horizontal", "vertical"] }, "size": 12 }"#,
        )
        .unwrap();
        let props = Props::new().with("direction", "diagonal");

        let failures = checker.check_prop_types(&specs, &props, Location::Prop, "PagerBar", None);
        let messages: Vec<&str> = failures.iter().map(|e| e.message()).collect();

        assert_eq!(
            messages,
            vec![
                "Invalid prop `direction` of value `diagonal` supplied to `PagerBar`, expected one of [\"horizontal\",\"vertical\"].",
                "PagerBar: prop type `size` is invalid; it must be a validator, but received `number`.",
            ]
        );
    }
}
