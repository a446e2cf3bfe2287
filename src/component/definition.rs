//! Component definitions and the component factory

use std::fmt;
use std::rc::Rc;

use crate::domain::errors::ComponentError;
use crate::domain::value::{PropValue, Props};
use crate::prop_types::PropTypeSpecs;
use crate::style::StyleSheet;

use super::logic::{proxy_component_instance_method, Logic};

type Constructor = Rc<dyn Fn(&Props) -> Box<dyn Logic>>;

/// Decides which logic methods are exposed on the wrapper
pub type ProxyFilter = fn(&str) -> bool;

/// Static description of a component: name, prop types, default props,
/// style sheet and how to build its logic
#[derive(Clone)]
pub struct ComponentDefinition {
    name: String,
    prop_types: PropTypeSpecs,
    default_props: Props,
    style_sheet: Option<StyleSheet>,
    constructor: Option<Constructor>,
    proxy_filter: ProxyFilter,
}

/// Define a component whose logic is built by `construct` from the initial props
pub fn component_factory<L, F>(name: &str, construct: F) -> ComponentDefinition
where
    L: Logic,
    F: Fn(&Props) -> L + 'static,
{
    ComponentDefinition::abstract_definition(name).constructor(construct)
}

impl ComponentDefinition {
    /// A definition without a constructor. It can carry prop types, defaults
    /// and styles for derived definitions but cannot be constructed itself.
    pub fn abstract_definition(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prop_types: PropTypeSpecs::new(),
            default_props: Props::new(),
            style_sheet: None,
            constructor: None,
            proxy_filter: proxy_component_instance_method,
        }
    }

    /// A new definition named `name` that inherits this one's prop types,
    /// default props, style sheet and proxy filter, but not its constructor
    pub fn derive(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            constructor: None,
            ..self.clone()
        }
    }

    pub fn constructor<L, F>(mut self, construct: F) -> Self
    where
        L: Logic,
        F: Fn(&Props) -> L + 'static,
    {
        self.constructor = Some(Rc::new(move |props| Box::new(construct(props)) as Box<dyn Logic>));
        self
    }

    /// Add prop types, overriding inherited entries with the same name
    pub fn prop_types(mut self, specs: PropTypeSpecs) -> Self {
        self.prop_types.extend(specs);
        self
    }

    /// Add default props, overriding inherited defaults with the same name
    pub fn default_props(mut self, defaults: Props) -> Self {
        self.default_props.merge(defaults);
        self
    }

    /// Attach a style sheet. An inherited sheet becomes its merge base.
    pub fn style_sheet(mut self, sheet: StyleSheet) -> Self {
        self.style_sheet = Some(match self.style_sheet.take() {
            Some(inherited) => sheet.merge_styles(inherited),
            None => sheet,
        });
        self
    }

    pub fn proxy_filter(mut self, filter: ProxyFilter) -> Self {
        self.proxy_filter = filter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specs(&self) -> &PropTypeSpecs {
        &self.prop_types
    }

    pub fn defaults(&self) -> &Props {
        &self.default_props
    }

    pub fn sheet(&self) -> Option<&StyleSheet> {
        self.style_sheet.as_ref()
    }

    pub fn filter(&self) -> ProxyFilter {
        self.proxy_filter
    }

    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Fill keys whose value is missing or undefined from the default props
    pub fn apply_default_props(&self, mut props: Props) -> Props {
        for (key, value) in self.default_props.iter() {
            if matches!(props.get(key), None | Some(PropValue::Undefined)) {
                props.insert(key, value.clone());
            }
        }
        props
    }

    pub(crate) fn instantiate(&self, props: &Props) -> Result<Box<dyn Logic>, ComponentError> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or_else(|| ComponentError::NotConstructible(self.name.clone()))?;
        Ok(constructor(props))
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("prop_types", &self.prop_types.len())
            .field("default_props", &self.default_props)
            .field("style_sheet", &self.style_sheet.is_some())
            .field("constructible", &self.is_constructible())
            .finish()
    }
}
