//! Style sheets and themes
//!
//! A sheet is a function of the active [`Theme`] producing named rules. Sheets
//! can layer over other sheets; when resolved, the merged sheets are applied
//! first and the sheet's own rules override them property by property.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::domain::value::{PropValue, Props};

/// Resolved rules: rule name -> style properties
pub type Styles = BTreeMap<String, Props>;

/// Named values a style sheet can read (colors, spacing, fonts...)
#[derive(Clone, Debug, Default)]
pub struct Theme {
    name: String,
    values: Props,
}

impl Theme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Props::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(key, value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for a key, `undefined` when the theme does not define it
    pub fn get(&self, key: &str) -> PropValue {
        self.values.value(key)
    }

    /// Value for a key, or `fallback` when the theme does not define it
    pub fn get_or(&self, key: &str, fallback: impl Into<PropValue>) -> PropValue {
        match self.values.get(key) {
            Some(value) if !value.is_nullish() => value.clone(),
            _ => fallback.into(),
        }
    }
}

type StyleFactory = Rc<dyn Fn(&Theme) -> Styles>;

/// A theme-dependent set of named style rules
#[derive(Clone)]
pub struct StyleSheet {
    factory: StyleFactory,
    merged: Vec<StyleSheet>,
}

impl StyleSheet {
    pub fn new(factory: impl Fn(&Theme) -> Styles + 'static) -> Self {
        Self {
            factory: Rc::new(factory),
            merged: Vec::new(),
        }
    }

    /// Layer this sheet over `base`. Several bases are applied in the order given.
    pub fn merge_styles(mut self, base: StyleSheet) -> Self {
        self.merged.push(base);
        self
    }

    /// Evaluate against a theme
    pub fn resolve(&self, theme: &Theme) -> Styles {
        let mut styles = Styles::new();
        for base in &self.merged {
            merge_into(&mut styles, base.resolve(theme));
        }
        merge_into(&mut styles, (self.factory)(theme));
        styles
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("merged", &self.merged.len())
            .finish()
    }
}

fn merge_into(target: &mut Styles, layer: Styles) {
    for (name, rule) in layer {
        target.entry(name).or_default().merge(rule);
    }
}

/// Build a [`Styles`] table from `(rule, properties)` pairs
pub fn styles<K: Into<String>>(rules: impl IntoIterator<Item = (K, Props)>) -> Styles {
    rules.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_modal() -> StyleSheet {
        StyleSheet::new(|theme| {
            styles([
                (
                    "container",
                    Props::new()
                        .with("padding", 8)
                        .with("backgroundColor", theme.get_or("MAIN_COLOR", "#fff")),
                ),
                ("formContainer", Props::new().with("alignItems", "center")),
            ])
        })
    }

    #[test]
    fn test_own_rules_override_merged() {
        let sheet = StyleSheet::new(|_| {
            styles([("formContainer", Props::new().with("alignItems", "stretch"))])
        })
        .merge_styles(generic_modal());

        let resolved = sheet.resolve(&Theme::new("default"));

        assert_eq!(
            resolved["formContainer"].value("alignItems").as_str(),
            Some("stretch")
        );
        assert_eq!(resolved["container"].value("padding").as_number(), Some(8.0));
    }

    #[test]
    fn test_rules_merge_per_property() {
        let sheet = StyleSheet::new(|_| styles([("container", Props::new().with("flex", 1))]))
            .merge_styles(generic_modal());

        let resolved = sheet.resolve(&Theme::new("default"));
        let container = &resolved["container"];

        assert_eq!(container.value("flex").as_number(), Some(1.0));
        assert_eq!(container.value("padding").as_number(), Some(8.0));
    }

    #[test]
    fn test_theme_values_reach_rules() {
        let theme = Theme::new("dark").with("MAIN_COLOR", "#222");
        let resolved = generic_modal().resolve(&theme);
        assert_eq!(
            resolved["container"].value("backgroundColor").as_str(),
            Some("#222")
        );
        assert_eq!(theme.name(), "dark");
    }
}
