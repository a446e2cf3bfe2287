//! Style name generation and `style(...)` flattening

use crate::domain::value::{PropValue, Props};

use super::sheet::Styles;

/// Derive rule names for a base name, a prefix (usually a direction or
/// variant) and a set of flags.
///
/// `("horizontal", "tabButton", [("active", true)])` yields
/// `tabButton, horizontalTabButton, tabButtonActive, horizontalTabButtonActive`.
/// Flags that are off are skipped, as is an empty prefix.
pub fn generate_style_names(prefix: &str, base: &str, flags: &[(&str, bool)]) -> Vec<String> {
    let prefixed = (!prefix.is_empty()).then(|| format!("{}{}", prefix, capitalize(base)));
    let active: Vec<&str> = flags
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();

    let mut names = vec![base.to_string()];
    names.extend(prefixed.clone());
    names.extend(active.iter().map(|flag| format!("{}{}", base, capitalize(flag))));
    if let Some(prefixed) = prefixed {
        names.extend(
            active
                .iter()
                .map(|flag| format!("{}{}", prefixed, capitalize(flag))),
        );
    }
    names
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One argument to [`style`]
#[derive(Clone, Debug)]
pub enum StyleArg {
    /// Nothing (absent prop, disabled flag)
    None,
    /// A rule name looked up in the resolved sheet
    Name(String),
    /// An inline style object
    Inline(Props),
    /// Nested arguments, flattened in order
    List(Vec<StyleArg>),
}

impl StyleArg {
    /// Interpret a prop value as a style argument.
    ///
    /// Strings are rule names, objects are inline styles, arrays nest. Anything
    /// else (`undefined`, `null`, `false`, numbers) contributes nothing.
    pub fn from_value(value: &PropValue) -> Self {
        match value {
            PropValue::String(name) => StyleArg::Name(name.clone()),
            PropValue::Object(map) => StyleArg::Inline(Props::from((**map).clone())),
            PropValue::Array(items) => StyleArg::List(items.iter().map(StyleArg::from_value).collect()),
            _ => StyleArg::None,
        }
    }
}

impl From<&str> for StyleArg {
    fn from(name: &str) -> Self {
        StyleArg::Name(name.to_string())
    }
}

impl From<String> for StyleArg {
    fn from(name: String) -> Self {
        StyleArg::Name(name)
    }
}

impl From<Props> for StyleArg {
    fn from(style: Props) -> Self {
        StyleArg::Inline(style)
    }
}

impl From<&PropValue> for StyleArg {
    fn from(value: &PropValue) -> Self {
        StyleArg::from_value(value)
    }
}

impl From<PropValue> for StyleArg {
    fn from(value: PropValue) -> Self {
        StyleArg::from_value(&value)
    }
}

impl<T: Into<StyleArg>> From<Vec<T>> for StyleArg {
    fn from(items: Vec<T>) -> Self {
        StyleArg::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StyleArg>> From<Option<T>> for StyleArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(StyleArg::None, Into::into)
    }
}

/// Flatten style arguments into one style object. Later entries win; rule
/// names missing from the sheet are ignored.
pub fn style(styles: &Styles, args: &[StyleArg]) -> Props {
    let mut out = Props::new();
    for arg in args {
        apply(&mut out, styles, arg);
    }
    out
}

fn apply(out: &mut Props, styles: &Styles, arg: &StyleArg) {
    match arg {
        StyleArg::None => {}
        StyleArg::Name(name) => {
            if let Some(rule) = styles.get(name) {
                out.merge(rule.clone());
            }
        }
        StyleArg::Inline(inline) => out.merge(inline.clone()),
        StyleArg::List(items) => {
            for item in items {
                apply(out, styles, item);
            }
        }
    }
}
