//! Style sheets, theme-bound resolution and style flattening

pub mod names;
pub mod sheet;

pub use names::{generate_style_names, style, StyleArg};
pub use sheet::{styles, StyleSheet, Styles, Theme};
