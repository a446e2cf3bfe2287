//! Ameliorate core
//!
//! Two engines shared by every ameliorate component:
//!
//! - the component base bridge ([`component`]), which adapts the host
//!   lifecycle to a logic instance with shallow-equality render gating,
//!   method proxying and render-id keyed caching;
//! - the prop-type validator engine ([`prop_types`]), which checks property
//!   bags against declared specs during development.
//!
//! Style sheets ([`style`]), configuration ([`shared`]) and logging ([`log`])
//! round out what concrete components need.

pub mod log;

pub mod domain;
pub mod shared;

pub mod prop_types;

pub mod component;

pub mod style;

pub use component::{component_factory, Component, ComponentDefinition, Host, Logic, RenderCx, UpdateCx};
pub use domain::{ComponentError, Element, Node, PropTypeError, PropTypesError, PropValue, Props, State};
pub use prop_types::{Location, PropTypeSpecs, PropTypes};
pub use shared::{BuildMode, Config, DirectAccess};
