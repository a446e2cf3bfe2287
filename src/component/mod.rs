//! Component base bridge
//!
//! Bridges the host lifecycle (construct, should_update, did_mount,
//! will_unmount, render) to a [`Logic`] instance:
//!
//! - [`Component`] is the wrapper the host drives. It gates re-renders on
//!   shallow prop/state equality and keeps the counters a [`RenderId`] is
//!   derived from.
//! - [`Instance`] owns the logic, its resolved props and state, the render
//!   cache and the render interceptors.
//! - [`ComponentDefinition`] describes a component statically and builds its
//!   logic; [`component_factory`] is the usual way to create one.
//! - [`Host`] drives a component through the lifecycle in order.

pub mod base;
pub mod definition;
pub mod host;
pub mod instance;
pub mod logic;

pub use base::{Component, RenderId};
pub use definition::{component_factory, ComponentDefinition, ProxyFilter};
pub use host::{Host, HostEnv, HostPhase};
pub use instance::{BoundMethod, Instance, RenderInterceptor};
pub use logic::{
    proxy_component_instance_method, Logic, Phase, RenderCx, UpdateCx, LIFECYCLE_METHODS,
    WRAPPER_METHODS,
};
