//! The logic instance contract
//!
//! A [`Logic`] value implements a component's behavior: how props are
//! resolved, how state is derived, what to do when a prop changes and what to
//! render. It never sees the host lifecycle directly; the wrapper
//! ([`super::Component`]) drives it.
//!
//! Methods callable from outside (event handlers, imperative APIs) are declared
//! with [`proxy_methods!`], which generates the name table and the dispatch
//! match at compile time.

use std::cell::RefCell;
use std::rc::Weak;

use crate::domain::element::Node;
use crate::domain::value::{Callback, PropValue, Props, State};
use crate::log::COMPONENT_TARGET;
use crate::style::{generate_style_names, style, StyleArg, Styles};

use super::base::RenderId;
use super::instance::{BoundMethod, Instance};

/// Lifecycle hook names that are never proxied onto the wrapper
pub const LIFECYCLE_METHODS: &[&str] = &[
    "new",
    "construct",
    "will_mount",
    "did_mount",
    "will_unmount",
    "will_receive_props",
    "should_update",
    "will_update",
    "did_update",
    "did_catch",
    "render",
    "get_mount_state",
    "measure",
];

/// Methods the wrapper already defines; a logic method with one of these names
/// would shadow the wrapper's own API
pub const WRAPPER_METHODS: &[&str] = &[
    "call",
    "bind",
    "name",
    "definition",
    "props",
    "resolved_props",
    "state",
    "next_state",
    "pending_state",
    "set_state",
    "get_state",
    "force_update",
    "render_id",
    "previous_render_id",
    "render_count",
    "prop_update_counter",
    "state_update_counter",
    "is_mounted",
    "prop_type_failures",
    "proxied_methods",
    "intercept_render",
];

/// Default proxy filter: everything except lifecycle hooks and wrapper methods
pub fn proxy_component_instance_method(name: &str) -> bool {
    !LIFECYCLE_METHODS.contains(&name) && !WRAPPER_METHODS.contains(&name)
}

/// Behavior of a component, owned by exactly one wrapper
pub trait Logic: 'static {
    /// Names of the methods [`Logic::invoke`] dispatches
    fn methods(&self) -> &'static [&'static str] {
        &[]
    }

    /// Call a declared method by name. `None` when the name is not declared.
    fn invoke(
        &mut self,
        _cx: &mut UpdateCx<'_>,
        _method: &str,
        _args: &[PropValue],
    ) -> Option<PropValue> {
        None
    }

    /// Map incoming props (defaults already applied) to the props the
    /// component works with
    fn resolve_props(&mut self, _cx: &mut UpdateCx<'_>, props: Props) -> Props {
        props
    }

    /// State patch derived after props were resolved
    fn resolve_state(&mut self, _cx: &mut UpdateCx<'_>, _initial: bool) -> State {
        State::new()
    }

    /// A prop changed (or was provided at construction)
    fn on_prop_updated(&mut self, _cx: &mut UpdateCx<'_>, _name: &str, _value: &PropValue) {}

    fn did_mount(&mut self, _cx: &mut UpdateCx<'_>) {}

    fn will_unmount(&mut self, _cx: &mut UpdateCx<'_>) {}

    fn render(&self, cx: &RenderCx<'_>) -> Node;
}

/// Declare the methods of a [`Logic`] implementation that can be called by
/// name. Each method must have the signature
/// `fn(&mut self, &mut UpdateCx<'_>, &[PropValue]) -> PropValue`.
///
/// ```ignore
/// impl Logic for PagerBar {
///     proxy_methods!(on_tab_press, get_direction);
///     fn render(&self, cx: &RenderCx<'_>) -> Node { ... }
/// }
/// ```
#[macro_export]
macro_rules! proxy_methods {
    ($($method:ident),* $(,)?) => {
        fn methods(&self) -> &'static [&'static str] {
            &[$(stringify!($method)),*]
        }

        fn invoke(
            &mut self,
            cx: &mut $crate::component::UpdateCx<'_>,
            method: &str,
            args: &[$crate::domain::value::PropValue],
        ) -> Option<$crate::domain::value::PropValue> {
            let _ = (&cx, &args);
            match method {
                $(stringify!($method) => Some(self.$method(cx, args)),)*
                _ => None,
            }
        }
    };
}

/// How `set_state` applies a patch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StateMode {
    /// Merge into state right away (construction, prop resolution)
    Immediate,
    /// Queue for the host's next update pass
    Queued,
}

/// Lifecycle phase of an instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Mounted,
    Unmounted,
}

/// Instance data the logic can read and write through its contexts
#[derive(Debug)]
pub(crate) struct Core {
    pub(crate) name: String,
    pub(crate) props: Props,
    pub(crate) state: State,
    pub(crate) pending: Option<State>,
    pub(crate) phase: Phase,
}

/// Mutable view handed to lifecycle hooks and proxied methods
pub struct UpdateCx<'a> {
    core: &'a mut Core,
    mode: StateMode,
}

impl<'a> UpdateCx<'a> {
    pub(crate) fn new(core: &'a mut Core, mode: StateMode) -> Self {
        Self { core, mode }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Resolved props
    pub fn props(&self) -> &Props {
        &self.core.props
    }

    pub fn prop(&self, name: &str) -> PropValue {
        self.core.props.value(name)
    }

    pub fn state(&self) -> &State {
        &self.core.state
    }

    /// State value for `key`, or `default` when it is absent or undefined
    pub fn get_state(&self, key: &str, default: impl Into<PropValue>) -> PropValue {
        get_state(&self.core.state, key, default)
    }

    pub fn is_mounted(&self) -> bool {
        self.core.phase == Phase::Mounted
    }

    /// Shallow-merge `patch` into state. Ignored once unmounted.
    pub fn set_state(&mut self, patch: State) {
        if self.core.phase == Phase::Unmounted {
            tracing::debug!(
                target: COMPONENT_TARGET,
                component = %self.core.name,
                "set_state after unmount ignored"
            );
            return;
        }

        match self.mode {
            StateMode::Immediate => self.core.state.merge(patch),
            StateMode::Queued => self
                .core
                .pending
                .get_or_insert_with(State::new)
                .merge(patch),
        }
    }

    /// Call a function prop. Returns `undefined` when the prop is not a function.
    pub fn call_provided_callback(&self, name: &str, args: &[PropValue]) -> PropValue {
        match self.core.props.get(name) {
            Some(PropValue::Function(callback)) => callback.call(args),
            _ => PropValue::Undefined,
        }
    }
}

/// Read-only view handed to [`Logic::render`]
pub struct RenderCx<'a> {
    pub(crate) core: &'a Core,
    pub(crate) styles: &'a Styles,
    pub(crate) render_id: RenderId,
    pub(crate) this: &'a Weak<RefCell<Instance>>,
}

impl<'a> RenderCx<'a> {
    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn props(&self) -> &Props {
        &self.core.props
    }

    pub fn prop(&self, name: &str) -> PropValue {
        self.core.props.value(name)
    }

    pub fn state(&self) -> &State {
        &self.core.state
    }

    pub fn get_state(&self, key: &str, default: impl Into<PropValue>) -> PropValue {
        get_state(&self.core.state, key, default)
    }

    pub fn render_id(&self) -> RenderId {
        self.render_id
    }

    /// Resolved style sheet of the component
    pub fn styles(&self) -> &Styles {
        self.styles
    }

    /// Flatten style arguments against the component's sheet
    pub fn style(&self, args: &[StyleArg]) -> Props {
        style(self.styles, args)
    }

    pub fn generate_style_names(&self, prefix: &str, base: &str, flags: &[(&str, bool)]) -> Vec<String> {
        generate_style_names(prefix, base, flags)
    }

    /// A function value that calls `method` on this instance with `bound`
    /// followed by the call's own arguments. The binding does not keep the
    /// instance alive and does nothing once the component is unmounted.
    pub fn bind(&self, method: &str, bound: Vec<PropValue>) -> PropValue {
        let bound_method = BoundMethod::new(self.this.clone(), method, bound);
        PropValue::Function(Callback::new(move |args| {
            bound_method.call(args).unwrap_or_else(|err| {
                tracing::warn!(target: COMPONENT_TARGET, "{}", err);
                PropValue::Undefined
            })
        }))
    }
}

fn get_state(state: &State, key: &str, default: impl Into<PropValue>) -> PropValue {
    match state.get(key) {
        Some(value) if !matches!(value, PropValue::Undefined) => value.clone(),
        _ => default.into(),
    }
}
