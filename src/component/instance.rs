//! Logic instance: resolved props, state, render cache and interceptors

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::domain::element::Node;
use crate::domain::errors::ComponentError;
use crate::domain::value::{PropValue, Props, State};
use crate::log::COMPONENT_TARGET;
use crate::style::Styles;

use super::base::RenderId;
use super::logic::{Core, Logic, Phase, RenderCx, StateMode, UpdateCx};

/// Post-processor applied to every fresh render output
pub type RenderInterceptor = Rc<dyn Fn(&RenderCx<'_>, Node) -> Node>;

/// The logic object plus everything the bridge keeps on its behalf
pub struct Instance {
    logic: Box<dyn Logic>,
    core: Core,
    styles: Styles,
    interceptors: Vec<RenderInterceptor>,
    render_cache: Option<(RenderId, Node)>,
    previous_render_id: Option<RenderId>,
    this: Weak<RefCell<Instance>>,
}

impl Instance {
    /// Create the instance and run initial prop/state resolution
    pub(crate) fn create(
        name: &str,
        logic: Box<dyn Logic>,
        props: &Props,
        styles: Styles,
    ) -> Rc<RefCell<Instance>> {
        let instance = Rc::new_cyclic(|this| {
            RefCell::new(Instance {
                logic,
                core: Core {
                    name: name.to_string(),
                    props: Props::new(),
                    state: State::new(),
                    pending: None,
                    phase: Phase::Constructed,
                },
                styles,
                interceptors: Vec::new(),
                render_cache: None,
                previous_render_id: None,
                this: this.clone(),
            })
        });

        instance
            .borrow_mut()
            .resolve(true, props, &Props::new());
        instance
    }

    /// Resolve props, fire per-prop hooks for changed keys and merge the
    /// derived state. `new_props`/`old_props` are the incoming bags with
    /// defaults applied.
    pub(crate) fn resolve(&mut self, initial: bool, new_props: &Props, old_props: &Props) {
        let mut cx = UpdateCx::new(&mut self.core, StateMode::Immediate);

        let resolved = self.logic.resolve_props(&mut cx, new_props.clone());
        drop(cx);
        self.core.props = resolved;

        let mut cx = UpdateCx::new(&mut self.core, StateMode::Immediate);
        for name in changed_keys(new_props, old_props) {
            let value = new_props.value(&name);
            if initial && matches!(value, PropValue::Undefined) {
                continue;
            }
            tracing::trace!(target: COMPONENT_TARGET, component = %cx.name(), prop = %name, "prop updated");
            self.logic.on_prop_updated(&mut cx, &name, &value);
        }

        let patch = self.logic.resolve_state(&mut cx, initial);
        cx.set_state(patch);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.core.phase = phase;
    }

    pub fn phase(&self) -> Phase {
        self.core.phase
    }

    pub(crate) fn did_mount(&mut self) {
        let mut cx = UpdateCx::new(&mut self.core, StateMode::Queued);
        self.logic.did_mount(&mut cx);
    }

    pub(crate) fn will_unmount(&mut self) {
        let mut cx = UpdateCx::new(&mut self.core, StateMode::Queued);
        self.logic.will_unmount(&mut cx);
    }

    /// Replace committed state
    pub(crate) fn commit_state(&mut self, state: State) {
        self.core.state = state;
    }

    pub(crate) fn take_pending(&mut self) -> Option<State> {
        self.core.pending.take()
    }

    pub fn props(&self) -> &Props {
        &self.core.props
    }

    pub fn state(&self) -> &State {
        &self.core.state
    }

    pub fn pending_state(&self) -> Option<&State> {
        self.core.pending.as_ref()
    }

    pub fn methods(&self) -> &'static [&'static str] {
        self.logic.methods()
    }

    pub fn previous_render_id(&self) -> Option<RenderId> {
        self.previous_render_id
    }

    pub(crate) fn set_previous_render_id(&mut self, render_id: RenderId) {
        self.previous_render_id = Some(render_id);
    }

    /// Register an interceptor. Cached output predates it, so the cache is dropped.
    pub(crate) fn add_interceptor(&mut self, interceptor: RenderInterceptor) {
        self.interceptors.push(interceptor);
        self.render_cache = None;
    }

    /// Most recent render output, or an empty node if nothing is cached
    pub(crate) fn last_output(&self) -> Node {
        self.render_cache
            .as_ref()
            .map(|(_, node)| node.clone())
            .unwrap_or(Node::Empty)
    }

    /// Drop the cached output if it was produced under another render id
    pub(crate) fn invalidate_render_cache(&mut self, render_id: RenderId) {
        if let Some((cached_id, _)) = &self.render_cache {
            if *cached_id != render_id {
                tracing::trace!(
                    target: COMPONENT_TARGET,
                    component = %self.core.name,
                    stale = %cached_id,
                    current = %render_id,
                    "render cache invalidated"
                );
                self.render_cache = None;
            }
        }
    }

    /// Produce output for `render_id`: the cached node when still valid,
    /// otherwise a fresh render passed through every interceptor
    pub(crate) fn render_interceptor(&mut self, render_id: RenderId) -> Node {
        if let Some((cached_id, node)) = &self.render_cache {
            if *cached_id == render_id {
                return node.clone();
            }
        }

        let cx = RenderCx {
            core: &self.core,
            styles: &self.styles,
            render_id,
            this: &self.this,
        };
        let mut node = self.logic.render(&cx);
        for interceptor in &self.interceptors {
            node = interceptor(&cx, node);
        }

        self.render_cache = Some((render_id, node.clone()));
        node
    }

    /// Dispatch a declared method. `None` if the logic does not declare it.
    pub(crate) fn invoke(&mut self, method: &str, args: &[PropValue]) -> Option<PropValue> {
        let mut cx = UpdateCx::new(&mut self.core, StateMode::Queued);
        self.logic.invoke(&mut cx, method, args)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("core", &self.core)
            .field("interceptors", &self.interceptors.len())
            .field("render_cache", &self.render_cache.as_ref().map(|(id, _)| *id))
            .field("previous_render_id", &self.previous_render_id)
            .finish()
    }
}

/// Keys whose values differ (strict equality) between two bags, in key order
fn changed_keys(new_props: &Props, old_props: &Props) -> Vec<String> {
    let mut keys: Vec<String> = new_props
        .iter()
        .filter(|(key, value)| !old_props.get(key).map_or(false, |old| old.strict_eq(value)))
        .map(|(key, _)| key.to_string())
        .collect();
    keys.extend(
        old_props
            .keys()
            .filter(|key| !new_props.contains_key(key))
            .filter(|key| !matches!(old_props.get(key), Some(PropValue::Undefined)))
            .map(str::to_string),
    );
    keys.sort();
    keys
}

/// A method bound to an instance with leading arguments.
///
/// Holds only a weak reference: once the wrapper is gone, or after unmount,
/// calling it is a no-op returning `undefined`.
#[derive(Clone)]
pub struct BoundMethod {
    instance: Weak<RefCell<Instance>>,
    method: String,
    bound: Vec<PropValue>,
}

impl BoundMethod {
    pub(crate) fn new(instance: Weak<RefCell<Instance>>, method: &str, bound: Vec<PropValue>) -> Self {
        Self {
            instance,
            method: method.to_string(),
            bound,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn call(&self, args: &[PropValue]) -> Result<PropValue, ComponentError> {
        let Some(instance) = self.instance.upgrade() else {
            return Ok(PropValue::Undefined);
        };
        let mut instance = instance.try_borrow_mut().map_err(|_| {
            ComponentError::Busy(self.method.clone())
        })?;

        if instance.phase() == Phase::Unmounted {
            tracing::debug!(
                target: COMPONENT_TARGET,
                component = %instance.core.name,
                method = %self.method,
                "call after unmount ignored"
            );
            return Ok(PropValue::Undefined);
        }

        let mut full_args = self.bound.clone();
        full_args.extend_from_slice(args);
        let component = instance.core.name.clone();
        instance
            .invoke(&self.method, &full_args)
            .ok_or_else(|| ComponentError::UnknownMethod {
                component,
                method: self.method.clone(),
            })
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("method", &self.method)
            .field("bound", &self.bound)
            .field("alive", &(self.instance.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::Element;

    #[test]
    fn test_changed_keys() {
        let old = Props::new().with("a", 1).with("b", 2).with("gone", 3);
        let new = Props::new().with("a", 1).with("b", 5).with("added", true);
        assert_eq!(changed_keys(&new, &old), vec!["added", "b", "gone"]);
    }

    struct Echo;

    impl Logic for Echo {
        fn render(&self, cx: &RenderCx<'_>) -> Node {
            Element::new("Text")
                .child(cx.render_id().to_string())
                .into()
        }
    }

    #[test]
    fn test_render_cache_reuse_and_invalidation() {
        let instance = Instance::create("Echo", Box::new(Echo), &Props::new(), Styles::new());
        let mut instance = instance.borrow_mut();

        let first_id = RenderId::new(0, 0);
        let first = instance.render_interceptor(first_id);
        let again = instance.render_interceptor(first_id);
        assert!(first.ptr_eq(&again));

        let next_id = RenderId::new(1, 0);
        instance.invalidate_render_cache(next_id);
        let fresh = instance.render_interceptor(next_id);
        assert!(!first.ptr_eq(&fresh));
        assert_eq!(fresh.text(), "1/0");
    }

    #[test]
    fn test_interceptors_apply_in_order() {
        let instance = Instance::create("Echo", Box::new(Echo), &Props::new(), Styles::new());
        let mut instance = instance.borrow_mut();
        instance.add_interceptor(Rc::new(|_: &RenderCx<'_>, node: Node| -> Node {
            Element::new("First").child(node).into()
        }));
        instance.add_interceptor(Rc::new(|cx: &RenderCx<'_>, node: Node| -> Node {
            Element::new("Second")
                .prop("component", cx.name())
                .child(node)
                .into()
        }));

        let node = instance.render_interceptor(RenderId::new(0, 0));
        let outer = node.as_element().expect("element");
        assert_eq!(outer.kind(), "Second");
        assert_eq!(outer.prop_values().value("component").as_str(), Some("Echo"));
        assert_eq!(outer.child_nodes()[0].as_element().map(Element::kind), Some("First"));
    }

    #[test]
    fn test_bound_method_on_dropped_instance_is_noop() {
        let instance = Instance::create("Echo", Box::new(Echo), &Props::new(), Styles::new());
        let bound = BoundMethod::new(Rc::downgrade(&instance), "anything", Vec::new());
        drop(instance);
        assert!(matches!(bound.call(&[]), Ok(PropValue::Undefined)));
    }
}
