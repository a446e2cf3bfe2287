//! Component wrapper
//!
//! [`Component`] is the object the host talks to. It owns the logic instance,
//! tracks prop/state/render counters, gates re-renders on shallow equality and
//! exposes the instance's proxied methods.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::domain::element::Node;
use crate::domain::errors::{ComponentError, PropTypeError};
use crate::domain::value::{PropValue, Props, State};
use crate::log::COMPONENT_TARGET;
use crate::prop_types::{Location, PropTypes};
use crate::style::Theme;

use super::definition::ComponentDefinition;
use super::instance::{BoundMethod, Instance, RenderInterceptor};
use super::logic::{Phase, RenderCx};

/// Identifies a render pass by the prop and state update counters.
/// Displays as `"{props}/{state}"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderId {
    pub props: u64,
    pub state: u64,
}

impl RenderId {
    pub fn new(props: u64, state: u64) -> Self {
        Self { props, state }
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.props, self.state)
    }
}

/// Host-facing wrapper around one logic instance
pub struct Component {
    definition: ComponentDefinition,
    prop_types: PropTypes,
    /// Incoming props with defaults applied
    props: Props,
    instance: Rc<RefCell<Instance>>,
    prop_update_counter: u64,
    state_update_counter: u64,
    render_count: u64,
    mounted: bool,
    failures: Vec<PropTypeError>,
}

impl Component {
    /// Construct the logic instance from `definition` and resolve its initial
    /// props and state.
    ///
    /// Fails with [`ComponentError::NotConstructible`] when the definition has
    /// no constructor.
    pub fn construct(
        definition: &ComponentDefinition,
        props: Props,
        prop_types: &PropTypes,
        theme: &Theme,
    ) -> Result<Self, ComponentError> {
        let props = definition.apply_default_props(props);
        let logic = definition.instantiate(&props)?;
        let failures = validate(definition, prop_types, &props);

        let styles = definition
            .sheet()
            .map(|sheet| sheet.resolve(theme))
            .unwrap_or_default();
        let instance = Instance::create(definition.name(), logic, &props, styles);

        tracing::debug!(target: COMPONENT_TARGET, component = %definition.name(), "constructed");

        Ok(Self {
            definition: definition.clone(),
            prop_types: prop_types.clone(),
            props,
            instance,
            prop_update_counter: 0,
            state_update_counter: 0,
            render_count: 0,
            mounted: false,
            failures,
        })
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    /// Decide whether the host should re-render.
    ///
    /// Returns false when both bags are shallow-equal to the current ones.
    /// Otherwise changed props are validated and forwarded to prop resolution,
    /// changed state bumps the state counter, and true is returned. The next
    /// props and state are committed either way.
    ///
    /// After unmount this is a no-op returning false.
    pub fn should_update(&mut self, next_props: Props, next_state: State) -> Result<bool, ComponentError> {
        let mut instance = borrow_mut(&self.instance, self.definition.name())?;
        if instance.phase() == Phase::Unmounted {
            tracing::debug!(target: COMPONENT_TARGET, component = %self.name(), "update after unmount ignored");
            return Ok(false);
        }
        let next_props = self.definition.apply_default_props(next_props);

        let props_differ = !next_props.shallow_eq(&self.props);
        let states_differ = !next_state.shallow_eq(instance.state());

        instance.commit_state(next_state);
        if !props_differ && !states_differ {
            self.props = next_props;
            return Ok(false);
        }

        if states_differ {
            self.state_update_counter += 1;
        }

        if props_differ {
            self.prop_update_counter += 1;
            self.failures = validate(&self.definition, &self.prop_types, &next_props);
            instance.resolve(false, &next_props, &self.props);
        }
        drop(instance);

        self.props = next_props;
        tracing::trace!(
            target: COMPONENT_TARGET,
            component = %self.name(),
            props_differ,
            states_differ,
            "should update"
        );
        Ok(true)
    }

    /// Mount the instance. An unmounted instance stays unmounted.
    pub fn did_mount(&mut self) -> Result<(), ComponentError> {
        let mut instance = borrow_mut(&self.instance, self.definition.name())?;
        if instance.phase() == Phase::Unmounted {
            tracing::debug!(target: COMPONENT_TARGET, component = %self.name(), "mount after unmount ignored");
            return Ok(());
        }
        self.mounted = true;
        instance.set_phase(Phase::Mounted);
        instance.did_mount();
        tracing::debug!(target: COMPONENT_TARGET, component = %self.name(), "mounted");
        Ok(())
    }

    pub fn will_unmount(&mut self) -> Result<(), ComponentError> {
        let mut instance = borrow_mut(&self.instance, self.definition.name())?;
        if instance.phase() == Phase::Unmounted {
            return Ok(());
        }
        self.mounted = false;
        instance.will_unmount();
        instance.set_phase(Phase::Unmounted);
        instance.take_pending();
        tracing::debug!(target: COMPONENT_TARGET, component = %self.name(), "unmounted");
        Ok(())
    }

    /// Render a pass: invalidate stale cache, render through the interceptors,
    /// record the render id and bump the render count.
    ///
    /// After unmount the logic is not rendered again; the last output is
    /// returned unchanged.
    pub fn render(&mut self) -> Result<Node, ComponentError> {
        let render_id = self.render_id();
        let mut instance = borrow_mut(&self.instance, self.definition.name())?;
        if instance.phase() == Phase::Unmounted {
            return Ok(instance.last_output());
        }

        instance.invalidate_render_cache(render_id);
        let node = instance.render_interceptor(render_id);
        instance.set_previous_render_id(render_id);
        drop(instance);

        self.render_count += 1;
        Ok(node)
    }

    pub fn render_id(&self) -> RenderId {
        RenderId::new(self.prop_update_counter, self.state_update_counter)
    }

    pub fn previous_render_id(&self) -> Option<RenderId> {
        self.instance.borrow().previous_render_id()
    }

    pub fn prop_update_counter(&self) -> u64 {
        self.prop_update_counter
    }

    pub fn state_update_counter(&self) -> u64 {
        self.state_update_counter
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Incoming props with defaults applied
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Props after the logic's resolution
    pub fn resolved_props(&self) -> Props {
        self.instance.borrow().props().clone()
    }

    pub fn state(&self) -> State {
        self.instance.borrow().state().clone()
    }

    pub fn pending_state(&self) -> Option<State> {
        self.instance.borrow().pending_state().cloned()
    }

    /// Committed state with the queued patch merged over it, consuming the patch
    pub fn next_state(&mut self) -> Result<State, ComponentError> {
        let mut instance = borrow_mut(&self.instance, self.definition.name())?;
        let mut next = instance.state().clone();
        if let Some(patch) = instance.take_pending() {
            next.merge(patch);
        }
        Ok(next)
    }

    /// Failures from the most recent prop validation
    pub fn prop_type_failures(&self) -> &[PropTypeError] {
        &self.failures
    }

    /// Names of the logic methods callable through [`Component::call`]
    pub fn proxied_methods(&self) -> Vec<&'static str> {
        let filter = self.definition.filter();
        self.instance
            .borrow()
            .methods()
            .iter()
            .copied()
            .filter(|name| filter(name))
            .collect()
    }

    /// Register a render interceptor on the instance
    pub fn intercept_render(&self, interceptor: impl Fn(&RenderCx<'_>, Node) -> Node + 'static) {
        let interceptor: RenderInterceptor = Rc::new(interceptor);
        self.instance.borrow_mut().add_interceptor(interceptor);
    }

    /// Call a proxied logic method. After unmount this is a no-op returning
    /// `undefined`.
    pub fn call(&self, method: &str, args: &[PropValue]) -> Result<PropValue, ComponentError> {
        self.bind(method, Vec::new())?.call(args)
    }

    /// Bind a proxied logic method with leading arguments
    pub fn bind(&self, method: &str, bound: Vec<PropValue>) -> Result<BoundMethod, ComponentError> {
        self.check_proxied(method)?;
        Ok(BoundMethod::new(Rc::downgrade(&self.instance), method, bound))
    }

    fn check_proxied(&self, method: &str) -> Result<(), ComponentError> {
        let declared = self
            .instance
            .try_borrow()
            .map_err(|_| ComponentError::Busy(self.name().to_string()))?
            .methods()
            .contains(&method);

        if !declared {
            return Err(ComponentError::UnknownMethod {
                component: self.name().to_string(),
                method: method.to_string(),
            });
        }
        if !(self.definition.filter())(method) {
            return Err(ComponentError::MethodNotProxied {
                component: self.name().to_string(),
                method: method.to_string(),
            });
        }
        Ok(())
    }

}

fn borrow_mut<'a>(instance: &'a Rc<RefCell<Instance>>, name: &str) -> Result<RefMut<'a, Instance>, ComponentError> {
    instance
        .try_borrow_mut()
        .map_err(|_| ComponentError::Busy(name.to_string()))
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("render_id", &self.render_id())
            .field("render_count", &self.render_count)
            .field("mounted", &self.mounted)
            .finish()
    }
}

fn validate(definition: &ComponentDefinition, prop_types: &PropTypes, props: &Props) -> Vec<PropTypeError> {
    if definition.specs().is_empty() {
        return Vec::new();
    }
    prop_types.check_prop_types(
        definition.specs(),
        props,
        Location::Prop,
        definition.name(),
        None,
    )
}
