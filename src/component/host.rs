//! Host driver
//!
//! Drives one component through the host lifecycle in strict order:
//! construct, mount (first render then `did_mount`), any number of updates,
//! unmount. Each update runs `should_update` with the incoming props and the
//! queued state and renders only when it returns true.

use crate::domain::element::Node;
use crate::domain::errors::ComponentError;
use crate::domain::value::{PropValue, Props};
use crate::log::COMPONENT_TARGET;
use crate::prop_types::PropTypes;
use crate::shared::config::Config;
use crate::style::Theme;

use super::base::Component;
use super::definition::ComponentDefinition;

/// Where the hosted component is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPhase {
    Constructed,
    Mounted,
    Unmounted,
}

/// Shared services handed to every component a host constructs
#[derive(Clone, Debug, Default)]
pub struct HostEnv {
    pub prop_types: PropTypes,
    pub theme: Theme,
}

impl HostEnv {
    pub fn new(prop_types: PropTypes, theme: Theme) -> Self {
        Self { prop_types, theme }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(PropTypes::from_config(config), Theme::default())
    }
}

/// One hosted component and its last rendered output
#[derive(Debug)]
pub struct Host {
    component: Component,
    output: Node,
    phase: HostPhase,
}

impl Host {
    pub fn construct(
        definition: &ComponentDefinition,
        props: Props,
        env: &HostEnv,
    ) -> Result<Self, ComponentError> {
        let component = Component::construct(definition, props, &env.prop_types, &env.theme)?;
        Ok(Self {
            component,
            output: Node::Empty,
            phase: HostPhase::Constructed,
        })
    }

    /// Render for the first time and signal mount. State queued during mount
    /// is flushed right away.
    pub fn mount(&mut self) -> Result<&Node, ComponentError> {
        self.expect_phase(HostPhase::Constructed, "mount")?;

        self.output = self.component.render()?;
        self.component.did_mount()?;
        self.phase = HostPhase::Mounted;

        if self.component.pending_state().is_some() {
            self.flush()?;
        }
        Ok(&self.output)
    }

    /// Deliver new props (and any queued state). Returns whether a render happened.
    pub fn update(&mut self, props: Props) -> Result<bool, ComponentError> {
        self.expect_phase(HostPhase::Mounted, "update")?;
        let state = self.component.next_state()?;
        let updated = self.component.should_update(props, state)?;
        if updated {
            self.output = self.component.render()?;
        }
        tracing::trace!(target: COMPONENT_TARGET, component = %self.component.name(), updated, "update pass");
        Ok(updated)
    }

    /// Re-run an update with the current props, applying queued state
    pub fn flush(&mut self) -> Result<bool, ComponentError> {
        let props = self.component.props().clone();
        self.update(props)
    }

    /// Call a proxied method, then flush any state it queued
    pub fn dispatch(&mut self, method: &str, args: &[PropValue]) -> Result<PropValue, ComponentError> {
        self.expect_phase(HostPhase::Mounted, "dispatch")?;
        let result = self.component.call(method, args)?;
        if self.component.pending_state().is_some() {
            self.flush()?;
        }
        Ok(result)
    }

    pub fn unmount(&mut self) -> Result<(), ComponentError> {
        self.expect_phase(HostPhase::Mounted, "unmount")?;
        self.component.will_unmount()?;
        self.phase = HostPhase::Unmounted;
        Ok(())
    }

    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    pub fn output(&self) -> &Node {
        &self.output
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }

    fn expect_phase(&self, expected: HostPhase, operation: &str) -> Result<(), ComponentError> {
        if self.phase == expected {
            return Ok(());
        }
        Err(ComponentError::Lifecycle {
            component: self.component.name().to_string(),
            message: format!("cannot {} while {:?}", operation, self.phase),
        })
    }
}
