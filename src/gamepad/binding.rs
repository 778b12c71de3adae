//! # Control Binding Table
//!
//! Per-device map from physical control index to a typed handler.
//!
//! Handlers are a closed set of variants rather than boxed closures:
//!
//! - [`DigitalHandler`]: forwards press/release of one button.
//! - [`AnalogueHandler`]: forwards a trigger as a thresholded analog key.
//! - [`AxisHandler`]: splits one axis into two opposite GUI directions and
//!   optionally drives a component of the cube rotation.
//!
//! ## Deadzone policy
//!
//! The deadzone only filters what the GUI sees. For an axis value `v`:
//!
//! - `|v| <= deadzone`: both directions are reported released with magnitude 0.
//! - otherwise the sign of `v` picks the pressed direction, which receives the
//!   full magnitude `|v|`; the opposite direction is reported released with 0.
//!
//! The rotation component always receives `v * sensitivity`, deadzone or not.
//!
//! A table is built in one step from a plan and never changes afterwards.

use crate::config::InputConfig;
use crate::gamepad::layout::{GamepadKey, PlanEntry, RotationComponent};
use crate::gui::GuiInputSink;
use crate::scene::CubeRotation;

/// Kind of physical control a binding reads.
///
/// Variant order is the dispatch order within a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlKind {
    Analogue,
    Digital,
    Axis,
}

/// Deadzone and sensitivity captured by handlers when a table is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputPolicy {
    pub deadzone: f32,
    pub sensitivity: f32,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            sensitivity: 0.05,
        }
    }
}

impl From<&InputConfig> for InputPolicy {
    fn from(config: &InputConfig) -> Self {
        Self {
            deadzone: config.deadzone,
            sensitivity: config.sensitivity,
        }
    }
}

/// Everything a handler may write to.
pub struct DispatchTargets<'a> {
    pub gui: &'a mut dyn GuiInputSink,
    pub rotation: &'a mut CubeRotation,
}

/// Forwards one button's pressed state as a GUI key event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitalHandler {
    pub key: GamepadKey,
}

impl DigitalHandler {
    /// Reports `pressed` for the bound key.
    pub fn handle(&self, pressed: bool, targets: &mut DispatchTargets<'_>) {
        targets.gui.add_key_event(self.key, pressed);
    }
}

/// Forwards a trigger value as an analog key, released at or below the deadzone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogueHandler {
    pub key: GamepadKey,
    pub deadzone: f32,
}

impl AnalogueHandler {
    /// Reports `value` as pressed when it exceeds the deadzone.
    pub fn handle(&self, value: f32, targets: &mut DispatchTargets<'_>) {
        if value > self.deadzone {
            targets.gui.add_key_analog_event(self.key, true, value);
        } else {
            targets.gui.add_key_analog_event(self.key, false, 0.0);
        }
    }
}

/// Splits one axis into two opposite GUI directions and an optional
/// rotation component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisHandler {
    pub negative: GamepadKey,
    pub positive: GamepadKey,
    pub rotation: Option<RotationComponent>,
    pub deadzone: f32,
    pub sensitivity: f32,
}

impl AxisHandler {
    /// Writes the scaled rotation, then reports the negative direction
    /// followed by the positive one.
    pub fn handle(&self, value: f32, targets: &mut DispatchTargets<'_>) {
        if let Some(component) = self.rotation {
            targets.rotation.set(component, value * self.sensitivity);
        }

        let gui = &mut *targets.gui;
        if value.abs() <= self.deadzone {
            gui.add_key_analog_event(self.negative, false, 0.0);
            gui.add_key_analog_event(self.positive, false, 0.0);
        } else if value < 0.0 {
            gui.add_key_analog_event(self.negative, true, -value);
            gui.add_key_analog_event(self.positive, false, 0.0);
        } else {
            gui.add_key_analog_event(self.negative, false, 0.0);
            gui.add_key_analog_event(self.positive, true, value);
        }
    }
}

/// Tagged handler; the tag decides which sample accessor feeds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handler {
    Digital(DigitalHandler),
    Analogue(AnalogueHandler),
    Axis(AxisHandler),
}

impl Handler {
    /// Kind of control this handler reads.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        match self {
            Handler::Digital(_) => ControlKind::Digital,
            Handler::Analogue(_) => ControlKind::Analogue,
            Handler::Axis(_) => ControlKind::Axis,
        }
    }
}

/// A handler attached to one control index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub control_index: usize,
    pub handler: Handler,
}

impl Binding {
    /// Kind of control this binding reads.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        self.handler.kind()
    }
}

/// Immutable, dispatch-ordered list of bindings for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Builds a table from `plan`, capturing `policy` in every handler.
    ///
    /// Bindings are ordered analogue, digital, axis, each by ascending
    /// control index.
    #[must_use]
    pub fn from_plan(plan: &[PlanEntry], policy: InputPolicy) -> Self {
        let mut bindings: Vec<Binding> = plan
            .iter()
            .map(|entry| match *entry {
                PlanEntry::Digital { button, key } => Binding {
                    control_index: button,
                    handler: Handler::Digital(DigitalHandler { key }),
                },
                PlanEntry::Analogue { button, key } => Binding {
                    control_index: button,
                    handler: Handler::Analogue(AnalogueHandler {
                        key,
                        deadzone: policy.deadzone,
                    }),
                },
                PlanEntry::Axis {
                    axis,
                    negative,
                    positive,
                    rotation,
                } => Binding {
                    control_index: axis,
                    handler: Handler::Axis(AxisHandler {
                        negative,
                        positive,
                        rotation,
                        deadzone: policy.deadzone,
                        sensitivity: policy.sensitivity,
                    }),
                },
            })
            .collect();
        bindings.sort_by_key(|binding| (binding.kind(), binding.control_index));
        Self { bindings }
    }

    /// Bindings in dispatch order.
    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.bindings.iter()
    }

    /// Total number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of bindings of `kind`.
    #[must_use]
    pub fn count(&self, kind: ControlKind) -> usize {
        self.bindings.iter().filter(|b| b.kind() == kind).count()
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
