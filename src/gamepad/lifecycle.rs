//! # Lifecycle Manager
//!
//! [`InputSystem`] owns the device registry, the injected GUI sink and the
//! gamepad capability flag. It applies host connect/disconnect notifications
//! and runs the per-frame poll.
//!
//! Notifications and polls are both `&mut self` calls on one thread, so a
//! disconnect can only land between two polls, never inside one.
//!
//! # Examples
//!
//! ```
//! use cubepad::gamepad::binding::InputPolicy;
//! use cubepad::gamepad::host::ConnectInfo;
//! use cubepad::gamepad::lifecycle::InputSystem;
//! use cubepad::gui::GuiInputState;
//!
//! let mut input = InputSystem::new(InputPolicy::default(), GuiInputState::new());
//! input.connect(ConnectInfo::standard(0, "Wireless Controller", 17, 4));
//! assert!(input.has_gamepad());
//! assert!(input.sink().has_gamepad());
//!
//! input.disconnect(0);
//! assert!(!input.has_gamepad());
//! ```

use tracing::{debug, info, warn};

use crate::gamepad::binding::{BindingTable, DispatchTargets, InputPolicy};
use crate::gamepad::dispatcher::{PollDispatcher, PollStats};
use crate::gamepad::host::{ConnectInfo, GamepadHost, HostEvent};
use crate::gamepad::layout::{required_counts, PlanEntry, STANDARD_PLAN};
use crate::gamepad::registry::{Device, DeviceRegistry};
use crate::gui::GuiInputSink;
use crate::scene::CubeRotation;

/// Gamepad input subsystem.
#[derive(Debug)]
pub struct InputSystem<S: GuiInputSink> {
    registry: DeviceRegistry,
    dispatcher: PollDispatcher,
    plan: &'static [PlanEntry],
    policy: InputPolicy,
    sink: S,
    has_gamepad: bool,
}

impl<S: GuiInputSink> InputSystem<S> {
    /// Creates an input system using the standard binding plan.
    pub fn new(policy: InputPolicy, sink: S) -> Self {
        Self::with_plan(STANDARD_PLAN, policy, sink)
    }

    /// Creates an input system with a custom binding plan.
    pub fn with_plan(plan: &'static [PlanEntry], policy: InputPolicy, sink: S) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            dispatcher: PollDispatcher::new(),
            plan,
            policy,
            sink,
            has_gamepad: false,
        }
    }

    /// Registers a newly connected gamepad and binds its controls.
    ///
    /// # Panics
    ///
    /// Panics if `info.index` is already registered.
    pub fn connect(&mut self, info: ConnectInfo) {
        debug!("gamepad connected, timestamp {}", info.timestamp);
        debug!("gamepad connected, numAxes {}", info.num_axes);
        debug!("gamepad connected, numButtons {}", info.num_buttons);
        debug!("gamepad connected, index {}", info.index);
        debug!("gamepad connected, id {}", info.id);
        debug!("gamepad connected, mapping {}", info.mapping);

        let (buttons, axes) = required_counts(self.plan);
        if info.num_buttons < buttons || info.num_axes < axes {
            warn!(
                "Gamepad {} reports {} buttons and {} axes, binding plan needs {} and {}",
                info.index, info.num_buttons, info.num_axes, buttons, axes
            );
        }

        let bindings = BindingTable::from_plan(self.plan, self.policy);
        let device = self.registry.register(Device::new(info.index, info.id, bindings));
        info!("Gamepad {} connected: {}", device.index(), device.id());

        self.set_capability(true);
    }

    /// Removes a gamepad and its bindings; unknown indices are ignored.
    pub fn disconnect(&mut self, index: u32) {
        match self.registry.unregister(index) {
            Some(device) => info!("Gamepad {} disconnected: {}", index, device.id()),
            None => debug!("Ignoring disconnect of unknown gamepad {}", index),
        }

        if self.registry.is_empty() {
            self.set_capability(false);
        }
    }

    /// Applies one host notification.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Connected(info) => self.connect(info),
            HostEvent::Disconnected { index } => self.disconnect(index),
        }
    }

    /// Applies every pending notification from `host`, in order.
    pub fn apply_host_events(&mut self, host: &mut dyn GamepadHost) {
        for event in host.drain_events() {
            self.handle_host_event(event);
        }
    }

    /// Samples every gamepad and dispatches its bindings.
    ///
    /// # Panics
    ///
    /// Panics if a sample is too small for the binding plan.
    pub fn poll(&mut self, host: &mut dyn GamepadHost, rotation: &mut CubeRotation) -> PollStats {
        let mut targets = DispatchTargets {
            gui: &mut self.sink,
            rotation,
        };
        self.dispatcher.poll(&self.registry, host, &mut targets)
    }

    /// Whether at least one gamepad is connected.
    #[must_use]
    pub fn has_gamepad(&self) -> bool {
        self.has_gamepad
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn dispatcher(&self) -> &PollDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn set_capability(&mut self, present: bool) {
        self.has_gamepad = present;
        self.sink.set_has_gamepad(present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleError;
    use crate::gamepad::host::MockGamepadHost;
    use crate::gamepad::layout::{GamepadKey, STANDARD_AXIS_COUNT, STANDARD_BUTTON_COUNT};
    use crate::gamepad::sample::RawSample;
    use crate::gui::{GuiInputState, MockGuiInputSink};
    use mockall::predicate::eq;

    /// Sink that remembers every call made during a frame.
    #[derive(Debug, Default)]
    struct RecordingSink {
        keys: Vec<(GamepadKey, bool)>,
        analog: Vec<(GamepadKey, bool, f32)>,
        capability: Vec<bool>,
    }

    impl GuiInputSink for RecordingSink {
        fn add_key_event(&mut self, key: GamepadKey, down: bool) {
            self.keys.push((key, down));
        }

        fn add_key_analog_event(&mut self, key: GamepadKey, down: bool, value: f32) {
            self.analog.push((key, down, value));
        }

        fn set_has_gamepad(&mut self, present: bool) {
            self.capability.push(present);
        }
    }

    impl RecordingSink {
        fn clear_frame(&mut self) {
            self.keys.clear();
            self.analog.clear();
        }

        fn analog_for(&self, key: GamepadKey) -> Vec<(bool, f32)> {
            self.analog
                .iter()
                .filter(|(k, _, _)| *k == key)
                .map(|&(_, down, value)| (down, value))
                .collect()
        }
    }

    fn standard(index: u32) -> ConnectInfo {
        ConnectInfo::standard(index, "Wireless Controller", STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT)
    }

    fn host_returning(sample: RawSample) -> MockGamepadHost {
        let mut host = MockGamepadHost::new();
        host.expect_begin_frame().returning(|| Ok(()));
        host.expect_sample().returning(move |_| Ok(sample.clone()));
        host
    }

    fn system() -> InputSystem<RecordingSink> {
        InputSystem::new(
            InputPolicy {
                deadzone: 0.1,
                sensitivity: 0.05,
            },
            RecordingSink::default(),
        )
    }

    #[test]
    fn test_connect_registers_device_and_sets_flag() {
        let mut input = system();
        input.connect(ConnectInfo::standard(2, "pad", 16, 4));

        assert_eq!(input.registry().indices().collect::<Vec<_>>(), vec![2]);
        assert!(input.has_gamepad());
        assert_eq!(input.sink().capability, vec![true]);
        assert_eq!(input.registry().get(2).map(|d| d.bindings().len()), Some(20));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_connect_is_fatal() {
        let mut input = system();
        input.connect(standard(0));
        input.connect(standard(0));
    }

    #[test]
    fn test_digital_press_reaches_gui() {
        let mut input = system();
        input.connect(standard(0));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.digital[0] = true;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        let stats = input.poll(&mut host, &mut rotation);
        assert_eq!(stats.handlers_invoked, 20);

        let pressed: Vec<_> = input.sink().keys.iter().filter(|(_, down)| *down).collect();
        assert_eq!(pressed, vec![&(GamepadKey::FaceDown, true)]);
        assert_eq!(input.sink().keys.len(), 14);
    }

    #[test]
    fn test_stick_drives_rotation_and_gui() {
        let mut input = system();
        input.connect(standard(0));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.axes[0] = 0.5;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        input.poll(&mut host, &mut rotation);

        assert!((rotation.x - 0.025).abs() < 1e-6);
        assert_eq!(rotation.y, 0.0);
        assert_eq!(input.sink().analog_for(GamepadKey::LStickRight), vec![(true, 0.5)]);
        assert_eq!(input.sink().analog_for(GamepadKey::LStickLeft), vec![(false, 0.0)]);
    }

    #[test]
    fn test_negative_stick_inverts_routing() {
        let mut input = system();
        input.connect(standard(0));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.axes[0] = -0.5;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        input.poll(&mut host, &mut rotation);

        assert!((rotation.x + 0.025).abs() < 1e-6);
        assert_eq!(input.sink().analog_for(GamepadKey::LStickLeft), vec![(true, 0.5)]);
        assert_eq!(input.sink().analog_for(GamepadKey::LStickRight), vec![(false, 0.0)]);
    }

    #[test]
    fn test_deadzone_filters_gui_but_not_rotation() {
        let mut input = system();
        input.connect(standard(0));

        let value = 0.05_f32;
        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.axes[1] = value;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        input.poll(&mut host, &mut rotation);

        assert_eq!(rotation.y, value * 0.05);
        assert_eq!(input.sink().analog_for(GamepadKey::LStickUp), vec![(false, 0.0)]);
        assert_eq!(input.sink().analog_for(GamepadKey::LStickDown), vec![(false, 0.0)]);
    }

    #[test]
    fn test_right_stick_does_not_rotate() {
        let mut input = system();
        input.connect(standard(0));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.axes[2] = 1.0;
        sample.axes[3] = -1.0;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        input.poll(&mut host, &mut rotation);

        assert_eq!(rotation, CubeRotation::default());
        assert_eq!(input.sink().analog_for(GamepadKey::RStickRight), vec![(true, 1.0)]);
        assert_eq!(input.sink().analog_for(GamepadKey::RStickUp), vec![(true, 1.0)]);
    }

    #[test]
    fn test_trigger_reports_analog_value() {
        let mut input = system();
        input.connect(standard(0));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.analogue[7] = 0.8;
        sample.analogue[6] = 0.05;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        input.poll(&mut host, &mut rotation);

        assert_eq!(input.sink().analog_for(GamepadKey::R2), vec![(true, 0.8)]);
        assert_eq!(input.sink().analog_for(GamepadKey::L2), vec![(false, 0.0)]);
    }

    #[test]
    fn test_disconnect_last_device_clears_flag_and_stops_dispatch() {
        let mut input = system();
        input.connect(standard(2));
        input.disconnect(2);

        assert!(input.registry().is_empty());
        assert!(!input.has_gamepad());
        assert_eq!(input.sink().capability, vec![true, false]);

        let mut host = MockGamepadHost::new();
        host.expect_begin_frame().times(0);
        host.expect_sample().times(0);
        let mut rotation = CubeRotation::default();
        let stats = input.poll(&mut host, &mut rotation);

        assert_eq!(stats.handlers_invoked, 0);
        assert!(input.sink().keys.is_empty());
        assert!(input.sink().analog.is_empty());
    }

    #[test]
    fn test_disconnect_one_of_two_keeps_flag() {
        let mut input = system();
        input.connect(standard(0));
        input.connect(standard(1));
        input.disconnect(0);

        assert!(input.has_gamepad());
        assert_eq!(input.registry().indices().collect::<Vec<_>>(), vec![1]);

        let mut host = MockGamepadHost::new();
        host.expect_begin_frame().returning(|| Ok(()));
        host.expect_sample()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT)));
        let mut rotation = CubeRotation::default();

        let stats = input.poll(&mut host, &mut rotation);
        assert_eq!(stats.devices_polled, 1);
        assert_eq!(stats.handlers_invoked, 20);
    }

    #[test]
    fn test_disconnect_unknown_index_is_noop() {
        let mut input = system();
        input.connect(standard(0));
        input.disconnect(5);

        assert!(input.has_gamepad());
        assert_eq!(input.registry().len(), 1);
    }

    #[test]
    fn test_capability_flag_tracks_registry() {
        let mut input = system();
        let events = [
            HostEvent::Connected(standard(0)),
            HostEvent::Connected(standard(1)),
            HostEvent::Disconnected { index: 1 },
            HostEvent::Disconnected { index: 0 },
            HostEvent::Connected(standard(0)),
        ];
        for event in events {
            input.handle_host_event(event);
            assert_eq!(input.has_gamepad(), !input.registry().is_empty());
        }
    }

    #[test]
    fn test_apply_host_events_in_order() {
        let mut host = MockGamepadHost::new();
        host.expect_drain_events().times(1).returning(|| {
            vec![
                HostEvent::Connected(standard(3)),
                HostEvent::Disconnected { index: 3 },
                HostEvent::Connected(standard(3)),
            ]
        });

        let mut input = system();
        input.apply_host_events(&mut host);
        assert_eq!(input.registry().indices().collect::<Vec<_>>(), vec![3]);
        assert_eq!(input.sink().capability, vec![true, false, true]);
    }

    #[test]
    fn test_sample_failure_skips_frame_only() {
        let mut input = system();
        input.connect(standard(0));
        let mut rotation = CubeRotation::default();

        let mut failing = MockGamepadHost::new();
        failing.expect_begin_frame().returning(|| Ok(()));
        failing.expect_sample()
            .returning(|index| Err(SampleError::Disconnected { index }));
        let stats = input.poll(&mut failing, &mut rotation);
        assert_eq!(stats.devices_skipped, 1);
        assert!(input.sink().keys.is_empty());

        let mut healthy = host_returning(RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT));
        let stats = input.poll(&mut healthy, &mut rotation);
        assert_eq!(stats.devices_polled, 1);
        assert_eq!(input.dispatcher().skipped_samples(), 1);
    }

    #[test]
    fn test_values_resent_every_frame() {
        let mut input = system();
        input.connect(standard(0));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.digital[9] = true;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();

        for _ in 0..2 {
            input.sink_mut().clear_frame();
            input.poll(&mut host, &mut rotation);
            assert!(input.sink().keys.contains(&(GamepadKey::Start, true)));
        }
    }

    #[test]
    fn test_capability_reaches_mock_sink() {
        let mut sink = MockGuiInputSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_set_has_gamepad()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_set_has_gamepad()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut input = InputSystem::new(InputPolicy::default(), sink);
        input.connect(standard(0));
        input.disconnect(0);
    }

    #[test]
    fn test_headless_gui_state_end_to_end() {
        let mut input = InputSystem::new(InputPolicy::default(), GuiInputState::new());
        input.connect(standard(1));

        let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);
        sample.set_button(12, true);
        sample.axes[3] = 0.9;
        let mut host = host_returning(sample);
        let mut rotation = CubeRotation::default();
        input.poll(&mut host, &mut rotation);

        let held: Vec<_> = input.sink().held_keys().collect();
        assert_eq!(held, vec![GamepadKey::DpadUp, GamepadKey::RStickDown]);

        input.disconnect(1);
        assert!(!input.sink().has_gamepad());
        assert_eq!(input.sink().held_keys().count(), 0);
    }

    #[test]
    fn test_undersized_device_warns_but_registers() {
        let mut input = system();
        input.connect(ConnectInfo::standard(0, "tiny pad", 4, 2));
        assert!(input.registry().contains(0));
    }
}
