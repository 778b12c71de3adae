//! # GUI Input Module
//!
//! The boundary between gamepad dispatch and the overlay GUI.
//!
//! Dispatch never talks to a GUI library directly. It writes into a
//! [`GuiInputSink`], which is injected when the input system is built. The
//! sink receives:
//!
//! - press/release events for digital buttons
//! - press/release + magnitude events for triggers and stick directions
//! - a capability flag telling the GUI whether any gamepad is connected
//!
//! [`GuiInputState`] is a headless sink that keeps the latest state of every
//! key, the way a GUI library's input layer would, and optionally records
//! transitions to an [`EventLog`].

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::event_log::EventLog;
use crate::gamepad::layout::GamepadKey;

/// Receiver of semantic gamepad input.
///
/// All calls happen on the frame thread, synchronously, from inside binding
/// handlers or lifecycle transitions.
#[cfg_attr(test, mockall::automock)]
pub trait GuiInputSink {
    /// Digital key press (`down = true`) or release.
    fn add_key_event(&mut self, key: GamepadKey, down: bool);

    /// Analog key report. `value` is the magnitude in 0..1.
    fn add_key_analog_event(&mut self, key: GamepadKey, down: bool, value: f32);

    /// Whether at least one gamepad is connected.
    fn set_has_gamepad(&mut self, present: bool);
}

/// Latest reported state of one key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyState {
    pub down: bool,
    pub value: f32,
}

/// Headless GUI input layer.
#[derive(Debug, Default)]
pub struct GuiInputState {
    keys: BTreeMap<GamepadKey, KeyState>,
    has_gamepad: bool,
    press_count: u64,
    log: Option<EventLog>,
}

impl GuiInputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a GUI input layer that records transitions to `log`.
    #[must_use]
    pub fn with_event_log(log: EventLog) -> Self {
        Self {
            log: Some(log),
            ..Self::default()
        }
    }

    /// Latest state of `key`, released if never reported.
    #[must_use]
    pub fn key(&self, key: GamepadKey) -> KeyState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    /// Whether `key` is currently held.
    #[must_use]
    pub fn is_down(&self, key: GamepadKey) -> bool {
        self.key(key).down
    }

    /// Keys currently held, in key order.
    pub fn held_keys(&self) -> impl Iterator<Item = GamepadKey> + '_ {
        self.keys
            .iter()
            .filter(|(_, state)| state.down)
            .map(|(key, _)| *key)
    }

    #[must_use]
    pub fn has_gamepad(&self) -> bool {
        self.has_gamepad
    }

    /// Number of released-to-pressed transitions seen so far.
    #[must_use]
    pub fn press_count(&self) -> u64 {
        self.press_count
    }

    fn update(&mut self, key: GamepadKey, down: bool, value: f32) {
        let previous = self.keys.insert(key, KeyState { down, value });
        let was_down = previous.map_or(false, |state| state.down);
        if was_down == down {
            return;
        }

        if down {
            self.press_count += 1;
        }
        debug!("GUI key {} {}", key, if down { "pressed" } else { "released" });

        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.record_key(key, down, value) {
                warn!("Failed to record GUI event: {}", e);
            }
        }
    }
}

impl GuiInputSink for GuiInputState {
    fn add_key_event(&mut self, key: GamepadKey, down: bool) {
        self.update(key, down, if down { 1.0 } else { 0.0 });
    }

    fn add_key_analog_event(&mut self, key: GamepadKey, down: bool, value: f32) {
        self.update(key, down, value);
    }

    fn set_has_gamepad(&mut self, present: bool) {
        if self.has_gamepad == present {
            return;
        }
        self.has_gamepad = present;

        if !present {
            // Nothing can hold a key without a gamepad.
            for state in self.keys.values_mut() {
                *state = KeyState::default();
            }
        }

        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.record_capability(present) {
                warn!("Failed to record GUI capability change: {}", e);
            }
        }
    }
}
