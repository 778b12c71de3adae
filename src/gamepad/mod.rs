//! # Gamepad Module
//!
//! Gamepad input dispatch.
//!
//! This module handles:
//! - Tracking connected gamepads by host-assigned index
//! - Binding each gamepad's controls to typed handlers from one fixed plan
//! - Applying connect/disconnect notifications and the capability flag
//! - Sampling every gamepad once per frame and dispatching to the GUI sink
//!   and the cube rotation
//!
//! ```text
//! host events ──► InputSystem ──► DeviceRegistry + BindingTable
//! frame tick ──► PollDispatcher ──► handlers ──► GuiInputSink / CubeRotation
//! ```

pub mod binding;
pub mod dispatcher;
pub mod evdev_host;
pub mod host;
pub mod layout;
pub mod lifecycle;
pub mod registry;
pub mod sample;
