//! # Cubepad Library
//!
//! Spin a 3D scene and drive an overlay GUI with a gamepad.
//!
//! The heart of the library is gamepad input dispatch: discovering connected
//! controllers, binding their controls to typed handlers, sampling them once
//! per frame and routing the values to a GUI input layer and to the scene's
//! rotation.

pub mod config;
pub mod error;
pub mod event_log;
pub mod gamepad;
pub mod gui;
pub mod scene;
