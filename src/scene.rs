//! # Scene Module
//!
//! Application state driven by the gamepad and the headless render step that
//! consumes it.
//!
//! Axis handlers overwrite [`CubeRotation`] every frame; [`Scene::draw`] reads
//! it once per frame and integrates it into the cube's orientation.

use std::f32::consts::PI;

use crate::gamepad::layout::RotationComponent;

/// Per-frame rotation delta of the cube, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CubeRotation {
    pub x: f32,
    pub y: f32,
}

impl CubeRotation {
    /// Overwrites one component of the delta.
    pub fn set(&mut self, component: RotationComponent, value: f32) {
        match component {
            RotationComponent::X => self.x = value,
            RotationComponent::Y => self.y = value,
        }
    }

    #[must_use]
    pub fn get(&self, component: RotationComponent) -> f32 {
        match component {
            RotationComponent::X => self.x,
            RotationComponent::Y => self.y,
        }
    }
}

/// Headless stand-in for the renderer.
#[derive(Debug, Default)]
pub struct Scene {
    orientation: [f32; 2],
    frames: u64,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders one frame, applying `rotation` to the cube.
    pub fn draw(&mut self, rotation: &CubeRotation) {
        self.orientation[0] = wrap_angle(self.orientation[0] + rotation.x);
        self.orientation[1] = wrap_angle(self.orientation[1] + rotation.y);
        self.frames += 1;
    }

    /// Cumulative cube orientation `[x, y]`, each in -PI..=PI.
    #[must_use]
    pub fn orientation(&self) -> [f32; 2] {
        self.orientation
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn wrap_angle(angle: f32) -> f32 {
    if angle > PI {
        angle - 2.0 * PI
    } else if angle < -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}
