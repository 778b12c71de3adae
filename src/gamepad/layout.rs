//! # Standard Gamepad Layout
//!
//! The single hardware profile this crate understands: the "standard" gamepad
//! mapping with sixteen bound buttons and four axes.
//!
//! ## Buttons
//!
//! | Index | Control | Kind | GUI key |
//! |-------|---------|------|---------|
//! | 0 | Cross / A | digital | `FaceDown` |
//! | 1 | Circle / B | digital | `FaceRight` |
//! | 2 | Square / X | digital | `FaceLeft` |
//! | 3 | Triangle / Y | digital | `FaceUp` |
//! | 4 | L1 | digital | `L1` |
//! | 5 | R1 | digital | `R1` |
//! | 6 | L2 | analogue | `L2` |
//! | 7 | R2 | analogue | `R2` |
//! | 8 | Share / Back | digital | `Back` |
//! | 9 | Options / Start | digital | `Start` |
//! | 10 | L3 | digital | `L3` |
//! | 11 | R3 | digital | `R3` |
//! | 12-15 | D-Pad up/down/left/right | digital | `DpadUp`.. |
//! | 16 | PS / Guide | unbound | - |
//!
//! ## Axes
//!
//! | Index | Control | Negative key | Positive key | Rotation |
//! |-------|---------|--------------|--------------|----------|
//! | 0 | Left stick X | `LStickLeft` | `LStickRight` | x |
//! | 1 | Left stick Y | `LStickUp` | `LStickDown` | y |
//! | 2 | Right stick X | `RStickLeft` | `RStickRight` | - |
//! | 3 | Right stick Y | `RStickUp` | `RStickDown` | - |

use serde::Serialize;
use std::fmt;

/// Number of buttons reported by a standard-mapping host (guide included).
pub const STANDARD_BUTTON_COUNT: usize = 17;

/// Number of axes reported by a standard-mapping host.
pub const STANDARD_AXIS_COUNT: usize = 4;

/// Semantic gamepad keys understood by the GUI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GamepadKey {
    FaceDown,
    FaceRight,
    FaceLeft,
    FaceUp,
    L1,
    R1,
    L2,
    R2,
    Back,
    Start,
    L3,
    R3,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    LStickLeft,
    LStickRight,
    LStickUp,
    LStickDown,
    RStickLeft,
    RStickRight,
    RStickUp,
    RStickDown,
}

impl fmt::Display for GamepadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Component of the cube rotation an axis drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationComponent {
    X,
    Y,
}

/// One entry of the binding plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanEntry {
    /// Button slot reported as pressed/released.
    Digital { button: usize, key: GamepadKey },
    /// Button slot reported as an analog value in 0..1.
    Analogue { button: usize, key: GamepadKey },
    /// Axis slot split into two opposite GUI directions.
    Axis {
        axis: usize,
        negative: GamepadKey,
        positive: GamepadKey,
        rotation: Option<RotationComponent>,
    },
}

/// The fixed binding plan shared by every connected gamepad.
pub const STANDARD_PLAN: &[PlanEntry] = &[
    PlanEntry::Digital { button: 0, key: GamepadKey::FaceDown },
    PlanEntry::Digital { button: 1, key: GamepadKey::FaceRight },
    PlanEntry::Digital { button: 2, key: GamepadKey::FaceLeft },
    PlanEntry::Digital { button: 3, key: GamepadKey::FaceUp },
    PlanEntry::Digital { button: 4, key: GamepadKey::L1 },
    PlanEntry::Digital { button: 5, key: GamepadKey::R1 },
    PlanEntry::Analogue { button: 6, key: GamepadKey::L2 },
    PlanEntry::Analogue { button: 7, key: GamepadKey::R2 },
    PlanEntry::Digital { button: 8, key: GamepadKey::Back },
    PlanEntry::Digital { button: 9, key: GamepadKey::Start },
    PlanEntry::Digital { button: 10, key: GamepadKey::L3 },
    PlanEntry::Digital { button: 11, key: GamepadKey::R3 },
    PlanEntry::Digital { button: 12, key: GamepadKey::DpadUp },
    PlanEntry::Digital { button: 13, key: GamepadKey::DpadDown },
    PlanEntry::Digital { button: 14, key: GamepadKey::DpadLeft },
    PlanEntry::Digital { button: 15, key: GamepadKey::DpadRight },
    PlanEntry::Axis {
        axis: 0,
        negative: GamepadKey::LStickLeft,
        positive: GamepadKey::LStickRight,
        rotation: Some(RotationComponent::X),
    },
    PlanEntry::Axis {
        axis: 1,
        negative: GamepadKey::LStickUp,
        positive: GamepadKey::LStickDown,
        rotation: Some(RotationComponent::Y),
    },
    PlanEntry::Axis {
        axis: 2,
        negative: GamepadKey::RStickLeft,
        positive: GamepadKey::RStickRight,
        rotation: None,
    },
    PlanEntry::Axis {
        axis: 3,
        negative: GamepadKey::RStickUp,
        positive: GamepadKey::RStickDown,
        rotation: None,
    },
];

/// Minimum button and axis counts a device must report for `plan`.
#[must_use]
pub fn required_counts(plan: &[PlanEntry]) -> (usize, usize) {
    plan.iter().fold((0, 0), |(buttons, axes), entry| match *entry {
        PlanEntry::Digital { button, .. } | PlanEntry::Analogue { button, .. } => {
            (buttons.max(button + 1), axes)
        }
        PlanEntry::Axis { axis, .. } => (buttons, axes.max(axis + 1)),
    })
}
