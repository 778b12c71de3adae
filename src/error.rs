//! # Error Types
//!
//! Custom error types for Cubepad using `thiserror`.
//!
//! Two families live here:
//!
//! - [`CubepadError`]: ordinary failures surfaced to the caller (configuration,
//!   I/O, host setup, event log serialization).
//! - [`SampleError`]: transient per-frame sampling failures. These never
//!   propagate past the poll dispatcher; the affected device (or the whole
//!   poll) is skipped for one frame.
//!
//! Programming errors in the static binding plan (duplicate device index,
//! control index out of bounds) are not represented here. They are asserted
//! and terminate the process.

use thiserror::Error;

/// Main error type for Cubepad
#[derive(Debug, Error)]
pub enum CubepadError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Host boundary errors (device scan, permissions)
    #[error("Host error: {0}")]
    Host(String),

    /// GUI event log serialization errors
    #[error("Event log error: {0}")]
    EventLog(#[from] serde_json::Error),
}

/// Result type alias for Cubepad
pub type Result<T> = std::result::Result<T, CubepadError>;

/// Transient failure while sampling gamepad hardware for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// The host cannot sample gamepads at all this frame.
    #[error("gamepad sampling is not supported by the host")]
    Unsupported,

    /// The host no longer knows the device (disconnect not yet delivered).
    #[error("gamepad {index} is not available")]
    Disconnected { index: u32 },

    /// Reading the device state failed.
    #[error("failed to read gamepad {index}: {reason}")]
    Read { index: u32, reason: String },
}
