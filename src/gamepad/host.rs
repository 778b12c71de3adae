//! # Host Boundary
//!
//! What the input system needs from the platform: connect/disconnect
//! notifications and a synchronous per-frame state read for each device.
//!
//! The host assigns device indices. An index is unique among connected
//! devices and may be reused once its device disconnects.

use chrono::{DateTime, Local};

use crate::error::SampleError;
use crate::gamepad::sample::RawSample;

/// Details reported by the host when a gamepad connects.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectInfo {
    pub index: u32,
    pub id: String,
    pub mapping: String,
    pub num_axes: usize,
    pub num_buttons: usize,
    pub timestamp: DateTime<Local>,
}

impl ConnectInfo {
    /// Connect info for a standard-mapping gamepad, stamped with the current time.
    #[must_use]
    pub fn standard(index: u32, id: impl Into<String>, num_buttons: usize, num_axes: usize) -> Self {
        Self {
            index,
            id: id.into(),
            mapping: "standard".to_string(),
            num_axes,
            num_buttons,
            timestamp: Local::now(),
        }
    }
}

/// Notification from the host about the set of connected gamepads.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Connected(ConnectInfo),
    Disconnected { index: u32 },
}

/// Platform gamepad access.
#[cfg_attr(test, mockall::automock)]
pub trait GamepadHost {
    /// Notifications observed since the previous call, in arrival order.
    fn drain_events(&mut self) -> Vec<HostEvent>;

    /// Snapshots every device for the coming frame.
    ///
    /// `Err` means the host cannot sample at all this frame.
    fn begin_frame(&mut self) -> Result<(), SampleError>;

    /// State of device `index` as of the last [`GamepadHost::begin_frame`].
    fn sample(&mut self, index: u32) -> Result<RawSample, SampleError>;
}
