//! # Evdev Gamepad Host
//!
//! Linux implementation of [`GamepadHost`] on top of the evdev interface.
//!
//! ## Detection
//!
//! [`EvdevHost::scan`] walks the input directory (normally `/dev/input`) for
//! `event*` nodes that expose `BTN_SOUTH` and `ABS_X`. Each new gamepad gets
//! the lowest free index. A gamepad whose node disappears, or whose reads fail
//! with `ENODEV`, is reported disconnected and its index becomes free again.
//!
//! ## Standard mapping
//!
//! | Index | evdev source |
//! |-------|--------------|
//! | buttons 0-5 | BTN_SOUTH, BTN_EAST, BTN_WEST, BTN_NORTH, BTN_TL, BTN_TR |
//! | buttons 6-7 | ABS_RX / ABS_RY (analog), BTN_TL2 / BTN_TR2 (click) |
//! | buttons 8-11 | BTN_SELECT, BTN_START, BTN_THUMBL, BTN_THUMBR |
//! | buttons 12-15 | ABS_HAT0Y / ABS_HAT0X or BTN_DPAD_* |
//! | button 16 | BTN_MODE |
//! | axes 0-3 | ABS_X, ABS_Y, ABS_Z, ABS_RZ |
//!
//! Stick axes are normalized to -1..1 and triggers to 0..1 using the range
//! each device reports for the axis.

use evdev::{AbsoluteAxisType, Device, Key};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CubepadError, Result, SampleError};
use crate::gamepad::host::{ConnectInfo, GamepadHost, HostEvent};
use crate::gamepad::layout::{STANDARD_AXIS_COUNT, STANDARD_BUTTON_COUNT};
use crate::gamepad::sample::RawSample;

/// Buttons read directly from key state.
const BUTTON_KEYS: [(usize, Key); 13] = [
    (0, Key::BTN_SOUTH),
    (1, Key::BTN_EAST),
    (2, Key::BTN_WEST),
    (3, Key::BTN_NORTH),
    (4, Key::BTN_TL),
    (5, Key::BTN_TR),
    (6, Key::BTN_TL2),
    (7, Key::BTN_TR2),
    (8, Key::BTN_SELECT),
    (9, Key::BTN_START),
    (10, Key::BTN_THUMBL),
    (11, Key::BTN_THUMBR),
    (16, Key::BTN_MODE),
];

/// D-Pad buttons for devices that report the pad as keys.
const DPAD_KEYS: [(usize, Key); 4] = [
    (12, Key::BTN_DPAD_UP),
    (13, Key::BTN_DPAD_DOWN),
    (14, Key::BTN_DPAD_LEFT),
    (15, Key::BTN_DPAD_RIGHT),
];

/// Analog trigger axes, overriding the digital click when present.
const TRIGGER_AXES: [(usize, AbsoluteAxisType); 2] = [
    (6, AbsoluteAxisType::ABS_RX),
    (7, AbsoluteAxisType::ABS_RY),
];

/// Stick axes in standard order.
const STICK_AXES: [AbsoluteAxisType; STANDARD_AXIS_COUNT] = [
    AbsoluteAxisType::ABS_X,
    AbsoluteAxisType::ABS_Y,
    AbsoluteAxisType::ABS_Z,
    AbsoluteAxisType::ABS_RZ,
];

/// Current value and reported range of one absolute axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisReading {
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
}

/// Maps a raw stick reading to -1..1. Axes without a range read as centered.
#[must_use]
pub fn normalize_axis(reading: AxisReading) -> f32 {
    let span = reading.maximum as f32 - reading.minimum as f32;
    if span <= 0.0 {
        return 0.0;
    }
    let scaled = 2.0 * (reading.value as f32 - reading.minimum as f32) / span - 1.0;
    scaled.clamp(-1.0, 1.0)
}

/// Maps a raw trigger reading to 0..1, or `None` if the axis has no range.
#[must_use]
pub fn normalize_trigger(reading: AxisReading) -> Option<f32> {
    let span = reading.maximum as f32 - reading.minimum as f32;
    if span <= 0.0 {
        return None;
    }
    Some(((reading.value as f32 - reading.minimum as f32) / span).clamp(0.0, 1.0))
}

/// Builds a standard-mapping sample from key and axis accessors.
pub fn build_sample<K, A>(pressed: K, axis: A) -> RawSample
where
    K: Fn(Key) -> bool,
    A: Fn(AbsoluteAxisType) -> AxisReading,
{
    let mut sample = RawSample::neutral(STANDARD_BUTTON_COUNT, STANDARD_AXIS_COUNT);

    for (index, key) in BUTTON_KEYS {
        sample.set_button(index, pressed(key));
    }

    let hat_x = axis(AbsoluteAxisType::ABS_HAT0X).value;
    let hat_y = axis(AbsoluteAxisType::ABS_HAT0Y).value;
    let hat = [hat_y < 0, hat_y > 0, hat_x < 0, hat_x > 0];
    for ((index, key), hat_pressed) in DPAD_KEYS.into_iter().zip(hat) {
        sample.set_button(index, hat_pressed || pressed(key));
    }

    for (index, trigger) in TRIGGER_AXES {
        if let Some(value) = normalize_trigger(axis(trigger)) {
            sample.analogue[index] = value;
        }
    }

    for (index, stick) in STICK_AXES.into_iter().enumerate() {
        sample.axes[index] = normalize_axis(axis(stick));
    }

    sample
}

fn read_sample(device: &Device) -> std::io::Result<RawSample> {
    let keys = device.get_key_state()?;
    let abs = device.get_abs_state()?;
    Ok(build_sample(
        |key| keys.contains(key),
        |axis| {
            let info = &abs[axis.0 as usize];
            AxisReading {
                value: info.value,
                minimum: info.minimum,
                maximum: info.maximum,
            }
        },
    ))
}

fn is_gamepad(device: &Device) -> bool {
    let has_south = device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));
    let has_stick = device
        .supported_absolute_axes()
        .map_or(false, |axes| axes.contains(AbsoluteAxisType::ABS_X));
    has_south && has_stick
}

/// Linux `ENODEV`, returned once a device node has been unplugged.
const ENODEV: i32 = 19;

/// Whether an open pad should be dropped at scan time.
///
/// A pad is lost once its node is gone or reads fail with `ENODEV`. Other
/// read failures leave it registered; those frames are skipped instead.
#[must_use]
pub fn pad_lost(node_exists: bool, read_error: Option<&std::io::Error>) -> bool {
    !node_exists || read_error.map_or(false, |e| e.raw_os_error() == Some(ENODEV))
}

/// Lowest index not present in `taken`.
#[must_use]
pub fn lowest_free_index<I: IntoIterator<Item = u32>>(taken: I) -> u32 {
    let taken: BTreeSet<u32> = taken.into_iter().collect();
    (0..u32::MAX).find(|index| !taken.contains(index)).unwrap_or(u32::MAX)
}

/// Index assignment and the queue of hot-plug notifications.
#[derive(Debug, Default)]
struct Slots {
    paths: BTreeMap<u32, PathBuf>,
    pending: Vec<HostEvent>,
}

impl Slots {
    fn holds(&self, path: &Path) -> bool {
        self.paths.values().any(|held| held == path)
    }

    /// Frees `index` and queues its disconnect.
    fn release(&mut self, index: u32) -> Option<PathBuf> {
        let path = self.paths.remove(&index)?;
        self.pending.push(HostEvent::Disconnected { index });
        Some(path)
    }

    /// Assigns the lowest free index to `path` and queues its connect.
    fn claim(&mut self, path: PathBuf, id: String) -> u32 {
        let index = lowest_free_index(self.paths.keys().copied());
        self.pending.push(HostEvent::Connected(ConnectInfo::standard(
            index,
            id,
            STANDARD_BUTTON_COUNT,
            STANDARD_AXIS_COUNT,
        )));
        self.paths.insert(index, path);
        index
    }
}

struct Pad {
    device: Device,
    frame: std::result::Result<RawSample, SampleError>,
}

impl std::fmt::Debug for Pad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pad")
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

/// Gamepad host backed by `/dev/input/event*` nodes.
#[derive(Debug)]
pub struct EvdevHost {
    input_dir: PathBuf,
    slots: Slots,
    pads: BTreeMap<u32, Pad>,
}

impl EvdevHost {
    /// Creates a host watching `input_dir`. No devices are opened until
    /// [`EvdevHost::scan`] runs.
    #[must_use]
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            slots: Slots::default(),
            pads: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Number of gamepads currently open.
    #[must_use]
    pub fn connected(&self) -> usize {
        self.pads.len()
    }

    /// Detects gamepads that appeared or vanished since the last scan.
    ///
    /// Changes are queued as [`HostEvent`]s for [`GamepadHost::drain_events`],
    /// disconnects first. A node dropped in this pass is not reopened until
    /// the next one. Returns the number of events queued.
    ///
    /// # Errors
    ///
    /// Returns `Host` if the input directory cannot be listed.
    pub fn scan(&mut self) -> Result<usize> {
        let before = self.slots.pending.len();

        let lost: Vec<u32> = self
            .pads
            .iter()
            .filter(|(index, pad)| {
                let node_exists = self
                    .slots
                    .paths
                    .get(index)
                    .map_or(false, |path| path.exists());
                pad_lost(node_exists, read_sample(&pad.device).err().as_ref())
            })
            .map(|(index, _)| *index)
            .collect();

        let mut dropped = Vec::new();
        for index in lost {
            self.pads.remove(&index);
            if let Some(path) = self.slots.release(index) {
                info!("Gamepad {} at {} is gone", index, path.display());
                dropped.push(path);
            }
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&self.input_dir)
            .map_err(|e| {
                CubepadError::Host(format!("Failed to read {}: {}", self.input_dir.display(), e))
            })?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.file_name()
                    .map_or(false, |name| name.to_string_lossy().starts_with("event"))
            })
            .collect();

        // Sort entries so index assignment is deterministic
        entries.sort();

        for path in entries {
            if self.slots.holds(&path) || dropped.contains(&path) {
                continue;
            }

            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            let id = device.input_id();
            debug!(
                "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                path.display(),
                id.vendor(),
                id.product()
            );
            if !is_gamepad(&device) {
                continue;
            }

            let name = device.name().unwrap_or("Unknown gamepad").to_string();
            let label = format!(
                "{} (Vendor: {:04x} Product: {:04x})",
                name,
                id.vendor(),
                id.product()
            );
            let node_path = path.display().to_string();
            let index = self.slots.claim(path, label);
            info!("Found gamepad at {}: {} (index {})", node_path, name, index);

            self.pads.insert(
                index,
                Pad {
                    device,
                    frame: Err(SampleError::Disconnected { index }),
                },
            );
        }

        Ok(self.slots.pending.len() - before)
    }
}

impl GamepadHost for EvdevHost {
    fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.slots.pending)
    }

    fn begin_frame(&mut self) -> std::result::Result<(), SampleError> {
        if !self.input_dir.is_dir() {
            return Err(SampleError::Unsupported);
        }

        for (&index, pad) in self.pads.iter_mut() {
            pad.frame = read_sample(&pad.device).map_err(|e| {
                debug!("Failed to read gamepad {}: {}", index, e);
                SampleError::Read {
                    index,
                    reason: e.to_string(),
                }
            });
        }
        Ok(())
    }

    fn sample(&mut self, index: u32) -> std::result::Result<RawSample, SampleError> {
        match self.pads.get(&index) {
            Some(pad) => pad.frame.clone(),
            None => Err(SampleError::Disconnected { index }),
        }
    }
}
