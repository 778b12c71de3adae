//! # Poll Dispatcher
//!
//! Once per frame, samples each registered gamepad and feeds every binding the
//! raw value of its control.
//!
//! - No registered devices: the host is not touched at all.
//! - Host cannot sample this frame: the whole poll is skipped.
//! - One device fails to sample: only that device is skipped this frame.
//!
//! Every binding fires every frame, whether or not its value changed. Within a
//! device the order is analogue, digital, then axis bindings.

use tracing::debug;

use crate::gamepad::binding::{DispatchTargets, Handler};
use crate::gamepad::host::GamepadHost;
use crate::gamepad::registry::{Device, DeviceRegistry};
use crate::gamepad::sample::RawSample;

/// What happened during one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Devices whose sample was read and dispatched.
    pub devices_polled: usize,
    /// Devices skipped because their sample could not be read.
    pub devices_skipped: usize,
    /// Handler invocations across all devices.
    pub handlers_invoked: usize,
}

/// Per-frame sampler and dispatcher.
#[derive(Debug, Default)]
pub struct PollDispatcher {
    polls: u64,
    skipped_samples: u64,
}

impl PollDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one dispatch cycle over `registry`.
    ///
    /// # Panics
    ///
    /// Panics if a binding's control index is outside the counts reported by
    /// its device's sample.
    pub fn poll(
        &mut self,
        registry: &DeviceRegistry,
        host: &mut dyn GamepadHost,
        targets: &mut DispatchTargets<'_>,
    ) -> PollStats {
        let mut stats = PollStats::default();
        if registry.is_empty() {
            return stats;
        }

        if let Err(e) = host.begin_frame() {
            debug!("Skipping gamepad poll: {}", e);
            return stats;
        }
        self.polls += 1;

        for device in registry.iter() {
            match host.sample(device.index()) {
                Ok(sample) => {
                    stats.handlers_invoked += dispatch_device(device, &sample, targets);
                    stats.devices_polled += 1;
                }
                Err(e) => {
                    debug!("Skipping gamepad {} this frame: {}", device.index(), e);
                    self.skipped_samples += 1;
                    stats.devices_skipped += 1;
                }
            }
        }

        stats
    }

    /// Number of polls that reached the sampling stage.
    #[must_use]
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of per-device samples skipped so far.
    #[must_use]
    pub fn skipped_samples(&self) -> u64 {
        self.skipped_samples
    }
}

/// Feeds every binding of `device` from `sample`; returns handlers invoked.
fn dispatch_device(device: &Device, sample: &RawSample, targets: &mut DispatchTargets<'_>) -> usize {
    let mut invoked = 0;
    for binding in device.bindings() {
        let index = binding.control_index;
        match &binding.handler {
            Handler::Analogue(handler) => handler.handle(sample.analogue(index), targets),
            Handler::Digital(handler) => handler.handle(sample.digital(index), targets),
            Handler::Axis(handler) => handler.handle(sample.axis(index), targets),
        }
        invoked += 1;
    }
    invoked
}
