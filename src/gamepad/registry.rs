//! # Device Registry
//!
//! Tracks connected gamepads by host-assigned index. Iteration is in
//! ascending index order, which is also the order devices are polled in.

use std::collections::BTreeMap;

use crate::gamepad::binding::BindingTable;

/// A connected gamepad and its bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    index: u32,
    id: String,
    bindings: BindingTable,
}

impl Device {
    /// Creates a device whose binding table is already complete.
    #[must_use]
    pub fn new(index: u32, id: impl Into<String>, bindings: BindingTable) -> Self {
        Self {
            index,
            id: id.into(),
            bindings,
        }
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }
}

/// Connected gamepads keyed by index.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<u32, Device>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `device`.
    ///
    /// # Panics
    ///
    /// Panics if a device with the same index is already registered. The host
    /// guarantees unique indices, so a collision is a host contract violation.
    pub fn register(&mut self, device: Device) -> &Device {
        let index = device.index();
        assert!(
            !self.devices.contains_key(&index),
            "gamepad index {} registered twice",
            index
        );
        self.devices.entry(index).or_insert(device)
    }

    /// Removes and returns the device at `index`, if any.
    pub fn unregister(&mut self, index: u32) -> Option<Device> {
        self.devices.remove(&index)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.devices.contains_key(&index)
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Device> {
        self.devices.get(&index)
    }

    /// Registered indices in poll order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.devices.keys().copied()
    }

    /// Registered devices in poll order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::binding::InputPolicy;
    use crate::gamepad::layout::STANDARD_PLAN;

    fn device(index: u32) -> Device {
        Device::new(
            index,
            format!("pad {}", index),
            BindingTable::from_plan(STANDARD_PLAN, InputPolicy::default()),
        )
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = DeviceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = DeviceRegistry::new();
        let registered = registry.register(device(2));
        assert_eq!(registered.index(), 2);
        assert_eq!(registered.id(), "pad 2");

        assert!(!registry.is_empty());
        assert!(registry.contains(2));
        assert!(!registry.contains(0));
        assert_eq!(registry.get(2).map(|d| d.bindings().len()), Some(20));
    }

    #[test]
    #[should_panic(expected = "gamepad index 1 registered twice")]
    fn test_duplicate_register_panics() {
        let mut registry = DeviceRegistry::new();
        registry.register(device(1));
        registry.register(device(1));
    }

    #[test]
    fn test_unregister_removes_only_that_device() {
        let mut registry = DeviceRegistry::new();
        registry.register(device(0));
        registry.register(device(1));

        let removed = registry.unregister(0);
        assert_eq!(removed.map(|d| d.index()), Some(0));
        assert_eq!(registry.indices().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let mut registry = DeviceRegistry::new();
        registry.register(device(3));
        assert!(registry.unregister(7).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_index_reuse_after_unregister() {
        let mut registry = DeviceRegistry::new();
        registry.register(device(0));
        registry.unregister(0);
        registry.register(device(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iteration_in_index_order() {
        let mut registry = DeviceRegistry::new();
        for index in [5, 0, 3] {
            registry.register(device(index));
        }
        assert_eq!(registry.indices().collect::<Vec<_>>(), vec![0, 3, 5]);
        assert_eq!(
            registry.iter().map(Device::index).collect::<Vec<_>>(),
            vec![0, 3, 5]
        );
    }
}
