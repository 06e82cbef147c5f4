//! Resource record model.
//!
//! A resource record is an immutable snapshot of one workload's CPU,
//! memory and storage footprint, as read from the inventory store.
//! The engine never mutates a record.

use serde::{Deserialize, Serialize};

/// MiB per GiB (and GiB per TiB).
pub const MIB_PER_GIB: f64 = 1024.0;

/// Power state of a virtual machine at inventory time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    /// Running.
    #[default]
    #[serde(rename = "powered_on", alias = "on")]
    On,
    /// Stopped.
    #[serde(rename = "powered_off", alias = "off")]
    Off,
    /// Suspended to disk or memory.
    Suspended,
}

/// One virtual machine's resource footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Unique record identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Virtual CPU count.
    pub vcpus: u32,
    /// Configured memory (MiB).
    pub memory_mib: u64,
    /// Storage actually written (MiB). Drives transfer volume.
    pub storage_in_use_mib: f64,
    /// Storage allocated (MiB). Drives target storage cost.
    pub storage_provisioned_mib: f64,
    /// Power state.
    #[serde(default)]
    pub power_state: PowerState,
}

impl ResourceRecord {
    /// Creates an empty, powered-on record with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            vcpus: 0,
            memory_mib: 0,
            storage_in_use_mib: 0.0,
            storage_provisioned_mib: 0.0,
            power_state: PowerState::On,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the vCPU count.
    pub fn with_vcpus(mut self, vcpus: u32) -> Self {
        self.vcpus = vcpus;
        self
    }

    /// Sets the memory size (MiB).
    pub fn with_memory_mib(mut self, memory_mib: u64) -> Self {
        self.memory_mib = memory_mib;
        self
    }

    /// Sets in-use and provisioned storage (MiB).
    pub fn with_storage_mib(mut self, in_use_mib: f64, provisioned_mib: f64) -> Self {
        self.storage_in_use_mib = in_use_mib;
        self.storage_provisioned_mib = provisioned_mib;
        self
    }

    /// Sets the power state.
    pub fn with_power_state(mut self, power_state: PowerState) -> Self {
        self.power_state = power_state;
        self
    }

    /// In-use storage (GiB).
    #[inline]
    pub fn storage_in_use_gib(&self) -> f64 {
        self.storage_in_use_mib / MIB_PER_GIB
    }

    /// Provisioned storage (GiB).
    #[inline]
    pub fn storage_provisioned_gib(&self) -> f64 {
        self.storage_provisioned_mib / MIB_PER_GIB
    }

    /// Memory (GiB).
    #[inline]
    pub fn memory_gib(&self) -> f64 {
        self.memory_mib as f64 / MIB_PER_GIB
    }

    /// Whether the VM is running.
    pub fn is_powered_on(&self) -> bool {
        self.power_state == PowerState::On
    }
}
