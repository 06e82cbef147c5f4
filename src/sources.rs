//! Collaborator interfaces.
//!
//! The engine performs no I/O. Inventory and target configuration are
//! fetched by the caller's persistence layer through these traits, and
//! the materialized data is handed to the engine.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ResourceRecord, TargetProfile};

/// Opaque VM selection filter, resolved by the inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCriteria {
    /// All VMs of one cluster.
    Cluster {
        /// Datacenter name.
        datacenter: String,
        /// Cluster name.
        cluster: String,
    },
    /// VMs whose folder path starts with a prefix.
    FolderPrefix(String),
    /// VMs carrying a label.
    Label {
        /// Label key.
        key: String,
        /// Label value.
        value: String,
    },
    /// An explicit ID list.
    Ids(Vec<String>),
}

/// Supplies resource records.
pub trait InventorySource {
    /// Returns the records matching `criteria`.
    fn fetch_resource_records(&self, criteria: &SelectionCriteria) -> Result<Vec<ResourceRecord>>;
}

/// Supplies target profiles.
pub trait TargetSource {
    /// Returns the profile for `target_id`.
    fn fetch_target_profile(&self, target_id: &str) -> Result<TargetProfile>;
}

impl<T: InventorySource + ?Sized> InventorySource for &T {
    fn fetch_resource_records(&self, criteria: &SelectionCriteria) -> Result<Vec<ResourceRecord>> {
        (**self).fetch_resource_records(criteria)
    }
}

impl<T: TargetSource + ?Sized> TargetSource for &T {
    fn fetch_target_profile(&self, target_id: &str) -> Result<TargetProfile> {
        (**self).fetch_target_profile(target_id)
    }
}
