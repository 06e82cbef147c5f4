//! Per-VM transfer time estimate.

use serde::{Deserialize, Serialize};

/// Phase-level replication time for one VM.
///
/// `total_hours` is the scheduling weight consumed unchanged by the batch
/// scheduler and the wave generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerVMEstimate {
    /// Source record ID.
    pub vm_id: String,
    /// In-use storage (GiB).
    pub storage_gib: f64,
    /// Data actually sent for the initial sync, after reduction (TiB).
    pub effective_data_tb: f64,
    /// Initial full replication (hours).
    pub initial_replication_hours: f64,
    /// All delta syncs combined (hours).
    pub delta_sync_hours: f64,
    /// Final validation / switchover (hours).
    pub cutover_hours: f64,
    /// Sum of the three phases (hours).
    pub total_hours: f64,
}

impl PerVMEstimate {
    /// Replication-only hours (initial + deltas).
    #[inline]
    pub fn replication_hours(&self) -> f64 {
        self.initial_replication_hours + self.delta_sync_hours
    }
}

/// A VM ID paired with its scheduling weight (hours).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedVm {
    /// VM ID.
    pub id: String,
    /// Weight (hours), normally `PerVMEstimate::total_hours`.
    pub weight_hours: f64,
}

impl WeightedVm {
    /// Creates a weighted VM.
    pub fn new(id: impl Into<String>, weight_hours: f64) -> Self {
        Self {
            id: id.into(),
            weight_hours,
        }
    }
}

impl From<&PerVMEstimate> for WeightedVm {
    fn from(estimate: &PerVMEstimate) -> Self {
        Self::new(estimate.vm_id.clone(), estimate.total_hours)
    }
}
