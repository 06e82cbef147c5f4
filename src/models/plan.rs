//! Batch and wave models.
//!
//! Both are ordered groups of VM IDs whose duration is the duration of the
//! slowest member. Batches are the automatic, bandwidth-constrained
//! execution units; waves are the named phases of a supervised rollout.

use serde::{Deserialize, Serialize};

/// Common view over batches and waves.
pub trait PlanGroup {
    /// 1-based position in the plan.
    fn number(&self) -> u32;
    /// Member VM IDs, in execution order.
    fn vm_ids(&self) -> &[String];
    /// Group duration (hours).
    fn duration_hours(&self) -> f64;
}

/// VMs migrated concurrently under a parallelism limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// 1-based batch number.
    pub number: u32,
    /// Member VM IDs.
    pub vm_ids: Vec<String>,
    /// Slowest member (the batch's critical path).
    pub critical_vm_id: String,
    /// `max(total_hours)` over members.
    pub duration_hours: f64,
}

/// A named rollout phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// 1-based wave number.
    pub number: u32,
    /// Display name ("Wave 1", ...).
    pub name: String,
    /// Member VM IDs.
    pub vm_ids: Vec<String>,
    /// Waves that must complete first.
    pub prerequisites: Vec<u32>,
    /// `max(weight)` over members.
    pub duration_hours: f64,
}

impl Batch {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.vm_ids.len()
    }

    /// Whether the batch has no members.
    pub fn is_empty(&self) -> bool {
        self.vm_ids.is_empty()
    }

    /// Whether the batch contains a VM.
    pub fn contains(&self, vm_id: &str) -> bool {
        self.vm_ids.iter().any(|id| id == vm_id)
    }
}

impl Wave {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.vm_ids.len()
    }

    /// Whether the wave has no members.
    pub fn is_empty(&self) -> bool {
        self.vm_ids.is_empty()
    }

    /// Whether the wave can start given the set of completed wave numbers.
    pub fn is_ready(&self, completed: &[u32]) -> bool {
        self.prerequisites.iter().all(|p| completed.contains(p))
    }
}

impl PlanGroup for Batch {
    fn number(&self) -> u32 {
        self.number
    }

    fn vm_ids(&self) -> &[String] {
        &self.vm_ids
    }

    fn duration_hours(&self) -> f64 {
        self.duration_hours
    }
}

impl PlanGroup for Wave {
    fn number(&self) -> u32 {
        self.number
    }

    fn vm_ids(&self) -> &[String] {
        &self.vm_ids
    }

    fn duration_hours(&self) -> f64 {
        self.duration_hours
    }
}
