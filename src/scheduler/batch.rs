//! Greedy longest-first batch scheduler.
//!
//! # Algorithm
//!
//! 1. Sort estimates by `total_hours` descending (ties: VM ID ascending).
//! 2. Cut the sorted list into consecutive groups of `parallel` VMs.
//!    The last group may be smaller.
//! 3. Each group is a batch; its duration is its slowest member's.
//! 4. Batches run one after another; members of a batch run concurrently.
//!
//! This is positional grouping, not load-balanced packing. The heaviest VMs
//! land in the first batches, which surfaces the riskiest transfers early.
//!
//! # Complexity
//! O(n log n), dominated by the sort.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (LPT ordering)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::models::{Batch, EntryKind, PerVMEstimate, Timeline};

/// Output of [`BatchScheduler::schedule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    /// Batches in execution order.
    pub batches: Vec<Batch>,
    /// Concurrency used to build the plan.
    pub parallel: u32,
    /// Sum of all VM hours (no parallelism).
    pub sequential_total_hours: f64,
    /// Sum of batch durations (makespan).
    pub parallel_total_hours: f64,
}

impl BatchPlan {
    /// Number of batches.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Number of scheduled VMs.
    pub fn vm_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    /// Hours saved by running batches in parallel.
    pub fn time_saved_hours(&self) -> f64 {
        self.sequential_total_hours - self.parallel_total_hours
    }

    /// The batch containing a VM.
    pub fn batch_for_vm(&self, vm_id: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.contains(vm_id))
    }

    /// Start/end offsets for every batch and VM.
    pub fn timeline(&self, estimates: &[PerVMEstimate]) -> Timeline {
        let hours: HashMap<String, f64> = estimates
            .iter()
            .map(|e| (e.vm_id.clone(), e.total_hours))
            .collect();
        Timeline::from_groups(EntryKind::Batch, &self.batches, &hours)
    }
}

/// Partitions VMs into sequential, internally-parallel batches.
///
/// # Example
///
/// ```
/// use migration_planner::models::PerVMEstimate;
/// use migration_planner::scheduler::BatchScheduler;
///
/// let estimate = |id: &str, hours: f64| PerVMEstimate {
///     vm_id: id.into(),
///     storage_gib: 0.0,
///     effective_data_tb: 0.0,
///     initial_replication_hours: 0.0,
///     delta_sync_hours: 0.0,
///     cutover_hours: hours,
///     total_hours: hours,
/// };
/// let plan = BatchScheduler::new()
///     .schedule(&[estimate("a", 3.0), estimate("b", 5.0), estimate("c", 1.0)], 2)
///     .unwrap();
/// assert_eq!(plan.batch_count(), 2);
/// assert_eq!(plan.batches[0].vm_ids, vec!["b", "a"]);
/// assert_eq!(plan.parallel_total_hours, 6.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchScheduler;

impl BatchScheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Builds the batch plan.
    ///
    /// Fails when `parallel` is zero or a `total_hours` is negative or not
    /// finite. An empty `estimates` slice yields an empty plan with zero
    /// totals.
    pub fn schedule(&self, estimates: &[PerVMEstimate], parallel: u32) -> Result<BatchPlan> {
        if parallel == 0 {
            return Err(EngineError::invalid("parallel must be >= 1"));
        }
        if let Some(bad) = estimates
            .iter()
            .find(|e| !(e.total_hours.is_finite() && e.total_hours >= 0.0))
        {
            return Err(EngineError::invalid(format!(
                "VM '{}' has invalid total_hours {}",
                bad.vm_id, bad.total_hours
            )));
        }

        let order = sort_longest_first(estimates);
        let mut batches = Vec::with_capacity(order.len().div_ceil(parallel as usize));

        for (i, chunk) in order.chunks(parallel as usize).enumerate() {
            let members: Vec<&PerVMEstimate> = chunk.iter().map(|&idx| &estimates[idx]).collect();
            // Sorted descending, so the first member is the slowest.
            let critical = members[0];
            let duration = members
                .iter()
                .map(|e| e.total_hours)
                .fold(f64::NEG_INFINITY, f64::max);

            batches.push(Batch {
                number: i as u32 + 1,
                vm_ids: members.iter().map(|e| e.vm_id.clone()).collect(),
                critical_vm_id: critical.vm_id.clone(),
                duration_hours: duration,
            });
        }

        let sequential_total_hours = estimates.iter().map(|e| e.total_hours).sum();
        let parallel_total_hours = batches.iter().map(|b| b.duration_hours).sum();

        tracing::debug!(
            vm_count = estimates.len(),
            parallel,
            batches = batches.len(),
            parallel_total_hours,
            "Built batch plan"
        );

        Ok(BatchPlan {
            batches,
            parallel,
            sequential_total_hours,
            parallel_total_hours,
        })
    }
}

/// Indices of `estimates`, longest first, ties by VM ID.
fn sort_longest_first(estimates: &[PerVMEstimate]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..estimates.len()).collect();
    indices.sort_by(|&a, &b| {
        estimates[b]
            .total_hours
            .total_cmp(&estimates[a].total_hours)
            .then_with(|| estimates[a].vm_id.cmp(&estimates[b].vm_id))
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(id: &str, hours: f64) -> PerVMEstimate {
        PerVMEstimate {
            vm_id: id.into(),
            storage_gib: 0.0,
            effective_data_tb: 0.0,
            initial_replication_hours: hours - 2.0,
            delta_sync_hours: 0.0,
            cutover_hours: 2.0,
            total_hours: hours,
        }
    }

    #[test]
    fn test_longest_first_grouping() {
        let estimates = vec![
            est("a", 3.0),
            est("b", 10.0),
            est("c", 5.0),
            est("d", 7.0),
            est("e", 4.0),
        ];
        let plan = BatchScheduler::new().schedule(&estimates, 2).unwrap();

        assert_eq!(plan.batch_count(), 3);
        assert_eq!(plan.batches[0].vm_ids, vec!["b", "d"]);
        assert_eq!(plan.batches[1].vm_ids, vec!["c", "e"]);
        assert_eq!(plan.batches[2].vm_ids, vec!["a"]);
        assert_eq!(plan.batches[0].critical_vm_id, "b");
        assert!((plan.parallel_total_hours - (10.0 + 5.0 + 3.0)).abs() < 1e-10);
        assert!((plan.sequential_total_hours - 29.0).abs() < 1e-10);
        assert!((plan.time_saved_hours() - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let estimates = vec![est("c", 4.0), est("a", 4.0), est("b", 4.0)];
        let plan = BatchScheduler::new().schedule(&estimates, 2).unwrap();
        assert_eq!(plan.batches[0].vm_ids, vec!["a", "b"]);
        assert_eq!(plan.batches[1].vm_ids, vec!["c"]);
    }

    #[test]
    fn test_batch_duration_is_max_member() {
        let estimates: Vec<_> = (0..17)
            .map(|i| est(&format!("vm-{i:02}"), 2.0 + (i * 7 % 11) as f64))
            .collect();
        let plan = BatchScheduler::new().schedule(&estimates, 4).unwrap();
        for batch in &plan.batches {
            let max = batch
                .vm_ids
                .iter()
                .map(|id| estimates.iter().find(|e| &e.vm_id == id).unwrap().total_hours)
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(batch.duration_hours, max);
        }
        assert_eq!(plan.vm_count(), 17);
        assert_eq!(plan.batch_count(), 5); // ceil(17 / 4)
    }

    #[test]
    fn test_parallel_one_is_sequential() {
        let estimates = vec![est("a", 3.0), est("b", 4.0)];
        let plan = BatchScheduler::new().schedule(&estimates, 1).unwrap();
        assert_eq!(plan.batch_count(), 2);
        assert!((plan.parallel_total_hours - plan.sequential_total_hours).abs() < 1e-10);
    }

    #[test]
    fn test_parallel_zero_rejected() {
        let result = BatchScheduler::new().schedule(&[est("a", 1.0)], 0);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let scheduler = BatchScheduler::new();
        for bad in [f64::NAN, -1.0, f64::INFINITY] {
            let result = scheduler.schedule(&[est("a", bad), est("b", 3.0)], 2);
            assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_empty_input() {
        let plan = BatchScheduler::new().schedule(&[], 5).unwrap();
        assert_eq!(plan.batch_count(), 0);
        assert_eq!(plan.sequential_total_hours, 0.0);
        assert_eq!(plan.parallel_total_hours, 0.0);
    }

    #[test]
    fn test_timeline_offsets() {
        let estimates = vec![est("a", 3.0), est("b", 10.0), est("c", 5.0)];
        let plan = BatchScheduler::new().schedule(&estimates, 2).unwrap();
        let timeline = plan.timeline(&estimates);

        let a = timeline.entry_for_vm("a").unwrap();
        assert_eq!(a.group, 2);
        assert!((a.start_offset_hours - 10.0).abs() < 1e-10);
        assert!((a.end_offset_hours - 13.0).abs() < 1e-10);
        assert!((timeline.makespan_hours() - plan.parallel_total_hours).abs() < 1e-10);
        assert_eq!(plan.batch_for_vm("c").map(|b| b.number), Some(1));
    }
}
