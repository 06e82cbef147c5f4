//! Plan quality metrics (KPIs).
//!
//! Computes summary indicators from a plan's timeline.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Sum of group durations |
//! | Sequential hours | Sum of member durations |
//! | Time saved | Sequential - makespan |
//! | Speedup | Sequential / makespan |
//! | Slot utilization | Sequential / (Σ group duration × slots) |
//! | Windows required | Maintenance windows needed, groups packed in order |
//! | Groups exceeding window | Groups longer than one window |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{EntryKind, Timeline};

const EPSILON: f64 = 1e-9;

/// Plan performance indicators. All durations are in hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanKpi {
    /// Number of groups (batches or waves).
    pub group_count: usize,
    /// Total plan length.
    pub makespan_hours: f64,
    /// Length if every VM ran alone, one after another.
    pub sequential_hours: f64,
    /// `sequential_hours - makespan_hours`.
    pub time_saved_hours: f64,
    /// `sequential_hours / makespan_hours` (1.0 for an empty plan).
    pub speedup: f64,
    /// Busy fraction of the available concurrent slots (0.0..1.0).
    pub slot_utilization: f64,
    /// Maintenance windows needed when groups are packed in order.
    pub maintenance_windows_required: u32,
    /// Groups that do not fit in a single window.
    pub groups_exceeding_window: usize,
}

impl PlanKpi {
    /// Computes KPIs from a timeline.
    ///
    /// # Arguments
    /// * `timeline` - Batch or wave timeline.
    /// * `slots` - Concurrent slots per group (parallelism or wave size).
    /// * `window_hours` - Maintenance window length.
    pub fn calculate(timeline: &Timeline, slots: u32, window_hours: f64) -> Result<Self> {
        if slots == 0 {
            return Err(EngineError::invalid("slots must be >= 1"));
        }
        if !(window_hours.is_finite() && window_hours > 0.0) {
            return Err(EngineError::invalid(format!(
                "maintenance window must be > 0, got {window_hours}"
            )));
        }

        let groups: Vec<f64> = timeline
            .group_entries()
            .iter()
            .map(|e| e.duration_hours)
            .collect();
        let sequential: f64 = timeline
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Vm)
            .map(|e| e.duration_hours)
            .sum();
        let makespan: f64 = groups.iter().sum();

        let speedup = if makespan > 0.0 {
            sequential / makespan
        } else {
            1.0
        };
        let slot_utilization = if makespan > 0.0 {
            sequential / (makespan * slots as f64)
        } else {
            0.0
        };

        Ok(Self {
            group_count: groups.len(),
            makespan_hours: makespan,
            sequential_hours: sequential,
            time_saved_hours: sequential - makespan,
            speedup,
            slot_utilization,
            maintenance_windows_required: pack_windows(&groups, window_hours),
            groups_exceeding_window: groups
                .iter()
                .filter(|&&d| d > window_hours + EPSILON)
                .count(),
        })
    }

    /// Whether the plan fits in the given number of windows.
    pub fn meets_window(&self, max_windows: u32) -> bool {
        self.maintenance_windows_required <= max_windows
    }
}

/// Packs group durations into windows, in order, without reordering.
///
/// A group that fits in the current window's remaining time joins it;
/// otherwise it opens as many fresh windows as it needs.
fn pack_windows(durations: &[f64], window_hours: f64) -> u32 {
    let mut windows: u32 = 0;
    let mut remaining = 0.0;

    for &d in durations {
        if d <= remaining + EPSILON {
            remaining -= d;
            continue;
        }
        let needed = (d / window_hours).ceil().max(1.0);
        windows += needed as u32;
        remaining = needed * window_hours - d;
    }

    windows
}
