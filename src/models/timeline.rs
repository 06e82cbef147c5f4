//! Timeline model.
//!
//! A timeline lays the groups of a plan (batches or waves) back to back
//! from offset zero. Every member starts when its group starts. The
//! entries carry enough information to drive an external Gantt view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::PlanGroup;

/// What a timeline entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A single VM.
    Vm,
    /// A batch (automatic parallel group).
    Batch,
    /// A wave (supervised rollout phase).
    Wave,
}

/// One bar on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// VM ID, or the group's label for group entries.
    pub id: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Owning group number (1-based).
    pub group: u32,
    /// Start offset from plan start (hours).
    pub start_offset_hours: f64,
    /// End offset from plan start (hours).
    pub end_offset_hours: f64,
    /// `end - start` (hours).
    pub duration_hours: f64,
}

/// Ordered timeline of a batch or wave plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Group entries followed by their members, in plan order.
    pub entries: Vec<TimelineEntry>,
}

impl TimelineEntry {
    fn new(id: impl Into<String>, kind: EntryKind, group: u32, start: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            group,
            start_offset_hours: start,
            end_offset_hours: start + duration,
            duration_hours: duration,
        }
    }
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out groups sequentially.
    ///
    /// `group_kind` is [`EntryKind::Batch`] or [`EntryKind::Wave`];
    /// `vm_hours` maps each member ID to its own duration. Members missing
    /// from the map are drawn for the full group duration.
    pub fn from_groups<G: PlanGroup>(
        group_kind: EntryKind,
        groups: &[G],
        vm_hours: &HashMap<String, f64>,
    ) -> Self {
        let label = match group_kind {
            EntryKind::Wave => "wave",
            _ => "batch",
        };
        let mut timeline = Self::new();
        let mut offset = 0.0;

        for group in groups {
            let number = group.number();
            let duration = group.duration_hours();
            timeline.entries.push(TimelineEntry::new(
                format!("{label}-{number}"),
                group_kind,
                number,
                offset,
                duration,
            ));
            for vm_id in group.vm_ids() {
                let hours = vm_hours.get(vm_id).copied().unwrap_or(duration);
                timeline
                    .entries
                    .push(TimelineEntry::new(vm_id.clone(), EntryKind::Vm, number, offset, hours));
            }
            offset += duration;
        }

        timeline
    }

    /// Latest end offset (hours).
    pub fn makespan_hours(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.end_offset_hours)
            .fold(0.0, f64::max)
    }

    /// The group-level entries only.
    pub fn group_entries(&self) -> Vec<&TimelineEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind != EntryKind::Vm)
            .collect()
    }

    /// VM entries belonging to a group.
    pub fn entries_for_group(&self, group: u32) -> Vec<&TimelineEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Vm && e.group == group)
            .collect()
    }

    /// The entry for one VM.
    pub fn entry_for_vm(&self, vm_id: &str) -> Option<&TimelineEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == EntryKind::Vm && e.id == vm_id)
    }

    /// Number of VM entries.
    pub fn vm_count(&self) -> usize {
        self.entries.iter().filter(|e| e.kind == EntryKind::Vm).count()
    }
}
