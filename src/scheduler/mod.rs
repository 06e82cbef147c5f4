//! Batch and wave partitioning plus plan KPIs.
//!
//! Both partitioners consume per-VM `total_hours` as an opaque weight; they
//! never recompute transfer time.
//!
//! # Algorithms
//!
//! `BatchScheduler` groups VMs longest-first into fixed-size batches for
//! automatic parallel execution. `WaveGenerator` groups VMs smallest-first
//! (or shuffled) into numbered waves for supervised rollout. Neither is an
//! optimal bin packing; both are O(n log n) and deterministic.
//!
//! # KPI
//!
//! `PlanKpi` reports makespan, time saved, slot utilization and the number
//! of maintenance windows a plan needs.
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5

mod batch;
mod kpi;
mod wave;

pub use batch::{BatchPlan, BatchScheduler};
pub use kpi::PlanKpi;
pub use wave::{WaveGenerator, WaveStrategy};
