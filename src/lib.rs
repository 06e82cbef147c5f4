//! Migration planning engine.
//!
//! Estimates how long, how expensive and how risky it is to move a set of
//! virtual machines onto a target platform, and partitions the VMs into
//! parallel execution batches and phased rollout waves. The engine is pure
//! computation: inventory and target data are fetched by the caller and
//! handed in as immutable snapshots.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ResourceRecord`, `TargetProfile`,
//!   `ScenarioInput`, `PerVMEstimate`, `Batch`, `Wave`, `Timeline`, `ScenarioResult`
//! - **`replication`**: Per-VM initial sync, delta sync and cutover estimation
//! - **`scheduler`**: Batch partitioning (LPT order), wave generation and plan KPIs
//! - **`cost`**: Runtime and one-time migration cost
//! - **`risk`**: Rule-based risk classification
//! - **`recommendation`**: 0–100 scenario score
//! - **`engine`**: End-to-end scenario evaluation and target comparison
//! - **`settings`**: Layered engine configuration (defaults, file, environment)
//! - **`sources`**: Inventory and target collaborator traits
//! - **`validation`**: Input integrity checks (duplicate IDs, negative sizes, wave cycles)
//!
//! # Example
//!
//! ```
//! use migration_planner::models::{ResourceRecord, ScenarioInput, TargetProfile};
//! use migration_planner::MigrationEngine;
//!
//! let target = TargetProfile::new("dc-east", 1000)
//!     .with_network(0.8, 1.0)
//!     .with_delta_syncs(0.1, 1)
//!     .with_max_parallel(10);
//! let vms = (0..4)
//!     .map(|i| ResourceRecord::new(format!("vm-{i}")).with_storage_mib(102_400.0, 204_800.0))
//!     .collect();
//!
//! let engine = MigrationEngine::default();
//! let report = engine
//!     .evaluate(&ScenarioInput::new(vms, target).with_parallel_migrations(2))
//!     .unwrap();
//!
//! assert_eq!(report.batch_plan.batch_count(), 2);
//! assert!(report.result.duration.total_hours < report.result.duration.sequential_total_hours);
//! ```
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (LPT)
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod cost;
pub mod engine;
pub mod error;
pub mod models;
pub mod recommendation;
pub mod replication;
pub mod risk;
pub mod scheduler;
pub mod settings;
pub mod sources;
pub mod validation;

pub use engine::{MigrationEngine, ScenarioReport, WavePlan};
pub use error::{EngineError, Result};
pub use settings::EngineConfig;
