//! Migration and runtime cost model.
//!
//! # One-time (migration) cost
//!
//! ```text
//! labor   = per_vm_fee × vm_count + coordination_cost_per_day × duration_days
//! network = effective_data_gb × egress per GB
//! total   = (labor + network) × strategy_multiplier
//! ```
//!
//! # Recurring (monthly) cost
//!
//! ```text
//! compute = Σ vcpus × compute_per_vcpu_hr × 730
//! memory  = Σ memory_gib × memory_per_gb_hr × 730
//! storage = Σ provisioned_gib × storage_per_gb_mo
//! ```
//!
//! Strategies that do not run the workload on the target (`retain`,
//! `retire`) have no recurring target cost.

use crate::error::{EngineError, Result};
use crate::models::{CostBreakdown, MigrationStrategy, ResourceRecord, TargetProfile, MIB_PER_GIB};
use crate::replication::ReplicationTimeModel;
use crate::settings::CostConfig;
use crate::validation::validate_records;

/// Billable hours in an average month.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Cost estimator with an injectable strategy/labor table.
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    config: CostConfig,
}

impl CostModel {
    /// Creates a model from configuration.
    pub fn new(config: CostConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Estimates one-time and monthly cost for a VM set.
    ///
    /// A zero-VM scenario costs nothing. Negative inputs are rejected.
    pub fn estimate(
        &self,
        records: &[ResourceRecord],
        target: &TargetProfile,
        duration_days: f64,
        strategy: MigrationStrategy,
    ) -> Result<CostBreakdown> {
        target.validate()?;
        validate_records(records)?;
        if !(duration_days.is_finite() && duration_days >= 0.0) {
            return Err(EngineError::invalid(format!(
                "duration_days must be >= 0, got {duration_days}"
            )));
        }
        if records.is_empty() {
            return Ok(CostBreakdown::default());
        }

        let multiplier = self.config.strategy_multipliers.get(strategy);
        let labor_rates = &self.config.labor;

        let labor = (labor_rates.per_vm_fee * records.len() as f64
            + labor_rates.coordination_cost_per_day * duration_days)
            * multiplier;

        let effective_data_gb: f64 = records
            .iter()
            .map(|r| ReplicationTimeModel::effective_data_tb(r.storage_in_use_gib(), target))
            .sum::<f64>()
            * MIB_PER_GIB;
        let network = effective_data_gb * target.network_egress_cost_per_gb * multiplier;

        let (compute, memory, storage) = if strategy.runs_on_target() {
            let vcpus: f64 = records.iter().map(|r| r.vcpus as f64).sum();
            let memory_gib: f64 = records.iter().map(ResourceRecord::memory_gib).sum();
            let provisioned_gib: f64 = records
                .iter()
                .map(ResourceRecord::storage_provisioned_gib)
                .sum();
            (
                vcpus * target.compute_cost_per_vcpu_hr * HOURS_PER_MONTH,
                memory_gib * target.memory_cost_per_gb_hr * HOURS_PER_MONTH,
                provisioned_gib * target.storage_cost_per_gb_mo,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let breakdown = CostBreakdown {
            compute,
            memory,
            storage,
            network,
            labor,
            migration_total: labor + network,
            runtime_monthly_total: compute + memory + storage,
        };

        tracing::debug!(
            target = %target.id,
            %strategy,
            vm_count = records.len(),
            migration_total = breakdown.migration_total,
            runtime_monthly_total = breakdown.runtime_monthly_total,
            "Estimated cost"
        );
        Ok(breakdown)
    }
}
