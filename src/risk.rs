//! Rule-based risk scorer.
//!
//! Rules are evaluated in a fixed order and every matching rule adds a
//! factor:
//!
//! 1. `large_scale`: VM count above the configured threshold.
//! 2. `bandwidth_constrained`: moving all reduced data over the effective
//!    link would take longer than `max_transfer_hours`.
//! 3. `architecture_change`: strategy is `refactor` or `repurchase`.
//! 4. `downtime_required`: target has no live migration and at least one
//!    VM is powered on.
//!
//! Level: `high` with two or more factors or any configured hard blocker,
//! `medium` with exactly one, `low` with none.

use crate::error::Result;
use crate::models::{
    MigrationStrategy, ResourceRecord, RiskAssessment, RiskFactor, RiskLevel, TargetProfile,
};
use crate::replication::ReplicationTimeModel;
use crate::settings::RiskConfig;
use crate::validation::validate_records;

/// Deterministic risk scorer.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    /// Creates a scorer from configuration.
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Assesses a VM set against a target.
    pub fn assess(
        &self,
        records: &[ResourceRecord],
        target: &TargetProfile,
        strategy: MigrationStrategy,
    ) -> Result<RiskAssessment> {
        target.validate()?;
        validate_records(records)?;
        if records.is_empty() {
            return Ok(RiskAssessment::default());
        }

        let mut factors = Vec::new();

        if records.len() > self.config.large_scale_vm_threshold {
            factors.push(RiskFactor::LargeScale);
        }

        let transfer_hours = self.aggregate_transfer_hours(records, target)?;
        if transfer_hours > self.config.max_transfer_hours {
            factors.push(RiskFactor::BandwidthConstrained);
        }

        if strategy.changes_architecture() {
            factors.push(RiskFactor::ArchitectureChange);
        }

        if !target.supports_live_migration && records.iter().any(ResourceRecord::is_powered_on) {
            factors.push(RiskFactor::DowntimeRequired);
        }

        let level = self.level_for(&factors);
        if level == RiskLevel::High {
            tracing::info!(target = %target.id, ?factors, "High migration risk");
        } else {
            tracing::debug!(target = %target.id, %level, ?factors, "Assessed risk");
        }
        Ok(RiskAssessment { level, factors })
    }

    /// Hours to move the whole VM set's reduced data over the link.
    fn aggregate_transfer_hours(
        &self,
        records: &[ResourceRecord],
        target: &TargetProfile,
    ) -> Result<f64> {
        let data_tb: f64 = records
            .iter()
            .map(|r| ReplicationTimeModel::effective_data_tb(r.storage_in_use_gib(), target))
            .sum();
        ReplicationTimeModel::transfer_hours(data_tb, target.effective_bandwidth_mbps())
    }

    fn level_for(&self, factors: &[RiskFactor]) -> RiskLevel {
        let blocked = factors
            .iter()
            .any(|f| self.config.hard_blockers.contains(f));
        match factors.len() {
            _ if blocked => RiskLevel::High,
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}
