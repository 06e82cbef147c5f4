//! Replication time model.
//!
//! Converts a VM's in-use storage and a target's network profile into
//! phase-level hours:
//!
//! ```text
//! effective_bw   = bandwidth × efficiency / protocol_overhead        (Mbps)
//! effective_tb   = storage_gib / 1024 × compression × dedup          (TiB)
//! initial        = effective_tb × 1024 × 1024 × 8 / (effective_bw × 3600)
//! delta          = delta_sync_count × initial × change_rate
//! total          = initial + delta + cutover
//! ```
//!
//! Deltas are compressed like the initial copy, so the same reduction
//! applies. Cutover is a flat per-VM cost independent of data volume.

use crate::error::{EngineError, Result};
use crate::models::{PerVMEstimate, ResourceRecord, TargetProfile, MIB_PER_GIB};
use crate::settings::ReplicationConfig;

/// Mebibits per tebibyte.
const MIBIT_PER_TIB: f64 = 1024.0 * 1024.0 * 8.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Phase-level transfer time estimator.
///
/// Pure and deterministic: identical inputs give bit-identical estimates.
#[derive(Debug, Clone)]
pub struct ReplicationTimeModel {
    cutover_hours: f64,
}

impl ReplicationTimeModel {
    /// Creates a model from configuration.
    pub fn new(config: &ReplicationConfig) -> Self {
        Self {
            cutover_hours: config.cutover_hours,
        }
    }

    /// Flat cutover cost per VM (hours).
    pub fn cutover_hours(&self) -> f64 {
        self.cutover_hours
    }

    /// Data sent for one VM after compression and dedup (TiB).
    pub fn effective_data_tb(storage_gib: f64, target: &TargetProfile) -> f64 {
        storage_gib / MIB_PER_GIB * target.reduction_factor()
    }

    /// Hours to move `effective_data_tb` at `effective_bandwidth_mbps`.
    ///
    /// Fails when the bandwidth is not positive.
    pub fn transfer_hours(effective_data_tb: f64, effective_bandwidth_mbps: f64) -> Result<f64> {
        if !(effective_bandwidth_mbps.is_finite() && effective_bandwidth_mbps > 0.0) {
            return Err(EngineError::invalid(format!(
                "effective bandwidth must be > 0, got {effective_bandwidth_mbps}"
            )));
        }
        Ok(effective_data_tb * MIBIT_PER_TIB / (effective_bandwidth_mbps * SECONDS_PER_HOUR))
    }

    /// Estimates one VM with an explicit delta sync count.
    pub fn estimate(
        &self,
        record: &ResourceRecord,
        target: &TargetProfile,
        delta_sync_count: u32,
    ) -> Result<PerVMEstimate> {
        target.validate()?;
        if delta_sync_count == 0 {
            return Err(EngineError::invalid("delta_sync_count must be >= 1"));
        }
        self.estimate_validated(record, target, delta_sync_count)
    }

    /// Estimates every record using the target's delta sync count.
    pub fn estimate_all(
        &self,
        records: &[ResourceRecord],
        target: &TargetProfile,
    ) -> Result<Vec<PerVMEstimate>> {
        target.validate()?;
        let estimates = records
            .iter()
            .map(|r| self.estimate_validated(r, target, target.delta_sync_count))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            target = %target.id,
            vm_count = estimates.len(),
            effective_bandwidth_mbps = target.effective_bandwidth_mbps(),
            "Estimated replication time"
        );
        Ok(estimates)
    }

    fn estimate_validated(
        &self,
        record: &ResourceRecord,
        target: &TargetProfile,
        delta_sync_count: u32,
    ) -> Result<PerVMEstimate> {
        let storage_gib = record.storage_in_use_gib();
        if !(storage_gib.is_finite() && storage_gib >= 0.0) {
            return Err(EngineError::invalid(format!(
                "record '{}' has invalid storage_in_use_mib {}",
                record.id, record.storage_in_use_mib
            )));
        }

        let (effective_data_tb, initial, delta) = if storage_gib == 0.0 {
            (0.0, 0.0, 0.0)
        } else {
            let data_tb = Self::effective_data_tb(storage_gib, target);
            let initial = Self::transfer_hours(data_tb, target.effective_bandwidth_mbps())?;
            let delta = delta_sync_count as f64 * initial * target.change_rate_percent;
            (data_tb, initial, delta)
        };

        Ok(PerVMEstimate {
            vm_id: record.id.clone(),
            storage_gib,
            effective_data_tb,
            initial_replication_hours: initial,
            delta_sync_hours: delta,
            cutover_hours: self.cutover_hours,
            total_hours: initial + delta + self.cutover_hours,
        })
    }
}

impl Default for ReplicationTimeModel {
    fn default() -> Self {
        Self::new(&ReplicationConfig::default())
    }
}
