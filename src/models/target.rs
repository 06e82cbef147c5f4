//! Destination platform profile.
//!
//! Describes the network path to a target platform, the data-reduction
//! ratios achieved on the wire, and the platform's unit prices. Values are
//! range-checked by [`TargetProfile::validate`]; an out-of-range value is a
//! configuration error, never silently clamped.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A migration target (cloud region, private cluster, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Unique target identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Nominal link bandwidth (Mbps). Must be > 0.
    pub bandwidth_mbps: u32,
    /// Usable fraction of nominal bandwidth, in (0, 1].
    pub network_efficiency: f64,
    /// Compressed size / original size, in (0, 1]. Lower = more compression.
    pub compression_ratio: f64,
    /// Deduplicated size / original size, in (0, 1].
    pub dedup_ratio: f64,
    /// Fraction of data changing between syncs, in [0, 1].
    pub change_rate_percent: f64,
    /// Number of incremental syncs before cutover (>= 1).
    pub delta_sync_count: u32,
    /// Protocol overhead divisor (>= 1.0).
    pub network_protocol_overhead: f64,
    /// Compute price per vCPU-hour.
    pub compute_cost_per_vcpu_hr: f64,
    /// Memory price per GiB-hour.
    pub memory_cost_per_gb_hr: f64,
    /// Storage price per GiB-month.
    pub storage_cost_per_gb_mo: f64,
    /// Ingress price per GiB.
    pub network_ingress_cost_per_gb: f64,
    /// Egress price per GiB.
    pub network_egress_cost_per_gb: f64,
    /// Platform limit on concurrent migrations (>= 1).
    pub max_parallel_migrations: u32,
    /// Whether running VMs can be moved without downtime.
    #[serde(default)]
    pub supports_live_migration: bool,
}

impl TargetProfile {
    /// Creates a target with neutral ratios, one delta sync and zero prices.
    pub fn new(id: impl Into<String>, bandwidth_mbps: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            bandwidth_mbps,
            network_efficiency: 1.0,
            compression_ratio: 1.0,
            dedup_ratio: 1.0,
            change_rate_percent: 0.0,
            delta_sync_count: 1,
            network_protocol_overhead: 1.0,
            compute_cost_per_vcpu_hr: 0.0,
            memory_cost_per_gb_hr: 0.0,
            storage_cost_per_gb_mo: 0.0,
            network_ingress_cost_per_gb: 0.0,
            network_egress_cost_per_gb: 0.0,
            max_parallel_migrations: 1,
            supports_live_migration: false,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets network efficiency and protocol overhead.
    pub fn with_network(mut self, efficiency: f64, protocol_overhead: f64) -> Self {
        self.network_efficiency = efficiency;
        self.network_protocol_overhead = protocol_overhead;
        self
    }

    /// Sets compression and deduplication ratios.
    pub fn with_data_reduction(mut self, compression_ratio: f64, dedup_ratio: f64) -> Self {
        self.compression_ratio = compression_ratio;
        self.dedup_ratio = dedup_ratio;
        self
    }

    /// Sets the change rate and the number of delta syncs.
    pub fn with_delta_syncs(mut self, change_rate_percent: f64, delta_sync_count: u32) -> Self {
        self.change_rate_percent = change_rate_percent;
        self.delta_sync_count = delta_sync_count;
        self
    }

    /// Sets compute, memory and storage prices.
    pub fn with_runtime_prices(
        mut self,
        compute_per_vcpu_hr: f64,
        memory_per_gb_hr: f64,
        storage_per_gb_mo: f64,
    ) -> Self {
        self.compute_cost_per_vcpu_hr = compute_per_vcpu_hr;
        self.memory_cost_per_gb_hr = memory_per_gb_hr;
        self.storage_cost_per_gb_mo = storage_per_gb_mo;
        self
    }

    /// Sets network transfer prices.
    pub fn with_network_prices(mut self, ingress_per_gb: f64, egress_per_gb: f64) -> Self {
        self.network_ingress_cost_per_gb = ingress_per_gb;
        self.network_egress_cost_per_gb = egress_per_gb;
        self
    }

    /// Sets the platform concurrency limit.
    pub fn with_max_parallel(mut self, max_parallel_migrations: u32) -> Self {
        self.max_parallel_migrations = max_parallel_migrations;
        self
    }

    /// Sets live migration support.
    pub fn with_live_migration(mut self, supported: bool) -> Self {
        self.supports_live_migration = supported;
        self
    }

    /// Effective bandwidth (Mbps): nominal × efficiency / protocol overhead.
    #[inline]
    pub fn effective_bandwidth_mbps(&self) -> f64 {
        self.bandwidth_mbps as f64 * self.network_efficiency / self.network_protocol_overhead
    }

    /// Combined data-reduction factor (compression × dedup).
    #[inline]
    pub fn reduction_factor(&self) -> f64 {
        self.compression_ratio * self.dedup_ratio
    }

    /// Checks every field against its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.bandwidth_mbps == 0 {
            return Err(self.error("bandwidth_mbps must be > 0"));
        }
        unit_interval(self, "network_efficiency", self.network_efficiency)?;
        unit_interval(self, "compression_ratio", self.compression_ratio)?;
        unit_interval(self, "dedup_ratio", self.dedup_ratio)?;

        if !(0.0..=1.0).contains(&self.change_rate_percent) {
            return Err(self.error(format!(
                "change_rate_percent must be in [0, 1], got {}",
                self.change_rate_percent
            )));
        }
        if self.delta_sync_count == 0 {
            return Err(self.error("delta_sync_count must be >= 1"));
        }
        if !self.network_protocol_overhead.is_finite() || self.network_protocol_overhead < 1.0 {
            return Err(self.error(format!(
                "network_protocol_overhead must be >= 1.0, got {}",
                self.network_protocol_overhead
            )));
        }

        let rates = [
            ("compute_cost_per_vcpu_hr", self.compute_cost_per_vcpu_hr),
            ("memory_cost_per_gb_hr", self.memory_cost_per_gb_hr),
            ("storage_cost_per_gb_mo", self.storage_cost_per_gb_mo),
            ("network_ingress_cost_per_gb", self.network_ingress_cost_per_gb),
            ("network_egress_cost_per_gb", self.network_egress_cost_per_gb),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(self.error(format!("{field} must be >= 0, got {value}")));
            }
        }

        if self.max_parallel_migrations == 0 {
            return Err(self.error("max_parallel_migrations must be >= 1"));
        }
        if self.effective_bandwidth_mbps() <= 0.0 {
            return Err(self.error("effective bandwidth must be > 0"));
        }
        Ok(())
    }

    fn error(&self, message: impl AsRef<str>) -> EngineError {
        EngineError::invalid(format!("target '{}': {}", self.id, message.as_ref()))
    }
}

fn unit_interval(target: &TargetProfile, field: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(target.error(format!("{field} must be in (0, 1], got {value}")))
    }
}
