//! Scenario result model.
//!
//! Explicit, named-field result types. The caller owns and persists them;
//! `to_json` is the adapter for dynamically-typed transports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration summary for a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    /// Initial replication hours on the critical path.
    pub initial_replication_hours: f64,
    /// Delta sync hours on the critical path.
    pub delta_sync_hours: f64,
    /// Cutover hours on the critical path.
    pub cutover_hours: f64,
    /// Parallel makespan (hours).
    pub total_hours: f64,
    /// `total_hours / 24`.
    pub total_days: f64,
    /// Baseline without parallelism (hours).
    pub sequential_total_hours: f64,
    /// `sequential_total_hours - total_hours`.
    pub time_saved_hours: f64,
}

/// Cost categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    /// Monthly vCPU cost.
    Compute,
    /// Monthly memory cost.
    Memory,
    /// Monthly storage cost.
    Storage,
    /// One-time transfer cost.
    Network,
    /// One-time labor cost.
    Labor,
}

impl CostCategory {
    /// All categories, in reporting order.
    pub const ALL: [CostCategory; 5] = [
        Self::Compute,
        Self::Memory,
        Self::Storage,
        Self::Network,
        Self::Labor,
    ];
}

/// Cost of a scenario, by category.
///
/// Network and labor already include the strategy multiplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Monthly compute.
    pub compute: f64,
    /// Monthly memory.
    pub memory: f64,
    /// Monthly storage.
    pub storage: f64,
    /// One-time network.
    pub network: f64,
    /// One-time labor.
    pub labor: f64,
    /// One-time total (network + labor).
    pub migration_total: f64,
    /// Recurring monthly total (compute + memory + storage).
    pub runtime_monthly_total: f64,
}

impl CostBreakdown {
    /// Amount for one category.
    pub fn amount(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Compute => self.compute,
            CostCategory::Memory => self.memory,
            CostCategory::Storage => self.storage,
            CostCategory::Network => self.network,
            CostCategory::Labor => self.labor,
        }
    }

    /// Non-zero categories, in reporting order.
    pub fn categories(&self) -> Vec<(CostCategory, f64)> {
        CostCategory::ALL
            .iter()
            .map(|&c| (c, self.amount(c)))
            .filter(|(_, amount)| *amount != 0.0)
            .collect()
    }

    /// One-time plus first-month cost.
    pub fn total(&self) -> f64 {
        self.migration_total + self.runtime_monthly_total
    }
}

/// Qualitative risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No risk factors.
    #[default]
    Low,
    /// One risk factor.
    Medium,
    /// Several factors, or a hard blocker.
    High,
}

impl RiskLevel {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contributing risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Too many VMs.
    LargeScale,
    /// Too much data for the link.
    BandwidthConstrained,
    /// Strategy changes the application architecture.
    ArchitectureChange,
    /// Running VMs must be stopped to move.
    DowntimeRequired,
}

impl RiskFactor {
    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LargeScale => "large_scale",
            Self::BandwidthConstrained => "bandwidth_constrained",
            Self::ArchitectureChange => "architecture_change",
            Self::DowntimeRequired => "downtime_required",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level plus the factors that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall level.
    pub level: RiskLevel,
    /// Factors, in evaluation order.
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Whether a factor is present.
    pub fn has(&self, factor: RiskFactor) -> bool {
        self.factors.contains(&factor)
    }
}

/// Final summary of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Target the scenario was evaluated against.
    pub target_id: String,
    /// Number of VMs in the scenario.
    pub vm_count: usize,
    /// Duration summary.
    pub duration: DurationSummary,
    /// Cost breakdown.
    pub cost: CostBreakdown,
    /// Risk assessment.
    pub risk: RiskAssessment,
    /// Suitability score in [0, 100].
    pub recommendation_score: f64,
    /// `recommendation_score >= threshold`.
    pub recommended: bool,
}

impl ScenarioResult {
    /// Serializes to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
