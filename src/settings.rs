//! Engine configuration.
//!
//! Groups the injectable tables (strategy multipliers, labor rates, risk
//! thresholds, scoring weights). Every field has a default, so a partial
//! file only overrides what it names.
//!
//! # Loading
//!
//! [`EngineConfig::load`] layers, lowest precedence first:
//! 1. built-in defaults
//! 2. an optional file (format chosen by extension: TOML, JSON, YAML)
//! 3. environment variables `MIGRATION_PLANNER__<SECTION>__<FIELD>`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::models::{MigrationStrategy, RiskFactor, RiskLevel};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MIGRATION_PLANNER";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Replication model settings.
    pub replication: ReplicationConfig,
    /// Cost model settings.
    pub cost: CostConfig,
    /// Risk scorer settings.
    pub risk: RiskConfig,
    /// Recommendation scorer settings.
    pub scoring: ScoringConfig,
}

/// Replication model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationConfig {
    /// Flat per-VM validation / switchover time (hours).
    pub cutover_hours: f64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self { cutover_hours: 2.0 }
    }
}

/// One-time cost multiplier per strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyMultipliers {
    /// Lift and shift.
    pub rehost: f64,
    /// Lift, tinker and shift.
    pub replatform: f64,
    /// Re-architect.
    pub refactor: f64,
    /// Replace.
    pub repurchase: f64,
    /// Keep.
    pub retain: f64,
    /// Decommission.
    pub retire: f64,
}

impl Default for StrategyMultipliers {
    fn default() -> Self {
        Self {
            rehost: 1.0,
            replatform: 1.3,
            refactor: 2.0,
            repurchase: 1.5,
            retain: 0.2,
            retire: 0.1,
        }
    }
}

impl StrategyMultipliers {
    /// Multiplier for a strategy.
    pub fn get(&self, strategy: MigrationStrategy) -> f64 {
        match strategy {
            MigrationStrategy::Rehost => self.rehost,
            MigrationStrategy::Replatform => self.replatform,
            MigrationStrategy::Refactor => self.refactor,
            MigrationStrategy::Repurchase => self.repurchase,
            MigrationStrategy::Retain => self.retain,
            MigrationStrategy::Retire => self.retire,
        }
    }
}

/// Labor proxy rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborRates {
    /// Fixed fee per VM.
    pub per_vm_fee: f64,
    /// Project coordination cost per calendar day of migration.
    pub coordination_cost_per_day: f64,
}

impl Default for LaborRates {
    fn default() -> Self {
        Self {
            per_vm_fee: 150.0,
            coordination_cost_per_day: 400.0,
        }
    }
}

/// Cost model settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Strategy complexity multipliers.
    pub strategy_multipliers: StrategyMultipliers,
    /// Labor rates.
    pub labor: LaborRates,
}

/// Risk scorer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// VM count strictly above this is "large scale".
    pub large_scale_vm_threshold: usize,
    /// Aggregate transfer time above this (hours) is "bandwidth constrained".
    pub max_transfer_hours: f64,
    /// Factors that force `high` on their own.
    pub hard_blockers: Vec<RiskFactor>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            large_scale_vm_threshold: 100,
            max_transfer_hours: 72.0,
            hard_blockers: Vec::new(),
        }
    }
}

/// Recommendation scorer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the cost sub-score.
    pub cost_weight: f64,
    /// Weight of the duration sub-score.
    pub duration_weight: f64,
    /// Cost at which the cost sub-score is 50.
    pub reference_cost: f64,
    /// Duration (days) at which the duration sub-score is 50.
    pub reference_days: f64,
    /// Months of runtime added to one-time cost when scoring.
    pub runtime_horizon_months: f64,
    /// Penalty for medium risk (points, >= 0).
    pub medium_risk_penalty: f64,
    /// Penalty for high risk (points, >= medium).
    pub high_risk_penalty: f64,
    /// Bonus when the target supports live migration.
    pub live_migration_bonus: f64,
    /// Minimum score for `recommended`.
    pub recommendation_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cost_weight: 0.5,
            duration_weight: 0.5,
            reference_cost: 100_000.0,
            reference_days: 30.0,
            runtime_horizon_months: 12.0,
            medium_risk_penalty: 20.0,
            high_risk_penalty: 40.0,
            live_migration_bonus: 5.0,
            recommendation_threshold: 70.0,
        }
    }
}

impl ScoringConfig {
    /// Penalty points for a risk level.
    pub fn risk_penalty(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::Low => 0.0,
            RiskLevel::Medium => self.medium_risk_penalty,
            RiskLevel::High => self.high_risk_penalty,
        }
    }
}

impl EngineConfig {
    /// Loads defaults, then an optional file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        tracing::debug!(
            file = ?path.map(|p| p.display().to_string()),
            "Loaded engine configuration"
        );
        Ok(loaded)
    }

    /// Rejects negative or non-finite values and inverted penalties.
    pub fn validate(&self) -> Result<()> {
        if !(self.replication.cutover_hours.is_finite() && self.replication.cutover_hours > 0.0) {
            return Err(EngineError::invalid(
                "replication.cutover_hours must be > 0",
            ));
        }

        for strategy in MigrationStrategy::ALL {
            non_negative(
                &format!("cost.strategy_multipliers.{strategy}"),
                self.cost.strategy_multipliers.get(strategy),
            )?;
        }
        non_negative("cost.labor.per_vm_fee", self.cost.labor.per_vm_fee)?;
        non_negative(
            "cost.labor.coordination_cost_per_day",
            self.cost.labor.coordination_cost_per_day,
        )?;

        if !(self.risk.max_transfer_hours.is_finite() && self.risk.max_transfer_hours > 0.0) {
            return Err(EngineError::invalid("risk.max_transfer_hours must be > 0"));
        }

        let s = &self.scoring;
        non_negative("scoring.cost_weight", s.cost_weight)?;
        non_negative("scoring.duration_weight", s.duration_weight)?;
        if s.cost_weight + s.duration_weight <= 0.0 {
            return Err(EngineError::invalid(
                "scoring weights must not both be zero",
            ));
        }
        positive("scoring.reference_cost", s.reference_cost)?;
        positive("scoring.reference_days", s.reference_days)?;
        non_negative("scoring.runtime_horizon_months", s.runtime_horizon_months)?;
        non_negative("scoring.medium_risk_penalty", s.medium_risk_penalty)?;
        non_negative("scoring.live_migration_bonus", s.live_migration_bonus)?;
        if !(s.high_risk_penalty.is_finite() && s.high_risk_penalty >= s.medium_risk_penalty) {
            return Err(EngineError::invalid(
                "scoring.high_risk_penalty must be >= scoring.medium_risk_penalty",
            ));
        }
        if !(0.0..=100.0).contains(&s.recommendation_threshold) {
            return Err(EngineError::invalid(
                "scoring.recommendation_threshold must be in [0, 100]",
            ));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!("{field} must be >= 0, got {value}")))
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!("{field} must be > 0, got {value}")))
    }
}
