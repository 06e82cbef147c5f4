//! Scenario input model.
//!
//! A scenario pairs a VM selection with one target profile and a migration
//! strategy. Comparing several targets means evaluating several scenarios.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ResourceRecord, TargetProfile};
use crate::error::{EngineError, Result};

/// The "6 Rs" migration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStrategy {
    /// Lift and shift.
    #[default]
    Rehost,
    /// Lift, tinker and shift.
    Replatform,
    /// Re-architect.
    Refactor,
    /// Replace with a different product.
    Repurchase,
    /// Keep on the source platform.
    Retain,
    /// Decommission.
    Retire,
}

impl MigrationStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [MigrationStrategy; 6] = [
        Self::Rehost,
        Self::Replatform,
        Self::Refactor,
        Self::Repurchase,
        Self::Retain,
        Self::Retire,
    ];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rehost => "rehost",
            Self::Replatform => "replatform",
            Self::Refactor => "refactor",
            Self::Repurchase => "repurchase",
            Self::Retain => "retain",
            Self::Retire => "retire",
        }
    }

    /// Whether the strategy changes the application's architecture.
    pub fn changes_architecture(&self) -> bool {
        matches!(self, Self::Refactor | Self::Repurchase)
    }

    /// Whether workloads end up running on the target platform.
    pub fn runs_on_target(&self) -> bool {
        !matches!(self, Self::Retain | Self::Retire)
    }
}

impl fmt::Display for MigrationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scenario settings shared when one VM set is evaluated against
/// several targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOptions {
    /// Migration strategy.
    #[serde(default)]
    pub strategy: MigrationStrategy,
    /// Requested concurrency (>= 1).
    pub parallel_migrations: u32,
    /// Length of one maintenance window (hours, > 0).
    pub maintenance_window_hours: f64,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            strategy: MigrationStrategy::Rehost,
            parallel_migrations: 1,
            maintenance_window_hours: 8.0,
        }
    }
}

/// Everything needed to evaluate one migration scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// VMs to migrate.
    pub resource_records: Vec<ResourceRecord>,
    /// Destination platform.
    pub target: TargetProfile,
    /// Migration strategy.
    #[serde(default)]
    pub strategy: MigrationStrategy,
    /// Requested concurrency (>= 1).
    pub parallel_migrations: u32,
    /// Length of one maintenance window (hours, > 0).
    pub maintenance_window_hours: f64,
}

impl ScenarioInput {
    /// Creates a rehost scenario with parallelism 1 and an 8-hour window.
    pub fn new(resource_records: Vec<ResourceRecord>, target: TargetProfile) -> Self {
        Self {
            resource_records,
            target,
            strategy: MigrationStrategy::Rehost,
            parallel_migrations: 1,
            maintenance_window_hours: 8.0,
        }
    }

    /// Creates a scenario from shared options.
    pub fn from_options(
        resource_records: Vec<ResourceRecord>,
        target: TargetProfile,
        options: &ScenarioOptions,
    ) -> Self {
        Self {
            resource_records,
            target,
            strategy: options.strategy,
            parallel_migrations: options.parallel_migrations,
            maintenance_window_hours: options.maintenance_window_hours,
        }
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: MigrationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the requested concurrency.
    pub fn with_parallel_migrations(mut self, parallel: u32) -> Self {
        self.parallel_migrations = parallel;
        self
    }

    /// Sets the maintenance window length (hours).
    pub fn with_maintenance_window(mut self, hours: f64) -> Self {
        self.maintenance_window_hours = hours;
        self
    }

    /// Concurrency actually used: the request, capped by the platform limit.
    pub fn effective_parallelism(&self) -> u32 {
        self.parallel_migrations
            .min(self.target.max_parallel_migrations)
    }

    /// Validates scenario-level parameters and the target profile.
    pub fn validate(&self) -> Result<()> {
        self.target.validate()?;
        if self.parallel_migrations == 0 {
            return Err(EngineError::invalid("parallel_migrations must be >= 1"));
        }
        if !self.maintenance_window_hours.is_finite() || self.maintenance_window_hours <= 0.0 {
            return Err(EngineError::invalid(format!(
                "maintenance_window_hours must be > 0, got {}",
                self.maintenance_window_hours
            )));
        }
        Ok(())
    }
}
