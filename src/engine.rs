//! Scenario evaluation engine.
//!
//! Wires the estimators and partitioners together:
//!
//! 1. validate the scenario and its records
//! 2. estimate per-VM phase hours
//! 3. batch the VMs under the effective parallelism
//! 4. summarize duration along each batch's critical member
//! 5. estimate cost and risk over the same VM set
//! 6. score the scenario
//!
//! One scenario is computed on the calling thread. [`MigrationEngine::evaluate_many`]
//! fans independent scenarios out over scoped worker threads; workers share
//! only read-only inputs and the engine's immutable configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::thread;

use crate::cost::CostModel;
use crate::error::{EngineError, Result};
use crate::models::{
    DurationSummary, EntryKind, PerVMEstimate, ResourceRecord, ScenarioInput, ScenarioOptions,
    ScenarioResult, TargetProfile, Timeline, Wave, WeightedVm,
};
use crate::recommendation::RecommendationScorer;
use crate::replication::ReplicationTimeModel;
use crate::risk::RiskScorer;
use crate::scheduler::{BatchPlan, BatchScheduler, PlanKpi, WaveGenerator, WaveStrategy};
use crate::settings::EngineConfig;
use crate::sources::{InventorySource, SelectionCriteria, TargetSource};
use crate::validation::{validate_records, validate_waves};

const HOURS_PER_DAY: f64 = 24.0;

/// Full output of one scenario evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Summary for persistence.
    pub result: ScenarioResult,
    /// Per-VM estimates, in input order.
    pub estimates: Vec<PerVMEstimate>,
    /// Parallel execution batches.
    pub batch_plan: BatchPlan,
    /// Batch plan KPIs.
    pub kpi: PlanKpi,
    /// Batch timeline.
    pub timeline: Timeline,
}

impl ScenarioReport {
    /// Serializes to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Phased rollout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavePlan {
    /// Waves in rollout order.
    pub waves: Vec<Wave>,
    /// Wave plan KPIs (slots = wave size).
    pub kpi: PlanKpi,
    /// Wave timeline.
    pub timeline: Timeline,
}

/// Stateless planning engine holding the injected configuration.
#[derive(Debug, Clone)]
pub struct MigrationEngine {
    config: EngineConfig,
    replication: ReplicationTimeModel,
    batches: BatchScheduler,
    waves: WaveGenerator,
    cost: CostModel,
    risk: RiskScorer,
    scorer: RecommendationScorer,
}

impl MigrationEngine {
    /// Creates an engine. Fails on an invalid configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        Self {
            replication: ReplicationTimeModel::new(&config.replication),
            batches: BatchScheduler::new(),
            waves: WaveGenerator::new(),
            cost: CostModel::new(config.cost.clone()),
            risk: RiskScorer::new(config.risk.clone()),
            scorer: RecommendationScorer::new(config.scoring.clone()),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Per-VM phase estimates for a scenario.
    pub fn estimate_vms(&self, input: &ScenarioInput) -> Result<Vec<PerVMEstimate>> {
        input.validate()?;
        validate_records(&input.resource_records)?;
        self.replication
            .estimate_all(&input.resource_records, &input.target)
    }

    /// Evaluates one scenario.
    pub fn evaluate(&self, input: &ScenarioInput) -> Result<ScenarioReport> {
        let estimates = self.estimate_vms(input)?;
        let parallel = input.effective_parallelism();
        if parallel < input.parallel_migrations {
            tracing::debug!(
                requested = input.parallel_migrations,
                limit = input.target.max_parallel_migrations,
                "Parallelism capped by target"
            );
        }

        let batch_plan = self.batches.schedule(&estimates, parallel)?;
        let duration = summarize_duration(&batch_plan, &estimates);
        let timeline = batch_plan.timeline(&estimates);
        let kpi = PlanKpi::calculate(&timeline, parallel, input.maintenance_window_hours)?;

        let cost = self.cost.estimate(
            &input.resource_records,
            &input.target,
            duration.total_days,
            input.strategy,
        )?;
        let risk = self
            .risk
            .assess(&input.resource_records, &input.target, input.strategy)?;
        let recommendation_score = self.scorer.score(&cost, &duration, &risk, &input.target);

        let result = ScenarioResult {
            target_id: input.target.id.clone(),
            vm_count: estimates.len(),
            duration,
            cost,
            risk,
            recommendation_score,
            recommended: self.scorer.is_recommended(recommendation_score),
        };

        tracing::info!(
            target = %result.target_id,
            strategy = %input.strategy,
            vm_count = result.vm_count,
            batches = batch_plan.batch_count(),
            total_hours = result.duration.total_hours,
            score = result.recommendation_score,
            recommended = result.recommended,
            "Evaluated migration scenario"
        );

        Ok(ScenarioReport {
            result,
            estimates,
            batch_plan,
            kpi,
            timeline,
        })
    }

    /// Builds a phased rollout plan for a scenario's VMs.
    pub fn plan_waves(
        &self,
        input: &ScenarioInput,
        wave_size: usize,
        strategy: WaveStrategy,
    ) -> Result<WavePlan> {
        if wave_size == 0 {
            return Err(EngineError::invalid("wave_size must be >= 1"));
        }
        let estimates = self.estimate_vms(input)?;
        let weighted: Vec<WeightedVm> = estimates.iter().map(WeightedVm::from).collect();
        let waves = self.waves.generate(&weighted, wave_size, strategy)?;
        validate_waves(&waves)?;

        let hours: HashMap<String, f64> = weighted
            .into_iter()
            .map(|v| (v.id, v.weight_hours))
            .collect();
        let timeline = Timeline::from_groups(EntryKind::Wave, &waves, &hours);
        let slots = u32::try_from(wave_size).unwrap_or(u32::MAX);
        let kpi = PlanKpi::calculate(&timeline, slots, input.maintenance_window_hours)?;

        Ok(WavePlan {
            waves,
            kpi,
            timeline,
        })
    }

    /// Evaluates independent scenarios in parallel.
    ///
    /// Results are returned in input order; one failing scenario does not
    /// affect the others.
    pub fn evaluate_many(&self, inputs: &[ScenarioInput]) -> Vec<Result<ScenarioReport>> {
        if inputs.len() <= 1 {
            return inputs.iter().map(|i| self.evaluate(i)).collect();
        }

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(inputs.len());
        let chunk_size = inputs.len().div_ceil(workers);
        tracing::debug!(scenarios = inputs.len(), workers, "Evaluating scenarios");

        thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk.iter().map(|i| self.evaluate(i)).collect::<Vec<_>>()
                    });
                    (chunk.len(), handle)
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|(len, handle)| match handle.join() {
                    Ok(results) => results,
                    Err(_) => {
                        tracing::warn!(scenarios = len, "Scenario worker panicked");
                        (0..len)
                            .map(|_| Err(EngineError::Worker("worker thread panicked".into())))
                            .collect()
                    }
                })
                .collect()
        })
    }

    /// Evaluates one VM set against several targets, best score first.
    ///
    /// Ties are ordered by target ID. Fails if any scenario fails.
    pub fn compare_targets(
        &self,
        records: &[ResourceRecord],
        targets: &[TargetProfile],
        options: &ScenarioOptions,
    ) -> Result<Vec<ScenarioReport>> {
        let inputs: Vec<ScenarioInput> = targets
            .iter()
            .map(|t| ScenarioInput::from_options(records.to_vec(), t.clone(), options))
            .collect();

        let mut reports = self
            .evaluate_many(&inputs)
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        reports.sort_by(|a, b| {
            b.result
                .recommendation_score
                .total_cmp(&a.result.recommendation_score)
                .then_with(|| a.result.target_id.cmp(&b.result.target_id))
        });
        Ok(reports)
    }

    /// Fetches inputs from the collaborators, then evaluates.
    pub fn evaluate_from_sources<I, T>(
        &self,
        inventory: &I,
        targets: &T,
        criteria: &SelectionCriteria,
        target_id: &str,
        options: &ScenarioOptions,
    ) -> Result<ScenarioReport>
    where
        I: InventorySource + ?Sized,
        T: TargetSource + ?Sized,
    {
        let records = inventory.fetch_resource_records(criteria)?;
        let target = targets.fetch_target_profile(target_id)?;
        self.evaluate(&ScenarioInput::from_options(records, target, options))
    }
}

impl Default for MigrationEngine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}

/// Duration along the critical path: for every batch, the phases of its
/// slowest member. The phases therefore sum to the parallel makespan.
fn summarize_duration(plan: &BatchPlan, estimates: &[PerVMEstimate]) -> DurationSummary {
    let by_id: HashMap<&str, &PerVMEstimate> =
        estimates.iter().map(|e| (e.vm_id.as_str(), e)).collect();

    let mut summary = DurationSummary::default();
    for batch in &plan.batches {
        if let Some(critical) = by_id.get(batch.critical_vm_id.as_str()) {
            summary.initial_replication_hours += critical.initial_replication_hours;
            summary.delta_sync_hours += critical.delta_sync_hours;
            summary.cutover_hours += critical.cutover_hours;
        }
    }
    summary.total_hours = plan.parallel_total_hours;
    summary.total_days = plan.parallel_total_hours / HOURS_PER_DAY;
    summary.sequential_total_hours = plan.sequential_total_hours;
    summary.time_saved_hours = plan.time_saved_hours();
    summary
}
