use migration_planner::models::{
    MigrationStrategy, PowerState, ResourceRecord, RiskFactor, RiskLevel, ScenarioInput,
    ScenarioOptions, TargetProfile,
};
use migration_planner::replication::ReplicationTimeModel;
use migration_planner::scheduler::{BatchScheduler, WaveStrategy};
use migration_planner::sources::{InventorySource, SelectionCriteria, TargetSource};
use migration_planner::{EngineError, MigrationEngine, Result};

const EPS: f64 = 1e-6;

fn reference_target() -> TargetProfile {
    TargetProfile::new("dc-east", 1000)
        .with_network(0.8, 1.0)
        .with_data_reduction(1.0, 1.0)
        .with_delta_syncs(0.1, 1)
        .with_max_parallel(10)
}

fn reference_vms(n: usize) -> Vec<ResourceRecord> {
    (0..n)
        .map(|i| {
            ResourceRecord::new(format!("vm-{i:02}"))
                .with_vcpus(2)
                .with_memory_mib(8192)
                .with_storage_mib(102_400.0, 204_800.0)
        })
        .collect()
}

fn mixed_vms() -> Vec<ResourceRecord> {
    [40.0, 900.0, 250.0, 250.0, 10.0, 600.0, 75.0]
        .iter()
        .enumerate()
        .map(|(i, gib)| {
            ResourceRecord::new(format!("vm-{i}"))
                .with_vcpus(4)
                .with_memory_mib(16_384)
                .with_storage_mib(gib * 1024.0, gib * 1536.0)
        })
        .collect()
}

#[test]
fn test_reference_scenario() {
    let engine = MigrationEngine::default();
    let input = ScenarioInput::new(reference_vms(12), reference_target()).with_parallel_migrations(5);
    let report = engine.evaluate(&input).unwrap();

    // 100 GiB = 819200 Mib over 800 Mbps.
    let initial = 819_200.0 / (800.0 * 3600.0);
    let delta = initial * 0.1;
    let per_vm = initial + delta + 2.0;
    for e in &report.estimates {
        assert!((e.initial_replication_hours - initial).abs() < EPS);
        assert!((e.delta_sync_hours - delta).abs() < EPS);
        assert!((e.cutover_hours - 2.0).abs() < EPS);
        assert!((e.total_hours - per_vm).abs() < EPS);
    }

    let sizes: Vec<usize> = report.batch_plan.batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    for batch in &report.batch_plan.batches {
        assert!((batch.duration_hours - per_vm).abs() < EPS);
    }

    let d = &report.result.duration;
    assert!((d.total_hours - 3.0 * per_vm).abs() < EPS);
    assert!((d.sequential_total_hours - 12.0 * per_vm).abs() < EPS);
    assert!((d.total_hours - 6.938_667).abs() < 1e-3);
    assert!((d.sequential_total_hours - 27.754_667).abs() < 1e-3);
    assert!((d.initial_replication_hours - 3.0 * initial).abs() < EPS);
    assert!((d.cutover_hours - 6.0).abs() < EPS);
    assert_eq!(report.kpi.maintenance_windows_required, 1);
}

#[test]
fn test_deterministic() {
    let engine = MigrationEngine::default();
    let input = ScenarioInput::new(mixed_vms(), reference_target())
        .with_parallel_migrations(3)
        .with_strategy(MigrationStrategy::Replatform);

    let a = engine.evaluate(&input).unwrap();
    let b = engine.evaluate(&input).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

#[test]
fn test_bandwidth_monotonic() {
    let model = ReplicationTimeModel::default();
    let vm = &mixed_vms()[1];
    let slow = reference_target();
    let mut fast = reference_target();
    fast.bandwidth_mbps *= 2;

    let a = model.estimate(vm, &slow, 1).unwrap();
    let b = model.estimate(vm, &fast, 1).unwrap();
    assert!(b.initial_replication_hours <= a.initial_replication_hours);
    assert!((a.initial_replication_hours / b.initial_replication_hours - 2.0).abs() < 1e-9);
}

#[test]
fn test_compression_monotonic() {
    let model = ReplicationTimeModel::default();
    let vm = &mixed_vms()[1];
    let mut previous = None;

    for ratio in [1.0, 0.8, 0.5, 0.25] {
        let target = reference_target().with_data_reduction(ratio, 1.0);
        let e = model.estimate(vm, &target, 1).unwrap();
        if let Some((tb, hours)) = previous {
            assert!(e.effective_data_tb <= tb);
            assert!(e.initial_replication_hours <= hours);
        }
        previous = Some((e.effective_data_tb, e.initial_replication_hours));
    }
}

#[test]
fn test_batch_conservation_and_duration() {
    let engine = MigrationEngine::default();
    let target = reference_target().with_max_parallel(50);
    let records = mixed_vms();

    for parallel in 1..=9u32 {
        let input = ScenarioInput::new(records.clone(), target.clone())
            .with_parallel_migrations(parallel);
        let report = engine.evaluate(&input).unwrap();
        let plan = &report.batch_plan;

        let expected = records.len().div_ceil(parallel as usize);
        assert_eq!(plan.batch_count(), expected);
        assert_eq!(plan.vm_count(), records.len());

        for batch in &plan.batches {
            let max = batch
                .vm_ids
                .iter()
                .map(|id| {
                    report
                        .estimates
                        .iter()
                        .find(|e| &e.vm_id == id)
                        .map(|e| e.total_hours)
                        .unwrap()
                })
                .fold(0.0_f64, f64::max);
            assert!((batch.duration_hours - max).abs() < 1e-12);
        }
        assert!(plan.parallel_total_hours <= plan.sequential_total_hours + 1e-9);
    }
}

#[test]
fn test_wave_conservation() {
    let engine = MigrationEngine::default();
    let input = ScenarioInput::new(mixed_vms(), reference_target());

    for wave_size in 1..=8usize {
        for strategy in [WaveStrategy::SizeBased, WaveStrategy::Random { seed: 7 }] {
            let plan = engine.plan_waves(&input, wave_size, strategy).unwrap();
            assert_eq!(plan.waves.len(), 7usize.div_ceil(wave_size));

            let mut ids: Vec<&String> = plan.waves.iter().flat_map(|w| &w.vm_ids).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 7);
            assert!(plan.waves.iter().all(|w| w.len() <= wave_size));
        }
    }
}

#[test]
fn test_random_waves_reproducible() {
    let engine = MigrationEngine::default();
    let input = ScenarioInput::new(reference_vms(20), reference_target());
    let a = engine
        .plan_waves(&input, 6, WaveStrategy::Random { seed: 42 })
        .unwrap();
    let b = engine
        .plan_waves(&input, 6, WaveStrategy::Random { seed: 42 })
        .unwrap();
    assert_eq!(a.waves, b.waves);
}

#[test]
fn test_zero_input_safety() {
    let engine = MigrationEngine::default();
    for strategy in MigrationStrategy::ALL {
        let input = ScenarioInput::new(vec![], reference_target()).with_strategy(strategy);
        let report = engine.evaluate(&input).unwrap();
        assert_eq!(report.result.vm_count, 0);
        assert_eq!(report.result.duration.total_hours, 0.0);
        assert_eq!(report.result.cost.total(), 0.0);
        assert_eq!(report.result.risk.level, RiskLevel::Low);
        assert!(report.result.risk.factors.is_empty());
        assert_eq!(report.batch_plan.batch_count(), 0);
    }
}

#[test]
fn test_score_bounds() {
    let engine = MigrationEngine::default();
    let targets = [
        reference_target(),
        reference_target().with_live_migration(true),
        TargetProfile::new("thin-pipe", 5).with_runtime_prices(2.0, 0.5, 3.0),
    ];
    for target in &targets {
        for strategy in MigrationStrategy::ALL {
            for vms in [vec![], mixed_vms(), reference_vms(150)] {
                let input = ScenarioInput::new(vms, target.clone())
                    .with_strategy(strategy)
                    .with_parallel_migrations(4);
                let result = engine.evaluate(&input).unwrap().result;
                assert!((0.0..=100.0).contains(&result.recommendation_score));
                assert_eq!(result.recommended, result.recommendation_score >= 70.0);
            }
        }
    }
}

#[test]
fn test_risk_factors_end_to_end() {
    let engine = MigrationEngine::default();
    let thin = TargetProfile::new("thin-pipe", 10);
    let input = ScenarioInput::new(reference_vms(150), thin).with_strategy(MigrationStrategy::Refactor);
    let risk = engine.evaluate(&input).unwrap().result.risk;

    assert_eq!(risk.level, RiskLevel::High);
    assert_eq!(
        risk.factors,
        vec![
            RiskFactor::LargeScale,
            RiskFactor::BandwidthConstrained,
            RiskFactor::ArchitectureChange,
            RiskFactor::DowntimeRequired,
        ]
    );

    let off: Vec<_> = reference_vms(3)
        .into_iter()
        .map(|r| r.with_power_state(PowerState::Off))
        .collect();
    let risk = engine
        .evaluate(&ScenarioInput::new(off, reference_target()))
        .unwrap()
        .result
        .risk;
    assert_eq!(risk.level, RiskLevel::Low);
}

#[test]
fn test_evaluate_many_keeps_order() {
    let engine = MigrationEngine::default();
    let mut inputs: Vec<ScenarioInput> = (1..=12u32)
        .map(|p| {
            ScenarioInput::new(mixed_vms(), reference_target().with_max_parallel(20))
                .with_parallel_migrations(p)
        })
        .collect();
    inputs[4] = ScenarioInput::new(mixed_vms(), TargetProfile::new("broken", 0));

    let results = engine.evaluate_many(&inputs);
    assert_eq!(results.len(), inputs.len());
    for (i, result) in results.iter().enumerate() {
        if i == 4 {
            assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
        } else {
            let report = result.as_ref().unwrap();
            assert_eq!(report.batch_plan.parallel, i as u32 + 1);
            assert_eq!(*report, engine.evaluate(&inputs[i]).unwrap());
        }
    }
}

#[test]
fn test_compare_targets() {
    let engine = MigrationEngine::default();
    let targets = vec![
        TargetProfile::new("b-slow", 50).with_runtime_prices(0.2, 0.02, 0.5),
        reference_target().with_live_migration(true),
        TargetProfile::new("a-slow", 50).with_runtime_prices(0.2, 0.02, 0.5),
    ];
    let options = ScenarioOptions {
        parallel_migrations: 4,
        ..ScenarioOptions::default()
    };
    let reports = engine
        .compare_targets(&mixed_vms(), &targets, &options)
        .unwrap();

    let ids: Vec<&str> = reports.iter().map(|r| r.result.target_id.as_str()).collect();
    assert_eq!(ids, vec!["dc-east", "a-slow", "b-slow"]);
    assert!(reports
        .windows(2)
        .all(|w| w[0].result.recommendation_score >= w[1].result.recommendation_score));
}

struct StaticInventory(Vec<ResourceRecord>);

impl InventorySource for StaticInventory {
    fn fetch_resource_records(&self, criteria: &SelectionCriteria) -> Result<Vec<ResourceRecord>> {
        match criteria {
            SelectionCriteria::Ids(ids) => Ok(self
                .0
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect()),
            _ => Ok(self.0.clone()),
        }
    }
}

struct StaticTargets(Vec<TargetProfile>);

impl TargetSource for StaticTargets {
    fn fetch_target_profile(&self, target_id: &str) -> Result<TargetProfile> {
        self.0
            .iter()
            .find(|t| t.id == target_id)
            .cloned()
            .ok_or_else(|| EngineError::Source(format!("unknown target '{target_id}'")))
    }
}

#[test]
fn test_evaluate_from_sources() {
    let engine = MigrationEngine::default();
    let inventory = StaticInventory(mixed_vms());
    let targets = StaticTargets(vec![reference_target()]);
    let criteria = SelectionCriteria::Ids(vec!["vm-1".into(), "vm-4".into()]);

    let report = engine
        .evaluate_from_sources(
            &inventory,
            &targets,
            &criteria,
            "dc-east",
            &ScenarioOptions::default(),
        )
        .unwrap();
    assert_eq!(report.result.vm_count, 2);
    assert_eq!(report.result.target_id, "dc-east");

    let missing = engine.evaluate_from_sources(
        &inventory,
        &targets,
        &criteria,
        "nowhere",
        &ScenarioOptions::default(),
    );
    assert!(matches!(missing, Err(EngineError::Source(_))));
}

#[test]
fn test_scheduler_rejects_zero_parallel() {
    let estimates = MigrationEngine::default()
        .estimate_vms(&ScenarioInput::new(mixed_vms(), reference_target()))
        .unwrap();
    assert!(BatchScheduler::new().schedule(&estimates, 0).is_err());
}
