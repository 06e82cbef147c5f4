//! Wave generator for phased rollout.
//!
//! Waves are fixed-size, numbered groups meant for human-supervised
//! execution. They are independent of the batch plan.
//!
//! # Strategies
//!
//! - **SizeBased**: smallest VMs first (ties: VM ID ascending), so early
//!   waves are quick, low-impact migrations.
//! - **Random**: seeded shuffle, reproducible for a given seed.
//!
//! Every wave after the first lists its predecessor as a prerequisite.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{Wave, WeightedVm};

/// How VMs are ordered before being cut into waves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveStrategy {
    /// Ascending weight.
    #[default]
    SizeBased,
    /// Seeded shuffle.
    Random {
        /// RNG seed.
        seed: u64,
    },
}

/// Partitions weighted VMs into ordered waves.
#[derive(Debug, Clone, Default)]
pub struct WaveGenerator;

impl WaveGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates waves of at most `wave_size` VMs.
    ///
    /// Fails when `wave_size` is zero or a weight is negative or not
    /// finite. Empty input yields no waves.
    pub fn generate(
        &self,
        vms: &[WeightedVm],
        wave_size: usize,
        strategy: WaveStrategy,
    ) -> Result<Vec<Wave>> {
        if wave_size == 0 {
            return Err(EngineError::invalid("wave_size must be >= 1"));
        }
        if let Some(bad) = vms
            .iter()
            .find(|v| !(v.weight_hours.is_finite() && v.weight_hours >= 0.0))
        {
            return Err(EngineError::invalid(format!(
                "VM '{}' has invalid weight {}",
                bad.id, bad.weight_hours
            )));
        }

        let mut order: Vec<&WeightedVm> = vms.iter().collect();
        match strategy {
            WaveStrategy::SizeBased => {
                order.sort_by(|a, b| {
                    a.weight_hours
                        .total_cmp(&b.weight_hours)
                        .then_with(|| a.id.cmp(&b.id))
                });
            }
            WaveStrategy::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                order.shuffle(&mut rng);
            }
        }

        let waves: Vec<Wave> = order
            .chunks(wave_size)
            .enumerate()
            .map(|(i, chunk)| {
                let number = i as u32 + 1;
                Wave {
                    number,
                    name: format!("Wave {number}"),
                    vm_ids: chunk.iter().map(|v| v.id.clone()).collect(),
                    prerequisites: if number > 1 { vec![number - 1] } else { Vec::new() },
                    duration_hours: chunk.iter().map(|v| v.weight_hours).fold(0.0, f64::max),
                }
            })
            .collect();

        tracing::debug!(
            vm_count = vms.len(),
            wave_size,
            waves = waves.len(),
            ?strategy,
            "Generated waves"
        );
        Ok(waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_waves;

    fn vms(n: usize) -> Vec<WeightedVm> {
        (0..n)
            .map(|i| WeightedVm::new(format!("vm-{i:02}"), 1.0 + ((i * 5) % 7) as f64))
            .collect()
    }

    #[test]
    fn test_size_based_ascending() {
        let input = vec![
            WeightedVm::new("big", 9.0),
            WeightedVm::new("small", 1.0),
            WeightedVm::new("mid", 4.0),
            WeightedVm::new("tiny", 0.5),
        ];
        let waves = WaveGenerator::new()
            .generate(&input, 2, WaveStrategy::SizeBased)
            .unwrap();

        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0].vm_ids, vec!["tiny", "small"]);
        assert_eq!(waves[1].vm_ids, vec!["mid", "big"]);
        assert_eq!(waves[0].name, "Wave 1");
        assert!((waves[0].duration_hours - 1.0).abs() < 1e-10);
        assert!((waves[1].duration_hours - 9.0).abs() < 1e-10);
        assert!(waves[0].prerequisites.is_empty());
        assert_eq!(waves[1].prerequisites, vec![1]);
    }

    #[test]
    fn test_conservation() {
        let input = vms(23);
        let waves = WaveGenerator::new()
            .generate(&input, 5, WaveStrategy::SizeBased)
            .unwrap();
        assert_eq!(waves.len(), 5); // ceil(23 / 5)
        assert_eq!(waves.iter().map(Wave::len).sum::<usize>(), 23);
        assert_eq!(waves.last().map(Wave::len), Some(3));
        assert!(validate_waves(&waves).is_ok());
    }

    #[test]
    fn test_random_reproducible() {
        let input = vms(30);
        let gen = WaveGenerator::new();
        let a = gen.generate(&input, 4, WaveStrategy::Random { seed: 7 }).unwrap();
        let b = gen.generate(&input, 4, WaveStrategy::Random { seed: 7 }).unwrap();
        assert_eq!(a, b);

        let mut ids: Vec<String> = a.iter().flat_map(|w| w.vm_ids.clone()).collect();
        ids.sort();
        let mut expected: Vec<String> = input.iter().map(|v| v.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_wave_duration_is_max_member() {
        let input = vms(12);
        let waves = WaveGenerator::new()
            .generate(&input, 5, WaveStrategy::Random { seed: 99 })
            .unwrap();
        for w in &waves {
            let max = w
                .vm_ids
                .iter()
                .map(|id| input.iter().find(|v| &v.id == id).unwrap().weight_hours)
                .fold(0.0, f64::max);
            assert_eq!(w.duration_hours, max);
        }
    }

    #[test]
    fn test_zero_wave_size_rejected() {
        let result = WaveGenerator::new().generate(&vms(3), 0, WaveStrategy::SizeBased);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_input() {
        let waves = WaveGenerator::new()
            .generate(&[], 10, WaveStrategy::SizeBased)
            .unwrap();
        assert!(waves.is_empty());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let input = vec![WeightedVm::new("a", -1.0)];
        assert!(WaveGenerator::new()
            .generate(&input, 1, WaveStrategy::SizeBased)
            .is_err());
    }
}
