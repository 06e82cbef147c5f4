//! Input validation for migration planning.
//!
//! Checks structural integrity before any estimation runs. Detects:
//! - Duplicate or empty record IDs
//! - Negative or non-finite storage figures
//! - Wave plans with duplicate numbers, unknown prerequisites,
//!   prerequisite cycles, or VMs assigned to more than one wave
//!
//! All problems are collected rather than stopping at the first one.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{ResourceRecord, Wave};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A record has an empty ID.
    EmptyId,
    /// A quantity that must be >= 0 is negative.
    NegativeValue,
    /// A quantity is NaN or infinite.
    NonFiniteValue,
    /// A wave references a prerequisite wave that doesn't exist.
    InvalidPrerequisite,
    /// Wave prerequisites contain a cycle.
    CyclicDependency,
    /// A VM is assigned to more than one wave.
    DuplicateAssignment,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates resource records.
///
/// Checks:
/// 1. No empty IDs
/// 2. No duplicate IDs
/// 3. Storage figures are finite and non-negative
///
/// An empty slice is valid.
pub fn validate_records(records: &[ResourceRecord]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for r in records {
        if r.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Record with empty ID",
            ));
        } else if !ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate record ID: {}", r.id),
            ));
        }

        for (field, value) in [
            ("storage_in_use_mib", r.storage_in_use_mib),
            ("storage_provisioned_mib", r.storage_provisioned_mib),
        ] {
            if !value.is_finite() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonFiniteValue,
                    format!("Record '{}' has non-finite {field}", r.id),
                ));
            } else if value < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!("Record '{}' has negative {field}", r.id),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a (possibly hand-edited) wave plan.
///
/// Checks:
/// 1. No duplicate wave numbers
/// 2. No VM in more than one wave
/// 3. All prerequisites reference existing waves
/// 4. No circular prerequisites
pub fn validate_waves(waves: &[Wave]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut numbers = HashSet::new();
    let mut owner: HashMap<&str, u32> = HashMap::new();

    for wave in waves {
        if !numbers.insert(wave.number) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate wave number: {}", wave.number),
            ));
        }
        for vm in &wave.vm_ids {
            if let Some(first) = owner.insert(vm.as_str(), wave.number) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateAssignment,
                    format!(
                        "VM '{vm}' assigned to waves {first} and {}",
                        wave.number
                    ),
                ));
            }
        }
    }

    for wave in waves {
        for pre in &wave.prerequisites {
            if !numbers.contains(pre) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPrerequisite,
                    format!(
                        "Wave {} references unknown prerequisite wave {pre}",
                        wave.number
                    ),
                ));
            }
        }
    }

    if let Some(cycle_error) = detect_cycles(waves) {
        errors.push(cycle_error);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the prerequisite graph using DFS.
///
/// A back-edge (visiting a wave currently on the recursion stack) is a cycle.
fn detect_cycles(waves: &[Wave]) -> Option<ValidationError> {
    // prerequisite → dependents
    let mut adj: HashMap<u32, Vec<u32>> = HashMap::new();
    let mut all: Vec<u32> = Vec::with_capacity(waves.len());

    for wave in waves {
        all.push(wave.number);
        for &pre in &wave.prerequisites {
            adj.entry(pre).or_default().push(wave.number);
        }
    }
    all.sort_unstable();

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all {
        if !visited.contains(&node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular prerequisite detected involving wave {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: u32,
    adj: &HashMap<u32, Vec<u32>>,
    visited: &mut HashSet<u32>,
    in_stack: &mut HashSet<u32>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true;
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, in_use: f64) -> ResourceRecord {
        ResourceRecord::new(id).with_storage_mib(in_use, in_use * 2.0)
    }

    fn wave(number: u32, vms: &[&str], prerequisites: Vec<u32>) -> Wave {
        Wave {
            number,
            name: format!("Wave {number}"),
            vm_ids: vms.iter().map(|s| s.to_string()).collect(),
            prerequisites,
            duration_hours: 1.0,
        }
    }

    #[test]
    fn test_valid_records() {
        let records = vec![record("vm-1", 1024.0), record("vm-2", 0.0)];
        assert!(validate_records(&records).is_ok());
        assert!(validate_records(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_record_id() {
        let records = vec![record("vm-1", 1.0), record("vm-1", 2.0)];
        let errors = validate_records(&records).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_id() {
        let errors = validate_records(&[record("", 1.0)]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyId);
    }

    #[test]
    fn test_negative_and_non_finite_storage() {
        let records = vec![
            ResourceRecord::new("neg").with_storage_mib(-1.0, 10.0),
            ResourceRecord::new("nan").with_storage_mib(f64::NAN, 10.0),
        ];
        let errors = validate_records(&records).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NegativeValue && e.message.contains("neg")));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NonFiniteValue && e.message.contains("nan")));
    }

    #[test]
    fn test_valid_wave_chain() {
        let waves = vec![
            wave(1, &["a"], vec![]),
            wave(2, &["b"], vec![1]),
            wave(3, &["c"], vec![2]),
        ];
        assert!(validate_waves(&waves).is_ok());
    }

    #[test]
    fn test_unknown_prerequisite() {
        let waves = vec![wave(1, &["a"], vec![7])];
        let errors = validate_waves(&waves).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidPrerequisite));
    }

    #[test]
    fn test_cyclic_prerequisites() {
        // 1 → 2 → 3 → 1
        let waves = vec![
            wave(1, &["a"], vec![3]),
            wave(2, &["b"], vec![1]),
            wave(3, &["c"], vec![2]),
        ];
        let errors = validate_waves(&waves).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_vm_in_two_waves() {
        let waves = vec![wave(1, &["a", "b"], vec![]), wave(2, &["b"], vec![1])];
        let errors = validate_waves(&waves).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateAssignment && e.message.contains("'b'")));
    }

    #[test]
    fn test_multiple_errors() {
        let waves = vec![wave(1, &["a"], vec![9]), wave(1, &["a"], vec![])];
        let errors = validate_waves(&waves).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
