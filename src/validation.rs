//! Input validation for seed data.
//!
//! Checks the structural integrity of a [`ResourcePool`] before planning.
//! Detects:
//! - Duplicate staff, patient, equipment, or task IDs
//! - Task durations that are zero, negative, or not finite
//!
//! The planning passes never call this; it runs at the boundary where
//! outside data enters.

use std::collections::HashSet;
use std::fmt;

use crate::models::Task;
use crate::registry::ResourcePool;

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
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A task duration is not a positive finite number of hours.
    InvalidDuration,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a pool and its tasks.
///
/// Checks:
/// 1. No duplicate staff IDs
/// 2. No duplicate patient IDs
/// 3. No duplicate equipment IDs
/// 4. No duplicate task IDs
/// 5. Every task duration is positive and finite
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(pool: &ResourcePool) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique("staff", pool.staff.iter().map(|s| s.id.as_str()), &mut errors);
    check_unique(
        "patient",
        pool.patients.iter().map(|p| p.id.as_str()),
        &mut errors,
    );
    check_unique(
        "equipment",
        pool.equipment.iter().map(|e| e.id.as_str()),
        &mut errors,
    );
    check_unique("task", pool.tasks.iter().map(|t| t.id.as_str()), &mut errors);
    check_durations(&pool.tasks, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
}

fn check_durations(tasks: &[Task], errors: &mut Vec<ValidationError>) {
    for task in tasks {
        if !task.duration.is_finite() || task.duration <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Task '{}' has invalid duration {}", task.id, task.duration),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::models::{Equipment, Staff, Workday};
    use chrono::NaiveDate;

    fn sample_pool() -> ResourcePool {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut pool = ResourcePool::sample(&SimulationConfig::default(), &Workday::default(), date);
        pool.tasks = vec![
            Task::new("T1").with_duration(2.0),
            Task::new("T2").with_duration(0.5),
        ];
        pool
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_pool()).is_ok());
        assert!(validate_input(&ResourcePool::new()).is_ok());
    }

    #[test]
    fn test_duplicate_staff_id() {
        let mut pool = sample_pool();
        pool.staff.push(Staff::nurse("staff-0"));

        let errors = validate_input(&pool).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
        assert!(errors[0].message.contains("staff-0"));
    }

    #[test]
    fn test_same_id_across_kinds_is_allowed() {
        let mut pool = ResourcePool::new();
        pool.staff.push(Staff::doctor("X"));
        pool.equipment.push(Equipment::new("X", "Room"));
        assert!(validate_input(&pool).is_ok());
    }

    #[test]
    fn test_invalid_durations() {
        let mut pool = sample_pool();
        pool.tasks.push(Task::new("T3").with_duration(0.0));
        pool.tasks.push(Task::new("T4").with_duration(-1.0));
        pool.tasks.push(Task::new("T5").with_duration(f64::NAN));

        let errors = validate_input(&pool).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidDuration));
    }

    #[test]
    fn test_all_problems_reported() {
        let mut pool = sample_pool();
        pool.equipment.push(Equipment::new("equipment-1", "Spare"));
        pool.tasks.push(Task::new("T1").with_duration(f64::INFINITY));

        let errors = validate_input(&pool).unwrap_err();
        assert_eq!(errors.len(), 3); // equipment dup, task dup, bad duration
        assert_eq!(errors[0].to_string(), "Duplicate equipment ID: equipment-1");
    }
}
