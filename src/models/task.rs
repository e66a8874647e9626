//! Task and allocation records.
//!
//! A task is a unit of staff work measured in hours. Tasks are handed out
//! by the workload distributor; allocations pair patients with resources
//! in the resource allocator.

use serde::{Deserialize, Serialize};

/// Duration used when a task does not specify one (hours).
pub const DEFAULT_TASK_DURATION: f64 = 1.0;

fn default_duration() -> f64 {
    DEFAULT_TASK_DURATION
}

/// A unit of work to be assigned to a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Work required (hours). Defaults to 1 when missing.
    #[serde(default = "default_duration")]
    pub duration: f64,
}

impl Task {
    /// Creates a task with the default duration.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            duration: DEFAULT_TASK_DURATION,
        }
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }
}

/// Outcome of distributing one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub task_id: String,
    /// Duration carried over from the task, for load accounting.
    pub duration: f64,
    /// Assigned staff member, `None` when nobody was available.
    pub staff_id: Option<String>,
}

impl TaskAssignment {
    /// Whether the task found a staff member.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.staff_id.is_some()
    }
}

/// Outcome of allocating resources to one patient.
///
/// Either both resources are set or neither is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub patient_id: String,
    pub staff_id: Option<String>,
    pub equipment_id: Option<String>,
}

impl Allocation {
    /// A patient paired with a staff member and an equipment unit.
    pub fn paired(
        patient_id: impl Into<String>,
        staff_id: impl Into<String>,
        equipment_id: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            staff_id: Some(staff_id.into()),
            equipment_id: Some(equipment_id.into()),
        }
    }

    /// A patient left without resources.
    pub fn unmet(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            staff_id: None,
            equipment_id: None,
        }
    }

    /// Whether resources were found.
    #[inline]
    pub fn is_met(&self) -> bool {
        self.staff_id.is_some() && self.equipment_id.is_some()
    }
}
