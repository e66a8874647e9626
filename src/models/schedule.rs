//! Daily schedule model.
//!
//! A schedule is the time-ordered list of appointment slots produced for
//! one day. Each entry either pairs the patient with a staff member and an
//! equipment unit or records that no pair was free at that time.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One day's schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Calendar day the schedule applies to.
    pub date: NaiveDate,
    /// Assignments in the order they were made.
    pub assignments: Vec<Assignment>,
}

/// An appointment at a time of day.
///
/// `staff_id` and `equipment_id` are either both set (booked) or both
/// `None` (unmet at this time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Start time.
    pub time: NaiveTime,
    /// Patient being seen.
    pub patient_id: String,
    /// Booked staff member.
    pub staff_id: Option<String>,
    /// Booked equipment unit.
    pub equipment_id: Option<String>,
}

impl Assignment {
    /// Creates a booked assignment.
    pub fn booked(
        time: NaiveTime,
        patient_id: impl Into<String>,
        staff_id: impl Into<String>,
        equipment_id: impl Into<String>,
    ) -> Self {
        Self {
            time,
            patient_id: patient_id.into(),
            staff_id: Some(staff_id.into()),
            equipment_id: Some(equipment_id.into()),
        }
    }

    /// Creates an assignment with no resources.
    pub fn unmet(time: NaiveTime, patient_id: impl Into<String>) -> Self {
        Self {
            time,
            patient_id: patient_id.into(),
            staff_id: None,
            equipment_id: None,
        }
    }

    /// Whether staff and equipment were booked.
    #[inline]
    pub fn is_booked(&self) -> bool {
        self.staff_id.is_some() && self.equipment_id.is_some()
    }

    /// Whether a resource id is used by this assignment.
    pub fn uses_resource(&self, resource_id: &str) -> bool {
        self.staff_id.as_deref() == Some(resource_id)
            || self.equipment_id.as_deref() == Some(resource_id)
    }
}

impl Schedule {
    /// Creates an empty schedule for a day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            assignments: Vec::new(),
        }
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Number of booked assignments.
    pub fn booked_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_booked()).count()
    }

    /// Number of assignments without resources.
    pub fn unmet_count(&self) -> usize {
        self.assignment_count() - self.booked_count()
    }

    /// Finds the assignment for a patient.
    pub fn assignment_for_patient(&self, patient_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.patient_id == patient_id)
    }

    /// Returns all assignments that use a staff member or equipment unit.
    pub fn assignments_for_resource(&self, resource_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.uses_resource(resource_id))
            .collect()
    }

    /// Time of the last assignment.
    pub fn last_time(&self) -> Option<NaiveTime> {
        self.assignments.last().map(|a| a.time)
    }

    /// Whether assignment times never decrease.
    pub fn is_time_ordered(&self) -> bool {
        self.assignments.windows(2).all(|w| w[0].time <= w[1].time)
    }
}
