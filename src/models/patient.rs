//! Patient and appointment models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A patient expected in the department today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique patient identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Requested appointment time.
    pub appointment_time: NaiveDateTime,
}

impl Patient {
    /// Creates a patient.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        appointment_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            appointment_time,
        }
    }
}

/// A request to see one patient, consumed by the daily scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub patient: Patient,
}

impl Appointment {
    pub fn new(patient: Patient) -> Self {
        Self { patient }
    }
}

impl From<Patient> for Appointment {
    fn from(patient: Patient) -> Self {
        Self::new(patient)
    }
}
