//! The day's resource pool and its seeding collaborators.
//!
//! A [`ResourcePool`] owns every staff member, patient, and equipment unit
//! known for one day, plus any pre-defined staff tasks. It is either
//! generated ([`ResourcePool::sample`]) or read from a JSON seed file
//! ([`ResourcePool::from_json_file`]):
//!
//! ```json
//! {
//!   "staff": [{"id": "s1", "name": "Dr. Lee", "role": "Doctor"}],
//!   "patients": [{"id": "p1", "name": "Kim", "appointment_time": "2024-03-04T09:00:00"}],
//!   "equipment": [{"id": "e1", "equipment_type": "Exam room"}],
//!   "tasks": [{"id": "t1", "duration": 2.0}]
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::models::{Appointment, Equipment, Patient, Role, Staff, Task, Workday};

/// Everything the planner works on for one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePool {
    pub staff: Vec<Staff>,
    pub patients: Vec<Patient>,
    pub equipment: Vec<Equipment>,
    /// Pre-defined staff tasks. Generated per patient when empty.
    pub tasks: Vec<Task>,
}

impl ResourcePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a sample day.
    ///
    /// Every third staff member (starting with the first) is a doctor, the
    /// rest are nurses. All patients ask for the start of the workday on
    /// `date`. Everything starts fully available.
    pub fn sample(config: &SimulationConfig, workday: &Workday, date: NaiveDate) -> Self {
        let staff = (0..config.staff_count)
            .map(|i| {
                let role = if i % 3 == 0 { Role::Doctor } else { Role::Nurse };
                Staff::new(format!("staff-{i}"), role).with_name(format!("Staff {i}"))
            })
            .collect();

        let appointment_time = date.and_time(workday.start);
        let patients = (0..config.patient_count)
            .map(|i| {
                Patient::new(
                    format!("patient-{i}"),
                    format!("Patient {i}"),
                    appointment_time,
                )
            })
            .collect();

        let equipment = (0..config.equipment_count)
            .map(|i| Equipment::new(format!("equipment-{i}"), format!("Equipment {i}")))
            .collect();

        Self {
            staff,
            patients,
            equipment,
            tasks: Vec::new(),
        }
    }

    /// Reads a pool from a JSON seed file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let pool: Self = serde_json::from_str(&contents)?;
        info!(
            path = %path.display(),
            staff = pool.staff.len(),
            patients = pool.patients.len(),
            equipment = pool.equipment.len(),
            tasks = pool.tasks.len(),
            "loaded seed data"
        );
        Ok(pool)
    }

    /// One appointment per patient, in patient order.
    pub fn appointments(&self) -> Vec<Appointment> {
        self.patients.iter().cloned().map(Appointment::from).collect()
    }

    /// Display name of a staff member.
    pub fn staff_name(&self, id: &str) -> Option<&str> {
        self.staff
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    /// Display name of a patient.
    pub fn patient_name(&self, id: &str) -> Option<&str> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    /// Type label of an equipment unit.
    pub fn equipment_type(&self, id: &str) -> Option<&str> {
        self.equipment
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.equipment_type.as_str())
    }
}

/// Generates `count` tasks with whole-hour durations in `1..=max_duration`.
///
/// Task ids are their position as text (`"0"`, `"1"`, ...).
pub fn sample_tasks<R: Rng + ?Sized>(count: usize, max_duration: u32, rng: &mut R) -> Vec<Task> {
    let max_duration = max_duration.max(1);
    (0..count)
        .map(|i| {
            let hours = rng.random_range(1..=max_duration);
            Task::new(i.to_string()).with_duration(f64::from(hours))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bookable;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_sample_defaults() {
        let pool = ResourcePool::sample(&SimulationConfig::default(), &Workday::default(), date());

        assert_eq!(pool.staff.len(), 10);
        assert_eq!(pool.patients.len(), 20);
        assert_eq!(pool.equipment.len(), 5);
        assert!(pool.tasks.is_empty());

        assert_eq!(pool.staff[0].role, Role::Doctor);
        assert_eq!(pool.staff[1].role, Role::Nurse);
        assert_eq!(pool.staff[3].role, Role::Doctor);
        assert!(pool.staff.iter().all(|s| s.is_available()));
        assert!(pool.equipment.iter().all(|e| e.is_available()));

        assert_eq!(pool.staff_name("staff-4"), Some("Staff 4"));
        assert_eq!(pool.patient_name("patient-19"), Some("Patient 19"));
        assert_eq!(pool.equipment_type("equipment-0"), Some("Equipment 0"));
        assert_eq!(pool.staff_name("nobody"), None);
    }

    #[test]
    fn test_sample_appointment_time() {
        let workday = Workday::default();
        let pool = ResourcePool::sample(&SimulationConfig::default(), &workday, date());
        let expected = date().and_time(workday.start);
        assert!(pool.patients.iter().all(|p| p.appointment_time == expected));
        assert_eq!(pool.appointments().len(), 20);
        assert_eq!(pool.appointments()[0].patient.id, "patient-0");
    }

    #[test]
    fn test_sample_tasks_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        let tasks = sample_tasks(100, 3, &mut rng);

        assert_eq!(tasks.len(), 100);
        assert_eq!(tasks[0].id, "0");
        assert_eq!(tasks[99].id, "99");
        assert!(tasks
            .iter()
            .all(|t| (1.0..=3.0).contains(&t.duration) && t.duration.fract() == 0.0));
    }

    #[test]
    fn test_sample_tasks_reproducible() {
        let a = sample_tasks(20, 3, &mut SmallRng::seed_from_u64(9));
        let b = sample_tasks(20, 3, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{
                "staff": [
                    {"id": "s1", "name": "Dr. Lee", "role": "Doctor"},
                    {"id": "s2", "name": "Park", "role": {"Other": "Technician"}, "availability": [false, true]}
                ],
                "patients": [{"id": "p1", "name": "Kim", "appointment_time": "2024-03-04T09:00:00"}],
                "equipment": [{"id": "e1", "equipment_type": "Exam room"}]
            }"#,
        )
        .unwrap();

        let pool = ResourcePool::from_json_file(&path).unwrap();
        assert_eq!(pool.staff.len(), 2);
        assert!(pool.staff[0].is_available());
        assert!(!pool.staff[1].is_available());
        assert_eq!(pool.staff[1].role, Role::Other("Technician".into()));
        assert_eq!(pool.equipment_type("e1"), Some("Exam room"));
        assert!(pool.tasks.is_empty());
    }

    #[test]
    fn test_from_json_file_flag_availability() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{
                "staff": [
                    {"id": "s1", "name": "X", "role": "Nurse", "availability": false},
                    {"id": "s2", "name": "Y", "role": "Nurse", "availability": true}
                ],
                "equipment": [{"id": "e1", "equipment_type": "Bed", "availability": []}]
            }"#,
        )
        .unwrap();

        let mut pool = ResourcePool::from_json_file(&path).unwrap();
        assert!(!pool.staff[0].is_available());
        assert!(pool.staff[0].availability.is_off_duty());
        assert!(pool.staff[1].is_available());
        assert_eq!(pool.staff[1].availability.len(), 32);

        // an empty slot list still counts as one unit that can be used up
        assert!(pool.equipment[0].is_available());
        pool.equipment[0].consume();
        assert!(!pool.equipment[0].is_available());
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ResourcePool::from_json_file(dir.path().join("absent.json")).is_err());
    }
}
