//! One simulated day: allocate, schedule, distribute, predict.
//!
//! [`Simulation::run`] drives the four passes over a [`ResourcePool`]:
//!
//! 1. The allocator pairs patients with staff and equipment, consuming
//!    the pairs in the pool.
//! 2. The allocated pairs form the day's roster, each entry starting with
//!    an open slot map, and the scheduler books appointment slots on it.
//! 3. Staff tasks are distributed over the pool's staff. Staff taken by
//!    the allocator are no longer available and receive none.
//! 4. The remaining capacity is summarized as a [`State`] and the learner
//!    proposes an action.
//!
//! The result is a [`SimulationReport`] in planner terms (ids, times) and
//! can be rendered as a [`SimulationResponse`] in display terms (names,
//! `HH:MM` strings) for transport.

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::allocator::ResourceAllocator;
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::learning::{QLearner, State};
use crate::models::{
    format_hhmm, Allocation, Bookable, ResourceEntry, Schedule, SlotAvailability, TaskAssignment,
    Workday,
};
use crate::registry::{sample_tasks, ResourcePool};
use crate::scheduler::{DailyScheduler, ScheduleKpi};
use crate::workload::WorkloadDistributor;

/// Message returned to clients for any failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Everything one run produced, keyed by ids.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub date: NaiveDate,
    pub allocations: Vec<Allocation>,
    pub schedule: Schedule,
    pub task_assignments: Vec<TaskAssignment>,
    /// State observed after the passes.
    pub state: State,
    /// Action proposed by the learner.
    pub action: usize,
    pub kpi: ScheduleKpi,
}

/// Pipeline runner holding the passes and the learner.
#[derive(Debug, Clone)]
pub struct Simulation {
    allocator: ResourceAllocator,
    scheduler: DailyScheduler,
    distributor: WorkloadDistributor,
    learner: QLearner,
    max_task_duration: u32,
    min_fill_rate: f64,
    rng: SmallRng,
}

impl Simulation {
    /// Builds a simulation from configuration.
    ///
    /// Loads the persisted Q-table when `model_path` is set; otherwise the
    /// learner starts from a zeroed table.
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        config.validate()?;
        let workday = config.workday.to_workday()?;

        let mut learner = QLearner::new(config.learning.clone())?;
        if let Some(path) = &config.model_path {
            learner.load(path)?;
            info!(path = %path.display(), "loaded q-table");
        }

        let rng = match config.seed {
            Some(seed) => {
                learner = learner.with_seed(seed);
                SmallRng::seed_from_u64(seed)
            }
            None => SmallRng::from_os_rng(),
        };

        Ok(Self {
            allocator: ResourceAllocator::new(),
            scheduler: DailyScheduler::new().with_workday(workday),
            distributor: WorkloadDistributor::new()
                .with_threshold(config.workload.full_threshold),
            learner,
            max_task_duration: config.simulation.max_task_duration,
            min_fill_rate: config.min_fill_rate,
            rng,
        })
    }

    /// Replaces the learner.
    pub fn with_learner(mut self, learner: QLearner) -> Self {
        self.learner = learner;
        self
    }

    /// The workday being scheduled.
    pub fn workday(&self) -> &Workday {
        self.scheduler.workday()
    }

    /// The action selector.
    pub fn learner(&self) -> &QLearner {
        &self.learner
    }

    /// Runs all passes over `pool` for `date`.
    ///
    /// The pool is mutated: allocated and fully loaded resources end up
    /// consumed. When the pool has no tasks, one is generated per patient.
    pub fn run(&mut self, pool: &mut ResourcePool, date: NaiveDate) -> SimulationReport {
        let allocations =
            self.allocator
                .allocate(&mut pool.staff, &pool.patients, &mut pool.equipment);

        let mut roster = roster_from_allocations(&allocations, pool, self.workday());
        let appointments = pool.appointments();
        let schedule = self.scheduler.generate(&mut roster, &appointments, date);
        let kpi = ScheduleKpi::calculate(&schedule, appointments.len(), &roster);
        if !kpi.meets_thresholds(self.min_fill_rate) {
            warn!(
                fill_rate = kpi.fill_rate,
                dropped = kpi.dropped,
                min_fill_rate = self.min_fill_rate,
                "schedule below target"
            );
        }

        let tasks = if pool.tasks.is_empty() {
            sample_tasks(pool.patients.len(), self.max_task_duration, &mut self.rng)
        } else {
            pool.tasks.clone()
        };
        let task_assignments = self.distributor.distribute(&mut pool.staff, &tasks);

        let state = observe(pool);
        let action = self.learner.predict(&state);
        info!(
            booked = kpi.booked,
            fill_rate = kpi.fill_rate,
            action,
            "simulation finished"
        );

        SimulationReport {
            date,
            allocations,
            schedule,
            task_assignments,
            state,
            action,
            kpi,
        }
    }
}

/// Builds the scheduler roster from the allocator's pairs.
///
/// Every staff member and equipment unit of a met allocation joins the
/// roster in allocation order with all slots of `workday` open.
pub fn roster_from_allocations(
    allocations: &[Allocation],
    pool: &ResourcePool,
    workday: &Workday,
) -> Vec<ResourceEntry> {
    let mut roster = Vec::new();

    for allocation in allocations {
        let (Some(staff_id), Some(equipment_id)) = (&allocation.staff_id, &allocation.equipment_id)
        else {
            continue;
        };

        if let Some(staff) = pool.staff.iter().find(|s| &s.id == staff_id) {
            let staff = staff
                .clone()
                .with_availability(SlotAvailability::for_workday(workday));
            roster.push(ResourceEntry::from(staff));
        }
        if let Some(equipment) = pool.equipment.iter().find(|e| &e.id == equipment_id) {
            let equipment = equipment
                .clone()
                .with_availability(SlotAvailability::for_workday(workday));
            roster.push(ResourceEntry::from(equipment));
        }
    }

    roster
}

/// Summarizes the pool for the learner: staff still available and
/// patients waiting.
pub fn observe(pool: &ResourcePool) -> State {
    let staff_available = pool.staff.iter().filter(|s| s.is_available()).count();
    State::new()
        .with("staff_available", staff_available as f64)
        .with("patients_waiting", pool.patients.len() as f64)
}

/// One allocation row for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationView {
    pub patient: String,
    pub staff: Option<String>,
    pub equipment: Option<String>,
}

/// One schedule row for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    /// `HH:MM`.
    pub time: String,
    pub patient: String,
    pub staff: Option<String>,
    pub equipment: Option<String>,
}

/// One task row for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub task_id: String,
    pub assigned_to: Option<String>,
}

/// Transport shape of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub allocations: Vec<AllocationView>,
    pub schedule: Vec<ScheduleView>,
    pub distributed_tasks: Vec<TaskView>,
    pub rl_action: usize,
}

/// Transport shape of a failure. Never carries details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// The generic failure response.
    pub fn internal() -> Self {
        Self {
            error: INTERNAL_ERROR_MESSAGE.into(),
        }
    }
}

impl SimulationReport {
    /// Renders the report with names from `pool`.
    ///
    /// Patients and staff are shown by name, equipment by type. Ids that
    /// are not in the pool are shown as-is.
    pub fn to_response(&self, pool: &ResourcePool) -> SimulationResponse {
        let patient = |id: &str| pool.patient_name(id).unwrap_or(id).to_string();
        let staff = |id: &Option<String>| {
            id.as_deref()
                .map(|id| pool.staff_name(id).unwrap_or(id).to_string())
        };
        let equipment = |id: &Option<String>| {
            id.as_deref()
                .map(|id| pool.equipment_type(id).unwrap_or(id).to_string())
        };

        SimulationResponse {
            allocations: self
                .allocations
                .iter()
                .map(|a| AllocationView {
                    patient: patient(&a.patient_id),
                    staff: staff(&a.staff_id),
                    equipment: equipment(&a.equipment_id),
                })
                .collect(),
            schedule: self
                .schedule
                .assignments
                .iter()
                .map(|a| ScheduleView {
                    time: format_hhmm(a.time),
                    patient: patient(&a.patient_id),
                    staff: staff(&a.staff_id),
                    equipment: equipment(&a.equipment_id),
                })
                .collect(),
            distributed_tasks: self
                .task_assignments
                .iter()
                .map(|t| TaskView {
                    task_id: t.task_id.clone(),
                    assigned_to: staff(&t.staff_id),
                })
                .collect(),
            rl_action: self.action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::models::{Equipment, Patient, Staff, Task};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn seeded_config() -> PlannerConfig {
        PlannerConfig {
            seed: Some(11),
            ..PlannerConfig::default()
        }
    }

    fn sample_pool() -> ResourcePool {
        ResourcePool::sample(&SimulationConfig::default(), &Workday::default(), date())
    }

    #[test]
    fn test_default_sample_day() {
        let mut sim = Simulation::from_config(&seeded_config()).unwrap();
        let mut pool = sample_pool();
        let report = sim.run(&mut pool, date());

        // 5 equipment units limit allocation to the first 5 patients
        assert_eq!(report.allocations.len(), 20);
        assert!(report.allocations[..5].iter().all(|a| a.is_met()));
        assert!(report.allocations[5..].iter().all(|a| !a.is_met()));
        assert_eq!(report.allocations[0].staff_id.as_deref(), Some("staff-0"));
        assert_eq!(report.allocations[4].equipment_id.as_deref(), Some("equipment-4"));

        // one booking per 30-minute step: 16 fit into 09:00-17:00
        assert_eq!(report.schedule.assignment_count(), 16);
        assert_eq!(report.schedule.booked_count(), 16);
        assert!(report.schedule.is_time_ordered());
        assert_eq!(report.kpi.dropped, 4);

        let allocated = ["staff-0", "staff-1", "staff-2", "staff-3", "staff-4"];
        assert_eq!(report.task_assignments.len(), 20);
        assert!(report
            .task_assignments
            .iter()
            .filter_map(|t| t.staff_id.as_deref())
            .all(|id| !allocated.contains(&id)));

        assert_eq!(report.state.get("patients_waiting"), Some(20.0));
        assert!(report.action < 10);
    }

    #[test]
    fn test_roster_has_fresh_slots() {
        let mut pool = sample_pool();
        let allocations =
            ResourceAllocator::new().allocate(&mut pool.staff, &pool.patients, &mut pool.equipment);
        assert!(!pool.staff[0].is_available());

        let roster = roster_from_allocations(&allocations, &pool, &Workday::default());
        assert_eq!(roster.len(), 10);
        assert!(roster.iter().all(|r| r.is_available()));
        assert_eq!(roster[0].id(), "staff-0");
        assert_eq!(roster[1].id(), "equipment-0");
    }

    #[test]
    fn test_no_equipment_means_empty_schedule_bookings() {
        let mut sim = Simulation::from_config(&seeded_config()).unwrap();
        let mut pool = sample_pool();
        pool.equipment.clear();
        pool.tasks = vec![Task::new("0")];

        let report = sim.run(&mut pool, date());
        assert!(report.allocations.iter().all(|a| !a.is_met()));
        assert_eq!(report.schedule.booked_count(), 0);
        // unmet probes advance 15 minutes, so all 20 fit before 14:00
        assert_eq!(report.schedule.assignment_count(), 20);
        assert_eq!(report.state.get("staff_available"), Some(10.0));
    }

    #[test]
    fn test_pool_tasks_are_used() {
        let mut sim = Simulation::from_config(&seeded_config()).unwrap();
        let at = date().and_hms_opt(9, 0, 0).unwrap();
        let mut pool = ResourcePool {
            staff: vec![
                Staff::doctor("S1").with_name("Dr. One"),
                Staff::nurse("A").with_name("Nurse A"),
                Staff::nurse("B").with_name("Nurse B"),
            ],
            patients: vec![Patient::new("P1", "Kim", at)],
            equipment: vec![Equipment::new("E1", "Exam room")],
            tasks: vec![
                Task::new("0").with_duration(5.0),
                Task::new("1").with_duration(5.0),
            ],
        };

        let report = sim.run(&mut pool, date());
        assert_eq!(report.task_assignments[0].staff_id.as_deref(), Some("A"));
        assert_eq!(report.task_assignments[1].staff_id.as_deref(), Some("B"));

        let response = report.to_response(&pool);
        assert_eq!(response.allocations[0].patient, "Kim");
        assert_eq!(response.allocations[0].staff.as_deref(), Some("Dr. One"));
        assert_eq!(response.allocations[0].equipment.as_deref(), Some("Exam room"));
        assert_eq!(response.schedule[0].time, "09:00");
        assert_eq!(response.distributed_tasks[1].assigned_to.as_deref(), Some("Nurse B"));
    }

    #[test]
    fn test_seeded_runs_match() {
        let run = || {
            let mut sim = Simulation::from_config(&seeded_config()).unwrap();
            let mut pool = sample_pool();
            let report = sim.run(&mut pool, date());
            report.to_response(&pool)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_loaded_model_drives_action() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");

        let config = seeded_config();
        let mut learner = QLearner::new(config.learning.clone()).unwrap();
        let state = State::new()
            .with("staff_available", 0.0)
            .with("patients_waiting", 20.0);
        let row = learner.state_index(&state);
        learner.table_mut().set(row, 7, 1.0);
        learner.save(&path).unwrap();

        let config = PlannerConfig {
            model_path: Some(path),
            ..config
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        let mut pool = sample_pool();
        // 2 staff, fully used by allocation: nobody left afterwards
        pool.staff.truncate(2);
        let report = sim.run(&mut pool, date());

        assert_eq!(report.state, state);
        assert_eq!(report.action, 7);
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let config = PlannerConfig {
            model_path: Some("/nonexistent/q.json".into()),
            ..PlannerConfig::default()
        };
        assert!(Simulation::from_config(&config).is_err());
    }

    #[test]
    fn test_response_json_shape() {
        let mut sim = Simulation::from_config(&seeded_config()).unwrap();
        let mut pool = sample_pool();
        let report = sim.run(&mut pool, date());
        let json = serde_json::to_value(report.to_response(&pool)).unwrap();

        assert_eq!(json["allocations"][0]["patient"], "Patient 0");
        assert_eq!(json["allocations"][0]["staff"], "Staff 0");
        assert_eq!(json["allocations"][0]["equipment"], "Equipment 0");
        assert!(json["allocations"][19]["staff"].is_null());
        assert_eq!(json["schedule"][0]["time"], "09:00");
        assert!(json["distributed_tasks"][0]["task_id"].is_string());
        assert!(json["rl_action"].is_u64());

        let error = serde_json::to_string(&ErrorResponse::internal()).unwrap();
        assert_eq!(error, r#"{"error":"An internal error occurred"}"#);
    }
}
