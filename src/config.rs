//! Planner configuration loaded from TOML.
//!
//! Every section has defaults, so an empty file (or no file) yields the
//! standard department: 09:00–17:00 in 15-minute slots, 30-minute
//! appointments, an 8-hour workload cap, and a 1000 × 10 Q-table.
//!
//! ```toml
//! seed = 42
//! model_path = "models/q_table.json"
//!
//! [workday]
//! start = "08:30"
//! end = "16:30"
//!
//! [learning]
//! epsilon = 0.05
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::learning::LearningConfig;
use crate::models::{parse_time, Workday};
use crate::workload::FULL_WORKLOAD_HOURS;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub workday: WorkdayConfig,
    pub workload: WorkloadConfig,
    pub learning: LearningConfig,
    pub simulation: SimulationConfig,
    /// Persisted Q-table to load before predicting.
    pub model_path: Option<PathBuf>,
    /// Seed for task generation and exploration. Random when absent.
    pub seed: Option<u64>,
    /// Fill rate below which a schedule is reported as under target.
    pub min_fill_rate: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            workday: WorkdayConfig::default(),
            workload: WorkloadConfig::default(),
            learning: LearningConfig::default(),
            simulation: SimulationConfig::default(),
            model_path: None,
            seed: None,
            min_fill_rate: 0.8,
        }
    }
}

/// `[workday]` section. Times are `HH:MM`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkdayConfig {
    pub start: String,
    pub end: String,
    pub slot_minutes: u32,
    pub appointment_minutes: u32,
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        Self {
            start: "09:00".into(),
            end: "17:00".into(),
            slot_minutes: 15,
            appointment_minutes: 30,
        }
    }
}

impl WorkdayConfig {
    /// Parses the section into a [`Workday`].
    pub fn to_workday(&self) -> Result<Workday> {
        let workday = Workday::new(parse_time(&self.start)?, parse_time(&self.end)?)
            .with_slot_minutes(self.slot_minutes)
            .with_appointment_minutes(self.appointment_minutes);
        Ok(workday)
    }
}

/// `[workload]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Hours after which a staff member takes no more tasks.
    pub full_threshold: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            full_threshold: FULL_WORKLOAD_HOURS,
        }
    }
}

/// `[simulation]` section: size of the generated sample day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub staff_count: usize,
    pub patient_count: usize,
    pub equipment_count: usize,
    /// Upper bound (inclusive) of generated task durations, in hours.
    pub max_task_duration: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            staff_count: 10,
            patient_count: 20,
            equipment_count: 5,
            max_task_duration: 3,
        }
    }
}

impl PlannerConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<()> {
        let workday = self.workday.to_workday()?;
        if workday.length_minutes() == 0 {
            return Err(PlannerError::InvalidConfig(
                "workday end must be after start".into(),
            ));
        }
        if self.workday.slot_minutes == 0 || self.workday.appointment_minutes == 0 {
            return Err(PlannerError::InvalidConfig(
                "slot and appointment lengths must be > 0".into(),
            ));
        }
        if !(self.workload.full_threshold > 0.0) {
            return Err(PlannerError::InvalidConfig(
                "workload.full_threshold must be > 0".into(),
            ));
        }
        if self.simulation.max_task_duration == 0 {
            return Err(PlannerError::InvalidConfig(
                "simulation.max_task_duration must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_fill_rate) {
            return Err(PlannerError::InvalidConfig(
                "min_fill_rate must be in [0, 1]".into(),
            ));
        }
        self.learning.validate()
    }
}
