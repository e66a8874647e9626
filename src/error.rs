//! Error type for the fallible edges of the planner.
//!
//! The planning passes themselves never fail: unmet demand is reported as
//! `None` fields in their outputs. Errors only arise when loading
//! configuration or seed data, persisting the Q-table, or constructing a
//! learner from an out-of-range configuration.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by configuration, seeding, and persistence.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// A configuration value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A time-of-day string could not be parsed as `HH:MM`.
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    /// A persisted Q-table does not match the learner's dimensions.
    #[error("q-table has {found} values, expected {expected}")]
    QTableShape { expected: usize, found: usize },

    /// Seed data failed boundary validation.
    #[error("input validation failed with {} problem(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
