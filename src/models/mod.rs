//! Outpatient department domain models.
//!
//! Provides the data types shared by the planning passes: the resources
//! that get booked, the patients and tasks that need them, and the
//! records each pass produces.
//!
//! # Pass Outputs
//!
//! | Pass | Input | Output |
//! |------|-------|--------|
//! | Allocation | Staff, Patient, Equipment | `Allocation` |
//! | Daily scheduling | `ResourceEntry`, `Appointment` | `Schedule` |
//! | Workload | Staff, `Task` | `TaskAssignment` |

mod patient;
mod resource;
mod schedule;
mod task;
mod workday;

pub use patient::{Appointment, Patient};
pub use resource::{Bookable, Equipment, ResourceEntry, ResourceKind, Role, Staff};
pub use schedule::{Assignment, Schedule};
pub use task::{Allocation, Task, TaskAssignment, DEFAULT_TASK_DURATION};
pub use workday::{format_hhmm, parse_time, SlotAvailability, Workday};
