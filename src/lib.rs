//! Outpatient department planning.
//!
//! Plans one clinic day over a pool of staff, patients, and equipment:
//! pairs patients with resources, books appointment slots across the
//! workday, balances staff tasks, and asks a tabular Q-learning selector
//! for an operational action.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Staff`, `Equipment`, `Patient`, `Task`,
//!   `Schedule`, `Workday`, `SlotAvailability`
//! - **`allocator`**: Greedy first-fit patient/resource pairing
//! - **`scheduler`**: Slot-based daily scheduler and schedule KPIs
//! - **`workload`**: Least-loaded task distribution with a full-day cap
//! - **`learning`**: Q-table, state encoding, and the action selector
//! - **`registry`**: The day's resource pool and its seeding
//! - **`pipeline`**: One simulated day end to end, plus its JSON shape
//! - **`config`**: TOML configuration
//! - **`validation`**: Seed data integrity checks (duplicate IDs, durations)
//!
//! All planning passes are greedy and single-pass: each decision is made
//! once, in input order, and never revisited.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Sutton & Barto (2018), "Reinforcement Learning: An Introduction", Ch. 6.5

pub mod allocator;
pub mod config;
pub mod error;
pub mod learning;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod scheduler;
pub mod validation;
pub mod workload;

pub use error::{PlannerError, Result};
