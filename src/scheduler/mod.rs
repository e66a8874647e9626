//! Daily scheduling and schedule KPIs.
//!
//! # Algorithm
//!
//! `DailyScheduler` walks a cursor through the workday and books the first
//! staff/equipment pair free at each step. Successful bookings advance by
//! one appointment length; failed lookups advance by a single slot so the
//! day keeps probing for gaps when resources are scarce.
//!
//! # KPI
//!
//! `ScheduleKpi` summarizes a pass: booked, unmet and dropped counts, fill
//! rate, and slot utilization per roster entry.

mod daily;
mod kpi;

pub use daily::DailyScheduler;
pub use kpi::ScheduleKpi;
