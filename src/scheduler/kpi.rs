//! Daily schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Booked | Appointments paired with staff and equipment |
//! | Unmet | Processed appointments left without resources |
//! | Dropped | Appointments cut off by the end of the workday |
//! | Fill Rate | booked / processed |
//! | Utilization | Booked slots / workday slots, per roster entry |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Bookable, ResourceEntry, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Appointments with staff and equipment.
    pub booked: usize,
    /// Processed appointments without resources.
    pub unmet: usize,
    /// Appointments never processed.
    pub dropped: usize,
    /// Fraction of processed appointments that were booked (0.0..1.0).
    pub fill_rate: f64,
    /// Mean slot utilization across the roster (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-resource slot utilization.
    pub utilization_by_resource: HashMap<String, f64>,
}

impl ScheduleKpi {
    /// Computes KPIs after a scheduling pass.
    ///
    /// # Arguments
    /// * `schedule` - The generated schedule.
    /// * `appointment_count` - Number of appointments given to the scheduler.
    /// * `resources` - The roster after the pass, with its booked slots.
    pub fn calculate(
        schedule: &Schedule,
        appointment_count: usize,
        resources: &[ResourceEntry],
    ) -> Self {
        let processed = schedule.assignment_count();
        let booked = schedule.booked_count();

        let utilization_by_resource: HashMap<String, f64> = resources
            .iter()
            .filter(|r| !r.availability().is_empty())
            .map(|r| {
                let slots = r.availability();
                (
                    r.id().to_string(),
                    slots.booked_count() as f64 / slots.len() as f64,
                )
            })
            .collect();

        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_resource.values().sum();
            sum / utilization_by_resource.len() as f64
        };

        let fill_rate = if processed == 0 {
            1.0
        } else {
            booked as f64 / processed as f64
        };

        Self {
            booked,
            unmet: processed - booked,
            dropped: appointment_count.saturating_sub(processed),
            fill_rate,
            avg_utilization,
            utilization_by_resource,
        }
    }

    /// Whether the fill rate reaches `min_fill_rate` and nothing was dropped.
    pub fn meets_thresholds(&self, min_fill_rate: f64) -> bool {
        self.fill_rate >= min_fill_rate && self.dropped == 0
    }
}
