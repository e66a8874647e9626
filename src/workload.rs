//! Greedy workload balancing across staff.
//!
//! # Algorithm
//!
//! Shortest-queue-first: every task goes to the available staff member
//! with the least cumulative load so far (first minimum in list order wins).
//! Once a staff member's load reaches the full-workload threshold they are
//! consumed and receive no further tasks in this pass. Earlier decisions
//! are never revisited, so the result is balanced but not min-max optimal.
//!
//! # Complexity
//! O(t * s) where t=tasks, s=staff.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::{Bookable, Staff, Task, TaskAssignment};

/// Load at which a staff member is considered fully booked (hours).
pub const FULL_WORKLOAD_HOURS: f64 = 8.0;

/// Least-loaded-first task distributor.
#[derive(Debug, Clone)]
pub struct WorkloadDistributor {
    threshold: f64,
}

impl Default for WorkloadDistributor {
    fn default() -> Self {
        Self {
            threshold: FULL_WORKLOAD_HOURS,
        }
    }
}

impl WorkloadDistributor {
    /// Creates a distributor with the default 8-hour threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full-workload threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// The full-workload threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Assigns every task to a staff member, in task order.
    ///
    /// Returns one [`TaskAssignment`] per task. Tasks that find nobody
    /// available are recorded unassigned and not retried. Staff who reach
    /// the threshold are consumed.
    pub fn distribute(&self, staff: &mut [Staff], tasks: &[Task]) -> Vec<TaskAssignment> {
        let mut load = vec![0.0_f64; staff.len()];
        let mut assignments = Vec::with_capacity(tasks.len());

        for task in tasks {
            let least_loaded = staff
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_available())
                .min_by(|(a, _), (b, _)| load[*a].total_cmp(&load[*b]))
                .map(|(idx, _)| idx);

            let Some(idx) = least_loaded else {
                debug!(task = %task.id, "no staff available");
                assignments.push(TaskAssignment {
                    task_id: task.id.clone(),
                    duration: task.duration,
                    staff_id: None,
                });
                continue;
            };

            load[idx] += task.duration;
            debug!(task = %task.id, staff = %staff[idx].id, load = load[idx], "task assigned");

            if load[idx] >= self.threshold {
                debug!(staff = %staff[idx].id, "full workload reached");
                staff[idx].consume();
            }

            assignments.push(TaskAssignment {
                task_id: task.id.clone(),
                duration: task.duration,
                staff_id: Some(staff[idx].id.clone()),
            });
        }

        let assigned = assignments.iter().filter(|a| a.is_assigned()).count();
        info!(
            tasks = tasks.len(),
            assigned,
            unassigned = tasks.len() - assigned,
            "workload distributed"
        );
        assignments
    }
}

/// Cumulative assigned duration per staff id.
///
/// Every staff member appears in the result, with zero if they received
/// no tasks. Assignments naming unknown staff are ignored.
pub fn staff_workload(staff: &[Staff], assignments: &[TaskAssignment]) -> HashMap<String, f64> {
    let mut workload: HashMap<String, f64> = staff.iter().map(|s| (s.id.clone(), 0.0)).collect();

    for assignment in assignments {
        if let Some(load) = assignment
            .staff_id
            .as_ref()
            .and_then(|id| workload.get_mut(id))
        {
            *load += assignment.duration;
        }
    }

    workload
}
