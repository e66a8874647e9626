//! Slot-based greedy daily scheduler.
//!
//! # Algorithm
//!
//! 1. Start a cursor at the workday start.
//! 2. For each appointment in order, stop if the cursor reached the end of
//!    the day; later appointments are dropped from the output.
//! 3. Find the first staff entry and the first equipment entry free at the
//!    cursor's slot.
//! 4. If both exist, book the appointment: block every slot from the cursor
//!    through cursor + appointment length on both resources (the last one
//!    is a turnover slot) and advance by one appointment length.
//! 5. Otherwise record an unmet entry and advance by one slot only.
//!
//! # Complexity
//! O(a * r) where a=appointments, r=roster entries. The loop runs at most
//! `workday length / slot length` times, whatever the input size.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::models::{
    Appointment, Assignment, Bookable, ResourceEntry, ResourceKind, Schedule, Workday,
};

/// Greedy first-fit scheduler over a bounded workday.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use opd_planner::models::{Appointment, Equipment, Patient, ResourceEntry, Staff};
/// use opd_planner::scheduler::DailyScheduler;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let mut roster = vec![
///     ResourceEntry::from(Staff::doctor("S1")),
///     ResourceEntry::from(Equipment::new("E1", "ECG")),
/// ];
/// let patient = Patient::new("P1", "Patient 1", date.and_hms_opt(9, 0, 0).unwrap());
/// let appointments = vec![Appointment::new(patient)];
///
/// let schedule = DailyScheduler::new().generate(&mut roster, &appointments, date);
/// assert_eq!(schedule.booked_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DailyScheduler {
    workday: Workday,
}

impl DailyScheduler {
    /// Creates a scheduler over the default 09:00–17:00 day.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the workday.
    pub fn with_workday(mut self, workday: Workday) -> Self {
        self.workday = workday;
        self
    }

    /// The workday this scheduler fills.
    pub fn workday(&self) -> &Workday {
        &self.workday
    }

    /// Builds the schedule for `date`.
    ///
    /// Booked slots are written back into the roster entries.
    pub fn generate(
        &self,
        resources: &mut [ResourceEntry],
        appointments: &[Appointment],
        date: NaiveDate,
    ) -> Schedule {
        let mut schedule = Schedule::new(date);
        let slot_step = self.workday.slot_minutes.max(1);
        let booking_step = self.workday.appointment_minutes.max(1);
        let mut cursor: u32 = 0;

        for (processed, appointment) in appointments.iter().enumerate() {
            if !self.workday.contains_offset(cursor) {
                debug!(
                    dropped = appointments.len() - processed,
                    "workday over, dropping remaining appointments"
                );
                break;
            }

            let slot = self.workday.slot_index(cursor);
            let time = self.workday.time_at(cursor);
            let patient_id = &appointment.patient.id;

            let staff = first_free(resources, ResourceKind::Staff, slot);
            let equipment = first_free(resources, ResourceKind::Equipment, slot);

            match (staff, equipment) {
                (Some(s), Some(e)) => {
                    let last_slot = self.workday.slot_index(cursor + booking_step);
                    resources[s].availability_mut().block_through(slot, last_slot);
                    resources[e].availability_mut().block_through(slot, last_slot);

                    debug!(
                        patient = %patient_id,
                        staff = resources[s].id(),
                        equipment = resources[e].id(),
                        time = %time,
                        "booked"
                    );
                    schedule.add_assignment(Assignment::booked(
                        time,
                        patient_id,
                        resources[s].id(),
                        resources[e].id(),
                    ));
                    cursor += booking_step;
                }
                _ => {
                    debug!(patient = %patient_id, time = %time, "no free pair");
                    schedule.add_assignment(Assignment::unmet(time, patient_id));
                    cursor += slot_step;
                }
            }
        }

        info!(
            appointments = appointments.len(),
            processed = schedule.assignment_count(),
            booked = schedule.booked_count(),
            "daily schedule generated"
        );
        schedule
    }

    /// Builds the schedule for the local current date.
    pub fn generate_for_today(
        &self,
        resources: &mut [ResourceEntry],
        appointments: &[Appointment],
    ) -> Schedule {
        self.generate(resources, appointments, Local::now().date_naive())
    }
}

/// Index of the first entry of `kind` free at `slot`.
fn first_free(resources: &[ResourceEntry], kind: ResourceKind, slot: usize) -> Option<usize> {
    resources
        .iter()
        .position(|r| r.kind() == kind && r.is_free_at(slot))
}
