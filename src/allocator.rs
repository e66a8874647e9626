//! One-shot greedy resource allocation.
//!
//! # Algorithm
//!
//! For each patient in input order, take the first available staff member
//! and the first available equipment unit. If both exist, consume both and
//! record the pairing. Otherwise record an unmet allocation and consume
//! nothing; the patient is not retried later in the pass.
//!
//! # Complexity
//! O(p * (s + e)) for p patients, s staff, e equipment units.

use tracing::{debug, info};

use crate::models::{Allocation, Bookable, Equipment, Patient, Staff};

/// Greedy first-fit allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceAllocator;

impl ResourceAllocator {
    /// Creates an allocator.
    pub fn new() -> Self {
        Self
    }

    /// Allocates one staff member and one equipment unit per patient.
    ///
    /// Returns exactly one [`Allocation`] per patient, in patient order.
    /// Chosen staff and equipment are consumed: callers must treat them as
    /// unavailable for the rest of the pass.
    pub fn allocate(
        &self,
        staff: &mut [Staff],
        patients: &[Patient],
        equipment: &mut [Equipment],
    ) -> Vec<Allocation> {
        let mut allocations = Vec::with_capacity(patients.len());

        for patient in patients {
            let staff_idx = first_available(staff);
            let equipment_idx = first_available(equipment);

            match (staff_idx, equipment_idx) {
                (Some(s), Some(e)) => {
                    staff[s].consume();
                    equipment[e].consume();
                    debug!(
                        patient = %patient.id,
                        staff = %staff[s].id,
                        equipment = %equipment[e].id,
                        "allocated"
                    );
                    allocations.push(Allocation::paired(
                        &patient.id,
                        &staff[s].id,
                        &equipment[e].id,
                    ));
                }
                _ => {
                    debug!(patient = %patient.id, "no staff/equipment pair available");
                    allocations.push(Allocation::unmet(&patient.id));
                }
            }
        }

        let met = allocations.iter().filter(|a| a.is_met()).count();
        info!(
            patients = patients.len(),
            met,
            unmet = patients.len() - met,
            "resources allocated"
        );
        allocations
    }
}

/// Index of the first available resource.
fn first_available<T: Bookable>(resources: &[T]) -> Option<usize> {
    resources.iter().position(|r| r.is_available())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotAvailability;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn patient(id: &str) -> Patient {
        let time = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Patient::new(id, format!("Patient {id}"), time)
    }

    fn patients(n: usize) -> Vec<Patient> {
        (0..n).map(|i| patient(&format!("P{i}"))).collect()
    }

    #[test]
    fn test_second_staff_unavailable_scenario() {
        let mut staff = vec![Staff::doctor("S1"), Staff::nurse("S2").unavailable()];
        let mut equipment = vec![Equipment::new("E1", "ECG")];
        let patients = vec![patient("P1"), patient("P2")];

        let allocations = ResourceAllocator::new().allocate(&mut staff, &patients, &mut equipment);

        assert_eq!(
            allocations,
            vec![Allocation::paired("P1", "S1", "E1"), Allocation::unmet("P2")]
        );
        assert!(!staff[0].is_available());
        assert!(!equipment[0].is_available());
    }

    #[test]
    fn test_no_resource_reused() {
        let mut staff: Vec<Staff> = (0..4).map(|i| Staff::nurse(format!("S{i}"))).collect();
        let mut equipment: Vec<Equipment> =
            (0..3).map(|i| Equipment::new(format!("E{i}"), "Bed")).collect();
        let patients = patients(10);

        let allocations = ResourceAllocator::new().allocate(&mut staff, &patients, &mut equipment);
        assert_eq!(allocations.len(), 10);

        let mut seen_staff = HashSet::new();
        let mut seen_equipment = HashSet::new();
        for a in allocations.iter().filter(|a| a.is_met()) {
            assert!(seen_staff.insert(a.staff_id.clone().unwrap()));
            assert!(seen_equipment.insert(a.equipment_id.clone().unwrap()));
        }
        assert_eq!(seen_equipment.len(), 3); // equipment is the bottleneck
    }

    #[test]
    fn test_fewer_staff_than_patients() {
        let mut staff: Vec<Staff> = (0..3).map(|i| Staff::doctor(format!("S{i}"))).collect();
        let mut equipment: Vec<Equipment> =
            (0..10).map(|i| Equipment::new(format!("E{i}"), "Room")).collect();
        let patients = patients(6);

        let allocations = ResourceAllocator::new().allocate(&mut staff, &patients, &mut equipment);

        let with_staff: Vec<bool> = allocations.iter().map(|a| a.staff_id.is_some()).collect();
        assert_eq!(with_staff, vec![true, true, true, false, false, false]);
        // Patient order preserved
        for (a, p) in allocations.iter().zip(&patients) {
            assert_eq!(a.patient_id, p.id);
        }
        // Unmet patients do not consume equipment
        assert_eq!(equipment.iter().filter(|e| e.is_available()).count(), 7);
    }

    #[test]
    fn test_empty_resources() {
        let patients = patients(3);
        let allocations = ResourceAllocator::new().allocate(&mut [], &patients, &mut []);
        assert_eq!(allocations.len(), 3);
        assert!(allocations.iter().all(|a| !a.is_met()));
    }

    #[test]
    fn test_no_patients() {
        let mut staff = vec![Staff::doctor("S1")];
        let mut equipment = vec![Equipment::new("E1", "ECG")];
        let allocations = ResourceAllocator::new().allocate(&mut staff, &[], &mut equipment);
        assert!(allocations.is_empty());
        assert!(staff[0].is_available());
    }

    #[test]
    fn test_slotless_resources_used_once() {
        let mut staff = vec![Staff::nurse("S1").with_availability(SlotAvailability::open(0))];
        let mut equipment =
            vec![Equipment::new("E1", "Bed").with_availability(SlotAvailability::open(0))];
        let patients = patients(2);

        let allocations = ResourceAllocator::new().allocate(&mut staff, &patients, &mut equipment);

        assert_eq!(
            allocations,
            vec![Allocation::paired("P0", "S1", "E1"), Allocation::unmet("P1")]
        );
        assert!(!staff[0].is_available());
        assert!(!equipment[0].is_available());
    }
}
