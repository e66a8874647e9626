//! Bookable resources: staff members and equipment units.
//!
//! Both kinds carry a [`SlotAvailability`] over the workday. Passes that
//! think in whole-day terms (allocation, workload) use the boolean
//! projection from [`Bookable`]: a resource is available only while none
//! of its slots is booked, and consuming it books every slot.

use serde::{Deserialize, Serialize};

use super::SlotAvailability;

/// A resource with per-slot availability.
pub trait Bookable {
    /// Resource identifier.
    fn id(&self) -> &str;

    /// Slot availability.
    fn availability(&self) -> &SlotAvailability;

    /// Mutable slot availability.
    fn availability_mut(&mut self) -> &mut SlotAvailability;

    /// Whole-day availability: `false` as soon as any slot is booked.
    fn is_available(&self) -> bool {
        self.availability().is_fully_open()
    }

    /// Books every slot, removing the resource from the current pass.
    fn consume(&mut self) {
        self.availability_mut().block_all();
    }
}

/// Clinical role of a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Doctor,
    Nurse,
    /// Any other role (technician, receptionist, ...).
    Other(String),
}

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Clinical role.
    pub role: Role,
    /// Availability over the workday.
    #[serde(default)]
    pub availability: SlotAvailability,
}

impl Staff {
    /// Creates an available staff member.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role,
            availability: SlotAvailability::default(),
        }
    }

    /// Creates a doctor.
    pub fn doctor(id: impl Into<String>) -> Self {
        Self::new(id, Role::Doctor)
    }

    /// Creates a nurse.
    pub fn nurse(id: impl Into<String>) -> Self {
        Self::new(id, Role::Nurse)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the availability.
    pub fn with_availability(mut self, availability: SlotAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// Marks the staff member as off duty for the whole day.
    pub fn unavailable(mut self) -> Self {
        self.consume();
        self
    }
}

impl Bookable for Staff {
    fn id(&self) -> &str {
        &self.id
    }

    fn availability(&self) -> &SlotAvailability {
        &self.availability
    }

    fn availability_mut(&mut self) -> &mut SlotAvailability {
        &mut self.availability
    }
}

/// An equipment unit (room, scanner, monitor, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique equipment identifier.
    pub id: String,
    /// Type label shown to users.
    pub equipment_type: String,
    /// Availability over the workday.
    #[serde(default)]
    pub availability: SlotAvailability,
}

impl Equipment {
    /// Creates an available equipment unit.
    pub fn new(id: impl Into<String>, equipment_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            equipment_type: equipment_type.into(),
            availability: SlotAvailability::default(),
        }
    }

    /// Sets the availability.
    pub fn with_availability(mut self, availability: SlotAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// Marks the unit as out of service for the whole day.
    pub fn unavailable(mut self) -> Self {
        self.consume();
        self
    }
}

impl Bookable for Equipment {
    fn id(&self) -> &str {
        &self.id
    }

    fn availability(&self) -> &SlotAvailability {
        &self.availability
    }

    fn availability_mut(&mut self) -> &mut SlotAvailability {
        &mut self.availability
    }
}

/// Kind tag of a [`ResourceEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Staff,
    Equipment,
}

/// One resource in the scheduler's roster, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceEntry {
    Staff(Staff),
    Equipment(Equipment),
}

impl ResourceEntry {
    /// Kind of this entry.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Staff(_) => ResourceKind::Staff,
            Self::Equipment(_) => ResourceKind::Equipment,
        }
    }

    /// Whether a slot is free for this entry.
    #[inline]
    pub fn is_free_at(&self, slot: usize) -> bool {
        self.availability().is_free(slot)
    }

    fn bookable(&self) -> &dyn Bookable {
        match self {
            Self::Staff(s) => s,
            Self::Equipment(e) => e,
        }
    }

    fn bookable_mut(&mut self) -> &mut dyn Bookable {
        match self {
            Self::Staff(s) => s,
            Self::Equipment(e) => e,
        }
    }
}

impl Bookable for ResourceEntry {
    fn id(&self) -> &str {
        self.bookable().id()
    }

    fn availability(&self) -> &SlotAvailability {
        self.bookable().availability()
    }

    fn availability_mut(&mut self) -> &mut SlotAvailability {
        self.bookable_mut().availability_mut()
    }
}

impl From<Staff> for ResourceEntry {
    fn from(staff: Staff) -> Self {
        Self::Staff(staff)
    }
}

impl From<Equipment> for ResourceEntry {
    fn from(equipment: Equipment) -> Self {
        Self::Equipment(equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_builder() {
        let s = Staff::doctor("S1").with_name("Dr. Kim");
        assert_eq!(s.id, "S1");
        assert_eq!(s.name, "Dr. Kim");
        assert_eq!(s.role, Role::Doctor);
        assert!(s.is_available());

        assert_eq!(Staff::nurse("N1").role, Role::Nurse);
        let tech = Staff::new("T1", Role::Other("Radiographer".into()));
        assert_eq!(tech.role, Role::Other("Radiographer".into()));
    }

    #[test]
    fn test_consume_makes_unavailable() {
        let mut e = Equipment::new("E1", "ECG");
        assert!(e.is_available());
        e.consume();
        assert!(!e.is_available());
        assert!(!Staff::nurse("N1").unavailable().is_available());
    }

    #[test]
    fn test_any_booked_slot_projects_to_unavailable() {
        let mut s = Staff::nurse("N1");
        s.availability.block(5);
        assert!(!s.is_available());
        assert!(s.availability.is_free(4));
    }

    #[test]
    fn test_resource_entry_dispatch() {
        let mut entry = ResourceEntry::from(Equipment::new("E1", "X-Ray"));
        assert_eq!(entry.kind(), ResourceKind::Equipment);
        assert_eq!(entry.id(), "E1");
        assert!(entry.is_free_at(0));

        entry.availability_mut().block(0);
        assert!(!entry.is_free_at(0));
        assert!(entry.is_free_at(1));

        let staff = ResourceEntry::from(Staff::doctor("S1"));
        assert_eq!(staff.kind(), ResourceKind::Staff);
    }

    #[test]
    fn test_staff_deserializes_without_availability() {
        let s: Staff =
            serde_json::from_str(r#"{"id":"S1","name":"Staff 1","role":"Nurse"}"#).unwrap();
        assert!(s.is_available());
        assert_eq!(s.availability.len(), 32);
    }
}
