//! Workday window and per-slot availability.
//!
//! The day is divided into fixed-length slots starting at the workday
//! start. Slot `i` covers `[start + i * slot, start + (i + 1) * slot)`.
//!
//! # Time Model
//! Positions within the day are expressed as minute offsets from the
//! workday start. Only the conversion to a wall-clock `NaiveTime` touches
//! `chrono`; all slot arithmetic is integer.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Bounded working day with its slot granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workday {
    /// First bookable time (inclusive).
    pub start: NaiveTime,
    /// End of the working day (exclusive).
    pub end: NaiveTime,
    /// Length of one availability slot (minutes).
    pub slot_minutes: u32,
    /// Length of one booked appointment (minutes).
    pub appointment_minutes: u32,
}

impl Default for Workday {
    fn default() -> Self {
        Self {
            start: time_of_day(9, 0),
            end: time_of_day(17, 0),
            slot_minutes: 15,
            appointment_minutes: 30,
        }
    }
}

impl Workday {
    /// Creates a workday with default slot and appointment lengths.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Sets the slot length.
    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes;
        self
    }

    /// Sets the appointment length.
    pub fn with_appointment_minutes(mut self, minutes: u32) -> Self {
        self.appointment_minutes = minutes;
        self
    }

    /// Length of the working day (minutes). Zero if `end <= start`.
    pub fn length_minutes(&self) -> u32 {
        (self.end - self.start).num_minutes().max(0) as u32
    }

    /// Number of whole slots in the day.
    pub fn slot_count(&self) -> usize {
        (self.length_minutes() / self.slot_minutes.max(1)) as usize
    }

    /// Whether a minute offset is still inside the day.
    #[inline]
    pub fn contains_offset(&self, offset_minutes: u32) -> bool {
        offset_minutes < self.length_minutes()
    }

    /// Slot holding a minute offset.
    #[inline]
    pub fn slot_index(&self, offset_minutes: u32) -> usize {
        (offset_minutes / self.slot_minutes.max(1)) as usize
    }

    /// Wall-clock time at a minute offset.
    pub fn time_at(&self, offset_minutes: u32) -> NaiveTime {
        self.start + Duration::minutes(i64::from(offset_minutes))
    }

    /// `HH:MM` label of a slot.
    pub fn slot_label(&self, slot: usize) -> String {
        format_hhmm(self.time_at(slot as u32 * self.slot_minutes))
    }
}

/// Per-slot availability of one resource over the workday.
///
/// `true` means free. Queries past the last slot report free and blocks
/// past the last slot are ignored, so a resource never becomes busy
/// outside the day it was sized for.
///
/// A resource can also be off duty as a whole. That state is independent
/// of the slot count: an off-duty resource has no free slot, in range or
/// not, even when it tracks no slots at all.
///
/// In JSON the availability is either a slot array (`[true, false, ...]`)
/// or a single flag: `true` opens and `false` blocks every slot of the
/// default workday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AvailabilityRepr", into = "AvailabilityRepr")]
pub struct SlotAvailability {
    slots: Vec<bool>,
    off_duty: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AvailabilityRepr {
    Flag(bool),
    Slots(Vec<bool>),
}

impl From<AvailabilityRepr> for SlotAvailability {
    fn from(repr: AvailabilityRepr) -> Self {
        let count = Workday::default().slot_count();
        match repr {
            AvailabilityRepr::Flag(true) => Self::open(count),
            AvailabilityRepr::Flag(false) => Self::blocked(count),
            AvailabilityRepr::Slots(slots) => Self {
                slots,
                off_duty: false,
            },
        }
    }
}

impl From<SlotAvailability> for AvailabilityRepr {
    fn from(availability: SlotAvailability) -> Self {
        if availability.off_duty {
            Self::Flag(false)
        } else {
            Self::Slots(availability.slots)
        }
    }
}

impl Default for SlotAvailability {
    fn default() -> Self {
        Self::for_workday(&Workday::default())
    }
}

impl SlotAvailability {
    /// All `count` slots free.
    pub fn open(count: usize) -> Self {
        Self {
            slots: vec![true; count],
            off_duty: false,
        }
    }

    /// Off duty, with all `count` slots blocked.
    pub fn blocked(count: usize) -> Self {
        Self {
            slots: vec![false; count],
            off_duty: true,
        }
    }

    /// All slots of a workday free.
    pub fn for_workday(workday: &Workday) -> Self {
        Self::open(workday.slot_count())
    }

    /// Number of slots tracked.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are tracked.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the resource is off duty for the whole day.
    pub fn is_off_duty(&self) -> bool {
        self.off_duty
    }

    /// Whether a slot is free.
    #[inline]
    pub fn is_free(&self, slot: usize) -> bool {
        !self.off_duty && self.slots.get(slot).copied().unwrap_or(true)
    }

    /// Marks one slot busy.
    pub fn block(&mut self, slot: usize) {
        if let Some(free) = self.slots.get_mut(slot) {
            *free = false;
        }
    }

    /// Marks slots `first..=last` busy.
    pub fn block_through(&mut self, first: usize, last: usize) {
        for slot in first..=last {
            self.block(slot);
        }
    }

    /// Marks every slot busy and the resource off duty.
    pub fn block_all(&mut self) {
        self.slots.iter_mut().for_each(|free| *free = false);
        self.off_duty = true;
    }

    /// Whether the resource is on duty with every slot free.
    pub fn is_fully_open(&self) -> bool {
        !self.off_duty && self.slots.iter().all(|&free| free)
    }

    /// Number of free slots.
    pub fn free_count(&self) -> usize {
        if self.off_duty {
            return 0;
        }
        self.slots.iter().filter(|&&free| free).count()
    }

    /// Number of busy slots.
    pub fn booked_count(&self) -> usize {
        self.slots.len() - self.free_count()
    }
}

/// Parses an `HH:MM` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| PlannerError::InvalidTime(s.into()))
}

/// Formats a time of day as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}
