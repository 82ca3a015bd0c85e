use chrono::{Duration, NaiveTime};

use crate::error::{Result, ScheduleError};
use super::types::{SlotId, TimeSlot, HOURS_PER_SLOT};

/// Number of slots in every day of the default catalog.
pub const SLOTS_PER_DAY: u8 = 7;

/// Static catalog of the day's time slots. The same catalog applies to all days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
}

impl SlotCatalog {
    /// Builds `count` back-to-back two-hour slots starting at `first_start`.
    /// Slot 1 = first_start, slot n = first_start + 2h * (n - 1).
    pub fn new(first_start: NaiveTime, count: u8) -> Self {
        let step = Duration::hours(i64::from(HOURS_PER_SLOT));
        let mut slots = Vec::with_capacity(usize::from(count));
        let mut start = first_start;
        for id in 1..=count {
            let end = start + step;
            slots.push(TimeSlot { id, start, end });
            start = end;
        }
        SlotCatalog { slots }
    }

    /// Ordered by start time.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.iter().map(|s| s.id)
    }

    pub fn get(&self, slot_id: SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub fn require(&self, slot_id: SlotId) -> Result<&TimeSlot> {
        self.get(slot_id).ok_or(ScheduleError::UnknownSlot(slot_id))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for SlotCatalog {
    /// 07:00-09:00 through 19:00-21:00.
    fn default() -> Self {
        let first = NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default();
        SlotCatalog::new(first, SLOTS_PER_DAY)
    }
}

/// Formats a slot as "HH:MM-HH:MM" for display
pub fn slot_label(slot: &TimeSlot) -> String {
    format!("{}-{}", slot.start.format("%H:%M"), slot.end.format("%H:%M"))
}

/// Formats a time as HH:MM
pub fn time_string(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
