use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Slot identifier, 1-based and ordered by start time.
pub type SlotId = u8;

/// Every slot is two hours long.
pub const HOURS_PER_SLOT: u32 = 2;

/// Weekday limit on hours a single worker may cover in one day.
pub const WEEKDAY_HOUR_CAP: u32 = 6;

/// Upper bound for a slot's required headcount.
pub const MAX_REQUIRED_STAFF: u8 = 5;

/// Day of the scheduling week. The first five are weekdays and fall under the
/// daily cap and pattern rules; Saturday and Sunday are exempt.
///
/// Serializes as the full name and deserializes through `FromStr`, so
/// "tue" is read back the same as "Tuesday".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn is_weekend(self) -> bool {
        matches!(self, Day::Saturday | Day::Sunday)
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

/// Accepts full or abbreviated English names in any case ("mon", "Monday").
impl FromStr for Day {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Weekday>()
            .map(Day::from)
            .map_err(|_| ScheduleError::InvalidDay(s.to_string()))
    }
}

impl TryFrom<String> for Day {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A fixed two-hour slot shared by every day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A worker and their weekly hour budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub name: String,
    pub total_hours: u32,
    pub remaining_hours: u32,
}

impl Worker {
    pub fn new(name: impl Into<String>, total_hours: u32) -> Self {
        Worker {
            name: name.into(),
            total_hours,
            remaining_hours: total_hours,
        }
    }

    pub fn assigned_hours(&self) -> u32 {
        self.total_hours.saturating_sub(self.remaining_hours)
    }
}

/// Roster entry used to (re)build the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSeed {
    pub name: String,
    pub total_hours: u32,
}

impl WorkerSeed {
    pub fn new(name: impl Into<String>, total_hours: u32) -> Self {
        WorkerSeed {
            name: name.into(),
            total_hours,
        }
    }
}

/// Target headcount per slot id, applied identically to every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredStaff {
    counts: BTreeMap<SlotId, u8>,
}

impl RequiredStaff {
    pub fn new(counts: BTreeMap<SlotId, u8>) -> Self {
        RequiredStaff { counts }
    }

    /// Slots without an explicit target need nobody.
    pub fn get(&self, slot_id: SlotId) -> u8 {
        self.counts.get(&slot_id).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, slot_id: SlotId, count: u8) {
        self.counts.insert(slot_id, count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, u8)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }
}

impl Default for RequiredStaff {
    fn default() -> Self {
        RequiredStaff::new(BTreeMap::from([
            (1, 2),
            (2, 3),
            (3, 3),
            (4, 3),
            (5, 3),
            (6, 3),
            (7, 2),
        ]))
    }
}
