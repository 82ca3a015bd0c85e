use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::types::{Day, SlotId, HOURS_PER_SLOT};

/// Day x slot x assigned worker names. Names within a cell keep insertion
/// order and never repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSchedule {
    days: BTreeMap<Day, BTreeMap<SlotId, Vec<String>>>,
}

impl WeekSchedule {
    /// Empty schedule with one cell per (day, slot id).
    pub fn new(slot_ids: impl IntoIterator<Item = SlotId>) -> Self {
        let empty_day: BTreeMap<SlotId, Vec<String>> =
            slot_ids.into_iter().map(|id| (id, Vec::new())).collect();
        let days = Day::ALL.into_iter().map(|d| (d, empty_day.clone())).collect();
        WeekSchedule { days }
    }

    pub fn assigned(&self, day: Day, slot_id: SlotId) -> &[String] {
        self.days
            .get(&day)
            .and_then(|slots| slots.get(&slot_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_assigned(&self, day: Day, slot_id: SlotId, worker: &str) -> bool {
        self.assigned(day, slot_id).iter().any(|n| n == worker)
    }

    /// Cells of one day in slot order.
    pub fn day(&self, day: Day) -> impl Iterator<Item = (SlotId, &[String])> + '_ {
        self.days
            .get(&day)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|(&id, names)| (id, names.as_slice())))
    }

    /// Every cell of the week, Monday first.
    pub fn cells(&self) -> impl Iterator<Item = (Day, SlotId, &[String])> + '_ {
        self.days.iter().flat_map(|(&day, slots)| {
            slots.iter().map(move |(&id, names)| (day, id, names.as_slice()))
        })
    }

    /// Slot ids the worker holds on `day`, ascending.
    pub fn assigned_slots(&self, day: Day, worker: &str) -> Vec<SlotId> {
        self.day(day)
            .filter(|(_, names)| names.iter().any(|n| n == worker))
            .map(|(id, _)| id)
            .collect()
    }

    /// Hours the worker holds across the whole week.
    pub fn assigned_hours(&self, worker: &str) -> u32 {
        let count = self
            .cells()
            .filter(|(_, _, names)| names.iter().any(|n| n == worker))
            .count() as u32;
        count * HOURS_PER_SLOT
    }

    /// Appends the worker to a cell. Returns false when already present.
    pub(crate) fn push(&mut self, day: Day, slot_id: SlotId, worker: &str) -> bool {
        let names = self
            .days
            .entry(day)
            .or_default()
            .entry(slot_id)
            .or_default();
        if names.iter().any(|n| n == worker) {
            return false;
        }
        names.push(worker.to_string());
        true
    }

    /// Removes the worker from a cell. Returns false when they were not there.
    pub(crate) fn remove(&mut self, day: Day, slot_id: SlotId, worker: &str) -> bool {
        let Some(names) = self.days.get_mut(&day).and_then(|s| s.get_mut(&slot_id)) else {
            return false;
        };
        let before = names.len();
        names.retain(|n| n != worker);
        names.len() != before
    }

    /// Empties every cell of `day`, returning the names removed (one per assignment).
    pub(crate) fn clear_day(&mut self, day: Day) -> Vec<String> {
        let mut removed = Vec::new();
        if let Some(slots) = self.days.get_mut(&day) {
            for names in slots.values_mut() {
                removed.append(names);
            }
        }
        removed
    }

    pub(crate) fn clear_all(&mut self) {
        for day in Day::ALL {
            self.clear_day(day);
        }
    }
}

/// Hours each worker already covers per day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyHours {
    hours: HashMap<Day, HashMap<String, u32>>,
}

impl DailyHours {
    pub fn from_schedule(schedule: &WeekSchedule) -> Self {
        let mut daily = DailyHours::default();
        for (day, _, names) in schedule.cells() {
            for name in names {
                daily.add(day, name, HOURS_PER_SLOT);
            }
        }
        daily
    }

    pub fn get(&self, day: Day, worker: &str) -> u32 {
        self.hours
            .get(&day)
            .and_then(|m| m.get(worker))
            .copied()
            .unwrap_or(0)
    }

    pub fn add(&mut self, day: Day, worker: &str, hours: u32) {
        *self
            .hours
            .entry(day)
            .or_default()
            .entry(worker.to_string())
            .or_insert(0) += hours;
    }
}

/// Read-only view of a schedule and its daily hours, handed to the validator.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub schedule: &'a WeekSchedule,
    pub daily_hours: &'a DailyHours,
}

impl<'a> Snapshot<'a> {
    pub fn new(schedule: &'a WeekSchedule, daily_hours: &'a DailyHours) -> Self {
        Snapshot { schedule, daily_hours }
    }
}

/// Owner of the live week schedule.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    schedule: WeekSchedule,
}

impl ScheduleStore {
    pub fn new(slot_ids: impl IntoIterator<Item = SlotId>) -> Self {
        ScheduleStore {
            schedule: WeekSchedule::new(slot_ids),
        }
    }

    pub fn schedule(&self) -> &WeekSchedule {
        &self.schedule
    }

    pub(crate) fn schedule_mut(&mut self) -> &mut WeekSchedule {
        &mut self.schedule
    }

    /// Swaps in a fully built schedule in one step.
    pub(crate) fn replace(&mut self, schedule: WeekSchedule) {
        self.schedule = schedule;
    }

    pub fn daily_hours(&self) -> DailyHours {
        DailyHours::from_schedule(&self.schedule)
    }
}
