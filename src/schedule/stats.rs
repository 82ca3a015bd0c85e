use std::collections::BTreeMap;

use serde::Serialize;

use super::registry::WorkerRegistry;
use super::store::WeekSchedule;
use super::types::{Day, RequiredStaff, SlotId, HOURS_PER_SLOT};

/// Per-worker totals derived from the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerStats {
    pub name: String,
    pub daily_hours: BTreeMap<Day, u32>,
    pub total_assigned: u32,
    pub remaining_hours: u32,
    pub total_hours: u32,
    /// Share of capacity in use, 0-100. Zero when the worker has no capacity.
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    pub workers: Vec<WorkerStats>,
    /// Hours assigned across all workers, one entry per day of the week.
    pub daily_totals: BTreeMap<Day, u32>,
    pub total_assigned_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Staffing {
    Understaffed,
    Staffed,
    Overstaffed,
}

/// Headcount of one cell against its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCoverage {
    pub day: Day,
    pub slot_id: SlotId,
    pub assigned: usize,
    pub required: u8,
    pub staffing: Staffing,
}

pub fn usage_percent(total_hours: u32, remaining_hours: u32) -> f64 {
    if total_hours == 0 {
        return 0.0;
    }
    let used = total_hours.saturating_sub(remaining_hours);
    f64::from(used) / f64::from(total_hours) * 100.0
}

/// Projects per-worker totals, in roster order. Days without hours are omitted
/// from `daily_hours`.
pub fn compute_stats(schedule: &WeekSchedule, registry: &WorkerRegistry) -> WeekStats {
    let mut daily: BTreeMap<&str, BTreeMap<Day, u32>> = BTreeMap::new();
    let mut daily_totals: BTreeMap<Day, u32> = Day::ALL.into_iter().map(|d| (d, 0)).collect();
    for (day, _, names) in schedule.cells() {
        *daily_totals.entry(day).or_insert(0) += HOURS_PER_SLOT * names.len() as u32;
        for name in names {
            *daily.entry(name.as_str()).or_default().entry(day).or_insert(0) += HOURS_PER_SLOT;
        }
    }

    let workers: Vec<WorkerStats> = registry
        .workers()
        .iter()
        .map(|w| {
            let daily_hours = daily.remove(w.name.as_str()).unwrap_or_default();
            WorkerStats {
                name: w.name.clone(),
                total_assigned: daily_hours.values().sum(),
                daily_hours,
                remaining_hours: w.remaining_hours,
                total_hours: w.total_hours,
                usage_percent: usage_percent(w.total_hours, w.remaining_hours),
            }
        })
        .collect();

    let total_assigned_hours = workers.iter().map(|w| w.total_assigned).sum();
    WeekStats {
        workers,
        daily_totals,
        total_assigned_hours,
    }
}

/// Every cell of the week with its staffing status.
pub fn coverage(schedule: &WeekSchedule, required_staff: &RequiredStaff) -> Vec<SlotCoverage> {
    schedule
        .cells()
        .map(|(day, slot_id, names)| {
            let required = required_staff.get(slot_id);
            let assigned = names.len();
            let staffing = match assigned.cmp(&usize::from(required)) {
                std::cmp::Ordering::Less => Staffing::Understaffed,
                std::cmp::Ordering::Equal => Staffing::Staffed,
                std::cmp::Ordering::Greater => Staffing::Overstaffed,
            };
            SlotCoverage {
                day,
                slot_id,
                assigned,
                required,
                staffing,
            }
        })
        .collect()
}
