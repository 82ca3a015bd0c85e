use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use super::assignment::ScheduleEngine;
use super::rules::can_assign;
use super::store::{DailyHours, Snapshot, WeekSchedule};
use super::types::{Day, SlotId, Worker, HOURS_PER_SLOT};

/// Score bonus for a candidate already holding a neighbouring slot that day.
pub const ADJACENT_BONUS: f64 = 0.6;

/// Source of the jitter added to candidate scores. Values must lie in [0, 1).
pub trait RandomSource {
    fn jitter(&mut self) -> f64;
}

/// Adapts any `rand` generator into a [`RandomSource`].
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RngSource::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn jitter(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// A worker placed by auto-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub day: Day,
    pub slot_id: SlotId,
    pub worker: String,
}

/// A weekday cell still under target after auto-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    pub day: Day,
    pub slot_id: SlotId,
    pub required: u8,
    pub assigned: usize,
}

/// What one auto-fill pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoFillReport {
    pub added: Vec<Placement>,
    pub shortfalls: Vec<Shortfall>,
}

impl ScheduleEngine {
    /// Fills weekday shortfalls without touching existing assignments.
    ///
    /// Works on a private copy of the schedule and roster and swaps both in
    /// at the end. Cells nobody can legally take stay under target and are
    /// listed in the report; that is not an error. Weekends are left as is.
    ///
    /// Candidates are ranked by remaining hours plus jitter, with
    /// [`ADJACENT_BONUS`] for a neighbouring slot when contiguity is on.
    /// Equal scores go to the alphabetically first name.
    ///
    /// Slots are visited in ascending order within a day, and a shortfall is
    /// not revisited in the same pass. A pick made later that day can make an
    /// earlier short slot legal for someone (2h at slot 3 is only allowed
    /// once the same worker holds 5 and 6), so a second call may still add
    /// workers. When no such pick happened, a second call adds nothing.
    pub fn auto_fill(&mut self) -> AutoFillReport {
        let mut schedule = self.store.schedule().clone();
        let mut workers = rebalanced_workers(self.registry.workers(), &schedule);
        let mut daily_hours = DailyHours::from_schedule(&schedule);
        let mut report = AutoFillReport::default();

        for day in Day::WEEKDAYS {
            for slot_id in self.catalog.ids() {
                let required = self.required_staff.get(slot_id);
                let need = usize::from(required).saturating_sub(schedule.assigned(day, slot_id).len());

                for _ in 0..need {
                    let picked = pick_candidate(
                        &workers,
                        day,
                        slot_id,
                        Snapshot::new(&schedule, &daily_hours),
                        self.enforce_contiguity,
                        self.random.as_mut(),
                    );
                    let Some(index) = picked else {
                        break;
                    };

                    let worker = &mut workers[index];
                    worker.remaining_hours -= HOURS_PER_SLOT;
                    daily_hours.add(day, &worker.name, HOURS_PER_SLOT);
                    schedule.push(day, slot_id, &worker.name);
                    report.added.push(Placement {
                        day,
                        slot_id,
                        worker: worker.name.clone(),
                    });
                }

                let assigned = schedule.assigned(day, slot_id).len();
                if assigned < usize::from(required) {
                    warn!(%day, slot_id, required, assigned, "Slot left under target");
                    report.shortfalls.push(Shortfall {
                        day,
                        slot_id,
                        required,
                        assigned,
                    });
                }
            }
        }

        self.store.replace(schedule);
        self.registry.replace_workers(workers);

        info!(
            added = report.added.len(),
            shortfalls = report.shortfalls.len(),
            "Auto-fill finished"
        );
        report
    }
}

/// Copies the roster with remaining hours derived from the committed schedule.
fn rebalanced_workers(workers: &[Worker], schedule: &WeekSchedule) -> Vec<Worker> {
    workers
        .iter()
        .map(|w| Worker {
            name: w.name.clone(),
            total_hours: w.total_hours,
            remaining_hours: w.total_hours.saturating_sub(schedule.assigned_hours(&w.name)),
        })
        .collect()
}

/// Index of the best-scoring worker allowed to take the cell, if any.
/// Draws one jitter value per eligible worker, in roster order.
fn pick_candidate(
    workers: &[Worker],
    day: Day,
    slot_id: SlotId,
    snapshot: Snapshot<'_>,
    enforce_contiguity: bool,
    random: &mut dyn RandomSource,
) -> Option<usize> {
    let mut scored: Vec<(f64, usize)> = workers
        .iter()
        .enumerate()
        .filter(|(_, w)| can_assign(w, day, slot_id, snapshot, enforce_contiguity))
        .map(|(index, w)| {
            let mut score = f64::from(w.remaining_hours) + random.jitter();
            if enforce_contiguity && has_adjacent(snapshot.schedule, day, slot_id, &w.name) {
                score += ADJACENT_BONUS;
            }
            (score, index)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| workers[a.1].name.cmp(&workers[b.1].name))
    });
    scored.first().map(|&(_, index)| index)
}

fn has_adjacent(schedule: &WeekSchedule, day: Day, slot_id: SlotId, worker: &str) -> bool {
    schedule
        .assigned_slots(day, worker)
        .iter()
        .any(|&id| id.abs_diff(slot_id) == 1)
}
