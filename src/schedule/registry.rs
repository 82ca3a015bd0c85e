use std::collections::HashSet;

use crate::error::{Result, ScheduleError};
use super::types::{Worker, WorkerSeed, HOURS_PER_SLOT};

/// Holds every worker's capacity and remaining-hours balance.
///
/// Workers are never removed during a session; the roster the registry was
/// built from is kept so [`WorkerRegistry::reset`] can restore it.
#[derive(Debug, Clone)]
pub struct WorkerRegistry {
    seed: Vec<WorkerSeed>,
    workers: Vec<Worker>,
}

impl WorkerRegistry {
    pub fn new(seed: Vec<WorkerSeed>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &seed {
            if !seen.insert(entry.name.as_str()) {
                return Err(ScheduleError::DuplicateWorker(entry.name.clone()));
            }
        }
        let workers = seed
            .iter()
            .map(|s| Worker::new(s.name.clone(), s.total_hours))
            .collect();
        Ok(WorkerRegistry { seed, workers })
    }

    /// Workers in roster order.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn get(&self, name: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Worker> {
        self.get(name)
            .ok_or_else(|| ScheduleError::UnknownWorker(name.to_string()))
    }

    pub(crate) fn require_mut(&mut self, name: &str) -> Result<&mut Worker> {
        self.workers
            .iter_mut()
            .find(|w| w.name == name)
            .ok_or_else(|| ScheduleError::UnknownWorker(name.to_string()))
    }

    /// Takes one slot's worth of hours from the worker.
    pub(crate) fn debit(&mut self, name: &str) -> Result<()> {
        let worker = self.require_mut(name)?;
        worker.remaining_hours = worker.remaining_hours.saturating_sub(HOURS_PER_SLOT);
        Ok(())
    }

    /// Returns one slot's worth of hours, never past the worker's total.
    pub(crate) fn credit(&mut self, name: &str) -> Result<()> {
        let worker = self.require_mut(name)?;
        worker.remaining_hours = (worker.remaining_hours + HOURS_PER_SLOT).min(worker.total_hours);
        Ok(())
    }

    pub(crate) fn replace_workers(&mut self, workers: Vec<Worker>) {
        self.workers = workers;
    }

    /// Restores every worker to the capacity they were seeded with.
    pub fn reset(&mut self) {
        self.workers = self
            .seed
            .iter()
            .map(|s| Worker::new(s.name.clone(), s.total_hours))
            .collect();
    }

    /// Groups workers by `total_hours`, largest capacity first.
    /// Recomputed on every call; tiers are a display grouping only.
    pub fn tiers(&self) -> Vec<(u32, Vec<&Worker>)> {
        let mut hours: Vec<u32> = self.workers.iter().map(|w| w.total_hours).collect();
        hours.sort_unstable_by(|a, b| b.cmp(a));
        hours.dedup();

        hours
            .into_iter()
            .map(|tier| {
                let members = self.workers.iter().filter(|w| w.total_hours == tier).collect();
                (tier, members)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
