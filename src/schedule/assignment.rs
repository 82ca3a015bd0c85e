use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{Result, ScheduleError};
use super::auto_fill::{RandomSource, RngSource};
use super::registry::WorkerRegistry;
use super::rules::check_assign;
use super::slot_utils::SlotCatalog;
use super::stats::{self, SlotCoverage, WeekStats};
use super::store::{ScheduleStore, Snapshot, WeekSchedule};
use super::types::{Day, RequiredStaff, SlotId, TimeSlot, Worker, MAX_REQUIRED_STAFF};

/// The scheduling engine: owns the slot catalog, roster, live schedule and
/// settings, and is the only writer of the schedule and roster.
///
/// Every mutating operation validates against the current state first and
/// only then commits, so a returned error means nothing changed.
pub struct ScheduleEngine {
    pub(crate) catalog: SlotCatalog,
    pub(crate) registry: WorkerRegistry,
    pub(crate) store: ScheduleStore,
    pub(crate) required_staff: RequiredStaff,
    pub(crate) enforce_contiguity: bool,
    pub(crate) random: Box<dyn RandomSource + Send>,
}

impl ScheduleEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let catalog = SlotCatalog::default();
        for (slot_id, count) in config.required_staff.iter() {
            validate_required(&catalog, slot_id, u32::from(count))?;
        }
        let registry = WorkerRegistry::new(config.roster)?;
        let store = ScheduleStore::new(catalog.ids());
        let random: Box<dyn RandomSource + Send> = match config.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        };

        info!(
            workers = registry.len(),
            slots = catalog.len(),
            contiguity = config.contiguity,
            "Schedule engine initialized"
        );

        Ok(ScheduleEngine {
            catalog,
            registry,
            store,
            required_staff: config.required_staff,
            enforce_contiguity: config.contiguity,
            random,
        })
    }

    /// Replaces the jitter source used by auto-fill scoring.
    pub fn with_random_source(mut self, random: impl RandomSource + Send + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn list_slots(&self) -> &[TimeSlot] {
        self.catalog.slots()
    }

    pub fn list_workers(&self) -> &[Worker] {
        self.registry.workers()
    }

    pub fn worker_tiers(&self) -> Vec<(u32, Vec<&Worker>)> {
        self.registry.tiers()
    }

    pub fn schedule(&self) -> &WeekSchedule {
        self.store.schedule()
    }

    pub fn required_staff(&self, slot_id: SlotId) -> Result<u8> {
        self.catalog.require(slot_id)?;
        Ok(self.required_staff.get(slot_id))
    }

    pub fn required_staff_table(&self) -> &RequiredStaff {
        &self.required_staff
    }

    /// Changes the headcount target for `slot_id` on every day. Existing
    /// assignments are left alone even if the cell ends up over target.
    pub fn set_required_staff(&mut self, slot_id: SlotId, count: u32) -> Result<()> {
        validate_required(&self.catalog, slot_id, count)?;
        // validated above, fits in u8
        self.required_staff.set(slot_id, count as u8);
        info!(slot_id, count, "Required staff updated");
        Ok(())
    }

    pub fn contiguity(&self) -> bool {
        self.enforce_contiguity
    }

    /// Toggles the weekday pattern rule. Existing assignments are not re-checked.
    pub fn set_contiguity(&mut self, enabled: bool) {
        self.enforce_contiguity = enabled;
        info!(enabled, "Contiguity mode changed");
    }

    /// Places a worker into a cell, taking 2h from their balance.
    pub fn assign(&mut self, worker_name: &str, day: Day, slot_id: SlotId) -> Result<()> {
        self.catalog.require(slot_id)?;
        let worker = self.registry.require(worker_name)?;

        let daily_hours = self.store.daily_hours();
        let snapshot = Snapshot::new(self.store.schedule(), &daily_hours);
        if let Err(e) = check_assign(worker, day, slot_id, snapshot, self.enforce_contiguity) {
            debug!(worker = worker_name, %day, slot_id, kind = e.kind(), "Assignment rejected");
            return Err(e);
        }

        self.registry.debit(worker_name)?;
        self.store.schedule_mut().push(day, slot_id, worker_name);
        info!(worker = worker_name, %day, slot_id, "Worker assigned");
        Ok(())
    }

    /// Takes a worker out of a cell and returns their 2h. Removing someone
    /// who is not in the cell changes nothing and returns `Ok(false)`.
    pub fn remove(&mut self, worker_name: &str, day: Day, slot_id: SlotId) -> Result<bool> {
        self.catalog.require(slot_id)?;
        self.registry.require(worker_name)?;

        if !self.store.schedule_mut().remove(day, slot_id, worker_name) {
            debug!(worker = worker_name, %day, slot_id, "Nothing to remove");
            return Ok(false);
        }
        self.registry.credit(worker_name)?;
        info!(worker = worker_name, %day, slot_id, "Worker removed");
        Ok(true)
    }

    /// Empties one day, returning 2h per removed assignment.
    pub fn reset_day(&mut self, day: Day) -> Result<()> {
        let removed = self.store.schedule_mut().clear_day(day);
        for name in &removed {
            self.registry.credit(name)?;
        }
        info!(%day, removed = removed.len(), "Day reset");
        Ok(())
    }

    /// Clears the whole week and restores every worker's seeded capacity.
    pub fn reset_all(&mut self) {
        self.store.schedule_mut().clear_all();
        self.registry.reset();
        info!("Schedule and roster reset");
    }

    /// Changes a worker's weekly capacity, keeping already assigned hours.
    pub fn set_capacity(&mut self, worker_name: &str, total_hours: u32) -> Result<()> {
        self.registry.require(worker_name)?;
        let assigned = self.store.schedule().assigned_hours(worker_name);
        if total_hours < assigned {
            debug!(worker = worker_name, total_hours, assigned, "Capacity change rejected");
            return Err(ScheduleError::CapacityBelowAssigned {
                worker: worker_name.to_string(),
                requested: total_hours,
                assigned,
            });
        }

        let worker = self.registry.require_mut(worker_name)?;
        worker.total_hours = total_hours;
        worker.remaining_hours = total_hours - assigned;
        info!(worker = worker_name, total_hours, assigned, "Capacity updated");
        Ok(())
    }

    pub fn stats(&self) -> WeekStats {
        stats::compute_stats(self.store.schedule(), &self.registry)
    }

    pub fn coverage(&self) -> Vec<SlotCoverage> {
        stats::coverage(self.store.schedule(), &self.required_staff)
    }
}

fn validate_required(catalog: &SlotCatalog, slot_id: SlotId, count: u32) -> Result<()> {
    catalog.require(slot_id)?;
    if count > u32::from(MAX_REQUIRED_STAFF) {
        return Err(ScheduleError::InvalidRequiredStaff { slot_id, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{WorkerSeed, HOURS_PER_SLOT};

    fn engine() -> ScheduleEngine {
        let config = EngineConfig {
            roster: vec![
                WorkerSeed::new("Ana", 28),
                WorkerSeed::new("Ben", 8),
                WorkerSeed::new("Cho", 14),
            ],
            seed: Some(7),
            ..EngineConfig::default()
        };
        ScheduleEngine::new(config).unwrap()
    }

    fn remaining(engine: &ScheduleEngine, name: &str) -> u32 {
        engine.registry.require(name).unwrap().remaining_hours
    }

    fn assert_hours_conserved(engine: &ScheduleEngine) {
        for worker in engine.list_workers() {
            let assigned = engine.schedule().assigned_hours(&worker.name);
            assert_eq!(worker.remaining_hours, worker.total_hours - assigned, "{}", worker.name);
        }
    }

    #[test]
    fn test_assign_and_remove_move_two_hours() {
        let mut engine = engine();
        engine.assign("Ana", Day::Monday, 1).unwrap();
        engine.assign("Ana", Day::Monday, 2).unwrap();
        assert_eq!(remaining(&engine, "Ana"), 28 - 2 * HOURS_PER_SLOT);
        assert_eq!(engine.schedule().assigned(Day::Monday, 1), ["Ana"]);

        assert!(engine.remove("Ana", Day::Monday, 1).unwrap());
        assert_eq!(remaining(&engine, "Ana"), 26);
        assert_hours_conserved(&engine);
    }

    #[test]
    fn test_remove_absent_worker_is_noop() {
        let mut engine = engine();
        assert!(!engine.remove("Ben", Day::Tuesday, 3).unwrap());
        assert_eq!(remaining(&engine, "Ben"), 8);
        assert_hours_conserved(&engine);
    }

    #[test]
    fn test_failed_assign_leaves_state_untouched() {
        let mut engine = engine();
        engine.assign("Ana", Day::Monday, 2).unwrap();
        let before_schedule = engine.schedule().clone();
        let before_workers = engine.list_workers().to_vec();

        let err = engine.assign("Ana", Day::Monday, 2).unwrap_err();
        assert_eq!(err.kind(), "DuplicateAssignment");
        let err = engine.assign("Ana", Day::Monday, 5).unwrap_err();
        assert_eq!(err.kind(), "PatternViolation");

        assert_eq!(engine.schedule(), &before_schedule);
        assert_eq!(engine.list_workers(), before_workers.as_slice());
    }

    #[test]
    fn test_error_kinds_reported() {
        let mut engine = engine();
        for slot in 1..=4 {
            engine.assign("Ben", Day::Saturday, slot).unwrap();
        }
        assert!(matches!(
            engine.assign("Ben", Day::Sunday, 1),
            Err(ScheduleError::InsufficientHours { remaining: 0, .. })
        ));

        engine.set_contiguity(false);
        for slot in [1, 3, 5] {
            engine.assign("Ana", Day::Friday, slot).unwrap();
        }
        assert!(matches!(
            engine.assign("Ana", Day::Friday, 7),
            Err(ScheduleError::DailyCapExceeded { .. })
        ));

        assert_eq!(
            engine.assign("Zed", Day::Friday, 1),
            Err(ScheduleError::UnknownWorker("Zed".to_string()))
        );
        assert_eq!(engine.assign("Ana", Day::Friday, 8), Err(ScheduleError::UnknownSlot(8)));
    }

    #[test]
    fn test_weekend_accepts_full_day() {
        for contiguity in [true, false] {
            let mut engine = engine();
            engine.set_contiguity(contiguity);
            for slot in 1..=7 {
                engine.assign("Ana", Day::Sunday, slot).unwrap();
            }
            assert_eq!(remaining(&engine, "Ana"), 14);
        }
    }

    #[test]
    fn test_contiguity_toggle_does_not_revalidate() {
        let mut engine = engine();
        engine.set_contiguity(false);
        engine.assign("Cho", Day::Monday, 1).unwrap();
        engine.assign("Cho", Day::Monday, 4).unwrap();
        engine.set_contiguity(true);

        assert_eq!(engine.schedule().assigned_slots(Day::Monday, "Cho"), vec![1, 4]);
        assert!(engine.contiguity());
    }

    #[test]
    fn test_reset_day_returns_hours() {
        let mut engine = engine();
        engine.assign("Ana", Day::Monday, 1).unwrap();
        engine.assign("Ana", Day::Monday, 2).unwrap();
        engine.assign("Ben", Day::Monday, 2).unwrap();
        engine.assign("Ana", Day::Tuesday, 6).unwrap();
        engine.assign("Cho", Day::Wednesday, 1).unwrap();

        engine.reset_day(Day::Monday).unwrap();

        assert_eq!(remaining(&engine, "Ana"), 26);
        assert_eq!(remaining(&engine, "Ben"), 8);
        assert_eq!(remaining(&engine, "Cho"), 12);
        assert!(engine.schedule().day(Day::Monday).all(|(_, n)| n.is_empty()));
        assert_eq!(engine.schedule().assigned(Day::Tuesday, 6), ["Ana"]);
        assert_eq!(engine.required_staff(2).unwrap(), 3);
        assert_hours_conserved(&engine);
    }

    #[test]
    fn test_reset_all_restores_seed_capacity() {
        let mut engine = engine();
        engine.set_capacity("Cho", 20).unwrap();
        engine.assign("Cho", Day::Thursday, 3).unwrap();

        engine.reset_all();

        let cho = engine.registry.require("Cho").unwrap();
        assert_eq!((cho.total_hours, cho.remaining_hours), (14, 14));
        assert!(engine.schedule().cells().all(|(_, _, n)| n.is_empty()));
    }

    #[test]
    fn test_capacity_guard() {
        let mut engine = engine();
        engine.assign("Ben", Day::Monday, 1).unwrap();
        engine.assign("Ben", Day::Monday, 2).unwrap();

        assert_eq!(
            engine.set_capacity("Ben", 2),
            Err(ScheduleError::CapacityBelowAssigned {
                worker: "Ben".to_string(),
                requested: 2,
                assigned: 4
            })
        );
        let ben = engine.registry.require("Ben").unwrap();
        assert_eq!((ben.total_hours, ben.remaining_hours), (8, 4));

        engine.set_capacity("Ben", 4).unwrap();
        let ben = engine.registry.require("Ben").unwrap();
        assert_eq!((ben.total_hours, ben.remaining_hours), (4, 0));

        engine.set_capacity("Ben", 12).unwrap();
        assert_eq!(remaining(&engine, "Ben"), 8);
        assert_hours_conserved(&engine);
    }

    #[test]
    fn test_required_staff_bounds() {
        let mut engine = engine();
        engine.set_required_staff(3, 5).unwrap();
        assert_eq!(engine.required_staff(3).unwrap(), 5);
        assert_eq!(
            engine.set_required_staff(3, 6),
            Err(ScheduleError::InvalidRequiredStaff { slot_id: 3, count: 6 })
        );
        assert_eq!(engine.set_required_staff(9, 1), Err(ScheduleError::UnknownSlot(9)));
        assert_eq!(engine.required_staff(3).unwrap(), 5);
    }

    #[test]
    fn test_hour_conservation_over_mixed_operations() {
        let mut engine = engine();
        let ops: [(&str, Day, SlotId, bool); 10] = [
            ("Ana", Day::Monday, 3, true),
            ("Ana", Day::Monday, 4, true),
            ("Ben", Day::Monday, 4, true),
            ("Ana", Day::Monday, 6, true),
            ("Ana", Day::Monday, 4, false),
            ("Cho", Day::Saturday, 1, true),
            ("Cho", Day::Saturday, 2, true),
            ("Ben", Day::Monday, 4, false),
            ("Ben", Day::Monday, 4, false),
            ("Ana", Day::Tuesday, 1, true),
        ];
        for (name, day, slot, add) in ops {
            if add {
                let _ = engine.assign(name, day, slot);
            } else {
                engine.remove(name, day, slot).unwrap();
            }
            assert_hours_conserved(&engine);
        }
    }
}
