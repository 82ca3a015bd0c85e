pub mod types;
pub mod slot_utils;
pub mod registry;
pub mod store;
pub mod rules;
pub mod assignment;
pub mod auto_fill;
pub mod stats;

pub use types::{Day, RequiredStaff, SlotId, TimeSlot, Worker, WorkerSeed};
pub use slot_utils::{slot_label, SlotCatalog};
pub use registry::WorkerRegistry;
pub use store::{DailyHours, ScheduleStore, Snapshot, WeekSchedule};
pub use rules::{can_assign, check_assign, is_weekday_pattern_valid};
pub use assignment::ScheduleEngine;
pub use auto_fill::{AutoFillReport, Placement, RandomSource, RngSource, Shortfall};
pub use stats::{SlotCoverage, Staffing, WeekStats, WorkerStats};
