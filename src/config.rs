use serde::{Deserialize, Serialize};

use crate::schedule::types::{RequiredStaff, WorkerSeed};

/// Startup settings for a [`crate::ScheduleEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Roster the registry is seeded with and restored to on a full reset.
    pub roster: Vec<WorkerSeed>,
    pub required_staff: RequiredStaff,
    /// Whether the weekday pattern rule is enforced.
    pub contiguity: bool,
    /// Fixed seed for auto-fill jitter; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            roster: default_roster(),
            required_staff: RequiredStaff::default(),
            contiguity: true,
            seed: None,
        }
    }
}

/// The built-in roster: seven full-time workers, one half-time, three at 8h.
pub fn default_roster() -> Vec<WorkerSeed> {
    [
        ("Sukyung", 28),
        ("Yunjae", 28),
        ("Eunseo", 28),
        ("Suhee", 28),
        ("Youngjung", 28),
        ("Byungchul", 28),
        ("Jieun", 28),
        ("Junhyuk", 14),
        ("Kihwan", 8),
        ("Byungtaek", 8),
        ("Jaesun", 8),
    ]
    .into_iter()
    .map(|(name, hours)| WorkerSeed::new(name, hours))
    .collect()
}
