use thiserror::Error;

use crate::schedule::types::{Day, SlotId};

/// Errors raised by the assignment and configuration operations.
///
/// Every variant is reported before any state is touched, so a caller that
/// receives one can assume the schedule and roster are exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{worker} has only {remaining}h remaining")]
    InsufficientHours { worker: String, remaining: u32 },

    #[error("{worker} is already assigned to {day} slot {slot_id}")]
    DuplicateAssignment { worker: String, day: Day, slot_id: SlotId },

    #[error("{worker} already works the 6h weekday maximum on {day}")]
    DailyCapExceeded { worker: String, day: Day },

    #[error("slot {slot_id} breaks the weekday pattern for {worker} on {day} (4h together, 6h as 4+break+2 or 2+break+4)")]
    PatternViolation { worker: String, day: Day, slot_id: SlotId },

    #[error("{worker} already has {assigned}h assigned, cannot lower capacity to {requested}h")]
    CapacityBelowAssigned { worker: String, requested: u32, assigned: u32 },

    #[error("Unknown worker: {0}")]
    UnknownWorker(String),

    #[error("Unknown slot: {0}")]
    UnknownSlot(SlotId),

    #[error("Required staff for slot {slot_id} must be 0-5, got {count}")]
    InvalidRequiredStaff { slot_id: SlotId, count: u32 },

    #[error("Worker listed twice in roster: {0}")]
    DuplicateWorker(String),

    #[error("Invalid day: {0}")]
    InvalidDay(String),
}

impl ScheduleError {
    /// Stable identifier for the error kind, used in logs and JSON bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::InsufficientHours { .. } => "InsufficientHours",
            ScheduleError::DuplicateAssignment { .. } => "DuplicateAssignment",
            ScheduleError::DailyCapExceeded { .. } => "DailyCapExceeded",
            ScheduleError::PatternViolation { .. } => "PatternViolation",
            ScheduleError::CapacityBelowAssigned { .. } => "CapacityBelowAssigned",
            ScheduleError::UnknownWorker(_) => "UnknownWorker",
            ScheduleError::UnknownSlot(_) => "UnknownSlot",
            ScheduleError::InvalidRequiredStaff { .. } => "InvalidRequiredStaff",
            ScheduleError::DuplicateWorker(_) => "DuplicateWorker",
            ScheduleError::InvalidDay(_) => "InvalidDay",
        }
    }

    /// True for lookups of things that do not exist (as opposed to rule failures).
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScheduleError::UnknownWorker(_) | ScheduleError::UnknownSlot(_))
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
