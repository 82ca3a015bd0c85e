//! Rules deciding whether a worker may take a slot.
//!
//! Weekdays cap a worker at 6h (three slots). With contiguity enforced those
//! hours must form one run of 2h or 4h, or a 4h run and a 2h run separated by
//! at least one free slot. Weekends only check remaining hours and duplicates.

use crate::error::{Result, ScheduleError};
use super::store::Snapshot;
use super::types::{Day, SlotId, Worker, HOURS_PER_SLOT, WEEKDAY_HOUR_CAP};

/// Checks whether an ascending list of slot ids is an allowed weekday shape.
pub fn is_weekday_pattern_valid(ordered_slots: &[SlotId]) -> bool {
    // widened so ids near u8::MAX cannot overflow
    let wide: Vec<u16> = ordered_slots.iter().map(|&id| u16::from(id)).collect();
    match wide[..] {
        [] | [_] => true,
        [x, y] => y == x + 1,
        [a, b, c] => {
            // 4h together, break, then 2h
            let long_first = b == a + 1 && c >= b + 2;
            // 2h, break, then 4h together
            let long_last = c == b + 1 && a + 2 <= b;
            long_first || long_last
        }
        _ => false,
    }
}

/// Validates one placement against the snapshot, reporting the first rule
/// that fails. Order: hours, duplicate, weekend exemption, daily cap, pattern.
pub fn check_assign(
    worker: &Worker,
    day: Day,
    slot_id: SlotId,
    snapshot: Snapshot<'_>,
    enforce_contiguity: bool,
) -> Result<()> {
    if worker.remaining_hours < HOURS_PER_SLOT {
        return Err(ScheduleError::InsufficientHours {
            worker: worker.name.clone(),
            remaining: worker.remaining_hours,
        });
    }

    if snapshot.schedule.is_assigned(day, slot_id, &worker.name) {
        return Err(ScheduleError::DuplicateAssignment {
            worker: worker.name.clone(),
            day,
            slot_id,
        });
    }

    if day.is_weekend() {
        return Ok(());
    }

    if snapshot.daily_hours.get(day, &worker.name) >= WEEKDAY_HOUR_CAP {
        return Err(ScheduleError::DailyCapExceeded {
            worker: worker.name.clone(),
            day,
        });
    }

    if !enforce_contiguity {
        return Ok(());
    }

    let mut slots = snapshot.schedule.assigned_slots(day, &worker.name);
    slots.push(slot_id);
    slots.sort_unstable();
    if is_weekday_pattern_valid(&slots) {
        Ok(())
    } else {
        Err(ScheduleError::PatternViolation {
            worker: worker.name.clone(),
            day,
            slot_id,
        })
    }
}

/// Boolean form of [`check_assign`], used when filtering candidates.
pub fn can_assign(
    worker: &Worker,
    day: Day,
    slot_id: SlotId,
    snapshot: Snapshot<'_>,
    enforce_contiguity: bool,
) -> bool {
    check_assign(worker, day, slot_id, snapshot, enforce_contiguity).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::store::{DailyHours, WeekSchedule};

    fn schedule_with(day: Day, worker: &str, slots: &[SlotId]) -> WeekSchedule {
        let mut schedule = WeekSchedule::new(1..=7);
        for &slot in slots {
            schedule.push(day, slot, worker);
        }
        schedule
    }

    fn check(worker: &Worker, day: Day, slot: SlotId, schedule: &WeekSchedule, contiguity: bool) -> Result<()> {
        let daily = DailyHours::from_schedule(schedule);
        check_assign(worker, day, slot, Snapshot::new(schedule, &daily), contiguity)
    }

    #[test]
    fn test_pattern_examples() {
        assert!(is_weekday_pattern_valid(&[]));
        assert!(is_weekday_pattern_valid(&[4]));
        assert!(is_weekday_pattern_valid(&[1, 2]));
        assert!(!is_weekday_pattern_valid(&[1, 3]));
        assert!(!is_weekday_pattern_valid(&[2, 5]));
        assert!(is_weekday_pattern_valid(&[1, 2, 4]));
        assert!(is_weekday_pattern_valid(&[1, 2, 7]));
        assert!(is_weekday_pattern_valid(&[1, 3, 4]));
        assert!(is_weekday_pattern_valid(&[2, 6, 7]));
        assert!(!is_weekday_pattern_valid(&[1, 2, 3]));
        assert!(!is_weekday_pattern_valid(&[1, 3, 5]));
        assert!(!is_weekday_pattern_valid(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_pattern_at_top_of_id_range() {
        assert!(is_weekday_pattern_valid(&[254, 255]));
        assert!(!is_weekday_pattern_valid(&[253, 255]));
        assert!(!is_weekday_pattern_valid(&[253, 254, 255]));
        assert!(is_weekday_pattern_valid(&[251, 252, 254]));
        assert!(is_weekday_pattern_valid(&[250, 254, 255]));
    }

    #[test]
    fn test_insufficient_hours_checked_first() {
        let mut worker = Worker::new("Ana", 8);
        worker.remaining_hours = 1;
        let schedule = schedule_with(Day::Monday, "Ana", &[3]);
        assert_eq!(
            check(&worker, Day::Monday, 3, &schedule, true),
            Err(ScheduleError::InsufficientHours { worker: "Ana".into(), remaining: 1 })
        );
    }

    #[test]
    fn test_duplicate_assignment() {
        let worker = Worker::new("Ana", 28);
        let schedule = schedule_with(Day::Sunday, "Ana", &[3]);
        assert_eq!(
            check(&worker, Day::Sunday, 3, &schedule, false),
            Err(ScheduleError::DuplicateAssignment { worker: "Ana".into(), day: Day::Sunday, slot_id: 3 })
        );
    }

    #[test]
    fn test_daily_cap_applies_without_contiguity() {
        let worker = Worker::new("Ana", 28);
        let schedule = schedule_with(Day::Wednesday, "Ana", &[1, 3, 5]);
        assert_eq!(
            check(&worker, Day::Wednesday, 7, &schedule, false),
            Err(ScheduleError::DailyCapExceeded { worker: "Ana".into(), day: Day::Wednesday })
        );
        assert!(check(&worker, Day::Thursday, 7, &schedule, false).is_ok());
    }

    #[test]
    fn test_pattern_only_when_enforced() {
        let worker = Worker::new("Ana", 28);
        let schedule = schedule_with(Day::Monday, "Ana", &[2]);
        assert_eq!(
            check(&worker, Day::Monday, 5, &schedule, true),
            Err(ScheduleError::PatternViolation { worker: "Ana".into(), day: Day::Monday, slot_id: 5 })
        );
        assert!(check(&worker, Day::Monday, 5, &schedule, false).is_ok());
        assert!(check(&worker, Day::Monday, 3, &schedule, true).is_ok());
    }

    #[test]
    fn test_weekend_exempt_from_cap_and_pattern() {
        let worker = Worker::new("Ana", 28);
        let schedule = schedule_with(Day::Saturday, "Ana", &[1, 2, 3, 4, 5, 6]);
        assert!(check(&worker, Day::Saturday, 7, &schedule, true).is_ok());
        assert!(check(&worker, Day::Saturday, 7, &schedule, false).is_ok());
    }
}
