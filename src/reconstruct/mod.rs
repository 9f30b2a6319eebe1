//! Reconstruction of a recurring job's firing history.
//!
//! Given a schedule, the last recorded fire (or the creation time) and the
//! current time, work out how many fires were missed and which one is the
//! most recent, without stepping through every missed fire.

use crate::schedule::Schedule;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Padding, in milliseconds, added to every computed wake-up so the caller
/// never wakes fractionally before the fire instant under NTP skew.
pub const NEXT_SCHEDULE_DELTA_MS: i64 = 100;

pub fn next_schedule_delta() -> TimeDelta {
    TimeDelta::milliseconds(NEXT_SCHEDULE_DELTA_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructionInput {
    pub creation_time: DateTime<Utc>,
    pub last_schedule_time: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
    pub starting_deadline: Option<TimeDelta>,
    pub include_deadline: bool,
}

impl ReconstructionInput {
    pub fn new(creation_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            creation_time,
            last_schedule_time: None,
            now,
            starting_deadline: None,
            include_deadline: false,
        }
    }

    pub fn with_last_schedule_time(mut self, last: Option<DateTime<Utc>>) -> Self {
        self.last_schedule_time = last;
        self
    }

    pub fn with_starting_deadline(mut self, deadline: Option<TimeDelta>) -> Self {
        self.starting_deadline = deadline;
        self
    }

    pub fn include_deadline(mut self, include: bool) -> Self {
        self.include_deadline = include;
        self
    }

    /// Floor below which missed fires are not counted.
    pub fn earliest_time(&self) -> DateTime<Utc> {
        let mut earliest = self.last_schedule_time.unwrap_or(self.creation_time);
        if self.include_deadline {
            if let Some(deadline) = self.starting_deadline {
                // nothing older than the deadline will be started anyway
                if let Some(floor) = self.now.checked_sub_signed(deadline) {
                    if floor > earliest {
                        earliest = floor;
                    }
                }
            }
        }
        earliest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionResult {
    pub earliest_time: DateTime<Utc>,
    pub most_recent_due: Option<DateTime<Utc>>,
    pub missed_count: i64,
}

impl ReconstructionResult {
    fn not_due(earliest_time: DateTime<Utc>) -> Self {
        Self {
            earliest_time,
            most_recent_due: None,
            missed_count: 0,
        }
    }
}

/// The schedule cannot produce a sane sequence of fire times.
///
/// Every variant carries the floor that was computed before the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSchedule {
    #[error("time difference between two schedules is less than 1 second")]
    IntervalTooShort { earliest_time: DateTime<Utc> },
    #[error("schedule never fires after {earliest_time}")]
    NeverFires { earliest_time: DateTime<Utc> },
    #[error("most recent schedule time is out of range")]
    OutOfRange { earliest_time: DateTime<Utc> },
}

impl InvalidSchedule {
    pub fn earliest_time(&self) -> DateTime<Utc> {
        match self {
            InvalidSchedule::IntervalTooShort { earliest_time }
            | InvalidSchedule::NeverFires { earliest_time }
            | InvalidSchedule::OutOfRange { earliest_time } => *earliest_time,
        }
    }
}

/// Returns the earliest relevant time, the most recent fire at or before
/// `now` (if any) and the number of fires since the earliest time.
///
/// An expression that is grammatically fine but can never fire, such as the
/// 31st of February, is reported as [`InvalidSchedule`].
pub fn most_recent_schedule_time<S: Schedule + ?Sized>(
    input: &ReconstructionInput,
    schedule: &S,
) -> Result<ReconstructionResult, InvalidSchedule> {
    let earliest_time = input.earliest_time();
    let now = input.now;

    let Some(t1) = schedule.next_after(earliest_time) else {
        return Err(InvalidSchedule::NeverFires { earliest_time });
    };
    if now < t1 {
        return Ok(ReconstructionResult::not_due(earliest_time));
    }
    let t2 = match schedule.next_after(t1) {
        Some(t2) if now >= t2 => t2,
        _ => {
            return Ok(ReconstructionResult {
                earliest_time,
                most_recent_due: Some(t1),
                missed_count: 1,
            })
        }
    };

    let between = round_to_seconds(t2 - t1);
    if between < 1 {
        return Err(InvalidSchedule::IntervalTooShort { earliest_time });
    }
    let elapsed = (now - t1).num_seconds();
    let missed_count = elapsed / between + 1;
    let most_recent = (missed_count - 1)
        .checked_mul(between)
        .and_then(|offset| t1.timestamp().checked_add(offset))
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(InvalidSchedule::OutOfRange { earliest_time })?;

    Ok(ReconstructionResult {
        earliest_time,
        most_recent_due: Some(most_recent),
        missed_count,
    })
}

/// How long to wait before the next fire, padded by [`next_schedule_delta`].
///
/// The starting deadline is ignored here. `None` means the schedule has no
/// further fire to wake up for.
pub fn next_wake_duration<S: Schedule + ?Sized>(
    input: &ReconstructionInput,
    schedule: &S,
) -> Option<TimeDelta> {
    next_wake_duration_with_skew(input, schedule, next_schedule_delta())
}

pub fn next_wake_duration_with_skew<S: Schedule + ?Sized>(
    input: &ReconstructionInput,
    schedule: &S,
    skew: TimeDelta,
) -> Option<TimeDelta> {
    let input = input.include_deadline(false);
    let anchor = match most_recent_schedule_time(&input, schedule) {
        // still requeue eventually, aiming for the next slot from now
        Err(_) => input.now,
        Ok(result) => result.most_recent_due.unwrap_or(result.earliest_time),
    };
    let next = schedule.next_after(anchor)?;
    Some(next + skew - input.now)
}

/// Whole seconds, rounding halves away from zero.
fn round_to_seconds(delta: TimeDelta) -> i64 {
    let seconds = delta.num_seconds();
    let nanos = delta.subsec_nanos();
    if nanos >= 500_000_000 {
        seconds + 1
    } else if nanos <= -500_000_000 {
        seconds - 1
    } else {
        seconds
    }
}
