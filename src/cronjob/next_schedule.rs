use super::{CronJob, CronJobError};
use crate::events::{EventRecorder, EventType, REASON_TOO_MANY_MISSED_TIMES};
use crate::reconstruct::{most_recent_schedule_time, next_wake_duration_with_skew};
use crate::schedule::Schedule;
use chrono::{DateTime, TimeDelta, Utc};

/// An hourly cronjob wedged from Friday evening to Tuesday morning misses
/// more than 80 starts and should still catch up without intervention.
/// Counts far beyond that usually mean clock skew or a missing deadline.
pub const DEFAULT_MISSED_SCHEDULES_WARNING_THRESHOLD: i64 = 100;

/// Outcome of one due check: the fire to start, if any, and how many fires
/// fell inside the look-back window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueSchedule {
    pub scheduled_time: Option<DateTime<Utc>>,
    pub missed_count: i64,
}

/// Like [`next_schedule_time`], but keeps the missed count alongside the
/// scheduled time.
pub fn due_schedule<S, R>(
    cj: &CronJob,
    now: DateTime<Utc>,
    schedule: &S,
    recorder: &R,
    warning_threshold: i64,
) -> Result<DueSchedule, CronJobError>
where
    S: Schedule + ?Sized,
    R: EventRecorder + ?Sized,
{
    let input = cj.reconstruction_input(now, true)?;
    let result = most_recent_schedule_time(&input, schedule)?;

    let scheduled_time = result.most_recent_due.filter(|due| *due <= now);
    if scheduled_time.is_some() && result.missed_count > warning_threshold {
        recorder.event(
            &cj.object_reference(),
            EventType::Warning,
            REASON_TOO_MANY_MISSED_TIMES,
            &format!(
                "too many missed start times: {}. Set or decrease .spec.startingDeadlineSeconds or check clock skew",
                result.missed_count
            ),
        );
    }
    Ok(DueSchedule {
        scheduled_time,
        missed_count: result.missed_count,
    })
}

/// The most recent unmet schedule time at or before `now`, or `None` when
/// nothing is due.
///
/// Records a `TooManyMissedTimes` warning when more than
/// `warning_threshold` fires were missed.
pub fn next_schedule_time<S, R>(
    cj: &CronJob,
    now: DateTime<Utc>,
    schedule: &S,
    recorder: &R,
    warning_threshold: i64,
) -> Result<Option<DateTime<Utc>>, CronJobError>
where
    S: Schedule + ?Sized,
    R: EventRecorder + ?Sized,
{
    due_schedule(cj, now, schedule, recorder, warning_threshold).map(|due| due.scheduled_time)
}

/// Time until the cronjob should be looked at again.
pub fn next_schedule_time_duration<S>(
    cj: &CronJob,
    now: DateTime<Utc>,
    schedule: &S,
    skew: TimeDelta,
) -> Result<Option<TimeDelta>, CronJobError>
where
    S: Schedule + ?Sized,
{
    let input = cj.reconstruction_input(now, false)?;
    Ok(next_wake_duration_with_skew(&input, schedule, skew))
}
