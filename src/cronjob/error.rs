use crate::reconstruct::InvalidSchedule;
use crate::schedule::ScheduleError;

#[derive(Debug, thiserror::Error)]
pub enum CronJobError {
    #[error("cronjob `{name}` has no creation timestamp")]
    MissingCreationTimestamp { name: String },
    #[error("invalid job name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    InvalidSchedule(#[from] InvalidSchedule),
    #[error("unparseable schedule: {0}")]
    Schedule(#[from] ScheduleError),
}
