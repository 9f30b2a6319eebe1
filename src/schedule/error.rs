#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("schedule expression is empty")]
    Empty,
    #[error(
        "cron expression must use 5 fields: minute hour day_of_month month day_of_week (got {count})"
    )]
    FieldCount { count: usize },
    #[error("invalid cron value `{raw}`")]
    InvalidValue { raw: String },
    #[error("cron value `{raw}` is out of bounds ({min}..={max})")]
    OutOfBounds { raw: String, min: u32, max: u32 },
    #[error("invalid cron range `{raw}`")]
    InvalidRange { raw: String },
    #[error("invalid cron step `{raw}`")]
    InvalidStep { raw: String },
    #[error("unrecognized schedule descriptor `{raw}`")]
    UnknownDescriptor { raw: String },
    #[error("invalid @every duration `{raw}`")]
    InvalidDuration { raw: String },
    #[error("invalid timezone `{raw}`; expected IANA timezone id")]
    InvalidTimezone { raw: String },
}
