//! Schedule providers.
//!
//! Everything that reasons about missed fires only needs [`Schedule`]: the
//! earliest fire time strictly after a given instant. Concrete providers are
//! a standard 5-field cron expression and a constant `@every` interval.

pub mod cron;
pub mod error;
pub mod interval;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub use cron::CronSchedule;
pub use error::ScheduleError;
pub use interval::IntervalSchedule;

/// A recurring calendar expression.
pub trait Schedule {
    /// Earliest fire time strictly after `after`, or `None` when the
    /// expression never fires again.
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

impl<S: Schedule + ?Sized> Schedule for &S {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (**self).next_after(after)
    }
}

impl<S: Schedule + ?Sized> Schedule for Box<S> {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (**self).next_after(after)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSchedule {
    Cron(CronSchedule),
    Every(IntervalSchedule),
}

impl Schedule for ParsedSchedule {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ParsedSchedule::Cron(schedule) => schedule.next_after(after),
            ParsedSchedule::Every(schedule) => schedule.next_after(after),
        }
    }
}

/// Parses a cron expression, descriptor or `@every <duration>` schedule.
///
/// `default_tz` applies unless the expression carries a `CRON_TZ=` or `TZ=`
/// prefix.
pub fn parse_schedule(raw: &str, default_tz: Tz) -> Result<ParsedSchedule, ScheduleError> {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("@every") {
        if rest.starts_with(char::is_whitespace) {
            return IntervalSchedule::parse(rest.trim()).map(ParsedSchedule::Every);
        }
    }
    CronSchedule::parse(trimmed, default_tz).map(ParsedSchedule::Cron)
}

pub fn validate_timezone(raw: &str) -> Result<Tz, ScheduleError> {
    raw.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_schedule_dispatches_on_every_prefix() {
        let every = parse_schedule("@every 90s", Tz::UTC).expect("every");
        assert!(matches!(every, ParsedSchedule::Every(_)));

        let hourly = parse_schedule("@hourly", Tz::UTC).expect("hourly");
        assert!(matches!(hourly, ParsedSchedule::Cron(_)));

        parse_schedule("@everyday", Tz::UTC).expect_err("not a descriptor");
    }

    #[test]
    fn validate_timezone_accepts_iana_ids_only() {
        validate_timezone("America/Los_Angeles").expect("valid timezone");
        validate_timezone("Mars/Olympus_Mons").expect_err("invalid timezone");
    }
}
