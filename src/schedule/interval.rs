use super::{Schedule, ScheduleError};
use chrono::{DateTime, TimeDelta, Timelike, Utc};

/// Fires every `every` seconds after whatever instant it is asked about.
///
/// Sub-second intervals are rounded up to one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSchedule {
    every: TimeDelta,
}

impl IntervalSchedule {
    pub fn new(every: TimeDelta) -> Self {
        let one_second = TimeDelta::seconds(1);
        let whole = TimeDelta::seconds(every.num_seconds());
        let every = if whole < one_second { one_second } else { whole };
        Self { every }
    }

    /// Parses a Go-style duration made of `h`, `m` and `s` components,
    /// e.g. `1h30m` or `90s`.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidDuration {
            raw: raw.to_string(),
        };
        if raw.is_empty() {
            return Err(invalid());
        }

        let mut total: i64 = 0;
        let mut digits = String::new();
        for ch in raw.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let unit = match ch {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return Err(invalid()),
            };
            let amount = digits.parse::<i64>().map_err(|_| invalid())?;
            total = amount
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(invalid)?;
            digits.clear();
        }
        if !digits.is_empty() {
            return Err(invalid());
        }

        let every = TimeDelta::try_seconds(total).ok_or_else(invalid)?;
        Ok(Self::new(every))
    }

    pub fn every(&self) -> TimeDelta {
        self.every
    }
}

impl Schedule for IntervalSchedule {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        after
            .with_nanosecond(0)?
            .checked_add_signed(self.every)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_durations() {
        let schedule = IntervalSchedule::parse("1h30m15s").expect("parse");
        assert_eq!(schedule.every(), TimeDelta::seconds(5415));

        IntervalSchedule::parse("").expect_err("empty");
        IntervalSchedule::parse("10").expect_err("missing unit");
        IntervalSchedule::parse("5d").expect_err("unknown unit");
        IntervalSchedule::parse("m").expect_err("missing amount");
    }

    #[test]
    fn rounds_sub_second_intervals_up() {
        let schedule = IntervalSchedule::new(TimeDelta::milliseconds(10));
        assert_eq!(schedule.every(), TimeDelta::seconds(1));
        assert_eq!(IntervalSchedule::parse("0s").expect("parse").every(), TimeDelta::seconds(1));
    }

    #[test]
    fn next_after_truncates_to_whole_seconds() {
        let schedule = IntervalSchedule::parse("90s").expect("parse");
        let at = DateTime::from_timestamp(1_700_000_000, 250_000_000).expect("timestamp");
        let next = schedule.next_after(at).expect("next");
        assert_eq!(next.timestamp(), 1_700_000_090);
        assert_eq!(next.timestamp_subsec_nanos(), 0);
    }
}
