use super::{validate_timezone, Schedule, ScheduleError};
use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::fmt;

/// How far past the starting instant a search may run before the expression
/// is declared unable to fire.
const SEARCH_HORIZON_YEARS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CronField {
    star: bool,
    values: BTreeSet<u32>,
}

impl CronField {
    fn matches(&self, value: u32) -> bool {
        self.values.contains(&value)
    }
}

/// Standard 5-field cron expression evaluated in an IANA timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    expression: String,
    timezone: Tz,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

impl CronSchedule {
    pub fn parse(raw: &str, default_tz: Tz) -> Result<Self, ScheduleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let (timezone, body) = split_timezone_prefix(trimmed, default_tz)?;
        let body = if body.starts_with('@') {
            expand_descriptor(body)?
        } else {
            body
        };

        let fields: Vec<&str> = body.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::FieldCount {
                count: fields.len(),
            });
        }

        Ok(Self {
            expression: trimmed.to_string(),
            timezone,
            minute: parse_cron_field(fields[0], 0, 59, AliasKind::None)?,
            hour: parse_cron_field(fields[1], 0, 23, AliasKind::None)?,
            day_of_month: parse_cron_field(fields[2], 1, 31, AliasKind::None)?,
            month: parse_cron_field(fields[3], 1, 12, AliasKind::Month)?,
            day_of_week: parse_cron_field(fields[4], 0, 6, AliasKind::Weekday)?,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let day_of_month_match = self.day_of_month.matches(date.day());
        let day_of_week_match = self
            .day_of_week
            .matches(date.weekday().num_days_from_sunday());

        if self.day_of_month.star || self.day_of_week.star {
            day_of_month_match && day_of_week_match
        } else {
            day_of_month_match || day_of_week_match
        }
    }

    /// First matching local minute strictly after `from`, walking whole
    /// fields at a time. Each jump resets the lower fields to their minimum,
    /// so a rollover into a new year, month, day or hour restarts the check.
    fn next_matching_minute(&self, from: NaiveDateTime, year_limit: i32) -> Option<NaiveDateTime> {
        let mut t = from.checked_add_signed(TimeDelta::minutes(1))?;

        'wrap: loop {
            if t.year() > year_limit {
                return None;
            }

            while !self.month.matches(t.month()) {
                t = start_of_next_month(t)?;
                if t.month() == 1 {
                    continue 'wrap;
                }
            }

            while !self.day_matches(t.date()) {
                t = t.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                if t.day() == 1 {
                    continue 'wrap;
                }
            }

            while !self.hour.matches(t.hour()) {
                t = t
                    .date()
                    .and_hms_opt(t.hour(), 0, 0)?
                    .checked_add_signed(TimeDelta::hours(1))?;
                if t.hour() == 0 {
                    continue 'wrap;
                }
            }

            while !self.minute.matches(t.minute()) {
                t = t.checked_add_signed(TimeDelta::minutes(1))?;
                if t.minute() == 0 {
                    continue 'wrap;
                }
            }

            return Some(t);
        }
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            // wall-clock time skipped by a DST transition
            LocalResult::None => None,
        }
    }
}

impl Schedule for CronSchedule {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = after.with_timezone(&self.timezone).naive_local();
        let year_limit = local.year().saturating_add(SEARCH_HORIZON_YEARS);
        let mut cursor = local
            .date()
            .and_hms_opt(local.hour(), local.minute(), 0)?;

        loop {
            let candidate = self.next_matching_minute(cursor, year_limit)?;
            if let Some(resolved) = self.resolve_local(candidate) {
                if resolved > after {
                    return Some(resolved);
                }
            }
            cursor = candidate;
        }
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expression.fmt(f)
    }
}

fn split_timezone_prefix(raw: &str, default_tz: Tz) -> Result<(Tz, &str), ScheduleError> {
    let Some(rest) = raw
        .strip_prefix("CRON_TZ=")
        .or_else(|| raw.strip_prefix("TZ="))
    else {
        return Ok((default_tz, raw));
    };
    let (zone, body) = rest
        .split_once(char::is_whitespace)
        .ok_or(ScheduleError::Empty)?;
    Ok((validate_timezone(zone)?, body.trim_start()))
}

fn expand_descriptor(raw: &str) -> Result<&'static str, ScheduleError> {
    match raw {
        "@yearly" | "@annually" => Ok("0 0 1 1 *"),
        "@monthly" => Ok("0 0 1 * *"),
        "@weekly" => Ok("0 0 * * 0"),
        "@daily" | "@midnight" => Ok("0 0 * * *"),
        "@hourly" => Ok("0 * * * *"),
        other => Err(ScheduleError::UnknownDescriptor {
            raw: other.to_string(),
        }),
    }
}

fn start_of_next_month(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = if t.month() == 12 {
        (t.year().checked_add(1)?, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AliasKind {
    None,
    Month,
    Weekday,
}

fn parse_cron_field(
    raw: &str,
    min: u32,
    max: u32,
    aliases: AliasKind,
) -> Result<CronField, ScheduleError> {
    let mut field = CronField {
        star: false,
        values: BTreeSet::new(),
    };
    for segment in raw.split(',') {
        parse_cron_segment(segment, min, max, aliases, &mut field)?;
    }
    if field.values.is_empty() {
        return Err(ScheduleError::InvalidValue {
            raw: raw.to_string(),
        });
    }
    Ok(field)
}

fn parse_cron_segment(
    raw: &str,
    min: u32,
    max: u32,
    aliases: AliasKind,
    field: &mut CronField,
) -> Result<(), ScheduleError> {
    let (range_raw, step) = match raw.split_once('/') {
        Some((range, step_raw)) => {
            let step = step_raw
                .parse::<u32>()
                .map_err(|_| ScheduleError::InvalidStep {
                    raw: step_raw.to_string(),
                })?;
            if step == 0 {
                return Err(ScheduleError::InvalidStep {
                    raw: step_raw.to_string(),
                });
            }
            (range, Some(step))
        }
        None => (raw, None),
    };

    let (start, end) = if range_raw == "*" || range_raw == "?" {
        // a stepped wildcard such as `*/2` restricts the field
        if step.unwrap_or(1) == 1 {
            field.star = true;
        }
        (min, max)
    } else if let Some((start_raw, end_raw)) = range_raw.split_once('-') {
        (
            parse_cron_atom(start_raw, min, max, aliases)?,
            parse_cron_atom(end_raw, min, max, aliases)?,
        )
    } else {
        let value = parse_cron_atom(range_raw, min, max, aliases)?;
        // `5/15` means "from 5, every 15" up to the field maximum
        if step.is_some() {
            (value, max)
        } else {
            (value, value)
        }
    };

    if start > end {
        return Err(ScheduleError::InvalidRange {
            raw: raw.to_string(),
        });
    }

    let step = step.unwrap_or(1);
    let mut value = start;
    while value <= end {
        field.values.insert(value);
        match value.checked_add(step) {
            Some(next) => value = next,
            None => break,
        }
    }
    Ok(())
}

fn parse_cron_atom(
    raw: &str,
    min: u32,
    max: u32,
    aliases: AliasKind,
) -> Result<u32, ScheduleError> {
    let lower = raw.to_ascii_lowercase();
    let named = match aliases {
        AliasKind::None => None,
        AliasKind::Month => match lower.as_str() {
            "jan" => Some(1),
            "feb" => Some(2),
            "mar" => Some(3),
            "apr" => Some(4),
            "may" => Some(5),
            "jun" => Some(6),
            "jul" => Some(7),
            "aug" => Some(8),
            "sep" => Some(9),
            "oct" => Some(10),
            "nov" => Some(11),
            "dec" => Some(12),
            _ => None,
        },
        AliasKind::Weekday => match lower.as_str() {
            "sun" => Some(0),
            "mon" => Some(1),
            "tue" => Some(2),
            "wed" => Some(3),
            "thu" => Some(4),
            "fri" => Some(5),
            "sat" => Some(6),
            _ => None,
        },
    };
    let value = match named {
        Some(value) => value,
        None => lower
            .parse::<u32>()
            .map_err(|_| ScheduleError::InvalidValue {
                raw: raw.to_string(),
            })?,
    };

    if value < min || value > max {
        return Err(ScheduleError::OutOfBounds {
            raw: raw.to_string(),
            min,
            max,
        });
    }
    Ok(value)
}
