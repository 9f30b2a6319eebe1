use super::ConfigError;
use crate::cronjob::DEFAULT_MISSED_SCHEDULES_WARNING_THRESHOLD;
use crate::reconstruct::NEXT_SCHEDULE_DELTA_MS;
use crate::schedule::validate_timezone;
use chrono::TimeDelta;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound for the wake-up padding; anything larger delays fires
/// noticeably.
const MAX_NEXT_SCHEDULE_DELTA_MS: i64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_missed_schedules_warning_threshold")]
    pub missed_schedules_warning_threshold: i64,
    #[serde(default = "default_next_schedule_delta_ms")]
    pub next_schedule_delta_ms: i64,
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default)]
    pub event_log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            missed_schedules_warning_threshold: default_missed_schedules_warning_threshold(),
            next_schedule_delta_ms: default_next_schedule_delta_ms(),
            default_timezone: default_timezone(),
            event_log_path: None,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.missed_schedules_warning_threshold < 0 {
            return Err(ConfigError::Settings(
                "`missed_schedules_warning_threshold` must be >= 0".to_string(),
            ));
        }
        if !(0..=MAX_NEXT_SCHEDULE_DELTA_MS).contains(&self.next_schedule_delta_ms) {
            return Err(ConfigError::Settings(format!(
                "`next_schedule_delta_ms` must be between 0 and {MAX_NEXT_SCHEDULE_DELTA_MS}"
            )));
        }
        self.timezone()?;
        if let Some(path) = &self.event_log_path {
            if !path.is_absolute() {
                return Err(ConfigError::Settings(
                    "`event_log_path` must be an absolute path".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        validate_timezone(&self.default_timezone)
            .map_err(|err| ConfigError::Settings(format!("`default_timezone`: {err}")))
    }

    pub fn next_schedule_delta(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.next_schedule_delta_ms)
    }
}

fn default_missed_schedules_warning_threshold() -> i64 {
    DEFAULT_MISSED_SCHEDULES_WARNING_THRESHOLD
}

fn default_next_schedule_delta_ms() -> i64 {
    NEXT_SCHEDULE_DELTA_MS
}

fn default_timezone() -> String {
    "UTC".to_string()
}
