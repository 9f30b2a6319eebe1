use crate::app::cli::ParsedArgs;
use crate::config::{load_settings, ConfigError, Settings};
use crate::schedule::validate_timezone;
use crate::shared::time::{now_utc, parse_timestamp};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::path::Path;

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub(crate) fn settings_from_args(args: &ParsedArgs) -> Result<Settings, String> {
    load_settings(args.value("config").map(Path::new)).map_err(map_config_err)
}

pub(crate) fn now_from_args(args: &ParsedArgs) -> Result<DateTime<Utc>, String> {
    match args.value("now") {
        Some(raw) => parse_timestamp(raw),
        None => Ok(now_utc()),
    }
}

pub(crate) fn timezone_from_args(args: &ParsedArgs, settings: &Settings) -> Result<Tz, String> {
    match args.value("timezone") {
        Some(raw) => validate_timezone(raw).map_err(|err| err.to_string()),
        None => settings.timezone().map_err(map_config_err),
    }
}

pub fn render_json(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("failed to encode output: {err}"))
}
