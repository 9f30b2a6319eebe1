use crate::app::cli::ParsedArgs;
use crate::app::command_support::{
    now_from_args, render_json, settings_from_args, timezone_from_args,
};
use crate::reconstruct::{
    most_recent_schedule_time, next_wake_duration_with_skew, ReconstructionInput,
};
use crate::schedule::parse_schedule;
use crate::shared::time::parse_timestamp;
use chrono::TimeDelta;
use serde_json::Value;

const OPTIONS: &[&str] = &[
    "schedule",
    "created",
    "last",
    "now",
    "deadline-seconds",
    "include-deadline",
    "timezone",
    "config",
];

pub fn cmd_reconstruct(args: &[String]) -> Result<String, String> {
    let args = ParsedArgs::parse(args, &["include-deadline"])?;
    args.reject_unknown(OPTIONS)?;
    if let Some(extra) = args.positionals.first() {
        return Err(format!("unexpected argument `{extra}`"));
    }

    let settings = settings_from_args(&args)?;
    let timezone = timezone_from_args(&args, &settings)?;
    let schedule =
        parse_schedule(args.required("schedule")?, timezone).map_err(|err| err.to_string())?;
    let created = parse_timestamp(args.required("created")?)?;
    let last = args.value("last").map(parse_timestamp).transpose()?;
    let now = now_from_args(&args)?;
    let deadline = args
        .value("deadline-seconds")
        .map(parse_deadline_seconds)
        .transpose()?;

    let input = ReconstructionInput::new(created, now)
        .with_last_schedule_time(last)
        .with_starting_deadline(deadline)
        .include_deadline(args.switch("include-deadline"));
    let result = most_recent_schedule_time(&input, &schedule).map_err(|err| {
        format!(
            "{err} (earliest time {})",
            err.earliest_time().to_rfc3339()
        )
    })?;
    let requeue = next_wake_duration_with_skew(&input, &schedule, settings.next_schedule_delta());

    let mut output = serde_json::to_value(result)
        .map_err(|err| format!("failed to encode reconstruction result: {err}"))?;
    output["requeueAfterMs"] = requeue
        .map(|wait| Value::from(wait.num_milliseconds()))
        .unwrap_or(Value::Null);
    render_json(&output)
}

fn parse_deadline_seconds(raw: &str) -> Result<TimeDelta, String> {
    raw.parse::<i64>()
        .ok()
        .filter(|seconds| *seconds >= 0)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| format!("`--deadline-seconds` must be a non-negative integer, got `{raw}`"))
}
