use crate::app::cli::ParsedArgs;
use crate::app::command_support::{
    now_from_args, render_json, settings_from_args, timezone_from_args,
};
use crate::schedule::{parse_schedule, Schedule};
use crate::shared::time::parse_timestamp;
use serde_json::json;

const OPTIONS: &[&str] = &["timezone", "from", "count", "config"];
const DEFAULT_COUNT: usize = 5;
const MAX_COUNT: usize = 100;

pub fn cmd_check_schedule(args: &[String]) -> Result<String, String> {
    let args = ParsedArgs::parse(args, &[])?;
    args.reject_unknown(OPTIONS)?;
    let expression = match args.positionals.as_slice() {
        [expression] => expression.as_str(),
        [] => return Err("usage: check-schedule <expr> [--timezone <tz>]".to_string()),
        [_, extra, ..] => return Err(format!("unexpected argument `{extra}`")),
    };

    let settings = settings_from_args(&args)?;
    let timezone = timezone_from_args(&args, &settings)?;
    let from = match args.value("from") {
        Some(raw) => parse_timestamp(raw)?,
        None => now_from_args(&args)?,
    };
    let count = match args.value("count") {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|count| (1..=MAX_COUNT).contains(count))
            .ok_or_else(|| format!("`--count` must be between 1 and {MAX_COUNT}, got `{raw}`"))?,
        None => DEFAULT_COUNT,
    };

    let schedule = parse_schedule(expression, timezone).map_err(|err| err.to_string())?;
    let mut fires = Vec::with_capacity(count);
    let mut cursor = from;
    while fires.len() < count {
        let Some(next) = schedule.next_after(cursor) else {
            break;
        };
        fires.push(next.to_rfc3339());
        cursor = next;
    }
    if fires.is_empty() {
        return Err(format!(
            "schedule `{expression}` never fires after {}",
            from.to_rfc3339()
        ));
    }

    render_json(&json!({
        "expression": expression,
        "timezone": timezone.name(),
        "nextFires": fires,
    }))
}
