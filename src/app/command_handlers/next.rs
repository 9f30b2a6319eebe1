use crate::app::cli::ParsedArgs;
use crate::app::command_support::{map_config_err, now_from_args, render_json, settings_from_args};
use crate::cronjob::{
    due_schedule, in_active_list_by_name, job_from_template, next_schedule_time_duration,
    CronJob, CronJobError, ObjectReference,
};
use crate::events::{
    EventRecorder, EventType, FakeRecorder, JsonlEventLog, REASON_INVALID_SCHEDULE,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const OPTIONS: &[&str] = &["cronjob", "now", "config"];
const EVENT_BUFFER: usize = 16;

/// Keeps events for the command output and mirrors them to the configured
/// event log.
struct CliRecorder {
    buffer: FakeRecorder,
    log: Option<JsonlEventLog>,
}

impl CliRecorder {
    fn new(log_path: Option<&Path>) -> Self {
        Self {
            buffer: FakeRecorder::new(EVENT_BUFFER),
            log: log_path.map(JsonlEventLog::new),
        }
    }
}

impl EventRecorder for CliRecorder {
    fn event(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        self.buffer.event(object, event_type, reason, message);
        if let Some(log) = &self.log {
            log.event(object, event_type, reason, message);
        }
    }
}

pub fn cmd_next(args: &[String]) -> Result<String, String> {
    let args = ParsedArgs::parse(args, &[])?;
    args.reject_unknown(OPTIONS)?;
    let settings = settings_from_args(&args)?;
    let now = now_from_args(&args)?;

    let path = args.required("cronjob")?;
    let raw = fs::read_to_string(path).map_err(|err| format!("failed to read {path}: {err}"))?;
    let cj = CronJob::from_yaml(&raw).map_err(|err| format!("failed to parse {path}: {err}"))?;

    let timezone = settings.timezone().map_err(map_config_err)?;
    let schedule = cj.parse_schedule(timezone).map_err(|err| {
        format!(
            "cronjob `{}` has an unparseable schedule `{}`: {err}",
            cj.metadata.name, cj.spec.schedule
        )
    })?;

    let recorder = CliRecorder::new(settings.event_log_path.as_deref());
    let due = match due_schedule(
        &cj,
        now,
        &schedule,
        &recorder,
        settings.missed_schedules_warning_threshold,
    ) {
        Ok(due) => Some(due),
        // never start anything for it, but keep the warning visible
        Err(CronJobError::InvalidSchedule(err)) => {
            recorder.event(
                &cj.object_reference(),
                EventType::Warning,
                REASON_INVALID_SCHEDULE,
                &format!("invalid schedule `{}`: {err}", cj.spec.schedule),
            );
            None
        }
        Err(err) => return Err(err.to_string()),
    };
    let scheduled = due.and_then(|due| due.scheduled_time);
    let missed_count = due.map(|due| due.missed_count);
    let requeue = next_schedule_time_duration(&cj, now, &schedule, settings.next_schedule_delta())
        .map_err(|err| err.to_string())?;

    let job = match scheduled {
        Some(scheduled) if !cj.is_suspended() => {
            Some(job_from_template(&cj, scheduled).map_err(|err| err.to_string())?)
        }
        _ => None,
    };

    let output = json!({
        "cronjob": cj.object_reference().key(),
        "suspended": cj.is_suspended(),
        "scheduledTime": scheduled,
        "missedCount": missed_count,
        "jobName": job.as_ref().map(|job| job.metadata.name.clone()),
        "alreadyActive": job.as_ref().is_some_and(|job| in_active_list_by_name(&cj, job)),
        "requeueAfterMs": requeue.map(|wait| Value::from(wait.num_milliseconds())),
        "events": recorder.buffer.events(),
    });
    render_json(&output)
}
