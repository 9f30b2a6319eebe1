use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use cronjob_schedule::cronjob::{
    due_schedule, job_from_template, next_schedule_time, next_schedule_time_duration, CronJob,
    CronJobError, DueSchedule, DEFAULT_MISSED_SCHEDULES_WARNING_THRESHOLD,
};
use cronjob_schedule::events::FakeRecorder;
use cronjob_schedule::reconstruct::{next_schedule_delta, InvalidSchedule};
use cronjob_schedule::schedule::{CronSchedule, Schedule};

fn t1() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2016-05-19T10:00:00Z")
        .expect("test setup")
        .with_timezone(&Utc)
}

fn t2() -> DateTime<Utc> {
    t1() + TimeDelta::hours(1)
}

fn cronjob() -> CronJob {
    CronJob::from_yaml(
        r#"
metadata:
  name: mycronjob
  namespace: snazzycats
  uid: 1a2b3c
  creationTimestamp: "2016-05-19T09:50:00Z"
spec:
  schedule: "0 * * * ?"
  concurrencyPolicy: Allow
  jobTemplate:
    metadata:
      labels:
        a: b
"#,
    )
    .expect("cronjob manifest")
}

fn hourly() -> CronSchedule {
    CronSchedule::parse("0 * * * ?", Tz::UTC).expect("hourly")
}

/// Fires every 400ms.
struct Stutter;

impl Schedule for Stutter {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Some(after + TimeDelta::milliseconds(400))
    }
}

fn next(cj: &CronJob, now: DateTime<Utc>, recorder: &FakeRecorder) -> Option<DateTime<Utc>> {
    next_schedule_time(
        cj,
        now,
        &hourly(),
        recorder,
        DEFAULT_MISSED_SCHEDULES_WARNING_THRESHOLD,
    )
    .expect("next schedule time")
}

#[test]
fn next_schedule_not_due_before_first_fire() {
    let recorder = FakeRecorder::new(10);
    assert_eq!(next(&cronjob(), t1() - TimeDelta::minutes(7), &recorder), None);
    assert!(recorder.events().is_empty());
}

#[test]
fn next_schedule_due_right_after_first_fire() {
    let recorder = FakeRecorder::new(10);
    assert_eq!(
        next(&cronjob(), t1() + TimeDelta::seconds(2), &recorder),
        Some(t1())
    );
}

#[test]
fn next_schedule_not_due_again_after_it_ran() {
    let recorder = FakeRecorder::new(10);
    let mut cj = cronjob();
    cj.status.last_schedule_time = Some(t1());
    assert_eq!(next(&cj, t1() + TimeDelta::minutes(2), &recorder), None);
    assert_eq!(next(&cj, t2() + TimeDelta::seconds(2), &recorder), Some(t2()));
}

#[test]
fn next_schedule_returns_most_recent_of_several_missed() {
    let recorder = FakeRecorder::new(10);
    let mut cj = cronjob();
    cj.status.last_schedule_time = Some(t1());
    let now = t1() + TimeDelta::hours(5) + TimeDelta::minutes(2);
    assert_eq!(next(&cj, now, &recorder), Some(t1() + TimeDelta::hours(5)));
    assert!(recorder.events().is_empty());
}

#[test]
fn next_schedule_starting_deadline_limits_how_far_back_it_looks() {
    let recorder = FakeRecorder::new(10);
    let mut cj = cronjob();
    cj.status.last_schedule_time = Some(t1());
    cj.spec.starting_deadline_seconds = Some(600);

    // the only fire inside the deadline window is T1+100h
    let now = t1() + TimeDelta::hours(100) + TimeDelta::minutes(5);
    assert_eq!(next(&cj, now, &recorder), Some(t1() + TimeDelta::hours(100)));

    // the last fire slipped past the deadline
    let late = t1() + TimeDelta::hours(100) + TimeDelta::minutes(20);
    assert_eq!(next(&cj, late, &recorder), None);
    assert!(recorder.events().is_empty());
}

#[test]
fn next_schedule_warns_when_too_many_fires_were_missed() {
    let recorder = FakeRecorder::new(10);
    let mut cj = cronjob();
    cj.status.last_schedule_time = Some(t1());
    let now = t1() + TimeDelta::hours(200) + TimeDelta::minutes(5);

    assert_eq!(next(&cj, now, &recorder), Some(t1() + TimeDelta::hours(200)));
    assert_eq!(
        recorder.drain(),
        vec![
            "Warning TooManyMissedTimes too many missed start times: 200. Set or decrease .spec.startingDeadlineSeconds or check clock skew"
                .to_string()
        ]
    );

    let quiet = FakeRecorder::new(10);
    next_schedule_time(&cj, now, &hourly(), &quiet, 500).expect("next schedule time");
    assert!(quiet.events().is_empty());
}

#[test]
fn next_schedule_threshold_is_exclusive() {
    let recorder = FakeRecorder::new(10);
    let mut cj = cronjob();
    cj.status.last_schedule_time = Some(t1());
    let now = t1() + TimeDelta::hours(100) + TimeDelta::minutes(1);
    next_schedule_time(&cj, now, &hourly(), &recorder, 100).expect("next schedule time");
    assert!(recorder.events().is_empty());
    next_schedule_time(&cj, now, &hourly(), &recorder, 99).expect("next schedule time");
    assert_eq!(recorder.events().len(), 1);
}

#[test]
fn next_schedule_propagates_invalid_schedules_and_missing_timestamps() {
    let recorder = FakeRecorder::new(10);
    let cj = cronjob();
    let err = next_schedule_time(&cj, t1() + TimeDelta::minutes(1), &Stutter, &recorder, 100)
        .expect_err("sub-second schedule");
    assert!(matches!(
        err,
        CronJobError::InvalidSchedule(InvalidSchedule::IntervalTooShort { .. })
    ));

    let mut unborn = cronjob();
    unborn.metadata.creation_timestamp = None;
    let err = next_schedule_time(&unborn, t1(), &hourly(), &recorder, 100)
        .expect_err("no creation timestamp");
    assert!(matches!(err, CronJobError::MissingCreationTimestamp { .. }));
    assert!(recorder.events().is_empty());
}

#[test]
fn next_schedule_duration_pads_the_wait() {
    let cj = cronjob();
    let wait = next_schedule_time_duration(
        &cj,
        t1() - TimeDelta::minutes(7),
        &hourly(),
        next_schedule_delta(),
    )
    .expect("duration");
    assert_eq!(wait, Some(TimeDelta::minutes(7) + TimeDelta::milliseconds(100)));

    let mut late = cronjob();
    late.status.last_schedule_time = Some(t1());
    late.spec.starting_deadline_seconds = Some(10);
    let wait = next_schedule_time_duration(
        &late,
        t1() + TimeDelta::hours(3) + TimeDelta::minutes(15),
        &hourly(),
        TimeDelta::zero(),
    )
    .expect("duration");
    assert_eq!(wait, Some(TimeDelta::minutes(45)));
}

#[test]
fn next_schedule_feeds_a_deterministic_job_name() {
    let recorder = FakeRecorder::new(10);
    let cj = cronjob();
    let scheduled = next(&cj, t1() + TimeDelta::seconds(2), &recorder).expect("due");
    let job = job_from_template(&cj, scheduled).expect("job");
    assert_eq!(job.metadata.name, format!("mycronjob-{}", t1().timestamp() / 60));
    assert_eq!(job.metadata.namespace, "snazzycats");
    assert_eq!(job.metadata.labels["a"], "b");
}

#[test]
fn due_schedule_reports_the_count_behind_the_warning() {
    let recorder = FakeRecorder::new(10);
    let mut cj = cronjob();
    cj.status.last_schedule_time = Some(t1());
    let now = t1() + TimeDelta::hours(200) + TimeDelta::minutes(5);

    let due = due_schedule(&cj, now, &hourly(), &recorder, 100).expect("due schedule");
    assert_eq!(
        due,
        DueSchedule {
            scheduled_time: Some(t1() + TimeDelta::hours(200)),
            missed_count: 200,
        }
    );
    let events = recorder.drain();
    assert_eq!(events.len(), 1);
    assert!(events[0].contains(&format!("missed start times: {}.", due.missed_count)));

    let idle = due_schedule(&cj, t1() + TimeDelta::minutes(2), &hourly(), &recorder, 100)
        .expect("due schedule");
    assert_eq!(
        idle,
        DueSchedule {
            scheduled_time: None,
            missed_count: 0,
        }
    );
    assert!(recorder.events().is_empty());
}
