use chrono::{DateTime, TimeDelta, Utc};
use cronjob_schedule::cronjob::{compare_by_start_time, sort_by_start_time, Job};
use std::cmp::Ordering;

fn job(name: &str, started_minutes: Option<i64>) -> Job {
    let base = DateTime::from_timestamp(1_463_652_000, 0).expect("base time");
    let mut job = Job::named(name);
    job.status.start_time = started_minutes.map(|minutes| base + TimeDelta::minutes(minutes));
    job
}

fn fixture() -> Vec<Job> {
    vec![
        job("e", None),
        job("c", Some(30)),
        job("a", Some(10)),
        job("f", None),
        job("b", Some(10)),
        job("d", Some(-5)),
    ]
}

#[test]
fn ordering_is_stable_under_resorting_and_permutation() {
    let mut sorted = fixture();
    sort_by_start_time(&mut sorted);
    let names: Vec<String> = sorted.iter().map(|j| j.metadata.name.clone()).collect();
    assert_eq!(names, vec!["d", "a", "b", "c", "e", "f"]);

    let mut again = sorted.clone();
    sort_by_start_time(&mut again);
    assert_eq!(again, sorted);

    let mut reversed = fixture();
    reversed.reverse();
    sort_by_start_time(&mut reversed);
    assert_eq!(reversed, sorted);
}

#[test]
fn ordering_never_puts_unstarted_jobs_first() {
    let mut refs: Vec<&Job> = Vec::new();
    let jobs = fixture();
    refs.extend(jobs.iter());
    sort_by_start_time(&mut refs);
    let first_unstarted = refs
        .iter()
        .position(|job| job.status.start_time.is_none())
        .expect("unstarted jobs present");
    assert!(refs[first_unstarted..]
        .iter()
        .all(|job| job.status.start_time.is_none()));
}

#[test]
fn ordering_is_antisymmetric() {
    let jobs = fixture();
    for a in &jobs {
        assert_eq!(compare_by_start_time(a, a), Ordering::Equal);
        for b in &jobs {
            assert_eq!(
                compare_by_start_time(a, b),
                compare_by_start_time(b, a).reverse()
            );
        }
    }
}
