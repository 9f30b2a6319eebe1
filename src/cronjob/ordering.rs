use super::Job;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Orders jobs by start time, oldest first.
///
/// Jobs that have not started sort after every started job. Equal start
/// times, including two missing ones, fall back to the job name.
pub fn compare_by_start_time(a: &Job, b: &Job) -> Ordering {
    match (a.status.start_time, b.status.start_time) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (left, right) => left
            .cmp(&right)
            .then_with(|| a.metadata.name.cmp(&b.metadata.name)),
    }
}

pub fn sort_by_start_time<J: Borrow<Job>>(jobs: &mut [J]) {
    jobs.sort_by(|a, b| compare_by_start_time(a.borrow(), b.borrow()));
}
