use super::{CronJob, Job, ObjectReference};
use crate::shared::Uid;
use std::collections::HashSet;

/// Whether `.status.active` references a job with this UID.
pub fn in_active_list(cj: &CronJob, uid: &Uid) -> bool {
    cj.status
        .active
        .iter()
        .any(|reference| reference.uid.as_ref() == Some(uid))
}

/// Whether `.status.active` references a job with the same name and
/// namespace, for jobs whose UID is not known yet.
pub fn in_active_list_by_name(cj: &CronJob, job: &Job) -> bool {
    cj.status.active.iter().any(|reference| {
        reference.name == job.metadata.name && reference.namespace == job.metadata.namespace
    })
}

pub fn delete_from_active_list(cj: &mut CronJob, uid: &Uid) {
    remove_from_active(&mut cj.status.active, uid);
}

pub fn active_uids(cj: &CronJob) -> HashSet<Uid> {
    cj.status
        .active
        .iter()
        .filter_map(|reference| reference.uid.clone())
        .collect()
}

pub fn is_job_tracked(active: &HashSet<Uid>, uid: &Uid) -> bool {
    active.contains(uid)
}

/// Removes every reference with `uid`, keeping the rest in their original
/// order since the list is user visible.
pub fn remove_from_active(active: &mut Vec<ObjectReference>, uid: &Uid) {
    active.retain(|reference| reference.uid.as_ref() != Some(uid));
}
