use super::{
    ConditionStatus, CronJob, CronJobError, Job, JobConditionType, JobStatus, ObjectMeta,
    OwnerReference, CRONJOB_API_VERSION, CRONJOB_KIND,
};
use crate::shared::ObjectName;
use chrono::{DateTime, Utc};

/// Minutes since the Unix epoch. Scheduling granularity is one minute, so
/// this is unique per scheduled time of a cronjob.
pub fn time_hash_in_minutes(scheduled_time: DateTime<Utc>) -> i64 {
    scheduled_time.timestamp() / 60
}

/// Deterministic job name for a scheduled time, so the same fire is never
/// created twice.
pub fn job_name_for(cj: &CronJob, scheduled_time: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        cj.metadata.name,
        time_hash_in_minutes(scheduled_time)
    )
}

/// Builds the job for one scheduled fire from the cronjob's template.
pub fn job_from_template(cj: &CronJob, scheduled_time: DateTime<Utc>) -> Result<Job, CronJobError> {
    ObjectName::parse(&cj.metadata.name).map_err(CronJobError::InvalidName)?;
    let name = job_name_for(cj, scheduled_time);
    ObjectName::parse(&name).map_err(CronJobError::InvalidName)?;

    let template = &cj.spec.job_template;
    Ok(Job {
        metadata: ObjectMeta {
            name,
            namespace: cj.metadata.namespace.clone(),
            uid: None,
            creation_timestamp: Some(scheduled_time),
            labels: template.metadata.labels.clone(),
            annotations: template.metadata.annotations.clone(),
            owner_references: vec![OwnerReference {
                api_version: CRONJOB_API_VERSION.to_string(),
                kind: CRONJOB_KIND.to_string(),
                name: cj.metadata.name.clone(),
                uid: cj.metadata.uid.clone(),
                controller: Some(true),
                block_owner_deletion: Some(true),
            }],
        },
        spec: template.spec.clone(),
        status: JobStatus::default(),
    })
}

/// The terminal condition of a job, if it completed or failed.
pub fn finished_status(job: &Job) -> Option<JobConditionType> {
    job.status
        .conditions
        .iter()
        .find(|condition| {
            matches!(
                condition.condition_type,
                JobConditionType::Complete | JobConditionType::Failed
            ) && condition.status == ConditionStatus::True
        })
        .map(|condition| condition.condition_type)
}

pub fn is_job_finished(job: &Job) -> bool {
    finished_status(job).is_some()
}
