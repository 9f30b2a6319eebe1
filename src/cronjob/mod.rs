//! Caller-side utilities for a recurring-job controller: the object model,
//! active-list bookkeeping, job ordering and construction, and the
//! next-schedule wrapper that warns about missed fires.

pub mod active;
pub mod error;
pub mod model;
pub mod next_schedule;
pub mod ordering;
pub mod template;

pub use active::{
    active_uids, delete_from_active_list, in_active_list, in_active_list_by_name,
    is_job_tracked, remove_from_active,
};
pub use error::CronJobError;
pub use model::{
    ConcurrencyPolicy, ConditionStatus, CronJob, CronJobSpec, CronJobStatus, Job, JobCondition,
    JobConditionType, JobStatus, JobTemplateSpec, ObjectMeta, ObjectReference, OwnerReference,
    TemplateMeta, CRONJOB_API_VERSION, CRONJOB_KIND,
};
pub use next_schedule::{
    due_schedule, next_schedule_time, next_schedule_time_duration, DueSchedule,
    DEFAULT_MISSED_SCHEDULES_WARNING_THRESHOLD,
};
pub use ordering::{compare_by_start_time, sort_by_start_time};
pub use template::{
    finished_status, is_job_finished, job_from_template, job_name_for, time_hash_in_minutes,
};
