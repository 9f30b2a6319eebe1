use super::CronJobError;
use crate::reconstruct::ReconstructionInput;
use crate::schedule::{parse_schedule, validate_timezone, ParsedSchedule, ScheduleError};
use crate::shared::Uid;
use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const CRONJOB_API_VERSION: &str = "batch/v1";
pub const CRONJOB_KIND: &str = "CronJob";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uid>,
}

impl ObjectReference {
    /// `namespace/name`, or just `name` for cluster-scoped objects.
    pub fn key(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: Option<Uid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyPolicy {
    #[default]
    Allow,
    Forbid,
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTemplateSpec {
    #[serde(default)]
    pub metadata: TemplateMeta,
    /// Job spec, carried through untouched.
    #[serde(default)]
    pub spec: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobSpec {
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_deadline_seconds: Option<i64>,
    #[serde(default)]
    pub concurrency_policy: ConcurrencyPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
    #[serde(default)]
    pub job_template: JobTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active: Vec<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_schedule_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJob {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: CronJobSpec,
    #[serde(default)]
    pub status: CronJobStatus,
}

impl CronJob {
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn object_reference(&self) -> ObjectReference {
        ObjectReference {
            api_version: CRONJOB_API_VERSION.to_string(),
            kind: CRONJOB_KIND.to_string(),
            namespace: self.metadata.namespace.clone(),
            name: self.metadata.name.clone(),
            uid: self.metadata.uid.clone(),
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.spec.suspend.unwrap_or(false)
    }

    /// Parses `.spec.schedule`, honoring `.spec.timeZone` over `default_tz`.
    pub fn parse_schedule(&self, default_tz: Tz) -> Result<ParsedSchedule, ScheduleError> {
        let tz = match &self.spec.time_zone {
            Some(zone) => validate_timezone(zone)?,
            None => default_tz,
        };
        parse_schedule(&self.spec.schedule, tz)
    }

    pub fn starting_deadline(&self) -> Option<TimeDelta> {
        self.spec
            .starting_deadline_seconds
            .and_then(TimeDelta::try_seconds)
    }

    pub fn reconstruction_input(
        &self,
        now: DateTime<Utc>,
        include_deadline: bool,
    ) -> Result<ReconstructionInput, CronJobError> {
        let creation_time =
            self.metadata
                .creation_timestamp
                .ok_or_else(|| CronJobError::MissingCreationTimestamp {
                    name: self.metadata.name.clone(),
                })?;
        Ok(ReconstructionInput::new(creation_time, now)
            .with_last_schedule_time(self.status.last_schedule_time)
            .with_starting_deadline(self.starting_deadline())
            .include_deadline(include_deadline))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobConditionType {
    Complete,
    Failed,
    Suspended,
    FailureTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCondition {
    #[serde(rename = "type")]
    pub condition_type: JobConditionType,
    pub status: ConditionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<JobCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Value,
    #[serde(default)]
    pub status: JobStatus,
}

impl Job {
    pub fn named(name: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.to_string(),
                ..ObjectMeta::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
apiVersion: batch/v1
kind: CronJob
metadata:
  name: mycronjob
  namespace: snazzycats
  uid: 1a2b3c
  creationTimestamp: "2016-05-19T09:50:00Z"
spec:
  schedule: "0 * * * *"
  timeZone: Europe/Berlin
  startingDeadlineSeconds: 7200
  concurrencyPolicy: Forbid
  jobTemplate:
    metadata:
      labels:
        a: b
    spec:
      activeDeadlineSeconds: 1
status:
  lastScheduleTime: "2016-05-19T09:00:00Z"
"#;

    #[test]
    fn loads_cronjob_manifest_from_yaml() {
        let cj = CronJob::from_yaml(MANIFEST).expect("manifest");
        assert_eq!(cj.metadata.name, "mycronjob");
        assert_eq!(cj.metadata.uid.as_ref().map(Uid::as_str), Some("1a2b3c"));
        assert_eq!(cj.spec.concurrency_policy, ConcurrencyPolicy::Forbid);
        assert_eq!(cj.starting_deadline(), Some(TimeDelta::hours(2)));
        assert_eq!(cj.spec.job_template.metadata.labels["a"], "b");
        assert_eq!(cj.spec.job_template.spec["activeDeadlineSeconds"], 1);
        assert!(!cj.is_suspended());
        assert_eq!(cj.object_reference().key(), "snazzycats/mycronjob");
    }

    #[test]
    fn reconstruction_input_uses_status_and_deadline() {
        let cj = CronJob::from_yaml(MANIFEST).expect("manifest");
        let now = DateTime::parse_from_rfc3339("2016-05-19T10:05:00Z")
            .expect("now")
            .with_timezone(&Utc);
        let input = cj.reconstruction_input(now, true).expect("input");
        assert_eq!(input.last_schedule_time, cj.status.last_schedule_time);
        assert_eq!(input.starting_deadline, Some(TimeDelta::hours(2)));
        assert!(input.include_deadline);

        let mut missing = cj.clone();
        missing.metadata.creation_timestamp = None;
        assert!(matches!(
            missing.reconstruction_input(now, true),
            Err(CronJobError::MissingCreationTimestamp { .. })
        ));
    }

    #[test]
    fn spec_time_zone_overrides_default() {
        let cj = CronJob::from_yaml(MANIFEST).expect("manifest");
        match cj.parse_schedule(Tz::UTC).expect("schedule") {
            ParsedSchedule::Cron(schedule) => {
                assert_eq!(schedule.timezone(), chrono_tz::Europe::Berlin)
            }
            other => panic!("unexpected schedule {other:?}"),
        }
    }
}
