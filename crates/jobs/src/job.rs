use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use quoteflow_clients::{ClientId, JobSiteId};
use quoteflow_core::{DomainError, DomainResult, EntityId};

/// Job identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub EntityId);

impl JobId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for JobId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Job status lifecycle. The wire form keeps the original hyphenated
/// vocabulary (`in-progress`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in-progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Actions that move a job through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobAction {
    Start,
    Complete,
    Cancel,
}

impl core::fmt::Display for JobAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            JobAction::Start => "start",
            JobAction::Complete => "complete",
            JobAction::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// The legal-transition table, in one place.
fn transition(from: JobStatus, action: JobAction) -> DomainResult<JobStatus> {
    use JobAction::*;
    use JobStatus::*;

    match (from, action) {
        (Scheduled, Start) => Ok(InProgress),
        (InProgress, Complete) => Ok(Completed),
        (Scheduled | InProgress, Cancel) => Ok(Cancelled),
        (from, action) => Err(DomainError::invalid_transition(format!(
            "cannot {action} a {from} job"
        ))),
    }
}

/// A booked piece of work on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    id: JobId,
    title: String,
    description: Option<String>,
    client_id: ClientId,
    job_site_id: Option<JobSiteId>,
    assigned_to: Option<String>,
    scheduled_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    status: JobStatus,
}

impl Job {
    pub fn new(
        id: JobId,
        client_id: ClientId,
        title: impl Into<String>,
        scheduled_date: NaiveDate,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("job title must not be empty"));
        }
        Ok(Self {
            id,
            title,
            description: None,
            client_id,
            job_site_id: None,
            assigned_to: None,
            scheduled_date,
            start_time: None,
            end_time: None,
            status: JobStatus::Scheduled,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn job_site_id(&self) -> Option<JobSiteId> {
        self.job_site_id
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, JobStatus::Scheduled | JobStatus::InProgress)
    }

    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self.clone()
        }
    }

    pub fn with_job_site(&self, job_site_id: JobSiteId) -> Self {
        Self {
            job_site_id: Some(job_site_id),
            ..self.clone()
        }
    }

    pub fn assigned(&self, worker: impl Into<String>) -> Self {
        Self {
            assigned_to: Some(worker.into()),
            ..self.clone()
        }
    }

    pub fn with_hours(&self, start: NaiveTime, end: NaiveTime) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::validation("job must end after it starts"));
        }
        Ok(Self {
            start_time: Some(start),
            end_time: Some(end),
            ..self.clone()
        })
    }

    /// Move the booking to another day. Legal while the job is still open.
    pub fn rescheduled(&self, date: NaiveDate) -> DomainResult<Self> {
        if !self.is_open() {
            return Err(DomainError::invalid_transition(format!(
                "cannot reschedule a {} job",
                self.status
            )));
        }
        Ok(Self {
            scheduled_date: date,
            ..self.clone()
        })
    }

    pub fn started(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, JobAction::Start)?,
            ..self.clone()
        })
    }

    pub fn completed(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, JobAction::Complete)?,
            ..self.clone()
        })
    }

    pub fn cancelled(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, JobAction::Cancel)?,
            ..self.clone()
        })
    }
}

/// Jobs booked on a given calendar day, in input order.
pub fn jobs_on(jobs: &[Job], date: NaiveDate) -> Vec<&Job> {
    jobs.iter().filter(|j| j.scheduled_date == date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client_id() -> ClientId {
        ClientId::new(EntityId::new())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn test_job(title: &str, d: u32) -> Job {
        Job::new(JobId::new(EntityId::new()), test_client_id(), title, day(d)).unwrap()
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Job::new(JobId::new(EntityId::new()), test_client_id(), " ", day(15)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn lifecycle_runs_scheduled_in_progress_completed() {
        let job = test_job("Bathroom Renovation", 15);
        assert_eq!(job.status(), JobStatus::Scheduled);

        let started = job.started().unwrap();
        assert_eq!(started.status(), JobStatus::InProgress);

        let done = started.completed().unwrap();
        assert_eq!(done.status(), JobStatus::Completed);

        assert!(done.started().is_err());
        assert!(done.cancelled().is_err());
    }

    #[test]
    fn completing_an_unstarted_job_is_rejected() {
        let err = test_job("Kitchen Plumbing", 18).completed().unwrap_err();
        match err {
            DomainError::InvalidTransition(msg) => assert!(msg.contains("scheduled")),
            _ => panic!("Expected InvalidTransition"),
        }
    }

    #[test]
    fn open_jobs_can_be_cancelled_and_rescheduled() {
        let job = test_job("Emergency Repair", 22);
        let moved = job.rescheduled(day(23)).unwrap();
        assert_eq!(moved.scheduled_date(), day(23));

        let cancelled = moved.cancelled().unwrap();
        assert_eq!(cancelled.status(), JobStatus::Cancelled);
        assert!(cancelled.rescheduled(day(24)).is_err());
    }

    #[test]
    fn hours_must_run_forward() {
        let job = test_job("Emergency Repair", 22);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();

        assert!(job.with_hours(nine, five).is_ok());
        assert!(job.with_hours(five, nine).is_err());
        assert!(job.with_hours(nine, nine).is_err());
    }

    #[test]
    fn calendar_buckets_by_scheduled_day() {
        let jobs = vec![
            test_job("Bathroom Renovation", 15),
            test_job("Kitchen Plumbing", 18),
            test_job("Emergency Repair", 15),
        ];
        let on_fifteenth = jobs_on(&jobs, day(15));
        assert_eq!(on_fifteenth.len(), 2);
        assert_eq!(on_fifteenth[0].title(), "Bathroom Renovation");
        assert_eq!(on_fifteenth[1].title(), "Emergency Repair");
        assert!(jobs_on(&jobs, day(1)).is_empty());
    }

    #[test]
    fn status_serializes_with_the_hyphenated_vocabulary() {
        let started = test_job("Bathroom Renovation", 15).started().unwrap();
        let value = serde_json::to_value(&started).unwrap();
        assert_eq!(value["status"], "in-progress");
    }
}
