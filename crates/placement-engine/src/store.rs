use chrono::{DateTime, Utc};

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, JobId, JobPosting, NewApplication,
    StudentId, StudentProfile,
};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over student profiles.
///
/// Lookups return `Ok(None)` when no record matches; `Err` is reserved
/// for transport-level failures.
pub trait ProfileStore: Send + Sync {
    fn find_by_id(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<StudentProfile>, StoreError>;
    fn find_by_usn(&self, usn: &str) -> Result<Option<StudentProfile>, StoreError>;
}

/// Storage abstraction over job postings.
pub trait JobStore: Send + Sync {
    /// Postings with `status = active` and `deadline >= now`, in store
    /// order.
    fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>, StoreError>;
}

/// Storage abstraction over applications.
///
/// The store does not guarantee uniqueness of (job_id, student_id);
/// `find_by_job_and_student` may return zero, one, or several rows.
pub trait ApplicationStore: Send + Sync {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
    ) -> Result<Vec<Application>, StoreError>;
    fn insert(&self, application: NewApplication) -> Result<Application, StoreError>;
    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError>;
}
