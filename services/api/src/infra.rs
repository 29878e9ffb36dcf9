use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use placement_engine::domain::{
    Application, ApplicationId, ApplicationStatus, JobId, JobPosting, JobPostingStatus,
    NewApplication, StudentId, StudentProfile,
};
use placement_engine::store::{ApplicationStore, JobStore, ProfileStore, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared handles to the in-memory stores backing the portal endpoints.
#[derive(Clone)]
pub(crate) struct PortalState {
    pub(crate) profiles: Arc<InMemoryProfileStore>,
    pub(crate) jobs: Arc<InMemoryJobStore>,
    pub(crate) applications: Arc<InMemoryApplicationStore>,
}

impl PortalState {
    pub(crate) fn empty() -> Self {
        Self {
            profiles: Arc::new(InMemoryProfileStore::default()),
            jobs: Arc::new(InMemoryJobStore::default()),
            applications: Arc::new(InMemoryApplicationStore::default()),
        }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProfileStore {
    profiles: Mutex<Vec<StudentProfile>>,
}

impl InMemoryProfileStore {
    pub(crate) fn insert(&self, profile: StudentProfile) {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.push(profile);
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn find_by_id(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.iter().find(|p| &p.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StudentProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.iter().find(|p| p.email == email).cloned())
    }

    fn find_by_usn(&self, usn: &str) -> Result<Option<StudentProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.iter().find(|p| p.usn == usn).cloned())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryJobStore {
    postings: Mutex<Vec<JobPosting>>,
    sequence: AtomicU64,
}

/// Posting fields as supplied by staff; the store assigns the id.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct NewJobPosting {
    pub(crate) company_name: String,
    pub(crate) role: String,
    pub(crate) job_type: String,
    #[serde(default)]
    pub(crate) location: Option<String>,
    #[serde(default)]
    pub(crate) min_cgpa: f64,
    #[serde(default)]
    pub(crate) max_active_backlogs: u32,
    #[serde(default)]
    pub(crate) eligible_branches: Vec<String>,
    #[serde(default)]
    pub(crate) gender_preference: Option<String>,
    pub(crate) deadline: DateTime<Utc>,
}

impl InMemoryJobStore {
    pub(crate) fn create(&self, posting: NewJobPosting) -> JobPosting {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = JobPosting {
            id: JobId(format!("job-{id:04}")),
            company_name: posting.company_name,
            role: posting.role,
            job_type: posting.job_type,
            location: posting.location,
            min_cgpa: posting.min_cgpa,
            max_active_backlogs: posting.max_active_backlogs,
            eligible_branches: posting.eligible_branches,
            gender_preference: posting.gender_preference,
            deadline: posting.deadline,
            status: JobPostingStatus::Active,
        };
        let mut guard = self.postings.lock().expect("job mutex poisoned");
        guard.push(stored.clone());
        stored
    }

    pub(crate) fn find(&self, id: &JobId) -> Option<JobPosting> {
        let guard = self.postings.lock().expect("job mutex poisoned");
        guard.iter().find(|j| &j.id == id).cloned()
    }
}

impl JobStore for InMemoryJobStore {
    fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>, StoreError> {
        let guard = self.postings.lock().expect("job mutex poisoned");
        Ok(guard
            .iter()
            .filter(|job| job.status == JobPostingStatus::Active && job.deadline >= now)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    records: Mutex<Vec<Application>>,
    sequence: AtomicU64,
}

impl InMemoryApplicationStore {
    pub(crate) fn snapshot(&self) -> Vec<Application> {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .clone()
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.iter().find(|a| &a.id == id).cloned())
    }

    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
    ) -> Result<Vec<Application>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .iter()
            .filter(|a| &a.job_id == job_id && &a.student_id == student_id)
            .cloned()
            .collect())
    }

    fn insert(&self, application: NewApplication) -> Result<Application, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Application {
            id: ApplicationId(format!("app-{id:06}")),
            job_id: application.job_id,
            student_id: application.student_id,
            status: application.status,
            applied_at: application.applied_at,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
        };
        let mut guard = self.records.lock().expect("application mutex poisoned");
        guard.push(stored.clone());
        Ok(stored)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        match guard.iter_mut().find(|a| &a.id == id) {
            Some(application) => {
                application.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
