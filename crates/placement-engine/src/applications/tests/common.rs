use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, JobId, NewApplication, StudentId,
    StudentProfile,
};
use crate::store::{ApplicationStore, ProfileStore, StoreError};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap()
}

pub(super) fn job_id() -> JobId {
    JobId("job-acme".to_string())
}

pub(super) fn profile(id: &str, email: &str, usn: &str) -> StudentProfile {
    StudentProfile {
        id: StudentId(id.to_string()),
        full_name: format!("Student {id}"),
        email: email.to_string(),
        usn: usn.to_string(),
        branch: "CSE".to_string(),
        cgpa: 8.1,
        active_backlogs: 0,
        tenth_percentage: Some(90.0),
        twelfth_percentage: Some(88.5),
        graduation_year: Some(2026),
    }
}

pub(super) fn roster() -> Vec<StudentProfile> {
    vec![
        profile("stu-1", "asha@example.edu", "1XX21CS001"),
        profile("stu-2", "ravi@example.edu", "1XX21CS002"),
        profile("stu-3", "meera@example.edu", "1XX21CS003"),
    ]
}

pub(super) struct MemoryProfileStore {
    profiles: Vec<StudentProfile>,
}

impl MemoryProfileStore {
    pub(super) fn with_roster() -> Arc<Self> {
        Arc::new(Self { profiles: roster() })
    }
}

impl ProfileStore for MemoryProfileStore {
    fn find_by_id(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        Ok(self.profiles.iter().find(|p| &p.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StudentProfile>, StoreError> {
        Ok(self.profiles.iter().find(|p| p.email == email).cloned())
    }

    fn find_by_usn(&self, usn: &str) -> Result<Option<StudentProfile>, StoreError> {
        Ok(self.profiles.iter().find(|p| p.usn == usn).cloned())
    }
}

pub(super) struct UnavailableProfileStore;

impl ProfileStore for UnavailableProfileStore {
    fn find_by_id(&self, _id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<StudentProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find_by_usn(&self, _usn: &str) -> Result<Option<StudentProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryApplicationStore {
    records: Mutex<Vec<Application>>,
    sequence: AtomicU64,
}

impl MemoryApplicationStore {
    pub(super) fn seed(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
        status: ApplicationStatus,
        applied_at: DateTime<Utc>,
    ) -> ApplicationId {
        self.insert(NewApplication {
            job_id: job_id.clone(),
            student_id: student_id.clone(),
            status,
            applied_at,
            cover_letter: None,
            resume_url: None,
        })
        .expect("memory insert succeeds")
        .id
    }

    pub(super) fn records(&self) -> Vec<Application> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl ApplicationStore for MemoryApplicationStore {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|a| &a.id == id).cloned())
    }

    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
    ) -> Result<Vec<Application>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
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
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.push(stored.clone());
        Ok(stored)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        match guard.iter_mut().find(|a| &a.id == id) {
            Some(application) => {
                application.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

/// Delegates to a memory store but fails `update_status` for a chosen set
/// of ids, for partial-failure scenarios.
pub(super) struct FailingUpdateStore {
    pub(super) inner: Arc<MemoryApplicationStore>,
    pub(super) fail_updates: BTreeSet<ApplicationId>,
}

impl ApplicationStore for FailingUpdateStore {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        self.inner.fetch(id)
    }

    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &StudentId,
    ) -> Result<Vec<Application>, StoreError> {
        self.inner.find_by_job_and_student(job_id, student_id)
    }

    fn insert(&self, application: NewApplication) -> Result<Application, StoreError> {
        self.inner.insert(application)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        if self.fail_updates.contains(id) {
            return Err(StoreError::Unavailable("write timed out".to_string()));
        }
        self.inner.update_status(id, status)
    }
}

pub(super) struct UnavailableApplicationStore;

impl ApplicationStore for UnavailableApplicationStore {
    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find_by_job_and_student(
        &self,
        _job_id: &JobId,
        _student_id: &StudentId,
    ) -> Result<Vec<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _application: NewApplication) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}
