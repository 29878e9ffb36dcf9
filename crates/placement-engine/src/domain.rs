use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for student profiles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Student record as the placement cell sees it.
///
/// Identity fields (`id`, `usn`, `email`) are immutable once issued; the
/// academic fields change every semester. The tenth/twelfth marks and
/// graduation year are carried for staff dashboards and play no part in
/// eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub full_name: String,
    pub email: String,
    pub usn: String,
    pub branch: String,
    pub cgpa: f64,
    pub active_backlogs: u32,
    pub tenth_percentage: Option<f64>,
    pub twelfth_percentage: Option<f64>,
    pub graduation_year: Option<u16>,
}

/// Publication state of a job posting. Only active postings are surfaced
/// to students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPostingStatus {
    Active,
    Inactive,
    Draft,
}

impl JobPostingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobPostingStatus::Active => "active",
            JobPostingStatus::Inactive => "inactive",
            JobPostingStatus::Draft => "draft",
        }
    }
}

/// A staff-created job posting with its eligibility thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company_name: String,
    pub role: String,
    pub job_type: String,
    pub location: Option<String>,
    pub min_cgpa: f64,
    pub max_active_backlogs: u32,
    /// Empty means every branch is eligible.
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    /// Captured at posting time but not enforced; see the eligibility
    /// rules for why.
    #[serde(default)]
    pub gender_preference: Option<String>,
    pub deadline: DateTime<Utc>,
    pub status: JobPostingStatus,
}

/// Lifecycle status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Raised when a status string falls outside the four-member set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid application status '{0}'")]
pub struct InvalidStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = InvalidStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "selected" => Ok(ApplicationStatus::Selected),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(InvalidStatus(value.to_string())),
        }
    }
}

/// A stored application row.
///
/// Conceptually there is at most one application per (job, student) pair,
/// but the store does not enforce that. Consumers that look rows up by
/// pair must be prepared to see duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub student_id: StudentId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}

/// An application as handed to the store for insertion; the store assigns
/// the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    pub job_id: JobId,
    pub student_id: StudentId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}
