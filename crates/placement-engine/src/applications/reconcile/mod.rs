//! Shortlist reconciliation: match uploaded rows to student records and
//! upsert application rows, tolerating partial failure.

mod parser;

pub use parser::{ShortlistRow, ShortlistTable};

use std::io::Read;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{ApplicationStatus, JobId, NewApplication, StudentProfile};
use crate::store::{ApplicationStore, ProfileStore, StoreError};

/// Aggregate summary returned to the caller after every row has been
/// attempted.
///
/// `total_processed` counts every row read; rows that matched no profile
/// contribute to it alone. A report with `matched_students = 0` is a
/// success, not an error — it tells staff to check email/USN alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub total_processed: u32,
    pub matched_students: u32,
    pub updated_applications: u32,
    pub created_applications: u32,
    pub failed_rows: u32,
}

/// Structural failures that abort the whole reconciliation before any row
/// is processed.
#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
    #[error("shortlist file must contain an 'email' or 'usn' column")]
    MissingIdentifierColumns,
    #[error("invalid shortlist data: {0}")]
    Csv(#[from] csv::Error),
}

enum RowOutcome {
    Unmatched,
    Updated,
    Created,
}

/// Reconciles an uploaded shortlist against the profile and application
/// stores.
pub struct ShortlistReconciler<P, A> {
    profiles: Arc<P>,
    applications: Arc<A>,
}

impl<P, A> ShortlistReconciler<P, A>
where
    P: ProfileStore,
    A: ApplicationStore,
{
    pub fn new(profiles: Arc<P>, applications: Arc<A>) -> Self {
        Self {
            profiles,
            applications,
        }
    }

    /// Parse CSV bytes and reconcile them in one step.
    pub fn reconcile_reader<R: Read>(
        &self,
        job_id: &JobId,
        target_status: ApplicationStatus,
        reader: R,
        now: DateTime<Utc>,
    ) -> Result<ReconciliationReport, ShortlistError> {
        let table = ShortlistTable::from_reader(reader)?;
        self.reconcile(job_id, target_status, &table, now)
    }

    /// Run every row of the table against the stores.
    ///
    /// Structural problems fail fast with nothing applied. Per-row store
    /// failures are counted in `failed_rows` and never abort the rows
    /// that follow. There is no cross-row transaction; re-running the
    /// same table converges to "all updated, none created".
    pub fn reconcile(
        &self,
        job_id: &JobId,
        target_status: ApplicationStatus,
        table: &ShortlistTable,
        now: DateTime<Utc>,
    ) -> Result<ReconciliationReport, ShortlistError> {
        if !table.has_identifier_column() {
            return Err(ShortlistError::MissingIdentifierColumns);
        }

        let mut report = ReconciliationReport::default();

        for row in &table.rows {
            report.total_processed += 1;

            match self.reconcile_row(job_id, target_status, row, now) {
                Ok(RowOutcome::Unmatched) => {
                    debug!(row = report.total_processed, "no profile matched row");
                }
                Ok(RowOutcome::Updated) => {
                    report.matched_students += 1;
                    report.updated_applications += 1;
                }
                Ok(RowOutcome::Created) => {
                    report.matched_students += 1;
                    report.created_applications += 1;
                }
                Err(err) => {
                    warn!(row = report.total_processed, error = %err, "shortlist row failed, continuing");
                    report.failed_rows += 1;
                }
            }
        }

        Ok(report)
    }

    fn reconcile_row(
        &self,
        job_id: &JobId,
        target_status: ApplicationStatus,
        row: &ShortlistRow,
        now: DateTime<Utc>,
    ) -> Result<RowOutcome, StoreError> {
        let profile = match self.match_profile(row)? {
            Some(profile) => profile,
            None => return Ok(RowOutcome::Unmatched),
        };

        let existing = self
            .applications
            .find_by_job_and_student(job_id, &profile.id)?;

        // Duplicate (job, student) rows are a store inconsistency we
        // tolerate: operate on the most recently created one and leave
        // the rest untouched.
        match existing.iter().max_by_key(|application| application.applied_at) {
            Some(current) => {
                self.applications.update_status(&current.id, target_status)?;
                Ok(RowOutcome::Updated)
            }
            None => {
                self.applications.insert(NewApplication {
                    job_id: job_id.clone(),
                    student_id: profile.id,
                    status: target_status,
                    applied_at: now,
                    cover_letter: None,
                    resume_url: None,
                })?;
                Ok(RowOutcome::Created)
            }
        }
    }

    /// Email match first, then USN; first match wins.
    fn match_profile(&self, row: &ShortlistRow) -> Result<Option<StudentProfile>, StoreError> {
        if let Some(email) = row.email() {
            if let Some(profile) = self.profiles.find_by_email(email)? {
                return Ok(Some(profile));
            }
        }

        if let Some(usn) = row.usn() {
            if let Some(profile) = self.profiles.find_by_usn(usn)? {
                return Ok(Some(profile));
            }
        }

        Ok(None)
    }
}
