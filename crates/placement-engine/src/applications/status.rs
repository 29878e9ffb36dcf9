use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::domain::{ApplicationId, ApplicationStatus};
use crate::store::{ApplicationStore, StoreError};

/// Error raised by a single status update.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("application not found")]
    NotFound,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for StatusError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => StatusError::NotFound,
            other => StatusError::Store(other),
        }
    }
}

/// Per-id failure classification surfaced by the bulk path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateErrorKind {
    NotFound,
    StoreUnavailable,
}

/// Outcome of a bulk update: every id lands in exactly one of the two
/// sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkStatusResult {
    pub succeeded: BTreeSet<ApplicationId>,
    pub failed: BTreeMap<ApplicationId, UpdateErrorKind>,
}

impl BulkStatusResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Status relabeling over the application store.
///
/// Any of the four statuses is accepted as a target from any current
/// status; the portal's observed workflow places no restriction on
/// transitions, so this is a relabeling operation rather than a strict
/// state machine. Whether a stricter transition table is wanted is an
/// open product question.
pub struct ApplicationStatusMachine<A> {
    applications: Arc<A>,
}

impl<A> ApplicationStatusMachine<A>
where
    A: ApplicationStore,
{
    pub fn new(applications: Arc<A>) -> Self {
        Self { applications }
    }

    /// Persist `status` on the application and return the prior value so
    /// the caller can revert a speculative local update if a later,
    /// unrelated step fails.
    pub fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationStatus, StatusError> {
        let current = self
            .applications
            .fetch(id)?
            .ok_or(StatusError::NotFound)?;

        self.applications.update_status(id, status)?;
        Ok(current.status)
    }

    /// One independent write per id; a failure on one id never blocks or
    /// rolls back the others, and the result only returns once every
    /// write has settled.
    pub fn bulk_set_status(
        &self,
        ids: &BTreeSet<ApplicationId>,
        status: ApplicationStatus,
    ) -> BulkStatusResult {
        let mut result = BulkStatusResult::default();

        for id in ids {
            match self.set_status(id, status) {
                Ok(_) => {
                    result.succeeded.insert(id.clone());
                }
                Err(StatusError::NotFound) => {
                    result.failed.insert(id.clone(), UpdateErrorKind::NotFound);
                }
                Err(StatusError::Store(err)) => {
                    warn!(application = %id.0, error = %err, "bulk status write failed");
                    result
                        .failed
                        .insert(id.clone(), UpdateErrorKind::StoreUnavailable);
                }
            }
        }

        result
    }
}
