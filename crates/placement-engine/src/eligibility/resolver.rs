use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{JobPosting, StudentId};
use crate::eligibility::evaluate;
use crate::store::{JobStore, ProfileStore, StoreError};

/// Remote source of precomputed eligible-job sets, e.g. the hosted
/// placement API. Consulted before the local computation when configured.
pub trait EligibilityFeed: Send + Sync {
    fn eligible_jobs(&self, student_id: &StudentId) -> Result<Vec<JobPosting>, FeedError>;
}

/// Feed failures are availability failures; anything else the feed could
/// report is a payload it should have served.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("eligibility feed unavailable: {0}")]
    Unavailable(String),
}

/// Error raised when resolving a student's eligible postings.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("student profile not found")]
    ProfileNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the evaluator across the active job set for one student.
///
/// The local computation is the reference implementation; a configured
/// feed is an optimization, and a feed outage falls back to the local
/// path rather than surfacing an error.
pub struct JobEligibilityResolver<P, J> {
    profiles: Arc<P>,
    jobs: Arc<J>,
    feed: Option<Arc<dyn EligibilityFeed>>,
}

impl<P, J> JobEligibilityResolver<P, J>
where
    P: ProfileStore,
    J: JobStore,
{
    pub fn new(profiles: Arc<P>, jobs: Arc<J>) -> Self {
        Self {
            profiles,
            jobs,
            feed: None,
        }
    }

    pub fn with_feed(profiles: Arc<P>, jobs: Arc<J>, feed: Arc<dyn EligibilityFeed>) -> Self {
        Self {
            profiles,
            jobs,
            feed: Some(feed),
        }
    }

    /// Postings the student may see and apply to, in store order.
    ///
    /// Idempotent read: two calls with no intervening writes return the
    /// same ordered set.
    pub fn resolve_eligible_jobs(
        &self,
        student_id: &StudentId,
        now: DateTime<Utc>,
    ) -> Result<Vec<JobPosting>, ResolveError> {
        if let Some(feed) = &self.feed {
            match feed.eligible_jobs(student_id) {
                Ok(postings) => return Ok(postings),
                Err(FeedError::Unavailable(detail)) => {
                    warn!(%detail, "eligibility feed unavailable, recomputing locally");
                }
            }
        }

        self.resolve_locally(student_id, now)
    }

    /// The reference computation, run directly against the stores.
    pub fn resolve_locally(
        &self,
        student_id: &StudentId,
        now: DateTime<Utc>,
    ) -> Result<Vec<JobPosting>, ResolveError> {
        let profile = self
            .profiles
            .find_by_id(student_id)?
            .ok_or(ResolveError::ProfileNotFound)?;

        let active = self.jobs.list_active(now)?;

        Ok(active
            .into_iter()
            .filter(|job| evaluate(&profile, job).eligible)
            .collect())
    }
}
