//! Pure eligibility evaluation for (student, posting) pairs.
//!
//! [`evaluate`] is deterministic and performs no I/O; orchestration across
//! the active job set lives in [`resolver`].

mod rules;

pub mod resolver;

pub use resolver::{EligibilityFeed, FeedError, JobEligibilityResolver, ResolveError};

use serde::{Deserialize, Serialize};

use crate::domain::{JobPosting, StudentProfile};

/// Outcome of evaluating one student against one posting.
///
/// A student may fail several rules at once; only the first failing rule
/// in evaluation order supplies the surfaced reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EligibilityVerdict {
    fn pass() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    fn fail(reason: String) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

/// Apply the eligibility rules in their fixed order and report the first
/// failure.
pub fn evaluate(profile: &StudentProfile, job: &JobPosting) -> EligibilityVerdict {
    let checks = [
        rules::cgpa_threshold,
        rules::branch_membership,
        rules::backlog_limit,
        rules::gender_preference,
    ];

    for check in checks {
        if let Some(reason) = check(profile, job) {
            return EligibilityVerdict::fail(reason);
        }
    }

    EligibilityVerdict::pass()
}
