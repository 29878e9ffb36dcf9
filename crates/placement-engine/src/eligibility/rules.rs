use crate::domain::{JobPosting, StudentProfile};

/// The student's CGPA must meet the posting's threshold.
pub(crate) fn cgpa_threshold(profile: &StudentProfile, job: &JobPosting) -> Option<String> {
    if profile.cgpa < job.min_cgpa {
        return Some(format!(
            "CGPA {} is below required {}",
            profile.cgpa, job.min_cgpa
        ));
    }
    None
}

/// An empty branch list on the posting admits every branch.
pub(crate) fn branch_membership(profile: &StudentProfile, job: &JobPosting) -> Option<String> {
    if job.eligible_branches.is_empty() {
        return None;
    }
    if !job
        .eligible_branches
        .iter()
        .any(|branch| branch == &profile.branch)
    {
        return Some(format!("{} branch is not eligible", profile.branch));
    }
    None
}

/// Only students carrying backlogs are checked against the limit; a clean
/// record passes regardless of how strict the posting is.
pub(crate) fn backlog_limit(profile: &StudentProfile, job: &JobPosting) -> Option<String> {
    if profile.active_backlogs > 0 && profile.active_backlogs > job.max_active_backlogs {
        return Some(format!(
            "active backlogs ({}) exceed limit ({})",
            profile.active_backlogs, job.max_active_backlogs
        ));
    }
    None
}

/// Postings carry a `gender_preference`, but no corresponding field exists
/// on the student profile, so the rule cannot be enforced and always
/// passes. Kept as an explicit rule rather than dropped so the gap stays
/// visible; pending product clarification on whether the posting field is
/// a deferred feature or dead data.
pub(crate) fn gender_preference(_profile: &StudentProfile, _job: &JobPosting) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobId, JobPosting, JobPostingStatus, StudentId, StudentProfile};
    use crate::eligibility::evaluate;
    use chrono::{TimeZone, Utc};

    fn profile() -> StudentProfile {
        StudentProfile {
            id: StudentId("stu-1".to_string()),
            full_name: "Asha Rao".to_string(),
            email: "asha@example.edu".to_string(),
            usn: "1XX21CS001".to_string(),
            branch: "CSE".to_string(),
            cgpa: 8.0,
            active_backlogs: 0,
            tenth_percentage: Some(91.2),
            twelfth_percentage: Some(89.0),
            graduation_year: Some(2026),
        }
    }

    fn posting() -> JobPosting {
        JobPosting {
            id: JobId("job-1".to_string()),
            company_name: "Acme Systems".to_string(),
            role: "Software Engineer".to_string(),
            job_type: "full-time".to_string(),
            location: Some("Bengaluru".to_string()),
            min_cgpa: 7.0,
            max_active_backlogs: 0,
            eligible_branches: Vec::new(),
            gender_preference: None,
            deadline: Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 59).unwrap(),
            status: JobPostingStatus::Active,
        }
    }

    #[test]
    fn cgpa_below_threshold_fails_regardless_of_other_fields() {
        let mut student = profile();
        student.cgpa = 6.5;
        let mut job = posting();
        job.min_cgpa = 7.5;
        job.eligible_branches = vec!["ECE".to_string()];
        job.max_active_backlogs = 0;

        let verdict = evaluate(&student, &job);
        assert!(!verdict.eligible);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("CGPA 6.5 is below required 7.5")
        );
    }

    #[test]
    fn branch_exclusion_is_reported_when_cgpa_passes() {
        let student = profile();
        let mut job = posting();
        job.eligible_branches = vec!["ECE".to_string(), "ME".to_string()];

        let verdict = evaluate(&student, &job);
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason.as_deref(), Some("CSE branch is not eligible"));
    }

    #[test]
    fn empty_branch_list_admits_every_branch() {
        let mut student = profile();
        student.branch = "CIV".to_string();
        let verdict = evaluate(&student, &posting());
        assert!(verdict.eligible);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn backlogs_beyond_limit_fail_with_the_backlog_reason() {
        let mut student = profile();
        student.cgpa = 8.0;
        student.active_backlogs = 1;
        let mut job = posting();
        job.min_cgpa = 7.5;
        job.eligible_branches = vec!["CSE".to_string()];
        job.max_active_backlogs = 0;

        let verdict = evaluate(&student, &job);
        assert!(!verdict.eligible);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("active backlogs (1) exceed limit (0)")
        );
    }

    #[test]
    fn backlogs_within_limit_pass() {
        let mut student = profile();
        student.active_backlogs = 2;
        let mut job = posting();
        job.max_active_backlogs = 2;

        assert!(evaluate(&student, &job).eligible);
    }

    #[test]
    fn gender_preference_is_not_enforced() {
        let mut job = posting();
        job.gender_preference = Some("female".to_string());
        assert!(evaluate(&profile(), &job).eligible);
    }

    #[test]
    fn first_failing_rule_wins() {
        let mut student = profile();
        student.cgpa = 5.0;
        student.branch = "ME".to_string();
        student.active_backlogs = 4;
        let mut job = posting();
        job.min_cgpa = 7.0;
        job.eligible_branches = vec!["CSE".to_string()];

        let verdict = evaluate(&student, &job);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("CGPA 5 is below required 7")
        );
    }
}
