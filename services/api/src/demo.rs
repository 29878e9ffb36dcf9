use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Duration, Utc};
use clap::Args;

use crate::infra::{NewJobPosting, PortalState};
use placement_engine::applications::{ApplicationStatusMachine, ShortlistReconciler};
use placement_engine::domain::{
    ApplicationId, ApplicationStatus, JobPosting, StudentId, StudentProfile,
};
use placement_engine::eligibility::{evaluate, JobEligibilityResolver, ResolveError};
use placement_engine::error::AppError;
use placement_engine::store::ProfileStore;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional shortlist CSV to reconcile instead of the built-in sample.
    #[arg(long)]
    pub(crate) shortlist_csv: Option<PathBuf>,
    /// Target status applied by the shortlist upload (default: shortlisted).
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Skip the bulk relabeling portion of the demo.
    #[arg(long)]
    pub(crate) skip_bulk: bool,
}

/// Load a small roster and a handful of postings so the endpoints have
/// something to serve. Returns the created postings in store order.
pub(crate) fn seed_sample_data(portal: &PortalState) -> Vec<JobPosting> {
    let roster = [
        ("stu-1", "Asha Rao", "asha@example.edu", "1XX21CS001", "CSE", 8.4, 0),
        ("stu-2", "Ravi Kumar", "ravi@example.edu", "1XX21EC042", "ECE", 6.2, 2),
        ("stu-3", "Meera Iyer", "meera@example.edu", "1XX21CS003", "CSE", 7.9, 1),
    ];
    for (id, name, email, usn, branch, cgpa, backlogs) in roster {
        portal.profiles.insert(StudentProfile {
            id: StudentId(id.to_string()),
            full_name: name.to_string(),
            email: email.to_string(),
            usn: usn.to_string(),
            branch: branch.to_string(),
            cgpa,
            active_backlogs: backlogs,
            tenth_percentage: None,
            twelfth_percentage: None,
            graduation_year: Some(2026),
        });
    }

    let deadline = Utc::now() + Duration::days(30);
    vec![
        portal.jobs.create(NewJobPosting {
            company_name: "Acme Systems".to_string(),
            role: "Software Engineer".to_string(),
            job_type: "full-time".to_string(),
            location: Some("Bengaluru".to_string()),
            min_cgpa: 7.0,
            max_active_backlogs: 0,
            eligible_branches: vec!["CSE".to_string()],
            gender_preference: None,
            deadline,
        }),
        portal.jobs.create(NewJobPosting {
            company_name: "Globex Analytics".to_string(),
            role: "Data Analyst".to_string(),
            job_type: "full-time".to_string(),
            location: Some("Hyderabad".to_string()),
            min_cgpa: 6.0,
            max_active_backlogs: 2,
            eligible_branches: Vec::new(),
            gender_preference: None,
            deadline,
        }),
        portal.jobs.create(NewJobPosting {
            company_name: "Initech Labs".to_string(),
            role: "Firmware Intern".to_string(),
            job_type: "internship".to_string(),
            location: None,
            min_cgpa: 7.5,
            max_active_backlogs: 0,
            eligible_branches: vec!["CSE".to_string(), "ECE".to_string()],
            gender_preference: None,
            deadline,
        }),
    ]
}

const SAMPLE_SHORTLIST: &str = "email,usn\n\
                                asha@example.edu,\n\
                                ,1XX21CS003\n\
                                unknown@example.edu,\n";

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        shortlist_csv,
        status,
        skip_bulk,
    } = args;

    let target = match status {
        Some(raw) => ApplicationStatus::from_str(&raw)?,
        None => ApplicationStatus::Shortlisted,
    };

    println!("Campus placement engine demo");

    let portal = PortalState::empty();
    let postings = seed_sample_data(&portal);
    println!("- Seeded sample roster and {} active postings", postings.len());

    let now = Utc::now();
    let resolver = JobEligibilityResolver::new(portal.profiles.clone(), portal.jobs.clone());
    println!("\nEligibility per student");
    for student_id in ["stu-1", "stu-2", "stu-3"] {
        let id = StudentId(student_id.to_string());
        let eligible = resolver.resolve_eligible_jobs(&id, now)?;
        let companies: Vec<_> = eligible
            .iter()
            .map(|job| job.company_name.as_str())
            .collect();
        println!("- {student_id}: {}", companies.join(", "));

        let profile = portal
            .profiles
            .find_by_id(&id)
            .map_err(ResolveError::from)?;
        if let Some(profile) = profile {
            for job in &postings {
                let verdict = evaluate(&profile, job);
                if let Some(reason) = verdict.reason {
                    println!("    not eligible for {}: {}", job.company_name, reason);
                }
            }
        }
    }

    let shortlist = match shortlist_csv {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_SHORTLIST.to_string(),
    };

    let job = &postings[0];
    println!(
        "\nReconciling shortlist for {} ({})",
        job.company_name,
        target.label()
    );
    let reconciler = ShortlistReconciler::new(portal.profiles.clone(), portal.applications.clone());
    let report = reconciler.reconcile_reader(&job.id, target, Cursor::new(shortlist), now)?;
    println!(
        "- {} rows processed | {} matched | {} updated | {} created | {} failed",
        report.total_processed,
        report.matched_students,
        report.updated_applications,
        report.created_applications,
        report.failed_rows
    );
    if report.matched_students == 0 {
        println!("  No rows matched; check email/USN alignment with the roster");
    }

    if skip_bulk {
        return Ok(());
    }

    let machine = ApplicationStatusMachine::new(portal.applications.clone());
    let mut ids: BTreeSet<ApplicationId> = portal
        .applications
        .snapshot()
        .into_iter()
        .map(|application| application.id)
        .collect();
    // A stale id demonstrates per-id failure attribution.
    ids.insert(ApplicationId("app-999999".to_string()));

    println!("\nBulk relabeling {} applications to selected", ids.len());
    let result = machine.bulk_set_status(&ids, ApplicationStatus::Selected);
    println!(
        "- {} succeeded | {} failed",
        result.succeeded.len(),
        result.failed.len()
    );
    for (id, kind) in &result.failed {
        println!("    {}: {:?}", id.0, kind);
    }

    Ok(())
}
