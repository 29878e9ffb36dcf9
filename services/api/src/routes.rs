use std::collections::BTreeSet;
use std::io::Cursor;
use std::str::FromStr;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::infra::{AppState, NewJobPosting, PortalState};
use placement_engine::applications::{
    export::write_applications_csv, ApplicationStatusMachine, ReconciliationReport,
    ShortlistReconciler, StatusError,
};
use placement_engine::domain::{ApplicationId, ApplicationStatus, JobId, StudentId};
use placement_engine::eligibility::{JobEligibilityResolver, ResolveError};
use placement_engine::store::JobStore;

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkUpdateStatusRequest {
    pub(crate) ids: Vec<String>,
    pub(crate) status: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub(crate) status_filter: Option<String>,
    #[serde(default)]
    pub(crate) job_id: Option<String>,
}

/// Payload returned by the shortlist upload endpoint; mirrors the summary
/// card staff see after an upload.
#[derive(Debug, Serialize)]
pub(crate) struct ShortlistUploadData {
    #[serde(flatten)]
    pub(crate) report: ReconciliationReport,
    pub(crate) job_id: String,
    pub(crate) status_applied: &'static str,
}

pub(crate) fn portal_router(state: PortalState) -> Router {
    Router::new()
        .route(
            "/api/jobs",
            get(list_jobs_endpoint).post(create_job_endpoint),
        )
        .route(
            "/api/jobs/eligible/:student_id",
            get(eligible_jobs_endpoint),
        )
        .route(
            "/api/applications/:application_id/status",
            put(update_status_endpoint),
        )
        .route(
            "/api/applications/status/bulk",
            post(bulk_update_status_endpoint),
        )
        .route(
            "/api/applications/shortlist/upload",
            post(shortlist_upload_endpoint),
        )
        .route("/api/applications/export", get(export_applications_endpoint))
        .with_state(state)
}

pub(crate) fn with_portal_routes(state: PortalState) -> Router {
    portal_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "success": false, "message": message.into() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn list_jobs_endpoint(State(state): State<PortalState>) -> Response {
    match state.jobs.list_active(Utc::now()) {
        Ok(postings) => {
            let count = postings.len();
            let payload = json!({
                "success": true,
                "data": postings,
                "count": count,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
    }
}

pub(crate) async fn create_job_endpoint(
    State(state): State<PortalState>,
    Json(request): Json<NewJobPosting>,
) -> Response {
    let posting = state.jobs.create(request);
    info!(company = %posting.company_name, role = %posting.role, "job posted");

    let payload = json!({
        "success": true,
        "data": posting,
        "message": "Job created successfully",
    });
    (StatusCode::CREATED, Json(payload)).into_response()
}

pub(crate) async fn eligible_jobs_endpoint(
    State(state): State<PortalState>,
    Path(student_id): Path<String>,
) -> Response {
    let resolver = JobEligibilityResolver::new(state.profiles.clone(), state.jobs.clone());

    match resolver.resolve_eligible_jobs(&StudentId(student_id), Utc::now()) {
        Ok(postings) => {
            let message = format!("Found {} eligible jobs", postings.len());
            let payload = json!({
                "success": true,
                "data": postings,
                "message": message,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ResolveError::ProfileNotFound) => {
            error_response(StatusCode::NOT_FOUND, "Student profile not found")
        }
        Err(ResolveError::Store(err)) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}

pub(crate) async fn update_status_endpoint(
    State(state): State<PortalState>,
    Path(application_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Response {
    let status = match ApplicationStatus::from_str(&request.status) {
        Ok(status) => status,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let machine = ApplicationStatusMachine::new(state.applications.clone());
    match machine.set_status(&ApplicationId(application_id), status) {
        Ok(previous) => {
            let payload = json!({
                "success": true,
                "message": format!("Application status updated to {}", status.label()),
                "data": { "previous_status": previous.label() },
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(StatusError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "Application not found")
        }
        Err(StatusError::Store(err)) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}

pub(crate) async fn bulk_update_status_endpoint(
    State(state): State<PortalState>,
    Json(request): Json<BulkUpdateStatusRequest>,
) -> Response {
    let status = match ApplicationStatus::from_str(&request.status) {
        Ok(status) => status,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let ids: BTreeSet<ApplicationId> = request.ids.into_iter().map(ApplicationId).collect();
    let machine = ApplicationStatusMachine::new(state.applications.clone());
    let result = machine.bulk_set_status(&ids, status);

    let payload = json!({
        "success": true,
        "message": format!(
            "{} applications updated, {} failed",
            result.succeeded.len(),
            result.failed.len()
        ),
        "data": result,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn shortlist_upload_endpoint(
    State(state): State<PortalState>,
    mut multipart: Multipart,
) -> Response {
    let mut job_id = None;
    let mut status = None;
    let mut file = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().map(str::to_string);
                match name.as_deref() {
                    Some("job_id") => job_id = field.text().await.ok(),
                    Some("status") => status = field.text().await.ok(),
                    Some("shortlist_file") => file = field.bytes().await.ok(),
                    _ => {}
                }
            }
            Ok(None) => break,
            Err(err) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid multipart upload: {err}"),
                )
            }
        }
    }

    let (Some(job_id), Some(status), Some(file)) = (job_id, status, file) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "job_id, status, and shortlist_file are required",
        );
    };

    let Some(job) = state.jobs.find(&JobId(job_id)) else {
        return error_response(StatusCode::NOT_FOUND, "Job not found");
    };

    let target = match ApplicationStatus::from_str(&status) {
        Ok(status) => status,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let reconciler =
        ShortlistReconciler::new(state.profiles.clone(), state.applications.clone());
    match reconciler.reconcile_reader(&job.id, target, Cursor::new(file), Utc::now()) {
        Ok(report) => {
            info!(
                job = %job.id.0,
                total = report.total_processed,
                matched = report.matched_students,
                "shortlist processed"
            );

            let message = if report.matched_students == 0 {
                "No students were matched; check that the email addresses or USNs in the file match student records".to_string()
            } else {
                format!(
                    "Processed {} rows: {} updated, {} created",
                    report.total_processed,
                    report.updated_applications,
                    report.created_applications
                )
            };

            let payload = json!({
                "success": true,
                "message": message,
                "data": ShortlistUploadData {
                    report,
                    job_id: job.id.0,
                    status_applied: target.label(),
                },
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

pub(crate) async fn export_applications_endpoint(
    State(state): State<PortalState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let status_filter = match query.status_filter.as_deref() {
        None | Some("all") | Some("") => None,
        Some(raw) => match ApplicationStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
        },
    };
    let job_filter = query.job_id.filter(|id| !id.is_empty()).map(JobId);

    let applications: Vec<_> = state
        .applications
        .snapshot()
        .into_iter()
        .filter(|a| status_filter.map_or(true, |status| a.status == status))
        .filter(|a| job_filter.as_ref().map_or(true, |job| &a.job_id == job))
        .collect();

    let mut buffer = Vec::new();
    if let Err(err) = write_applications_csv(&applications, &mut buffer) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"applications.csv\"",
            ),
        ],
        buffer,
    )
        .into_response()
}
