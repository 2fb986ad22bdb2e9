use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CommissionId, CommissionStatus, EnrollmentId, EnrollmentStatus, Principal, Role, UserId};
use super::repository::{CommissionStore, EnrollmentStore, ProfileDirectory, ReferralStore};
use super::scope::ListingFilters;
use super::service::{EnrollmentService, NewEnrollment, NewPayment, PreRegistration, ServiceError};

/// Router builder exposing the enrollment backend endpoints.
///
/// The principal arrives in `x-actor-id` / `x-actor-role` headers set by the
/// upstream auth layer; pre-registration is the one anonymous endpoint.
pub fn registrar_router<S>(service: Arc<EnrollmentService<S>>) -> Router
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    Router::new()
        .route("/api/v1/commissions", get(list_commissions_handler::<S>))
        .route(
            "/api/v1/commissions/:commission_id/referral",
            post(issue_referral_handler::<S>),
        )
        .route(
            "/api/v1/enrollments",
            get(list_enrollments_handler::<S>).post(create_enrollment_handler::<S>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id",
            get(enrollment_detail_handler::<S>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id/status",
            post(update_status_handler::<S>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id/payments",
            post(add_payment_handler::<S>),
        )
        .route(
            "/api/v1/enrollments/:enrollment_id/notes",
            post(add_note_handler::<S>),
        )
        .route(
            "/api/v1/pre-registrations",
            post(pre_registration_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingQuery {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<CommissionStatus>,
    #[serde(default)]
    from: Option<NaiveDate>,
    #[serde(default)]
    to: Option<NaiveDate>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl ListingQuery {
    fn filters(&self) -> ListingFilters {
        ListingFilters {
            search: self.search.clone(),
            status: self.status,
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    status: EnrollmentStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteRequest {
    note: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReferralRequest {
    #[serde(default)]
    token: Option<String>,
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, Response> {
    let user = headers
        .get("x-actor-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let role = headers
        .get("x-actor-role")
        .and_then(|value| value.to_str().ok())
        .and_then(Role::parse);

    match (user, role) {
        (Some(user), Some(role)) => Ok(Principal {
            user: UserId(user.to_string()),
            role,
        }),
        _ => {
            let payload = json!({ "error": "missing or invalid actor headers" });
            Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response())
        }
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::PermissionDenied => StatusCode::FORBIDDEN,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn list_commissions_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let today = Local::now().date_naive();
    match service.list_commissions(&principal, &query.filters(), query.page, query.limit, today) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_enrollments_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.list_enrollments(&principal, &query.filters(), query.page, query.limit) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn enrollment_detail_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Path(enrollment_id): Path<String>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.enrollment_detail(&principal, &EnrollmentId(enrollment_id)) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_enrollment_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Json(request): Json<NewEnrollment>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.create_enrollment(&principal, request) {
        Ok(enrollment) => (StatusCode::CREATED, Json(enrollment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Path(enrollment_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.update_status(&principal, &EnrollmentId(enrollment_id), request.status) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_payment_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Path(enrollment_id): Path<String>,
    Json(request): Json<NewPayment>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.add_payment(&principal, &EnrollmentId(enrollment_id), request) {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_note_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Path(enrollment_id): Path<String>,
    Json(request): Json<NoteRequest>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.add_note(&principal, &EnrollmentId(enrollment_id), request.note) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn issue_referral_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    headers: HeaderMap,
    Path(commission_id): Path<String>,
    Json(request): Json<ReferralRequest>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.issue_referral(&principal, &CommissionId(commission_id), request.token) {
        Ok(grant) => (StatusCode::OK, Json(grant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pre_registration_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    Json(request): Json<PreRegistration>,
) -> Response
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    match service.submit_pre_registration(request) {
        Ok(enrollment_id) => {
            let payload = json!({ "enrollment_id": enrollment_id.0 });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
