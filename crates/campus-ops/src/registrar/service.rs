use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::access::{policy_for, AccessDenied};
use super::domain::{
    Commission, CommissionId, CommissionStatus, Enrollment, EnrollmentId, EnrollmentStatus,
    Payment, PaymentId, PaymentKind, PaymentMethod, Principal, Role, Student, StudentId, VendorId,
};
use super::identity::{self, ResolvedActor};
use super::referral::{self, ReferralError, ReferralGrant};
use super::repository::{
    CommissionStore, EnrollmentStore, ProfileDirectory, ReferralStore, StoreError,
};
use super::schedule;
use super::scope::{matches_search, search_tokens, within_date_range, ListingFilters};

/// Error raised by the enrollment service.
///
/// There is no invalid-state variant: no explicit transition is structurally
/// forbidden, only authorization-gated.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("record not found")]
    NotFound,
    #[error("operation not permitted for this actor")]
    PermissionDenied,
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::Conflict => ServiceError::Conflict("store uniqueness constraint violated"),
            other => ServiceError::Store(other),
        }
    }
}

impl From<AccessDenied> for ServiceError {
    fn from(_: AccessDenied) -> Self {
        ServiceError::PermissionDenied
    }
}

impl From<ReferralError> for ServiceError {
    fn from(value: ReferralError) -> Self {
        match value {
            ReferralError::PermissionDenied => ServiceError::PermissionDenied,
            ReferralError::Store(err) => err.into(),
        }
    }
}

/// Paged listing envelope shared by commission and enrollment listings.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

const MAX_PAGE_SIZE: usize = 100;

fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let current_page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(limit).max(1);

    // Page numbers arrive straight from the query string; saturate so an
    // out-of-range page yields an empty page instead of overflowing.
    let offset = current_page.saturating_sub(1).saturating_mul(limit);
    let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

    Page {
        items,
        total_items,
        current_page,
        total_pages,
        has_next_page: current_page < total_pages,
        has_previous_page: current_page > 1,
    }
}

/// Commission row in the listing, with enrollment aggregates and the
/// wall-clock derived status. `referral_token` is present only for vendor
/// actors that already hold an assignment on the commission.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionOverview {
    pub id: CommissionId,
    pub code: String,
    pub course_name: String,
    pub start_date: String,
    pub end_date: String,
    pub capacity: u32,
    pub derived_status: CommissionStatus,
    pub total_enrollments: usize,
    pub partial_or_complete_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_token: Option<String>,
}

/// Enrollment row in the listing, joined with student and commission fields
/// so the free-text search can cover all eligible fields.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentRow {
    pub id: EnrollmentId,
    pub student: StudentId,
    pub student_name: String,
    pub commission_code: String,
    pub course_name: String,
    pub status: EnrollmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorId>,
    pub agreed_total: u32,
    pub created_at: DateTime<Utc>,
}

/// Full enrollment view, returned only after the record guard has passed
/// against the minimal head projection.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub student: Option<Student>,
    pub commission: Commission,
    pub commission_status: CommissionStatus,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub id: EnrollmentId,
    pub status: EnrollmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub enrollment: EnrollmentId,
    pub payment: PaymentId,
    pub status: EnrollmentStatus,
}

/// Payment submission payload; `paid_at` defaults to now, attribution is
/// snapshotted from the enrollment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub amount: u32,
    pub currency: String,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub own_account: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Direct enrollment creation (back-office or vendor initiated).
#[derive(Debug, Clone, Deserialize)]
pub struct NewEnrollment {
    pub student: StudentId,
    pub commission: CommissionId,
    /// Honored only for Admin/Finance; vendors always self-attribute.
    #[serde(default)]
    pub vendor: Option<VendorId>,
    pub agreed_total: u32,
    pub installment_count: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Anonymous pre-registration submitted through a referral link. Answers
/// come from the external dynamic-form engine and are treated as opaque.
#[derive(Debug, Clone, Deserialize)]
pub struct PreRegistration {
    pub token: String,
    pub student: StudentId,
    #[serde(default)]
    pub answers: Vec<PreRegistrationAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreRegistrationAnswer {
    pub question: String,
    pub value: String,
}

static ENROLLMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_enrollment_id() -> EnrollmentId {
    let id = ENROLLMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EnrollmentId(format!("enr-{id:06}"))
}

fn next_payment_id() -> PaymentId {
    let id = PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PaymentId(format!("pay-{id:06}"))
}

/// Facade over identity resolution, scoping, guards, the enrollment state
/// machine, the payment ledger, and the referral registry. Request-scoped
/// and stateless: every call resolves the actor afresh against the store.
pub struct EnrollmentService<S> {
    store: Arc<S>,
}

impl<S> Clone for EnrollmentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> EnrollmentService<S>
where
    S: ProfileDirectory + CommissionStore + EnrollmentStore + ReferralStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn actor(&self, principal: &Principal) -> Result<ResolvedActor, ServiceError> {
        identity::resolve(principal, self.store.as_ref()).map_err(ServiceError::from)
    }

    /// List commissions visible to the principal, with enrollment aggregates
    /// and derived status. `today` is injected so listings are testable.
    pub fn list_commissions(
        &self,
        principal: &Principal,
        filters: &ListingFilters,
        page: usize,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Page<CommissionOverview>, ServiceError> {
        let actor = self.actor(principal)?;
        let predicate = policy_for(principal.role).scope(&actor);
        let tokens = filters
            .search
            .as_deref()
            .map(search_tokens)
            .unwrap_or_default();

        let mut rows = Vec::new();
        for commission in self.store.list_commissions(&predicate)? {
            let derived = schedule::derive_status(
                &commission.start_date,
                &commission.end_date,
                today,
            );

            if let Some(wanted) = filters.status {
                if derived != wanted {
                    continue;
                }
            }
            if !within_date_range(&commission.start_date, filters.from, filters.to) {
                continue;
            }
            let enrollments = self.store.enrollments_for_commission(&commission.id)?;

            if !tokens.is_empty() {
                // Free text hits the commission itself or any enrolled
                // student's name, email, or document id.
                let mut fields =
                    vec![commission.code.clone(), commission.course_name.clone()];
                for enrollment in &enrollments {
                    if let Some(student) = self.store.fetch_student(&enrollment.student)? {
                        fields.push(student.first_name);
                        fields.push(student.last_name);
                        fields.push(student.email);
                        fields.push(student.document_id);
                    }
                }
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                if !matches_search(&tokens, &fields) {
                    continue;
                }
            }

            let partial_or_complete = enrollments
                .iter()
                .filter(|enrollment| {
                    matches!(
                        enrollment.status,
                        EnrollmentStatus::Partial | EnrollmentStatus::Complete
                    )
                })
                .count();

            let referral_token = match &actor.vendor {
                Some(vendor) => self
                    .store
                    .find_assignment(vendor, &commission.id)?
                    .map(|assignment| assignment.token),
                None => None,
            };

            rows.push(CommissionOverview {
                id: commission.id.clone(),
                code: commission.code.clone(),
                course_name: commission.course_name.clone(),
                start_date: commission.start_date.clone(),
                end_date: commission.end_date.clone(),
                capacity: commission.capacity,
                derived_status: derived,
                total_enrollments: enrollments.len(),
                partial_or_complete_count: partial_or_complete,
                referral_token,
            });
        }

        rows.sort_by(|a, b| a.code.cmp(&b.code));
        debug!(total = rows.len(), role = principal.role.label(), "commission listing built");
        Ok(paginate(rows, page, limit))
    }

    /// List enrollment rows visible to the principal. The free-text search
    /// covers student name, surname, email, document id, commission code,
    /// and course name, AND-of-ORs across tokens.
    pub fn list_enrollments(
        &self,
        principal: &Principal,
        filters: &ListingFilters,
        page: usize,
        limit: usize,
    ) -> Result<Page<EnrollmentRow>, ServiceError> {
        let actor = self.actor(principal)?;
        let predicate = policy_for(principal.role).scope(&actor);
        let tokens = filters
            .search
            .as_deref()
            .map(search_tokens)
            .unwrap_or_default();

        let mut rows = Vec::new();
        for enrollment in self.store.list_enrollments(&predicate)? {
            let commission = self
                .store
                .fetch_commission(&enrollment.commission)?
                .ok_or(ServiceError::NotFound)?;
            let student = self.store.fetch_student(&enrollment.student)?;

            if !tokens.is_empty() {
                let (first, last, email, document) = match &student {
                    Some(student) => (
                        student.first_name.as_str(),
                        student.last_name.as_str(),
                        student.email.as_str(),
                        student.document_id.as_str(),
                    ),
                    None => ("", "", "", ""),
                };
                let fields = [
                    first,
                    last,
                    email,
                    document,
                    commission.code.as_str(),
                    commission.course_name.as_str(),
                ];
                if !matches_search(&tokens, &fields) {
                    continue;
                }
            }

            let student_name = student
                .as_ref()
                .map(|student| format!("{} {}", student.first_name, student.last_name))
                .unwrap_or_default();

            rows.push(EnrollmentRow {
                id: enrollment.id.clone(),
                student: enrollment.student.clone(),
                student_name,
                commission_code: commission.code.clone(),
                course_name: commission.course_name.clone(),
                status: enrollment.status,
                vendor: enrollment.vendor.clone(),
                agreed_total: enrollment.agreed_total,
                created_at: enrollment.created_at,
            });
        }

        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(paginate(rows, page, limit))
    }

    /// Per-record read, guarded head-first: the minimal projection is fetched
    /// and checked before any full row leaves the store.
    pub fn enrollment_detail(
        &self,
        principal: &Principal,
        id: &EnrollmentId,
    ) -> Result<EnrollmentDetail, ServiceError> {
        let actor = self.actor(principal)?;
        let head = self.store.fetch_head(id)?.ok_or(ServiceError::NotFound)?;
        let assigned = self.store.assigned_instructors(&head.commission)?;
        policy_for(principal.role).check_record(&actor, &head, &assigned)?;

        let enrollment = self
            .store
            .fetch_enrollment(id)?
            .ok_or(ServiceError::NotFound)?;
        let commission = self
            .store
            .fetch_commission(&enrollment.commission)?
            .ok_or(ServiceError::NotFound)?;
        let student = self.store.fetch_student(&enrollment.student)?;
        let payments = self.store.payments_for_enrollment(id)?;
        let commission_status =
            schedule::derive_status_now(&commission.start_date, &commission.end_date);

        Ok(EnrollmentDetail {
            enrollment,
            student,
            commission,
            commission_status,
            payments,
        })
    }

    /// Explicit lifecycle transition. The machine permits any target status;
    /// only the status-mutation guard restricts who may move it.
    pub fn update_status(
        &self,
        principal: &Principal,
        id: &EnrollmentId,
        new_status: EnrollmentStatus,
    ) -> Result<StatusView, ServiceError> {
        let actor = self.actor(principal)?;
        let head = self.store.fetch_head(id)?.ok_or(ServiceError::NotFound)?;
        policy_for(principal.role).check_status_change(&actor, &head)?;

        self.store.set_status(id, new_status)?;
        info!(
            enrollment = %id.0,
            status = new_status.label(),
            role = principal.role.label(),
            "enrollment status updated"
        );

        Ok(StatusView {
            id: id.clone(),
            status: new_status,
        })
    }

    /// Appends a payment to the ledger. The store performs the insert and the
    /// one automatic transition (Pending -> Partial on first payment) as a
    /// single unit; a second concurrent Partial write is naturally idempotent.
    pub fn add_payment(
        &self,
        principal: &Principal,
        id: &EnrollmentId,
        payment: NewPayment,
    ) -> Result<PaymentReceipt, ServiceError> {
        let actor = self.actor(principal)?;
        let head = self.store.fetch_head(id)?.ok_or(ServiceError::NotFound)?;
        let assigned = self.store.assigned_instructors(&head.commission)?;
        policy_for(principal.role).check_record(&actor, &head, &assigned)?;

        let payment_id = next_payment_id();
        let record = Payment {
            id: payment_id.clone(),
            enrollment: id.clone(),
            vendor: head.vendor.clone(),
            amount: payment.amount,
            currency: payment.currency,
            method: payment.method,
            kind: payment.kind,
            paid_at: payment.paid_at.unwrap_or_else(Utc::now),
            own_account: payment.own_account,
            notes: payment.notes,
        };

        let status = self.store.append_payment(record)?;
        info!(enrollment = %id.0, payment = %payment_id.0, "payment recorded");

        Ok(PaymentReceipt {
            enrollment: id.clone(),
            payment: payment_id,
            status,
        })
    }

    /// Appends an observation note, guarded like any other per-record access.
    pub fn add_note(
        &self,
        principal: &Principal,
        id: &EnrollmentId,
        note: String,
    ) -> Result<(), ServiceError> {
        let actor = self.actor(principal)?;
        let head = self.store.fetch_head(id)?.ok_or(ServiceError::NotFound)?;
        let assigned = self.store.assigned_instructors(&head.commission)?;
        policy_for(principal.role).check_record(&actor, &head, &assigned)?;

        self.store.append_note(id, note)?;
        Ok(())
    }

    /// Direct creation by back-office staff or a vendor. Vendors always
    /// self-attribute; Admin/Finance may attribute any vendor or none.
    /// New enrollments start Pending regardless of creator.
    pub fn create_enrollment(
        &self,
        principal: &Principal,
        request: NewEnrollment,
    ) -> Result<Enrollment, ServiceError> {
        let actor = self.actor(principal)?;

        let vendor = match principal.role {
            Role::Vendor | Role::InstructorVendor => {
                Some(actor.vendor.ok_or(ServiceError::PermissionDenied)?)
            }
            Role::Admin | Role::Finance => request.vendor.clone(),
            Role::Instructor | Role::Student => return Err(ServiceError::PermissionDenied),
        };

        self.store
            .fetch_commission(&request.commission)?
            .ok_or(ServiceError::NotFound)?;

        let enrollment = Enrollment {
            id: next_enrollment_id(),
            student: request.student,
            commission: request.commission,
            vendor,
            status: EnrollmentStatus::Pending,
            agreed_total: request.agreed_total,
            installment_count: request.installment_count,
            notes: request.notes.into_iter().collect(),
            created_at: Utc::now(),
        };

        let stored = self.store.create_enrollment(enrollment)?;
        info!(enrollment = %stored.id.0, commission = %stored.commission.0, "enrollment created");
        Ok(stored)
    }

    /// Issues (or re-reads) the referral link tying the acting vendor to a
    /// commission. Idempotent unless a custom token is supplied.
    pub fn issue_referral(
        &self,
        principal: &Principal,
        commission: &CommissionId,
        custom_token: Option<String>,
    ) -> Result<ReferralGrant, ServiceError> {
        let actor = self.actor(principal)?;

        self.store
            .fetch_commission(commission)?
            .ok_or(ServiceError::NotFound)?;

        let grant = referral::issue_or_get(self.store.as_ref(), &actor, commission, custom_token)?;
        info!(commission = %commission.0, vendor = %grant.vendor.0, "referral link issued");
        Ok(grant)
    }

    /// Creation path invoked by the external form engine. The duplicate
    /// check is read-then-decide, ahead of any write, so the AlreadyEnrolled
    /// rejection never depends on a store conflict.
    pub fn submit_pre_registration(
        &self,
        request: PreRegistration,
    ) -> Result<EnrollmentId, ServiceError> {
        let assignment = self
            .store
            .find_by_token(&request.token)?
            .ok_or(ServiceError::NotFound)?;

        self.store
            .fetch_commission(&assignment.commission)?
            .ok_or(ServiceError::NotFound)?;

        if self
            .store
            .has_active_enrollment(&request.student, &assignment.commission)?
        {
            return Err(ServiceError::Conflict(
                "student already holds an active enrollment for this commission",
            ));
        }

        let notes = request
            .answers
            .iter()
            .map(|answer| format!("{}: {}", answer.question, answer.value))
            .collect();

        let enrollment = Enrollment {
            id: next_enrollment_id(),
            student: request.student,
            commission: assignment.commission.clone(),
            vendor: Some(assignment.vendor.clone()),
            status: EnrollmentStatus::Pending,
            agreed_total: 0,
            installment_count: 0,
            notes,
            created_at: Utc::now(),
        };

        let stored = self.store.create_enrollment(enrollment)?;
        info!(
            enrollment = %stored.id.0,
            commission = %assignment.commission.0,
            vendor = %assignment.vendor.0,
            "pre-registration accepted"
        );
        Ok(stored.id)
    }
}
