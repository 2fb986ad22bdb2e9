use super::domain::{
    Commission, CommissionId, Enrollment, EnrollmentHead, EnrollmentId, EnrollmentStatus,
    InstructorId, InstructorProfile, Payment, ReferralAssignment, Student, StudentId, UserId,
    VendorId, VendorProfile,
};
use super::scope::ScopePredicate;

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Profile lookups backing the identity resolver. Absence of a profile is a
/// regular `None`, never an error.
pub trait ProfileDirectory: Send + Sync {
    fn vendor_profile(&self, user: &UserId) -> Result<Option<VendorProfile>, StoreError>;
    fn instructor_profile(&self, user: &UserId) -> Result<Option<InstructorProfile>, StoreError>;
}

/// Read access to commissions and their staff assignments.
pub trait CommissionStore: Send + Sync {
    fn fetch_commission(&self, id: &CommissionId) -> Result<Option<Commission>, StoreError>;

    /// Commissions admitted by the caller's visibility predicate. Free-text
    /// search, status, and date filtering happen above the store so every
    /// backend shares one interpretation.
    fn list_commissions(&self, predicate: &ScopePredicate) -> Result<Vec<Commission>, StoreError>;

    fn assigned_instructors(&self, id: &CommissionId) -> Result<Vec<InstructorId>, StoreError>;
}

/// Enrollment reads and writes.
///
/// `append_payment` is a compound operation: the payment insert and the
/// possible Pending -> Partial transition must land in one atomic unit. A
/// transactional backend runs both inside a single transaction; the in-memory
/// store holds one lock across the unit.
pub trait EnrollmentStore: Send + Sync {
    /// Minimal authorization projection, fetched before the full record.
    fn fetch_head(&self, id: &EnrollmentId) -> Result<Option<EnrollmentHead>, StoreError>;

    fn fetch_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StoreError>;

    fn enrollments_for_commission(
        &self,
        id: &CommissionId,
    ) -> Result<Vec<Enrollment>, StoreError>;

    fn list_enrollments(&self, predicate: &ScopePredicate) -> Result<Vec<Enrollment>, StoreError>;

    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, StoreError>;

    /// Whether the student already holds an enrollment on this commission
    /// whose status still counts as active.
    fn has_active_enrollment(
        &self,
        student: &StudentId,
        commission: &CommissionId,
    ) -> Result<bool, StoreError>;

    fn create_enrollment(&self, enrollment: Enrollment) -> Result<Enrollment, StoreError>;

    fn set_status(&self, id: &EnrollmentId, status: EnrollmentStatus)
        -> Result<(), StoreError>;

    fn append_note(&self, id: &EnrollmentId, note: String) -> Result<(), StoreError>;

    /// Atomically persists the payment and, when the enrollment is exactly
    /// Pending, flips it to Partial. Returns the status after the write.
    fn append_payment(&self, payment: Payment) -> Result<EnrollmentStatus, StoreError>;

    fn payments_for_enrollment(&self, id: &EnrollmentId) -> Result<Vec<Payment>, StoreError>;
}

/// Referral assignment persistence. Uniqueness on (vendor, commission) and on
/// the token itself is the store's key constraint; a collision surfaces as
/// [`StoreError::Conflict`].
pub trait ReferralStore: Send + Sync {
    fn find_assignment(
        &self,
        vendor: &VendorId,
        commission: &CommissionId,
    ) -> Result<Option<ReferralAssignment>, StoreError>;

    fn find_by_token(&self, token: &str) -> Result<Option<ReferralAssignment>, StoreError>;

    fn upsert_assignment(
        &self,
        assignment: ReferralAssignment,
    ) -> Result<ReferralAssignment, StoreError>;
}
