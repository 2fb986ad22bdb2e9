//! Enrollment and commission management core.
//!
//! Role-scoped visibility, the enrollment lifecycle, payment recording, and
//! referral attribution all live here; persistence, input validation, the
//! dynamic-form engine, and credential handling are external collaborators
//! reached through the traits in [`repository`].

pub mod access;
pub mod domain;
pub mod identity;
pub mod memory;
pub mod referral;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod scope;
pub mod service;

#[cfg(test)]
mod tests;

pub use access::{policy_for, AccessDenied, AccessPolicy};
pub use domain::{
    Commission, CommissionId, CommissionStatus, Enrollment, EnrollmentHead, EnrollmentId,
    EnrollmentStatus, InstructorId, InstructorProfile, Payment, PaymentId, PaymentKind,
    PaymentMethod, Principal, ReferralAssignment, ReferralId, Role, Student, StudentId, UserId,
    VendorId, VendorProfile,
};
pub use identity::{resolve, ResolvedActor};
pub use memory::MemoryStore;
pub use referral::{issue_or_get, ReferralError, ReferralGrant};
pub use repository::{
    CommissionStore, EnrollmentStore, ProfileDirectory, ReferralStore, StoreError,
};
pub use router::registrar_router;
pub use schedule::{derive_status, derive_status_now};
pub use scope::{ListingFilters, ScopePredicate};
pub use service::{
    CommissionOverview, EnrollmentDetail, EnrollmentRow, EnrollmentService, NewEnrollment,
    NewPayment, Page, PaymentReceipt, PreRegistration, PreRegistrationAnswer, ServiceError,
    StatusView,
};
