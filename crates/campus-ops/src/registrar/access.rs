use super::domain::{EnrollmentHead, InstructorId, Role};
use super::identity::ResolvedActor;
use super::scope::ScopePredicate;

/// Raised when a per-record or status-mutation check fails. Propagates to
/// the boundary unchanged; never retried or downgraded.
#[derive(Debug, thiserror::Error)]
#[error("actor is not permitted to access this enrollment")]
pub struct AccessDenied;

/// Role-scoped authorization, selected once per request.
///
/// One implementation per role replaces role-keyed branching at every call
/// site. `check_record` gates detail/payment/observation reads against the
/// minimal [`EnrollmentHead`] projection; `check_status_change` gates
/// explicit lifecycle transitions and is deliberately narrower (see
/// `InstructorVendorPolicy`).
pub trait AccessPolicy: Send + Sync {
    fn scope(&self, actor: &ResolvedActor) -> ScopePredicate;

    fn check_record(
        &self,
        actor: &ResolvedActor,
        head: &EnrollmentHead,
        assigned_instructors: &[InstructorId],
    ) -> Result<(), AccessDenied>;

    fn check_status_change(
        &self,
        actor: &ResolvedActor,
        head: &EnrollmentHead,
    ) -> Result<(), AccessDenied>;
}

/// Admin and Finance: no ownership scoping anywhere.
struct BackOfficePolicy;

/// Vendor: confined to enrollments carrying its own attribution.
struct VendorPolicy;

/// Instructor: may view records on commissions it teaches; never mutates
/// enrollment status.
struct InstructorPolicy;

/// Dual-capability role. The record guard falls back from the vendor check
/// to the instructor check; the status-change guard and the listing scope
/// do not. The asymmetry is intentional and covered by tests.
struct InstructorVendorPolicy;

/// Students have no back-office access in this core.
struct StudentPolicy;

pub fn policy_for(role: Role) -> &'static dyn AccessPolicy {
    static BACK_OFFICE: BackOfficePolicy = BackOfficePolicy;
    static VENDOR: VendorPolicy = VendorPolicy;
    static INSTRUCTOR: InstructorPolicy = InstructorPolicy;
    static INSTRUCTOR_VENDOR: InstructorVendorPolicy = InstructorVendorPolicy;
    static STUDENT: StudentPolicy = StudentPolicy;

    match role {
        Role::Admin | Role::Finance => &BACK_OFFICE,
        Role::Vendor => &VENDOR,
        Role::Instructor => &INSTRUCTOR,
        Role::InstructorVendor => &INSTRUCTOR_VENDOR,
        Role::Student => &STUDENT,
    }
}

fn vendor_matches(actor: &ResolvedActor, head: &EnrollmentHead) -> bool {
    match (&actor.vendor, &head.vendor) {
        (Some(own), Some(attributed)) => own == attributed,
        _ => false,
    }
}

fn instructor_assigned(actor: &ResolvedActor, assigned: &[InstructorId]) -> bool {
    actor
        .instructor
        .as_ref()
        .is_some_and(|instructor| assigned.contains(instructor))
}

impl AccessPolicy for BackOfficePolicy {
    fn scope(&self, _actor: &ResolvedActor) -> ScopePredicate {
        ScopePredicate::All {
            include_inactive: true,
        }
    }

    fn check_record(
        &self,
        _actor: &ResolvedActor,
        _head: &EnrollmentHead,
        _assigned: &[InstructorId],
    ) -> Result<(), AccessDenied> {
        Ok(())
    }

    fn check_status_change(
        &self,
        _actor: &ResolvedActor,
        _head: &EnrollmentHead,
    ) -> Result<(), AccessDenied> {
        Ok(())
    }
}

impl AccessPolicy for VendorPolicy {
    fn scope(&self, actor: &ResolvedActor) -> ScopePredicate {
        match &actor.vendor {
            Some(vendor) => ScopePredicate::VendorAttributed(vendor.clone()),
            None => ScopePredicate::Nothing,
        }
    }

    fn check_record(
        &self,
        actor: &ResolvedActor,
        head: &EnrollmentHead,
        _assigned: &[InstructorId],
    ) -> Result<(), AccessDenied> {
        if vendor_matches(actor, head) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    fn check_status_change(
        &self,
        actor: &ResolvedActor,
        head: &EnrollmentHead,
    ) -> Result<(), AccessDenied> {
        if vendor_matches(actor, head) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }
}

impl AccessPolicy for InstructorPolicy {
    fn scope(&self, actor: &ResolvedActor) -> ScopePredicate {
        match &actor.instructor {
            Some(instructor) => ScopePredicate::InstructorAssigned(instructor.clone()),
            None => ScopePredicate::Nothing,
        }
    }

    fn check_record(
        &self,
        actor: &ResolvedActor,
        _head: &EnrollmentHead,
        assigned: &[InstructorId],
    ) -> Result<(), AccessDenied> {
        if instructor_assigned(actor, assigned) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    fn check_status_change(
        &self,
        _actor: &ResolvedActor,
        _head: &EnrollmentHead,
    ) -> Result<(), AccessDenied> {
        Err(AccessDenied)
    }
}

impl AccessPolicy for InstructorVendorPolicy {
    fn scope(&self, actor: &ResolvedActor) -> ScopePredicate {
        // Listing scope is vendor-only; no instructor fallback here.
        match &actor.vendor {
            Some(vendor) => ScopePredicate::VendorAttributed(vendor.clone()),
            None => ScopePredicate::Nothing,
        }
    }

    fn check_record(
        &self,
        actor: &ResolvedActor,
        head: &EnrollmentHead,
        assigned: &[InstructorId],
    ) -> Result<(), AccessDenied> {
        if vendor_matches(actor, head) || instructor_assigned(actor, assigned) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    fn check_status_change(
        &self,
        actor: &ResolvedActor,
        head: &EnrollmentHead,
    ) -> Result<(), AccessDenied> {
        // Vendor check only: an assigned instructor may view through the
        // record guard yet may not mutate status.
        if vendor_matches(actor, head) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }
}

impl AccessPolicy for StudentPolicy {
    fn scope(&self, _actor: &ResolvedActor) -> ScopePredicate {
        ScopePredicate::Nothing
    }

    fn check_record(
        &self,
        _actor: &ResolvedActor,
        _head: &EnrollmentHead,
        _assigned: &[InstructorId],
    ) -> Result<(), AccessDenied> {
        Err(AccessDenied)
    }

    fn check_status_change(
        &self,
        _actor: &ResolvedActor,
        _head: &EnrollmentHead,
    ) -> Result<(), AccessDenied> {
        Err(AccessDenied)
    }
}
