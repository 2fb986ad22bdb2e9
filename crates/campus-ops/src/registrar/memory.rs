use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{
    Commission, CommissionId, Enrollment, EnrollmentHead, EnrollmentId, EnrollmentStatus,
    InstructorId, InstructorProfile, Payment, ReferralAssignment, Student, StudentId, UserId,
    VendorId, VendorProfile,
};
use super::repository::{
    CommissionStore, EnrollmentStore, ProfileDirectory, ReferralStore, StoreError,
};
use super::scope::ScopePredicate;

/// In-memory store backing the API service and the test suites.
///
/// One mutex guards the whole dataset, so the compound operations
/// (`append_payment`, `upsert_assignment`) are atomic the same way a
/// transactional backend would make them.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    vendor_profiles: HashMap<UserId, VendorProfile>,
    instructor_profiles: HashMap<UserId, InstructorProfile>,
    students: HashMap<StudentId, Student>,
    commissions: HashMap<CommissionId, Commission>,
    enrollments: HashMap<EnrollmentId, Enrollment>,
    payments: Vec<Payment>,
    referrals: Vec<ReferralAssignment>,
}

impl MemoryStore {
    pub fn put_vendor_profile(&self, profile: VendorProfile) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.vendor_profiles.insert(profile.user.clone(), profile);
    }

    pub fn put_instructor_profile(&self, profile: InstructorProfile) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .instructor_profiles
            .insert(profile.user.clone(), profile);
    }

    pub fn put_student(&self, student: Student) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.students.insert(student.id.clone(), student);
    }

    pub fn put_commission(&self, commission: Commission) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.commissions.insert(commission.id.clone(), commission);
    }
}

impl ProfileDirectory for MemoryStore {
    fn vendor_profile(&self, user: &UserId) -> Result<Option<VendorProfile>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.vendor_profiles.get(user).cloned())
    }

    fn instructor_profile(
        &self,
        user: &UserId,
    ) -> Result<Option<InstructorProfile>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.instructor_profiles.get(user).cloned())
    }
}

impl CommissionStore for MemoryStore {
    fn fetch_commission(&self, id: &CommissionId) -> Result<Option<Commission>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.commissions.get(id).cloned())
    }

    fn list_commissions(&self, predicate: &ScopePredicate) -> Result<Vec<Commission>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut visible = Vec::new();
        for commission in inner.commissions.values() {
            let enrollments: Vec<Enrollment> = inner
                .enrollments
                .values()
                .filter(|enrollment| enrollment.commission == commission.id)
                .cloned()
                .collect();
            if predicate.admits_commission(commission, &enrollments) {
                visible.push(commission.clone());
            }
        }
        Ok(visible)
    }

    fn assigned_instructors(&self, id: &CommissionId) -> Result<Vec<InstructorId>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .commissions
            .get(id)
            .map(|commission| commission.instructors.clone())
            .unwrap_or_default())
    }
}

impl EnrollmentStore for MemoryStore {
    fn fetch_head(&self, id: &EnrollmentId) -> Result<Option<EnrollmentHead>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.enrollments.get(id).map(|enrollment| EnrollmentHead {
            id: enrollment.id.clone(),
            commission: enrollment.commission.clone(),
            vendor: enrollment.vendor.clone(),
        }))
    }

    fn fetch_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.enrollments.get(id).cloned())
    }

    fn enrollments_for_commission(
        &self,
        id: &CommissionId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .enrollments
            .values()
            .filter(|enrollment| &enrollment.commission == id)
            .cloned()
            .collect())
    }

    fn list_enrollments(&self, predicate: &ScopePredicate) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut visible = Vec::new();
        for enrollment in inner.enrollments.values() {
            let Some(commission) = inner.commissions.get(&enrollment.commission) else {
                continue;
            };
            if predicate.admits_enrollment(enrollment, commission) {
                visible.push(enrollment.clone());
            }
        }
        Ok(visible)
    }

    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.students.get(id).cloned())
    }

    fn has_active_enrollment(
        &self,
        student: &StudentId,
        commission: &CommissionId,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.enrollments.values().any(|enrollment| {
            &enrollment.student == student
                && &enrollment.commission == commission
                && enrollment.status.is_active()
        }))
    }

    fn create_enrollment(&self, enrollment: Enrollment) -> Result<Enrollment, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.enrollments.contains_key(&enrollment.id) {
            return Err(StoreError::Conflict);
        }
        inner
            .enrollments
            .insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }

    fn set_status(
        &self,
        id: &EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let enrollment = inner.enrollments.get_mut(id).ok_or(StoreError::NotFound)?;
        enrollment.status = status;
        Ok(())
    }

    fn append_note(&self, id: &EnrollmentId, note: String) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let enrollment = inner.enrollments.get_mut(id).ok_or(StoreError::NotFound)?;
        enrollment.notes.push(note);
        Ok(())
    }

    fn append_payment(&self, payment: Payment) -> Result<EnrollmentStatus, StoreError> {
        // Single lock across insert and transition; both land or neither.
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let status = {
            let enrollment = inner
                .enrollments
                .get_mut(&payment.enrollment)
                .ok_or(StoreError::NotFound)?;
            if enrollment.status == EnrollmentStatus::Pending {
                enrollment.status = EnrollmentStatus::Partial;
            }
            enrollment.status
        };
        inner.payments.push(payment);
        Ok(status)
    }

    fn payments_for_enrollment(&self, id: &EnrollmentId) -> Result<Vec<Payment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .payments
            .iter()
            .filter(|payment| &payment.enrollment == id)
            .cloned()
            .collect())
    }
}

impl ReferralStore for MemoryStore {
    fn find_assignment(
        &self,
        vendor: &VendorId,
        commission: &CommissionId,
    ) -> Result<Option<ReferralAssignment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .referrals
            .iter()
            .find(|assignment| {
                &assignment.vendor == vendor && &assignment.commission == commission
            })
            .cloned())
    }

    fn find_by_token(&self, token: &str) -> Result<Option<ReferralAssignment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .referrals
            .iter()
            .find(|assignment| assignment.token == token)
            .cloned())
    }

    fn upsert_assignment(
        &self,
        assignment: ReferralAssignment,
    ) -> Result<ReferralAssignment, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");

        let collision = inner.referrals.iter().any(|existing| {
            existing.token == assignment.token
                && !(existing.vendor == assignment.vendor
                    && existing.commission == assignment.commission)
        });
        if collision {
            return Err(StoreError::Conflict);
        }

        match inner.referrals.iter_mut().find(|existing| {
            existing.vendor == assignment.vendor && existing.commission == assignment.commission
        }) {
            Some(existing) => *existing = assignment.clone(),
            None => inner.referrals.push(assignment.clone()),
        }

        Ok(assignment)
    }
}
