use std::sync::Arc;

use crate::registrar::domain::{
    Commission, CommissionId, Enrollment, InstructorId, InstructorProfile, Principal, Role,
    Student, StudentId, UserId, VendorId, VendorProfile,
};
use crate::registrar::memory::MemoryStore;
use crate::registrar::service::{EnrollmentService, NewEnrollment};

pub(super) fn store_with_fixtures() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());

    store.put_vendor_profile(VendorProfile {
        user: UserId("u-vendor1".to_string()),
        vendor: VendorId("v1".to_string()),
        display_name: "Vendor One".to_string(),
    });
    store.put_vendor_profile(VendorProfile {
        user: UserId("u-vendor2".to_string()),
        vendor: VendorId("v2".to_string()),
        display_name: "Vendor Two".to_string(),
    });
    store.put_vendor_profile(VendorProfile {
        user: UserId("u-dual".to_string()),
        vendor: VendorId("v-dual".to_string()),
        display_name: "Dual Capability".to_string(),
    });
    store.put_instructor_profile(InstructorProfile {
        user: UserId("u-dual".to_string()),
        instructor: InstructorId("i-dual".to_string()),
        display_name: "Dual Capability".to_string(),
    });
    store.put_instructor_profile(InstructorProfile {
        user: UserId("u-instructor1".to_string()),
        instructor: InstructorId("i1".to_string()),
        display_name: "Instructor One".to_string(),
    });

    store.put_student(Student {
        id: StudentId("s1".to_string()),
        first_name: "Lucia".to_string(),
        last_name: "Fernandez".to_string(),
        email: "lucia.fernandez@example.com".to_string(),
        document_id: "30111222".to_string(),
    });
    store.put_student(Student {
        id: StudentId("s2".to_string()),
        first_name: "Marco".to_string(),
        last_name: "Rossi".to_string(),
        email: "marco.rossi@example.com".to_string(),
        document_id: "28999111".to_string(),
    });

    store.put_commission(Commission {
        id: CommissionId("c1".to_string()),
        code: "FS-2026-01".to_string(),
        course_name: "Full Stack Development".to_string(),
        start_date: "2020-01-01".to_string(),
        end_date: "2040-01-01".to_string(),
        capacity: 30,
        schedule: vec!["Mon 18:00-21:00".to_string(), "Wed 18:00-21:00".to_string()],
        instructors: vec![
            InstructorId("i1".to_string()),
            InstructorId("i-dual".to_string()),
        ],
        vendors: vec![VendorId("v1".to_string()), VendorId("v2".to_string())],
    });
    store.put_commission(Commission {
        id: CommissionId("c2".to_string()),
        code: "DS-2026-02".to_string(),
        course_name: "Data Science Fundamentals".to_string(),
        start_date: "2020-01-01".to_string(),
        end_date: "2040-01-01".to_string(),
        capacity: 25,
        schedule: vec!["Tue 19:00-22:00".to_string()],
        instructors: vec![InstructorId("i1".to_string())],
        vendors: vec![VendorId("v2".to_string())],
    });

    store
}

pub(super) fn service_with_fixtures() -> (EnrollmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = store_with_fixtures();
    (EnrollmentService::new(store.clone()), store)
}

pub(super) fn principal(user: &str, role: Role) -> Principal {
    Principal {
        user: UserId(user.to_string()),
        role,
    }
}

pub(super) fn vendor1() -> Principal {
    principal("u-vendor1", Role::Vendor)
}

pub(super) fn vendor2() -> Principal {
    principal("u-vendor2", Role::Vendor)
}

pub(super) fn vendor_without_profile() -> Principal {
    principal("u-ghost", Role::Vendor)
}

pub(super) fn dual_capability() -> Principal {
    principal("u-dual", Role::InstructorVendor)
}

pub(super) fn instructor1() -> Principal {
    principal("u-instructor1", Role::Instructor)
}

pub(super) fn admin() -> Principal {
    principal("u-admin", Role::Admin)
}

pub(super) fn finance() -> Principal {
    principal("u-finance", Role::Finance)
}

pub(super) fn enroll(
    service: &EnrollmentService<MemoryStore>,
    creator: &Principal,
    student: &str,
    commission: &str,
) -> Enrollment {
    service
        .create_enrollment(
            creator,
            NewEnrollment {
                student: StudentId(student.to_string()),
                commission: CommissionId(commission.to_string()),
                vendor: None,
                agreed_total: 1500,
                installment_count: 3,
                notes: None,
            },
        )
        .expect("enrollment creation succeeds")
}
