use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use campus_ops::registrar::{
    Commission, CommissionId, InstructorId, InstructorProfile, MemoryStore, Student, StudentId,
    UserId, VendorId, VendorProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seeds the in-memory store with a small roster so `serve --seed-demo` and
/// the `demo` subcommand have data to work against.
pub(crate) fn seed_demo_data(store: &MemoryStore) {
    store.put_vendor_profile(VendorProfile {
        user: UserId("u-vendor1".to_string()),
        vendor: VendorId("v1".to_string()),
        display_name: "Ana Suarez".to_string(),
    });
    store.put_vendor_profile(VendorProfile {
        user: UserId("u-vendor2".to_string()),
        vendor: VendorId("v2".to_string()),
        display_name: "Bruno Keller".to_string(),
    });
    store.put_instructor_profile(InstructorProfile {
        user: UserId("u-instructor1".to_string()),
        instructor: InstructorId("i1".to_string()),
        display_name: "Carla Mendez".to_string(),
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
        start_date: "2026-03-02".to_string(),
        end_date: "2026-08-28".to_string(),
        capacity: 30,
        schedule: vec!["Mon 18:00-21:00".to_string(), "Wed 18:00-21:00".to_string()],
        instructors: vec![InstructorId("i1".to_string())],
        vendors: vec![VendorId("v1".to_string()), VendorId("v2".to_string())],
    });
    store.put_commission(Commission {
        id: CommissionId("c2".to_string()),
        code: "DS-2026-02".to_string(),
        course_name: "Data Science Fundamentals".to_string(),
        start_date: "2026-04-06".to_string(),
        end_date: "2026-09-25".to_string(),
        capacity: 25,
        schedule: vec!["Tue 19:00-22:00".to_string()],
        instructors: vec![InstructorId("i1".to_string())],
        vendors: vec![VendorId("v2".to_string())],
    });
}
