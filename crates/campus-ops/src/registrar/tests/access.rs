use super::common::{
    admin, dual_capability, finance, instructor1, principal, store_with_fixtures, vendor1,
    vendor2,
};
use crate::registrar::access::policy_for;
use crate::registrar::domain::{
    CommissionId, EnrollmentHead, EnrollmentId, InstructorId, Role, VendorId,
};
use crate::registrar::identity::resolve;

fn head(vendor: Option<&str>) -> EnrollmentHead {
    EnrollmentHead {
        id: EnrollmentId("e1".to_string()),
        commission: CommissionId("c1".to_string()),
        vendor: vendor.map(|v| VendorId(v.to_string())),
    }
}

fn assigned() -> Vec<InstructorId> {
    vec![
        InstructorId("i1".to_string()),
        InstructorId("i-dual".to_string()),
    ]
}

#[test]
fn attributed_vendor_passes_record_guard_others_fail() {
    let store = store_with_fixtures();
    let head = head(Some("v1"));

    let owner = resolve(&vendor1(), store.as_ref()).expect("resolves");
    assert!(policy_for(Role::Vendor)
        .check_record(&owner, &head, &assigned())
        .is_ok());

    let competitor = resolve(&vendor2(), store.as_ref()).expect("resolves");
    assert!(policy_for(Role::Vendor)
        .check_record(&competitor, &head, &assigned())
        .is_err());

    let ghost = resolve(&principal("u-ghost", Role::Vendor), store.as_ref()).expect("resolves");
    assert!(policy_for(Role::Vendor)
        .check_record(&ghost, &head, &assigned())
        .is_err());
}

#[test]
fn unattributed_enrollment_is_closed_to_vendors() {
    let store = store_with_fixtures();
    let owner = resolve(&vendor1(), store.as_ref()).expect("resolves");
    // vendor == None on the record never matches anyone.
    assert!(policy_for(Role::Vendor)
        .check_record(&owner, &head(None), &assigned())
        .is_err());
}

#[test]
fn back_office_always_passes_both_guards() {
    let store = store_with_fixtures();
    for who in [admin(), finance()] {
        let actor = resolve(&who, store.as_ref()).expect("resolves");
        let policy = policy_for(who.role);
        assert!(policy.check_record(&actor, &head(Some("v1")), &[]).is_ok());
        assert!(policy.check_status_change(&actor, &head(Some("v1"))).is_ok());
    }
}

#[test]
fn instructor_views_assigned_commission_but_never_mutates() {
    let store = store_with_fixtures();
    let actor = resolve(&instructor1(), store.as_ref()).expect("resolves");
    let policy = policy_for(Role::Instructor);

    assert!(policy
        .check_record(&actor, &head(Some("v1")), &assigned())
        .is_ok());
    // Unassigned commission: no access at all.
    assert!(policy
        .check_record(&actor, &head(Some("v1")), &[])
        .is_err());
    // Status mutation is denied even on an assigned commission.
    assert!(policy
        .check_status_change(&actor, &head(Some("v1")))
        .is_err());
}

#[test]
fn dual_role_falls_back_to_instructor_for_reads_only() {
    let store = store_with_fixtures();
    let actor = resolve(&dual_capability(), store.as_ref()).expect("resolves");
    let policy = policy_for(Role::InstructorVendor);
    let foreign = head(Some("v1"));

    // Not the attributed vendor, but an assigned instructor: the record
    // guard passes through the fallback...
    assert!(policy.check_record(&actor, &foreign, &assigned()).is_ok());
    // ...while the status-change guard, which has no fallback, refuses.
    assert!(policy.check_status_change(&actor, &foreign).is_err());

    // Own attribution passes both.
    let own = head(Some("v-dual"));
    assert!(policy.check_record(&actor, &own, &assigned()).is_ok());
    assert!(policy.check_status_change(&actor, &own).is_ok());
}

#[test]
fn students_are_denied_everywhere() {
    let store = store_with_fixtures();
    let actor = resolve(&principal("u-student", Role::Student), store.as_ref()).expect("resolves");
    let policy = policy_for(Role::Student);
    assert!(policy
        .check_record(&actor, &head(Some("v1")), &assigned())
        .is_err());
    assert!(policy.check_status_change(&actor, &head(Some("v1"))).is_err());
}
