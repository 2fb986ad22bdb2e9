use super::common::{service_with_fixtures, store_with_fixtures, vendor1, vendor2};
use crate::registrar::domain::CommissionId;
use crate::registrar::identity::ResolvedActor;
use crate::registrar::referral::{issue_or_get, ReferralError};
use crate::registrar::service::ServiceError;

#[test]
fn reissue_without_custom_token_is_idempotent() {
    let (service, _store) = service_with_fixtures();
    let commission = CommissionId("c1".to_string());

    let first = service
        .issue_referral(&vendor1(), &commission, None)
        .expect("first issue succeeds");
    let second = service
        .issue_referral(&vendor1(), &commission, None)
        .expect("second issue succeeds");

    assert_eq!(first.token, second.token);
    assert_eq!(first.vendor.0, "v1");
    assert_eq!(first.commission, commission);
}

#[test]
fn custom_token_overwrites_the_stored_assignment() {
    let (service, _store) = service_with_fixtures();
    let commission = CommissionId("c1".to_string());

    let generated = service
        .issue_referral(&vendor1(), &commission, None)
        .expect("issue succeeds");
    let custom = service
        .issue_referral(&vendor1(), &commission, Some("spring-promo".to_string()))
        .expect("overwrite succeeds");

    assert_ne!(generated.token, custom.token);
    assert_eq!(custom.token, "spring-promo");

    // The replacement is durable: the next idempotent read returns it.
    let reread = service
        .issue_referral(&vendor1(), &commission, None)
        .expect("reread succeeds");
    assert_eq!(reread.token, "spring-promo");
}

#[test]
fn token_collision_across_vendors_is_a_conflict() {
    let (service, _store) = service_with_fixtures();
    let commission = CommissionId("c1".to_string());

    service
        .issue_referral(&vendor1(), &commission, Some("shared-token".to_string()))
        .expect("first custom token succeeds");

    let result = service.issue_referral(&vendor2(), &commission, Some("shared-token".to_string()));
    assert!(matches!(result, Err(ServiceError::Conflict(_))));
}

#[test]
fn missing_vendor_identity_is_refused_not_emptied() {
    let store = store_with_fixtures();
    let actor = ResolvedActor::default();
    let result = issue_or_get(
        store.as_ref(),
        &actor,
        &CommissionId("c1".to_string()),
        None,
    );
    assert!(matches!(result, Err(ReferralError::PermissionDenied)));
}

#[test]
fn unknown_commission_is_not_found() {
    let (service, _store) = service_with_fixtures();
    let result = service.issue_referral(&vendor1(), &CommissionId("missing".to_string()), None);
    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[test]
fn distinct_commissions_get_distinct_tokens() {
    let (service, _store) = service_with_fixtures();
    let first = service
        .issue_referral(&vendor1(), &CommissionId("c1".to_string()), None)
        .expect("c1 issue succeeds");
    let second = service
        .issue_referral(&vendor1(), &CommissionId("c2".to_string()), None)
        .expect("c2 issue succeeds");
    assert_ne!(first.token, second.token);
}
