use uuid::Uuid;

use super::domain::{CommissionId, ReferralAssignment, ReferralId, VendorId};
use super::identity::ResolvedActor;
use super::repository::{ReferralStore, StoreError};

/// Result of issuing (or re-reading) a referral link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReferralGrant {
    pub token: String,
    pub vendor: VendorId,
    pub commission: CommissionId,
}

#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    /// Issuing a link requires a concrete vendor identity, so a missing
    /// profile is an error here, not an empty result.
    #[error("referral links require a vendor profile")]
    PermissionDenied,
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Idempotent assignment of a shareable token per (vendor, commission).
///
/// A repeat call without a custom token returns the stored token unchanged.
/// Supplying a custom token always rewrites the assignment; a token already
/// held by another assignment surfaces as the store's Conflict.
pub fn issue_or_get<S: ReferralStore + ?Sized>(
    store: &S,
    actor: &ResolvedActor,
    commission: &CommissionId,
    custom_token: Option<String>,
) -> Result<ReferralGrant, ReferralError> {
    let vendor = actor
        .vendor
        .clone()
        .ok_or(ReferralError::PermissionDenied)?;

    let existing = store.find_assignment(&vendor, commission)?;

    if let (Some(assignment), None) = (&existing, &custom_token) {
        return Ok(ReferralGrant {
            token: assignment.token.clone(),
            vendor: assignment.vendor.clone(),
            commission: assignment.commission.clone(),
        });
    }

    let assignment = ReferralAssignment {
        id: existing
            .map(|assignment| assignment.id)
            .unwrap_or_else(|| ReferralId(new_token())),
        vendor: vendor.clone(),
        commission: commission.clone(),
        token: custom_token.unwrap_or_else(new_token),
    };

    let stored = store.upsert_assignment(assignment)?;

    Ok(ReferralGrant {
        token: stored.token,
        vendor: stored.vendor,
        commission: stored.commission,
    })
}
