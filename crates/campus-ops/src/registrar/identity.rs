use super::domain::{InstructorId, Principal, Role, VendorId};
use super::repository::{ProfileDirectory, StoreError};

/// Role-specific actor identity resolved from the current profile tables.
///
/// A missing profile resolves to `None` rather than an error: callers decide
/// whether "no attribution possible" means an empty result set (listing
/// scopes) or a refusal (referral issuance).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedActor {
    pub vendor: Option<VendorId>,
    pub instructor: Option<InstructorId>,
}

/// Maps an authenticated principal to its vendor/instructor identities.
/// Pure pass-through to the directory; no caching, so the result always
/// reflects the current profile table.
pub fn resolve(
    principal: &Principal,
    directory: &dyn ProfileDirectory,
) -> Result<ResolvedActor, StoreError> {
    let vendor = match principal.role {
        Role::Vendor | Role::InstructorVendor | Role::Admin | Role::Finance => directory
            .vendor_profile(&principal.user)?
            .map(|profile| profile.vendor),
        Role::Instructor | Role::Student => None,
    };

    let instructor = match principal.role {
        Role::Instructor | Role::InstructorVendor => directory
            .instructor_profile(&principal.user)?
            .map(|profile| profile.instructor),
        Role::Admin | Role::Finance | Role::Vendor | Role::Student => None,
    };

    Ok(ResolvedActor { vendor, instructor })
}
