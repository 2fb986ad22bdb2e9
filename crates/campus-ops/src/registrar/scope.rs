use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Commission, CommissionStatus, Enrollment, InstructorId, VendorId};

/// Visibility predicate applied to commission/enrollment listings.
///
/// `Nothing` is the fail-closed result for an actor whose role requires an
/// attribution identity that does not exist: it matches zero records no
/// matter what extra filters accompany it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopePredicate {
    All { include_inactive: bool },
    VendorAttributed(VendorId),
    InstructorAssigned(InstructorId),
    Nothing,
}

impl ScopePredicate {
    /// Whether a commission is visible under this predicate, given its
    /// current enrollments (vendor scoping follows enrollment attribution).
    pub fn admits_commission(&self, commission: &Commission, enrollments: &[Enrollment]) -> bool {
        match self {
            ScopePredicate::All { .. } => true,
            ScopePredicate::VendorAttributed(vendor) => enrollments
                .iter()
                .any(|enrollment| enrollment.vendor.as_ref() == Some(vendor)),
            ScopePredicate::InstructorAssigned(instructor) => {
                commission.instructors.contains(instructor)
            }
            ScopePredicate::Nothing => false,
        }
    }

    /// Whether a single enrollment row is visible under this predicate.
    /// Inactive rows are only admitted by the back-office predicate.
    pub fn admits_enrollment(&self, enrollment: &Enrollment, commission: &Commission) -> bool {
        match self {
            ScopePredicate::All { include_inactive } => {
                *include_inactive || enrollment.status.is_active()
            }
            ScopePredicate::VendorAttributed(vendor) => {
                enrollment.status.is_active() && enrollment.vendor.as_ref() == Some(vendor)
            }
            ScopePredicate::InstructorAssigned(instructor) => {
                enrollment.status.is_active() && commission.instructors.contains(instructor)
            }
            ScopePredicate::Nothing => false,
        }
    }
}

/// Extra filters accompanying the scope predicate on listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilters {
    pub search: Option<String>,
    pub status: Option<CommissionStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Lowercased whitespace tokens of a free-text query.
pub fn search_tokens(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect()
}

/// AND-of-ORs text match: every token must hit at least one field, but
/// different tokens may hit different fields.
pub fn matches_search(tokens: &[String], fields: &[&str]) -> bool {
    tokens.iter().all(|token| {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(token))
    })
}

/// Whether a commission's start date falls inside the requested range.
/// Commissions with unparseable dates are excluded once a range is given.
pub fn within_date_range(
    start_date: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(start) = super::schedule::parse_date(start_date) else {
        return false;
    };
    if let Some(from) = from {
        if start < from {
            return false;
        }
    }
    if let Some(to) = to {
        if start > to {
            return false;
        }
    }
    true
}
