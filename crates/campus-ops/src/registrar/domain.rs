use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for user accounts (any role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for student records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for vendor (sales agent) profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorId(pub String);

/// Identifier wrapper for instructor profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructorId(pub String);

/// Identifier wrapper for scheduled course offerings ("commissions").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommissionId(pub String);

/// Identifier wrapper for enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

/// Identifier wrapper for ledger payments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub String);

/// Identifier wrapper for referral assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferralId(pub String);

/// Role attached to an authenticated account. Fixed for the lifetime of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Instructor,
    Vendor,
    InstructorVendor,
    Finance,
    Student,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "instructor" => Some(Role::Instructor),
            "vendor" => Some(Role::Vendor),
            "instructor_vendor" | "instructor-vendor" => Some(Role::InstructorVendor),
            "finance" => Some(Role::Finance),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Vendor => "vendor",
            Role::InstructorVendor => "instructor_vendor",
            Role::Finance => "finance",
            Role::Student => "student",
        }
    }
}

/// Authenticated principal as handed over by the (external) auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user: UserId,
    pub role: Role,
}

/// Sales-agent capacity attached to a user account. Created with the account,
/// never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub user: UserId,
    pub vendor: VendorId,
    pub display_name: String,
}

/// Teaching capacity attached to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorProfile {
    pub user: UserId,
    pub instructor: InstructorId,
    pub display_name: String,
}

/// Contact and identity details for an enrollable student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub document_id: String,
}

/// A scheduled offering of a course, with its own dates and staff assignments.
///
/// Dates are kept as raw `YYYY-MM-DD` strings so that status derivation can
/// report `InvalidDates` for malformed bounds instead of failing at load time.
/// The temporal status is never stored; see [`super::schedule::derive_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub code: String,
    pub course_name: String,
    pub start_date: String,
    pub end_date: String,
    pub capacity: u32,
    pub schedule: Vec<String>,
    pub instructors: Vec<InstructorId>,
    pub vendors: Vec<VendorId>,
}

/// Temporal status of a commission, derived from its date bounds on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Upcoming,
    Ongoing,
    Finished,
    InvalidDates,
}

impl CommissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CommissionStatus::Upcoming => "upcoming",
            CommissionStatus::Ongoing => "ongoing",
            CommissionStatus::Finished => "finished",
            CommissionStatus::InvalidDates => "invalid_dates",
        }
    }
}

/// Lifecycle status of an enrollment.
///
/// The only automatic transition is Pending -> Partial on the first payment;
/// everything else is an explicit, authorization-gated update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
    Partial,
    Complete,
    Cancelled,
    Inactive,
}

impl EnrollmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Partial => "partial",
            EnrollmentStatus::Complete => "complete",
            EnrollmentStatus::Cancelled => "cancelled",
            EnrollmentStatus::Inactive => "inactive",
        }
    }

    /// Whether this enrollment still occupies the student's single active
    /// slot on its commission. Cancelled and Inactive release the slot.
    pub const fn is_active(self) -> bool {
        !matches!(self, EnrollmentStatus::Cancelled | EnrollmentStatus::Inactive)
    }
}

/// A student's enrollment into a commission.
///
/// `vendor` is the attribution used for visibility scoping; it is `None` for
/// enrollments that did not originate from a sales agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student: StudentId,
    pub commission: CommissionId,
    pub vendor: Option<VendorId>,
    pub status: EnrollmentStatus,
    pub agreed_total: u32,
    pub installment_count: u32,
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal authorization projection of an enrollment.
///
/// Per-record guards must be checked against this projection before the full
/// record is fetched, so an unauthorized caller never sees a partial response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentHead {
    pub id: EnrollmentId,
    pub commission: CommissionId,
    pub vendor: Option<VendorId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Deposit,
    Installment,
    Adjustment,
}

impl PaymentKind {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentKind::Deposit => "deposit",
            PaymentKind::Installment => "installment",
            PaymentKind::Adjustment => "adjustment",
        }
    }
}

/// An append-only ledger entry against exactly one enrollment.
///
/// `vendor` snapshots the enrollment's attribution at the time of payment so
/// later attribution edits never rewrite finance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub enrollment: EnrollmentId,
    pub vendor: Option<VendorId>,
    pub amount: u32,
    pub currency: String,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
    pub paid_at: DateTime<Utc>,
    pub own_account: bool,
    pub notes: Option<String>,
}

/// A shareable referral link tying a vendor to a commission for attribution.
/// Unique per (vendor, commission); the token itself is unique storewide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralAssignment {
    pub id: ReferralId,
    pub vendor: VendorId,
    pub commission: CommissionId,
    pub token: String,
}
