use std::sync::Arc;

use campus_ops::error::AppError;
use campus_ops::registrar::{
    CommissionId, EnrollmentService, EnrollmentStatus, ListingFilters, MemoryStore, NewEnrollment,
    NewPayment, PaymentKind, PaymentMethod, PreRegistration, PreRegistrationAnswer, Principal,
    Role, ServiceError, StudentId, UserId,
};
use chrono::Local;
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Also print the commission listing as each role sees it
    #[arg(long)]
    pub(crate) show_listings: bool,
}

fn principal(user: &str, role: Role) -> Principal {
    Principal {
        user: UserId(user.to_string()),
        role,
    }
}

/// Walks the enrollment lifecycle end to end: vendor-attributed creation,
/// the automatic Pending -> Partial transition, a denied cross-vendor
/// mutation, an admin completion, and the idempotent referral flow.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::default());
    crate::infra::seed_demo_data(&store);
    let service = EnrollmentService::new(store);

    let vendor1 = principal("u-vendor1", Role::Vendor);
    let vendor2 = principal("u-vendor2", Role::Vendor);
    let admin = principal("u-admin", Role::Admin);

    println!("Enrollment lifecycle demo");

    let enrollment = service.create_enrollment(
        &vendor1,
        NewEnrollment {
            student: StudentId("s1".to_string()),
            commission: CommissionId("c1".to_string()),
            vendor: None,
            agreed_total: 1800,
            installment_count: 6,
            notes: None,
        },
    )?;
    println!(
        "- {} enrolled on c1 by vendor v1, status {}",
        enrollment.id.0,
        enrollment.status.label()
    );

    let receipt = service.add_payment(
        &vendor1,
        &enrollment.id,
        NewPayment {
            amount: 100,
            currency: "USD".to_string(),
            method: PaymentMethod::BankTransfer,
            kind: PaymentKind::Deposit,
            paid_at: None,
            own_account: false,
            notes: Some("first installment".to_string()),
        },
    )?;
    println!(
        "- payment {} recorded, status now {}",
        receipt.payment.0,
        receipt.status.label()
    );

    match service.update_status(&vendor2, &enrollment.id, EnrollmentStatus::Complete) {
        Err(ServiceError::PermissionDenied) => {
            println!("- vendor v2 denied: not the attributed vendor")
        }
        other => println!("- unexpected outcome for vendor v2: {other:?}"),
    }

    let completed = service.update_status(&admin, &enrollment.id, EnrollmentStatus::Complete)?;
    println!("- admin completed {}, status {}", completed.id.0, completed.status.label());

    let first = service.issue_referral(&vendor1, &CommissionId("c2".to_string()), None)?;
    let second = service.issue_referral(&vendor1, &CommissionId("c2".to_string()), None)?;
    println!(
        "- referral token for (v1, c2): {} (re-issue returned {})",
        first.token,
        if first.token == second.token {
            "the same token"
        } else {
            "a different token!"
        }
    );

    let pre_registered = service.submit_pre_registration(PreRegistration {
        token: first.token.clone(),
        student: StudentId("s2".to_string()),
        answers: vec![PreRegistrationAnswer {
            question: "Preferred schedule".to_string(),
            value: "Evenings".to_string(),
        }],
    })?;
    println!("- pre-registration via referral created {}", pre_registered.0);

    match service.submit_pre_registration(PreRegistration {
        token: first.token,
        student: StudentId("s2".to_string()),
        answers: Vec::new(),
    }) {
        Err(ServiceError::Conflict(reason)) => println!("- duplicate pre-registration rejected: {reason}"),
        other => println!("- unexpected outcome for duplicate: {other:?}"),
    }

    if args.show_listings {
        let today = Local::now().date_naive();
        for (label, who) in [
            ("admin", admin),
            ("vendor v1", vendor1),
            ("vendor v2", vendor2),
        ] {
            let page =
                service.list_commissions(&who, &ListingFilters::default(), 1, 20, today)?;
            println!("\nCommissions visible to {label}: {}", page.total_items);
            for item in &page.items {
                println!(
                    "- {} {} [{}] enrollments={} partial_or_complete={}{}",
                    item.code,
                    item.course_name,
                    item.derived_status.label(),
                    item.total_enrollments,
                    item.partial_or_complete_count,
                    item.referral_token
                        .as_deref()
                        .map(|token| format!(" token={token}"))
                        .unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
