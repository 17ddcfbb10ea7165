use chrono::{Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::credentials::hash_password;
use crate::db::{admin_repo, application_repo, user_repo};
use crate::models::{LoanApplication, User};
use crate::scoring::{ApplicantAttributes, LoanPurpose, LoanType, ResidenceType, ScoringContext};

const ADMIN_EMAIL: &str = "admin@loansewa.com";
const ADMIN_PASSWORD: &str = "admin123";
const USER_PASSWORD: &str = "password123";

// (full_name, email, mobile_number, aadhar)
const SAMPLE_USERS: [(&str, &str, &str, &str); 8] = [
    ("Rajesh Kumar", "rajesh.kumar@example.com", "8876543210", "223456789012"),
    ("Priya Sharma", "priya.sharma@example.com", "8876543211", "223456789013"),
    ("Amit Patel", "amit.patel@example.com", "8876543212", "223456789014"),
    ("Sneha Reddy", "sneha.reddy@example.com", "8876543213", "223456789015"),
    ("Vikram Singh", "vikram.singh@example.com", "8876543214", "223456789016"),
    ("Ananya Iyer", "ananya.iyer@example.com", "8876543215", "223456789017"),
    ("Rahul Verma", "rahul.verma@example.com", "8876543216", "223456789018"),
    ("Kavita Nair", "kavita.nair@example.com", "8876543217", "223456789019"),
];

const REJECTION_REASONS: [&str; 5] = [
    "Low credit score below minimum threshold",
    "Insufficient income for requested loan amount",
    "High debt-to-income ratio",
    "Incomplete documentation",
    "Poor credit history with multiple defaults",
];

const TENURES: [i32; 6] = [12, 24, 36, 48, 60, 84];

/// Target status of a seeded application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Approved,
    Rejected,
}

/// Deterministic applicant profile. `i` spreads the values across the
/// ranges each outcome is drawn from.
fn sample_attributes(outcome: Outcome, i: usize) -> ApplicantAttributes {
    let step = i as f64;
    let residence_type = match i % 3 {
        0 => ResidenceType::Owned,
        1 => ResidenceType::Rented,
        _ => ResidenceType::Mortgage,
    };
    let loan_purpose = match i % 6 {
        0 => LoanPurpose::Personal,
        1 => LoanPurpose::Home,
        2 => LoanPurpose::Medical,
        3 => LoanPurpose::Education,
        4 => LoanPurpose::Business,
        _ => LoanPurpose::Auto,
    };
    let loan_type = if i % 2 == 0 { LoanType::Unsecured } else { LoanType::Secured };

    let (age, income, loan_amount, dpd, delinquency, utilization, accounts) = match outcome {
        Outcome::Pending => (
            25 + (i as i32 * 7) % 30,
            300_000.0 + step * 350_000.0,
            50_000.0 + step * 390_000.0,
            step * 6.0,
            step * 8.0,
            15.0 + step * 15.0,
            1 + (i as i32 * 2) % 10,
        ),
        Outcome::Approved => (
            28 + (i as i32 * 3) % 25,
            600_000.0 + step * 250_000.0,
            100_000.0 + step * 150_000.0,
            step * 1.5,
            step * 2.0,
            10.0 + step * 5.0,
            2 + i as i32 % 6,
        ),
        Outcome::Rejected => (
            22 + (i as i32 * 9) % 33,
            200_000.0 + step * 150_000.0,
            900_000.0 + step * 350_000.0,
            30.0 + step * 10.0,
            40.0 + step * 10.0,
            70.0 + step * 10.0,
            4 + (i as i32 * 3) % 9,
        ),
    };

    ApplicantAttributes {
        age,
        income,
        loan_amount,
        loan_tenure_months: TENURES[i % TENURES.len()],
        avg_dpd_per_delinquency: dpd,
        delinquency_ratio: delinquency,
        credit_utilization_ratio: utilization,
        num_open_accounts: accounts,
        residence_type,
        loan_purpose,
        loan_type,
    }
}

/// Populate an empty database with one admin, eight users and a mix of
/// pending, approved and rejected applications. Skips when any user exists.
pub async fn run_sample_seeder(pool: &PgPool, scoring: &ScoringContext) -> anyhow::Result<()> {
    let existing = user_repo::count_users(pool).await?;
    if existing > 0 {
        tracing::info!(existing, "Sample seeder: users already present, skipping");
        return Ok(());
    }

    let admin = match admin_repo::find_by_email(pool, ADMIN_EMAIL).await? {
        Some(a) => a,
        None => {
            admin_repo::create_admin(
                pool,
                "Admin User",
                ADMIN_EMAIL,
                "9999999999",
                &hash_password(ADMIN_PASSWORD),
            )
            .await?
        }
    };

    let mut users: Vec<User> = Vec::with_capacity(SAMPLE_USERS.len());
    for (full_name, email, mobile, aadhar) in SAMPLE_USERS {
        match user_repo::create_user(pool, full_name, email, mobile, aadhar, &hash_password(USER_PASSWORD))
            .await
        {
            Ok(u) => users.push(u),
            Err(e) => tracing::warn!(error = %e, email, "Sample seeder: failed to create user"),
        }
    }
    if users.is_empty() {
        anyhow::bail!("Sample seeder: no users could be created");
    }

    let plan = [(Outcome::Pending, 5), (Outcome::Approved, 8), (Outcome::Rejected, 4)];
    let mut created = 0u32;
    let mut n = 0usize;

    for (outcome, count) in plan {
        for i in 0..count {
            let user_id = users[n % users.len()].id;
            n += 1;

            match seed_application(pool, scoring, user_id, admin.id, outcome, i).await {
                Ok(_) => created += 1,
                Err(e) => tracing::warn!(error = %e, %user_id, ?outcome, "Sample seeder: failed to seed application"),
            }
        }
    }

    tracing::info!(
        admin = ADMIN_EMAIL,
        users = users.len(),
        applications = created,
        "Sample data populated"
    );

    Ok(())
}

/// Insert the `i`-th sample application of `outcome` for `user_id` and move it
/// to that outcome. If settling fails the inserted row is removed again, so a
/// failed seed never leaves a stray Pending application behind.
pub async fn seed_application(
    pool: &PgPool,
    scoring: &ScoringContext,
    user_id: Uuid,
    admin_id: Uuid,
    outcome: Outcome,
    i: usize,
) -> anyhow::Result<LoanApplication> {
    let attrs = sample_attributes(outcome, i);
    let score = scoring.evaluate(&attrs);
    let application = application_repo::insert_application(pool, user_id, &attrs, &score).await?;

    if let Err(e) = settle(pool, application.id, admin_id, outcome, i, attrs.loan_amount).await {
        application_repo::delete_application(pool, application.id).await?;
        return Err(e.context(format!("settling sample application {}", application.id)));
    }

    application_repo::get_application(pool, application.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("sample application {} vanished", application.id))
}

/// Move a freshly inserted application to its target outcome and backdate it.
async fn settle(
    pool: &PgPool,
    id: Uuid,
    admin_id: Uuid,
    outcome: Outcome,
    i: usize,
    loan_amount: f64,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let days = i as i64;

    match outcome {
        Outcome::Pending => {
            sqlx::query("UPDATE loan_applications SET created_at = $2 WHERE id = $1")
                .bind(id)
                .bind(now - Duration::days(1 + days * 3))
                .execute(pool)
                .await?;
        }
        Outcome::Approved => {
            let disbursed = Decimal::from_f64(loan_amount)
                .ok_or_else(|| anyhow::anyhow!("loan amount not representable: {loan_amount}"))?
                .round_dp(2);
            application_repo::approve(pool, id, admin_id, disbursed).await?;

            // Fractions of the disbursed amount, some loans fully repaid.
            let repaid_pct = [0, 25, 50, 80, 100, 40, 100, 10][i % 8];
            let repaid = (disbursed * Decimal::from(repaid_pct) / Decimal::from(100)).round_dp(2);

            sqlx::query(
                r#"UPDATE loan_applications
                   SET created_at = $2, approved_at = $3, repaid_amount = $4
                   WHERE id = $1"#,
            )
            .bind(id)
            .bind(now - Duration::days(40 + days * 10))
            .bind(now - Duration::days(5 + days * 7))
            .bind(repaid)
            .execute(pool)
            .await?;
        }
        Outcome::Rejected => {
            let reason = REJECTION_REASONS[i % REJECTION_REASONS.len()];
            application_repo::reject(pool, id, admin_id, reason).await?;

            sqlx::query(
                "UPDATE loan_applications SET created_at = $2, approved_at = $3 WHERE id = $1",
            )
            .bind(id)
            .bind(now - Duration::days(20 + days * 15))
            .bind(now - Duration::days(2 + days * 6))
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Rating;

    #[test]
    fn approved_profiles_score_better_than_rejected() {
        let scoring = ScoringContext::heuristic_only();
        for i in 0..4 {
            let approved = scoring.evaluate(&sample_attributes(Outcome::Approved, i));
            let rejected = scoring.evaluate(&sample_attributes(Outcome::Rejected, i));
            assert!(approved.credit_score > rejected.credit_score);
        }
    }

    #[test]
    fn rejected_profiles_are_poor() {
        let scoring = ScoringContext::heuristic_only();
        for i in 0..4 {
            let result = scoring.evaluate(&sample_attributes(Outcome::Rejected, i));
            assert_eq!(result.rating, Rating::Poor);
        }
    }

    #[test]
    fn pending_profiles_stay_in_range() {
        for i in 0..5 {
            let attrs = sample_attributes(Outcome::Pending, i);
            // Ratios are percentages
            assert!((0.0..=100.0).contains(&attrs.delinquency_ratio));
            assert!((0.0..=100.0).contains(&attrs.credit_utilization_ratio));
            assert!((18..=70).contains(&attrs.age));
        }
    }
}
