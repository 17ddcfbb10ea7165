mod common;

use rust_decimal::Decimal;

use common::{seed_admin, seed_user, setup_test_db};
use credit_risk::db::application_repo;
use credit_risk::scoring::ScoringContext;
use credit_risk::services::sample_data::{seed_application, Outcome};

#[tokio::test]
async fn test_seeded_approval_is_backdated_and_partly_repaid() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "Seeded Borrower").await;
    let admin = seed_admin(&pool).await;
    let scoring = ScoringContext::heuristic_only();

    let application = seed_application(&pool, &scoring, user.id, admin.id, Outcome::Approved, 2)
        .await
        .unwrap();

    assert_eq!(application.status, "Approved");
    assert_eq!(application.approved_by, Some(admin.id));
    assert!(application.created_at < chrono::Utc::now() - chrono::Duration::days(30));

    // Third approved sample repays half of the disbursed amount
    let disbursed = application.disbursed_amount.unwrap();
    assert_eq!(application.repaid_amount, (disbursed / Decimal::from(2)).round_dp(2));
}

#[tokio::test]
async fn test_failed_settle_leaves_no_pending_row() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "Unsettled Borrower").await;
    let scoring = ScoringContext::heuristic_only();

    // No such admin: the approval breaks the approved_by foreign key
    let result = seed_application(
        &pool,
        &scoring,
        user.id,
        uuid::Uuid::new_v4(),
        Outcome::Approved,
        0,
    )
    .await;
    assert!(result.is_err());

    let applications = application_repo::list_for_user(&pool, user.id).await.unwrap();
    assert!(applications.is_empty());
}
