use std::env;
use uuid::Uuid;

use founder_onboarding_api::db::Database;
use founder_onboarding_api::db_storage::{NewDocument, OnboardingStorage};
use founder_onboarding_api::models::{NotificationKind, Sender};
use founder_onboarding_api::scoring::score_profile;
use founder_onboarding_api::user_context::UserContext;
use founder_onboarding_api::validation::{ValidCompany, ValidCompanyPatch};

async fn storage() -> anyhow::Result<OnboardingStorage> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;
    Ok(OnboardingStorage::new(db.pool.clone()))
}

/// Unique caller per run so repeated runs never collide.
fn test_user() -> UserContext {
    let id = format!("test-{}", Uuid::new_v4().simple());
    UserContext::new(&id, Some("founder@example.com")).unwrap()
}

fn document(n: usize) -> NewDocument {
    NewDocument {
        name: format!("deck-{}.pdf", n),
        mime_type: "application/pdf".to_string(),
        size: 1024,
        path: format!("uploads/test-{}-deck-{}.pdf", Uuid::new_v4(), n),
    }
}

/// Full onboarding flow: company, verification, financials, documents, score.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn onboarding_flow_reaches_full_score() -> anyhow::Result<()> {
    let storage = storage().await?;
    let user = test_user();

    let before = score_profile(&storage.profile_snapshot(&user.user_id).await?);
    assert_eq!(before.score, 0);

    let company = storage
        .save_company(
            &user,
            &ValidCompany {
                name: "Acme Robotics".to_string(),
                sector: "Hardware".to_string(),
                target_raise: 2_000_000.0,
                revenue: 1_500_000.0,
            },
        )
        .await?;
    assert!(!company.kyc_verified);
    assert!(!company.financials_linked);

    storage.mark_kyc_verified(&user).await?;
    storage.mark_financials_linked(&user).await?;
    for n in 0..3 {
        storage.record_document(&user, company.id, &document(n)).await?;
    }

    let report = score_profile(&storage.profile_snapshot(&user.user_id).await?);
    assert_eq!(report.score, 100);
    assert_eq!(
        report.reasons[2],
        "3 documents uploaded - Comprehensive due diligence package"
    );

    let documents = storage.list_documents(&user.user_id).await?;
    assert_eq!(documents.len(), 3);
    assert!(documents
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let kinds: Vec<String> = storage
        .list_notifications(&user.user_id)
        .await?
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert!(kinds.contains(&NotificationKind::CompanyUpdated.as_str().to_string()));
    assert!(kinds.contains(&NotificationKind::KycVerified.as_str().to_string()));
    assert!(kinds.contains(&NotificationKind::FinancialsLinked.as_str().to_string()));
    assert_eq!(
        kinds
            .iter()
            .filter(|k| k.as_str() == NotificationKind::FileUploaded.as_str())
            .count(),
        3
    );

    Ok(())
}

#[tokio::test]
#[ignore]
async fn saving_twice_keeps_one_company() -> anyhow::Result<()> {
    let storage = storage().await?;
    let user = test_user();

    let first = storage
        .save_company(
            &user,
            &ValidCompany {
                name: "First".to_string(),
                sector: "Fintech".to_string(),
                target_raise: 500_000.0,
                revenue: 0.0,
            },
        )
        .await?;
    let second = storage
        .save_company(
            &user,
            &ValidCompany {
                name: "Second".to_string(),
                sector: "Fintech".to_string(),
                target_raise: 750_000.0,
                revenue: 20_000.0,
            },
        )
        .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Second");

    let patched = storage
        .update_company(
            &user,
            &ValidCompanyPatch {
                revenue: Some(500_000.0),
                ..Default::default()
            },
        )
        .await?
        .expect("company exists");
    assert_eq!(patched.name, "Second");
    assert_eq!(patched.revenue, 500_000.0);

    let report = score_profile(&storage.profile_snapshot(&user.user_id).await?);
    assert_eq!(report.score, 13);
    assert_eq!(
        report.reasons[3],
        "Revenue performance: $500,000 (Score: 13/25)"
    );

    Ok(())
}

#[tokio::test]
#[ignore]
async fn flows_create_placeholder_company() -> anyhow::Result<()> {
    let storage = storage().await?;
    let user = test_user();

    assert!(storage.find_company(&user.user_id).await?.is_none());

    let company = storage.mark_kyc_verified(&user).await?;
    assert_eq!(company.name, "Default Company");
    assert_eq!(company.sector, "Technology");
    assert_eq!(company.revenue, 0.0);
    assert!(company.kyc_verified);

    let report = score_profile(&storage.profile_snapshot(&user.user_id).await?);
    assert_eq!(report.score, 30);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn notifications_and_messages_are_scoped_to_user() -> anyhow::Result<()> {
    let storage = storage().await?;
    let owner = test_user();
    let other = test_user();

    storage.mark_financials_linked(&owner).await?;
    let notification = storage
        .list_notifications(&owner.user_id)
        .await?
        .into_iter()
        .next()
        .expect("notification recorded");
    assert!(notification.read_at.is_none());

    assert!(storage
        .mark_notification_read(&other.user_id, notification.id)
        .await?
        .is_none());

    let read = storage
        .mark_notification_read(&owner.user_id, notification.id)
        .await?
        .expect("owner can mark read");
    assert!(read.read_at.is_some());

    storage
        .post_message(&owner, Sender::User, "Hello, when is my review?")
        .await?;
    storage
        .post_message(&owner, Sender::Support, "Later this week.")
        .await?;

    let messages = storage.list_messages(&owner.user_id).await?;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Hello, when is my review?");
    assert!(storage.list_messages(&other.user_id).await?.is_empty());

    Ok(())
}
