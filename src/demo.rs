//! Sample payloads served when `DEMO_FALLBACKS` is on and the caller has no data yet.
//!
//! Never used for scoring.

use crate::models::{Company, Document, Message, Notification};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Stable ids so clients can tell sample rows apart across requests.
fn sample_id(n: u128) -> Uuid {
    Uuid::from_u128(0x5a3d_0000_0000_4000_8000_0000_0000_0000 | n)
}

fn sample_company_id() -> Uuid {
    sample_id(1)
}

pub fn sample_company(user_id: &str) -> Company {
    Company {
        id: sample_company_id(),
        user_id: user_id.to_string(),
        name: "TechStart Inc.".to_string(),
        sector: "SaaS".to_string(),
        target_raise: 2_500_000.0,
        revenue: 500_000.0,
        kyc_verified: true,
        financials_linked: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn sample_documents(now: DateTime<Utc>) -> Vec<Document> {
    let doc = |n: u128, name: &str, mime: &str, size: i64, days_ago: i64| Document {
        id: sample_id(100 + n),
        company_id: sample_company_id(),
        name: name.to_string(),
        mime_type: mime.to_string(),
        size,
        path: format!("/mock/path/{}", name),
        created_at: now - Duration::days(days_ago),
    };

    vec![
        doc(3, "business_plan.pdf", "application/pdf", 1_843_200, 1),
        doc(
            2,
            "financials.xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            512_000,
            3,
        ),
        doc(1, "pitch_deck.pdf", "application/pdf", 2_457_600, 5),
    ]
}

pub fn sample_notifications(user_id: &str, now: DateTime<Utc>) -> Vec<Notification> {
    let notification = |n: u128, kind: &str, message: &str, age: Duration| Notification {
        id: sample_id(200 + n),
        user_id: user_id.to_string(),
        kind: kind.to_string(),
        message: message.to_string(),
        created_at: now - age,
        read_at: None,
    };

    vec![
        notification(
            3,
            "meeting",
            "Investor meeting scheduled for next week. Prepare your pitch deck.",
            Duration::hours(3),
        ),
        notification(
            2,
            "score",
            "Your investability score has been calculated. Check your dashboard for details.",
            Duration::days(1),
        ),
        notification(
            1,
            "document",
            "Welcome to your investor dashboard! Start by uploading your documents.",
            Duration::days(2),
        ),
    ]
}

pub fn sample_messages(now: DateTime<Utc>) -> Vec<Message> {
    let two_days_ago = now - Duration::days(2);
    let message = |n: u128, sender: &str, content: &str, at: DateTime<Utc>| Message {
        id: sample_id(300 + n),
        company_id: sample_company_id(),
        sender: sender.to_string(),
        content: content.to_string(),
        created_at: at,
    };

    vec![
        message(
            1,
            "support",
            "Welcome to our investor platform! How can we help you today?",
            two_days_ago,
        ),
        message(
            2,
            "user",
            "Hi! I have some questions about the onboarding process.",
            two_days_ago + Duration::minutes(5),
        ),
        message(
            3,
            "support",
            "Of course! The onboarding process typically takes 2-3 weeks. We'll guide you through each step.",
            two_days_ago + Duration::minutes(10),
        ),
        message(
            4,
            "support",
            "Your documents look great! We'll schedule a call with potential investors soon.",
            now - Duration::days(1),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_follow_listing_order() {
        let now = Utc::now();

        let docs = sample_documents(now);
        assert!(docs.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let notes = sample_notifications("founder", now);
        assert!(notes.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(notes.iter().all(|n| n.user_id == "founder"));

        let messages = sample_messages(now);
        assert!(messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_sample_ids_are_distinct() {
        let now = Utc::now();
        let mut ids: Vec<Uuid> = sample_documents(now).iter().map(|d| d.id).collect();
        ids.extend(sample_messages(now).iter().map(|m| m.id));
        ids.extend(sample_notifications("u", now).iter().map(|n| n.id));
        ids.push(sample_company("u").id);

        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }
}
