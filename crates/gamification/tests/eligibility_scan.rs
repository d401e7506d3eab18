mod common;

use std::sync::Arc;

use sqlx::types::Uuid;

use devlink_gamification::{
    AwardEngine, Badge, EligibilityScanner, NotificationType, UserActivityStats,
};

use common::InMemoryStore;

fn scanner_with_user() -> (EligibilityScanner<InMemoryStore>, Arc<InMemoryStore>, Uuid) {
    let user_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_user(user_id));
    (EligibilityScanner::new(store.clone()), store, user_id)
}

#[tokio::test]
async fn five_jobs_grant_the_first_two_tiers_only() {
    let (scanner, store, user_id) = scanner_with_user();
    store.set_stats(
        user_id,
        UserActivityStats {
            accepted_jobs: 5,
            ..Default::default()
        },
    );

    let granted = scanner.check_and_award_badges(user_id).await.unwrap();

    assert_eq!(granted, vec![Badge::FirstJob, Badge::FiveJobs]);
    assert_eq!(store.records_for(user_id, Badge::FirstJob), 1);
    assert_eq!(store.records_for(user_id, Badge::FiveJobs), 1);
    assert_eq!(store.records_for(user_id, Badge::TenJobs), 0);

    let expected_xp =
        Badge::FirstJob.definition().xp_value + Badge::FiveJobs.definition().xp_value;
    assert_eq!(store.xp_of(user_id), expected_xp);
}

#[tokio::test]
async fn rescanning_grants_nothing_new() {
    let (scanner, store, user_id) = scanner_with_user();
    store.set_stats(
        user_id,
        UserActivityStats {
            accepted_jobs: 5,
            ..Default::default()
        },
    );

    let first = scanner.check_and_award_badges(user_id).await.unwrap();
    assert_eq!(first.len(), 2);
    let xp_after_first = store.xp_of(user_id);

    let second = scanner.check_and_award_badges(user_id).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(store.xp_of(user_id), xp_after_first);
    assert_eq!(store.achievements.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn overlapping_thresholds_grant_both_badges() {
    let (scanner, store, user_id) = scanner_with_user();
    store.set_stats(
        user_id,
        UserActivityStats {
            active_certifications: 5,
            ..Default::default()
        },
    );

    let granted = scanner.check_and_award_badges(user_id).await.unwrap();

    assert!(granted.contains(&Badge::SkillMaster));
    assert!(granted.contains(&Badge::CertifiedPro));
    assert_eq!(granted.len(), 2);
}

#[tokio::test]
async fn login_streak_feeds_the_streak_badge() {
    let (scanner, store, user_id) = scanner_with_user();
    store.set_stats(
        user_id,
        UserActivityStats {
            login_streak_days: 30,
            ..Default::default()
        },
    );

    let granted = scanner.check_and_award_badges(user_id).await.unwrap();

    assert_eq!(granted, vec![Badge::StreakMaster]);
    assert_eq!(
        store.xp_of(user_id),
        Badge::StreakMaster.definition().xp_value
    );
}

#[tokio::test]
async fn badges_granted_elsewhere_are_skipped() {
    let (scanner, store, user_id) = scanner_with_user();
    let engine = AwardEngine::new(store.clone());
    engine.award_badge(user_id, Badge::FirstJob).await.unwrap();
    store.set_stats(
        user_id,
        UserActivityStats {
            accepted_jobs: 1,
            ..Default::default()
        },
    );

    let granted = scanner.check_and_award_badges(user_id).await.unwrap();

    assert!(granted.is_empty());
    assert_eq!(store.records_for(user_id, Badge::FirstJob), 1);
    assert_eq!(store.notifications_of(NotificationType::BadgeUnlocked), 1);
}

#[tokio::test]
async fn below_threshold_activity_grants_nothing() {
    let (scanner, store, user_id) = scanner_with_user();
    store.set_stats(
        user_id,
        UserActivityStats {
            assets_sold: 9,
            portfolio_items: 4,
            rooms_joined: 2,
            ..Default::default()
        },
    );

    let granted = scanner.check_and_award_badges(user_id).await.unwrap();

    assert!(granted.is_empty());
    assert!(store.achievements.lock().unwrap().is_empty());
    assert_eq!(store.xp_of(user_id), 0);
}
