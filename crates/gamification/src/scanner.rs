use std::collections::HashSet;
use std::sync::Arc;

use sqlx::types::Uuid;

use crate::{
    AchievementStore, ActivityMetric, ActivityStatsSource, AwardEngine, Badge, GamificationError,
    NotificationSink, UserXpStore,
};

/// One eligibility rule: an activity counter crossing its threshold earns
/// the badge. Rules are independent and not mutually exclusive, so one scan
/// may grant several badges.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdRule {
    pub metric: ActivityMetric,
    pub threshold: i64,
    pub badge: Badge,
}

pub const ELIGIBILITY_RULES: &[ThresholdRule] = &[
    ThresholdRule {
        metric: ActivityMetric::AcceptedJobs,
        threshold: 1,
        badge: Badge::FirstJob,
    },
    ThresholdRule {
        metric: ActivityMetric::AcceptedJobs,
        threshold: 5,
        badge: Badge::FiveJobs,
    },
    ThresholdRule {
        metric: ActivityMetric::AcceptedJobs,
        threshold: 10,
        badge: Badge::TenJobs,
    },
    ThresholdRule {
        metric: ActivityMetric::AssetsSold,
        threshold: 10,
        badge: Badge::TopSeller,
    },
    ThresholdRule {
        metric: ActivityMetric::RoomsJoined,
        threshold: 10,
        badge: Badge::Collaborator,
    },
    ThresholdRule {
        metric: ActivityMetric::PortfolioItems,
        threshold: 5,
        badge: Badge::PortfolioPro,
    },
    ThresholdRule {
        metric: ActivityMetric::ActiveCertifications,
        threshold: 3,
        badge: Badge::SkillMaster,
    },
    ThresholdRule {
        metric: ActivityMetric::ActiveCertifications,
        threshold: 5,
        badge: Badge::CertifiedPro,
    },
    ThresholdRule {
        metric: ActivityMetric::LoginStreakDays,
        threshold: 30,
        badge: Badge::StreakMaster,
    },
];

/// Sweeps a user's aggregate activity against the badge thresholds and
/// awards anything newly qualified through the engine.
pub struct EligibilityScanner<S> {
    engine: AwardEngine<S>,
    store: Arc<S>,
}

impl<S> EligibilityScanner<S>
where
    S: UserXpStore + AchievementStore + NotificationSink + ActivityStatsSource,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            engine: AwardEngine::new(store.clone()),
            store,
        }
    }

    /// Evaluates every rule once and returns the badges granted by this
    /// scan. The stats and achievements reads abort on failure; individual
    /// award failures are logged and the remaining rules still run.
    pub async fn check_and_award_badges(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Badge>, GamificationError> {
        let stats = self.store.stats_for(user_id).await?;
        let held: HashSet<Badge> = self
            .store
            .for_user(user_id)
            .await?
            .iter()
            .map(|achievement| achievement.badge)
            .collect();

        let mut granted = Vec::new();
        for rule in ELIGIBILITY_RULES {
            if stats.metric(rule.metric) < rule.threshold || held.contains(&rule.badge) {
                continue;
            }
            match self.engine.award_badge(user_id, rule.badge).await {
                Ok(true) => granted.push(rule.badge),
                // lost the race to a concurrent grant; nothing to do
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        "[EligibilityScanner::check_and_award_badges] failed to award {} to {}: {}",
                        rule.badge,
                        user_id,
                        e
                    );
                }
            }
        }
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_badge_has_at_most_one_rule() {
        let mut seen = HashSet::new();
        for rule in ELIGIBILITY_RULES {
            assert!(seen.insert(rule.badge), "duplicate rule for {}", rule.badge);
            assert!(rule.threshold >= 1);
        }
    }

    #[test]
    fn rules_cover_the_whole_catalog() {
        let ruled: HashSet<Badge> = ELIGIBILITY_RULES.iter().map(|r| r.badge).collect();
        for badge in Badge::ALL {
            assert!(ruled.contains(badge), "{} has no eligibility rule", badge);
        }
    }
}
