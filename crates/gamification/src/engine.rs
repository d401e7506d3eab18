use std::sync::Arc;

use serde::Serialize;
use sqlx::types::Uuid;

use devlink_common::get_current_timestamp;

use crate::ledger;
use crate::{
    AchievementRecord, AchievementStore, Badge, GamificationError, NotificationSink,
    UserNotification, UserXpStore,
};

const DAY_SECS: i64 = 24 * 60 * 60;

/// Outcome of an XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpAward {
    pub new_xp: i64,
    pub new_level: i64,
    pub leveled_up: bool,
}

/// Outcome of a daily login. `extended` is false for repeat logins within
/// the same 24h window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoginStreak {
    pub streak_days: i64,
    pub extended: bool,
}

/// Orchestrates XP grants, level-up detection, idempotent badge grants and
/// notification side effects against the store seams.
///
/// Store mutations fail loudly; notification pushes are best-effort and are
/// only logged on failure.
pub struct AwardEngine<S> {
    store: Arc<S>,
}

impl<S> AwardEngine<S>
where
    S: UserXpStore + AchievementStore + NotificationSink,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Adds `amount` XP to the user and reports the level transition.
    ///
    /// The increment happens as one atomic add at the storage layer, so two
    /// racing grants both land and neither reads a stale total.
    pub async fn award_xp(
        &self,
        user_id: Uuid,
        amount: i64,
        reason: &str,
    ) -> Result<XpAward, GamificationError> {
        if amount <= 0 {
            return Err(GamificationError::InvalidXpAmount(amount));
        }

        let new_xp = self.store.add_xp(user_id, amount).await?;
        let old_level = ledger::level_for(new_xp - amount)?;
        let new_level = ledger::level_for(new_xp)?;
        let leveled_up = new_level > old_level;

        self.notify(UserNotification::xp_awarded(user_id, amount, reason))
            .await;
        if leveled_up {
            tracing::info!(
                "[AwardEngine::award_xp] user {} reached level {}",
                user_id,
                new_level
            );
            self.notify(UserNotification::level_up(user_id, new_level))
                .await;
        }

        Ok(XpAward {
            new_xp,
            new_level,
            leveled_up,
        })
    }

    /// Grants `badge` to the user once. Returns `false` when the badge was
    /// already held.
    ///
    /// Idempotency rests on the achievement store's `(user_id, badge)`
    /// uniqueness, not on a separate existence check, so two racing grants
    /// resolve to one record and one XP bonus.
    pub async fn award_badge(
        &self,
        user_id: Uuid,
        badge: Badge,
    ) -> Result<bool, GamificationError> {
        let def = badge.definition();

        let record = AchievementRecord::unlock(user_id, badge);
        if !self.store.grant(record).await? {
            tracing::debug!(
                "[AwardEngine::award_badge] user {} already holds {}",
                user_id,
                badge
            );
            return Ok(false);
        }

        if def.xp_value > 0 {
            self.award_xp(
                user_id,
                def.xp_value,
                &format!("Unlocked badge: {}", def.title),
            )
            .await?;
        }
        self.notify(UserNotification::badge_unlocked(user_id, badge))
            .await;

        tracing::info!(
            "[AwardEngine::award_badge] user {} unlocked {} (+{} XP)",
            user_id,
            badge,
            def.xp_value
        );
        Ok(true)
    }

    /// String-keyed variant of `award_badge` for API-boundary callers.
    /// Unknown keys are an error, never a silent no-op.
    pub async fn award_badge_key(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<bool, GamificationError> {
        let badge = key
            .parse::<Badge>()
            .map_err(|_| GamificationError::UnknownBadge(key.to_string()))?;
        self.award_badge(user_id, badge).await
    }

    /// Administrative absolute correction, the one sanctioned non-monotonic
    /// XP write. Emits no notifications.
    pub async fn correct_xp(
        &self,
        user_id: Uuid,
        new_total: i64,
    ) -> Result<XpAward, GamificationError> {
        if new_total < 0 {
            return Err(GamificationError::InvalidXpAmount(new_total));
        }

        let previous = self.store.get(user_id).await?;
        let new_xp = self.store.set_xp(user_id, new_total).await?;
        let new_level = ledger::level_for(new_xp)?;
        tracing::warn!(
            "[AwardEngine::correct_xp] user {} corrected {} -> {}",
            user_id,
            previous.xp_points,
            new_xp
        );
        Ok(XpAward {
            new_xp,
            new_level,
            leveled_up: new_level > previous.level(),
        })
    }

    /// Records a daily login for streak tracking. Extends the streak when
    /// the previous login was 24-48h ago, resets it beyond 48h, and is a
    /// no-op within the same 24h window.
    pub async fn record_daily_login(
        &self,
        user_id: Uuid,
    ) -> Result<LoginStreak, GamificationError> {
        let now = get_current_timestamp() as i64;
        let state = self.store.get(user_id).await?;

        let elapsed = now - state.last_login_at;
        if elapsed < DAY_SECS {
            return Ok(LoginStreak {
                streak_days: state.login_streak_days,
                extended: false,
            });
        }

        let streak_days = if elapsed < 2 * DAY_SECS {
            state.login_streak_days + 1
        } else {
            1
        };
        self.store
            .set_login_streak(user_id, streak_days, now)
            .await?;

        if streak_days > 0 && streak_days % 7 == 0 {
            self.notify(UserNotification::streak_milestone(user_id, streak_days))
                .await;
        }

        Ok(LoginStreak {
            streak_days,
            extended: true,
        })
    }

    async fn notify(&self, notification: UserNotification) {
        if let Err(e) = self.store.push(notification).await {
            tracing::warn!("[AwardEngine::notify] notification delivery failed: {}", e);
        }
    }
}
