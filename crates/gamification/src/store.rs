use async_trait::async_trait;
use sqlx::types::Uuid;

use crate::{
    AchievementRecord, Badge, GamificationError, UserActivityStats, UserNotification, UserXpState,
};

/// Per-user XP records. `add_xp` is the hot path and must be implemented as
/// a single atomic add at the storage layer (not read-modify-write), so
/// concurrent grants for the same user cannot lose updates.
#[async_trait]
pub trait UserXpStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<UserXpState, GamificationError>;

    /// Registers a fresh record; the engine never creates users implicitly.
    async fn create(&self, state: UserXpState) -> Result<UserXpState, GamificationError>;

    /// Atomically adds `amount` to the user's XP and returns the new total.
    /// Fails with `UserNotFound` when no record exists.
    async fn add_xp(&self, user_id: Uuid, amount: i64) -> Result<i64, GamificationError>;

    /// Overwrites the XP total (administrative correction only).
    async fn set_xp(&self, user_id: Uuid, xp_points: i64) -> Result<i64, GamificationError>;

    async fn set_login_streak(
        &self,
        user_id: Uuid,
        streak_days: i64,
        last_login_at: i64,
    ) -> Result<(), GamificationError>;
}

/// Append-only achievement records, unique per `(user_id, badge)`.
#[async_trait]
pub trait AchievementStore: Send + Sync {
    /// Inserts the record. Returns `false` when the user already holds the
    /// badge (a storage-level uniqueness conflict), `true` on a fresh grant.
    async fn grant(&self, record: AchievementRecord) -> Result<bool, GamificationError>;

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>, GamificationError>;

    async fn is_held(&self, user_id: Uuid, badge: Badge) -> Result<bool, GamificationError>;
}

/// Fire-and-forget notification delivery. No delivery guarantee is required
/// of implementations; the engine treats failures as non-fatal.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn push(&self, notification: UserNotification) -> Result<(), GamificationError>;
}

/// Read-only aggregate activity counters, used only by the eligibility
/// scanner. Implementations should issue the underlying reads concurrently
/// where the store allows.
#[async_trait]
pub trait ActivityStatsSource: Send + Sync {
    async fn stats_for(&self, user_id: Uuid) -> Result<UserActivityStats, GamificationError>;
}
