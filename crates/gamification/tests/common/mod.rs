use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::types::Uuid;

use devlink_gamification::{
    AchievementRecord, AchievementStore, ActivityStatsSource, Badge, GamificationError,
    NotificationSink, NotificationType, UserActivityStats, UserNotification, UserXpState,
    UserXpStore,
};

/// In-memory stand-in for every store seam, with a switch to make the
/// notification sink fail on demand.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: Mutex<HashMap<Uuid, UserXpState>>,
    pub achievements: Mutex<Vec<AchievementRecord>>,
    pub notifications: Mutex<Vec<UserNotification>>,
    pub stats: Mutex<HashMap<Uuid, UserActivityStats>>,
    pub fail_notifications: AtomicBool,
}

impl InMemoryStore {
    pub fn with_user(user_id: Uuid) -> Self {
        let store = Self::default();
        store
            .users
            .lock()
            .unwrap()
            .insert(user_id, UserXpState::new(user_id));
        store
    }

    pub fn xp_of(&self, user_id: Uuid) -> i64 {
        self.users.lock().unwrap()[&user_id].xp_points
    }

    pub fn records_for(&self, user_id: Uuid, badge: Badge) -> usize {
        self.achievements
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.badge == badge)
            .count()
    }

    pub fn notifications_of(&self, notification_type: NotificationType) -> usize {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.notification_type == notification_type)
            .count()
    }

    pub fn set_stats(&self, user_id: Uuid, stats: UserActivityStats) {
        self.stats.lock().unwrap().insert(user_id, stats);
    }
}

#[async_trait]
impl UserXpStore for InMemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<UserXpState, GamificationError> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(GamificationError::UserNotFound(user_id))
    }

    async fn create(&self, state: UserXpState) -> Result<UserXpState, GamificationError> {
        self.users
            .lock()
            .unwrap()
            .insert(state.user_id, state.clone());
        Ok(state)
    }

    async fn add_xp(&self, user_id: Uuid, amount: i64) -> Result<i64, GamificationError> {
        let mut users = self.users.lock().unwrap();
        let state = users
            .get_mut(&user_id)
            .ok_or(GamificationError::UserNotFound(user_id))?;
        state.xp_points += amount;
        Ok(state.xp_points)
    }

    async fn set_xp(&self, user_id: Uuid, xp_points: i64) -> Result<i64, GamificationError> {
        let mut users = self.users.lock().unwrap();
        let state = users
            .get_mut(&user_id)
            .ok_or(GamificationError::UserNotFound(user_id))?;
        state.xp_points = xp_points;
        Ok(state.xp_points)
    }

    async fn set_login_streak(
        &self,
        user_id: Uuid,
        streak_days: i64,
        last_login_at: i64,
    ) -> Result<(), GamificationError> {
        let mut users = self.users.lock().unwrap();
        let state = users
            .get_mut(&user_id)
            .ok_or(GamificationError::UserNotFound(user_id))?;
        state.login_streak_days = streak_days;
        state.last_login_at = last_login_at;
        Ok(())
    }
}

#[async_trait]
impl AchievementStore for InMemoryStore {
    async fn grant(&self, record: AchievementRecord) -> Result<bool, GamificationError> {
        let mut achievements = self.achievements.lock().unwrap();
        // mirrors the (user_id, badge) uniqueness constraint
        if achievements
            .iter()
            .any(|a| a.user_id == record.user_id && a.badge == record.badge)
        {
            return Ok(false);
        }
        achievements.push(record);
        Ok(true)
    }

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>, GamificationError> {
        Ok(self
            .achievements
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn is_held(&self, user_id: Uuid, badge: Badge) -> Result<bool, GamificationError> {
        Ok(self
            .achievements
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.user_id == user_id && a.badge == badge))
    }
}

#[async_trait]
impl NotificationSink for InMemoryStore {
    async fn push(&self, notification: UserNotification) -> Result<(), GamificationError> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(GamificationError::NotificationFailed("sink offline".to_string()));
        }
        self.notifications.lock().unwrap().push(notification);
        Ok(())
    }
}

#[async_trait]
impl ActivityStatsSource for InMemoryStore {
    async fn stats_for(&self, user_id: Uuid) -> Result<UserActivityStats, GamificationError> {
        Ok(self
            .stats
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}
