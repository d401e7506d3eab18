use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Uuid;

use devlink_common::get_current_timestamp;
use devlink_database::{text_enum, SqlxCrud, SqlxFilterQuery, SqlxSchema};

use crate::badge::Badge;

text_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum NotificationType {
        XpAwarded => "xp_awarded",
        LevelUp => "level_up",
        BadgeUnlocked => "badge_unlocked",
        StreakMilestone => "streak_milestone",
    }
}

/// Fire-and-forget user-facing notification. Delivery is best-effort: a
/// failed write never rolls back the grant that produced it.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct UserNotification {
    pub id: Uuid,

    pub user_id: Uuid,
    pub notification_type: NotificationType,

    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub metadata: Option<serde_json::Value>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl UserNotification {
    fn new(
        user_id: Uuid,
        notification_type: NotificationType,
        title: String,
        message: String,
        link: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        let now = get_current_timestamp() as i64;
        Self {
            id: Uuid::new_v4(),
            user_id,
            notification_type,
            title,
            message,
            link,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn xp_awarded(user_id: Uuid, amount: i64, reason: &str) -> Self {
        Self::new(
            user_id,
            NotificationType::XpAwarded,
            "XP earned".to_string(),
            format!("+{} XP: {}", amount, reason),
            None,
            Some(json!({ "amount": amount })),
        )
    }

    pub fn level_up(user_id: Uuid, new_level: i64) -> Self {
        Self::new(
            user_id,
            NotificationType::LevelUp,
            "Level up!".to_string(),
            format!("You reached level {}", new_level),
            None,
            Some(json!({ "level": new_level })),
        )
    }

    pub fn badge_unlocked(user_id: Uuid, badge: Badge) -> Self {
        let def = badge.definition();
        Self::new(
            user_id,
            NotificationType::BadgeUnlocked,
            "Badge unlocked".to_string(),
            format!("You unlocked the \"{}\" badge", def.title),
            Some(format!("/profile/{}", user_id)),
            Some(json!({ "badge": badge.as_str(), "rarity": def.rarity.as_str() })),
        )
    }

    pub fn streak_milestone(user_id: Uuid, streak_days: i64) -> Self {
        Self::new(
            user_id,
            NotificationType::StreakMilestone,
            "Login streak".to_string(),
            format!("{} days in a row, keep it going", streak_days),
            None,
            Some(json!({ "streak_days": streak_days })),
        )
    }
}

impl SqlxSchema for UserNotification {
    type Id = Uuid;
    type Row = Self;

    const TABLE_NAME: &'static str = "user_notifications";
    const ID_COLUMN_NAME: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "notification_type",
        "title",
        "message",
        "link",
        "metadata",
        "created_at",
        "updated_at",
    ];
    const INDEXES_SQL: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS \"user_notifications_user_id_idx\" ON \"user_notifications\" (\"user_id\");",
    ];

    fn get_id_value(&self) -> Uuid {
        self.id
    }

    fn from_row(row: Self) -> Self {
        row
    }

    fn create_table_sql() -> String {
        r#"CREATE TABLE IF NOT EXISTS "user_notifications" (
            "id" UUID PRIMARY KEY,
            "user_id" UUID NOT NULL,
            "notification_type" TEXT NOT NULL,
            "title" TEXT NOT NULL,
            "message" TEXT NOT NULL,
            "link" TEXT,
            "metadata" JSONB,
            "created_at" BIGINT NOT NULL DEFAULT floor(extract(epoch from now())),
            "updated_at" BIGINT NOT NULL DEFAULT floor(extract(epoch from now()))
        );"#
        .to_string()
    }
}

impl SqlxCrud for UserNotification {
    fn bind_insert<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
        query
            .bind(self.id)
            .bind(self.user_id)
            .bind(self.notification_type)
            .bind(self.title.clone())
            .bind(self.message.clone())
            .bind(self.link.clone())
            .bind(self.metadata.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn bind_update<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
        query
            .bind(self.user_id)
            .bind(self.notification_type)
            .bind(self.title.clone())
            .bind(self.message.clone())
            .bind(self.link.clone())
            .bind(self.metadata.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(self.id)
    }
}

impl SqlxFilterQuery for UserNotification {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_unlock_links_back_to_profile() {
        let user_id = Uuid::new_v4();
        let notification = UserNotification::badge_unlocked(user_id, Badge::FirstJob);
        assert_eq!(notification.notification_type, NotificationType::BadgeUnlocked);
        assert_eq!(notification.link.as_deref(), Some(format!("/profile/{}", user_id).as_str()));
        assert!(notification.message.contains("First Commission"));
    }

    #[test]
    fn xp_notification_carries_amount() {
        let notification = UserNotification::xp_awarded(Uuid::new_v4(), 150, "test grant");
        assert_eq!(notification.metadata.unwrap()["amount"], 150);
    }
}
