use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

use devlink_common::get_current_timestamp;
use devlink_database::{SqlxCrud, SqlxFilterQuery, SqlxSchema};

use crate::badge::{Badge, Rarity};

/// One unlocked badge for one user, append-only. Title, description, icon,
/// points and rarity are grant-time copies of the catalog definition.
///
/// The `(user_id, badge)` pair is unique at the storage layer; a conflicting
/// insert means the badge was already granted, not a failure.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct AchievementRecord {
    pub id: Uuid,

    pub user_id: Uuid,
    pub badge: Badge,

    pub title: String,
    pub description: String,
    pub icon: String,
    pub points: i64,
    pub rarity: Rarity,

    pub unlocked_at: i64,

    pub created_at: i64,
    pub updated_at: i64,
}

impl AchievementRecord {
    /// Snapshot of the catalog definition for `badge`, unlocked now.
    pub fn unlock(user_id: Uuid, badge: Badge) -> Self {
        let def = badge.definition();
        let now = get_current_timestamp() as i64;
        Self {
            id: Uuid::new_v4(),
            user_id,
            badge,
            title: def.title.to_string(),
            description: def.description.to_string(),
            icon: def.icon.to_string(),
            points: def.xp_value,
            rarity: def.rarity,
            unlocked_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SqlxSchema for AchievementRecord {
    type Id = Uuid;
    type Row = Self;

    const TABLE_NAME: &'static str = "achievements";
    const ID_COLUMN_NAME: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "badge",
        "title",
        "description",
        "icon",
        "points",
        "rarity",
        "unlocked_at",
        "created_at",
        "updated_at",
    ];
    const INDEXES_SQL: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS \"achievements_user_id_idx\" ON \"achievements\" (\"user_id\");",
    ];

    fn get_id_value(&self) -> Uuid {
        self.id
    }

    fn from_row(row: Self) -> Self {
        row
    }

    fn create_table_sql() -> String {
        r#"CREATE TABLE IF NOT EXISTS "achievements" (
            "id" UUID PRIMARY KEY,
            "user_id" UUID NOT NULL,
            "badge" TEXT NOT NULL,
            "title" TEXT NOT NULL,
            "description" TEXT NOT NULL,
            "icon" TEXT NOT NULL,
            "points" BIGINT NOT NULL CHECK ("points" >= 0),
            "rarity" TEXT NOT NULL,
            "unlocked_at" BIGINT NOT NULL,
            "created_at" BIGINT NOT NULL DEFAULT floor(extract(epoch from now())),
            "updated_at" BIGINT NOT NULL DEFAULT floor(extract(epoch from now())),
            CONSTRAINT "achievements_user_badge_unique" UNIQUE ("user_id", "badge")
        );"#
        .to_string()
    }
}

impl SqlxCrud for AchievementRecord {
    fn bind_insert<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
        query
            .bind(self.id)
            .bind(self.user_id)
            .bind(self.badge)
            .bind(self.title.clone())
            .bind(self.description.clone())
            .bind(self.icon.clone())
            .bind(self.points)
            .bind(self.rarity)
            .bind(self.unlocked_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn bind_update<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
        query
            .bind(self.user_id)
            .bind(self.badge)
            .bind(self.title.clone())
            .bind(self.description.clone())
            .bind(self.icon.clone())
            .bind(self.points)
            .bind(self.rarity)
            .bind(self.unlocked_at)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(self.id)
    }
}

impl SqlxFilterQuery for AchievementRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_copies_the_definition() {
        let user_id = Uuid::new_v4();
        let record = AchievementRecord::unlock(user_id, Badge::TopSeller);
        let def = Badge::TopSeller.definition();
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.title, def.title);
        assert_eq!(record.points, def.xp_value);
        assert_eq!(record.rarity, def.rarity);
        assert!(record.unlocked_at > 0);
    }

    #[test]
    fn ddl_enforces_one_badge_per_user() {
        let ddl = AchievementRecord::create_table_sql();
        assert!(ddl.contains("UNIQUE (\"user_id\", \"badge\")"));
    }
}
