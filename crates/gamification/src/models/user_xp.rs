use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

use devlink_common::get_current_timestamp;
use devlink_database::{SqlxCrud, SqlxFilterQuery, SqlxSchema};

use crate::ledger::XP_PER_LEVEL;

/// Per-user XP record. The level is never stored: it is derived from
/// `xp_points` on every read, so the two cannot drift apart under partial
/// writes or racing grants. `xp_points` is kept non-negative by a storage
/// CHECK constraint and by engine-side validation.
#[derive(Debug, Serialize, Deserialize, Clone, Default, sqlx::FromRow)]
pub struct UserXpState {
    pub user_id: Uuid,

    pub xp_points: i64,

    pub login_streak_days: i64,
    pub last_login_at: i64,

    pub created_at: i64,
    pub updated_at: i64,
}

impl UserXpState {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            xp_points: 0,
            login_streak_days: 0,
            last_login_at: 0,
            created_at: get_current_timestamp() as i64,
            updated_at: 0,
        }
    }

    /// Current level, derived from the XP total.
    pub fn level(&self) -> i64 {
        self.xp_points / XP_PER_LEVEL + 1
    }

    /// XP total at which the next level begins.
    pub fn next_level_threshold(&self) -> i64 {
        self.level() * XP_PER_LEVEL
    }

    /// Fraction of the current level band completed, in `[0, 1)`.
    pub fn progress_fraction(&self) -> f64 {
        (self.xp_points - (self.level() - 1) * XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64
    }
}

impl SqlxSchema for UserXpState {
    type Id = Uuid;
    type Row = Self;

    const TABLE_NAME: &'static str = "user_xp_states";
    const ID_COLUMN_NAME: &'static str = "user_id";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "xp_points",
        "login_streak_days",
        "last_login_at",
        "created_at",
        "updated_at",
    ];

    fn get_id_value(&self) -> Uuid {
        self.user_id
    }

    fn from_row(row: Self) -> Self {
        row
    }

    fn create_table_sql() -> String {
        r#"CREATE TABLE IF NOT EXISTS "user_xp_states" (
            "user_id" UUID PRIMARY KEY,
            "xp_points" BIGINT NOT NULL DEFAULT 0 CHECK ("xp_points" >= 0),
            "login_streak_days" BIGINT NOT NULL DEFAULT 0,
            "last_login_at" BIGINT NOT NULL DEFAULT 0,
            "created_at" BIGINT NOT NULL DEFAULT floor(extract(epoch from now())),
            "updated_at" BIGINT NOT NULL DEFAULT floor(extract(epoch from now()))
        );"#
        .to_string()
    }
}

impl SqlxCrud for UserXpState {
    fn bind_insert<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
        query
            .bind(self.user_id)
            .bind(self.xp_points)
            .bind(self.login_streak_days)
            .bind(self.last_login_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn bind_update<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
        query
            .bind(self.xp_points)
            .bind(self.login_streak_days)
            .bind(self.last_login_at)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(self.user_id)
    }
}

impl SqlxFilterQuery for UserXpState {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_derived_from_xp() {
        let mut state = UserXpState::new(Uuid::new_v4());
        assert_eq!(state.level(), 1);
        state.xp_points = 999;
        assert_eq!(state.level(), 1);
        state.xp_points = 1000;
        assert_eq!(state.level(), 2);
        assert_eq!(state.next_level_threshold(), 2000);
    }

    #[test]
    fn ddl_keeps_xp_non_negative() {
        let ddl = UserXpState::create_table_sql();
        assert!(ddl.contains("CHECK (\"xp_points\" >= 0)"));
        assert!(ddl.contains("\"user_id\" UUID PRIMARY KEY"));
    }
}
