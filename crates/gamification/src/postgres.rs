use std::sync::Arc;

use async_trait::async_trait;
use sqlx::types::Uuid;
use sqlx::PgPool;

use devlink_database::{OrderDirection, QueryCriteria, SqlxCrud, SqlxFilterQuery, SqlxSchema};

use crate::{
    AchievementRecord, AchievementStore, ActivityStatsSource, Badge, GamificationError,
    NotificationSink, UserActivityStats, UserNotification, UserXpState, UserXpStore,
};

/// All four store seams over one shared PostgreSQL pool.
///
/// Table DDL comes from the entities' `SqlxSchema` impls; apply it with
/// `init_database!(tables: [UserXpState, AchievementRecord, UserNotification])`
/// at host startup. The activity tables queried by `stats_for` belong to the
/// host application and are referenced by convention only.
#[derive(Clone)]
pub struct PostgresGamificationStore {
    pool: Arc<PgPool>,
}

impl PostgresGamificationStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserXpStore for PostgresGamificationStore {
    async fn get(&self, user_id: Uuid) -> Result<UserXpState, GamificationError> {
        UserXpState::find_by_id(user_id, &*self.pool)
            .await
            .map_err(|e| GamificationError::StoreRead(e.to_string()))?
            .ok_or(GamificationError::UserNotFound(user_id))
    }

    async fn create(&self, state: UserXpState) -> Result<UserXpState, GamificationError> {
        SqlxCrud::create(state, &*self.pool)
            .await
            .map_err(|e| GamificationError::StoreWrite(e.to_string()))
    }

    async fn add_xp(&self, user_id: Uuid, amount: i64) -> Result<i64, GamificationError> {
        let new_xp: Option<i64> = sqlx::query_scalar(
            "UPDATE \"user_xp_states\" SET \"xp_points\" = \"xp_points\" + $1 \
             WHERE \"user_id\" = $2 RETURNING \"xp_points\"",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| GamificationError::StoreWrite(e.to_string()))?;
        new_xp.ok_or(GamificationError::UserNotFound(user_id))
    }

    async fn set_xp(&self, user_id: Uuid, xp_points: i64) -> Result<i64, GamificationError> {
        let new_xp: Option<i64> = sqlx::query_scalar(
            "UPDATE \"user_xp_states\" SET \"xp_points\" = $1 \
             WHERE \"user_id\" = $2 RETURNING \"xp_points\"",
        )
        .bind(xp_points)
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| GamificationError::StoreWrite(e.to_string()))?;
        new_xp.ok_or(GamificationError::UserNotFound(user_id))
    }

    async fn set_login_streak(
        &self,
        user_id: Uuid,
        streak_days: i64,
        last_login_at: i64,
    ) -> Result<(), GamificationError> {
        let result = sqlx::query(
            "UPDATE \"user_xp_states\" SET \"login_streak_days\" = $1, \"last_login_at\" = $2 \
             WHERE \"user_id\" = $3",
        )
        .bind(streak_days)
        .bind(last_login_at)
        .bind(user_id)
        .execute(&*self.pool)
        .await
        .map_err(|e| GamificationError::StoreWrite(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(GamificationError::UserNotFound(user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl AchievementStore for PostgresGamificationStore {
    async fn grant(&self, record: AchievementRecord) -> Result<bool, GamificationError> {
        // ON CONFLICT against the (user_id, badge) uniqueness constraint is
        // what makes the grant race-free: the loser of a concurrent grant
        // simply inserts zero rows.
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (\"user_id\", \"badge\") DO NOTHING",
            AchievementRecord::TABLE_NAME,
            AchievementRecord::column_list(),
        );
        let result = sqlx::query(&sql)
            .bind(record.id)
            .bind(record.user_id)
            .bind(record.badge)
            .bind(record.title)
            .bind(record.description)
            .bind(record.icon)
            .bind(record.points)
            .bind(record.rarity)
            .bind(record.unlocked_at)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| GamificationError::StoreWrite(e.to_string()))?;
        Ok(result.rows_affected() == 1)
    }

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>, GamificationError> {
        let criteria = QueryCriteria::new()
            .add_valued_filter("user_id", "=", user_id)
            .order_by("unlocked_at", OrderDirection::Asc);
        AchievementRecord::find_by_criteria(criteria, &*self.pool)
            .await
            .map_err(|e| GamificationError::StoreRead(e.to_string()))
    }

    async fn is_held(&self, user_id: Uuid, badge: Badge) -> Result<bool, GamificationError> {
        let criteria = QueryCriteria::new()
            .add_valued_filter("user_id", "=", user_id)
            .add_valued_filter("badge", "=", badge);
        let found = AchievementRecord::find_one_by_criteria(criteria, &*self.pool)
            .await
            .map_err(|e| GamificationError::StoreRead(e.to_string()))?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl NotificationSink for PostgresGamificationStore {
    async fn push(&self, notification: UserNotification) -> Result<(), GamificationError> {
        SqlxCrud::create(notification, &*self.pool)
            .await
            .map_err(|e| GamificationError::NotificationFailed(e.to_string()))?;
        Ok(())
    }
}

async fn count_for_user(
    pool: &PgPool,
    sql: &str,
    user_id: Uuid,
) -> Result<i64, GamificationError> {
    sqlx::query_scalar(sql)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| GamificationError::StoreRead(e.to_string()))
}

#[async_trait]
impl ActivityStatsSource for PostgresGamificationStore {
    async fn stats_for(&self, user_id: Uuid) -> Result<UserActivityStats, GamificationError> {
        let (accepted_jobs, assets_sold, rooms_joined, portfolio_items, active_certifications) =
            futures::try_join!(
                count_for_user(
                    &self.pool,
                    "SELECT COUNT(*) FROM \"job_applications\" \
                     WHERE \"applicant_id\" = $1 AND \"status\" = 'accepted'",
                    user_id,
                ),
                count_for_user(
                    &self.pool,
                    "SELECT COUNT(*) FROM \"asset_sales\" WHERE \"seller_id\" = $1",
                    user_id,
                ),
                count_for_user(
                    &self.pool,
                    "SELECT COUNT(*) FROM \"collab_room_members\" WHERE \"user_id\" = $1",
                    user_id,
                ),
                count_for_user(
                    &self.pool,
                    "SELECT COUNT(*) FROM \"portfolio_items\" WHERE \"owner_id\" = $1",
                    user_id,
                ),
                count_for_user(
                    &self.pool,
                    "SELECT COUNT(*) FROM \"certifications\" \
                     WHERE \"user_id\" = $1 AND \"status\" = 'active'",
                    user_id,
                ),
            )?;

        let state = self.get(user_id).await?;

        Ok(UserActivityStats {
            accepted_jobs,
            assets_sold,
            rooms_joined,
            portfolio_items,
            active_certifications,
            login_streak_days: state.login_streak_days,
        })
    }
}
