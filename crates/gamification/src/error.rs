use sqlx::types::Uuid;
use thiserror::Error;

/// Failures surfaced by the award engine and its stores.
///
/// Store mutations fail loudly so callers can retry or surface the problem;
/// notification delivery is the one best-effort path (see `AwardEngine`).
#[derive(Debug, Error)]
pub enum GamificationError {
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("unknown badge key: {0}")]
    UnknownBadge(String),

    #[error("invalid xp amount: {0}")]
    InvalidXpAmount(i64),

    #[error("invalid level: {0}")]
    InvalidLevel(i64),

    #[error("store read failed: {0}")]
    StoreRead(String),

    #[error("store write failed: {0}")]
    StoreWrite(String),

    #[error("notification delivery failed: {0}")]
    NotificationFailed(String),
}
