mod badge;
mod engine;
mod error;
mod models;
mod postgres;
mod scanner;
mod store;

pub mod ledger;

pub use badge::{Badge, BadgeDefinition, Rarity};
pub use engine::{AwardEngine, LoginStreak, XpAward};
pub use error::GamificationError;
pub use models::{
    AchievementRecord, ActivityMetric, NotificationType, UserActivityStats, UserNotification,
    UserXpState,
};
pub use postgres::PostgresGamificationStore;
pub use scanner::{EligibilityScanner, ThresholdRule, ELIGIBILITY_RULES};
pub use store::{AchievementStore, ActivityStatsSource, NotificationSink, UserXpStore};
