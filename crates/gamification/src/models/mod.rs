mod achievement;
mod notification;
mod stats;
mod user_xp;

pub use achievement::AchievementRecord;
pub use notification::{NotificationType, UserNotification};
pub use stats::{ActivityMetric, UserActivityStats};
pub use user_xp::UserXpState;
