use serde::{Deserialize, Serialize};

/// Aggregate marketplace activity counters for one user, as gathered by an
/// `ActivityStatsSource`. These are read-only views over stores the host
/// application owns; the engine never writes them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserActivityStats {
    pub accepted_jobs: i64,
    pub assets_sold: i64,
    pub rooms_joined: i64,
    pub portfolio_items: i64,
    pub active_certifications: i64,
    pub login_streak_days: i64,
}

/// The activity dimensions badge thresholds are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityMetric {
    AcceptedJobs,
    AssetsSold,
    RoomsJoined,
    PortfolioItems,
    ActiveCertifications,
    LoginStreakDays,
}

impl UserActivityStats {
    pub fn metric(&self, metric: ActivityMetric) -> i64 {
        match metric {
            ActivityMetric::AcceptedJobs => self.accepted_jobs,
            ActivityMetric::AssetsSold => self.assets_sold,
            ActivityMetric::RoomsJoined => self.rooms_joined,
            ActivityMetric::PortfolioItems => self.portfolio_items,
            ActivityMetric::ActiveCertifications => self.active_certifications,
            ActivityMetric::LoginStreakDays => self.login_streak_days,
        }
    }
}
