use serde::{Deserialize, Serialize};

use devlink_database::text_enum;

text_enum! {
    /// Display and XP-weighting tier of a badge. Does not affect grant
    /// logic, only presentation and the XP value chosen at definition time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Rarity {
        Common => "common",
        Rare => "rare",
        Epic => "epic",
        Legendary => "legendary",
    }
}

text_enum! {
    /// The closed set of badges. String keys (`"FIRST_JOB"`, ...) exist only
    /// at the API boundary; everywhere else badge identity is this enum, so
    /// an unknown badge cannot reach the award path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Badge {
        FirstJob => "FIRST_JOB",
        FiveJobs => "FIVE_JOBS",
        TenJobs => "TEN_JOBS",
        TopSeller => "TOP_SELLER",
        Collaborator => "COLLABORATOR",
        PortfolioPro => "PORTFOLIO_PRO",
        SkillMaster => "SKILL_MASTER",
        CertifiedPro => "CERTIFIED_PRO",
        StreakMaster => "STREAK_MASTER",
    }
}

/// Deploy-time badge definition. The catalog is the single source of truth
/// for `xp_value` and `rarity`; grant-time copies go into the
/// `AchievementRecord` so later catalog edits never rewrite history.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeDefinition {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub xp_value: i64,
}

impl Badge {
    /// Total mapping into the static catalog.
    pub fn definition(&self) -> &'static BadgeDefinition {
        match self {
            Badge::FirstJob => &BadgeDefinition {
                title: "First Commission",
                description: "Completed your first accepted job on Dev-Link",
                icon: "briefcase",
                rarity: Rarity::Common,
                xp_value: 100,
            },
            Badge::FiveJobs => &BadgeDefinition {
                title: "Reliable Builder",
                description: "Five accepted jobs delivered",
                icon: "hammer",
                rarity: Rarity::Rare,
                xp_value: 250,
            },
            Badge::TenJobs => &BadgeDefinition {
                title: "Studio Veteran",
                description: "Ten accepted jobs delivered",
                icon: "trophy",
                rarity: Rarity::Epic,
                xp_value: 500,
            },
            Badge::TopSeller => &BadgeDefinition {
                title: "Top Seller",
                description: "Sold ten assets on the marketplace",
                icon: "store",
                rarity: Rarity::Epic,
                xp_value: 500,
            },
            Badge::Collaborator => &BadgeDefinition {
                title: "Team Player",
                description: "Joined ten collaboration rooms",
                icon: "users",
                rarity: Rarity::Rare,
                xp_value: 250,
            },
            Badge::PortfolioPro => &BadgeDefinition {
                title: "Portfolio Pro",
                description: "Published five portfolio entries",
                icon: "images",
                rarity: Rarity::Rare,
                xp_value: 250,
            },
            Badge::SkillMaster => &BadgeDefinition {
                title: "Skill Master",
                description: "Holds three active certifications",
                icon: "graduation-cap",
                rarity: Rarity::Rare,
                xp_value: 300,
            },
            Badge::CertifiedPro => &BadgeDefinition {
                title: "Certified Professional",
                description: "Holds five active certifications",
                icon: "badge-check",
                rarity: Rarity::Epic,
                xp_value: 600,
            },
            Badge::StreakMaster => &BadgeDefinition {
                title: "Streak Master",
                description: "Logged in thirty days in a row",
                icon: "flame",
                rarity: Rarity::Legendary,
                xp_value: 1000,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_total_and_well_formed() {
        for badge in Badge::ALL {
            let def = badge.definition();
            assert!(!def.title.is_empty());
            assert!(!def.description.is_empty());
            assert!(!def.icon.is_empty());
            assert!(def.xp_value >= 0);
        }
    }

    #[test]
    fn keys_round_trip() {
        for badge in Badge::ALL {
            assert_eq!(badge.as_str().parse::<Badge>().unwrap(), *badge);
        }
        assert_eq!("FIRST_JOB".parse::<Badge>().unwrap(), Badge::FirstJob);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!("NOT_A_REAL_BADGE".parse::<Badge>().is_err());
    }

    #[test]
    fn serde_uses_storage_keys() {
        let json = serde_json::to_string(&Badge::StreakMaster).unwrap();
        assert_eq!(json, "\"STREAK_MASTER\"");
        assert_eq!(serde_json::to_string(&Rarity::Epic).unwrap(), "\"epic\"");
    }
}
