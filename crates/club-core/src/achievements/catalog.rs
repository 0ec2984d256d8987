//! Static achievement catalog

use crate::entities::Member;
use crate::value_objects::Points;

/// Condition under which an achievement counts as satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    /// Every registered member holds it
    Registered,
    /// Email and phone are both verified
    FullyVerified,
    /// Point total reaches the threshold
    PointsAtLeast(i64),
}

impl UnlockRule {
    pub fn holds(self, member: &Member, points: Points) -> bool {
        match self {
            Self::Registered => true,
            Self::FullyVerified => member.is_fully_verified(),
            Self::PointsAtLeast(threshold) => points.value() >= threshold,
        }
    }
}

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDefinition {
    /// Unique key
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Credited when a record is minted
    pub points: Points,
    pub rule: UnlockRule,
    /// Whether the awarder ever mints a record for this entry. Score
    /// milestones are reported by the calculator only.
    pub minted: bool,
}

pub const WELCOME: AchievementDefinition = AchievementDefinition {
    title: "Welcome",
    description: "Joined the club",
    icon: "wave",
    points: Points::new(50),
    rule: UnlockRule::Registered,
    minted: true,
};

pub const PROFILE_MASTER: AchievementDefinition = AchievementDefinition {
    title: "Profile Master",
    description: "Verified both email and phone",
    icon: "shield-check",
    points: Points::new(100),
    rule: UnlockRule::FullyVerified,
    minted: true,
};

const fn milestone(
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    threshold: i64,
) -> AchievementDefinition {
    AchievementDefinition {
        title,
        description,
        icon,
        points: Points::ZERO,
        rule: UnlockRule::PointsAtLeast(threshold),
        minted: false,
    }
}

/// All definitions, in display order
pub const CATALOG: &[AchievementDefinition] = &[
    WELCOME,
    PROFILE_MASTER,
    milestone("Explorer", "Reached 150 points", "compass", 150),
    milestone("Hero", "Reached 300 points", "star", 300),
    milestone("Champion", "Reached 500 points", "trophy", 500),
    milestone("Elite Member", "Reached 750 points", "gem", 750),
    milestone("Master Champion", "Reached 1000 points", "crown", 1000),
];

/// Look up a definition by title
pub fn find(title: &str) -> Option<&'static AchievementDefinition> {
    CATALOG.iter().find(|def| def.title == title)
}
