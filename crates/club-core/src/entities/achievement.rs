//! Achievement record - a catalog entry awarded to one member

use chrono::{DateTime, Utc};

use crate::achievements::AchievementDefinition;
use crate::value_objects::{AchievementId, MemberId, Points};

/// A minted achievement.
///
/// `points` is the value credited when the record was minted. Later catalog
/// changes do not touch existing records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementRecord {
    pub id: AchievementId,
    pub member_id: MemberId,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub points: Points,
    pub awarded_at: DateTime<Utc>,
}

impl AchievementRecord {
    /// Mint a record from a catalog definition, snapshotting its point value
    pub fn mint(member_id: MemberId, definition: &AchievementDefinition) -> Self {
        Self {
            id: AchievementId::new(),
            member_id,
            title: definition.title.to_string(),
            description: definition.description.to_string(),
            icon: definition.icon.to_string(),
            points: definition.points,
            awarded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::catalog::WELCOME;

    #[test]
    fn test_mint_snapshots_catalog_values() {
        let member_id = MemberId::new();
        let record = AchievementRecord::mint(member_id, &WELCOME);
        assert_eq!(record.member_id, member_id);
        assert_eq!(record.title, "Welcome");
        assert_eq!(record.points, WELCOME.points);
    }
}
