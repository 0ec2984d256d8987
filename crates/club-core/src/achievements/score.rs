//! Score and level calculator
//!
//! Pure functions only: nothing here reads or writes storage, and nothing
//! mints achievements. What the calculator reports as satisfied can differ
//! from what a member actually holds.

use serde::Serialize;

use super::catalog::CATALOG;
use crate::entities::Member;
use crate::value_objects::Points;

/// Member level, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Level {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
    Legend,
}

/// Levels with their inclusive lower bounds and titles, ascending
const LEVEL_TABLE: [(i64, Level, &str); 6] = [
    (0, Level::Beginner, "Newcomer"),
    (150, Level::Novice, "Explorer"),
    (300, Level::Intermediate, "Hero"),
    (500, Level::Advanced, "Champion"),
    (750, Level::Expert, "Elite Member"),
    (1000, Level::Legend, "Master Champion"),
];

impl Level {
    pub fn name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Novice => "Novice",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Legend => "Legend",
        }
    }

    pub fn title(self) -> &'static str {
        LEVEL_TABLE[self as usize].2
    }

    /// Lowest point total that earns this level
    pub fn threshold(self) -> Points {
        Points::new(LEVEL_TABLE[self as usize].0)
    }

    pub fn next(self) -> Option<Self> {
        LEVEL_TABLE.get(self as usize + 1).map(|(_, level, _)| *level)
    }
}

/// Map a point total to its level
pub fn level_for(points: Points) -> Level {
    LEVEL_TABLE
        .iter()
        .rev()
        .find(|(threshold, _, _)| points.value() >= *threshold)
        .map_or(Level::Beginner, |(_, level, _)| *level)
}

/// Level and title pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub level: Level,
    pub title: &'static str,
}

impl LevelInfo {
    pub fn for_points(points: Points) -> Self {
        let level = level_for(points);
        Self {
            level,
            title: level.title(),
        }
    }
}

/// Titles of every catalog entry whose rule currently holds
pub fn satisfied_achievements(member: &Member, points: Points) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|def| def.rule.holds(member, points))
        .map(|def| def.title)
        .collect()
}

/// Everything the UI shows about a member's standing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub points: Points,
    pub level: Level,
    pub title: &'static str,
    pub next_level: Option<Level>,
    pub points_to_next_level: Option<i64>,
    pub satisfied: Vec<&'static str>,
}

impl ScoreCard {
    /// Evaluate a member's stored balance
    pub fn evaluate(member: &Member) -> Self {
        Self::for_points(member, member.points)
    }

    /// Evaluate against an arbitrary total
    pub fn for_points(member: &Member, points: Points) -> Self {
        let info = LevelInfo::for_points(points);
        let next_level = info.level.next();
        Self {
            points,
            level: info.level,
            title: info.title,
            next_level,
            points_to_next_level: next_level
                .map(|next| next.threshold().value() - points.value()),
            satisfied: satisfied_achievements(member, points),
        }
    }

    /// Evaluate a raw total that may be negative or missing
    pub fn for_raw(member: &Member, raw: Option<i64>) -> Self {
        Self::for_points(member, Points::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::member;

    fn level(raw: i64) -> Level {
        level_for(Points::new(raw))
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level(0), Level::Beginner);
        assert_eq!(level(149), Level::Beginner);
        assert_eq!(level(150), Level::Novice);
        assert_eq!(level(299), Level::Novice);
        assert_eq!(level(300), Level::Intermediate);
        assert_eq!(level(499), Level::Intermediate);
        assert_eq!(level(500), Level::Advanced);
        assert_eq!(level(749), Level::Advanced);
        assert_eq!(level(750), Level::Expert);
        assert_eq!(level(999), Level::Expert);
        assert_eq!(level(1000), Level::Legend);
        assert_eq!(level(1001), Level::Legend);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = Level::Beginner;
        for raw in 0..=1500 {
            let current = level(raw);
            assert!(current >= previous, "level dropped at {raw}");
            previous = current;
        }
    }

    #[test]
    fn test_negative_and_missing_are_zero() {
        let member = member();
        assert_eq!(level(-10), Level::Beginner);
        let card = ScoreCard::for_raw(&member, Some(-250));
        assert_eq!(card.points, Points::ZERO);
        assert_eq!(card.level, Level::Beginner);
        assert_eq!(ScoreCard::for_raw(&member, None), card);
    }

    #[test]
    fn test_titles() {
        assert_eq!(LevelInfo::for_points(Points::new(140)).title, "Newcomer");
        assert_eq!(LevelInfo::for_points(Points::new(155)).title, "Explorer");
        assert_eq!(Level::Expert.title(), "Elite Member");
        assert_eq!(Level::Legend.name(), "Legend");
    }

    #[test]
    fn test_admin_bump_crosses_level() {
        let mut member = member();
        member.points = Points::new(140);
        let card = ScoreCard::evaluate(&member);
        assert_eq!((card.level, card.title), (Level::Beginner, "Newcomer"));
        assert_eq!(card.points_to_next_level, Some(10));

        member.points = member.points.adjusted(15);
        let card = ScoreCard::evaluate(&member);
        assert_eq!((card.level, card.title), (Level::Novice, "Explorer"));
        assert_eq!(card.next_level, Some(Level::Intermediate));
    }

    #[test]
    fn test_satisfied_is_independent_of_records() {
        let mut member = member();
        member.points = Points::new(320);
        member.email_verified = true;
        member.phone_verified = true;
        assert!(member.achievements.is_empty());

        let card = ScoreCard::evaluate(&member);
        assert_eq!(card.satisfied, vec!["Welcome", "Profile Master", "Explorer", "Hero"]);
        assert!(member.achievements.is_empty());
    }

    #[test]
    fn test_legend_has_no_next_level() {
        let card = ScoreCard::for_points(&member(), Points::new(2000));
        assert_eq!(card.next_level, None);
        assert_eq!(card.points_to_next_level, None);
    }
}
