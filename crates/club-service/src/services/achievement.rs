//! Achievements and points
//!
//! Read side of the gamification: the static catalog, a member's score card
//! and the records they hold. The only write here is the completion
//! re-check, which goes through the same award path as everything else.

use club_core::{AwardTrigger, MemberId, ScoreCard, CATALOG};
use tracing::instrument;

use crate::dto::{AchievementResponse, CatalogEntryResponse, ScoreCardResponse};

use super::access::{load_member, require_active};
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AchievementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AchievementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn catalog(&self) -> Vec<CatalogEntryResponse> {
        CATALOG.iter().map(CatalogEntryResponse::from).collect()
    }

    #[instrument(skip(self))]
    pub async fn score_card(&self, member_id: MemberId) -> ServiceResult<ScoreCardResponse> {
        let member = load_member(self.ctx, member_id).await?;
        let records = self.ctx.achievement_repo().find_by_member(member_id).await?;
        let held = records.into_iter().map(|r| r.title).collect();
        Ok(ScoreCardResponse::new(ScoreCard::evaluate(&member), held))
    }

    #[instrument(skip(self))]
    pub async fn records(&self, member_id: MemberId) -> ServiceResult<Vec<AchievementResponse>> {
        load_member(self.ctx, member_id).await?;
        let records = self.ctx.achievement_repo().find_by_member(member_id).await?;
        Ok(records.iter().map(AchievementResponse::from).collect())
    }

    /// Re-run the completion rule; returns any records it minted
    #[instrument(skip(self))]
    pub async fn recheck(&self, member_id: MemberId) -> ServiceResult<Vec<AchievementResponse>> {
        require_active(self.ctx, member_id).await?;
        let outcome = self
            .ctx
            .member_repo()
            .apply_award(member_id, AwardTrigger::CompletionCheck)
            .await?;
        Ok(outcome.minted.iter().map(AchievementResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use club_core::Level;
    use std::sync::Arc;

    #[test]
    fn test_catalog_lists_every_definition() {
        let harness = TestHarness::new();
        let catalog = AchievementService::new(&harness.ctx).catalog();
        assert_eq!(catalog.len(), CATALOG.len());
        assert_eq!(catalog[1].title, "Profile Master");
        assert_eq!(catalog[1].points, 100);
    }

    #[tokio::test]
    async fn test_score_card_reports_satisfied_independent_of_held() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        harness.store.edit_member(id, |m| m.points = club_core::Points::new(320));

        let card = AchievementService::new(&harness.ctx).score_card(id).await.unwrap();
        assert_eq!(card.level, Level::Intermediate);
        assert_eq!(card.title, "Hero");
        assert_eq!(card.points_to_next_level, Some(180));
        assert!(card.satisfied.contains(&"Explorer"));
        assert!(card.satisfied.contains(&"Hero"));
        assert_eq!(card.held, vec!["Welcome".to_string()]);
    }

    #[tokio::test]
    async fn test_recheck_is_idempotent() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        harness.store.edit_member(id, |m| {
            m.email_verified = true;
            m.phone_verified = true;
        });
        let service = AchievementService::new(&harness.ctx);

        let first = service.recheck(id).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(service.recheck(id).await.unwrap().is_empty());
        assert_eq!(harness.store.points(id).value(), 150);
    }

    #[tokio::test]
    async fn test_concurrent_completion_mints_once() {
        let harness = Arc::new(TestHarness::new());
        let id = harness.member("jdoe");
        harness.store.edit_member(id, |m| {
            m.email_verified = true;
            m.phone_verified = true;
        });

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let harness = Arc::clone(&harness);
                tokio::spawn(async move {
                    AchievementService::new(&harness.ctx).recheck(id).await.unwrap().len()
                })
            })
            .collect();

        let mut minted = 0;
        for task in futures::future::join_all(tasks).await {
            minted += task.unwrap();
        }

        assert_eq!(minted, 1);
        assert_eq!(harness.store.titles(id), vec!["Welcome", "Profile Master"]);
        assert_eq!(harness.store.points(id).value(), 150);
    }

    #[tokio::test]
    async fn test_records_in_award_order() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        harness.store.edit_member(id, |m| {
            m.email_verified = true;
            m.phone_verified = true;
        });
        let service = AchievementService::new(&harness.ctx);
        service.recheck(id).await.unwrap();

        let records = service.records(id).await.unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Welcome", "Profile Master"]);
        assert_eq!(records[1].points, 100);
    }
}
