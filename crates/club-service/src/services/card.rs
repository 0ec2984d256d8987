//! Virtual ID cards
//!
//! Every member has a card that can be shared through a short code. Looking a
//! card up by code is public, so only active members' cards resolve.

use club_core::value_objects::is_valid_card_code;
use club_core::{generate_card_code, DomainError, Member, MemberId};
use tracing::{info, instrument, warn};

use crate::dto::VirtualCardResponse;

use super::access::{load_member, require_active};
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct CardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn my_card(&self, member_id: MemberId) -> ServiceResult<VirtualCardResponse> {
        let member = load_member(self.ctx, member_id).await?;
        self.render(&member).await
    }

    #[instrument(skip(self, code))]
    pub async fn by_code(&self, code: &str) -> ServiceResult<VirtualCardResponse> {
        let code = code.trim().to_ascii_uppercase();
        if !is_valid_card_code(&code) {
            return Err(DomainError::CardNotFound(code).into());
        }

        let member = self
            .ctx
            .member_repo()
            .find_by_card_code(&code)
            .await?
            .filter(Member::is_active)
            .ok_or_else(|| DomainError::CardNotFound(code.clone()))?;
        self.render(&member).await
    }

    /// Issue a new share code; the old one stops resolving
    #[instrument(skip(self))]
    pub async fn rotate(&self, member_id: MemberId) -> ServiceResult<VirtualCardResponse> {
        require_active(self.ctx, member_id).await?;

        let repo = self.ctx.member_repo();
        let member = match repo.set_card_code(member_id, &generate_card_code()).await {
            Err(DomainError::CardCodeTaken) => {
                warn!(member_id = %member_id, "Card code collision, regenerating");
                repo.set_card_code(member_id, &generate_card_code()).await?
            }
            result => result?,
        };

        info!(member_id = %member_id, "Card code rotated");
        self.render(&member).await
    }

    async fn render(&self, member: &Member) -> ServiceResult<VirtualCardResponse> {
        let records = self.ctx.achievement_repo().find_by_member(member.id).await?;
        let held = records.into_iter().map(|r| r.title).collect();
        Ok(VirtualCardResponse::new(member, held))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use club_core::MemberStatus;

    #[tokio::test]
    async fn test_card_resolves_by_code() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let cards = CardService::new(&harness.ctx);

        let mine = cards.my_card(id).await.unwrap();
        assert_eq!(mine.achievements, vec!["Welcome".to_string()]);

        let shared = cards.by_code(&mine.card_code.to_lowercase()).await.unwrap();
        assert_eq!(shared.member_id, mine.member_id);
    }

    #[tokio::test]
    async fn test_rotate_invalidates_old_code() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let cards = CardService::new(&harness.ctx);
        let old = cards.my_card(id).await.unwrap().card_code;

        let rotated = cards.rotate(id).await.unwrap();
        assert_ne!(rotated.card_code, old);
        assert!(cards.by_code(&rotated.card_code).await.is_ok());

        let err = cards.by_code(&old).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::CardNotFound(_))));
    }

    #[tokio::test]
    async fn test_rotate_keeps_profile_edits() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let cards = CardService::new(&harness.ctx);

        harness
            .ctx
            .member_repo()
            .update_profile(
                id,
                &club_core::ProfileChanges {
                    first_name: Some("Janet".to_string()),
                    ..club_core::ProfileChanges::default()
                },
            )
            .await
            .unwrap();
        let rotated = cards.rotate(id).await.unwrap();

        assert_eq!(rotated.display_name, "Janet Doe");
        let member = harness.ctx.member_repo().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(member.profile.first_name, "Janet");
        assert_eq!(member.card_code, rotated.card_code);
    }

    #[tokio::test]
    async fn test_taken_card_code_is_a_conflict() {
        let harness = TestHarness::new();
        let first = harness.member("jdoe");
        let second = harness.member("other");
        let cards = CardService::new(&harness.ctx);
        let code = cards.my_card(first).await.unwrap().card_code;

        let err = harness
            .ctx
            .member_repo()
            .set_card_code(second, &code)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CardCodeTaken));
        assert_eq!(club_common::domain_status(&err), 409);
        assert_ne!(cards.my_card(second).await.unwrap().card_code, code);
    }

    #[tokio::test]
    async fn test_inactive_and_malformed_codes_do_not_resolve() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let cards = CardService::new(&harness.ctx);
        let code = cards.my_card(id).await.unwrap().card_code;

        harness.store.edit_member(id, |m| m.status = MemberStatus::Inactive);
        assert_eq!(cards.by_code(&code).await.unwrap_err().status_code(), 404);
        assert_eq!(cards.by_code("nope").await.unwrap_err().status_code(), 404);
    }
}
