//! Email and phone verification
//!
//! Codes come from the [`VerificationCodeStore`](club_core::VerificationCodeStore).
//! A matched code runs the verification award trigger, which sets the flag,
//! credits the bonus and mints Profile Master once both channels are done.

use club_core::traits::CodeCheck;
use club_core::{AwardTrigger, DomainError, MemberId, VerificationChannel};
use tracing::{info, instrument, warn};

use crate::dto::{
    AchievementResponse, ConfirmVerificationRequest, MemberResponse, VerificationIssuedResponse,
    VerificationResultResponse,
};

use super::access::require_active;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct VerificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VerificationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a fresh code for a channel that is not yet verified
    #[instrument(skip(self))]
    pub async fn issue(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
    ) -> ServiceResult<VerificationIssuedResponse> {
        let member = require_active(self.ctx, member_id).await?;
        if member.is_verified(channel) {
            return Err(DomainError::AlreadyVerified(channel).into());
        }

        let issued = self.ctx.verification_store().issue(member_id, channel).await?;
        info!(member_id = %member_id, channel = channel.as_str(), "Verification code issued");

        let expose = self.ctx.verification_config().expose_codes;
        Ok(VerificationIssuedResponse {
            channel,
            expires_in_secs: issued.expires_in_secs,
            code: expose.then_some(issued.code),
        })
    }

    /// Check a submitted code and award the verification
    #[instrument(skip(self, request))]
    pub async fn confirm(
        &self,
        member_id: MemberId,
        channel: VerificationChannel,
        request: ConfirmVerificationRequest,
    ) -> ServiceResult<VerificationResultResponse> {
        let member = require_active(self.ctx, member_id).await?;
        if member.is_verified(channel) {
            return Err(DomainError::AlreadyVerified(channel).into());
        }

        let check = self
            .ctx
            .verification_store()
            .verify(member_id, channel, request.code.trim())
            .await?;
        match check {
            CodeCheck::Matched => {}
            CodeCheck::Mismatch { remaining_attempts } => {
                warn!(member_id = %member_id, remaining_attempts, "Verification code mismatch");
                return Err(DomainError::InvalidOtp.into());
            }
            CodeCheck::Expired => return Err(DomainError::InvalidOtp.into()),
            CodeCheck::AttemptsExhausted => {
                warn!(member_id = %member_id, channel = channel.as_str(), "Verification attempts exhausted");
                return Err(DomainError::TooManyAttempts.into());
            }
        }

        let outcome = self
            .ctx
            .member_repo()
            .apply_award(member_id, AwardTrigger::Verification(channel))
            .await?;

        info!(
            member_id = %member_id,
            channel = channel.as_str(),
            credited = %outcome.credited,
            minted = outcome.minted.len(),
            "Channel verified"
        );
        Ok(VerificationResultResponse {
            member: MemberResponse::from(&outcome.member),
            credited: outcome.credited.value(),
            minted: outcome.minted.iter().map(AchievementResponse::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use club_common::VerificationConfig;

    fn code(value: &str) -> ConfirmVerificationRequest {
        ConfirmVerificationRequest {
            code: value.to_string(),
        }
    }

    async fn verify(harness: &TestHarness, id: MemberId, channel: VerificationChannel) -> VerificationResultResponse {
        let service = VerificationService::new(&harness.ctx);
        service.issue(id, channel).await.unwrap();
        let issued = harness.codes.last_code(id, channel).unwrap();
        service.confirm(id, channel, code(&issued)).await.unwrap()
    }

    #[tokio::test]
    async fn test_email_then_phone_mints_profile_master_once() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");

        let email = verify(&harness, id, VerificationChannel::Email).await;
        assert_eq!(email.credited, 10);
        assert!(email.minted.is_empty());
        assert_eq!(email.member.points, 60);

        let phone = verify(&harness, id, VerificationChannel::Phone).await;
        assert_eq!(phone.credited, 110);
        assert_eq!(phone.minted.len(), 1);
        assert_eq!(phone.minted[0].title, "Profile Master");
        assert_eq!(phone.member.points, 170);

        assert_eq!(harness.store.titles(id), vec!["Welcome", "Profile Master"]);
    }

    #[tokio::test]
    async fn test_phone_first_order_gives_same_result() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");

        verify(&harness, id, VerificationChannel::Phone).await;
        let email = verify(&harness, id, VerificationChannel::Email).await;
        assert_eq!(email.member.points, 170);
        assert_eq!(harness.store.titles(id), vec!["Welcome", "Profile Master"]);
    }

    #[tokio::test]
    async fn test_already_verified_is_a_conflict() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        verify(&harness, id, VerificationChannel::Email).await;

        let service = VerificationService::new(&harness.ctx);
        let err = service.issue(id, VerificationChannel::Email).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::AlreadyVerified(VerificationChannel::Email))
        ));

        let err = service
            .confirm(id, VerificationChannel::Email, code("000000"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_wrong_code_is_invalid_otp_and_changes_nothing() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let service = VerificationService::new(&harness.ctx);
        service.issue(id, VerificationChannel::Email).await.unwrap();

        let err = service
            .confirm(id, VerificationChannel::Email, code("999999"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidOtp)));
        assert_eq!(harness.store.points(id).value(), 50);
    }

    #[tokio::test]
    async fn test_missing_code_is_invalid_otp() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let err = VerificationService::new(&harness.ctx)
            .confirm(id, VerificationChannel::Phone, code("123456"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidOtp)));
    }

    #[tokio::test]
    async fn test_attempts_exhaust() {
        let harness = TestHarness::with_verification(VerificationConfig {
            max_attempts: 2,
            ..VerificationConfig::default()
        });
        let id = harness.member("jdoe");
        let service = VerificationService::new(&harness.ctx);
        service.issue(id, VerificationChannel::Email).await.unwrap();

        let first = service.confirm(id, VerificationChannel::Email, code("999999")).await;
        assert!(matches!(first.unwrap_err().as_domain(), Some(DomainError::InvalidOtp)));

        let second = service.confirm(id, VerificationChannel::Email, code("999999")).await;
        let err = second.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::TooManyAttempts)));
        assert_eq!(err.status_code(), 429);
    }

    #[tokio::test]
    async fn test_codes_exposed_only_when_configured() {
        let harness = TestHarness::new();
        let id = harness.member("jdoe");
        let hidden = VerificationService::new(&harness.ctx)
            .issue(id, VerificationChannel::Email)
            .await
            .unwrap();
        assert!(hidden.code.is_none());

        let harness = TestHarness::with_verification(VerificationConfig {
            expose_codes: true,
            ..VerificationConfig::default()
        });
        let id = harness.member("jdoe");
        let shown = VerificationService::new(&harness.ctx)
            .issue(id, VerificationChannel::Email)
            .await
            .unwrap();
        assert_eq!(shown.code, harness.codes.last_code(id, VerificationChannel::Email));
    }
}
