//! Award planner
//!
//! Decides what a trigger changes: flags, point credits, and which catalog
//! entries to mint. Every entry point goes through these functions; storage
//! backends only apply the resulting plan inside their own critical section.

use super::catalog::{AchievementDefinition, PROFILE_MASTER, WELCOME};
use crate::entities::{AchievementRecord, Member, VerificationChannel};
use crate::error::DomainError;
use crate::value_objects::Points;

/// Credited the first time a channel flips to verified
pub const VERIFICATION_BONUS: Points = Points::new(10);

/// Credited once when the profile is first complete
pub const PROFILE_COMPLETION_BONUS: Points = Points::new(30);

/// What caused an award evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardTrigger {
    /// A verification code was accepted for this channel
    Verification(VerificationChannel),
    /// Profile fields changed
    ProfileUpdated,
    /// Re-run the completion rule only
    CompletionCheck,
}

/// Opening balance for a new member, as a sum of the rules that applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningBalance {
    pub welcome: Points,
    pub profile_completion: Points,
}

impl OpeningBalance {
    pub fn total(&self) -> Points {
        self.welcome.credited(self.profile_completion)
    }
}

/// Registration outcome before it is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPlan {
    pub opening_balance: OpeningBalance,
    pub grants: Vec<&'static AchievementDefinition>,
}

impl RegistrationPlan {
    /// Apply to a freshly created member and mint the records to store with it
    pub fn apply(&self, member: &mut Member) -> Vec<AchievementRecord> {
        let records: Vec<_> = self
            .grants
            .iter()
            .map(|def| AchievementRecord::mint(member.id, def))
            .collect();
        for record in &records {
            member.record_achievement(record);
        }
        if !self.opening_balance.profile_completion.is_zero() {
            member.points = member.points.credited(self.opening_balance.profile_completion);
            member.profile_bonus_credited = true;
        }
        records
    }
}

/// Plan a new member's opening state: one Welcome record, plus the
/// profile-completion bonus only when the submitted profile is complete
pub fn plan_registration(member: &Member) -> RegistrationPlan {
    let profile_completion = if member.profile.is_complete() {
        PROFILE_COMPLETION_BONUS
    } else {
        Points::ZERO
    };
    RegistrationPlan {
        opening_balance: OpeningBalance {
            welcome: WELCOME.points,
            profile_completion,
        },
        grants: vec![&WELCOME],
    }
}

/// Changes one trigger makes to a member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwardPlan {
    /// Bonus points not tied to a record
    pub credit: Points,
    pub verify: Option<VerificationChannel>,
    pub mark_profile_bonus: bool,
    /// Catalog entries to mint; their points are credited only if the
    /// insert actually lands
    pub grants: Vec<&'static AchievementDefinition>,
}

impl AwardPlan {
    pub fn is_empty(&self) -> bool {
        self.credit.is_zero() && self.verify.is_none() && !self.mark_profile_bonus && self.grants.is_empty()
    }

    /// Apply flag changes and the bonus credit. Grants are applied
    /// separately through [`Member::record_achievement`] once stored.
    pub fn apply_flags(&self, member: &mut Member) {
        if let Some(channel) = self.verify {
            member.mark_verified(channel);
        }
        if self.mark_profile_bonus {
            member.profile_bonus_credited = true;
        }
        member.points = member.points.credited(self.credit);
        member.touch();
    }
}

/// Plan the effects of `trigger` on `member`, given the titles it already holds.
///
/// Must be evaluated against state read under the same lock or transaction
/// that applies the plan.
pub fn plan_award(
    trigger: AwardTrigger,
    member: &Member,
    held_titles: &[String],
) -> Result<AwardPlan, DomainError> {
    let mut plan = AwardPlan::default();
    let mut email_verified = member.email_verified;
    let mut phone_verified = member.phone_verified;

    match trigger {
        AwardTrigger::Verification(channel) => {
            if member.is_verified(channel) {
                return Err(DomainError::AlreadyVerified(channel));
            }
            plan.verify = Some(channel);
            plan.credit = plan.credit.credited(VERIFICATION_BONUS);
            match channel {
                VerificationChannel::Email => email_verified = true,
                VerificationChannel::Phone => phone_verified = true,
            }
        }
        AwardTrigger::ProfileUpdated => {
            if member.profile.is_complete() && !member.profile_bonus_credited {
                plan.mark_profile_bonus = true;
                plan.credit = plan.credit.credited(PROFILE_COMPLETION_BONUS);
            }
        }
        AwardTrigger::CompletionCheck => {}
    }

    let holds_profile_master = held_titles.iter().any(|t| t == PROFILE_MASTER.title);
    if email_verified && phone_verified && !holds_profile_master {
        plan.grants.push(&PROFILE_MASTER);
    }

    Ok(plan)
}

/// Result of applying a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardOutcome {
    pub member: Member,
    pub minted: Vec<AchievementRecord>,
    /// Total points added by this trigger
    pub credited: Points,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::{complete_profile, member};

    fn titles(records: &[&AchievementDefinition]) -> Vec<&'static str> {
        records.iter().map(|d| d.title).collect()
    }

    #[test]
    fn test_registration_with_complete_profile_opens_at_80() {
        let mut member = member();
        member.profile = complete_profile();

        let plan = plan_registration(&member);
        assert_eq!(plan.opening_balance.total(), Points::new(80));
        assert_eq!(titles(&plan.grants), vec!["Welcome"]);

        let records = plan.apply(&mut member);
        assert_eq!(records.len(), 1);
        assert_eq!(member.points, Points::new(80));
        assert_eq!(member.achievements, vec![records[0].id]);
        assert!(member.profile_bonus_credited);
    }

    #[test]
    fn test_registration_with_partial_profile_opens_at_welcome_only() {
        let mut member = member();
        let plan = plan_registration(&member);
        assert_eq!(plan.opening_balance.total(), Points::new(50));

        plan.apply(&mut member);
        assert_eq!(member.points, Points::new(50));
        assert!(!member.profile_bonus_credited);
    }

    #[test]
    fn test_first_verification_credits_bonus() {
        let member = member();
        let plan = plan_award(AwardTrigger::Verification(VerificationChannel::Email), &member, &[])
            .unwrap();
        assert_eq!(plan.credit, VERIFICATION_BONUS);
        assert_eq!(plan.verify, Some(VerificationChannel::Email));
        assert!(plan.grants.is_empty());
    }

    #[test]
    fn test_already_verified_is_rejected() {
        let mut member = member();
        member.email_verified = true;
        let err = plan_award(AwardTrigger::Verification(VerificationChannel::Email), &member, &[])
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyVerified(VerificationChannel::Email)));
    }

    #[test]
    fn test_second_verification_grants_profile_master_in_either_order() {
        for (first, second) in [
            (VerificationChannel::Email, VerificationChannel::Phone),
            (VerificationChannel::Phone, VerificationChannel::Email),
        ] {
            let mut member = member();
            let plan = plan_award(AwardTrigger::Verification(first), &member, &[]).unwrap();
            plan.apply_flags(&mut member);

            let plan = plan_award(AwardTrigger::Verification(second), &member, &[]).unwrap();
            assert_eq!(titles(&plan.grants), vec!["Profile Master"]);
        }
    }

    #[test]
    fn test_completion_check_is_idempotent_once_held() {
        let mut member = member();
        member.email_verified = true;
        member.phone_verified = true;

        let plan = plan_award(AwardTrigger::CompletionCheck, &member, &[]).unwrap();
        assert_eq!(titles(&plan.grants), vec!["Profile Master"]);

        let held = vec!["Welcome".to_string(), "Profile Master".to_string()];
        let plan = plan_award(AwardTrigger::CompletionCheck, &member, &held).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_profile_bonus_credited_once() {
        let mut member = member();
        member.profile = complete_profile();

        let plan = plan_award(AwardTrigger::ProfileUpdated, &member, &[]).unwrap();
        assert_eq!(plan.credit, PROFILE_COMPLETION_BONUS);
        plan.apply_flags(&mut member);
        assert_eq!(member.points, PROFILE_COMPLETION_BONUS);

        let plan = plan_award(AwardTrigger::ProfileUpdated, &member, &[]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_incomplete_profile_update_changes_nothing() {
        let member = member();
        let plan = plan_award(AwardTrigger::ProfileUpdated, &member, &[]).unwrap();
        assert!(plan.is_empty());
    }
}
