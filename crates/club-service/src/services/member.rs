//! Member service
//!
//! Profile reads and edits for members, plus the admin-only member
//! management operations.

use club_core::traits::PageQuery;
use club_core::{DomainError, MemberId, MemberStatus, ProfileChanges};
use tracing::{info, instrument};

use crate::dto::{
    AdjustPointsRequest, AdminUpdateMemberRequest, MemberResponse, PageResponse,
    PointsAdjustedResponse, PublicMemberResponse, UpdateProfileRequest,
};

use super::access::{load_member, require_active, require_admin};
use super::auth::non_blank;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            first_name: request.first_name.map(|v| v.trim().to_string()),
            last_name: request.last_name.map(|v| v.trim().to_string()),
            address: request.address.map(|v| non_blank(Some(v))),
            date_of_birth: request.date_of_birth,
            experience: request.experience.map(|v| non_blank(Some(v))),
        }
    }
}

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current member, full representation
    #[instrument(skip(self))]
    pub async fn get_me(&self, member_id: MemberId) -> ServiceResult<MemberResponse> {
        let member = load_member(self.ctx, member_id).await?;
        Ok(MemberResponse::from(&member))
    }

    /// Another member's public view
    #[instrument(skip(self))]
    pub async fn get(&self, member_id: MemberId) -> ServiceResult<PublicMemberResponse> {
        let member = load_member(self.ctx, member_id).await?;
        Ok(PublicMemberResponse::from(&member))
    }

    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> ServiceResult<PublicMemberResponse> {
        let member = self
            .ctx
            .member_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UsernameNotFound(username.to_string()))?;
        Ok(PublicMemberResponse::from(&member))
    }

    /// Edit profile fields, then run the profile-update award trigger
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        member_id: MemberId,
        request: UpdateProfileRequest,
    ) -> ServiceResult<MemberResponse> {
        if request.is_empty() {
            return Err(ServiceError::validation("No profile fields to update"));
        }

        require_active(self.ctx, member_id).await?;

        let outcome = self
            .ctx
            .member_repo()
            .update_profile(member_id, &ProfileChanges::from(request))
            .await?;

        info!(
            member_id = %member_id,
            credited = %outcome.credited,
            "Profile updated"
        );
        Ok(MemberResponse::from(&outcome.member))
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        actor: MemberId,
        page: PageQuery<MemberId>,
    ) -> ServiceResult<PageResponse<MemberResponse>> {
        require_admin(self.ctx, actor).await?;
        let members = self.ctx.member_repo().list(page).await?;
        let data = members.iter().map(MemberResponse::from).collect();
        Ok(PageResponse::new(data, page.limit, |m: &MemberResponse| m.id.clone()))
    }

    /// Change a member's role or status. Admins cannot demote or
    /// deactivate themselves.
    #[instrument(skip(self, request))]
    pub async fn admin_update(
        &self,
        actor: MemberId,
        target: MemberId,
        request: AdminUpdateMemberRequest,
    ) -> ServiceResult<MemberResponse> {
        require_admin(self.ctx, actor).await?;
        if actor == target && (request.role.is_some() || request.status.is_some()) {
            return Err(ServiceError::validation(
                "Administrators cannot change their own role or status",
            ));
        }

        let member = self
            .ctx
            .member_repo()
            .set_role_status(target, request.role, request.status)
            .await?;

        if request.status == Some(MemberStatus::Inactive) {
            self.ctx.session_store().revoke_all(target).await?;
        }

        info!(
            actor = %actor,
            member_id = %target,
            role = member.role.as_str(),
            status = member.status.as_str(),
            "Member updated by admin"
        );
        Ok(MemberResponse::from(&member))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: MemberId, target: MemberId) -> ServiceResult<()> {
        require_admin(self.ctx, actor).await?;
        if actor == target {
            return Err(ServiceError::validation("Administrators cannot delete themselves"));
        }

        self.ctx.member_repo().delete(target).await?;
        self.ctx.session_store().revoke_all(target).await?;

        info!(actor = %actor, member_id = %target, "Member deleted");
        Ok(())
    }

    /// Add a signed delta to a member's balance, clamped at zero
    #[instrument(skip(self, request), fields(delta = request.delta))]
    pub async fn adjust_points(
        &self,
        actor: MemberId,
        target: MemberId,
        request: AdjustPointsRequest,
    ) -> ServiceResult<PointsAdjustedResponse> {
        require_admin(self.ctx, actor).await?;

        let adjustment = self.ctx.member_repo().adjust_points(target, request.delta).await?;
        let applied_delta = adjustment.applied_delta();

        info!(
            actor = %actor,
            member_id = %target,
            requested = request.delta,
            applied = applied_delta,
            reason = request.reason.as_deref().unwrap_or(""),
            "Points adjusted"
        );
        Ok(PointsAdjustedResponse {
            member: MemberResponse::from(&adjustment.member),
            applied_delta,
        })
    }
}
