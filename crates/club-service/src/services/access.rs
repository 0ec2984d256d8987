//! Actor checks shared by the services
//!
//! Roles are read from storage on every call, so a demoted admin loses
//! access even while their access token is still valid.

use club_core::{DomainError, Member, MemberId};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub(crate) async fn load_member(ctx: &ServiceContext, id: MemberId) -> ServiceResult<Member> {
    Ok(ctx
        .member_repo()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::MemberNotFound(id))?)
}

pub(crate) async fn require_active(ctx: &ServiceContext, id: MemberId) -> ServiceResult<Member> {
    let member = load_member(ctx, id).await?;
    if !member.is_active() {
        return Err(DomainError::InactiveMember.into());
    }
    Ok(member)
}

pub(crate) async fn require_admin(ctx: &ServiceContext, id: MemberId) -> ServiceResult<Member> {
    let member = require_active(ctx, id).await?;
    if !member.is_admin() {
        tracing::warn!(member_id = %id, "Admin operation refused");
        return Err(DomainError::NotAdmin.into());
    }
    Ok(member)
}

/// Whether an optional viewer is an active admin
pub(crate) async fn is_admin(ctx: &ServiceContext, viewer: Option<MemberId>) -> ServiceResult<bool> {
    let Some(id) = viewer else {
        return Ok(false);
    };
    Ok(ctx
        .member_repo()
        .find_by_id(id)
        .await?
        .is_some_and(|m| m.is_active() && m.is_admin()))
}
