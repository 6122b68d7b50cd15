//! Team membership function: upsert a membership, optionally prune others.

use serde::Serialize;
use thiserror::Error;

use medstock_core::{DomainError, MembershipId, TeamId};
use medstock_teams::{
    find_existing, plan_upsert, prune_targets, Membership, MembershipRequest, UpsertAction,
    UpsertMembershipRequest,
};

use crate::config::PageLimits;
use crate::store::{paginate, Query, StoreError, TeamDirectory};

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipOutcome {
    pub action: MembershipAction,
    pub membership: Membership,
    /// Memberships removed from teams outside the allow-list.
    pub pruned_memberships: Vec<MembershipId>,
}

/// Validate, then reconcile.
pub async fn upsert_membership<D>(
    directory: &D,
    body: UpsertMembershipRequest,
    limits: PageLimits,
) -> Result<MembershipOutcome, MembershipError>
where
    D: TeamDirectory + ?Sized,
{
    let request = body.validate()?;
    reconcile(directory, &request, limits).await
}

#[tracing::instrument(skip_all, fields(team = %request.team_id))]
pub async fn reconcile<D>(
    directory: &D,
    request: &MembershipRequest,
    limits: PageLimits,
) -> Result<MembershipOutcome, MembershipError>
where
    D: TeamDirectory + ?Sized,
{
    if directory.get_team(&request.team_id).await?.is_none() {
        return Err(MembershipError::TeamNotFound(request.team_id.clone()));
    }

    let team_id = &request.team_id;
    let memberships = paginate(limits, |offset, limit| async move {
        directory
            .list_memberships(team_id, &[Query::limit(limit), Query::offset(offset)])
            .await
    })
    .await?;

    let (action, membership) = match plan_upsert(request, find_existing(&memberships, request)) {
        UpsertAction::Update { membership_id, roles } => {
            let m = directory
                .update_membership_roles(team_id, &membership_id, &roles)
                .await?;
            tracing::info!(membership = %m.id, "updated membership roles");
            (MembershipAction::Updated, m)
        }
        UpsertAction::Create(new) => {
            let m = directory.create_membership(team_id, &new).await?;
            tracing::info!(membership = %m.id, "created membership");
            (MembershipAction::Created, m)
        }
    };

    let mut pruned = Vec::new();
    if let Some(allowed) = request.prune_scope() {
        let current = directory.list_user_memberships(&membership.user_id).await?;
        let stale = prune_targets(&current, allowed)
            .into_iter()
            .filter(|m| m.team_id != request.team_id);
        for stale in stale {
            directory.delete_membership(&stale.team_id, &stale.id).await?;
            tracing::info!(membership = %stale.id, team = %stale.team_id, "pruned membership");
            pruned.push(stale.id.clone());
        }
    }

    Ok(MembershipOutcome {
        action,
        membership,
        pruned_memberships: pruned,
    })
}
