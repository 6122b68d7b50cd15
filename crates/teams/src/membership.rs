//! Teams, memberships and the upsert request.

use serde::{Deserialize, Serialize};

use medstock_core::{DomainError, DomainResult, Entity, MembershipId, TeamId, UserId};

/// A team as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "$id")]
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total: u64,
}

/// A user's membership in a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(rename = "$id")]
    pub id: MembershipId,
    pub team_id: TeamId,
    #[serde(default)]
    pub team_name: String,
    pub user_id: UserId,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub confirm: bool,
}

impl Entity for Membership {
    type Id = MembershipId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Body of a membership upsert call, as sent by the dashboard.
///
/// Everything is optional on the wire; [`UpsertMembershipRequest::validate`]
/// turns it into a [`MembershipRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMembershipRequest {
    pub team_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
    /// Teams the user is allowed to stay in.
    pub all_teams: Option<Vec<String>>,
    /// Remove the user's memberships in teams outside `all_teams`, which
    /// must then be present and include `team_id`.
    #[serde(default)]
    pub prune_other_teams: bool,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl UpsertMembershipRequest {
    pub fn validate(self) -> DomainResult<MembershipRequest> {
        let team_id = non_blank(self.team_id);
        let email = non_blank(self.email);

        let mut roles: Vec<String> = Vec::new();
        for role in self.roles {
            let role = role.trim();
            if !role.is_empty() && !roles.iter().any(|r| r == role) {
                roles.push(role.to_string());
            }
        }

        let mut missing = Vec::new();
        if team_id.is_none() {
            missing.push("teamId");
        }
        if email.is_none() {
            missing.push("email");
        }
        if roles.is_empty() {
            missing.push("roles");
        }
        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "missing required parameters: {}",
                missing.join(", ")
            )));
        }

        let team_id: TeamId = team_id.unwrap_or_default().parse()?;
        let user_id = non_blank(self.user_id)
            .map(|s| s.parse::<UserId>())
            .transpose()?;
        let all_teams = self
            .all_teams
            .map(|teams| {
                teams
                    .iter()
                    .map(|t| t.trim().parse::<TeamId>())
                    .collect::<DomainResult<Vec<_>>>()
            })
            .transpose()?;

        if self.prune_other_teams {
            match &all_teams {
                None => {
                    return Err(DomainError::validation(
                        "allTeams required when pruneOtherTeams is set",
                    ));
                }
                Some(teams) if !teams.contains(&team_id) => {
                    return Err(DomainError::validation(format!(
                        "allTeams must include teamId {team_id} when pruneOtherTeams is set"
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(MembershipRequest {
            team_id,
            roles,
            email: email.unwrap_or_default(),
            user_id,
            phone: non_blank(self.phone),
            url: non_blank(self.url),
            name: non_blank(self.name),
            all_teams,
            prune_other_teams: self.prune_other_teams,
        })
    }
}

/// A validated upsert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRequest {
    pub team_id: TeamId,
    /// Non-empty, trimmed, de-duplicated.
    pub roles: Vec<String>,
    pub email: String,
    pub user_id: Option<UserId>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
    pub all_teams: Option<Vec<TeamId>>,
    pub prune_other_teams: bool,
}

impl MembershipRequest {
    /// Teams to keep when pruning, or `None` when pruning was not asked for.
    pub fn prune_scope(&self) -> Option<&[TeamId]> {
        if !self.prune_other_teams {
            return None;
        }
        self.all_teams.as_deref()
    }
}

/// Payload for creating a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMembership {
    pub roles: Vec<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
