//! Membership reconciliation decisions.

use medstock_core::{MembershipId, TeamId};

use crate::membership::{Membership, MembershipRequest, NewMembership};

/// What to do with the requested membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertAction {
    /// The user is already a member; overwrite their roles.
    Update {
        membership_id: MembershipId,
        roles: Vec<String>,
    },
    /// The user is not a member yet.
    Create(NewMembership),
}

/// Find the user's membership among a team's memberships.
///
/// A user id match takes precedence over an email match; emails compare
/// case-insensitively.
pub fn find_existing<'a>(
    memberships: &'a [Membership],
    request: &MembershipRequest,
) -> Option<&'a Membership> {
    if let Some(user_id) = &request.user_id {
        if let Some(m) = memberships.iter().find(|m| &m.user_id == user_id) {
            return Some(m);
        }
    }
    memberships
        .iter()
        .find(|m| m.user_email.eq_ignore_ascii_case(&request.email))
}

pub fn plan_upsert(request: &MembershipRequest, existing: Option<&Membership>) -> UpsertAction {
    match existing {
        Some(m) => UpsertAction::Update {
            membership_id: m.id.clone(),
            roles: request.roles.clone(),
        },
        None => UpsertAction::Create(NewMembership {
            roles: request.roles.clone(),
            email: request.email.clone(),
            user_id: request.user_id.clone(),
            phone: request.phone.clone(),
            url: request.url.clone(),
            name: request.name.clone(),
        }),
    }
}

/// Memberships of a user that fall outside the allowed teams.
pub fn prune_targets<'a>(
    user_memberships: &'a [Membership],
    allowed: &[TeamId],
) -> Vec<&'a Membership> {
    user_memberships
        .iter()
        .filter(|m| !allowed.contains(&m.team_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_core::UserId;
    use proptest::prelude::*;

    fn membership(id: &str, team: &str, user: &str, email: &str) -> Membership {
        Membership {
            id: MembershipId::from_raw(id),
            team_id: TeamId::from_raw(team),
            team_name: String::new(),
            user_id: UserId::from_raw(user),
            user_email: email.to_string(),
            user_name: String::new(),
            roles: vec!["staff".to_string()],
            confirm: true,
        }
    }

    fn request(user_id: Option<&str>, email: &str) -> MembershipRequest {
        MembershipRequest {
            team_id: TeamId::from_raw("pharmacy"),
            roles: vec!["owner".to_string()],
            email: email.to_string(),
            user_id: user_id.map(UserId::from_raw),
            phone: None,
            url: None,
            name: None,
            all_teams: None,
            prune_other_teams: false,
        }
    }

    #[test]
    fn user_id_match_beats_email_match() {
        let memberships = vec![
            membership("m1", "pharmacy", "other", "ana@example.com"),
            membership("m2", "pharmacy", "user1", "changed@example.com"),
        ];
        let found = find_existing(&memberships, &request(Some("user1"), "ana@example.com")).unwrap();
        assert_eq!(found.id.as_str(), "m2");
    }

    #[test]
    fn falls_back_to_case_insensitive_email() {
        let memberships = vec![membership("m1", "pharmacy", "u9", "Ana@Example.com")];
        let found = find_existing(&memberships, &request(Some("user1"), "ana@example.com")).unwrap();
        assert_eq!(found.id.as_str(), "m1");
        assert!(find_existing(&memberships, &request(None, "bob@example.com")).is_none());
    }

    #[test]
    fn existing_membership_is_updated_not_duplicated() {
        let existing = membership("m1", "pharmacy", "user1", "ana@example.com");
        let action = plan_upsert(&request(Some("user1"), "ana@example.com"), Some(&existing));
        assert_eq!(
            action,
            UpsertAction::Update {
                membership_id: MembershipId::from_raw("m1"),
                roles: vec!["owner".to_string()],
            }
        );
    }

    #[test]
    fn new_member_is_created_with_request_fields() {
        let mut req = request(None, "bob@example.com");
        req.phone = Some("+15550100".to_string());
        match plan_upsert(&req, None) {
            UpsertAction::Create(new) => {
                assert_eq!(new.email, "bob@example.com");
                assert_eq!(new.roles, vec!["owner"]);
                assert_eq!(new.phone.as_deref(), Some("+15550100"));
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn prunes_only_teams_outside_allow_list() {
        let memberships = vec![
            membership("m1", "pharmacy", "user1", "a@x.io"),
            membership("m2", "warehouse", "user1", "a@x.io"),
            membership("m3", "legacy", "user1", "a@x.io"),
        ];
        let allowed = vec![TeamId::from_raw("warehouse"), TeamId::from_raw("pharmacy")];
        let ids: Vec<_> = prune_targets(&memberships, &allowed)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["m3"]);
    }

    proptest! {
        /// Property: no membership in an allowed team is ever pruned, and every
        /// membership outside the allow-list is.
        #[test]
        fn prune_respects_allow_list(
            teams in prop::collection::vec(0usize..6, 0..12),
            allowed in prop::collection::vec(0usize..6, 0..6),
        ) {
            let memberships: Vec<Membership> = teams
                .iter()
                .enumerate()
                .map(|(i, t)| membership(&format!("m{i}"), &format!("t{t}"), "user1", "a@x.io"))
                .collect();
            let allowed: Vec<TeamId> = allowed.iter().map(|t| TeamId::from_raw(format!("t{t}"))).collect();

            let pruned = prune_targets(&memberships, &allowed);
            for m in &memberships {
                let is_pruned = pruned.iter().any(|p| p.id == m.id);
                prop_assert_eq!(is_pruned, !allowed.contains(&m.team_id));
            }
        }
    }
}
