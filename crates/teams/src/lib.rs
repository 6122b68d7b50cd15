//! Team membership domain.
//!
//! Request validation and the pure decisions of membership reconciliation
//! (which membership to update, what to create, what to prune). Talking to
//! the team directory is done by `medstock-infra`.

pub mod membership;
pub mod reconcile;

pub use membership::{Membership, MembershipRequest, NewMembership, Team, UpsertMembershipRequest};
pub use reconcile::{find_existing, plan_upsert, prune_targets, UpsertAction};
