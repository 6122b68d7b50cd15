//! The two backend functions, written against the store ports.

pub mod inventory_summary;
pub mod team_membership;

pub use inventory_summary::inventory_summary;
pub use team_membership::{
    reconcile, upsert_membership, MembershipAction, MembershipError, MembershipOutcome,
};
