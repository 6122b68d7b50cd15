use serde::{Deserialize, Serialize};

use medstock_core::MembershipId;
use medstock_infra::services::{MembershipAction, MembershipOutcome};
use medstock_inventory::{Group, Summary};
use medstock_teams::Membership;

// -------------------------
// Response envelopes
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummaryResponse {
    pub success: bool,
    pub total_groups: usize,
    pub data: Vec<Group>,
}

impl From<Summary> for InventorySummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            success: true,
            total_groups: summary.total_groups(),
            data: summary.groups,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub success: bool,
    pub action: MembershipAction,
    pub membership: Membership,
    pub pruned_memberships: Vec<MembershipId>,
}

impl From<MembershipOutcome> for MembershipResponse {
    fn from(out: MembershipOutcome) -> Self {
        Self {
            success: true,
            action: out.action,
            membership: out.membership,
            pruned_memberships: out.pruned_memberships,
        }
    }
}
