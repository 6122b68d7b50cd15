use axum::{routing::post, Router};

pub mod inventory;
pub mod system;
pub mod teams;

/// Router for the backend functions (mounted under `/functions`).
pub fn router() -> Router {
    Router::new()
        .route(
            "/inventory-summary",
            post(inventory::inventory_summary).get(inventory::inventory_summary),
        )
        .route("/team-membership", post(teams::team_membership))
}
