use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use medstock_infra::services::{self, MembershipError};
use medstock_infra::{ConfigError, PageLimits, TeamDirectory};
use medstock_teams::UpsertMembershipRequest;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Create or update a team membership; prune other teams on request.
pub async fn team_membership(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<UpsertMembershipRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => {
            return errors::failure(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    let (directory, limits) = match prepare(&services) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "team membership is not configured");
            return errors::internal(e);
        }
    };

    match services::upsert_membership(directory, body, limits).await {
        Ok(outcome) => (StatusCode::OK, Json(dto::MembershipResponse::from(outcome))).into_response(),
        Err(e) => {
            match &e {
                MembershipError::Store(inner) => tracing::error!(error = %inner, "team membership failed"),
                other => tracing::info!(error = %other, "team membership rejected"),
            }
            errors::membership_error_to_response(e)
        }
    }
}

fn prepare(services: &AppServices) -> Result<(&dyn TeamDirectory, PageLimits), ConfigError> {
    Ok((services.teams()?, services.settings().pagination()?))
}
