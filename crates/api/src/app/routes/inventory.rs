use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use medstock_infra::{services, ConfigError, DocumentStore, InventoryCollections, PageLimits};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Grouped inventory summary. Configuration problems are reported before
/// any remote call.
pub async fn inventory_summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let (collections, limits, store) = match prepare(&services) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "inventory summary is not configured");
            return errors::internal(e);
        }
    };

    match services::inventory_summary(store, &collections, limits).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(dto::InventorySummaryResponse::from(summary)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "inventory summary failed");
            errors::internal(e)
        }
    }
}

fn prepare(
    services: &AppServices,
) -> Result<(InventoryCollections, PageLimits, &dyn DocumentStore), ConfigError> {
    let settings = services.settings();
    Ok((
        settings.inventory_collections()?,
        settings.pagination()?,
        services.documents()?,
    ))
}
