//! Inventory summary function: fetch the three collections and aggregate.

use serde_json::Value as JsonValue;

use medstock_inventory::{summarize, Inventory, InventoryDetail, SellingPrice, Summary};

use crate::config::{InventoryCollections, PageLimits};
use crate::store::query::MAX_QUERY_VALUES;
use crate::store::{fetch_all, DocumentStore, Query, StoreError};

/// Active inventories, their details and every selling price, aggregated.
///
/// Remote calls are sequential. Any failed page aborts the whole run.
#[tracing::instrument(skip_all, fields(database = %collections.database_id))]
pub async fn inventory_summary<S>(
    store: &S,
    collections: &InventoryCollections,
    limits: PageLimits,
) -> Result<Summary, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let db = collections.database_id.as_str();

    let inventories: Vec<Inventory> = fetch_all(
        store,
        db,
        &collections.inventories,
        &[Query::equal("status", [true])],
        limits,
    )
    .await?;
    tracing::debug!(count = inventories.len(), "fetched active inventories");

    let details = fetch_details(store, collections, &inventories, limits).await?;
    tracing::debug!(count = details.len(), "fetched inventory details");

    let prices: Vec<SellingPrice> =
        fetch_all(store, db, &collections.selling_prices, &[], limits).await?;
    tracing::debug!(count = prices.len(), "fetched selling prices");

    let summary = summarize(&inventories, &details, &prices);
    if !summary.orphaned.is_empty() {
        tracing::debug!(
            orphaned = summary.orphaned.len(),
            "skipped details without an active parent inventory"
        );
    }
    tracing::info!(
        groups = summary.total_groups(),
        rows = summary.total_rows(),
        "inventory summary built"
    );

    Ok(summary)
}

/// Details belonging to `inventories`, requested in id chunks the backend
/// accepts in a single `equal` query.
async fn fetch_details<S>(
    store: &S,
    collections: &InventoryCollections,
    inventories: &[Inventory],
    limits: PageLimits,
) -> Result<Vec<InventoryDetail>, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let ids: Vec<JsonValue> = inventories
        .iter()
        .map(|inv| JsonValue::from(inv.id.as_str()))
        .collect();

    let mut details = Vec::new();
    for chunk in ids.chunks(MAX_QUERY_VALUES) {
        let filter = [Query::equal("inventories", chunk.iter().cloned())];
        let page: Vec<InventoryDetail> = fetch_all(
            store,
            &collections.database_id,
            &collections.inventory_details,
            &filter,
            limits,
        )
        .await?;
        details.extend(page);
    }
    Ok(details)
}
