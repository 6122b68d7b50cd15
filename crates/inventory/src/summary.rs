//! Inventory summary: join details with their parent lot and current price,
//! then group by (product, unit).
//!
//! Rules:
//! - the current price of a detail is the one with the greatest `$createdAt`,
//!   compared as strings; a missing timestamp sorts below any present one and
//!   on ties the first price seen wins
//! - details whose parent inventory is not in the input are orphans and are
//!   left out of every group
//! - groups are sorted by product id, then unit id (ordinal string order);
//!   rows keep input order inside a group

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use medstock_core::DocumentId;

use crate::documents::{Inventory, InventoryDetail, SellingPrice};

/// Separator between product and unit in a rendered group key.
pub const KEY_SEPARATOR: &str = "::";

/// The price currently attached to a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    #[serde(rename = "$id")]
    pub id: DocumentId,
    pub price: Option<f64>,
    #[serde(rename = "$createdAt")]
    pub created_at: Option<String>,
}

impl From<&SellingPrice> for PriceSnapshot {
    fn from(p: &SellingPrice) -> Self {
        Self {
            id: p.id.clone(),
            price: p.price,
            created_at: p.created_at.clone(),
        }
    }
}

/// One inventory detail joined with its parent inventory and current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "inventoryDetailId")]
    pub inventory_detail_id: DocumentId,
    #[serde(rename = "inventoryId")]
    pub inventory_id: DocumentId,
    #[serde(rename = "productDescriptions")]
    pub product_descriptions: String,
    pub units: String,
    pub lot_no: Option<String>,
    pub batch_no: Option<String>,
    pub date_expiry: Option<String>,
    pub running_balance: Option<Number>,
    pub med_rep: Option<String>,
    pub current_price: Option<PriceSnapshot>,
}

/// Grouping key. Field order gives the output sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub product: String,
    pub unit: String,
}

impl GroupKey {
    pub fn of(inventory: &Inventory, detail: &InventoryDetail) -> Self {
        Self {
            product: inventory.product_descriptions.key().to_string(),
            unit: detail.units.key().to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.product, self.unit)
    }
}

/// Rows sharing a (product, unit) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub key: String,
    #[serde(rename = "productDescriptions")]
    pub product_descriptions: String,
    pub units: String,
    pub items: Vec<Row>,
}

impl Group {
    fn new(key: &GroupKey) -> Self {
        Self {
            key: key.render(),
            product_descriptions: key.product.clone(),
            units: key.unit.clone(),
            items: Vec::new(),
        }
    }
}

/// Output of [`summarize`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub groups: Vec<Group>,
    /// Details skipped because their parent inventory was not found.
    pub orphaned: Vec<DocumentId>,
}

impl Summary {
    pub fn total_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// Index the newest price per inventory detail.
pub fn latest_prices(prices: &[SellingPrice]) -> HashMap<&DocumentId, &SellingPrice> {
    let mut latest: HashMap<&DocumentId, &SellingPrice> = HashMap::new();
    for price in prices {
        let Some(detail_id) = price.inventory_details.id() else {
            continue;
        };
        match latest.get(detail_id) {
            Some(current) if price.created_at.as_deref() <= current.created_at.as_deref() => {}
            _ => {
                latest.insert(detail_id, price);
            }
        }
    }
    latest
}

/// Join, group and sort.
pub fn summarize(
    inventories: &[Inventory],
    details: &[InventoryDetail],
    prices: &[SellingPrice],
) -> Summary {
    let latest = latest_prices(prices);

    // First inventory wins if the store ever hands back a duplicate id.
    let mut parents: HashMap<&DocumentId, &Inventory> = HashMap::with_capacity(inventories.len());
    for inv in inventories {
        parents.entry(&inv.id).or_insert(inv);
    }

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Group)> = Vec::new();
    let mut orphaned = Vec::new();

    for detail in details {
        let Some(parent) = detail.inventories.id().and_then(|id| parents.get(id)) else {
            orphaned.push(detail.id.clone());
            continue;
        };

        let key = GroupKey::of(parent, detail);
        let row = Row {
            inventory_detail_id: detail.id.clone(),
            inventory_id: parent.id.clone(),
            product_descriptions: key.product.clone(),
            units: key.unit.clone(),
            lot_no: parent.lot_no.clone(),
            batch_no: parent.batch_no.clone(),
            date_expiry: parent.date_expiry.clone(),
            running_balance: detail.running_balance.clone(),
            med_rep: detail.med_rep.clone(),
            current_price: latest.get(&detail.id).map(|p| PriceSnapshot::from(*p)),
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key.clone(), Group::new(&key)));
            groups.len() - 1
        });
        groups[slot].1.items.push(row);
    }

    groups.sort_by(|(a, _), (b, _)| a.cmp(b));

    Summary {
        groups: groups.into_iter().map(|(_, g)| g).collect(),
        orphaned,
    }
}
