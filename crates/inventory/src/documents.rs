//! Typed views of the three collections the aggregator reads.
//!
//! Unknown attributes are ignored; optional attributes default to `None` so
//! partially filled documents still deserialize.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use medstock_core::{DocumentId, Entity, Reference};

/// A stocked lot of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "$id")]
    pub id: DocumentId,
    #[serde(default)]
    pub status: bool,
    #[serde(rename = "productDescriptions", default)]
    pub product_descriptions: Reference,
    #[serde(default)]
    pub date_expiry: Option<String>,
    #[serde(default)]
    pub lot_no: Option<String>,
    #[serde(default)]
    pub batch_no: Option<String>,
}

/// A line of an inventory, counted in one unit of measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDetail {
    #[serde(rename = "$id")]
    pub id: DocumentId,
    /// Back-reference to the owning [`Inventory`].
    #[serde(default)]
    pub inventories: Reference,
    #[serde(default)]
    pub units: Reference,
    #[serde(default)]
    pub running_balance: Option<Number>,
    #[serde(default)]
    pub med_rep: Option<String>,
}

/// A price quote for an inventory detail. The newest one is current.
///
/// `price` and `$createdAt` may be null on hand-edited documents; such a
/// quote still decodes and ranks below every timestamped one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellingPrice {
    #[serde(rename = "$id")]
    pub id: DocumentId,
    /// Back-reference to the priced [`InventoryDetail`].
    #[serde(rename = "inventoryDetails", alias = "inventory_details", default)]
    pub inventory_details: Reference,
    #[serde(default)]
    pub price: Option<f64>,
    /// ISO-8601 timestamp assigned by the store.
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
}

impl Entity for Inventory {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for InventoryDetail {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for SellingPrice {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
