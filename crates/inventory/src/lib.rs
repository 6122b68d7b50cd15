//! Inventory reporting domain.
//!
//! Documents read from the store (inventories, their line details, selling
//! prices) and the pure aggregation that joins them into per product/unit
//! groups. No IO lives here; fetching is done by `medstock-infra`.

pub mod documents;
pub mod summary;

pub use documents::{Inventory, InventoryDetail, SellingPrice};
pub use summary::{Group, GroupKey, PriceSnapshot, Row, Summary, latest_prices, summarize};
