use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId};

pub const ITEMS_ROUTE: &str = "/items";
pub const REORDER_ROUTE: &str = "/items/reorder";
pub const HEALTH_ROUTE: &str = "/healthz";

/// Body of `POST /items/reorder`. Field names follow the browser client's camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub moved_item_id: ItemId,
    pub from_index: u32,
    pub to_index: u32,
}

impl ReorderRequest {
    pub fn new(moved_item_id: impl Into<ItemId>, from_index: u32, to_index: u32) -> Self {
        Self {
            moved_item_id: moved_item_id.into(),
            from_index,
            to_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub message: String,
    /// Collection after the move, sorted by rank.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ReorderResponse {
    pub fn success(items: Vec<Item>) -> Self {
        Self {
            message: "Success".to_string(),
            items,
        }
    }
}
