use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a list item. Opaque to the server; clients echo it back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Zero-based rank. Across a collection the ranks are exactly `0..len`.
    pub order: u32,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
        }
    }
}

/// An item without a rank, used when seeding a collection in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub id: ItemId,
    pub name: String,
}

impl NewItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub fn default_items() -> Vec<NewItem> {
    [
        ("1", "Design Research"),
        ("2", "Wireframing"),
        ("3", "Prototyping"),
        ("4", "User Testing"),
        ("5", "Final Handover"),
        ("6", "Project Kickoff"),
        ("7", "Stakeholder Interview"),
        ("8", "Market Analysis"),
    ]
    .into_iter()
    .map(|(id, name)| NewItem::new(id, name))
    .collect()
}
