//! Droppable items

use crate::value::ValueMap;
use serde::{Deserialize, Serialize};

/// A droppable unit of loot
///
/// Items have no identity of their own; shared items live under an
/// [`ItemId`](crate::ItemId) in the design's item collection, while
/// unshared copies are embedded directly on a loot entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sprite or icon reference for the presentation layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Relative worth, used by the value sort dimension
    #[serde(default = "default_worth")]
    pub value: f64,
    /// Open user-extension fields
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub custom: ValueMap,
}

fn default_worth() -> f64 {
    1.0
}

impl Default for Item {
    fn default() -> Self {
        Self {
            name: None,
            sprite: None,
            value: 1.0,
            custom: ValueMap::new(),
        }
    }
}

/// Partial property bag for constructing an item
///
/// Absent fields fall back to defaults; the bag never has to be complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemProps {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub custom: Option<ValueMap>,
}

impl Item {
    /// Build a default-valued item, overridden by whatever the bag carries
    pub fn from_props(props: ItemProps) -> Self {
        Self {
            name: props.name,
            sprite: props.sprite,
            value: props.value.unwrap_or(1.0),
            custom: props.custom.unwrap_or_default(),
        }
    }

    /// Shorthand for a named item with defaults everywhere else
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}
