//! Tables and their loot entries
//!
//! A table is an ordered, weighted container of loot entries. Entries come
//! in five shapes, discriminated by a `type` tag on the wire:
//! - `entry` - a placeholder with no rollable content
//! - `item_id` / `item_noid` - an item by shared id, or embedded in place
//! - `table_id` / `table_noid` - a sub-table by shared id, or embedded
//!
//! Every consumption site matches the shape enum exhaustively, so adding a
//! shape fails to compile until each engine handles it.

use crate::identity::{EntryKey, ItemId, TableId};
use crate::item::Item;
use crate::value::ValueMap;
use serde::{Deserialize, Serialize};

/// Quantity range attached to item-shaped entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// Minimum units per drop
    #[serde(default = "default_one")]
    pub min: u32,
    /// Maximum units per drop
    #[serde(default = "default_one")]
    pub max: u32,
}

fn default_one() -> u32 {
    1
}

impl Default for Quantity {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

/// Optional per-generation roll limits on an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RollBounds {
    /// Guaranteed number of hits per generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<u32>,
    /// Cap on hits per generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u32>,
}

/// Selection criteria attached to rollable entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// Relative selection weight; 0 keeps the entry but removes its
    /// probability mass
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Optional roll limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolls: Option<RollBounds>,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            weight: 1.0,
            rolls: None,
        }
    }
}

impl Criteria {
    /// Criteria with just a weight
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight,
            rolls: None,
        }
    }
}

/// A named weighted container of loot entries
///
/// `loot` order is insertion order; it matters for display and for
/// first-match addressing, never for sampling probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordered loot entries
    #[serde(default)]
    pub loot: Vec<LootEntry>,
    /// Open user-extension fields
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub custom: ValueMap,
}

/// Partial property bag for constructing a table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableProps {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub loot: Option<Vec<LootEntry>>,
    #[serde(default)]
    pub custom: Option<ValueMap>,
}

impl Table {
    /// Build a default-valued table, overridden by whatever the bag carries
    pub fn from_props(props: TableProps) -> Self {
        Self {
            name: props.name,
            loot: props.loot.unwrap_or_default(),
            custom: props.custom.unwrap_or_default(),
        }
    }

    /// Shorthand for a named empty table
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One row of a table's loot list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Addressing key, unique within the owning loot array
    pub key: EntryKey,
    /// The entry's shape and shape-specific fields
    #[serde(flatten)]
    pub kind: EntryKind,
}

/// Shape-specific fields of a loot entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryKind {
    /// Editing placeholder; carries no rollable content and is skipped by
    /// sampling and export
    #[serde(rename = "entry")]
    Placeholder,
    /// References a shared item; a null id means "not chosen yet"
    #[serde(rename = "item_id")]
    ItemRef {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<ItemId>,
        #[serde(default)]
        quantity: Quantity,
        #[serde(default)]
        criteria: Criteria,
    },
    /// Embeds an unshared item's fields directly on the entry
    #[serde(rename = "item_noid")]
    ItemInline {
        #[serde(flatten)]
        item: Item,
        #[serde(default)]
        quantity: Quantity,
        #[serde(default)]
        criteria: Criteria,
    },
    /// References a shared table; a null id means "not chosen yet"
    #[serde(rename = "table_id")]
    TableRef {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<TableId>,
        #[serde(default)]
        criteria: Criteria,
    },
    /// Embeds an unshared table, with its own nested loot array
    #[serde(rename = "table_noid")]
    TableInline {
        #[serde(flatten)]
        table: Table,
        #[serde(default)]
        criteria: Criteria,
    },
}

/// The five entry shapes as plain tags, for shape-driven construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryShape {
    Placeholder,
    ItemRef,
    ItemInline,
    TableRef,
    TableInline,
}

/// Partial property bag for constructing a loot entry
///
/// One bag serves all five shapes; construction reads only the fields
/// legal for the requested shape and ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryProps {
    /// Item target, for `ItemRef`
    #[serde(default)]
    pub item: Option<ItemId>,
    /// Table target, for `TableRef`
    #[serde(default)]
    pub table: Option<TableId>,
    /// Display name, for inline shapes
    #[serde(default)]
    pub name: Option<String>,
    /// Sprite reference, for `ItemInline`
    #[serde(default)]
    pub sprite: Option<String>,
    /// Relative worth, for `ItemInline`
    #[serde(default)]
    pub value: Option<f64>,
    /// Seed loot array, for `TableInline`
    #[serde(default)]
    pub loot: Option<Vec<LootEntry>>,
    /// Extension fields, for inline shapes
    #[serde(default)]
    pub custom: Option<ValueMap>,
    /// Quantity range, for item shapes
    #[serde(default)]
    pub quantity: Option<Quantity>,
    /// Selection criteria, for every rollable shape
    #[serde(default)]
    pub criteria: Option<Criteria>,
}

impl LootEntry {
    /// Build an entry of the requested shape from a partial property bag
    ///
    /// Total and pure: every bag produces a valid entry, and properties
    /// foreign to the shape are never cloned forward.
    pub fn from_props(key: EntryKey, shape: EntryShape, props: EntryProps) -> Self {
        let kind = match shape {
            EntryShape::Placeholder => EntryKind::Placeholder,
            EntryShape::ItemRef => EntryKind::ItemRef {
                id: props.item,
                quantity: props.quantity.unwrap_or_default(),
                criteria: props.criteria.unwrap_or_default(),
            },
            EntryShape::ItemInline => EntryKind::ItemInline {
                item: Item {
                    name: props.name,
                    sprite: props.sprite,
                    value: props.value.unwrap_or(1.0),
                    custom: props.custom.unwrap_or_default(),
                },
                quantity: props.quantity.unwrap_or_default(),
                criteria: props.criteria.unwrap_or_default(),
            },
            EntryShape::TableRef => EntryKind::TableRef {
                id: props.table,
                criteria: props.criteria.unwrap_or_default(),
            },
            EntryShape::TableInline => EntryKind::TableInline {
                table: Table {
                    name: props.name,
                    loot: props.loot.unwrap_or_default(),
                    custom: props.custom.unwrap_or_default(),
                },
                criteria: props.criteria.unwrap_or_default(),
            },
        };
        Self { key, kind }
    }

    /// A fresh placeholder entry
    pub fn placeholder(key: EntryKey) -> Self {
        Self {
            key,
            kind: EntryKind::Placeholder,
        }
    }

    /// Declared selection weight; placeholders weigh nothing
    pub fn weight(&self) -> f64 {
        match &self.kind {
            EntryKind::Placeholder => 0.0,
            EntryKind::ItemRef { criteria, .. }
            | EntryKind::ItemInline { criteria, .. }
            | EntryKind::TableRef { criteria, .. }
            | EntryKind::TableInline { criteria, .. } => criteria.weight,
        }
    }

    /// The entry's wire-level type tag
    pub fn type_tag(&self) -> &'static str {
        match &self.kind {
            EntryKind::Placeholder => "entry",
            EntryKind::ItemRef { .. } => "item_id",
            EntryKind::ItemInline { .. } => "item_noid",
            EntryKind::TableRef { .. } => "table_id",
            EntryKind::TableInline { .. } => "table_noid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_ignores_foreign_props() {
        let entry = LootEntry::from_props(
            EntryKey::new("e1"),
            EntryShape::Placeholder,
            EntryProps {
                item: Some(ItemId::new("gold")),
                name: Some("scratch".into()),
                criteria: Some(Criteria::weighted(9.0)),
                ..EntryProps::default()
            },
        );
        assert_eq!(entry.kind, EntryKind::Placeholder);
        assert_eq!(entry.weight(), 0.0);
    }

    #[test]
    fn test_item_ref_ignores_table_target() {
        let entry = LootEntry::from_props(
            EntryKey::new("e1"),
            EntryShape::ItemRef,
            EntryProps {
                item: Some(ItemId::new("gold")),
                table: Some(TableId::new("t1")),
                loot: Some(vec![LootEntry::placeholder(EntryKey::new("e2"))]),
                ..EntryProps::default()
            },
        );
        match entry.kind {
            EntryKind::ItemRef { id, quantity, criteria } => {
                assert_eq!(id, Some(ItemId::new("gold")));
                assert_eq!(quantity, Quantity::default());
                assert_eq!(criteria.weight, 1.0);
            }
            other => panic!("wrong shape: {:?}", other),
        }
    }

    #[test]
    fn test_inline_table_takes_seed_loot() {
        let entry = LootEntry::from_props(
            EntryKey::new("e1"),
            EntryShape::TableInline,
            EntryProps {
                name: Some("gem pouch".into()),
                loot: Some(vec![LootEntry::placeholder(EntryKey::new("e2"))]),
                ..EntryProps::default()
            },
        );
        match entry.kind {
            EntryKind::TableInline { table, .. } => {
                assert_eq!(table.name.as_deref(), Some("gem pouch"));
                assert_eq!(table.loot.len(), 1);
            }
            other => panic!("wrong shape: {:?}", other),
        }
    }

    #[test]
    fn test_type_tags() {
        let key = EntryKey::new("e1");
        let tags: Vec<&str> = [
            EntryShape::Placeholder,
            EntryShape::ItemRef,
            EntryShape::ItemInline,
            EntryShape::TableRef,
            EntryShape::TableInline,
        ]
        .into_iter()
        .map(|shape| {
            LootEntry::from_props(key.clone(), shape, EntryProps::default()).type_tag()
        })
        .collect();
        assert_eq!(tags, ["entry", "item_id", "item_noid", "table_id", "table_noid"]);
    }
}
