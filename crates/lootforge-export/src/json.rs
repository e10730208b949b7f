//! JSON projection of tables
//!
//! The editor's "view as JSON" surface: a table rendered as a plain JSON
//! tree with placeholder entries omitted, caller-chosen fields stripped,
//! and - optionally - id references replaced by the referenced item or
//! table inlined in place (`populate`). The projection reads the stored
//! collections and never mutates them.

use indexmap::{IndexMap, IndexSet};
use lootforge_core::{
    Criteria, EntryKind, Item, ItemId, LootEntry, Quantity, Table, TableId, Value, ValueMap,
};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use std::collections::HashSet;

use crate::error::Result;

/// Projection options
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Field names stripped at every object level
    pub hidden: HashSet<String>,
    /// Inline referenced items/tables in place of their bare id
    pub populate: bool,
}

impl ExportOptions {
    /// Options with nothing hidden and no population
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide a field name everywhere in the projection
    pub fn hide(mut self, field: impl Into<String>) -> Self {
        self.hidden.insert(field.into());
        self
    }

    /// Enable reference inlining
    pub fn populate(mut self) -> Self {
        self.populate = true;
        self
    }

    fn shows(&self, field: &str) -> bool {
        !self.hidden.contains(field)
    }
}

/// Project a table to a JSON value
pub fn export_table(
    table: &Table,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    options: &ExportOptions,
) -> JsonValue {
    let mut ancestors = IndexSet::new();
    table_json(table, tables, items, options, &mut ancestors)
}

/// Project a table to pretty-printed JSON text
pub fn export_table_string(
    table: &Table,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    options: &ExportOptions,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export_table(
        table, tables, items, options,
    ))?)
}

fn table_json(
    table: &Table,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    options: &ExportOptions,
    ancestors: &mut IndexSet<TableId>,
) -> JsonValue {
    let mut out = JsonMap::new();
    if let (Some(name), true) = (&table.name, options.shows("name")) {
        out.insert("name".to_string(), JsonValue::String(name.clone()));
    }
    if options.shows("loot") {
        let entries: Vec<JsonValue> = table
            .loot
            .iter()
            .filter_map(|entry| entry_json(entry, tables, items, options, ancestors))
            .collect();
        out.insert("loot".to_string(), JsonValue::Array(entries));
    }
    put_custom(&mut out, &table.custom, options);
    JsonValue::Object(out)
}

/// Project one entry; placeholders project to nothing
fn entry_json(
    entry: &LootEntry,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    options: &ExportOptions,
    ancestors: &mut IndexSet<TableId>,
) -> Option<JsonValue> {
    if matches!(entry.kind, EntryKind::Placeholder) {
        return None;
    }
    let mut out = JsonMap::new();
    if options.shows("key") {
        out.insert("key".to_string(), JsonValue::String(entry.key.to_string()));
    }
    out.insert(
        "type".to_string(),
        JsonValue::String(entry.type_tag().to_string()),
    );

    match &entry.kind {
        EntryKind::Placeholder => unreachable!("handled above"),
        EntryKind::ItemRef {
            id,
            quantity,
            criteria,
        } => {
            // a populated reference replaces its bare id; unresolved ids
            // stay as they are
            let resolved = if options.populate {
                id.as_ref().and_then(|id| items.get(id))
            } else {
                None
            };
            match resolved {
                Some(item) => {
                    if options.shows("item") {
                        out.insert("item".to_string(), item_json(item, options));
                    }
                }
                None => {
                    if options.shows("id") {
                        out.insert("id".to_string(), id_json(id.as_ref().map(ItemId::as_str)));
                    }
                }
            }
            put_quantity(&mut out, quantity, options);
            put_criteria(&mut out, criteria, options);
        }
        EntryKind::ItemInline {
            item,
            quantity,
            criteria,
        } => {
            merge_item_fields(&mut out, item, options);
            put_quantity(&mut out, quantity, options);
            put_criteria(&mut out, criteria, options);
        }
        EntryKind::TableRef { id, criteria } => {
            // the ancestor stack bounds recursion when a cycle was
            // introduced behind the integrity checker's back; a blocked
            // or unresolved reference falls back to its bare id
            let mut inlined = false;
            if options.populate {
                if let Some(id) = id {
                    if let Some(target) = tables.get(id) {
                        if options.shows("table") && !ancestors.contains(id) {
                            ancestors.insert(id.clone());
                            let sub = table_json(target, tables, items, options, ancestors);
                            ancestors.swap_remove(id);
                            out.insert("table".to_string(), sub);
                            inlined = true;
                        }
                    }
                }
            }
            if !inlined && options.shows("id") {
                out.insert("id".to_string(), id_json(id.as_ref().map(TableId::as_str)));
            }
            put_criteria(&mut out, criteria, options);
        }
        EntryKind::TableInline { table, criteria } => {
            let projected = table_json(table, tables, items, options, ancestors);
            if let JsonValue::Object(fields) = projected {
                for (field, value) in fields {
                    out.insert(field, value);
                }
            }
            put_criteria(&mut out, criteria, options);
        }
    }
    Some(JsonValue::Object(out))
}

fn item_json(item: &Item, options: &ExportOptions) -> JsonValue {
    let mut out = JsonMap::new();
    merge_item_fields(&mut out, item, options);
    JsonValue::Object(out)
}

fn merge_item_fields(out: &mut JsonMap<String, JsonValue>, item: &Item, options: &ExportOptions) {
    if let (Some(name), true) = (&item.name, options.shows("name")) {
        out.insert("name".to_string(), JsonValue::String(name.clone()));
    }
    if let (Some(sprite), true) = (&item.sprite, options.shows("sprite")) {
        out.insert("sprite".to_string(), JsonValue::String(sprite.clone()));
    }
    if options.shows("value") {
        out.insert("value".to_string(), number_json(item.value));
    }
    put_custom(out, &item.custom, options);
}

fn put_quantity(out: &mut JsonMap<String, JsonValue>, quantity: &Quantity, options: &ExportOptions) {
    if !options.shows("quantity") {
        return;
    }
    let mut q = JsonMap::new();
    if options.shows("min") {
        q.insert("min".to_string(), JsonValue::Number(quantity.min.into()));
    }
    if options.shows("max") {
        q.insert("max".to_string(), JsonValue::Number(quantity.max.into()));
    }
    out.insert("quantity".to_string(), JsonValue::Object(q));
}

fn put_criteria(out: &mut JsonMap<String, JsonValue>, criteria: &Criteria, options: &ExportOptions) {
    if !options.shows("criteria") {
        return;
    }
    let mut c = JsonMap::new();
    if options.shows("weight") {
        c.insert("weight".to_string(), number_json(criteria.weight));
    }
    if let (Some(rolls), true) = (&criteria.rolls, options.shows("rolls")) {
        let mut r = JsonMap::new();
        if let (Some(required), true) = (rolls.required, options.shows("required")) {
            r.insert("required".to_string(), JsonValue::Number(required.into()));
        }
        if let (Some(maximum), true) = (rolls.maximum, options.shows("maximum")) {
            r.insert("maximum".to_string(), JsonValue::Number(maximum.into()));
        }
        c.insert("rolls".to_string(), JsonValue::Object(r));
    }
    out.insert("criteria".to_string(), JsonValue::Object(c));
}

fn put_custom(out: &mut JsonMap<String, JsonValue>, custom: &ValueMap, options: &ExportOptions) {
    if custom.is_empty() || !options.shows("custom") {
        return;
    }
    out.insert("custom".to_string(), custom_json(custom, options));
}

fn custom_json(map: &ValueMap, options: &ExportOptions) -> JsonValue {
    let mut out = JsonMap::new();
    for (field, value) in map {
        if options.shows(field) {
            out.insert(field.clone(), value_json(value, options));
        }
    }
    JsonValue::Object(out)
}

fn value_json(value: &Value, options: &ExportOptions) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => number_json(*f),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::List(list) => {
            JsonValue::Array(list.iter().map(|v| value_json(v, options)).collect())
        }
        Value::Map(map) => custom_json(map, options),
    }
}

fn id_json(id: Option<&str>) -> JsonValue {
    match id {
        Some(id) => JsonValue::String(id.to_string()),
        None => JsonValue::Null,
    }
}

fn number_json(f: f64) -> JsonValue {
    Number::from_f64(f)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootforge_core::{Criteria, EntryKey, EntryProps, EntryShape};

    fn entry(key: &str, shape: EntryShape, props: EntryProps) -> LootEntry {
        LootEntry::from_props(EntryKey::new(key), shape, props)
    }

    fn empty_tables() -> IndexMap<TableId, Table> {
        IndexMap::new()
    }

    fn empty_items() -> IndexMap<ItemId, Item> {
        IndexMap::new()
    }

    #[test]
    fn test_placeholders_omitted() {
        let table = Table {
            name: Some("Chest".into()),
            loot: vec![
                entry("e1", EntryShape::Placeholder, EntryProps::default()),
                entry(
                    "e2",
                    EntryShape::ItemInline,
                    EntryProps {
                        name: Some("Coin".into()),
                        ..EntryProps::default()
                    },
                ),
            ],
            ..Table::default()
        };
        let json = export_table(&table, &empty_tables(), &empty_items(), &ExportOptions::new());
        let loot = json["loot"].as_array().unwrap();
        assert_eq!(loot.len(), 1);
        assert_eq!(loot[0]["type"], "item_noid");
        assert_eq!(loot[0]["name"], "Coin");
    }

    #[test]
    fn test_nested_placeholders_omitted() {
        let table = Table {
            loot: vec![entry(
                "e1",
                EntryShape::TableInline,
                EntryProps {
                    loot: Some(vec![entry("e2", EntryShape::Placeholder, EntryProps::default())]),
                    ..EntryProps::default()
                },
            )],
            ..Table::default()
        };
        let json = export_table(&table, &empty_tables(), &empty_items(), &ExportOptions::new());
        let inner = json["loot"][0]["loot"].as_array().unwrap();
        assert!(inner.is_empty());
    }

    #[test]
    fn test_hidden_fields_stripped_everywhere() {
        let table = Table {
            loot: vec![entry(
                "e1",
                EntryShape::ItemInline,
                EntryProps {
                    name: Some("Coin".into()),
                    criteria: Some(Criteria::weighted(2.0)),
                    ..EntryProps::default()
                },
            )],
            ..Table::default()
        };
        let options = ExportOptions::new().hide("key").hide("quantity");
        let json = export_table(&table, &empty_tables(), &empty_items(), &options);
        let row = &json["loot"][0];
        assert!(row.get("key").is_none());
        assert!(row.get("quantity").is_none());
        assert_eq!(row["criteria"]["weight"], 2.0);
    }

    #[test]
    fn test_unset_reference_exports_null_id() {
        let table = Table {
            loot: vec![entry("e1", EntryShape::ItemRef, EntryProps::default())],
            ..Table::default()
        };
        let json = export_table(&table, &empty_tables(), &empty_items(), &ExportOptions::new());
        assert!(json["loot"][0]["id"].is_null());
    }

    #[test]
    fn test_populate_inlines_items_and_tables() {
        let mut items = empty_items();
        items.insert(ItemId::new("gold"), Item::named("Gold Coin"));
        let mut tables = empty_tables();
        tables.insert(
            TableId::new("gems"),
            Table {
                name: Some("Gems".into()),
                loot: vec![entry(
                    "g1",
                    EntryShape::ItemRef,
                    EntryProps {
                        item: Some(ItemId::new("gold")),
                        ..EntryProps::default()
                    },
                )],
                ..Table::default()
            },
        );
        let root = Table {
            loot: vec![entry(
                "e1",
                EntryShape::TableRef,
                EntryProps {
                    table: Some(TableId::new("gems")),
                    ..EntryProps::default()
                },
            )],
            ..Table::default()
        };

        let bare = export_table(&root, &tables, &items, &ExportOptions::new());
        assert!(bare["loot"][0].get("table").is_none());

        let populated = export_table(&root, &tables, &items, &ExportOptions::new().populate());
        let inlined = &populated["loot"][0]["table"];
        assert_eq!(inlined["name"], "Gems");
        assert_eq!(inlined["loot"][0]["item"]["name"], "Gold Coin");
    }

    #[test]
    fn test_populate_survives_cyclic_references() {
        // a -> b -> a, built by hand to sidestep the integrity checker
        let mut tables = empty_tables();
        tables.insert(
            TableId::new("a"),
            Table {
                loot: vec![entry(
                    "e1",
                    EntryShape::TableRef,
                    EntryProps {
                        table: Some(TableId::new("b")),
                        ..EntryProps::default()
                    },
                )],
                ..Table::default()
            },
        );
        tables.insert(
            TableId::new("b"),
            Table {
                loot: vec![entry(
                    "e2",
                    EntryShape::TableRef,
                    EntryProps {
                        table: Some(TableId::new("a")),
                        ..EntryProps::default()
                    },
                )],
                ..Table::default()
            },
        );

        let root = tables.get(&TableId::new("a")).unwrap().clone();
        let json = export_table(&root, &tables, &empty_items(), &ExportOptions::new().populate());
        // b inlines, a inlines beneath it, and the edge closing the loop
        // degrades to a bare id instead of recursing forever
        let back = &json["loot"][0]["table"]["loot"][0];
        assert!(back.get("table").is_some());
        let cut = &back["table"]["loot"][0];
        assert_eq!(cut["id"], "b");
        assert!(cut.get("table").is_none());
    }

    #[test]
    fn test_custom_values_export_naturally() {
        let mut custom = ValueMap::new();
        custom.insert("rarity".into(), Value::String("rare".into()));
        custom.insert("tier".into(), Value::Int(3));
        let table = Table {
            loot: vec![entry(
                "e1",
                EntryShape::ItemInline,
                EntryProps {
                    name: Some("Relic".into()),
                    custom: Some(custom),
                    ..EntryProps::default()
                },
            )],
            ..Table::default()
        };
        let json = export_table(&table, &empty_tables(), &empty_items(), &ExportOptions::new());
        assert_eq!(json["loot"][0]["custom"]["rarity"], "rare");
        assert_eq!(json["loot"][0]["custom"]["tier"], 3);
    }
}
