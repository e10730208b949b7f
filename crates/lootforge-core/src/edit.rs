//! Locating and mutating entries in a nested loot tree
//!
//! These operations address entries by key and fields by dotted path,
//! descending only into inline (`table_noid`) sub-tables - id-referenced
//! tables are separate trees reached by collection lookup, never by
//! structural descent.
//!
//! None of them allocate global state or panic on malformed input: a
//! missing key resolves to `None`/`false`, a malformed path is a silent
//! no-op. Callers own copy-on-write discipline (clone the table, mutate
//! the clone, swap it back in).

use crate::identity::EntryKey;
use crate::table::{Criteria, EntryKind, LootEntry, Quantity, RollBounds, Table};
use crate::value::{Value, ValueMap};

/// Find the first entry with the given key, depth-first pre-order
pub fn find_by_key<'a>(key: &EntryKey, entries: &'a [LootEntry]) -> Option<&'a LootEntry> {
    for entry in entries {
        if entry.key == *key {
            return Some(entry);
        }
        if let EntryKind::TableInline { table, .. } = &entry.kind {
            if let Some(found) = find_by_key(key, &table.loot) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable variant of [`find_by_key`]
pub fn find_by_key_mut<'a>(
    key: &EntryKey,
    entries: &'a mut [LootEntry],
) -> Option<&'a mut LootEntry> {
    for entry in entries.iter_mut() {
        if entry.key == *key {
            return Some(entry);
        }
        if let EntryKind::TableInline { table, .. } = &mut entry.kind {
            if let Some(found) = find_by_key_mut(key, &mut table.loot) {
                return Some(found);
            }
        }
    }
    None
}

/// Remove the first entry with the given key from whichever loot array
/// directly contains it
///
/// Returns whether anything was removed. A second call with the same key
/// on the same tree returns `false` and changes nothing.
pub fn delete_by_key(key: &EntryKey, entries: &mut Vec<LootEntry>) -> bool {
    for index in 0..entries.len() {
        if entries[index].key == *key {
            entries.remove(index);
            return true;
        }
        if let EntryKind::TableInline { table, .. } = &mut entries[index].kind {
            if delete_by_key(key, &mut table.loot) {
                return true;
            }
        }
    }
    false
}

/// Append a fresh placeholder to the inline table addressed by `parent`
///
/// No-op (`false`) when the key is absent or names anything other than an
/// inline table.
pub fn create_sub_entry(parent: &EntryKey, entries: &mut [LootEntry], key: EntryKey) -> bool {
    match find_by_key_mut(parent, entries) {
        Some(LootEntry {
            kind: EntryKind::TableInline { table, .. },
            ..
        }) => {
            table.loot.push(LootEntry::placeholder(key));
            true
        }
        _ => false,
    }
}

/// Overwrite one field of an entry, addressed by dotted path segments
///
/// The path is walked through the entry's shape-legal fields; the
/// terminal segment is overwritten when every intermediate segment
/// resolves and the value coerces to the field's type. Any failure along
/// the way - foreign segment, wrong shape, uncoercible value - leaves
/// the entry untouched and returns `false`. Mutation is all-or-nothing.
pub fn set_field(entry: &mut LootEntry, path: &[&str], value: Value) -> bool {
    let Some((&head, rest)) = path.split_first() else {
        return false;
    };
    match &mut entry.kind {
        EntryKind::Placeholder => false,
        EntryKind::ItemRef {
            id,
            quantity,
            criteria,
        } => match head {
            "id" if rest.is_empty() => set_opt_id(id, &value),
            "quantity" => set_quantity(quantity, rest, &value),
            "criteria" => set_criteria(criteria, rest, &value),
            _ => false,
        },
        EntryKind::ItemInline {
            item,
            quantity,
            criteria,
        } => match head {
            "name" if rest.is_empty() => set_opt_string(&mut item.name, &value),
            "sprite" if rest.is_empty() => set_opt_string(&mut item.sprite, &value),
            "value" if rest.is_empty() => set_f64(&mut item.value, &value),
            "custom" => set_custom(&mut item.custom, rest, value),
            "quantity" => set_quantity(quantity, rest, &value),
            "criteria" => set_criteria(criteria, rest, &value),
            _ => false,
        },
        EntryKind::TableRef { id, criteria } => match head {
            "id" if rest.is_empty() => set_opt_id(id, &value),
            "criteria" => set_criteria(criteria, rest, &value),
            _ => false,
        },
        EntryKind::TableInline { table, criteria } => match head {
            "name" if rest.is_empty() => set_opt_string(&mut table.name, &value),
            "custom" => set_custom(&mut table.custom, rest, value),
            "criteria" => set_criteria(criteria, rest, &value),
            _ => false,
        },
    }
}

fn set_opt_string(field: &mut Option<String>, value: &Value) -> bool {
    match value {
        Value::Null => {
            *field = None;
            true
        }
        Value::String(s) => {
            *field = Some(s.clone());
            true
        }
        _ => false,
    }
}

fn set_opt_id<T: From<String>>(field: &mut Option<T>, value: &Value) -> bool {
    match value {
        Value::Null => {
            *field = None;
            true
        }
        Value::String(s) => {
            *field = Some(T::from(s.clone()));
            true
        }
        _ => false,
    }
}

fn set_f64(field: &mut f64, value: &Value) -> bool {
    match value.as_float() {
        Some(f) => {
            *field = f;
            true
        }
        None => false,
    }
}

fn set_quantity(quantity: &mut Quantity, path: &[&str], value: &Value) -> bool {
    let (target, coerced) = match (path, value.as_count()) {
        (["min"], Some(n)) => (&mut quantity.min, n),
        (["max"], Some(n)) => (&mut quantity.max, n),
        _ => return false,
    };
    *target = coerced;
    true
}

fn set_criteria(criteria: &mut Criteria, path: &[&str], value: &Value) -> bool {
    match path {
        ["weight"] => set_f64(&mut criteria.weight, value),
        ["rolls"] => match value {
            Value::Null => {
                criteria.rolls = None;
                true
            }
            Value::Map(map) => {
                criteria.rolls = Some(RollBounds {
                    required: map.get("required").and_then(Value::as_count),
                    maximum: map.get("maximum").and_then(Value::as_count),
                });
                true
            }
            _ => false,
        },
        // the bounds themselves are only addressable once rolls exist
        ["rolls", "required"] => match (&mut criteria.rolls, value) {
            (Some(bounds), Value::Null) => {
                bounds.required = None;
                true
            }
            (Some(bounds), v) => match v.as_count() {
                Some(n) => {
                    bounds.required = Some(n);
                    true
                }
                None => false,
            },
            (None, _) => false,
        },
        ["rolls", "maximum"] => match (&mut criteria.rolls, value) {
            (Some(bounds), Value::Null) => {
                bounds.maximum = None;
                true
            }
            (Some(bounds), v) => match v.as_count() {
                Some(n) => {
                    bounds.maximum = Some(n);
                    true
                }
                None => false,
            },
            (None, _) => false,
        },
        _ => false,
    }
}

/// Walk a path through nested custom maps; intermediate segments must
/// already exist as maps, the terminal segment is inserted or overwritten
fn set_custom(map: &mut ValueMap, path: &[&str], value: Value) -> bool {
    match path {
        [] => false,
        [last] => {
            map.insert((*last).to_string(), value);
            true
        }
        [head, rest @ ..] => match map.get_mut(*head) {
            Some(Value::Map(inner)) => set_custom(inner, rest, value),
            _ => false,
        },
    }
}
