//! The complete design state
//!
//! One explicit container owns everything a loot design consists of:
//! shared items, shared tables, and the sort configuration. The engines
//! stay stateless and borrow from it; the presentation layer holds a
//! handle to it and swaps in mutated clones (copy-on-write at the call
//! site). Nothing in this crate keeps ambient or global state.

use crate::edit;
use crate::identity::{EntryKey, ItemId, TableId};
use crate::integrity;
use crate::item::{Item, ItemProps};
use crate::rng::LootRng;
use crate::roll::{self, Loot};
use crate::sort::SortOptions;
use crate::table::{EntryProps, EntryShape, LootEntry, Table, TableProps};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A loot design: shared collections plus sort configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Shared items by stable key
    pub items: IndexMap<ItemId, Item>,
    /// Shared tables by stable key
    pub tables: IndexMap<TableId, Table>,
    /// Result ordering configuration
    #[serde(default)]
    pub sort_options: SortOptions,
    /// Next generated-key counter
    #[serde(default)]
    next_key: u64,
}

impl Design {
    /// Create an empty design
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            tables: IndexMap::new(),
            sort_options: SortOptions::default(),
            next_key: 0,
        }
    }

    fn next_suffix(&mut self) -> u64 {
        let n = self.next_key;
        self.next_key += 1;
        n
    }

    /// Mint a key for a new loot entry
    pub fn next_entry_key(&mut self) -> EntryKey {
        EntryKey::new(format!("e{}", self.next_suffix()))
    }

    /// Create a shared item and return its generated key
    pub fn create_item(&mut self, props: ItemProps) -> ItemId {
        let id = ItemId::new(format!("i{}", self.next_suffix()));
        self.items.insert(id.clone(), Item::from_props(props));
        id
    }

    /// Create a shared table and return its generated key
    pub fn create_table(&mut self, props: TableProps) -> TableId {
        let id = TableId::new(format!("t{}", self.next_suffix()));
        self.tables.insert(id.clone(), Table::from_props(props));
        id
    }

    /// Get a shared item
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Get a shared table
    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.get(id)
    }

    /// Get a shared table mutably
    pub fn table_mut(&mut self, id: &TableId) -> Option<&mut Table> {
        self.tables.get_mut(id)
    }

    /// Remove a shared item by key
    ///
    /// References elsewhere are left dangling on purpose; they resolve to
    /// "not found" and degrade wherever they are consumed.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<Item> {
        self.items.shift_remove(id)
    }

    /// Remove a shared table by key (no cascade, same as items)
    pub fn remove_table(&mut self, id: &TableId) -> Option<Table> {
        self.tables.shift_remove(id)
    }

    /// Append a new entry of the given shape to a table's loot array
    ///
    /// Returns the generated entry key, or `None` when the table is
    /// unknown.
    pub fn add_entry(
        &mut self,
        table: &TableId,
        shape: EntryShape,
        props: EntryProps,
    ) -> Option<EntryKey> {
        if !self.tables.contains_key(table) {
            return None;
        }
        let key = self.next_entry_key();
        let entry = LootEntry::from_props(key.clone(), shape, props);
        self.tables.get_mut(table)?.loot.push(entry);
        Some(key)
    }

    /// Append a placeholder under an inline-table entry, addressed by key
    ///
    /// Returns the new entry's key, or `None` when the parent is unknown
    /// or not an inline table.
    pub fn add_sub_entry(&mut self, table: &TableId, parent: &EntryKey) -> Option<EntryKey> {
        if !self.tables.contains_key(table) {
            return None;
        }
        let key = self.next_entry_key();
        let loot = &mut self.tables.get_mut(table)?.loot;
        edit::create_sub_entry(parent, loot, key.clone()).then_some(key)
    }

    /// Tables that may safely be referenced from inside `target`
    pub fn compatible_tables(&self, target: &TableId) -> IndexSet<TableId> {
        integrity::compatible_descendants(target, &self.tables)
    }

    /// Generate loot from a shared table by key
    ///
    /// An unknown key yields an empty result (or `existing` unchanged).
    pub fn generate(
        &self,
        table: &TableId,
        rolls: u32,
        rng: &mut LootRng,
        existing: Option<Loot>,
    ) -> Loot {
        match self.tables.get(table) {
            Some(root) => {
                roll::generate_loot(root, &self.tables, &self.items, rolls, rng, existing)
            }
            None => existing.unwrap_or_default(),
        }
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
