//! Weighted sampling over nested tables
//!
//! Generation runs in two steps: [`sum_weights`] annotates a snapshot of
//! the root table with per-level weight totals, then each roll walks the
//! annotated tree with one cumulative-weight draw per level. Id-referenced
//! sub-tables are resolved and summed lazily at roll time against the
//! borrowed table collection, because shared tables can change between
//! generations and an entry never owns its target.
//!
//! Every failure mode - dangling reference, empty subtree, zero total
//! weight, placeholder hit - degrades to "this roll produced nothing".
//! The engine does not return errors.

use crate::identity::{EntryKey, ItemId, TableId};
use crate::item::Item;
use crate::rng::LootRng;
use crate::table::{EntryKind, Table};
use crate::value::ValueMap;
use indexmap::map::Entry as MapEntry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recursion ceiling for a single roll
///
/// The integrity checker keeps designs acyclic at edit time; this bound
/// turns a cycle smuggled in past it into void rolls instead of unbounded
/// recursion. Legitimate designs sit nowhere near it.
pub const MAX_ROLL_DEPTH: usize = 64;

/// A table snapshot annotated with summed weights
#[derive(Debug, Clone, PartialEq)]
pub struct SummedTable {
    /// Sum of direct entry weights at this level
    pub total_weight: f64,
    /// Rollable view of the direct entries, in loot order
    pub entries: Vec<SummedEntry>,
}

/// One rollable slot of a summed table
#[derive(Debug, Clone, PartialEq)]
pub struct SummedEntry {
    /// Effective weight (declared weight clamped to >= 0)
    pub weight: f64,
    /// What hitting this slot does
    pub outcome: Outcome,
}

/// What a rolled slot resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Placeholder: the roll is void
    Nothing,
    /// Grant a shared item, if the id is set and resolves
    ItemRef(Option<ItemId>),
    /// Grant the embedded item, keyed by the owning entry's key
    ItemInline(EntryKey, Item),
    /// Descend into a shared table, if the id is set and resolves
    TableRef(Option<TableId>),
    /// Descend into the embedded, already-summed subtree
    TableInline(SummedTable),
}

/// Annotate a table with per-level weight totals
///
/// Inline subtrees are summed recursively; an id-referenced table
/// contributes only its declared entry weight here - its internal weights
/// are summed on demand when a roll actually descends into it. The input
/// table is left untouched.
pub fn sum_weights(table: &Table) -> SummedTable {
    let entries: Vec<SummedEntry> = table
        .loot
        .iter()
        .map(|entry| {
            let outcome = match &entry.kind {
                EntryKind::Placeholder => Outcome::Nothing,
                EntryKind::ItemRef { id, .. } => Outcome::ItemRef(id.clone()),
                EntryKind::ItemInline { item, .. } => {
                    Outcome::ItemInline(entry.key.clone(), item.clone())
                }
                EntryKind::TableRef { id, .. } => Outcome::TableRef(id.clone()),
                EntryKind::TableInline { table, .. } => Outcome::TableInline(sum_weights(table)),
            };
            SummedEntry {
                // negative weights have no defined probability mass;
                // clamping keeps the cumulative walk total (NaN clamps too)
                weight: entry.weight().max(0.0),
                outcome,
            }
        })
        .collect();
    let total_weight = entries.iter().map(|e| e.weight).sum();
    SummedTable {
        total_weight,
        entries,
    }
}

/// One accumulated stack in a generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootStack {
    /// Item name snapshot at roll time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sprite snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Worth snapshot
    pub value: f64,
    /// Extension field snapshot
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub custom: ValueMap,
    /// How many rolls landed on this identity
    pub quantity: u64,
}

/// Accumulated result of one or more generation runs
///
/// Maps item identity to a field snapshot plus a quantity accumulator,
/// in first-drop order. Shared items accumulate under their `ItemId`, so
/// two entries referencing the same item merge; embedded items accumulate
/// under the owning entry's key, which is stable across rolls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Loot {
    stacks: IndexMap<String, LootStack>,
}

impl Loot {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct identities dropped
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Check if nothing has dropped
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Sum of all quantity accumulators
    pub fn total_quantity(&self) -> u64 {
        self.stacks.values().map(|s| s.quantity).sum()
    }

    /// Get one stack by identity key
    pub fn get(&self, key: &str) -> Option<&LootStack> {
        self.stacks.get(key)
    }

    /// Iterate stacks in first-drop order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LootStack)> {
        self.stacks.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Record one drop of `item` under `key`, inserting a fresh stack on
    /// first encounter
    pub fn grant(&mut self, key: impl Into<String>, item: &Item) {
        let stack = self.stacks.entry(key.into()).or_insert_with(|| LootStack {
            name: item.name.clone(),
            sprite: item.sprite.clone(),
            value: item.value,
            custom: item.custom.clone(),
            quantity: 0,
        });
        stack.quantity += 1;
    }

    /// Fold another result into this one by summing per-identity
    /// quantities
    ///
    /// Rolls are independent, so partial results from split generation
    /// runs merge without loss; the earlier snapshot wins on field
    /// conflicts.
    pub fn merge(&mut self, other: Loot) {
        for (key, stack) in other.stacks {
            match self.stacks.entry(key) {
                MapEntry::Occupied(mut occupied) => {
                    occupied.get_mut().quantity += stack.quantity;
                }
                MapEntry::Vacant(vacant) => {
                    vacant.insert(stack);
                }
            }
        }
    }
}

/// Perform one weighted roll down a summed table
///
/// Draws `r` uniformly in `[0, total_weight)` and walks the entries in
/// order, subtracting weights until the draw goes negative; the first
/// entry to cross wins (ties break toward earlier entries). Zero total
/// weight, a placeholder hit, or any resolution failure voids the roll.
pub fn roll_table(
    summed: &SummedTable,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    rng: &mut LootRng,
    loot: &mut Loot,
) {
    roll_at_depth(summed, tables, items, rng, loot, 0);
}

fn roll_at_depth(
    summed: &SummedTable,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    rng: &mut LootRng,
    loot: &mut Loot,
    depth: usize,
) {
    if depth >= MAX_ROLL_DEPTH || summed.total_weight <= 0.0 {
        return;
    }
    let mut draw = rng.next_f64() * summed.total_weight;
    for entry in &summed.entries {
        draw -= entry.weight;
        if draw < 0.0 {
            match &entry.outcome {
                Outcome::Nothing => {}
                Outcome::ItemRef(Some(id)) => {
                    if let Some(item) = items.get(id) {
                        loot.grant(id.as_str(), item);
                    }
                }
                Outcome::ItemRef(None) => {}
                Outcome::ItemInline(key, item) => loot.grant(key.as_str(), item),
                Outcome::TableRef(Some(id)) => {
                    if let Some(target) = tables.get(id) {
                        // summed fresh per descent: shared tables are
                        // mutable between generations and never embedded
                        let sub = sum_weights(target);
                        roll_at_depth(&sub, tables, items, rng, loot, depth + 1);
                    }
                }
                Outcome::TableRef(None) => {}
                Outcome::TableInline(sub) => {
                    roll_at_depth(sub, tables, items, rng, loot, depth + 1);
                }
            }
            return;
        }
    }
}

/// Generate loot by rolling a root table `rolls` times
///
/// Each roll is independent. Pass `existing` to keep accumulating into a
/// previous result instead of starting from zero.
pub fn generate_loot(
    root: &Table,
    tables: &IndexMap<TableId, Table>,
    items: &IndexMap<ItemId, Item>,
    rolls: u32,
    rng: &mut LootRng,
    existing: Option<Loot>,
) -> Loot {
    let summed = sum_weights(root);
    let mut loot = existing.unwrap_or_default();
    for _ in 0..rolls {
        roll_table(&summed, tables, items, rng, &mut loot);
    }
    loot
}
