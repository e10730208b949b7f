//! Lootforge Core - nested loot tables and their engines
//!
//! This crate provides the data model and algorithms behind a loot-table
//! designer:
//! - Items, tables, and the five loot-entry shapes (`Item`, `Table`,
//!   `LootEntry`)
//! - A design-state container with generated keys (`Design`)
//! - Cycle-safe reference checking (`compatible_descendants`)
//! - Key- and path-addressed entry editing (`find_by_key`, `set_field`,
//!   `delete_by_key`, `create_sub_entry`)
//! - Weighted sampling with lazy cross-table resolution (`sum_weights`,
//!   `roll_table`, `generate_loot`)
//! - Stable multi-criteria result ordering (`sort_loot`)
//!
//! The core is synchronous and stateless: engines borrow the design
//! collections read-only for the duration of a call, and every failure
//! mode (dangling reference, missing key, malformed path) degrades
//! gracefully instead of erroring. Rendering, persistence transport, and
//! notifications belong to the embedding application.

mod design;
pub mod edit;
mod identity;
mod integrity;
mod item;
mod rng;
mod roll;
mod sort;
mod table;
mod value;

pub use design::Design;
pub use edit::{create_sub_entry, delete_by_key, find_by_key, find_by_key_mut, set_field};
pub use identity::{EntryKey, ItemId, TableId};
pub use integrity::compatible_descendants;
pub use item::{Item, ItemProps};
pub use rng::LootRng;
pub use roll::{
    generate_loot, roll_table, sum_weights, Loot, LootStack, Outcome, SummedEntry, SummedTable,
    MAX_ROLL_DEPTH,
};
pub use sort::{sort_loot, SortCriterion, SortDimension, SortOptions};
pub use table::{
    Criteria, EntryKind, EntryProps, EntryShape, LootEntry, Quantity, RollBounds, Table,
    TableProps,
};
pub use value::{Value, ValueMap};
