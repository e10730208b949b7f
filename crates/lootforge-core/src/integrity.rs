//! Structural integrity checking for table references
//!
//! Shared tables reference each other by id, which makes cycles possible:
//! a table that (directly or through intermediaries) references itself
//! would never terminate under weight summation or sampling. The editor
//! prevents that proactively by only offering reference targets this
//! module certifies as safe.

use crate::identity::TableId;
use crate::table::{EntryKind, LootEntry, Table};
use indexmap::{IndexMap, IndexSet};

/// Tables that may safely become a `table_id` target inside `target`
///
/// Treats the table collection as a directed graph with an edge `A -> B`
/// whenever `A` (or any inline table embedded beneath `A`) holds an
/// id-reference to `B`. Everything reachable from `target` - including
/// `target` itself - would close a cycle if chosen, so the result is the
/// complement: all table keys minus the reachable set, in collection
/// order. Dangling references are simply not traversed.
pub fn compatible_descendants(
    target: &TableId,
    tables: &IndexMap<TableId, Table>,
) -> IndexSet<TableId> {
    let mut reachable: IndexSet<TableId> = IndexSet::new();
    reachable.insert(target.clone());

    let mut pending = vec![target.clone()];
    while let Some(id) = pending.pop() {
        let Some(table) = tables.get(&id) else {
            continue;
        };
        let mut targets = Vec::new();
        collect_ref_targets(&table.loot, &mut targets);
        for next in targets {
            // insert returns false for already-visited tables, which is
            // what bounds the traversal on diamond-shaped graphs
            if reachable.insert(next.clone()) {
                pending.push(next);
            }
        }
    }

    tables
        .keys()
        .filter(|id| !reachable.contains(*id))
        .cloned()
        .collect()
}

/// Collect every `table_id` target in a loot tree
///
/// Descends through inline tables (they belong to the containing table's
/// own structure) but never across an id edge - those are separate nodes
/// of the reference graph, handled by the caller's worklist.
fn collect_ref_targets(entries: &[LootEntry], out: &mut Vec<TableId>) {
    for entry in entries {
        match &entry.kind {
            EntryKind::TableRef { id: Some(id), .. } => out.push(id.clone()),
            EntryKind::TableInline { table, .. } => collect_ref_targets(&table.loot, out),
            EntryKind::TableRef { id: None, .. }
            | EntryKind::ItemRef { .. }
            | EntryKind::ItemInline { .. }
            | EntryKind::Placeholder => {}
        }
    }
}
