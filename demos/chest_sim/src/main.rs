//! Chest Simulation Demo
//!
//! Builds a small loot design the way an editor would - shared items,
//! a shared gem table, a root chest table referencing both - then
//! generates loot, sorts the result, and prints the JSON export.

use lootforge_core::{
    sort_loot, Criteria, EntryProps, EntryShape, ItemProps, LootRng, Quantity, TableProps,
};
use lootforge_export::{export_table_string, ExportOptions};

fn main() {
    println!("=== Lootforge Chest Simulation ===\n");

    let mut design = lootforge_core::Design::new();

    // Shared items
    let gold = design.create_item(ItemProps {
        name: Some("Gold Coin".into()),
        value: Some(1.0),
        ..ItemProps::default()
    });
    let ruby = design.create_item(ItemProps {
        name: Some("Ruby".into()),
        value: Some(40.0),
        ..ItemProps::default()
    });
    let sapphire = design.create_item(ItemProps {
        name: Some("Sapphire".into()),
        value: Some(25.0),
        ..ItemProps::default()
    });

    // A shared gem table, referenced from the chest
    let gems = design.create_table(TableProps {
        name: Some("Gem Pile".into()),
        ..TableProps::default()
    });
    design.add_entry(
        &gems,
        EntryShape::ItemRef,
        EntryProps {
            item: Some(ruby),
            criteria: Some(Criteria::weighted(1.0)),
            ..EntryProps::default()
        },
    ).unwrap();
    design.add_entry(
        &gems,
        EntryShape::ItemRef,
        EntryProps {
            item: Some(sapphire),
            criteria: Some(Criteria::weighted(3.0)),
            ..EntryProps::default()
        },
    ).unwrap();

    // The root chest: common coins, a rare gem roll, an embedded junk
    // table no other design element shares
    let chest = design.create_table(TableProps {
        name: Some("Treasure Chest".into()),
        ..TableProps::default()
    });
    design.add_entry(
        &chest,
        EntryShape::ItemRef,
        EntryProps {
            item: Some(gold),
            quantity: Some(Quantity { min: 1, max: 10 }),
            criteria: Some(Criteria::weighted(10.0)),
            ..EntryProps::default()
        },
    ).unwrap();
    design.add_entry(
        &chest,
        EntryShape::TableRef,
        EntryProps {
            table: Some(gems.clone()),
            criteria: Some(Criteria::weighted(2.0)),
            ..EntryProps::default()
        },
    ).unwrap();
    design.add_entry(
        &chest,
        EntryShape::ItemInline,
        EntryProps {
            name: Some("Rusty Nail".into()),
            value: Some(0.1),
            criteria: Some(Criteria::weighted(4.0)),
            ..EntryProps::default()
        },
    ).unwrap();

    // The editor would only offer compatible reference targets; the gem
    // table cannot point back at the chest that contains it
    let safe_for_gems = design.compatible_tables(&gems);
    println!(
        "Tables the gem pile could safely reference: {:?}\n",
        safe_for_gems
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
    );

    // Generate
    let mut rng = LootRng::new(2024);
    let loot = design.generate(&chest, 1000, &mut rng, None);
    println!(
        "1000 rolls produced {} drops across {} stacks:",
        loot.total_quantity(),
        loot.len()
    );

    // Sort by quantity, descending
    let mut options = design.sort_options.clone();
    options.select("quantity");
    for dimension in &mut options.options {
        if dimension.name == "quantity" {
            dimension.criteria[0].selected = "descending".into();
        }
    }
    for (key, stack) in sort_loot(&loot, &options) {
        println!(
            "  {:>5} x {} (worth {:.1} each)",
            stack.quantity,
            stack.name.as_deref().unwrap_or(&key),
            stack.value,
        );
    }

    // Export the chest with references inlined
    let json = export_table_string(
        design.table(&chest).expect("chest exists"),
        &design.tables,
        &design.items,
        &ExportOptions::new().populate(),
    )
    .expect("export cannot fail on a fresh design");
    println!("\nPopulated JSON export of the chest:\n{}", json);
}
