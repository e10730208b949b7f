//! Design state blobs
//!
//! Persistence is the embedding application's problem; this module only
//! turns a whole design into an opaque blob and back. Where the blob
//! lives (browser storage, a file, a database row) is not decided here.

use lootforge_core::Design;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Serialize a whole design to a JSON blob
pub fn save_design(design: &Design) -> Result<String> {
    Ok(serde_json::to_string_pretty(design)?)
}

/// Restore a design from a JSON blob
pub fn load_design(blob: &str) -> Result<Design> {
    Ok(serde_json::from_str(blob)?)
}

/// Write a design blob to a file
pub fn save_design_file(path: impl AsRef<Path>, design: &Design) -> Result<()> {
    fs::write(path, save_design(design)?)?;
    Ok(())
}

/// Read a design blob from a file
pub fn load_design_file(path: impl AsRef<Path>) -> Result<Design> {
    load_design(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootforge_core::{
        Criteria, EntryProps, EntryShape, ItemProps, LootRng, Quantity, TableProps,
    };

    fn sample_design() -> Design {
        let mut design = Design::new();
        let gold = design.create_item(ItemProps {
            name: Some("Gold Coin".into()),
            value: Some(1.0),
            ..ItemProps::default()
        });
        let chest = design.create_table(TableProps {
            name: Some("Chest".into()),
            ..TableProps::default()
        });
        design.add_entry(
            &chest,
            EntryShape::ItemRef,
            EntryProps {
                item: Some(gold),
                quantity: Some(Quantity { min: 1, max: 5 }),
                criteria: Some(Criteria::weighted(3.0)),
                ..EntryProps::default()
            },
        ).unwrap();
        design.add_entry(&chest, EntryShape::Placeholder, EntryProps::default()).unwrap();
        design.add_entry(
            &chest,
            EntryShape::TableInline,
            EntryProps {
                name: Some("Gem Pouch".into()),
                criteria: Some(Criteria::weighted(1.0)),
                ..EntryProps::default()
            },
        ).unwrap();
        design
    }

    #[test]
    fn test_round_trip_preserves_design() {
        let design = sample_design();
        let blob = save_design(&design).unwrap();
        let restored = load_design(&blob).unwrap();
        assert_eq!(restored, design);
    }

    #[test]
    fn test_restored_design_still_generates() {
        let design = sample_design();
        let restored = load_design(&save_design(&design).unwrap()).unwrap();

        let chest = design.tables.keys().next().unwrap().clone();
        let mut rng_a = LootRng::new(5);
        let mut rng_b = LootRng::new(5);
        let original = design.generate(&chest, 200, &mut rng_a, None);
        let reloaded = restored.generate(&chest, 200, &mut rng_b, None);
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_entry_wire_tags() {
        let design = sample_design();
        let blob = save_design(&design).unwrap();
        let json: serde_json::Value = serde_json::from_str(&blob).unwrap();

        let chest = design.tables.keys().next().unwrap();
        let loot = &json["tables"][chest.as_str()]["loot"];
        assert_eq!(loot[0]["type"], "item_id");
        assert_eq!(loot[1]["type"], "entry");
        assert_eq!(loot[2]["type"], "table_noid");
        // key counters restore with the blob, so new keys stay unique
        let mut restored = load_design(&blob).unwrap();
        let table = restored.tables.keys().next().unwrap().clone();
        let fresh = restored
            .add_entry(&table, EntryShape::Placeholder, EntryProps::default())
            .unwrap();
        let existing: Vec<String> = loot
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["key"].as_str().map(String::from))
            .collect();
        assert!(!existing.contains(&fresh.to_string()));
    }

    #[test]
    fn test_malformed_blob_is_an_error() {
        assert!(load_design("not a design").is_err());
    }
}
