//! Multi-criteria ordering of generation results
//!
//! Sort configuration is data, not code: a set of named dimensions, each
//! owning criteria (direction, aggregation) the presentation layer can
//! cycle through. Exactly one dimension is selected at a time. Unknown
//! dimensions degrade to the input order instead of erroring, so a stale
//! configuration can never break result rendering.

use crate::roll::{Loot, LootStack};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One tunable parameter of a sort dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    /// Criterion name, e.g. `direction`
    pub name: String,
    /// Currently selected value
    pub selected: String,
    /// Values the presentation layer may offer
    pub values: Vec<String>,
}

impl SortCriterion {
    /// Create a criterion with its allowed values, selecting the first
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        let selected = values.first().cloned().unwrap_or_default();
        Self {
            name: name.into(),
            selected,
            values,
        }
    }
}

/// A sortable dimension and its criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDimension {
    /// Dimension name, e.g. `quantity`
    pub name: String,
    /// Ordered criteria parameterizing the comparator
    pub criteria: Vec<SortCriterion>,
}

impl SortDimension {
    /// Look up a criterion by name
    pub fn criterion(&self, name: &str) -> Option<&SortCriterion> {
        self.criteria.iter().find(|c| c.name == name)
    }
}

/// The full sort configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    /// Name of the selected dimension
    pub selected: String,
    /// All dimensions on offer
    pub options: Vec<SortDimension>,
}

impl SortOptions {
    /// Look up the selected dimension
    pub fn selected_dimension(&self) -> Option<&SortDimension> {
        self.options.iter().find(|d| d.name == self.selected)
    }

    /// Select a dimension by name (no-op if unknown)
    pub fn select(&mut self, name: &str) {
        if self.options.iter().any(|d| d.name == name) {
            self.selected = name.to_string();
        }
    }
}

impl Default for SortOptions {
    fn default() -> Self {
        let direction = || {
            SortCriterion::new(
                "direction",
                vec!["ascending".to_string(), "descending".to_string()],
            )
        };
        Self {
            selected: "name".to_string(),
            options: vec![
                SortDimension {
                    name: "name".to_string(),
                    criteria: vec![direction()],
                },
                SortDimension {
                    name: "quantity".to_string(),
                    criteria: vec![direction()],
                },
                SortDimension {
                    name: "value".to_string(),
                    criteria: vec![
                        direction(),
                        SortCriterion::new(
                            "summation",
                            vec!["individual".to_string(), "total".to_string()],
                        ),
                    ],
                },
            ],
        }
    }
}

/// Order a generation result by the selected dimension
///
/// Returns `(identity key, stack)` pairs. The sort is stable - equal keys
/// keep their first-drop order - and total, so repeated calls agree. An
/// unknown selected dimension, or one without a comparator, returns the
/// input order unchanged.
pub fn sort_loot(loot: &Loot, options: &SortOptions) -> Vec<(String, LootStack)> {
    let mut rows: Vec<(String, LootStack)> = loot
        .iter()
        .map(|(key, stack)| (key.to_string(), stack.clone()))
        .collect();

    let Some(dimension) = options.selected_dimension() else {
        return rows;
    };
    let descending = dimension
        .criterion("direction")
        .map(|c| c.selected == "descending")
        .unwrap_or(false);

    match dimension.name.as_str() {
        "name" => rows.sort_by(|a, b| {
            apply_direction(cmp_names(a, b), descending)
        }),
        "quantity" => rows.sort_by(|a, b| {
            apply_direction(a.1.quantity.cmp(&b.1.quantity), descending)
        }),
        "value" => {
            let per_stack = dimension
                .criterion("summation")
                .map(|c| c.selected == "total")
                .unwrap_or(false);
            rows.sort_by(|a, b| {
                let left = sort_value(&a.1, per_stack);
                let right = sort_value(&b.1, per_stack);
                apply_direction(left.total_cmp(&right), descending)
            });
        }
        _ => {}
    }
    rows
}

/// Compare by display name, falling back to the identity key, ignoring
/// case
fn cmp_names(a: &(String, LootStack), b: &(String, LootStack)) -> Ordering {
    let left = a.1.name.as_deref().unwrap_or(&a.0).to_lowercase();
    let right = b.1.name.as_deref().unwrap_or(&b.0).to_lowercase();
    left.cmp(&right)
}

fn sort_value(stack: &LootStack, per_stack: bool) -> f64 {
    if per_stack {
        stack.value * stack.quantity as f64
    } else {
        stack.value
    }
}

fn apply_direction(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::value::ValueMap;

    fn stacked(name: Option<&str>, value: f64, quantity: u64) -> LootStack {
        LootStack {
            name: name.map(String::from),
            sprite: None,
            value,
            custom: ValueMap::new(),
            quantity,
        }
    }

    fn loot_of(rows: Vec<(&str, LootStack)>) -> Loot {
        let mut loot = Loot::new();
        for (key, stack) in rows {
            let item = Item {
                name: stack.name.clone(),
                sprite: None,
                value: stack.value,
                custom: ValueMap::new(),
            };
            for _ in 0..stack.quantity {
                loot.grant(key, &item);
            }
        }
        loot
    }

    fn quantity_descending() -> SortOptions {
        let mut options = SortOptions::default();
        options.select("quantity");
        for dimension in &mut options.options {
            if dimension.name == "quantity" {
                dimension.criteria[0].selected = "descending".to_string();
            }
        }
        options
    }

    #[test]
    fn test_ties_keep_input_order() {
        let loot = loot_of(vec![
            ("a", stacked(None, 1.0, 8)),
            ("b", stacked(None, 1.0, 8)),
            ("c", stacked(None, 1.0, 5)),
        ]);
        let rows = sort_loot(&loot, &quantity_descending());
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_dimension_is_noop() {
        let loot = loot_of(vec![
            ("z", stacked(None, 1.0, 1)),
            ("a", stacked(None, 1.0, 9)),
        ]);
        let options = SortOptions {
            selected: "bogus".to_string(),
            ..SortOptions::default()
        };
        let rows = sort_loot(&loot, &options);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn test_name_falls_back_to_key() {
        let loot = loot_of(vec![
            ("zeta", stacked(None, 1.0, 1)),
            ("alpha", stacked(None, 1.0, 1)),
            ("m", stacked(Some("Bronze Bar"), 1.0, 1)),
        ]);
        let rows = sort_loot(&loot, &SortOptions::default());
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        // alpha < Bronze Bar < zeta, case-insensitively
        assert_eq!(keys, ["alpha", "m", "zeta"]);
    }

    #[test]
    fn test_value_individual_vs_total() {
        let loot = loot_of(vec![
            ("cheap_pile", stacked(Some("Copper"), 1.0, 100)),
            ("treasure", stacked(Some("Crown"), 50.0, 1)),
        ]);
        let mut options = SortOptions::default();
        options.select("value");
        for dimension in &mut options.options {
            if dimension.name == "value" {
                dimension.criteria[0].selected = "descending".to_string();
            }
        }

        // individual: unit worth decides, crown first
        let rows = sort_loot(&loot, &options);
        assert_eq!(rows[0].0, "treasure");

        // total: worth times quantity decides, pile first
        for dimension in &mut options.options {
            if dimension.name == "value" {
                dimension.criteria[1].selected = "total".to_string();
            }
        }
        let rows = sort_loot(&loot, &options);
        assert_eq!(rows[0].0, "cheap_pile");
    }

    #[test]
    fn test_sort_options_from_ron() {
        let options: SortOptions = ron::from_str(
            r#"(
                selected: "quantity",
                options: [
                    (
                        name: "quantity",
                        criteria: [
                            (
                                name: "direction",
                                selected: "descending",
                                values: ["ascending", "descending"],
                            ),
                        ],
                    ),
                ],
            )"#,
        )
        .unwrap();
        let loot = loot_of(vec![
            ("a", stacked(None, 1.0, 2)),
            ("b", stacked(None, 1.0, 7)),
        ]);
        let rows = sort_loot(&loot, &options);
        assert_eq!(rows[0].0, "b");
    }
}
