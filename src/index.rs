//! Recipe index: rows grouped by recipe name
//!
//! The resolver recurses once per craftable ingredient, so looking up "the
//! rows defining recipe X" happens constantly. Grouping once up front turns
//! each lookup from a full-table scan into an O(1) average map hit without
//! changing any output.

use indexmap::IndexMap;

use crate::models::IngredientRow;

/// Ingredient rows grouped by `recipe_name`, preserving original row order
/// within each group and first-appearance order across groups.
#[derive(Debug, Default)]
pub struct RecipeIndex {
    groups: IndexMap<String, Vec<IngredientRow>>,
}

impl RecipeIndex {
    /// Group a flat row table by recipe name. Pure and total: any input,
    /// including an empty table, produces a valid index.
    pub fn build(rows: Vec<IngredientRow>) -> Self {
        let mut groups: IndexMap<String, Vec<IngredientRow>> = IndexMap::new();
        for row in rows {
            groups.entry(row.recipe_name.clone()).or_default().push(row);
        }
        Self { groups }
    }

    /// Rows defining `name`, or `None` if the name is a raw material.
    pub fn rows_for(&self, name: &str) -> Option<&[IngredientRow]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Distinct recipe names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Category of a recipe, from its first row.
    pub fn category_of(&self, name: &str) -> Option<&str> {
        self.rows_for(name)
            .and_then(|rows| rows.first())
            .map(|row| row.category.as_str())
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = IndexMap::new();
        for rows in self.groups.values() {
            for row in rows {
                seen.entry(row.category.as_str()).or_insert(());
            }
        }
        seen.into_keys().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
