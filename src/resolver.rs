//! Recipe resolution logic

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::index::RecipeIndex;
use crate::models::{Material, ResolvedRecipe};

/// Resolve a recipe name into its full dependency tree.
///
/// Returns `None` when `name` has no defining rows (a raw material, the
/// normal leaf case) or is already being resolved by an ancestor call on
/// this path (a cycle, truncated here rather than recursing forever).
///
/// `visited` is shared down the recursion: once a name is added it blocks
/// re-expansion everywhere below that point for the rest of this top-level
/// resolution. Totals along a cyclic path therefore under-count the cyclic
/// contribution past its first occurrence; the parent still records the
/// required quantity, it just has no expandable sub-recipe. Callers start
/// each independent resolution with a fresh set.
pub fn resolve(
    name: &str,
    index: &RecipeIndex,
    visited: &mut HashSet<String>,
) -> Option<ResolvedRecipe> {
    if visited.contains(name) {
        return None;
    }

    let rows = index.rows_for(name)?;
    visited.insert(name.to_string());

    // Merge duplicate (recipe, material) rows, keeping first-seen order.
    let mut merged: IndexMap<&str, u32> = IndexMap::new();
    for row in rows {
        *merged.entry(row.material_name.as_str()).or_insert(0) += row.quantity;
    }
    let materials: Vec<Material> = merged
        .into_iter()
        .map(|(name, quantity)| Material {
            name: name.to_string(),
            quantity,
        })
        .collect();

    // Recipe-level fields come from the first row; rows sharing a recipe
    // name are assumed to agree, and the first one wins if they don't.
    let first = &rows[0];

    let sub_recipes: Vec<ResolvedRecipe> = materials
        .iter()
        .filter_map(|material| resolve(&material.name, index, visited))
        .collect();

    let total_materials = total_materials(&materials, &sub_recipes);

    Some(ResolvedRecipe {
        name: first.recipe_name.clone(),
        category: first.category.clone(),
        price: first.price.clone(),
        cost: first.cost,
        materials,
        sub_recipes,
        total_materials,
    })
}

/// Sum direct materials with every sub-recipe's (already recursive) totals,
/// per material name, in first-seen order across the merge.
fn total_materials(materials: &[Material], sub_recipes: &[ResolvedRecipe]) -> Vec<Material> {
    let mut totals: IndexMap<&str, u32> = IndexMap::new();
    for material in materials {
        *totals.entry(material.name.as_str()).or_insert(0) += material.quantity;
    }
    for sub in sub_recipes {
        for material in &sub.total_materials {
            *totals.entry(material.name.as_str()).or_insert(0) += material.quantity;
        }
    }
    totals
        .into_iter()
        .map(|(name, quantity)| Material {
            name: name.to_string(),
            quantity,
        })
        .collect()
}

/// Resolve each requested name independently, skipping names that do not
/// resolve. Every top-level call gets its own visited set, so the same
/// recipe can appear as a sub-recipe under several unrelated roots.
pub fn resolve_all<'a, I>(names: I, index: &RecipeIndex) -> Vec<ResolvedRecipe>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| resolve(name, index, &mut HashSet::new()))
        .collect()
}

/// Format a resolved recipe tree as a readable string
pub fn format_recipe_tree(recipe: &ResolvedRecipe, indent: usize) -> String {
    let mut output = String::new();
    let prefix = "  ".repeat(indent);

    output.push_str(&format!(
        "{}{} [{}] price {} / cost {}\n",
        prefix, recipe.name, recipe.category, recipe.price, recipe.cost
    ));
    for material in &recipe.materials {
        output.push_str(&format!(
            "{}  needs {} x{}\n",
            prefix, material.name, material.quantity
        ));
    }
    for sub in &recipe.sub_recipes {
        output.push_str(&format_recipe_tree(sub, indent + 2));
    }

    output
}

/// Summary of one resolution: what to gather, all nesting levels flattened
#[derive(Debug)]
pub struct RecipeSummary {
    pub name: String,
    pub price: String,
    pub cost: i64,
    pub total_materials: Vec<Material>,
}

pub fn summarize(recipe: &ResolvedRecipe) -> RecipeSummary {
    RecipeSummary {
        name: recipe.name.clone(),
        price: recipe.price.clone(),
        cost: recipe.cost,
        total_materials: recipe.total_materials.clone(),
    }
}

impl std::fmt::Display for RecipeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        writeln!(f, "Price: {}  Cost: {}", self.price, self.cost)?;
        writeln!(f)?;
        writeln!(f, "Total materials required:")?;
        for material in &self.total_materials {
            writeln!(f, "  {} x{}", material.name, material.quantity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientRow;

    fn row(recipe: &str, material: &str, quantity: u32) -> IngredientRow {
        IngredientRow {
            recipe_name: recipe.to_string(),
            category: "default".to_string(),
            price: "100G".to_string(),
            cost: 10,
            material_name: material.to_string(),
            quantity,
        }
    }

    fn index(rows: Vec<IngredientRow>) -> RecipeIndex {
        RecipeIndex::build(rows)
    }

    fn material(name: &str, quantity: u32) -> Material {
        Material {
            name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn leaf_recipe_resolves_with_no_sub_recipes() {
        let index = index(vec![row("Potion", "Herb", 1)]);

        let potion = resolve("Potion", &index, &mut HashSet::new()).unwrap();
        assert_eq!(potion.materials, vec![material("Herb", 1)]);
        assert!(potion.sub_recipes.is_empty());
        assert_eq!(potion.total_materials, vec![material("Herb", 1)]);
    }

    #[test]
    fn raw_material_resolves_to_none() {
        let index = index(vec![row("Potion", "Herb", 1)]);
        assert!(resolve("Herb", &index, &mut HashSet::new()).is_none());
    }

    #[test]
    fn duplicate_material_rows_merge_by_summing() {
        let index = index(vec![row("X", "M", 2), row("X", "M", 3)]);

        let x = resolve("X", &index, &mut HashSet::new()).unwrap();
        assert_eq!(x.materials, vec![material("M", 5)]);
    }

    #[test]
    fn direct_materials_keep_first_seen_order() {
        let index = index(vec![
            row("Sword", "Iron", 3),
            row("Sword", "Wood", 1),
            row("Sword", "Iron", 2),
        ]);

        let sword = resolve("Sword", &index, &mut HashSet::new()).unwrap();
        assert_eq!(
            sword.materials,
            vec![material("Iron", 5), material("Wood", 1)]
        );
    }

    #[test]
    fn totals_keep_direct_entry_alongside_expansion() {
        // Sword needs 2 Ingot; Ingot needs 4 Ore. The Ingot entry is not
        // replaced by its expansion, both names appear in the totals.
        let index = index(vec![row("Sword", "Ingot", 2), row("Ingot", "Ore", 4)]);

        let sword = resolve("Sword", &index, &mut HashSet::new()).unwrap();
        assert_eq!(sword.sub_recipes.len(), 1);
        assert_eq!(
            sword.total_materials,
            vec![material("Ingot", 2), material("Ore", 4)]
        );
    }

    #[test]
    fn totals_sum_recursively_across_levels() {
        // A -> 1 B, 2 C; B -> 3 C; C -> 5 D
        let index = index(vec![
            row("A", "B", 1),
            row("A", "C", 2),
            row("B", "C", 3),
            row("C", "D", 5),
        ]);

        let a = resolve("A", &index, &mut HashSet::new()).unwrap();
        // C expands under B, so B's totals are C:3, D:5. By the time A's
        // own C material recurses, C is already visited and A gains no
        // second C subtree; its totals are direct B:1, C:2 plus B's totals.
        assert_eq!(
            a.total_materials,
            vec![material("B", 1), material("C", 5), material("D", 5)]
        );
    }

    #[test]
    fn cycle_truncates_repeated_branch() {
        let index = index(vec![row("A", "B", 1), row("B", "A", 1)]);

        let a = resolve("A", &index, &mut HashSet::new()).unwrap();
        assert_eq!(a.materials, vec![material("B", 1)]);
        assert_eq!(a.sub_recipes.len(), 1);

        let b = &a.sub_recipes[0];
        assert_eq!(b.materials, vec![material("A", 1)]);
        assert!(b.sub_recipes.is_empty());
        assert_eq!(b.total_materials, vec![material("A", 1)]);

        assert_eq!(
            a.total_materials,
            vec![material("B", 1), material("A", 1)]
        );
    }

    #[test]
    fn self_referential_recipe_terminates() {
        let index = index(vec![row("A", "A", 2)]);

        let a = resolve("A", &index, &mut HashSet::new()).unwrap();
        assert_eq!(a.materials, vec![material("A", 2)]);
        assert!(a.sub_recipes.is_empty());
    }

    #[test]
    fn resolution_is_deterministic() {
        let index = index(vec![
            row("Sword", "Ingot", 2),
            row("Ingot", "Ore", 4),
            row("Sword", "Wood", 1),
        ]);

        let first = resolve("Sword", &index, &mut HashSet::new()).unwrap();
        let second = resolve("Sword", &index, &mut HashSet::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn first_row_wins_for_recipe_fields() {
        let mut cheap = row("Sword", "Iron", 3);
        cheap.price = "100G".to_string();
        cheap.cost = 10;
        let mut dear = row("Sword", "Wood", 1);
        dear.price = "999G".to_string();
        dear.cost = 99;

        let index = index(vec![cheap, dear]);
        let sword = resolve("Sword", &index, &mut HashSet::new()).unwrap();
        assert_eq!(sword.price, "100G");
        assert_eq!(sword.cost, 10);
    }

    #[test]
    fn independent_roots_each_expand_shared_dependency() {
        // Sword and Shield both need Ingot; resolving one must not stop
        // the other from expanding Ingot.
        let index = index(vec![
            row("Sword", "Ingot", 2),
            row("Shield", "Ingot", 1),
            row("Ingot", "Ore", 4),
        ]);

        let all = resolve_all(["Sword", "Shield"], &index);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sub_recipes.len(), 1);
        assert_eq!(all[1].sub_recipes.len(), 1);
        assert_eq!(all[1].total_materials, vec![material("Ingot", 1), material("Ore", 4)]);
    }

    #[test]
    fn resolve_all_skips_unresolvable_names() {
        let index = index(vec![row("Potion", "Herb", 1)]);
        let all = resolve_all(["Potion", "Herb", "Nothing"], &index);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Potion");
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let index = index(Vec::new());
        assert!(resolve("Anything", &index, &mut HashSet::new()).is_none());
    }
}
