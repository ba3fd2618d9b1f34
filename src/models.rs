//! Data models for crafting recipes and materials

use serde::Serialize;

/// One fact from the source table: recipe X consumes `quantity` of `material_name`.
///
/// Several rows may share a `recipe_name` (one per material), and the same
/// (recipe, material) pair may appear more than once; duplicates are merged
/// by the resolver, not here.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientRow {
    pub recipe_name: String,
    pub category: String,
    pub price: String,
    pub cost: i64,
    pub material_name: String,
    pub quantity: u32,
}

/// A deduplicated (name, amount) pair in a resolved recipe's material list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Material {
    pub name: String,
    pub quantity: u32,
}

/// A fully resolved recipe node.
///
/// `materials` are the direct ingredients in first-seen order with duplicate
/// rows summed. `sub_recipes` holds one resolved tree per material that is
/// itself craftable and not already on the current resolution path.
/// `total_materials` flattens this node and every descendant: direct
/// quantities plus each sub-recipe's own totals, summed per material name.
/// A material consumed directly and also produced deeper down is counted
/// under both contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRecipe {
    pub name: String,
    pub category: String,
    pub price: String,
    pub cost: i64,
    pub materials: Vec<Material>,
    pub sub_recipes: Vec<ResolvedRecipe>,
    pub total_materials: Vec<Material>,
}
