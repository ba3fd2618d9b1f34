//! Database schema and operations

use anyhow::Result;
use rusqlite::Connection;

use crate::error::DataError;
use crate::models::IngredientRow;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per (recipe, material) fact. The same pair may legally
        -- appear more than once; the resolver merges duplicates.
        CREATE TABLE IF NOT EXISTS ingredient_rows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_name TEXT NOT NULL,
            category TEXT NOT NULL,
            price TEXT NOT NULL,
            cost INTEGER NOT NULL,
            material_name TEXT NOT NULL,
            quantity INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ingredient_rows_recipe ON ingredient_rows(recipe_name);
        "#,
    )?;
    Ok(())
}

/// Insert an ingredient row
pub fn insert_row(conn: &Connection, row: &IngredientRow) -> Result<()> {
    conn.execute(
        "INSERT INTO ingredient_rows (recipe_name, category, price, cost, material_name, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &row.recipe_name,
            &row.category,
            &row.price,
            row.cost,
            &row.material_name,
            row.quantity,
        ),
    )?;
    Ok(())
}

/// Clear all stored rows (for re-import)
pub fn clear_rows(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM ingredient_rows", [])?;
    Ok(())
}

/// Load the full ingredient-row table in insertion order.
///
/// Validates the quantity constraint: a stored quantity that is not a
/// positive integer fails the whole load with a `DataError` naming the row.
pub fn load_rows(conn: &Connection) -> Result<Vec<IngredientRow>> {
    let mut stmt = conn.prepare(
        "SELECT recipe_name, category, price, cost, material_name, quantity
         FROM ingredient_rows ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, i64>(5)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (recipe_name, category, price, cost, material_name, quantity) = row?;
        let Some(quantity) = u32::try_from(quantity).ok().filter(|&q| q > 0) else {
            return Err(DataError::InvalidQuantity {
                recipe: recipe_name,
                material: material_name,
                quantity,
            }
            .into());
        };
        results.push(IngredientRow {
            recipe_name,
            category,
            price,
            cost,
            material_name,
            quantity,
        });
    }
    Ok(results)
}

/// List all distinct recipe names, in first-appearance order
pub fn list_recipe_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT recipe_name FROM ingredient_rows GROUP BY recipe_name ORDER BY MIN(id)",
    )?;

    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// List all distinct categories, in first-appearance order
pub fn list_categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT category FROM ingredient_rows GROUP BY category ORDER BY MIN(id)")?;

    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}
