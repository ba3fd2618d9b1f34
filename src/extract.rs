//! Dataset import for crafting recipe data
//!
//! Parses ingredient-row object literals out of the game wiki's exported
//! data modules (TypeScript/JavaScript arrays of row objects) and loads
//! them into the database.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use rusqlite::Connection;
use walkdir::WalkDir;

use crate::db;
use crate::models::IngredientRow;

/// Import statistics
#[derive(Debug, Default)]
pub struct ExtractStats {
    pub files_scanned: usize,
    pub rows_imported: usize,
    pub rows_skipped: usize,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Files scanned: {}", self.files_scanned)?;
        writeln!(f, "Rows imported: {}", self.rows_imported)?;
        write!(f, "Rows skipped:  {}", self.rows_skipped)
    }
}

/// Find dataset modules that likely hold recipe rows
pub fn find_dataset_files(source_dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_module = path
            .extension()
            .is_some_and(|ext| ext == "ts" || ext == "js");
        if is_module {
            let content = fs::read_to_string(path).unwrap_or_default();
            if content.contains("material") && content.contains("quantity") {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Parse every recipe-row object literal in one module's source.
///
/// Rows look like:
/// `{ category: '武器', name: '鉄の剣', price: '150G', cost: 50, material: '鉄鉱石', quantity: 3 }`
/// Field order varies; quotes may be single or double. Literals missing a
/// required field or carrying a non-positive quantity are counted as
/// skipped, never imported as zero.
pub fn parse_rows(content: &str, skipped: &mut usize) -> Result<Vec<IngredientRow>> {
    // Row literals never nest, so a brace-free body is the whole object.
    let literal_re = Regex::new(r"\{[^{}]*\}")?;
    let name_re = Regex::new(r#"name\s*:\s*['"]([^'"]*)['"]"#)?;
    let category_re = Regex::new(r#"category\s*:\s*['"]([^'"]*)['"]"#)?;
    let price_re = Regex::new(r#"price\s*:\s*['"]([^'"]*)['"]"#)?;
    let cost_re = Regex::new(r"cost\s*:\s*(\d+)")?;
    let material_re = Regex::new(r#"material\s*:\s*['"]([^'"]*)['"]"#)?;
    let quantity_re = Regex::new(r"quantity\s*:\s*(-?\d+)")?;

    let mut rows = Vec::new();
    for literal in literal_re.find_iter(content) {
        let body = literal.as_str();

        let name = name_re.captures(body).map(|c| c[1].to_string());
        let material = material_re.captures(body).map(|c| c[1].to_string());
        let quantity = quantity_re
            .captures(body)
            .and_then(|c| c[1].parse::<i64>().ok());

        let (Some(recipe_name), Some(material_name), Some(quantity)) = (name, material, quantity)
        else {
            *skipped += 1;
            continue;
        };
        let Ok(quantity) = u32::try_from(quantity) else {
            *skipped += 1;
            continue;
        };
        if quantity == 0 {
            *skipped += 1;
            continue;
        }

        rows.push(IngredientRow {
            recipe_name,
            category: category_re
                .captures(body)
                .map_or_else(|| "default".to_string(), |c| c[1].to_string()),
            price: price_re
                .captures(body)
                .map_or_else(String::new, |c| c[1].to_string()),
            cost: cost_re
                .captures(body)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0),
            material_name,
            quantity,
        });
    }

    Ok(rows)
}

/// Walk a source directory and import every recipe row found
pub fn extract_to_database(conn: &Connection, source_dir: &Path) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();

    let files = find_dataset_files(source_dir)?;
    for path in files {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        stats.files_scanned += 1;

        let rows = parse_rows(&content, &mut stats.rows_skipped)?;
        for row in &rows {
            db::insert_row(conn, row)?;
        }
        stats.rows_imported += rows.len();
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        export const recipes: Recipe[] = [
            { category: '武器', name: '鉄の剣', price: '150G', cost: 50, material: '鉄鉱石', quantity: 3 },
            { category: '武器', name: '鉄の剣', price: '150G', cost: 50, material: '木材', quantity: 1 },
            { category: '薬', name: 'ポーション', price: "30G", cost: 10, material: 'やくそう', quantity: 2 },
        ];
    "#;

    #[test]
    fn parses_row_literals() {
        let mut skipped = 0;
        let rows = parse_rows(SAMPLE, &mut skipped).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].recipe_name, "鉄の剣");
        assert_eq!(rows[0].material_name, "鉄鉱石");
        assert_eq!(rows[0].quantity, 3);
        assert_eq!(rows[0].cost, 50);
        assert_eq!(rows[2].category, "薬");
        assert_eq!(rows[2].price, "30G");
    }

    #[test]
    fn skips_incomplete_and_non_positive_rows() {
        let source = r#"
            { name: 'A', material: 'B', quantity: 1 },
            { name: 'NoMaterial', quantity: 4 },
            { name: 'Zero', material: 'C', quantity: 0 },
            { name: 'Negative', material: 'D', quantity: -2 },
        "#;
        let mut skipped = 0;
        let rows = parse_rows(source, &mut skipped).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recipe_name, "A");
        assert_eq!(skipped, 3);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let mut skipped = 0;
        let rows = parse_rows("{ name: 'A', material: 'B', quantity: 2 }", &mut skipped).unwrap();
        assert_eq!(rows[0].category, "default");
        assert_eq!(rows[0].price, "");
        assert_eq!(rows[0].cost, 0);
    }

    #[test]
    fn imports_from_directory_into_database() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("recipe.ts"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("unrelated.ts"), "export const x = 1;").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();

        let stats = extract_to_database(&conn, dir.path()).unwrap();
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.rows_imported, 3);

        let rows = db::load_rows(&conn).unwrap();
        assert_eq!(rows.len(), 3);
    }
}
