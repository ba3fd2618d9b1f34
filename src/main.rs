//! Crafting Recipe Calculator
//!
//! Resolves crafting recipes into material dependency trees: what a recipe
//! needs directly, which of those ingredients are themselves craftable, and
//! the flattened total materials across every nesting level.

mod db;
mod error;
mod extract;
mod filter;
mod index;
mod models;
mod resolver;

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::index::RecipeIndex;

#[derive(Parser)]
#[command(name = "craft-calculator")]
#[command(about = "Crafting recipe calculator: expands recipes into material trees")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "recipes.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import recipe rows from exported dataset modules (.ts/.js)
    Import {
        /// Path to the dataset source directory
        source_dir: PathBuf,

        /// Clear existing rows before import
        #[arg(long)]
        clear: bool,
    },

    /// Resolve one recipe into its full dependency tree
    Resolve {
        /// Recipe name to resolve
        name: String,

        /// Show the nested recipe tree, not just the totals
        #[arg(short, long)]
        verbose: bool,

        /// Emit the resolved tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve every recipe matching the filters
    ResolveAll {
        /// Keep recipes whose name contains this text (kana-folded)
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Keep recipes in this category ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Emit the resolved trees as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recipe names matching the filters
    ListRecipes {
        /// Keep recipes whose name contains this text (kana-folded)
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Keep recipes in this category ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// List all recipe categories
    ListCategories,

    /// Show the raw ingredient rows of one recipe
    Recipe {
        /// Recipe name
        name: String,
    },

    /// Initialize empty database with schema
    Init,

    /// Load sample data for testing (without a dataset export)
    LoadSample,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import { source_dir, clear } => {
            if clear {
                println!("Clearing existing rows...");
                db::clear_rows(&conn)?;
            }

            let stats = extract::extract_to_database(&conn, &source_dir)?;
            println!("\n{}", stats);
        }

        Commands::Resolve {
            name,
            verbose,
            json,
        } => {
            let index = load_index(&conn)?;

            match resolver::resolve(&name, &index, &mut HashSet::new()) {
                Some(recipe) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    } else {
                        if verbose {
                            println!("Recipe tree:\n");
                            println!("{}", resolver::format_recipe_tree(&recipe, 0));
                        }
                        println!("{}", resolver::summarize(&recipe));
                    }
                }
                None => println!("'{}' is not a craftable recipe", name),
            }
        }

        Commands::ResolveAll {
            filter,
            category,
            json,
        } => {
            let index = load_index(&conn)?;
            let names = filtered_names(&index, &filter, &category);

            let resolved = resolver::resolve_all(names, &index);
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else if resolved.is_empty() {
                println!("No recipes match. Run 'import' or 'load-sample' first.");
            } else {
                for recipe in &resolved {
                    println!("{}", resolver::format_recipe_tree(recipe, 0));
                }
            }
        }

        Commands::ListRecipes { filter, category } => {
            let index = load_index(&conn)?;
            let names = filtered_names(&index, &filter, &category);

            if names.is_empty() {
                println!("No recipes match. Run 'import' or 'load-sample' first.");
            } else {
                for name in names {
                    let cat = index.category_of(name).unwrap_or("default");
                    println!("{:<24} [{}]", name, cat);
                }
            }
        }

        Commands::ListCategories => {
            let categories = db::list_categories(&conn)?;
            if categories.is_empty() {
                println!("No categories. Run 'import' or 'load-sample' first.");
            } else {
                for category in categories {
                    println!("  {}", category);
                }
            }
        }

        Commands::Recipe { name } => {
            let index = load_index(&conn)?;
            match index.rows_for(&name) {
                Some(rows) => {
                    let first = &rows[0];
                    println!("Recipe: {}", first.recipe_name);
                    println!("  Category: {}", first.category);
                    println!("  Price: {}", first.price);
                    println!("  Cost: {}", first.cost);
                    println!("  Rows:");
                    for row in rows {
                        println!("    {} x{}", row.material_name, row.quantity);
                    }
                }
                None => println!("Recipe '{}' not found", name),
            }
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }
    }

    Ok(())
}

fn load_index(conn: &Connection) -> Result<RecipeIndex> {
    let rows = db::load_rows(conn)?;
    Ok(RecipeIndex::build(rows))
}

/// Names passing the name and category filters, in first-appearance order.
/// Filtering only selects which names get resolved; it never changes what a
/// resolution produces for a name that passes.
fn filtered_names<'a>(index: &'a RecipeIndex, text: &str, category: &str) -> Vec<&'a str> {
    index
        .names()
        .filter(|name| filter::name_matches(name, text))
        .filter(|name| {
            index
                .category_of(name)
                .is_some_and(|c| filter::category_matches(c, category))
        })
        .collect()
}

/// Load sample crafting recipes for testing without a dataset export
fn load_sample_data(conn: &Connection) -> Result<()> {
    use crate::models::IngredientRow;

    db::clear_rows(conn)?;

    let rows = [
        // 鉄の剣: 鉄のインゴット + 木材
        ("武器", "鉄の剣", "150G", 50, "鉄のインゴット", 2),
        ("武器", "鉄の剣", "150G", 50, "木材", 1),
        // 鉄のインゴット: 鉄鉱石
        ("素材", "鉄のインゴット", "40G", 15, "鉄鉱石", 3),
        // ポーション: やくそう + 水
        ("薬", "ポーション", "30G", 10, "やくそう", 2),
        ("薬", "ポーション", "30G", 10, "水", 1),
        // ハイポーション: ポーション + まほうそう
        ("薬", "ハイポーション", "120G", 45, "ポーション", 2),
        ("薬", "ハイポーション", "120G", 45, "まほうそう", 1),
        // 鉄の盾: 鉄のインゴット
        ("防具", "鉄の盾", "130G", 40, "鉄のインゴット", 3),
    ];

    for (category, name, price, cost, material, quantity) in rows {
        db::insert_row(
            conn,
            &IngredientRow {
                recipe_name: name.to_string(),
                category: category.to_string(),
                price: price.to_string(),
                cost,
                material_name: material.to_string(),
                quantity,
            },
        )?;
    }

    println!("Loaded {} sample rows", 8);
    Ok(())
}
