//! # Seed Data Generator
//!
//! Populates the database with demo items for development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 items (default)
//! cargo run -p bazaar-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p bazaar-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p bazaar-db --bin seed -- --db ./db/bazaar.db
//! ```
//!
//! ## Generated Items
//! Items cycle through the seeded subcategories (ids 1-6), so every
//! category/subcategory pair is consistent. Each item has:
//! - Title: `{name} #{n}` (kept within 20 characters)
//! - Price: $0.99 - $99.99
//! - Image: a placeholder filename (no file is written)

use bazaar_core::{html, Id, ItemDraft, Money};
use bazaar_db::{Database, DbConfig};
use std::env;

/// (subcategory_id, category_id, base names)
const CATALOG: &[(Id, Id, &[&str])] = &[
    (1, 1, &["Apples", "Mangoes", "Pears", "Plums"]),
    (2, 1, &["Goat cheese", "Butter", "Yogurt", "Cream"]),
    (3, 2, &["ThinkPad", "MacBook", "Chromebook"]),
    (4, 2, &["Pixel", "iPhone", "Nokia 3310"]),
    (5, 3, &["Dune", "Emma", "Ulysses", "Beloved"]),
    (6, 3, &["Cosmos", "Sapiens", "SICP"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./db/bazaar.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bazaar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./db/bazaar.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bazaar Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let mut conn = db.acquire().await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let categories = conn.references().categories().await?;
    if categories.is_empty() {
        return Err("reference data missing: no categories after migrations".into());
    }
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    println!("✓ Categories: {}", names.join(", "));

    let existing = conn.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let draft = generate_item(seed);
        if let Err(e) = conn.items().insert(&draft).await {
            eprintln!("Failed to insert {}: {}", draft.title, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Generated {} items in {:?}", generated, start.elapsed());

    let listed = conn
        .items()
        .list(&bazaar_core::filter::ListingQuery::unfiltered())
        .await?;
    println!("  Listing returns {} items", listed.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one demo item from the catalog.
fn generate_item(seed: usize) -> ItemDraft {
    let (subcategory_id, category_id, names) = CATALOG[seed % CATALOG.len()];
    let name = names[(seed / CATALOG.len()) % names.len()];

    let title = format!("{} #{}", name, seed + 1);
    let price = Money::from_cents(99 + ((seed * 731) % 9900) as i64);

    ItemDraft {
        title: html::escape(&title),
        description: html::escape(&format!("Demo listing for {}", name)),
        price,
        image: format!("seed_{:04}.png", seed + 1),
        category_id,
        subcategory_id,
    }
}
