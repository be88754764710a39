//! # Seed Inventory Generator
//!
//! Writes a demo inventory file for development and replay testing.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p stockscan-store --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockscan-store --bin seed -- --count 1000
//!
//! # Specify file path
//! cargo run -p stockscan-store --bin seed -- --file ./data/inventory.csv
//! ```
//!
//! ## Generated Products
//! Each product has:
//! - EAN-13 barcode in the GS1 in-store range (`200…`) with a valid check digit
//! - Name from a small category list plus a size
//! - Price: $1.99 - $9.99 plus a size addon
//! - Stock: 0 - 100

use std::env;
use std::process::ExitCode;

use stockscan_core::validation::gtin_check_digit;
use stockscan_core::{InventoryRecord, Money};
use stockscan_store::{InventoryStore, StoreConfig, DEFAULT_INVENTORY_FILE};

/// Product names by category.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Cola",
            "Lemon Soda",
            "Orange Juice",
            "Apple Juice",
            "Sparkling Water",
            "Iced Tea",
            "Energy Drink",
            "Cold Brew",
        ],
    ),
    (
        "Snacks",
        &[
            "Potato Chips",
            "Tortilla Chips",
            "Pretzels",
            "Salted Peanuts",
            "Chocolate Bar",
            "Gummy Bears",
            "Oat Cookies",
            "Popcorn",
        ],
    ),
    (
        "Dairy",
        &[
            "Whole Milk",
            "Oat Milk",
            "Cheddar",
            "Mozzarella",
            "Greek Yogurt",
            "Butter",
            "Cream Cheese",
            "Eggs",
        ],
    ),
    (
        "Grocery",
        &[
            "White Bread",
            "Spaghetti",
            "Basmati Rice",
            "Canned Beans",
            "Tomato Sauce",
            "Peanut Butter",
            "Honey",
            "Cereal",
        ],
    ),
];

/// Size suffixes with price addons in cents.
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Regular", 50), ("Large", 150), ("Family", 300)];

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut file = String::from(DEFAULT_INVENTORY_FILE);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    file = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("stockscan Seed Inventory Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>     Number of products to generate (default: 200)");
                println!("  -f, --file <PATH>   Inventory file path (default: {DEFAULT_INVENTORY_FILE})");
                println!("  -h, --help          Show this help message");
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
        i += 1;
    }

    println!("stockscan Seed Inventory Generator");
    println!("==================================");
    println!("File:     {}", file);
    println!("Products: {}", count);
    println!();

    let mut store = match InventoryStore::open(StoreConfig::new(&file)) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    if !store.is_empty() {
        println!("⚠ Inventory already has {} products", store.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the file to regenerate.");
        return ExitCode::SUCCESS;
    }

    let max = CATEGORIES
        .iter()
        .map(|(_, names)| names.len())
        .sum::<usize>()
        * SIZES.len();
    if count > max {
        println!("⚠ Only {} distinct products available, generating {}", max, max);
    }

    let mut generated = 0;
    let products = CATEGORIES
        .iter()
        .flat_map(|(_, names)| names.iter())
        .flat_map(|name| SIZES.iter().map(move |size| (*name, *size)));

    for (seed, (name, (size, addon))) in products.enumerate().take(count) {
        let record = generate_product(name, size, addon, seed);
        if let Err(e) = store.insert(record) {
            eprintln!("Failed to insert product {}: {}", seed, e);
            continue;
        }
        generated += 1;
    }

    if let Err(e) = store.persist() {
        eprintln!("✗ {e}");
        return ExitCode::FAILURE;
    }

    println!("✓ Generated {} products", generated);
    println!("✓ Saved to {}", store.path().display());
    ExitCode::SUCCESS
}

/// Generates a single product from a deterministic seed.
fn generate_product(name: &str, size: &str, price_addon: i64, seed: usize) -> InventoryRecord {
    let body = format!("200{:09}", seed);
    let check = gtin_check_digit(&body).unwrap_or(0);
    let code = format!("{body}{check}");

    // $1.99 - $9.99 plus size addon
    let price = Money::from_cents(199 + ((seed * 17) % 800) as i64 + price_addon);
    let stock = (seed % 101) as u64;

    InventoryRecord::new(code, format!("{name} {size}"), price, stock)
}
