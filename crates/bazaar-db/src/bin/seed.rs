//! # Seed Data Generator
//!
//! Populates the database with test catalog data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p bazaar-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p bazaar-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p bazaar-db --bin seed -- --db ./data/bazaar.db
//! ```
//!
//! ## Generated Data
//! - Products across storefront categories (apparel, footwear, home,
//!   electronics accessories, grocery) with deterministic pseudo-random
//!   prices, weights, and occasional sale prices
//! - One inventory counter per product
//! - A handful of coupons covering the common rule shapes

use chrono::{Duration, Utc};
use std::env;
use uuid::Uuid;

use bazaar_core::{Coupon, DiscountType, InventoryCounter, Money, Product};
use bazaar_db::{Database, DbConfig};

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "APP",
        &[
            "Cotton Kurta",
            "Lawn Suit 3pc",
            "Khaddar Shawl",
            "Silk Dupatta",
            "Denim Jacket",
            "Polo Shirt",
            "Shalwar Kameez",
            "Winter Hoodie",
            "Embroidered Kurti",
            "Pashmina Stole",
        ],
    ),
    (
        "FTW",
        &[
            "Peshawari Chappal",
            "Khussa",
            "Running Trainers",
            "Leather Loafers",
            "Kolhapuri Sandal",
            "Canvas Sneakers",
        ],
    ),
    (
        "HOM",
        &[
            "Bed Sheet Set",
            "Ajrak Cushion Cover",
            "Blue Pottery Vase",
            "Sindhi Ralli Quilt",
            "Brass Serving Tray",
            "Onyx Bookends",
            "Camel Skin Lamp",
            "Wall Clock",
        ],
    ),
    (
        "ACC",
        &[
            "Power Bank 10000mAh",
            "Wireless Earbuds",
            "Phone Case",
            "USB-C Cable",
            "Laptop Sleeve",
            "Bluetooth Speaker",
        ],
    ),
    (
        "GRO",
        &[
            "Sella Basmati 5kg",
            "Desi Ghee 1kg",
            "Sukkur Dates Box",
            "Green Tea 100 Bags",
            "Himalayan Pink Salt",
            "Multani Sohan Halwa",
        ],
    ),
];

/// Size/variant suffixes with price addons in rupees
const VARIANTS: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 200),
    ("Large", 400),
    ("XL", 600),
    ("Standard", 0),
    ("Deluxe", 800),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./bazaar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
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
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./bazaar_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bazaar Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("* Connected to database");
    println!("* Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("! Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category_code, products)) in CATEGORIES.iter().enumerate() {
        for (product_idx, product_name) in products.iter().enumerate() {
            for (variant_idx, (variant_name, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + product_idx * 20 + variant_idx;
                let product =
                    generate_product(category_code, product_name, variant_name, *price_addon, seed);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.sku, e);
                    continue;
                }

                db.inventory()
                    .put(&InventoryCounter {
                        product_id: product.id.clone(),
                        quantity: (seed % 40) as i64,
                        low_stock_threshold: 5,
                        updated_at: Utc::now(),
                    })
                    .await?;

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    println!();
    println!("Seeding coupons...");
    for coupon in sample_coupons() {
        if let Err(e) = db.coupons().insert(&coupon).await {
            eprintln!("Failed to insert coupon {}: {}", coupon.code, e);
        } else {
            println!("  {}", coupon.code);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("* Generated {} products in {:?}", generated, elapsed);
    println!();
    println!("* Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(
    category: &str,
    name: &str,
    variant: &str,
    price_addon_rupees: i64,
    seed: usize,
) -> Product {
    let now = Utc::now();

    let compact: String = name.replace(' ', "");
    let prefix: String = compact.chars().take(3).collect::<String>().to_uppercase();
    let sku = format!("{}-{}-{:03}", category, prefix, seed);

    // Base price Rs 499 - Rs 4,499 plus the variant addon
    let base_rupees = 499 + ((seed * 37) % 4_000) as i64;
    let price = Money::from_rupees(base_rupees + price_addon_rupees);

    // Roughly a third of the catalog is on sale at 20% off
    let discounted = if seed % 3 == 0 {
        Some(price.percent_of(80).paisa())
    } else {
        None
    };

    // 200 g - 12 kg, so some carts cross the weight allowance
    let weight_grams = 200 + ((seed * 113) % 12_000) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        sku,
        name: format!("{} {}", name, variant),
        description: None,
        price_paisa: price.paisa(),
        discounted_price_paisa: discounted,
        weight_grams,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Coupons covering the rule shapes the validator handles.
fn sample_coupons() -> Vec<Coupon> {
    let now = Utc::now();

    let base = Coupon {
        id: String::new(),
        code: String::new(),
        discount_type: DiscountType::Percentage,
        discount_value: 0,
        min_order_paisa: None,
        max_discount_paisa: None,
        usage_limit: None,
        used_count: 0,
        starts_at: None,
        ends_at: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    vec![
        Coupon {
            id: Uuid::new_v4().to_string(),
            code: "EID10".to_string(),
            discount_value: 10,
            max_discount_paisa: Some(Money::from_rupees(1_000).paisa()),
            ends_at: Some(now + Duration::days(30)),
            ..base.clone()
        },
        Coupon {
            id: Uuid::new_v4().to_string(),
            code: "WELCOME500".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: Money::from_rupees(500).paisa(),
            min_order_paisa: Some(Money::from_rupees(2_500).paisa()),
            ..base.clone()
        },
        Coupon {
            id: Uuid::new_v4().to_string(),
            code: "FLASH25".to_string(),
            discount_value: 25,
            usage_limit: Some(100),
            starts_at: Some(now - Duration::days(1)),
            ends_at: Some(now + Duration::days(2)),
            ..base.clone()
        },
        Coupon {
            id: Uuid::new_v4().to_string(),
            code: "EXPIRED15".to_string(),
            discount_value: 15,
            ends_at: Some(now - Duration::days(7)),
            ..base
        },
    ]
}
