//! # Seed Data Generator
//!
//! Populates a kiosk database with demo accounts, suppliers and products
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kiosk_dev.db
//! cargo run -p kiosk-db --bin seed
//!
//! # Specify database path
//! cargo run -p kiosk-db --bin seed -- --db ./data/kiosk.db
//!
//! # More logging
//! RUST_LOG=debug cargo run -p kiosk-db --bin seed
//! ```
//!
//! ## Generated Data
//! - `admin` / `admin` (admin) and `empleado` / `empleado` (employee)
//! - One supplier per catalogue section
//! - Every product with a starting stock of 20-60 units

use std::env;

use kiosk_core::{Money, NewProduct, NewUser, Role};
use kiosk_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Supplier name and the products it delivers, with prices as (pesos, centavos).
const CATALOGUE: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Distribuidora Bebidas Sur",
        &[
            ("Coca-Cola 500ml", 10, 0),
            ("Sprite 500ml", 9, 50),
            ("Agua mineral 500ml", 6, 0),
            ("Jugo de naranja 1L", 12, 50),
            ("Energizante 473ml", 18, 0),
        ],
    ),
    (
        "Golosinas del Centro",
        &[
            ("Alfajor simple", 2, 50),
            ("Alfajor triple", 4, 0),
            ("Chicles menta", 1, 50),
            ("Caramelos surtidos", 0, 75),
            ("Chocolate con leche 100g", 8, 25),
        ],
    ),
    (
        "Snacks Norte",
        &[
            ("Papas fritas 80g", 7, 0),
            ("Palitos salados", 4, 50),
            ("Galletitas dulces", 5, 25),
            ("Mani salado 120g", 6, 50),
        ],
    ),
    (
        "Tabaqueria Express",
        &[
            ("Encendedor", 3, 0),
            ("Papel para armar", 2, 0),
            ("Filtros", 1, 25),
        ],
    ),
];

const USERS: &[(&str, &str, Role)] = &[
    ("admin", "admin", Role::Admin),
    ("empleado", "empleado", Role::Employee),
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kiosk=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kiosk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kiosk POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kiosk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(database = %db_path, "Seeding kiosk database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (username, password, role) in USERS {
        let id = db
            .users()
            .create(&NewUser {
                username: username.to_string(),
                password: password.to_string(),
                role: *role,
            })
            .await?;
        info!(id, username = %username, role = role.as_str(), "User created");
    }

    let mut generated = 0;
    for (section_idx, (supplier, products)) in CATALOGUE.iter().enumerate() {
        let supplier_id = db.suppliers().create(supplier).await?;

        for (product_idx, (name, pesos, centavos)) in products.iter().enumerate() {
            let product = NewProduct {
                name: name.to_string(),
                supplier_id,
                quantity: starting_stock(section_idx * 10 + product_idx),
                unit_price_cents: Money::from_major_minor(*pesos, *centavos).cents(),
            };

            if let Err(e) = db.products().create(&product).await {
                warn!(product = %product.name, error = %e, "Failed to insert product");
                continue;
            }
            generated += 1;
        }
    }

    println!();
    println!("✓ Seeded {} users and {} products", USERS.len(), generated);
    println!("  Log in as admin/admin or empleado/empleado.");

    db.close().await;
    Ok(())
}

/// Deterministic stock in 20..=60 so reseeding gives the same shelf.
fn starting_stock(seed: usize) -> i64 {
    20 + ((seed * 37) % 41) as i64
}
