//! # Seed Data Generator
//!
//! Populates the database with sample clients and products for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p mercado-db --bin seed
//!
//! # Specify database path
//! cargo run -p mercado-db --bin seed -- --db ./data/mercado.db
//! ```
//!
//! Skips seeding when the database already has clients, so it is safe
//! to run on every dev startup.

use std::env;

use mercado_core::{NewClient, NewProduct};
use mercado_db::{Database, DbConfig};

/// Sample clients: (name, tax_id, address, phone).
const CLIENTS: &[(&str, &str, &str, &str)] = &[
    ("João Silva", "123.456.789-00", "Rua A, 123", "(11) 98765-4321"),
    ("Maria Santos", "987.654.321-00", "Av. B, 456", "(11) 91234-5678"),
    ("Pedro Oliveira", "456.789.123-00", "Rua C, 789", "(11) 99876-5432"),
];

/// Sample products: (code, name, category, price_cents, stock, barcode).
const PRODUCTS: &[(&str, &str, &str, i64, i64, &str)] = &[
    ("001", "Arroz 5kg", "Alimentos", 2590, 100, "7891234567890"),
    ("002", "Feijão 1kg", "Alimentos", 850, 150, "7891234567891"),
    ("003", "Óleo de Soja 900ml", "Alimentos", 780, 80, "7891234567892"),
    ("004", "Açúcar 1kg", "Alimentos", 450, 120, "7891234567893"),
    ("005", "Café 500g", "Bebidas", 1290, 60, "7891234567894"),
    ("006", "Refrigerante 2L", "Bebidas", 890, 200, "7891234567895"),
    ("007", "Sabonete", "Higiene", 350, 300, "7891234567896"),
    ("008", "Detergente", "Limpeza", 290, 150, "7891234567897"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path().unwrap_or_else(|| "./mercado.db".to_string());

    println!("Seeding database at {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(db.pool())
        .await?;
    if existing > 0 {
        println!("Database already has data, skipping seed");
        return Ok(());
    }

    for (name, tax_id, address, phone) in CLIENTS {
        db.clients()
            .insert(NewClient {
                name: name.to_string(),
                tax_id: Some(tax_id.to_string()),
                address: Some(address.to_string()),
                phone: Some(phone.to_string()),
            })
            .await?;
    }
    println!("Inserted {} clients", CLIENTS.len());

    use mercado_db::ProductStore;
    for (code, name, category, price_cents, stock, barcode) in PRODUCTS {
        db.products()
            .insert(NewProduct {
                code: code.to_string(),
                name: name.to_string(),
                category: Some(category.to_string()),
                price_cents: *price_cents,
                stock: *stock,
                barcode: Some(barcode.to_string()),
                unit: "UN".to_string(),
            })
            .await?;
    }
    println!("Inserted {} products", PRODUCTS.len());

    println!("Seed complete");
    Ok(())
}

/// Reads `--db <path>` from the command line.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
