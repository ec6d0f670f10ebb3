//! # Domain Types
//!
//! Core domain types for the Mercado backend.
//!
//! ## Entities
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Product   catalog item, soft-deactivated instead of deleted  │
//! │  Client    store customer (CPF/CNPJ, address, phone)          │
//! │  Route     delivery route with driver and client names        │
//! │  Sale      completed transaction + line items                 │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a UUID v4 `id` assigned by the storage layer on
//! insert, plus a business key where one exists (product `code`,
//! sale `receipt_number`). The `New*` types carry caller-supplied
//! fields only; the store fills in id and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Default unit of measure for products without an explicit one.
pub const DEFAULT_UNIT: &str = "UN";

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code - unique, human-entered (e.g. "001").
    pub code: String,

    /// Display name.
    pub name: String,

    /// Optional category ("Alimentos", "Higiene", ...).
    pub category: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Stock quantity.
    pub stock: i64,

    /// Optional barcode (EAN-13 etc.).
    pub barcode: Option<String>,

    /// Unit of measure, defaults to "UN".
    pub unit: String,

    /// Whether the product is visible in catalog queries (soft delete).
    pub active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Caller-supplied product fields for insert and full-replacement update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub price_cents: i64,
    /// Defaults to 0 when absent on the wire.
    pub stock: i64,
    pub barcode: Option<String>,
    /// Defaults to [`DEFAULT_UNIT`] when absent on the wire.
    pub unit: String,
}

// =============================================================================
// Client
// =============================================================================

/// A store customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub name: String,
    /// CPF or CNPJ.
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied client fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Delivery Route
// =============================================================================

/// A delivery route: a driver and the clients visited on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRoute {
    pub id: String,
    pub name: String,
    pub driver: Option<String>,
    /// Client names on this route, in visit order.
    pub clients: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied route fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoute {
    pub name: String,
    pub driver: Option<String>,
    #[serde(default)]
    pub clients: Vec<String>,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale has been registered and finalized.
    Completed,
    /// Sale was cancelled after registration.
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Completed
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A registered sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    /// Receipt number printed for the customer.
    pub receipt_number: String,
    pub client_id: String,
    pub driver: Option<String>,
    pub route: Option<String>,
    /// Sum of line subtotals, before discount.
    pub gross_total_cents: i64,
    pub discount_cents: i64,
    /// Gross total minus discount.
    pub net_total_cents: i64,
    /// Free-form payment method string ("Dinheiro", "Pix", ...).
    pub payment_method: String,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    /// Line items; populated separately from the sale row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
}

/// A line item in a sale. Unit price is frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// Caller-supplied sale fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    /// Generated by the store when absent.
    pub receipt_number: Option<String>,
    pub client_id: String,
    pub driver: Option<String>,
    pub route: Option<String>,
    #[serde(default)]
    pub discount_cents: i64,
    pub payment_method: String,
    pub items: Vec<NewSaleItem>,
}

/// Caller-supplied line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl NewSaleItem {
    /// Line subtotal: unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

impl NewSale {
    /// Computes `(gross, net)` totals from the line items and discount.
    ///
    /// Totals are always derived server-side rather than trusted from
    /// the caller, so a sale can never be stored with inconsistent sums.
    pub fn totals(&self) -> (Money, Money) {
        let gross = self
            .items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.subtotal());
        let net = gross - Money::from_cents(self.discount_cents);
        (gross, net)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale_with_items() -> NewSale {
        NewSale {
            receipt_number: None,
            client_id: "c1".to_string(),
            driver: None,
            route: None,
            discount_cents: 100,
            payment_method: "Dinheiro".to_string(),
            items: vec![
                NewSaleItem {
                    product_id: "p1".to_string(),
                    quantity: 2,
                    unit_price_cents: 2590,
                },
                NewSaleItem {
                    product_id: "p2".to_string(),
                    quantity: 1,
                    unit_price_cents: 850,
                },
            ],
        }
    }

    #[test]
    fn test_sale_totals() {
        let (gross, net) = sale_with_items().totals();
        assert_eq!(gross.cents(), 2 * 2590 + 850);
        assert_eq!(net.cents(), gross.cents() - 100);
    }

    #[test]
    fn test_sale_totals_empty_items() {
        let mut sale = sale_with_items();
        sale.items.clear();
        sale.discount_cents = 0;
        let (gross, net) = sale.totals();
        assert!(gross.is_zero());
        assert!(net.is_zero());
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Completed);
    }

    #[test]
    fn test_sale_status_display() {
        assert_eq!(SaleStatus::Cancelled.to_string(), "cancelled");
    }
}
