//! # Sale Repository
//!
//! SQLite operations for sales and line items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  1. REGISTER    insert() → sale row + item rows, ONE            │
//! │                 transaction (a sale without its items would     │
//! │                 corrupt every report)                           │
//! │                                                                 │
//! │  2. (OPTIONAL)  cancel() → status = cancelled, record stays     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unit prices are frozen on the item rows at sale time, so later
//! product price changes never rewrite history.

use sqlx::SqlitePool;
use tracing::debug;

use mercado_core::{NewSale, Sale, SaleItem, SaleStatus};

use crate::error::{DbError, DbResult};
use crate::store::build_sale;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Registers a sale: inserts the sale row and all line items in a
    /// single transaction. Totals are derived server-side in
    /// [`build_sale`].
    pub async fn insert(&self, draft: NewSale) -> DbResult<Sale> {
        let sale = build_sale(draft);

        debug!(
            id = %sale.id,
            receipt_number = %sale.receipt_number,
            items = sale.items.len(),
            "Inserting sale"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales ( \
                 id, receipt_number, client_id, driver, route, \
                 gross_total_cents, discount_cents, net_total_cents, \
                 payment_method, status, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&sale.id)
        .bind(&sale.receipt_number)
        .bind(&sale.client_id)
        .bind(&sale.driver)
        .bind(&sale.route)
        .bind(sale.gross_total_cents)
        .bind(sale.discount_cents)
        .bind(sale.net_total_cents)
        .bind(&sale.payment_method)
        .bind(sale.status)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &sale.items {
            sqlx::query(
                "INSERT INTO sale_items ( \
                     id, sale_id, product_id, quantity, \
                     unit_price_cents, subtotal_cents \
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(sale)
    }

    /// Lists all sales, newest first, with their line items.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let mut sales: Vec<Sale> = sqlx::query_as(
            "SELECT id, receipt_number, client_id, driver, route, \
                    gross_total_cents, discount_cents, net_total_cents, \
                    payment_method, status, created_at \
             FROM sales \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        for sale in &mut sales {
            sale.items = self.items_for(&sale.id).await?;
        }

        Ok(sales)
    }

    /// Fetches a sale by id with its line items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale: Option<Sale> = sqlx::query_as(
            "SELECT id, receipt_number, client_id, driver, route, \
                    gross_total_cents, discount_cents, net_total_cents, \
                    payment_method, status, created_at \
             FROM sales \
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match sale {
            Some(mut sale) => {
                sale.items = self.items_for(&sale.id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Cancels a sale. The record stays for reporting; only the status
    /// changes.
    pub async fn cancel(&self, id: &str) -> DbResult<Sale> {
        debug!(id = %id, "Cancelling sale");

        let result = sqlx::query("UPDATE sales SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(SaleStatus::Cancelled)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Line items of one sale, in insertion order.
    async fn items_for(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items: Vec<SaleItem> = sqlx::query_as(
            "SELECT id, sale_id, product_id, quantity, \
                    unit_price_cents, subtotal_cents \
             FROM sale_items \
             WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
