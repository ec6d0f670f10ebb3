//! # Product Repository
//!
//! SQLite operations for the product catalog.
//!
//! ## Catalog Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │            GET /products?search=arroz&category=Alimentos        │
//! │                                                                 │
//! │  Page query:   WHERE active = 1 AND (search) AND (category)    │
//! │                ORDER BY name LIMIT ?  OFFSET ?                  │
//! │                                                                 │
//! │  Count query:  SELECT COUNT(*) with the SAME filter, no window  │
//! │                                                                 │
//! │  total_matching must come from the count query, never from the  │
//! │  page slice - a page window says nothing about the full set.    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Search compares a Rust-folded needle against the `*_search` shadow
//! columns, which hold [`search_key`] copies of name/code/barcode
//! maintained on every insert and update. SQLite's own `lower()` folds
//! only ASCII and would diverge from the in-memory predicate on
//! accented names. LIKE wildcards in the needle are escaped so the
//! match is a literal substring, same as the in-memory `contains`.

use sqlx::SqlitePool;
use tracing::debug;

use mercado_core::catalog::{search_key, total_pages};
use mercado_core::{CatalogPage, CatalogQuery, NewProduct, Product};

use crate::error::{DbError, DbResult};
use crate::store::{build_product, ProductStore};

/// Shared WHERE clause for the page and count queries. `?1` is the
/// escaped folded search term, `?2` the exact category; an empty
/// string disables the respective filter.
const CATALOG_FILTER: &str = "active = 1 \
     AND (?1 = '' \
          OR name_search LIKE '%' || ?1 || '%' ESCAPE '\\' \
          OR code_search LIKE '%' || ?1 || '%' ESCAPE '\\' \
          OR barcode_search LIKE '%' || ?1 || '%' ESCAPE '\\') \
     AND (?2 = '' OR category = ?2)";

/// Escapes LIKE wildcards so the search term matches literally, the
/// same way the in-memory substring check does.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }
}

impl ProductStore for ProductRepository {
    async fn find(&self, query: &CatalogQuery) -> DbResult<CatalogPage> {
        let query = query.clone().normalize();
        let needle = escape_like(&query.search_lower());

        debug!(
            search = %query.search,
            category = %query.category,
            page = query.page,
            page_size = query.page_size,
            "Catalog query"
        );

        let page_sql = format!(
            "SELECT id, code, name, category, price_cents, stock, barcode, unit, \
                    active, created_at, updated_at \
             FROM products \
             WHERE {CATALOG_FILTER} \
             ORDER BY name \
             LIMIT ?3 OFFSET ?4"
        );

        // Saturate rather than cast: a u64 offset past i64::MAX would
        // wrap negative, and SQLite reads a negative OFFSET as 0.
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

        let items: Vec<Product> = sqlx::query_as(&page_sql)
            .bind(&needle)
            .bind(&query.category)
            .bind(query.page_size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM products WHERE {CATALOG_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&needle)
            .bind(&query.category)
            .fetch_one(&self.pool)
            .await?;

        debug!(count = items.len(), total, "Catalog query returned");

        Ok(CatalogPage {
            items,
            total_matching: total as u64,
            page: query.page,
            total_pages: total_pages(total as u64, query.page_size),
        })
    }

    async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let product: Option<Product> = sqlx::query_as(
            "SELECT id, code, name, category, price_cents, stock, barcode, unit, \
                    active, created_at, updated_at \
             FROM products \
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn insert(&self, draft: NewProduct) -> DbResult<Product> {
        let product = build_product(draft);

        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                 id, code, name, category, price_cents, stock, \
                 barcode, unit, active, created_at, updated_at, \
                 name_search, code_search, barcode_search \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, \
                       ?12, ?13, ?14)",
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(product.active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(search_key(&product.name))
        .bind(search_key(&product.code))
        .bind(product.barcode.as_deref().map(search_key).unwrap_or_default())
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update(&self, id: &str, draft: NewProduct) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = chrono::Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 code = ?2, \
                 name = ?3, \
                 category = ?4, \
                 price_cents = ?5, \
                 stock = ?6, \
                 barcode = ?7, \
                 unit = ?8, \
                 updated_at = ?9, \
                 name_search = ?10, \
                 code_search = ?11, \
                 barcode_search = ?12 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.code)
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.price_cents)
        .bind(draft.stock)
        .bind(&draft.barcode)
        .bind(&draft.unit)
        .bind(now)
        .bind(search_key(&draft.name))
        .bind(search_key(&draft.code))
        .bind(draft.barcode.as_deref().map(search_key).unwrap_or_default())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    async fn soft_deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deactivating product");

        let now = chrono::Utc::now();

        let result = sqlx::query(
            "UPDATE products SET active = 0, updated_at = ?2 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM products \
             WHERE category IS NOT NULL AND active = 1 \
             ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}
