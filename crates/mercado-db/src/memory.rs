//! # In-Memory Fallback Store
//!
//! Process-wide mutable tables standing in for persistent storage when
//! no database path is configured (development mode).
//!
//! Catalog semantics are canonicalized with the SQLite backend: soft
//! deactivate instead of removal, barcode included in search, results
//! ordered by name. The query path is
//! [`mercado_core::catalog::filter_and_page`], the same predicate the
//! contract tests hold the SQL path to.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use mercado_core::catalog::filter_and_page;
use mercado_core::{
    CatalogPage, CatalogQuery, Client, DeliveryRoute, NewClient, NewProduct, NewRoute, NewSale,
    Product, Sale, SaleStatus,
};

use crate::error::{DbError, DbResult};
use crate::store::{build_product, build_sale, new_id, ProductStore};

/// In-memory tables behind async read/write locks.
///
/// Cloning is cheap and shares the underlying tables, mirroring how a
/// cloned [`crate::pool::Database`] shares its pool.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<Vec<Product>>>,
    clients: Arc<RwLock<Vec<Client>>>,
    routes: Arc<RwLock<Vec<DeliveryRoute>>>,
    sales: Arc<RwLock<Vec<Sale>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    pub async fn list_clients(&self) -> DbResult<Vec<Client>> {
        Ok(self.clients.read().await.clone())
    }

    pub async fn create_client(&self, draft: NewClient) -> DbResult<Client> {
        let client = Client {
            id: new_id(),
            name: draft.name,
            tax_id: draft.tax_id,
            address: draft.address,
            phone: draft.phone,
            created_at: Utc::now(),
        };
        self.clients.write().await.push(client.clone());
        Ok(client)
    }

    // -------------------------------------------------------------------------
    // Delivery Routes
    // -------------------------------------------------------------------------

    pub async fn list_routes(&self) -> DbResult<Vec<DeliveryRoute>> {
        Ok(self.routes.read().await.clone())
    }

    pub async fn create_route(&self, draft: NewRoute) -> DbResult<DeliveryRoute> {
        let route = DeliveryRoute {
            id: new_id(),
            name: draft.name,
            driver: draft.driver,
            clients: draft.clients,
            created_at: Utc::now(),
        };
        self.routes.write().await.push(route.clone());
        Ok(route)
    }

    pub async fn get_route(&self, id: &str) -> DbResult<Option<DeliveryRoute>> {
        Ok(self
            .routes
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    pub async fn create_sale(&self, draft: NewSale) -> DbResult<Sale> {
        let sale = build_sale(draft);
        self.sales.write().await.push(sale.clone());
        Ok(sale)
    }

    /// Newest first, matching the SQL backend's `ORDER BY created_at DESC`.
    pub async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        let mut sales = self.sales.read().await.clone();
        sales.reverse();
        Ok(sales)
    }

    pub async fn get_sale(&self, id: &str) -> DbResult<Option<Sale>> {
        Ok(self.sales.read().await.iter().find(|s| s.id == id).cloned())
    }

    pub async fn cancel_sale(&self, id: &str) -> DbResult<Sale> {
        let mut sales = self.sales.write().await;
        let sale = sales
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DbError::not_found("Sale", id))?;
        sale.status = SaleStatus::Cancelled;
        Ok(sale.clone())
    }
}

impl ProductStore for MemoryStore {
    async fn find(&self, query: &CatalogQuery) -> DbResult<CatalogPage> {
        let products = self.products.read().await;
        let page = filter_and_page(&products, query);
        debug!(
            total = page.total_matching,
            page = page.page,
            "Memory catalog query"
        );
        Ok(page)
    }

    async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, draft: NewProduct) -> DbResult<Product> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.code == draft.code) {
            return Err(DbError::UniqueViolation {
                field: "products.code".to_string(),
            });
        }

        let product = build_product(draft);
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &str, draft: NewProduct) -> DbResult<Product> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("Product", id))?;

        product.code = draft.code;
        product.name = draft.name;
        product.category = draft.category;
        product.price_cents = draft.price_cents;
        product.stock = draft.stock;
        product.barcode = draft.barcode;
        product.unit = draft.unit;
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    async fn soft_deactivate(&self, id: &str) -> DbResult<()> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("Product", id))?;

        product.active = false;
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn categories(&self) -> DbResult<Vec<String>> {
        let products = self.products.read().await;
        let mut categories: Vec<String> = products
            .iter()
            .filter(|p| p.active)
            .filter_map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(code: &str, name: &str) -> NewProduct {
        NewProduct {
            code: code.to_string(),
            name: name.to_string(),
            category: None,
            price_cents: 1000,
            stock: 5,
            barcode: None,
            unit: "UN".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryStore::new();
        store.insert(draft("001", "Arroz")).await.unwrap();

        let err = store.insert(draft("001", "Outro")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_soft_deactivate_keeps_record() {
        let store = MemoryStore::new();
        let product = store.insert(draft("001", "Arroz")).await.unwrap();

        store.soft_deactivate(&product.id).await.unwrap();

        // Still reachable by id, but excluded from catalog queries.
        let fetched = store.get(&product.id).await.unwrap().unwrap();
        assert!(!fetched.active);
        let page = store.find(&CatalogQuery::default()).await.unwrap();
        assert_eq!(page.total_matching, 0);
    }

    #[tokio::test]
    async fn test_cancel_sale_flips_status() {
        let store = MemoryStore::new();
        let sale = store
            .create_sale(NewSale {
                receipt_number: None,
                client_id: "c1".to_string(),
                driver: None,
                route: None,
                discount_cents: 0,
                payment_method: "Dinheiro".to_string(),
                items: vec![],
            })
            .await
            .unwrap();
        assert_eq!(sale.status, SaleStatus::Completed);

        let cancelled = store.cancel_sale(&sale.id).await.unwrap();
        assert_eq!(cancelled.status, SaleStatus::Cancelled);

        let err = store.cancel_sale("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
