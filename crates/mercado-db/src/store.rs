//! # Storage Abstraction
//!
//! The single seam between the API layer and the two storage backends.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │              Store (enum, picked once at startup)             │
//! │                          │                                    │
//! │        ┌─────────────────┴──────────────────┐                 │
//! │        ▼                                    ▼                 │
//! │  Store::Sqlite(Database)          Store::Memory(MemoryStore)  │
//! │  sqlx repositories                RwLock<Vec<_>> tables       │
//! │        │                                    │                 │
//! │        └───── both implement ProductStore ──┘                 │
//! │               and share one contract-test suite               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The original deployment decides per-process: with a database path
//! configured it uses SQLite, otherwise the in-memory fallback. Both
//! backends get identical catalog semantics (soft deactivate, barcode
//! search, name ordering) so a fallback deployment behaves like a
//! persistent one minus durability.

use chrono::Utc;
use uuid::Uuid;

use mercado_core::{
    CatalogPage, CatalogQuery, Client, DeliveryRoute, NewClient, NewProduct, NewRoute, NewSale,
    Product, Sale, SaleItem, SaleStatus,
};

use crate::error::DbResult;
use crate::memory::MemoryStore;
use crate::pool::Database;

// =============================================================================
// Product Store Trait
// =============================================================================

/// Capability set of the product catalog storage.
///
/// Implemented by [`crate::repository::product::ProductRepository`]
/// (SQLite) and [`MemoryStore`] (fallback). Anything generic over this
/// trait — most importantly the contract tests — runs identically
/// against both.
#[allow(async_fn_in_trait)]
pub trait ProductStore {
    /// Filters, sorts, and pages the catalog. `total_matching` reflects
    /// the full filtered set, independent of the page window.
    async fn find(&self, query: &CatalogQuery) -> DbResult<CatalogPage>;

    /// Fetches a product by id, including soft-deactivated ones.
    async fn get(&self, id: &str) -> DbResult<Option<Product>>;

    /// Inserts a new product; the store assigns id and timestamps.
    async fn insert(&self, draft: NewProduct) -> DbResult<Product>;

    /// Full field replacement of an existing product. The active flag
    /// is not touched.
    async fn update(&self, id: &str, draft: NewProduct) -> DbResult<Product>;

    /// Marks a product inactive so it disappears from catalog queries
    /// while historical sales keep referencing it.
    async fn soft_deactivate(&self, id: &str) -> DbResult<()>;

    /// Distinct, sorted categories of active products.
    async fn categories(&self) -> DbResult<Vec<String>>;
}

// =============================================================================
// Shared Constructors
// =============================================================================

/// Generates a new entity id.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds a full product record from a caller-supplied draft.
///
/// Lives here so both backends assign ids, timestamps, and the active
/// flag identically.
pub(crate) fn build_product(draft: NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id: new_id(),
        code: draft.code,
        name: draft.name,
        category: draft.category,
        price_cents: draft.price_cents,
        stock: draft.stock,
        barcode: draft.barcode,
        unit: draft.unit,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a full sale record from a caller-supplied draft, deriving
/// totals server-side and generating a receipt number when absent.
pub(crate) fn build_sale(draft: NewSale) -> Sale {
    let (gross, net) = draft.totals();
    let sale_id = new_id();
    let receipt_number = draft
        .receipt_number
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(generate_receipt_number);

    let items: Vec<SaleItem> = draft
        .items
        .iter()
        .map(|item| SaleItem {
            id: new_id(),
            sale_id: sale_id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            subtotal_cents: item.subtotal().cents(),
        })
        .collect();

    Sale {
        id: sale_id,
        receipt_number,
        client_id: draft.client_id,
        driver: draft.driver,
        route: draft.route,
        gross_total_cents: gross.cents(),
        discount_cents: draft.discount_cents,
        net_total_cents: net.cents(),
        payment_method: draft.payment_method,
        status: SaleStatus::Completed,
        created_at: Utc::now(),
        items,
    }
}

/// Receipt numbers are time-prefixed so they sort chronologically on
/// printed reports.
fn generate_receipt_number() -> String {
    format!("REC-{}", Utc::now().format("%Y%m%d%H%M%S%3f"))
}

// =============================================================================
// Store
// =============================================================================

/// The process-wide storage backend, selected once at startup.
#[derive(Debug, Clone)]
pub enum Store {
    /// Persistent SQLite backend.
    Sqlite(Database),
    /// In-memory fallback, used when no database path is configured.
    Memory(MemoryStore),
}

impl Store {
    /// Creates an empty in-memory store.
    pub fn in_memory() -> Self {
        Store::Memory(MemoryStore::new())
    }

    /// Backend name for logs and diagnostics.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Sqlite(_) => "sqlite",
            Store::Memory(_) => "memory",
        }
    }

    /// Whether data survives a restart.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Store::Sqlite(_))
    }

    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    pub async fn list_clients(&self) -> DbResult<Vec<Client>> {
        match self {
            Store::Sqlite(db) => db.clients().list().await,
            Store::Memory(mem) => mem.list_clients().await,
        }
    }

    pub async fn create_client(&self, draft: NewClient) -> DbResult<Client> {
        match self {
            Store::Sqlite(db) => db.clients().insert(draft).await,
            Store::Memory(mem) => mem.create_client(draft).await,
        }
    }

    // -------------------------------------------------------------------------
    // Delivery Routes
    // -------------------------------------------------------------------------

    pub async fn list_routes(&self) -> DbResult<Vec<DeliveryRoute>> {
        match self {
            Store::Sqlite(db) => db.routes().list().await,
            Store::Memory(mem) => mem.list_routes().await,
        }
    }

    pub async fn create_route(&self, draft: NewRoute) -> DbResult<DeliveryRoute> {
        match self {
            Store::Sqlite(db) => db.routes().insert(draft).await,
            Store::Memory(mem) => mem.create_route(draft).await,
        }
    }

    pub async fn get_route(&self, id: &str) -> DbResult<Option<DeliveryRoute>> {
        match self {
            Store::Sqlite(db) => db.routes().get_by_id(id).await,
            Store::Memory(mem) => mem.get_route(id).await,
        }
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    pub async fn create_sale(&self, draft: NewSale) -> DbResult<Sale> {
        match self {
            Store::Sqlite(db) => db.sales().insert(draft).await,
            Store::Memory(mem) => mem.create_sale(draft).await,
        }
    }

    /// Lists sales newest-first.
    pub async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        match self {
            Store::Sqlite(db) => db.sales().list().await,
            Store::Memory(mem) => mem.list_sales().await,
        }
    }

    pub async fn get_sale(&self, id: &str) -> DbResult<Option<Sale>> {
        match self {
            Store::Sqlite(db) => db.sales().get_by_id(id).await,
            Store::Memory(mem) => mem.get_sale(id).await,
        }
    }

    /// Cancels a sale (status flip, the record stays).
    pub async fn cancel_sale(&self, id: &str) -> DbResult<Sale> {
        match self {
            Store::Sqlite(db) => db.sales().cancel(id).await,
            Store::Memory(mem) => mem.cancel_sale(id).await,
        }
    }
}

impl ProductStore for Store {
    async fn find(&self, query: &CatalogQuery) -> DbResult<CatalogPage> {
        match self {
            Store::Sqlite(db) => db.products().find(query).await,
            Store::Memory(mem) => mem.find(query).await,
        }
    }

    async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        match self {
            Store::Sqlite(db) => db.products().get(id).await,
            Store::Memory(mem) => mem.get(id).await,
        }
    }

    async fn insert(&self, draft: NewProduct) -> DbResult<Product> {
        match self {
            Store::Sqlite(db) => db.products().insert(draft).await,
            Store::Memory(mem) => mem.insert(draft).await,
        }
    }

    async fn update(&self, id: &str, draft: NewProduct) -> DbResult<Product> {
        match self {
            Store::Sqlite(db) => db.products().update(id, draft).await,
            Store::Memory(mem) => mem.update(id, draft).await,
        }
    }

    async fn soft_deactivate(&self, id: &str) -> DbResult<()> {
        match self {
            Store::Sqlite(db) => db.products().soft_deactivate(id).await,
            Store::Memory(mem) => mem.soft_deactivate(id).await,
        }
    }

    async fn categories(&self) -> DbResult<Vec<String>> {
        match self {
            Store::Sqlite(db) => db.products().categories().await,
            Store::Memory(mem) => mem.categories().await,
        }
    }
}
