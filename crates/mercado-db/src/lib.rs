//! # mercado-db: Storage Layer for the Mercado Backend
//!
//! Dual-backend storage: SQLite via sqlx, or an in-memory fallback when
//! no database path is configured.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Mercado Data Flow                          │
//! │                                                                 │
//! │  Axum handler (GET /products)                                   │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐ │
//! │  │                  mercado-db (THIS CRATE)                  │ │
//! │  │                                                           │ │
//! │  │   Store ──┬── Database + repositories ── SQLite file     │ │
//! │  │           │   (pool.rs, repository/)                     │ │
//! │  │           │                                               │ │
//! │  │           └── MemoryStore (memory.rs)                     │ │
//! │  │               RwLock<Vec<_>> tables, dev fallback         │ │
//! │  └───────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`store`] - `ProductStore` trait and the `Store` backend enum
//! - [`memory`] - In-memory fallback implementation
//! - [`repository`] - SQLite repositories (product, client, route, sale)
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercado_db::{Database, DbConfig, ProductStore, Store};
//!
//! let db = Database::new(DbConfig::new("./mercado.db")).await?;
//! let store = Store::Sqlite(db);
//!
//! let page = store.find(&CatalogQuery::default()).await?;
//! ```

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};
pub use store::{ProductStore, Store};

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::route::RouteRepository;
pub use repository::sale::SaleRepository;
