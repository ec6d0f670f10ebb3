//! # Repository Module
//!
//! SQLite repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Handler ──► Store ──► ProductRepository ──► SQL ──► SQLite     │
//! │                                                                 │
//! │  Benefits:                                                      │
//! │  • SQL is isolated in one place per entity                      │
//! │  • The ProductStore trait lets the in-memory fallback swap in   │
//! │  • Contract tests drive both implementations identically        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog query + CRUD (soft delete)
//! - [`client::ClientRepository`] - Client list/insert
//! - [`route::RouteRepository`] - Delivery route list/insert/get
//! - [`sale::SaleRepository`] - Transactional sale + items, cancel

pub mod client;
pub mod product;
pub mod route;
pub mod sale;
