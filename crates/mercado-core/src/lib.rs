//! # mercado-core: Pure Business Logic for the Mercado Backend
//!
//! This crate contains all business logic as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Mercado Architecture                        │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐ │
//! │  │                  apps/api (Axum HTTP)                     │ │
//! │  │   GET /products  POST /sales  GET /clients  ...           │ │
//! │  └──────────────────────────┬────────────────────────────────┘ │
//! │                             │                                   │
//! │  ┌──────────────────────────▼────────────────────────────────┐ │
//! │  │             ★ mercado-core (THIS CRATE) ★                 │ │
//! │  │                                                           │ │
//! │  │  ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌────────────┐  │ │
//! │  │  │  types  │  │  money  │  │ catalog  │  │ validation │  │ │
//! │  │  │ Product │  │  Money  │  │  query + │  │   rules    │  │ │
//! │  │  │  Sale   │  │  cents  │  │  paging  │  │   checks   │  │ │
//! │  │  └─────────┘  └─────────┘  └──────────┘  └────────────┘  │ │
//! │  │                                                           │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS       │ │
//! │  └──────────────────────────┬────────────────────────────────┘ │
//! │                             │                                   │
//! │  ┌──────────────────────────▼────────────────────────────────┐ │
//! │  │              mercado-db (Storage Layer)                   │ │
//! │  │     SQLite repositories + in-memory fallback store        │ │
//! │  └───────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, DeliveryRoute, Sale)
//! - [`catalog`] - Catalog query: filter predicate and pagination math
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use catalog::{CatalogPage, CatalogQuery, DEFAULT_PAGE_SIZE};
pub use error::ValidationError;
pub use money::Money;
pub use types::*;
