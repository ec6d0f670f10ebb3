//! HTTP handlers and router assembly.
//!
//! ## Routes
//! ```text
//! GET    /                      API banner
//! GET    /health                Liveness probe
//! GET    /products              Catalog query (search/category/paging)
//! POST   /products              Create product
//! GET    /products/categories   Distinct active categories
//! GET    /products/{id}         Fetch one product
//! PUT    /products/{id}         Replace product fields
//! DELETE /products/{id}         Soft-deactivate product
//! GET    /clients               List clients
//! POST   /clients               Create client
//! GET    /routes                List delivery routes
//! POST   /routes                Create delivery route
//! GET    /routes/{id}           Fetch one route
//! GET    /sales                 List sales, newest first
//! POST   /sales                 Register a sale
//! GET    /sales/{id}            Fetch one sale
//! DELETE /sales/{id}            Cancel a sale (record stays)
//! ```

pub mod clients;
pub mod deliveries;
pub mod products;
pub mod sales;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use mercado_db::Store;

/// Builds the full application router.
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/products",
            get(products::list).post(products::create),
        )
        .route("/products/categories", get(products::categories))
        .route(
            "/products/{id}",
            get(products::get_one)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/clients", get(clients::list).post(clients::create))
        .route("/routes", get(deliveries::list).post(deliveries::create))
        .route("/routes/{id}", get(deliveries::get_one))
        .route("/sales", get(sales::list).post(sales::create))
        .route("/sales/{id}", get(sales::get_one).delete(sales::cancel))
        .with_state(store)
}

/// API banner, handy for checking the server is the right one.
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "message": "Mercado API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    "OK"
}
