//! Product catalog endpoints.
//!
//! The catalog query is the busiest endpoint: the front-end calls it on
//! every keystroke of the search box. All filtering happens in the
//! store; this layer only translates between wire shapes and domain
//! types.
//!
//! Prices cross the wire as decimal reais (`25.9`) but are integer
//! cents everywhere behind this module.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use mercado_core::validation::validate_product;
use mercado_core::{CatalogPage, CatalogQuery, Money, NewProduct, Product, DEFAULT_PAGE_SIZE};
use mercado_db::{ProductStore, Store};

use crate::error::ApiError;

const FETCH_FAILED: &str = "failed to fetch products";

// =============================================================================
// Wire Types
// =============================================================================

/// Raw query string of `GET /products`.
///
/// Numbers arrive as strings so a malformed `page=abc` can be reported
/// the same way any other bad query is: as a 500 with the fixed
/// fetch-failure message, not a silent fallback to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl CatalogParams {
    fn into_query(self) -> Result<CatalogQuery, ApiError> {
        let page = parse_number(self.page, 1)?;
        let page_size = parse_number(self.page_size, DEFAULT_PAGE_SIZE)?;

        Ok(CatalogQuery {
            search: self.search.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            page,
            page_size,
        })
    }
}

fn parse_number(raw: Option<String>, default: u32) -> Result<u32, ApiError> {
    match raw {
        None => Ok(default),
        Some(s) if s.is_empty() => Ok(default),
        Some(s) => s.parse().map_err(|_| {
            warn!(value = %s, "Malformed pagination parameter");
            ApiError::internal(FETCH_FAILED)
        }),
    }
}

/// A product as it appears on the wire.
#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    /// Decimal price in reais.
    pub price: f64,
    pub stock: i64,
    pub barcode: Option<String>,
    pub unit: String,
    pub active: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            code: p.code,
            name: p.name,
            category: p.category,
            price: Money::from_cents(p.price_cents).to_decimal(),
            stock: p.stock,
            barcode: p.barcode,
            unit: p.unit,
            active: p.active,
        }
    }
}

/// One catalog page on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPageDto {
    pub items: Vec<ProductDto>,
    pub total_matching: u64,
    pub page: u32,
    pub total_pages: u32,
}

impl From<CatalogPage> for CatalogPageDto {
    fn from(page: CatalogPage) -> Self {
        CatalogPageDto {
            items: page.items.into_iter().map(ProductDto::from).collect(),
            total_matching: page.total_matching,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

/// Caller-supplied product fields on the wire.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    /// Decimal price in reais.
    pub price: f64,
    pub stock: Option<i64>,
    pub barcode: Option<String>,
    pub unit: Option<String>,
}

impl ProductInput {
    fn into_draft(self) -> NewProduct {
        NewProduct {
            code: self.code,
            name: self.name,
            category: self.category.filter(|c| !c.is_empty()),
            price_cents: Money::from_decimal(self.price).cents(),
            stock: self.stock.unwrap_or(0),
            barcode: self.barcode.filter(|b| !b.is_empty()),
            unit: self
                .unit
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| mercado_core::DEFAULT_UNIT.to_string()),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /products`
pub async fn list(
    State(store): State<Store>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogPageDto>, ApiError> {
    let query = params.into_query()?;
    let page = store
        .find(&query)
        .await
        .map_err(|e| ApiError::from_db(e, FETCH_FAILED))?;

    Ok(Json(page.into()))
}

/// `GET /products/categories`
pub async fn categories(State(store): State<Store>) -> Result<Json<Vec<String>>, ApiError> {
    let categories = store
        .categories()
        .await
        .map_err(|e| ApiError::from_db(e, "failed to fetch categories"))?;

    Ok(Json(categories))
}

/// `GET /products/{id}`
pub async fn get_one(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = store
        .get(&id)
        .await
        .map_err(|e| ApiError::from_db(e, FETCH_FAILED))?
        .ok_or_else(|| ApiError::not_found("product not found"))?;

    Ok(Json(product.into()))
}

/// `POST /products`
pub async fn create(
    State(store): State<Store>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let draft = input.into_draft();
    validate_product(&draft)?;

    let product = store
        .insert(draft)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to create product"))?;

    info!(id = %product.id, code = %product.code, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// `PUT /products/{id}`
pub async fn update(
    State(store): State<Store>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductDto>, ApiError> {
    let draft = input.into_draft();
    validate_product(&draft)?;

    let product = store
        .update(&id, draft)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to update product"))?;

    info!(id = %product.id, "Product updated");
    Ok(Json(product.into()))
}

/// `DELETE /products/{id}`
///
/// Soft-deactivates: the record stays so historical sales keep their
/// product reference, it just disappears from catalog queries.
pub async fn remove(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    store
        .soft_deactivate(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to remove product"))?;

    info!(id = %id, "Product deactivated");
    Ok(Json(json!({ "message": "product removed" })))
}

// =============================================================================
// Tests
// =============================================================================
