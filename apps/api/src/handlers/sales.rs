//! Sale endpoints.
//!
//! Totals are never trusted from the client: the store recomputes
//! gross and net from the line items and the discount. Cancelling a
//! sale flips its status and keeps the record for reporting.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use mercado_core::validation::validate_quantity;
use mercado_core::{Money, NewSale, NewSaleItem, Sale, SaleItem, SaleStatus};
use mercado_db::Store;

use crate::error::ApiError;

// =============================================================================
// Wire Types
// =============================================================================

/// A sale as it appears on the wire. Monetary values are decimal reais.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub receipt_number: String,
    pub client_id: String,
    pub driver: Option<String>,
    pub route: Option<String>,
    pub gross_total: f64,
    pub discount: f64,
    pub net_total: f64,
    pub payment_method: String,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<SaleItemDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl From<SaleItem> for SaleItemDto {
    fn from(item: SaleItem) -> Self {
        SaleItemDto {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: Money::from_cents(item.unit_price_cents).to_decimal(),
            subtotal: Money::from_cents(item.subtotal_cents).to_decimal(),
        }
    }
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            id: sale.id,
            receipt_number: sale.receipt_number,
            client_id: sale.client_id,
            driver: sale.driver,
            route: sale.route,
            gross_total: Money::from_cents(sale.gross_total_cents).to_decimal(),
            discount: Money::from_cents(sale.discount_cents).to_decimal(),
            net_total: Money::from_cents(sale.net_total_cents).to_decimal(),
            payment_method: sale.payment_method,
            status: sale.status,
            created_at: sale.created_at,
            items: sale.items.into_iter().map(SaleItemDto::from).collect(),
        }
    }
}

/// Caller-supplied sale fields on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub receipt_number: Option<String>,
    pub client_id: String,
    pub driver: Option<String>,
    pub route: Option<String>,
    /// Decimal discount in reais.
    #[serde(default)]
    pub discount: f64,
    pub payment_method: String,
    pub items: Vec<SaleItemInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: i64,
    /// Decimal unit price in reais.
    pub unit_price: f64,
}

impl SaleInput {
    fn into_draft(self) -> Result<NewSale, ApiError> {
        if self.client_id.trim().is_empty() {
            return Err(ApiError::bad_request("client is required"));
        }
        if self.payment_method.trim().is_empty() {
            return Err(ApiError::bad_request("payment method is required"));
        }
        if self.items.is_empty() {
            return Err(ApiError::bad_request("sale must have at least one item"));
        }
        for item in &self.items {
            validate_quantity(item.quantity)?;
        }
        if self.discount < 0.0 {
            return Err(ApiError::bad_request("discount must not be negative"));
        }

        Ok(NewSale {
            receipt_number: self.receipt_number,
            client_id: self.client_id,
            driver: self.driver.filter(|d| !d.is_empty()),
            route: self.route.filter(|r| !r.is_empty()),
            discount_cents: Money::from_decimal(self.discount).cents(),
            payment_method: self.payment_method,
            items: self
                .items
                .into_iter()
                .map(|item| NewSaleItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price_cents: Money::from_decimal(item.unit_price).cents(),
                })
                .collect(),
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /sales`
pub async fn create(
    State(store): State<Store>,
    Json(input): Json<SaleInput>,
) -> Result<(StatusCode, Json<SaleDto>), ApiError> {
    let draft = input.into_draft()?;

    let sale = store
        .create_sale(draft)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to register sale"))?;

    info!(
        id = %sale.id,
        receipt = %sale.receipt_number,
        net_total_cents = sale.net_total_cents,
        "Sale registered"
    );
    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// `GET /sales`
pub async fn list(State(store): State<Store>) -> Result<Json<Vec<SaleDto>>, ApiError> {
    let sales = store
        .list_sales()
        .await
        .map_err(|e| ApiError::from_db(e, "failed to fetch sales"))?;

    Ok(Json(sales.into_iter().map(SaleDto::from).collect()))
}

/// `GET /sales/{id}`
pub async fn get_one(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<SaleDto>, ApiError> {
    let sale = store
        .get_sale(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to fetch sales"))?
        .ok_or_else(|| ApiError::not_found("sale not found"))?;

    Ok(Json(sale.into()))
}

/// `DELETE /sales/{id}`
pub async fn cancel(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<SaleDto>, ApiError> {
    let sale = store
        .cancel_sale(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to cancel sale"))?;

    info!(id = %sale.id, "Sale cancelled");
    Ok(Json(sale.into()))
}

// =============================================================================
// Tests
// =============================================================================
