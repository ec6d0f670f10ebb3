//! # Delivery Route Repository
//!
//! SQLite operations for delivery routes. The client-name list is
//! stored as a JSON text column, so reads go through a private row
//! struct instead of deriving FromRow on the domain type.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use mercado_core::{DeliveryRoute, NewRoute};

use crate::error::{DbError, DbResult};
use crate::store::new_id;

/// Raw routes row; `clients` holds a JSON array of names.
#[derive(Debug, sqlx::FromRow)]
struct RouteRow {
    id: String,
    name: String,
    driver: Option<String>,
    clients: String,
    created_at: DateTime<Utc>,
}

impl RouteRow {
    fn into_route(self) -> DbResult<DeliveryRoute> {
        let clients: Vec<String> = serde_json::from_str(&self.clients)
            .map_err(|e| DbError::Internal(format!("Corrupt route client list: {e}")))?;

        Ok(DeliveryRoute {
            id: self.id,
            name: self.name,
            driver: self.driver,
            clients,
            created_at: self.created_at,
        })
    }
}

/// Repository for delivery route database operations.
#[derive(Debug, Clone)]
pub struct RouteRepository {
    pool: SqlitePool,
}

impl RouteRepository {
    /// Creates a new RouteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RouteRepository { pool }
    }

    /// Lists all routes in creation order.
    pub async fn list(&self) -> DbResult<Vec<DeliveryRoute>> {
        let rows: Vec<RouteRow> = sqlx::query_as(
            "SELECT id, name, driver, clients, created_at \
             FROM routes \
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RouteRow::into_route).collect()
    }

    /// Inserts a new route.
    pub async fn insert(&self, draft: NewRoute) -> DbResult<DeliveryRoute> {
        let route = DeliveryRoute {
            id: new_id(),
            name: draft.name,
            driver: draft.driver,
            clients: draft.clients,
            created_at: Utc::now(),
        };

        debug!(name = %route.name, "Inserting route");

        let clients_json = serde_json::to_string(&route.clients)
            .map_err(|e| DbError::Internal(format!("Failed to encode client list: {e}")))?;

        sqlx::query(
            "INSERT INTO routes (id, name, driver, clients, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&route.id)
        .bind(&route.name)
        .bind(&route.driver)
        .bind(&clients_json)
        .bind(route.created_at)
        .execute(&self.pool)
        .await?;

        Ok(route)
    }

    /// Fetches a route by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DeliveryRoute>> {
        let row: Option<RouteRow> = sqlx::query_as(
            "SELECT id, name, driver, clients, created_at \
             FROM routes \
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RouteRow::into_route).transpose()
    }
}
