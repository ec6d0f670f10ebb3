//! # Client Repository
//!
//! SQLite operations for store customers. Plain list/insert; clients
//! are never deleted, sales reference them by id.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use mercado_core::{Client, NewClient};

use crate::error::DbResult;
use crate::store::new_id;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists all clients in registration order.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let clients: Vec<Client> = sqlx::query_as(
            "SELECT id, name, tax_id, address, phone, created_at \
             FROM clients \
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Inserts a new client.
    pub async fn insert(&self, draft: NewClient) -> DbResult<Client> {
        let client = Client {
            id: new_id(),
            name: draft.name,
            tax_id: draft.tax_id,
            address: draft.address,
            phone: draft.phone,
            created_at: Utc::now(),
        };

        debug!(name = %client.name, "Inserting client");

        sqlx::query(
            "INSERT INTO clients (id, name, tax_id, address, phone, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.tax_id)
        .bind(&client.address)
        .bind(&client.phone)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    /// Fetches a client by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client: Option<Client> = sqlx::query_as(
            "SELECT id, name, tax_id, address, phone, created_at \
             FROM clients \
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }
}
