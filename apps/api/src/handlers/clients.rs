//! Client registry endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use mercado_core::validation::validate_name;
use mercado_core::{Client, NewClient};
use mercado_db::Store;

use crate::error::ApiError;

/// A client as it appears on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: String,
    pub name: String,
    /// CPF or CNPJ.
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
    fn from(c: Client) -> Self {
        ClientDto {
            id: c.id,
            name: c.name,
            tax_id: c.tax_id,
            address: c.address,
            phone: c.phone,
            created_at: c.created_at,
        }
    }
}

/// Caller-supplied client fields on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// `GET /clients`
pub async fn list(State(store): State<Store>) -> Result<Json<Vec<ClientDto>>, ApiError> {
    let clients = store
        .list_clients()
        .await
        .map_err(|e| ApiError::from_db(e, "failed to fetch clients"))?;

    Ok(Json(clients.into_iter().map(ClientDto::from).collect()))
}

/// `POST /clients`
pub async fn create(
    State(store): State<Store>,
    Json(input): Json<ClientInput>,
) -> Result<(StatusCode, Json<ClientDto>), ApiError> {
    validate_name(&input.name)?;

    let client = store
        .create_client(NewClient {
            name: input.name,
            tax_id: input.tax_id.filter(|t| !t.is_empty()),
            address: input.address.filter(|a| !a.is_empty()),
            phone: input.phone.filter(|p| !p.is_empty()),
        })
        .await
        .map_err(|e| ApiError::from_db(e, "failed to create client"))?;

    info!(id = %client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list() {
        let store = Store::in_memory();

        let (status, Json(created)) = create(
            State(store.clone()),
            Json(ClientInput {
                name: "João Silva".to_string(),
                tax_id: Some("123.456.789-00".to_string()),
                address: None,
                phone: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(listed) = list(State(store)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let store = Store::in_memory();

        let err = create(
            State(store),
            Json(ClientInput {
                name: "  ".to_string(),
                tax_id: None,
                address: None,
                phone: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
