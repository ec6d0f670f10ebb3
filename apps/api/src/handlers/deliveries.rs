//! Delivery route endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use mercado_core::validation::validate_name;
use mercado_core::{DeliveryRoute, NewRoute};
use mercado_db::Store;

use crate::error::ApiError;

/// A delivery route as it appears on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub id: String,
    pub name: String,
    pub driver: Option<String>,
    pub clients: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeliveryRoute> for RouteDto {
    fn from(r: DeliveryRoute) -> Self {
        RouteDto {
            id: r.id,
            name: r.name,
            driver: r.driver,
            clients: r.clients,
            created_at: r.created_at,
        }
    }
}

/// Caller-supplied route fields on the wire.
#[derive(Debug, Deserialize)]
pub struct RouteInput {
    pub name: String,
    pub driver: Option<String>,
    #[serde(default)]
    pub clients: Vec<String>,
}

/// `GET /routes`
pub async fn list(State(store): State<Store>) -> Result<Json<Vec<RouteDto>>, ApiError> {
    let routes = store
        .list_routes()
        .await
        .map_err(|e| ApiError::from_db(e, "failed to fetch routes"))?;

    Ok(Json(routes.into_iter().map(RouteDto::from).collect()))
}

/// `POST /routes`
pub async fn create(
    State(store): State<Store>,
    Json(input): Json<RouteInput>,
) -> Result<(StatusCode, Json<RouteDto>), ApiError> {
    validate_name(&input.name)?;

    let route = store
        .create_route(NewRoute {
            name: input.name,
            driver: input.driver.filter(|d| !d.is_empty()),
            clients: input.clients,
        })
        .await
        .map_err(|e| ApiError::from_db(e, "failed to create route"))?;

    info!(id = %route.id, "Route created");
    Ok((StatusCode::CREATED, Json(route.into())))
}

/// `GET /routes/{id}`
pub async fn get_one(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<RouteDto>, ApiError> {
    let route = store
        .get_route(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "failed to fetch routes"))?
        .ok_or_else(|| ApiError::not_found("route not found"))?;

    Ok(Json(route.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_fetch() {
        let store = Store::in_memory();

        let (status, Json(created)) = create(
            State(store.clone()),
            Json(RouteInput {
                name: "Rota Centro".to_string(),
                driver: Some("Pedro Oliveira".to_string()),
                clients: vec!["João Silva".to_string()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_one(State(store.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(fetched.name, "Rota Centro");
        assert_eq!(fetched.clients, vec!["João Silva"]);

        let err = get_one(State(store), Path("no-such-id".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
