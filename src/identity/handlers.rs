// HTTP handlers for provider profile reads

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::{with_timeout, Provider};
use crate::AppState;

/// List all provider profiles
/// GET /api/barbers
pub async fn list_barbers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Provider>>, ApiError> {
    let providers = with_timeout(state.directory_timeout, "provider", state.providers.list()).await?;

    tracing::debug!("Retrieved {} barbers", providers.len());
    Ok(Json(providers))
}

/// Get a single provider profile
/// GET /api/barbers/{id}
pub async fn get_barber_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Provider>, ApiError> {
    let provider = with_timeout(
        state.directory_timeout,
        "provider",
        state.providers.find_by_id(id),
    )
    .await?
    .ok_or(ApiError::NotFound {
        resource: "Barber",
        id: id.to_string(),
    })?;

    Ok(Json(provider))
}
