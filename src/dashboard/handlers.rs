// HTTP handler for the provider dashboard endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::dashboard::ProviderSummary;
use crate::error::ApiError;
use crate::AppState;

/// Handler for GET /api/dashboard/{provider_id}
/// Computes the provider's activity summary on demand
#[utoipa::path(
    get,
    path = "/api/dashboard/{provider_id}",
    params(("provider_id" = Uuid, Path, description = "Provider identifier")),
    responses(
        (status = 200, description = "Aggregated provider activity", body = ProviderSummary)
    ),
    tag = "dashboard"
)]
pub async fn provider_summary_handler(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ProviderSummary>, ApiError> {
    let summary = state.dashboard_service.summarize(provider_id).await?;

    tracing::debug!(
        "Dashboard for provider {}: {} bookings, revenue {}",
        provider_id,
        summary.booking_count,
        summary.revenue
    );
    Ok(Json(summary))
}
