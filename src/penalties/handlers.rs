// HTTP handlers for penalty endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::identity::{with_timeout, Role};
use crate::penalties::{AccruePenaltyRequest, Penalty, PenaltyQuery};
use crate::AppState;

/// Accrue a penalty by explicit administrative action
/// POST /api/penalties
///
/// System-triggered accrual goes through the booking lifecycle engine;
/// this endpoint is for administrators only.
pub async fn accrue_penalty_handler(
    State(state): State<AppState>,
    Json(request): Json<AccruePenaltyRequest>,
) -> Result<(StatusCode, Json<Penalty>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let actor = with_timeout(
        state.directory_timeout,
        "user",
        state.users.find_by_id(request.actor_id),
    )
    .await?
    .ok_or(ApiError::NotFound {
        resource: "User",
        id: request.actor_id.to_string(),
    })?;

    if actor.role != Role::Admin {
        return Err(ApiError::Forbidden(
            "Only administrators can accrue penalties directly".to_string(),
        ));
    }

    let penalty = state
        .penalty_service
        .accrue(
            request.subject_id,
            request.kind,
            request.description,
            request.amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(penalty)))
}

/// List penalties for a subject
/// GET /api/penalties?subject_id=
pub async fn list_penalties_handler(
    State(state): State<AppState>,
    Query(query): Query<PenaltyQuery>,
) -> Result<Json<Vec<Penalty>>, ApiError> {
    let penalties = state.penalty_service.list_for(query.subject_id).await?;

    tracing::debug!(
        "Retrieved {} penalties for subject {}",
        penalties.len(),
        query.subject_id
    );
    Ok(Json(penalties))
}
