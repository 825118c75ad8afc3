// HTTP handlers for review endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, ErrorResponse};
use crate::reviews::{
    CreateReviewRequest, ModerationParams, Review, ReviewQuery, SetVisibilityRequest,
};
use crate::AppState;

/// Handler for POST /api/reviews
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating or comment", body = ErrorResponse),
        (status = 404, description = "Provider or client not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn create_review_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.review_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for GET /api/reviews
/// Lists a provider's visible reviews
#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ReviewQuery),
    responses(
        (status = 200, description = "Visible reviews, oldest first", body = Vec<Review>)
    ),
    tag = "reviews"
)]
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state
        .review_service
        .list_for_provider(query.provider_id, query.limit, query.offset)
        .await?;

    tracing::debug!(
        "Retrieved {} reviews for provider {}",
        reviews.len(),
        query.provider_id
    );
    Ok(Json(reviews))
}

/// Handler for PATCH /api/reviews/{review_id}/visibility
/// Administrator moderation: hide or restore a review
#[utoipa::path(
    patch,
    path = "/api/reviews/{review_id}/visibility",
    params(("review_id" = Uuid, Path, description = "Review identifier")),
    request_body = SetVisibilityRequest,
    responses(
        (status = 200, description = "Visibility updated", body = Review),
        (status = 403, description = "Actor is not an administrator", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn set_review_visibility_handler(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Json(request): Json<SetVisibilityRequest>,
) -> Result<Json<Review>, ApiError> {
    let review = state
        .review_service
        .set_visibility(review_id, request.actor_id, request.visible)
        .await?;
    Ok(Json(review))
}

/// Handler for DELETE /api/reviews/{review_id}
/// Administrator moderation: permanently remove a review
#[utoipa::path(
    delete,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review identifier"),
        ModerationParams
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Actor is not an administrator", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Query(params): Query<ModerationParams>,
) -> Result<StatusCode, ApiError> {
    state.review_service.delete(review_id, params.actor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
