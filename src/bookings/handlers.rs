// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::bookings::{
    Booking, BookingFilter, CancelParams, CreateBookingRequest, TransitionRequest,
};
use crate::error::{ApiError, ErrorResponse};
use crate::AppState;

/// Handler for POST /api/bookings
/// Creates a new booking in pending status
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created awaiting confirmation", body = Booking),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 404, description = "Provider or client not found", body = ErrorResponse),
        (status = 502, description = "Identity store unavailable", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    tracing::debug!(
        "Creating booking for provider {} / client {}",
        request.provider_id,
        request.client_id
    );
    let booking = state.booking_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings
/// Lists bookings, optionally filtered by provider or client
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(BookingFilter),
    responses(
        (status = 200, description = "Bookings ordered by creation time", body = Vec<Booking>)
    ),
    tag = "bookings"
)]
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.booking_service.list(filter).await?;
    Ok(Json(bookings))
}

/// Handler for GET /api/bookings/{booking_id}
pub async fn get_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.booking_service.find(booking_id).await?;
    Ok(Json(booking))
}

/// Handler for PATCH /api/bookings/{booking_id}
/// Applies a lifecycle event to a booking
#[utoipa::path(
    patch,
    path = "/api/bookings/{booking_id}",
    params(("booking_id" = Uuid, Path, description = "Booking identifier")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = Booking),
        (status = 403, description = "Actor may not perform this transition", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Transition not legal from the current status", body = ErrorResponse),
        (status = 500, description = "Transition applied but penalty accrual failed", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn transition_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Booking>, ApiError> {
    tracing::debug!(
        "Applying event {} to booking {} by actor {}",
        request.event,
        booking_id,
        request.actor_id
    );
    let booking = state
        .booking_service
        .transition(booking_id, request.event, request.actor_id)
        .await?;
    Ok(Json(booking))
}

/// Handler for DELETE /api/bookings/{booking_id}
/// Cancels a booking; repeat calls are no-ops
#[utoipa::path(
    delete,
    path = "/api/bookings/{booking_id}",
    params(
        ("booking_id" = Uuid, Path, description = "Booking identifier"),
        CancelParams
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 403, description = "Actor is not a party to the booking", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking already reached a different terminal status", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn cancel_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Query(params): Query<CancelParams>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .booking_service
        .cancel(booking_id, params.actor_id)
        .await?;
    Ok(Json(booking))
}
