// End-to-end handler tests over the HTTP surface
// Runs the full router against in-memory stores; no database required

use super::*;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use crate::bookings::repository::BookingRepository;
use crate::bookings::{Booking, BookingStatus, InMemoryBookingRepository, ServiceMode};
use crate::identity::{
    AttendanceMode, InMemoryProviderDirectory, InMemoryUserDirectory, Provider, Role,
    ServiceOffering, User,
};
use crate::penalties::{InMemoryPenaltyRepository, Penalty};
use crate::reviews::Review;

// ============================================================================
// Test Helpers
// ============================================================================

struct TestContext {
    server: TestServer,
    bookings: Arc<InMemoryBookingRepository>,
    provider_id: Uuid,
    client_id: Uuid,
    admin_id: Uuid,
}

/// Builds the full router over in-memory stores, seeded with one provider
/// offering "corte" (15.00) and "barba" (8.00), one client, and one admin
fn create_test_context() -> TestContext {
    let providers = Arc::new(InMemoryProviderDirectory::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let bookings = Arc::new(InMemoryBookingRepository::new());

    let provider_id = Uuid::new_v4();
    providers.insert(Provider {
        id: provider_id,
        name: "El Navajazo".to_string(),
        email: "navajazo@example.com".to_string(),
        phone: Some("+34600111222".to_string()),
        services: vec![
            ServiceOffering {
                name: "corte".to_string(),
                price: dec!(15.00),
            },
            ServiceOffering {
                name: "barba".to_string(),
                price: dec!(8.00),
            },
        ],
        attendance: AttendanceMode::Both,
        description: Some("Corte clásico y moderno".to_string()),
        image_urls: vec![],
        created_at: Utc::now(),
    });

    let client_id = Uuid::new_v4();
    users.insert(User {
        id: client_id,
        name: "Marta".to_string(),
        email: "marta@example.com".to_string(),
        phone: None,
        password_hash: "opaque".to_string(),
        role: Role::Client,
        created_at: Utc::now(),
    });

    let admin_id = Uuid::new_v4();
    users.insert(User {
        id: admin_id,
        name: "Root".to_string(),
        email: "root@example.com".to_string(),
        phone: None,
        password_hash: "opaque".to_string(),
        role: Role::Admin,
        created_at: Utc::now(),
    });

    let state = AppState::new(
        bookings.clone(),
        Arc::new(crate::reviews::InMemoryReviewRepository::new()),
        Arc::new(InMemoryPenaltyRepository::new()),
        providers,
        users,
        PenaltyPolicy::default(),
        Duration::from_secs(1),
    );

    TestContext {
        server: TestServer::new(create_router(state)).unwrap(),
        bookings,
        provider_id,
        client_id,
        admin_id,
    }
}

fn booking_payload(ctx: &TestContext, service: &str) -> serde_json::Value {
    let scheduled = Utc::now().naive_utc() + ChronoDuration::days(14);
    json!({
        "provider_id": ctx.provider_id,
        "client_id": ctx.client_id,
        "date": scheduled.date().format("%Y-%m-%d").to_string(),
        "time": scheduled.time().format("%H:%M").to_string(),
        "service": service,
        "mode": "on_site"
    })
}

async fn create_booking(ctx: &TestContext, service: &str) -> Booking {
    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_payload(ctx, service))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Booking>()
}

async fn apply_event(ctx: &TestContext, booking_id: Uuid, event: &str, actor_id: Uuid) -> Booking {
    let response = ctx
        .server
        .patch(&format!("/api/bookings/{}", booking_id))
        .json(&json!({ "event": event, "actor_id": actor_id }))
        .await;
    response.assert_status_ok();
    response.json::<Booking>()
}

/// Insert a confirmed booking directly, scheduled at a chosen offset
async fn seed_confirmed_booking(ctx: &TestContext, offset: ChronoDuration) -> Booking {
    let scheduled = Utc::now().naive_utc() + offset;
    let booking = Booking {
        id: Uuid::new_v4(),
        provider_id: ctx.provider_id,
        client_id: ctx.client_id,
        date: scheduled.date(),
        time: scheduled.time(),
        service: "corte".to_string(),
        mode: ServiceMode::OnSite,
        status: BookingStatus::Confirmed,
        cancelled_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    ctx.bookings.insert(&booking).await.unwrap();
    booking
}

async fn penalties_for(ctx: &TestContext, subject_id: Uuid) -> Vec<Penalty> {
    let response = ctx
        .server
        .get("/api/penalties")
        .add_query_param("subject_id", subject_id)
        .await;
    response.assert_status_ok();
    response.json::<Vec<Penalty>>()
}

// ============================================================================
// Booking lifecycle
// ============================================================================

#[tokio::test]
async fn test_booking_happy_path_to_completion_and_dashboard() {
    let ctx = create_test_context();

    let booking = create_booking(&ctx, "corte").await;
    assert_eq!(booking.status, BookingStatus::Pending);

    let confirmed = apply_event(&ctx, booking.id, "confirm", ctx.provider_id).await;
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let completed = apply_event(&ctx, booking.id, "complete", ctx.provider_id).await;
    assert_eq!(completed.status, BookingStatus::Completed);

    let response = ctx
        .server
        .get(&format!("/api/dashboard/{}", ctx.provider_id))
        .await;
    response.assert_status_ok();
    let summary = response.json::<serde_json::Value>();
    assert_eq!(summary["booking_count"], 1);
    assert_eq!(summary["revenue"], json!("15.00"));
}

#[tokio::test]
async fn test_create_booking_rejects_unknown_service() {
    let ctx = create_test_context();
    let mut payload = booking_payload(&ctx, "tinte");
    payload["service"] = json!("tinte");

    let response = ctx.server.post("/api/bookings").json(&payload).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_booking_unknown_provider_is_404() {
    let ctx = create_test_context();
    let mut payload = booking_payload(&ctx, "corte");
    payload["provider_id"] = json!(Uuid::new_v4());

    let response = ctx.server.post("/api/bookings").json(&payload).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_illegal_transition_is_409_with_stable_code() {
    let ctx = create_test_context();
    let booking = create_booking(&ctx, "corte").await;

    // A pending booking cannot complete
    let response = ctx
        .server
        .patch(&format!("/api/bookings/{}", booking.id))
        .json(&json!({ "event": "complete", "actor_id": ctx.provider_id }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error_code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_transition_by_stranger_is_403() {
    let ctx = create_test_context();
    let booking = create_booking(&ctx, "corte").await;

    let response = ctx
        .server
        .patch(&format!("/api/bookings/{}", booking.id))
        .json(&json!({ "event": "cancel", "actor_id": Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_transition_unknown_booking_is_404() {
    let ctx = create_test_context();
    let response = ctx
        .server
        .patch(&format!("/api/bookings/{}", Uuid::new_v4()))
        .json(&json!({ "event": "cancel", "actor_id": ctx.client_id }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_endpoint_is_idempotent() {
    let ctx = create_test_context();
    let booking = create_booking(&ctx, "barba").await;
    let url = format!("/api/bookings/{}?actor_id={}", booking.id, ctx.client_id);

    let first = ctx.server.delete(&url).await;
    first.assert_status_ok();
    assert_eq!(first.json::<Booking>().status, BookingStatus::Cancelled);

    let second = ctx.server.delete(&url).await;
    second.assert_status_ok();
    assert_eq!(second.json::<Booking>().status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_list_bookings_filters_by_party() {
    let ctx = create_test_context();
    create_booking(&ctx, "corte").await;
    create_booking(&ctx, "barba").await;

    let response = ctx
        .server
        .get("/api/bookings")
        .add_query_param("provider_id", ctx.provider_id)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Booking>>().len(), 2);

    let response = ctx
        .server
        .get("/api/bookings")
        .add_query_param("client_id", Uuid::new_v4())
        .await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Booking>>().is_empty());
}

// ============================================================================
// Penalty accrual through the lifecycle
// ============================================================================

#[tokio::test]
async fn test_late_provider_cancellation_accrues_rejection_penalty() {
    let ctx = create_test_context();
    let booking = seed_confirmed_booking(&ctx, ChronoDuration::hours(2)).await;

    let cancelled = apply_event(&ctx, booking.id, "cancel", ctx.provider_id).await;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let penalties = penalties_for(&ctx, ctx.provider_id).await;
    assert_eq!(penalties.len(), 1);
    assert_eq!(penalties[0].kind.to_string(), "booking_rejection");
}

#[tokio::test]
async fn test_late_client_cancellation_charges_ten_percent() {
    let ctx = create_test_context();
    let booking = seed_confirmed_booking(&ctx, ChronoDuration::hours(2)).await;

    apply_event(&ctx, booking.id, "cancel", ctx.client_id).await;

    let penalties = penalties_for(&ctx, ctx.client_id).await;
    assert_eq!(penalties.len(), 1);
    assert_eq!(penalties[0].amount, dec!(1.50));
}

#[tokio::test]
async fn test_early_cancellation_accrues_nothing() {
    let ctx = create_test_context();
    let booking = seed_confirmed_booking(&ctx, ChronoDuration::days(10)).await;

    apply_event(&ctx, booking.id, "cancel", ctx.client_id).await;

    assert!(penalties_for(&ctx, ctx.client_id).await.is_empty());
    assert!(penalties_for(&ctx, ctx.provider_id).await.is_empty());
}

#[tokio::test]
async fn test_no_show_charges_half_price_to_absent_party() {
    let ctx = create_test_context();
    let booking = seed_confirmed_booking(&ctx, ChronoDuration::hours(1)).await;

    let cancelled = apply_event(&ctx, booking.id, "no_show", ctx.provider_id).await;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let penalties = penalties_for(&ctx, ctx.client_id).await;
    assert_eq!(penalties.len(), 1);
    assert_eq!(penalties[0].kind.to_string(), "no_show");
    assert_eq!(penalties[0].amount, dec!(7.50));
}

#[tokio::test]
async fn test_direct_accrual_requires_admin() {
    let ctx = create_test_context();
    let payload = json!({
        "actor_id": ctx.client_id,
        "subject_id": ctx.provider_id,
        "kind": "late_arrival",
        "description": "llegó 40 minutos tarde",
        "amount": "5.00"
    });

    let response = ctx.server.post("/api/penalties").json(&payload).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let mut payload = payload;
    payload["actor_id"] = json!(ctx.admin_id);
    let response = ctx.server.post("/api/penalties").json(&payload).await;
    response.assert_status(StatusCode::CREATED);

    let penalties = penalties_for(&ctx, ctx.provider_id).await;
    assert_eq!(penalties.len(), 1);
    assert_eq!(penalties[0].amount, dec!(5.00));
}

// ============================================================================
// Reviews
// ============================================================================

#[tokio::test]
async fn test_review_lifecycle_with_moderation() {
    let ctx = create_test_context();

    let response = ctx
        .server
        .post("/api/reviews")
        .json(&json!({
            "provider_id": ctx.provider_id,
            "client_id": ctx.client_id,
            "rating": 5,
            "comment": "impecable"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let review = response.json::<Review>();
    assert!(review.visible);

    let listed = ctx
        .server
        .get("/api/reviews")
        .add_query_param("provider_id", ctx.provider_id)
        .await;
    listed.assert_status_ok();
    assert_eq!(listed.json::<Vec<Review>>().len(), 1);

    // Hide it; the public listing empties
    let response = ctx
        .server
        .patch(&format!("/api/reviews/{}/visibility", review.id))
        .json(&json!({ "actor_id": ctx.admin_id, "visible": false }))
        .await;
    response.assert_status_ok();

    let listed = ctx
        .server
        .get("/api/reviews")
        .add_query_param("provider_id", ctx.provider_id)
        .await;
    assert!(listed.json::<Vec<Review>>().is_empty());

    // Delete is admin-only and idempotence is not promised: second call 404s
    let url = format!("/api/reviews/{}?actor_id={}", review.id, ctx.admin_id);
    ctx.server.delete(&url).await.assert_status(StatusCode::NO_CONTENT);
    ctx.server.delete(&url).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_rating_out_of_range_is_400() {
    let ctx = create_test_context();
    let response = ctx
        .server
        .post("/api/reviews")
        .json(&json!({
            "provider_id": ctx.provider_id,
            "client_id": ctx.client_id,
            "rating": 9
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_timestamp_is_never_caller_supplied() {
    let ctx = create_test_context();
    let before = Utc::now();

    let response = ctx
        .server
        .post("/api/reviews")
        .json(&json!({
            "provider_id": ctx.provider_id,
            "client_id": ctx.client_id,
            "rating": 4,
            "created_at": "1999-01-01T00:00:00Z"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let review = response.json::<Review>();
    assert!(review.created_at >= before);
}

#[tokio::test]
async fn test_review_moderation_by_client_is_403() {
    let ctx = create_test_context();
    let response = ctx
        .server
        .post("/api/reviews")
        .json(&json!({
            "provider_id": ctx.provider_id,
            "client_id": ctx.client_id,
            "rating": 2
        }))
        .await;
    let review = response.json::<Review>();

    let response = ctx
        .server
        .patch(&format!("/api/reviews/{}/visibility", review.id))
        .json(&json!({ "actor_id": ctx.client_id, "visible": false }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// Dashboard and provider catalog
// ============================================================================

#[tokio::test]
async fn test_dashboard_unknown_provider_returns_zeros() {
    let ctx = create_test_context();
    let response = ctx
        .server
        .get(&format!("/api/dashboard/{}", Uuid::new_v4()))
        .await;
    response.assert_status_ok();
    let summary = response.json::<serde_json::Value>();
    assert_eq!(summary["booking_count"], 0);
    assert_eq!(summary["revenue"], json!("0"));
    assert_eq!(summary["penalty_total"], json!("0"));
}

#[tokio::test]
async fn test_barber_catalog_endpoints() {
    let ctx = create_test_context();

    let response = ctx.server.get("/api/barbers").await;
    response.assert_status_ok();
    let barbers = response.json::<serde_json::Value>();
    let barbers = barbers.as_array().unwrap();
    assert_eq!(barbers.len(), 1);
    assert_eq!(barbers[0]["name"], "El Navajazo");

    let response = ctx
        .server
        .get(&format!("/api/barbers/{}", ctx.provider_id))
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .get(&format!("/api/barbers/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Identity store failure handling
// ============================================================================

/// Directory stub that never answers within the configured timeout
struct StalledProviderDirectory;

#[async_trait::async_trait]
impl crate::identity::ProviderDirectory for StalledProviderDirectory {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Provider>, error::ApiError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Provider>, error::ApiError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(vec![])
    }

    async fn price_of(
        &self,
        _provider_id: Uuid,
        _service: &str,
    ) -> Result<Option<rust_decimal::Decimal>, error::ApiError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }
}

#[tokio::test]
async fn test_stalled_identity_store_maps_to_502() {
    let users = Arc::new(InMemoryUserDirectory::new());
    let client_id = Uuid::new_v4();
    users.insert(User {
        id: client_id,
        name: "Marta".to_string(),
        email: "marta@example.com".to_string(),
        phone: None,
        password_hash: "opaque".to_string(),
        role: Role::Client,
        created_at: Utc::now(),
    });

    let state = AppState::new(
        Arc::new(InMemoryBookingRepository::new()),
        Arc::new(crate::reviews::InMemoryReviewRepository::new()),
        Arc::new(InMemoryPenaltyRepository::new()),
        Arc::new(StalledProviderDirectory),
        users,
        PenaltyPolicy::default(),
        Duration::from_millis(50),
    );
    let server = TestServer::new(create_router(state)).unwrap();

    let scheduled = Utc::now().naive_utc() + ChronoDuration::days(3);
    let response = server
        .post("/api/bookings")
        .json(&json!({
            "provider_id": Uuid::new_v4(),
            "client_id": client_id,
            "date": scheduled.date().format("%Y-%m-%d").to_string(),
            "time": scheduled.time().format("%H:%M").to_string(),
            "service": "corte",
            "mode": "on_site"
        }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error_code"], "UPSTREAM_UNAVAILABLE");
}
