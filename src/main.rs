mod bookings;
mod config;
mod dashboard;
mod db;
mod error;
mod identity;
mod penalties;
mod reviews;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bookings::BookingService;
use config::{Config, PenaltyPolicy};
use dashboard::DashboardService;
use identity::{ProviderDirectory, UserDirectory};
use penalties::PenaltyService;
use reviews::ReviewService;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        bookings::handlers::create_booking_handler,
        bookings::handlers::list_bookings_handler,
        bookings::handlers::transition_booking_handler,
        bookings::handlers::cancel_booking_handler,
        reviews::handlers::create_review_handler,
        reviews::handlers::list_reviews_handler,
        reviews::handlers::set_review_visibility_handler,
        reviews::handlers::delete_review_handler,
        dashboard::handlers::provider_summary_handler,
    ),
    components(
        schemas(
            bookings::Booking,
            bookings::BookingStatus,
            bookings::BookingEvent,
            bookings::ServiceMode,
            bookings::CreateBookingRequest,
            bookings::TransitionRequest,
            reviews::Review,
            reviews::CreateReviewRequest,
            reviews::SetVisibilityRequest,
            penalties::Penalty,
            penalties::PenaltyKind,
            penalties::AccruePenaltyRequest,
            identity::Provider,
            identity::ServiceOffering,
            identity::AttendanceMode,
            dashboard::ProviderSummary,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "bookings", description = "Booking lifecycle endpoints"),
        (name = "reviews", description = "Provider review endpoints"),
        (name = "dashboard", description = "Provider activity aggregation")
    ),
    info(
        title = "Cortate Booking API",
        version = "1.0.0",
        description = "RESTful API for the barber booking marketplace"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub booking_service: BookingService,
    pub review_service: ReviewService,
    pub penalty_service: PenaltyService,
    pub dashboard_service: DashboardService,
    pub providers: Arc<dyn ProviderDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub directory_timeout: Duration,
}

impl AppState {
    /// Wire the services over a concrete set of stores
    pub fn new(
        booking_repository: Arc<dyn bookings::BookingRepository>,
        review_repository: Arc<dyn reviews::ReviewRepository>,
        penalty_repository: Arc<dyn penalties::PenaltyRepository>,
        providers: Arc<dyn ProviderDirectory>,
        users: Arc<dyn UserDirectory>,
        policy: PenaltyPolicy,
        directory_timeout: Duration,
    ) -> Self {
        let penalty_service = PenaltyService::new(penalty_repository);
        let booking_service = BookingService::new(
            booking_repository.clone(),
            providers.clone(),
            users.clone(),
            penalty_service.clone(),
            policy,
            directory_timeout,
        );
        let review_service = ReviewService::new(
            review_repository,
            providers.clone(),
            users.clone(),
            directory_timeout,
        );
        let dashboard_service = DashboardService::new(
            booking_repository,
            penalty_service.clone(),
            providers.clone(),
            directory_timeout,
        );

        Self {
            booking_service,
            review_service,
            penalty_service,
            dashboard_service,
            providers,
            users,
            directory_timeout,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Booking lifecycle
        .route("/api/bookings", post(bookings::create_booking_handler))
        .route("/api/bookings", get(bookings::list_bookings_handler))
        .route("/api/bookings/:id", get(bookings::get_booking_handler))
        .route(
            "/api/bookings/:id",
            patch(bookings::transition_booking_handler),
        )
        .route("/api/bookings/:id", delete(bookings::cancel_booking_handler))
        // Reviews
        .route("/api/reviews", post(reviews::create_review_handler))
        .route("/api/reviews", get(reviews::list_reviews_handler))
        .route(
            "/api/reviews/:id/visibility",
            patch(reviews::set_review_visibility_handler),
        )
        .route("/api/reviews/:id", delete(reviews::delete_review_handler))
        // Penalties
        .route("/api/penalties", post(penalties::accrue_penalty_handler))
        .route("/api/penalties", get(penalties::list_penalties_handler))
        // Dashboard
        .route(
            "/api/dashboard/:provider_id",
            get(dashboard::provider_summary_handler),
        )
        // Provider catalog
        .route("/api/barbers", get(identity::list_barbers_handler))
        .route("/api/barbers/:id", get(identity::get_barber_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Cortate Booking API - Starting...");

    let config = Config::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = AppState::new(
        Arc::new(bookings::PgBookingRepository::new(db_pool.clone())),
        Arc::new(reviews::PgReviewRepository::new(db_pool.clone())),
        Arc::new(penalties::PgPenaltyRepository::new(db_pool.clone())),
        Arc::new(identity::PgProviderDirectory::new(db_pool.clone())),
        Arc::new(identity::PgUserDirectory::new(db_pool)),
        config.penalty_policy.clone(),
        config.directory_timeout,
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Cortate Booking API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
