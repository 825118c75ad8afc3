// Booking persistence
//
// The repository is a trait so storage is swappable; the PostgreSQL
// implementation is the production target and the in-memory one backs
// tests and embedded use. Both serialize concurrent status updates with a
// compare-and-swap on the current status.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bookings::{Booking, BookingFilter, BookingStatus};
use crate::error::ApiError;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking as-is (identifiers and timestamps are assigned
    /// by the caller)
    async fn insert(&self, booking: &Booking) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, ApiError>;

    /// List bookings matching the filter, ordered by created_at ascending
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError>;

    /// Compare-and-swap status update
    ///
    /// Applies only when the stored status still equals `expected`; returns
    /// the updated booking, or `None` when the booking is missing or a
    /// concurrent writer changed the status first.
    async fn update_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
        cancelled_by: Option<Uuid>,
    ) -> Result<Option<Booking>, ApiError>;
}

/// Repository for booking operations backed by PostgreSQL
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str =
    "id, provider_id, client_id, date, time, service, mode, status, cancelled_by, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, provider_id, client_id, date, time, service, mode, status, cancelled_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(booking.id)
        .bind(booking.provider_id)
        .bind(booking.client_id)
        .bind(booking.date)
        .bind(booking.time)
        .bind(&booking.service)
        .bind(booking.mode)
        .bind(booking.status)
        .bind(booking.cancelled_by)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, ApiError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError> {
        let bookings = match (filter.provider_id, filter.client_id) {
            (Some(provider_id), Some(client_id)) => {
                sqlx::query_as::<_, Booking>(&format!(
                    "SELECT {} FROM bookings WHERE provider_id = $1 AND client_id = $2 ORDER BY created_at, id",
                    BOOKING_COLUMNS
                ))
                .bind(provider_id)
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(provider_id), None) => {
                sqlx::query_as::<_, Booking>(&format!(
                    "SELECT {} FROM bookings WHERE provider_id = $1 ORDER BY created_at, id",
                    BOOKING_COLUMNS
                ))
                .bind(provider_id)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(client_id)) => {
                sqlx::query_as::<_, Booking>(&format!(
                    "SELECT {} FROM bookings WHERE client_id = $1 ORDER BY created_at, id",
                    BOOKING_COLUMNS
                ))
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, Booking>(&format!(
                    "SELECT {} FROM bookings ORDER BY created_at, id",
                    BOOKING_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
        cancelled_by: Option<Uuid>,
    ) -> Result<Option<Booking>, ApiError> {
        // The status predicate makes concurrent transitions lose instead of
        // overwriting each other
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $1, cancelled_by = COALESCE($2, cancelled_by), updated_at = NOW()
            WHERE id = $3 AND status = $4
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(next)
        .bind(cancelled_by)
        .bind(id)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }
}

/// In-memory booking repository implementing the same contract
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), ApiError> {
        let mut bookings = self
            .bookings
            .write()
            .map_err(|_| ApiError::Storage("booking store lock poisoned".into()))?;
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, ApiError> {
        let bookings = self
            .bookings
            .read()
            .map_err(|_| ApiError::Storage("booking store lock poisoned".into()))?;
        Ok(bookings.get(&id).cloned())
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError> {
        let bookings = self
            .bookings
            .read()
            .map_err(|_| ApiError::Storage("booking store lock poisoned".into()))?;
        let mut matched: Vec<Booking> = bookings
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matched.sort_by_key(|b| (b.created_at, b.id));
        Ok(matched)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
        cancelled_by: Option<Uuid>,
    ) -> Result<Option<Booking>, ApiError> {
        let mut bookings = self
            .bookings
            .write()
            .map_err(|_| ApiError::Storage("booking store lock poisoned".into()))?;

        match bookings.get_mut(&id) {
            Some(booking) if booking.status == expected => {
                booking.status = next;
                if cancelled_by.is_some() {
                    booking.cancelled_by = cancelled_by;
                }
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }
}
