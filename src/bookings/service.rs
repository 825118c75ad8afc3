use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::bookings::{
    Booking, BookingEvent, BookingFilter, BookingRepository, BookingStatus, CreateBookingRequest,
    ServiceMode, StatusMachine,
};
use crate::config::PenaltyPolicy;
use crate::error::ApiError;
use crate::identity::{with_timeout, AttendanceMode, ProviderDirectory, UserDirectory};
use crate::penalties::{PenaltyKind, PenaltyService};
use crate::validation::{ensure_not_past, parse_booking_date, parse_booking_time};

/// Service for booking lifecycle logic
///
/// Owns the state machine around persisted bookings and emits penalty
/// accrual requests for cancellation and no-show violations.
#[derive(Clone)]
pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    providers: Arc<dyn ProviderDirectory>,
    users: Arc<dyn UserDirectory>,
    penalties: PenaltyService,
    policy: PenaltyPolicy,
    directory_timeout: Duration,
}

impl BookingService {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        providers: Arc<dyn ProviderDirectory>,
        users: Arc<dyn UserDirectory>,
        penalties: PenaltyService,
        policy: PenaltyPolicy,
        directory_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            providers,
            users,
            penalties,
            policy,
            directory_timeout,
        }
    }

    /// Create a new booking in pending status
    ///
    /// # Validation
    /// - date and time must parse and must not lie in the past
    /// - provider and client must exist in the identity store
    /// - the service must be in the provider's catalog
    /// - the requested mode must be compatible with the provider's
    ///   attendance setting
    pub async fn create(&self, request: CreateBookingRequest) -> Result<Booking, ApiError> {
        request
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let date = parse_booking_date(&request.date)?;
        let time = parse_booking_time(&request.time)?;
        ensure_not_past(date.and_time(time), Utc::now().naive_utc())?;

        let provider = with_timeout(
            self.directory_timeout,
            "provider",
            self.providers.find_by_id(request.provider_id),
        )
        .await?
        .ok_or(ApiError::NotFound {
            resource: "Barber",
            id: request.provider_id.to_string(),
        })?;

        with_timeout(
            self.directory_timeout,
            "user",
            self.users.find_by_id(request.client_id),
        )
        .await?
        .ok_or(ApiError::NotFound {
            resource: "User",
            id: request.client_id.to_string(),
        })?;

        if !provider.offers(&request.service) {
            return Err(ApiError::Validation(format!(
                "Service '{}' is not offered by this provider",
                request.service
            )));
        }

        let mode_supported = match (provider.attendance, request.mode) {
            (AttendanceMode::Both, _) => true,
            (AttendanceMode::OnSite, ServiceMode::OnSite) => true,
            (AttendanceMode::AtClient, ServiceMode::AtClient) => true,
            _ => false,
        };
        if !mode_supported {
            return Err(ApiError::Validation(format!(
                "Provider does not attend {}",
                request.mode.as_str()
            )));
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            provider_id: request.provider_id,
            client_id: request.client_id,
            date,
            time,
            service: request.service,
            mode: request.mode,
            status: BookingStatus::Pending,
            cancelled_by: None,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(&booking).await?;

        tracing::info!(
            "Created booking {} for provider {} awaiting confirmation",
            booking.id,
            booking.provider_id
        );
        Ok(booking)
    }

    /// List bookings matching the filter, oldest first
    pub async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, ApiError> {
        self.repository.list(&filter).await
    }

    pub async fn find(&self, booking_id: Uuid) -> Result<Booking, ApiError> {
        self.repository
            .find_by_id(booking_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Booking",
                id: booking_id.to_string(),
            })
    }

    /// Apply a lifecycle event to a booking
    ///
    /// The status update is a compare-and-swap against the status observed
    /// here, so concurrent transitions on the same booking cannot both
    /// succeed. Penalty accrual for cancellation and no-show paths runs
    /// synchronously after the committed status change; its failure is
    /// reported as the distinct PenaltyAccrual error because the status
    /// change is already durable at that point.
    pub async fn transition(
        &self,
        booking_id: Uuid,
        event: BookingEvent,
        actor_id: Uuid,
    ) -> Result<Booking, ApiError> {
        let booking = self
            .repository
            .find_by_id(booking_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Booking",
                id: booking_id.to_string(),
            })?;

        let is_client = booking.client_id == actor_id;
        let is_provider = booking.provider_id == actor_id;
        if !is_client && !is_provider {
            return Err(ApiError::Forbidden(
                "Actor is neither the booking's client nor its provider".to_string(),
            ));
        }

        // Repeated cancellation is a no-op: report the current state and
        // accrue nothing
        if event == BookingEvent::Cancel && booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        match event {
            BookingEvent::Confirm if !is_provider => {
                return Err(ApiError::Forbidden(
                    "Only the booking's provider can confirm it".to_string(),
                ));
            }
            BookingEvent::Complete if !is_provider => {
                return Err(ApiError::Forbidden(
                    "Only the booking's provider can mark it completed".to_string(),
                ));
            }
            _ => {}
        }

        let next =
            StatusMachine::transition(booking.status, event).map_err(ApiError::InvalidTransition)?;

        let cancelled_by = (next == BookingStatus::Cancelled).then_some(actor_id);
        let updated = self
            .repository
            .update_status(booking_id, booking.status, next, cancelled_by)
            .await?;

        let updated = match updated {
            Some(updated) => updated,
            None => {
                // A concurrent writer got there first; report against the
                // state it left behind
                let current =
                    self.repository
                        .find_by_id(booking_id)
                        .await?
                        .ok_or(ApiError::NotFound {
                            resource: "Booking",
                            id: booking_id.to_string(),
                        })?;
                return Err(ApiError::InvalidTransition(format!(
                    "Booking {} was updated concurrently; its status is now {}",
                    booking_id, current.status
                )));
            }
        };

        tracing::info!(
            "Booking {} transitioned {} -> {} on {}",
            booking_id,
            booking.status,
            updated.status,
            event
        );

        match event {
            BookingEvent::Cancel
                if booking.status == BookingStatus::Confirmed
                    && self.within_cancellation_window(&booking, Utc::now().naive_utc()) =>
            {
                if is_provider {
                    self.accrue_booking_penalty(
                        &booking,
                        booking.provider_id,
                        PenaltyKind::BookingRejection,
                        self.policy.rejection_rate,
                        "Provider cancelled a confirmed booking inside the cancellation window",
                    )
                    .await?;
                } else {
                    self.accrue_booking_penalty(
                        &booking,
                        booking.client_id,
                        PenaltyKind::Other,
                        self.policy.late_cancellation_rate,
                        "Client cancelled a confirmed booking inside the cancellation window",
                    )
                    .await?;
                }
            }
            BookingEvent::NoShow => {
                // Penalize the counterparty of the reporting actor
                let subject_id = if is_provider {
                    booking.client_id
                } else {
                    booking.provider_id
                };
                self.accrue_booking_penalty(
                    &booking,
                    subject_id,
                    PenaltyKind::NoShow,
                    self.policy.no_show_rate,
                    "Party did not appear for a confirmed booking",
                )
                .await?;
            }
            _ => {}
        }

        Ok(updated)
    }

    /// Convenience cancellation wrapper over `transition`
    ///
    /// Idempotent: a booking that is already cancelled is returned as-is
    /// and no further penalty accrues.
    pub async fn cancel(&self, booking_id: Uuid, actor_id: Uuid) -> Result<Booking, ApiError> {
        self.transition(booking_id, BookingEvent::Cancel, actor_id)
            .await
    }

    fn within_cancellation_window(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        now >= booking.scheduled_at() - self.policy.cancellation_window
    }

    /// Price the violation off the provider's catalog and record it
    ///
    /// Called after the status change is committed; every failure in here
    /// maps to PenaltyAccrual so callers can tell the transition itself
    /// already applied.
    async fn accrue_booking_penalty(
        &self,
        booking: &Booking,
        subject_id: Uuid,
        kind: PenaltyKind,
        rate: Decimal,
        description: &str,
    ) -> Result<(), ApiError> {
        let price = with_timeout(
            self.directory_timeout,
            "provider",
            self.providers.price_of(booking.provider_id, &booking.service),
        )
        .await
        .map_err(|e| ApiError::PenaltyAccrual(e.to_string()))?;

        // A service dropped from the catalog still yields a record, just
        // with a zero amount
        let amount = price.map(|p| p * rate).unwrap_or(Decimal::ZERO);

        self.penalties
            .accrue(subject_id, kind, Some(description.to_string()), amount)
            .await
            .map_err(|e| ApiError::PenaltyAccrual(e.to_string()))?;

        Ok(())
    }
}
