use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Booking status enum representing the reservation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Parse status from string
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle event applied to a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingEvent {
    /// Provider accepts a pending booking
    Confirm,
    /// Either party cancels
    Cancel,
    /// Service was rendered
    Complete,
    /// Counterparty of the reporting actor did not appear
    NoShow,
}

impl std::fmt::Display for BookingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingEvent::Confirm => "confirm",
            BookingEvent::Cancel => "cancel",
            BookingEvent::Complete => "complete",
            BookingEvent::NoShow => "no_show",
        };
        write!(f, "{}", s)
    }
}

/// Delivery mode of a booked service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceMode {
    OnSite,
    AtClient,
}

impl ServiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::OnSite => "on_site",
            ServiceMode::AtClient => "at_client",
        }
    }
}

/// Domain model representing a booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub provider_id: Uuid,
    #[schema(value_type = String)]
    pub client_id: Uuid,
    #[schema(value_type = String)]
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub time: NaiveTime,
    pub service: String,
    pub mode: ServiceMode,
    pub status: BookingStatus,
    /// Party that cancelled, when status is cancelled
    #[schema(value_type = Option<String>)]
    pub cancelled_by: Option<Uuid>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Scheduled calendar date and time-of-day combined
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Request DTO for creating a booking
///
/// Date and time arrive as strings and go through explicit parse/range
/// checks so malformed values yield a 400 rather than a deserialization
/// failure.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[schema(value_type = String)]
    pub provider_id: Uuid,
    #[schema(value_type = String)]
    pub client_id: Uuid,
    /// Calendar date, YYYY-MM-DD
    pub date: String,
    /// Time of day, HH:MM
    pub time: String,
    #[validate(length(min = 1, message = "Service name must not be empty"))]
    pub service: String,
    pub mode: ServiceMode,
}

/// Request DTO for applying a lifecycle event
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionRequest {
    pub event: BookingEvent,
    #[schema(value_type = String)]
    pub actor_id: Uuid,
}

/// Filter for booking listings
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct BookingFilter {
    /// Restrict to one provider's bookings
    pub provider_id: Option<Uuid>,
    /// Restrict to one client's bookings
    pub client_id: Option<Uuid>,
}

impl BookingFilter {
    pub fn for_provider(provider_id: Uuid) -> Self {
        Self {
            provider_id: Some(provider_id),
            client_id: None,
        }
    }

    pub fn for_client(client_id: Uuid) -> Self {
        Self {
            provider_id: None,
            client_id: Some(client_id),
        }
    }

    /// Whether a booking matches every set field
    pub fn matches(&self, booking: &Booking) -> bool {
        self.provider_id.map_or(true, |p| booking.provider_id == p)
            && self.client_id.map_or(true, |c| booking.client_id == c)
    }
}

/// Query parameters for the cancellation shortcut
#[derive(Debug, Deserialize, IntoParams)]
pub struct CancelParams {
    pub actor_id: Uuid,
}
