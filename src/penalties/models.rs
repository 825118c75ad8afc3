use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_non_negative_amount;

/// Kind of recorded violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    LateArrival,
    BookingRejection,
    NoShow,
    Other,
}

impl PenaltyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PenaltyKind::LateArrival => "late_arrival",
            PenaltyKind::BookingRejection => "booking_rejection",
            PenaltyKind::NoShow => "no_show",
            PenaltyKind::Other => "other",
        }
    }
}

impl std::fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable record of a violation charged against a client or provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Penalty {
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Client or provider the penalty is charged against
    #[schema(value_type = String)]
    pub subject_id: Uuid,
    pub kind: PenaltyKind,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub amount: Decimal,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Request DTO for administrative penalty accrual
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AccruePenaltyRequest {
    /// Administrator performing the accrual
    #[schema(value_type = String)]
    pub actor_id: Uuid,
    #[schema(value_type = String)]
    pub subject_id: Uuid,
    pub kind: PenaltyKind,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative_amount")]
    #[schema(value_type = String)]
    pub amount: Decimal,
}

/// Query parameters for penalty listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct PenaltyQuery {
    pub subject_id: Uuid,
}
