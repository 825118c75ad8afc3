// Validation utilities module
// Provides custom validation functions for domain-specific rules

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::error::ApiError;

/// Parse a booking date in ISO format (YYYY-MM-DD)
pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("'{}' is not a valid date (YYYY-MM-DD)", raw)))
}

/// Parse a booking time-of-day (HH:MM or HH:MM:SS)
pub fn parse_booking_time(raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ApiError::Validation(format!("'{}' is not a valid time (HH:MM)", raw)))
}

/// Reject schedules that already elapsed at creation time
pub fn ensure_not_past(scheduled: NaiveDateTime, now: NaiveDateTime) -> Result<(), ApiError> {
    if scheduled < now {
        return Err(ApiError::Validation(format!(
            "Scheduled time {} is in the past",
            scheduled
        )));
    }
    Ok(())
}

/// Validates that a monetary amount is non-negative (for Decimal fields)
pub fn validate_non_negative_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        Err(ValidationError::new("amount_must_be_non_negative"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_booking_date_accepts_iso() {
        assert_eq!(
            parse_booking_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_booking_date_rejects_garbage() {
        assert!(parse_booking_date("01/06/2024").is_err());
        assert!(parse_booking_date("2024-13-40").is_err());
        assert!(parse_booking_date("").is_err());
    }

    #[test]
    fn test_parse_booking_time_accepts_both_precisions() {
        assert_eq!(
            parse_booking_time("10:00").unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_booking_time("10:30:15").unwrap(),
            NaiveTime::from_hms_opt(10, 30, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_booking_time_rejects_out_of_range() {
        assert!(parse_booking_time("25:00").is_err());
        assert!(parse_booking_time("noon").is_err());
    }

    #[test]
    fn test_ensure_not_past() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(ensure_not_past(now, now).is_ok());
        assert!(ensure_not_past(now + chrono::Duration::hours(1), now).is_ok());
        assert!(ensure_not_past(now - chrono::Duration::minutes(1), now).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(&dec!(0)).is_ok());
        assert!(validate_non_negative_amount(&dec!(12.50)).is_ok());
        assert!(validate_non_negative_amount(&dec!(-0.01)).is_err());
    }
}
