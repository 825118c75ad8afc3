// Application configuration loaded from environment variables

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use rust_decimal::Decimal;

/// Penalty accrual policy applied by the booking lifecycle engine
///
/// A cancellation of a confirmed booking within `cancellation_window` of
/// the scheduled date/time accrues a penalty. Amounts are the provider's
/// catalog price for the booked service scaled by the matching rate.
#[derive(Debug, Clone)]
pub struct PenaltyPolicy {
    /// Lead-time window before the scheduled time in which a cancellation
    /// counts as late
    pub cancellation_window: ChronoDuration,
    /// Rate charged to a client cancelling late
    pub late_cancellation_rate: Decimal,
    /// Rate charged to a provider rejecting a confirmed booking
    pub rejection_rate: Decimal,
    /// Rate charged to the non-appearing party on a no-show
    pub no_show_rate: Decimal,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            cancellation_window: ChronoDuration::hours(12),
            late_cancellation_rate: Decimal::new(10, 2),
            // Rejections are tracked but carry no monetary charge by default
            rejection_rate: Decimal::ZERO,
            no_show_rate: Decimal::new(50, 2),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Bound on identity-store lookups; elapsing maps to UpstreamUnavailable
    pub directory_timeout: Duration,
    pub penalty_policy: PenaltyPolicy,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// DATABASE_URL is required; everything else has a default.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in environment".to_string())?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| format!("PORT must be a valid port number: {}", e))?;

        let directory_timeout_ms = env_parse("DIRECTORY_TIMEOUT_MS", 2_000u64)?;

        let mut policy = PenaltyPolicy::default();
        policy.cancellation_window =
            ChronoDuration::hours(env_parse("CANCELLATION_WINDOW_HOURS", 12i64)?);
        policy.late_cancellation_rate =
            env_parse("LATE_CANCELLATION_RATE", policy.late_cancellation_rate)?;
        policy.rejection_rate = env_parse("REJECTION_RATE", policy.rejection_rate)?;
        policy.no_show_rate = env_parse("NO_SHOW_RATE", policy.no_show_rate)?;

        Ok(Self {
            database_url,
            host,
            port,
            directory_timeout: Duration::from_millis(directory_timeout_ms),
            penalty_policy: policy,
        })
    }
}

/// Parse an optional environment variable, keeping the default when unset
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| format!("{} is not valid: {}", name, e)),
        Err(_) => Ok(default),
    }
}
