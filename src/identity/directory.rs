// Identity store boundary
//
// The core consumes user and provider profiles through these traits; the
// identity service owns the records. Callers wrap every lookup in
// `with_timeout` so a slow collaborator surfaces as UpstreamUnavailable
// instead of hanging a request.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::{Provider, User};

/// Read access to provider profiles and their price catalogs
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Provider>, ApiError>;

    async fn list(&self) -> Result<Vec<Provider>, ApiError>;

    /// Pricing capability used by penalty accrual and dashboard revenue
    async fn price_of(&self, provider_id: Uuid, service: &str)
        -> Result<Option<Decimal>, ApiError>;
}

/// Read access to user accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
}

/// Apply a bounded timeout to an identity-store lookup
///
/// A timeout is surfaced as a retryable UpstreamUnavailable failure, never
/// silently treated as success or failure-to-find.
pub async fn with_timeout<T, F>(limit: Duration, what: &str, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{} lookup exceeded {:?}", what, limit);
            Err(ApiError::UpstreamUnavailable(format!(
                "{} lookup timed out",
                what
            )))
        }
    }
}
