use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::bookings::{BookingFilter, BookingRepository, BookingStatus};
use crate::dashboard::ProviderSummary;
use crate::error::ApiError;
use crate::identity::{with_timeout, ProviderDirectory};
use crate::penalties::PenaltyService;

/// Read-only aggregation over the booking and penalty stores
#[derive(Clone)]
pub struct DashboardService {
    bookings: Arc<dyn BookingRepository>,
    penalties: PenaltyService,
    providers: Arc<dyn ProviderDirectory>,
    directory_timeout: Duration,
}

impl DashboardService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        penalties: PenaltyService,
        providers: Arc<dyn ProviderDirectory>,
        directory_timeout: Duration,
    ) -> Self {
        Self {
            bookings,
            penalties,
            providers,
            directory_timeout,
        }
    }

    /// Compute the activity summary for a provider
    ///
    /// Counts every booking regardless of status; revenue covers completed
    /// bookings only, priced off the provider's current catalog. A service
    /// no longer in the catalog contributes zero. An unknown provider
    /// yields an all-zero summary rather than an error.
    pub async fn summarize(&self, provider_id: Uuid) -> Result<ProviderSummary, ApiError> {
        let bookings = self
            .bookings
            .list(&BookingFilter::for_provider(provider_id))
            .await?;

        let mut revenue = Decimal::ZERO;
        for booking in bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
        {
            let price = with_timeout(
                self.directory_timeout,
                "provider",
                self.providers.price_of(provider_id, &booking.service),
            )
            .await?;
            revenue += price.unwrap_or(Decimal::ZERO);
        }

        let penalty_total = self.penalties.total_for(provider_id).await?;

        Ok(ProviderSummary {
            provider_id,
            booking_count: bookings.len(),
            revenue,
            penalty_total,
        })
    }
}
