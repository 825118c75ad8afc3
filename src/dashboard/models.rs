use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Aggregated activity snapshot for one provider
///
/// Computed on demand from the booking and penalty stores; nothing here
/// is cached or persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProviderSummary {
    #[schema(value_type = String)]
    pub provider_id: Uuid,
    /// Every booking ever addressed to the provider, any status
    pub booking_count: usize,
    /// Catalog prices of completed bookings only
    #[schema(value_type = String)]
    pub revenue: Decimal,
    /// Sum of penalty amounts accrued against the provider
    #[schema(value_type = String)]
    pub penalty_total: Decimal,
}
