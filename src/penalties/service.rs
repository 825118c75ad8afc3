use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ApiError;
use crate::penalties::{Penalty, PenaltyKind, PenaltyRepository};

/// Service translating lifecycle violations into immutable penalty records
#[derive(Clone)]
pub struct PenaltyService {
    repository: Arc<dyn PenaltyRepository>,
}

impl PenaltyService {
    pub fn new(repository: Arc<dyn PenaltyRepository>) -> Self {
        Self { repository }
    }

    /// Record a violation against a subject
    ///
    /// No deduplication: every violation produces one record. The caller
    /// decides whether a violation occurred; this service only validates
    /// and persists it. A storage failure is surfaced, never swallowed.
    pub async fn accrue(
        &self,
        subject_id: Uuid,
        kind: PenaltyKind,
        description: Option<String>,
        amount: Decimal,
    ) -> Result<Penalty, ApiError> {
        if amount.is_sign_negative() {
            return Err(ApiError::Validation(format!(
                "Penalty amount must be non-negative, got {}",
                amount
            )));
        }

        let penalty = Penalty {
            id: Uuid::new_v4(),
            subject_id,
            kind,
            description,
            amount,
            created_at: Utc::now(),
        };

        self.repository.insert(&penalty).await?;

        tracing::info!(
            "Accrued {} penalty of {} against subject {}",
            kind,
            amount,
            subject_id
        );
        Ok(penalty)
    }

    /// All penalties for a subject, oldest first
    pub async fn list_for(&self, subject_id: Uuid) -> Result<Vec<Penalty>, ApiError> {
        self.repository.list_for(subject_id).await
    }

    /// Total penalty exposure for a subject; zero when there is none
    pub async fn total_for(&self, subject_id: Uuid) -> Result<Decimal, ApiError> {
        self.repository.total_for(subject_id).await
    }
}
