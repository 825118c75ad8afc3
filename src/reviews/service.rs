use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::identity::{with_timeout, ProviderDirectory, Role, UserDirectory};
use crate::reviews::{CreateReviewRequest, Review, ReviewRepository};

/// Service layer for review business logic
///
/// Reviews are written by clients against providers. Moderation actions
/// (hiding and deleting) are reserved for administrators.
#[derive(Clone)]
pub struct ReviewService {
    repository: Arc<dyn ReviewRepository>,
    providers: Arc<dyn ProviderDirectory>,
    users: Arc<dyn UserDirectory>,
    directory_timeout: Duration,
}

impl ReviewService {
    pub fn new(
        repository: Arc<dyn ReviewRepository>,
        providers: Arc<dyn ProviderDirectory>,
        users: Arc<dyn UserDirectory>,
        directory_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            providers,
            users,
            directory_timeout,
        }
    }

    /// Create a new review, visible by default
    ///
    /// The creation timestamp is always assigned here; callers cannot
    /// backdate or forward-date a review.
    pub async fn create(&self, request: CreateReviewRequest) -> Result<Review, ApiError> {
        request
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        with_timeout(
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

        let review = Review {
            id: Uuid::new_v4(),
            provider_id: request.provider_id,
            client_id: request.client_id,
            rating: request.rating,
            comment: request.comment,
            visible: true,
            created_at: Utc::now(),
        };

        self.repository.insert(&review).await?;

        tracing::info!(
            "Created review {} for provider {} with rating {}",
            review.id,
            review.provider_id,
            review.rating
        );
        Ok(review)
    }

    /// Publicly visible reviews for a provider, oldest first
    pub async fn list_for_provider(
        &self,
        provider_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Review>, ApiError> {
        if let Some(limit) = limit {
            if limit < 0 {
                return Err(ApiError::Validation("limit must be non-negative".into()));
            }
        }
        if let Some(offset) = offset {
            if offset < 0 {
                return Err(ApiError::Validation("offset must be non-negative".into()));
            }
        }
        self.repository
            .list_visible_for_provider(provider_id, limit, offset)
            .await
    }

    /// Hide or restore a review; administrators only
    pub async fn set_visibility(
        &self,
        review_id: Uuid,
        actor_id: Uuid,
        visible: bool,
    ) -> Result<Review, ApiError> {
        self.require_admin(actor_id).await?;

        let review = self
            .repository
            .set_visibility(review_id, visible)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Review",
                id: review_id.to_string(),
            })?;

        tracing::info!(
            "Review {} visibility set to {} by {}",
            review_id,
            visible,
            actor_id
        );
        Ok(review)
    }

    /// Permanently remove a review; administrators only
    pub async fn delete(&self, review_id: Uuid, actor_id: Uuid) -> Result<(), ApiError> {
        self.require_admin(actor_id).await?;

        if !self.repository.delete(review_id).await? {
            return Err(ApiError::NotFound {
                resource: "Review",
                id: review_id.to_string(),
            });
        }

        tracing::warn!("Review {} deleted by administrator {}", review_id, actor_id);
        Ok(())
    }

    async fn require_admin(&self, actor_id: Uuid) -> Result<(), ApiError> {
        let actor = with_timeout(
            self.directory_timeout,
            "user",
            self.users.find_by_id(actor_id),
        )
        .await?
        .ok_or(ApiError::NotFound {
            resource: "User",
            id: actor_id.to_string(),
        })?;

        if actor.role != Role::Admin {
            return Err(ApiError::Forbidden(
                "Only administrators can moderate reviews".to_string(),
            ));
        }
        Ok(())
    }
}
