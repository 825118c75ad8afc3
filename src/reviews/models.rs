use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Domain model representing a provider review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub provider_id: Uuid,
    #[schema(value_type = String)]
    pub client_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    /// Hidden reviews stay stored but are excluded from public listings
    pub visible: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating a new review
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[schema(value_type = String)]
    pub provider_id: Uuid,
    #[schema(value_type = String)]
    pub client_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 1000, message = "Comment must not exceed 1000 characters"))]
    pub comment: Option<String>,
}

/// Request DTO for moderating a review's visibility
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetVisibilityRequest {
    #[schema(value_type = String)]
    pub actor_id: Uuid,
    pub visible: bool,
}

/// Query parameters for listing a provider's reviews
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReviewQuery {
    #[param(value_type = String)]
    pub provider_id: Uuid,
    /// Maximum number of reviews to return
    pub limit: Option<i64>,
    /// Number of reviews to skip, for pagination
    pub offset: Option<i64>,
}

/// Query parameter carrying the acting user for moderation endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct ModerationParams {
    #[param(value_type = String)]
    pub actor_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn request(rating: i16) -> CreateReviewRequest {
        CreateReviewRequest {
            provider_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            rating,
            comment: None,
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(request(1).validate().is_ok());
        assert!(request(5).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(6).validate().is_err());
    }

    #[test]
    fn test_comment_length_limit() {
        let mut r = request(4);
        r.comment = Some("a".repeat(1000));
        assert!(r.validate().is_ok());
        r.comment = Some("a".repeat(1001));
        assert!(r.validate().is_err());
    }
}
