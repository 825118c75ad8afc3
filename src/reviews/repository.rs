// Review persistence

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::reviews::Review;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ApiError>;

    /// Visible reviews for a provider, oldest first, with optional paging
    async fn list_visible_for_provider(
        &self,
        provider_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Review>, ApiError>;

    /// Returns the updated review, or None if it does not exist
    async fn set_visibility(&self, id: Uuid, visible: bool) -> Result<Option<Review>, ApiError>;

    /// Returns true if a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for review operations backed by PostgreSQL
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REVIEW_COLUMNS: &str = "id, provider_id, client_id, rating, comment, visible, created_at";

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, provider_id, client_id, rating, comment, visible, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(review.id)
        .bind(review.provider_id)
        .bind(review.client_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.visible)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ApiError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE id = $1",
            REVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn list_visible_for_provider(
        &self,
        provider_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Review>, ApiError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {}
            FROM reviews
            WHERE provider_id = $1 AND visible = TRUE
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#,
            REVIEW_COLUMNS
        ))
        .bind(provider_id)
        .bind(limit.unwrap_or(i64::MAX))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn set_visibility(&self, id: Uuid, visible: bool) -> Result<Option<Review>, ApiError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "UPDATE reviews SET visible = $1 WHERE id = $2 RETURNING {}",
            REVIEW_COLUMNS
        ))
        .bind(visible)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory review repository implementing the same contract
#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<HashMap<Uuid, Review>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ApiError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| ApiError::Storage("review store lock poisoned".into()))?;
        reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ApiError> {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| ApiError::Storage("review store lock poisoned".into()))?;
        Ok(reviews.get(&id).cloned())
    }

    async fn list_visible_for_provider(
        &self,
        provider_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Review>, ApiError> {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| ApiError::Storage("review store lock poisoned".into()))?;
        let mut matched: Vec<Review> = reviews
            .values()
            .filter(|r| r.provider_id == provider_id && r.visible)
            .cloned()
            .collect();
        matched.sort_by_key(|r| (r.created_at, r.id));

        let offset = offset.unwrap_or(0).max(0) as usize;
        let limit = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn set_visibility(&self, id: Uuid, visible: bool) -> Result<Option<Review>, ApiError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| ApiError::Storage("review store lock poisoned".into()))?;
        match reviews.get_mut(&id) {
            Some(review) => {
                review.visible = visible;
                Ok(Some(review.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| ApiError::Storage("review store lock poisoned".into()))?;
        Ok(reviews.remove(&id).is_some())
    }
}
