// Penalty persistence
//
// Append-only store; records are never updated once written.

use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::penalties::Penalty;

#[async_trait]
pub trait PenaltyRepository: Send + Sync {
    async fn insert(&self, penalty: &Penalty) -> Result<(), ApiError>;

    /// All penalties for a subject, ordered by created_at ascending
    async fn list_for(&self, subject_id: Uuid) -> Result<Vec<Penalty>, ApiError>;

    /// Sum of amounts for a subject; zero when the subject has none
    async fn total_for(&self, subject_id: Uuid) -> Result<Decimal, ApiError>;
}

/// Repository for penalty operations backed by PostgreSQL
#[derive(Clone)]
pub struct PgPenaltyRepository {
    pool: PgPool,
}

impl PgPenaltyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PenaltyRepository for PgPenaltyRepository {
    async fn insert(&self, penalty: &Penalty) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO penalties (id, subject_id, kind, description, amount, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(penalty.id)
        .bind(penalty.subject_id)
        .bind(penalty.kind)
        .bind(&penalty.description)
        .bind(penalty.amount)
        .bind(penalty.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for(&self, subject_id: Uuid) -> Result<Vec<Penalty>, ApiError> {
        let penalties = sqlx::query_as::<_, Penalty>(
            r#"
            SELECT id, subject_id, kind, description, amount, created_at
            FROM penalties
            WHERE subject_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(penalties)
    }

    async fn total_for(&self, subject_id: Uuid) -> Result<Decimal, ApiError> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM penalties WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

/// In-memory penalty repository implementing the same contract
#[derive(Default)]
pub struct InMemoryPenaltyRepository {
    penalties: RwLock<Vec<Penalty>>,
}

impl InMemoryPenaltyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PenaltyRepository for InMemoryPenaltyRepository {
    async fn insert(&self, penalty: &Penalty) -> Result<(), ApiError> {
        let mut penalties = self
            .penalties
            .write()
            .map_err(|_| ApiError::Storage("penalty store lock poisoned".into()))?;
        penalties.push(penalty.clone());
        Ok(())
    }

    async fn list_for(&self, subject_id: Uuid) -> Result<Vec<Penalty>, ApiError> {
        let penalties = self
            .penalties
            .read()
            .map_err(|_| ApiError::Storage("penalty store lock poisoned".into()))?;
        let mut matched: Vec<Penalty> = penalties
            .iter()
            .filter(|p| p.subject_id == subject_id)
            .cloned()
            .collect();
        matched.sort_by_key(|p| (p.created_at, p.id));
        Ok(matched)
    }

    async fn total_for(&self, subject_id: Uuid) -> Result<Decimal, ApiError> {
        let penalties = self.list_for(subject_id).await?;
        Ok(penalties.iter().map(|p| p.amount).sum())
    }
}
