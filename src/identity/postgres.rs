// PostgreSQL-backed identity directories
//
// These read the identity schema (users, barbers, barber_services) that
// the external identity service maintains.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::{
    AttendanceMode, Provider, ProviderDirectory, Role, ServiceOffering, User, UserDirectory,
};

#[derive(FromRow)]
struct BarberRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    attendance: String,
    description: Option<String>,
    image_urls: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ServiceRow {
    name: String,
    price: Decimal,
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

/// Provider directory backed by the identity schema in PostgreSQL
#[derive(Clone)]
pub struct PgProviderDirectory {
    pool: PgPool,
}

impl PgProviderDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_services(&self, barber_id: Uuid) -> Result<Vec<ServiceOffering>, ApiError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT name, price
            FROM barber_services
            WHERE barber_id = $1
            ORDER BY position
            "#,
        )
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ServiceOffering {
                name: row.name,
                price: row.price,
            })
            .collect())
    }

    fn assemble(row: BarberRow, services: Vec<ServiceOffering>) -> Result<Provider, ApiError> {
        let attendance = AttendanceMode::parse(&row.attendance)
            .map_err(|e| ApiError::Storage(format!("corrupt barber record {}: {}", row.id, e)))?;

        Ok(Provider {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            services,
            attendance,
            description: row.description,
            image_urls: row.image_urls,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ProviderDirectory for PgProviderDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Provider>, ApiError> {
        let row = sqlx::query_as::<_, BarberRow>(
            r#"
            SELECT id, name, email, phone, attendance, description, image_urls, created_at
            FROM barbers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let services = self.load_services(row.id).await?;
                Ok(Some(Self::assemble(row, services)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Provider>, ApiError> {
        let rows = sqlx::query_as::<_, BarberRow>(
            r#"
            SELECT id, name, email, phone, attendance, description, image_urls, created_at
            FROM barbers
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut providers = Vec::with_capacity(rows.len());
        for row in rows {
            let services = self.load_services(row.id).await?;
            providers.push(Self::assemble(row, services)?);
        }
        Ok(providers)
    }

    async fn price_of(
        &self,
        provider_id: Uuid,
        service: &str,
    ) -> Result<Option<Decimal>, ApiError> {
        let price: Option<Decimal> = sqlx::query_scalar(
            "SELECT price FROM barber_services WHERE barber_id = $1 AND name = $2",
        )
        .bind(provider_id)
        .bind(service)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price)
    }
}

/// User directory backed by the identity schema in PostgreSQL
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, phone, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let role = Role::parse(&row.role).map_err(|e| {
                    ApiError::Storage(format!("corrupt user record {}: {}", row.id, e))
                })?;
                Ok(Some(User {
                    id: row.id,
                    name: row.name,
                    email: row.email,
                    phone: row.phone,
                    password_hash: row.password_hash,
                    role,
                    created_at: row.created_at,
                }))
            }
            None => Ok(None),
        }
    }
}
