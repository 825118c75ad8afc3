// In-memory identity directories
//
// Same contract as the PostgreSQL implementations; used by tests and by
// embedded deployments without an identity database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::{Provider, ProviderDirectory, User, UserDirectory};

/// In-memory provider directory
#[derive(Default)]
pub struct InMemoryProviderDirectory {
    providers: RwLock<HashMap<Uuid, Provider>>,
}

impl InMemoryProviderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a provider profile
    pub fn insert(&self, provider: Provider) {
        self.providers
            .write()
            .expect("provider directory lock poisoned")
            .insert(provider.id, provider);
    }
}

#[async_trait]
impl ProviderDirectory for InMemoryProviderDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Provider>, ApiError> {
        let providers = self
            .providers
            .read()
            .map_err(|_| ApiError::Storage("provider directory lock poisoned".into()))?;
        Ok(providers.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Provider>, ApiError> {
        let providers = self
            .providers
            .read()
            .map_err(|_| ApiError::Storage("provider directory lock poisoned".into()))?;
        let mut all: Vec<Provider> = providers.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        Ok(all)
    }

    async fn price_of(
        &self,
        provider_id: Uuid,
        service: &str,
    ) -> Result<Option<Decimal>, ApiError> {
        Ok(self
            .find_by_id(provider_id)
            .await?
            .and_then(|p| p.price_of(service)))
    }
}

/// In-memory user directory
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user account
    pub fn insert(&self, user: User) {
        self.users
            .write()
            .expect("user directory lock poisoned")
            .insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let users = self
            .users
            .read()
            .map_err(|_| ApiError::Storage("user directory lock poisoned".into()))?;
        Ok(users.get(&id).cloned())
    }
}
