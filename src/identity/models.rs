use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role of a user account in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Provider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Provider => "provider",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "provider" => Ok(Role::Provider),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Where a provider renders their services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMode {
    OnSite,
    AtClient,
    Both,
}

impl AttendanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceMode::OnSite => "on_site",
            AttendanceMode::AtClient => "at_client",
            AttendanceMode::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "on_site" => Ok(AttendanceMode::OnSite),
            "at_client" => Ok(AttendanceMode::AtClient),
            "both" => Ok(AttendanceMode::Both),
            _ => Err(format!("Invalid attendance mode: {}", s)),
        }
    }
}

/// A priced entry in a provider's service catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceOffering {
    pub name: String,
    #[schema(value_type = String)]
    pub price: Decimal,
}

/// Provider profile, owned by the identity store
///
/// The core reads providers for validation, pricing, and display joins;
/// it never writes them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Provider {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Ordered service catalog with base prices
    pub services: Vec<ServiceOffering>,
    pub attendance: AttendanceMode,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl Provider {
    /// Whether the catalog contains the named service
    pub fn offers(&self, service: &str) -> bool {
        self.services.iter().any(|s| s.name == service)
    }

    /// Catalog base price for the named service
    pub fn price_of(&self, service: &str) -> Option<Decimal> {
        self.services
            .iter()
            .find(|s| s.name == service)
            .map(|s| s.price)
    }
}

/// User account, owned by the identity store
///
/// The credential is opaque to the core and never serialized outward.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
