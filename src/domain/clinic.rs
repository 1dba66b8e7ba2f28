//! Clinic domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserSummary;

/// Geographic coordinates for map display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Clinic domain entity.
///
/// `owner_id` is the authorization anchor: every non-admin mutation
/// compares it against the caller's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub description: String,
    pub image: String,
    pub owner_id: Option<Uuid>,
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Clinic creation request (admin)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateClinic {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Owner account to attach; auto-provisioned with a temporary
    /// password when no matching user exists.
    pub owner_email: String,
    #[serde(default)]
    pub owner_full_name: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Clinic update request (owner edits own clinic; absent fields keep
/// their current values)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateClinic {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub location: Option<GeoPoint>,
}

/// Clinic response with owner summary embedded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClinicResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl ClinicResponse {
    pub fn new(clinic: Clinic, owner: Option<UserSummary>) -> Self {
        Self {
            id: clinic.id,
            name: clinic.name,
            email: clinic.email,
            address: clinic.address,
            phone: clinic.phone,
            description: clinic.description,
            image: clinic.image,
            owner,
            location: clinic.location,
            created_at: clinic.created_at,
        }
    }
}

/// Abbreviated clinic info embedded in appointment responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClinicSummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub image: String,
}

impl From<&Clinic> for ClinicSummary {
    fn from(clinic: &Clinic) -> Self {
        Self {
            id: clinic.id,
            name: clinic.name.clone(),
            address: clinic.address.clone(),
            phone: clinic.phone.clone(),
            image: clinic.image.clone(),
        }
    }
}
