//! Clinic database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Clinic, GeoPoint};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clinics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
    pub phone: String,
    pub description: String,
    pub image: String,
    /// Authorization anchor: user with role=owner
    pub owner_id: Option<Uuid>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Clinic {
    fn from(model: Model) -> Self {
        let location = match (model.location_lat, model.location_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        Clinic {
            id: model.id,
            name: model.name,
            email: model.email,
            address: model.address,
            phone: model.phone,
            description: model.description,
            image: model.image,
            owner_id: model.owner_id,
            location,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
