//! X-ray database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{XrayMeta, XrayRecord};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "xrays")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_user_id: Uuid,
    pub url: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for XrayRecord {
    fn from(model: Model) -> Self {
        XrayRecord {
            id: model.id,
            patient_user_id: model.patient_user_id,
            url: model.url,
            meta: XrayMeta {
                original_name: model.original_name,
                mime_type: model.mime_type,
                size: model.size,
            },
            created_at: model.created_at,
        }
    }
}
