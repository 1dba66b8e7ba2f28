//! Patient procedure record database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::PatientRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "patient_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub procedure: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PatientRecord {
    fn from(model: Model) -> Self {
        PatientRecord {
            id: model.id,
            patient_id: model.patient_id,
            clinic_id: model.clinic_id,
            procedure: model.procedure,
            created_at: model.created_at,
        }
    }
}
