//! Appointment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Appointment, AppointmentStatus, CompletionDetails};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub patient_id: Uuid,
    pub date_time: DateTimeUtc,
    pub note: String,
    pub status: String,
    pub doctor_name: Option<String>,
    pub tooth: Option<String>,
    pub performed_work: Option<String>,
    pub price: Option<f64>,
    pub recommendations: Option<String>,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Appointment {
    fn from(model: Model) -> Self {
        Appointment {
            id: model.id,
            clinic_id: model.clinic_id,
            patient_id: model.patient_id,
            date_time: model.date_time,
            note: model.note,
            status: AppointmentStatus::from(model.status.as_str()),
            details: CompletionDetails {
                doctor_name: model.doctor_name,
                tooth: model.tooth,
                performed_work: model.performed_work,
                price: model.price,
                recommendations: model.recommendations,
            },
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
