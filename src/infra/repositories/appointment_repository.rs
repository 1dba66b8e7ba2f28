//! Appointment repository - persistence for the appointment lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::appointment::{self, Entity as AppointmentEntity};
use crate::domain::{Appointment, AppointmentStatus, CompletionDetails};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Data required to insert an appointment row.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub clinic_id: Uuid,
    pub patient_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub note: String,
    pub status: AppointmentStatus,
}

/// Appointment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>>;

    async fn create(&self, data: NewAppointment) -> AppResult<Appointment>;

    /// Write the full row back from a domain entity (admin update path;
    /// lifecycle rules are enforced by the caller on the domain entity).
    async fn save(&self, appointment: Appointment) -> AppResult<Appointment>;

    /// Conditional finalize: sets status=done, stamps `completed_at` and
    /// overwrites the completion fields, but only while the row's status
    /// is still non-terminal. Returns false when the guard did not match
    /// (the appointment was already done, possibly via a concurrent
    /// finalize).
    async fn finalize(
        &self,
        id: Uuid,
        details: CompletionDetails,
        completed_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// A patient's own appointments, newest first.
    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>>;

    /// Appointments across a set of clinics (owner view), newest first.
    async fn list_by_clinics(&self, clinic_ids: Vec<Uuid>) -> AppResult<Vec<Appointment>>;

    /// Paginated admin listing with optional status filter.
    async fn list(
        &self,
        status: Option<AppointmentStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Appointment>, u64)>;
}

/// SeaORM-backed appointment store.
pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        let result = AppointmentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Appointment::from))
    }

    async fn create(&self, data: NewAppointment) -> AppResult<Appointment> {
        let now = chrono::Utc::now();
        let active_model = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            clinic_id: Set(data.clinic_id),
            patient_id: Set(data.patient_id),
            date_time: Set(data.date_time),
            note: Set(data.note),
            status: Set(data.status.as_str().to_string()),
            doctor_name: Set(None),
            tooth: Set(None),
            performed_work: Set(None),
            price: Set(None),
            recommendations: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Appointment::from(model))
    }

    async fn save(&self, appt: Appointment) -> AppResult<Appointment> {
        let active_model = appointment::ActiveModel {
            id: Set(appt.id),
            clinic_id: Set(appt.clinic_id),
            patient_id: Set(appt.patient_id),
            date_time: Set(appt.date_time),
            note: Set(appt.note),
            status: Set(appt.status.as_str().to_string()),
            doctor_name: Set(appt.details.doctor_name),
            tooth: Set(appt.details.tooth),
            performed_work: Set(appt.details.performed_work),
            price: Set(appt.details.price),
            recommendations: Set(appt.details.recommendations),
            completed_at: Set(appt.completed_at),
            created_at: Set(appt.created_at),
            updated_at: Set(chrono::Utc::now()),
        };

        let model = active_model.update(&self.db).await.map_err(AppError::from)?;
        Ok(Appointment::from(model))
    }

    async fn finalize(
        &self,
        id: Uuid,
        details: CompletionDetails,
        completed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        // Compare-and-swap on status: a concurrent finalize loses the race
        // instead of silently overwriting a completed appointment.
        let result = AppointmentEntity::update_many()
            .col_expr(
                appointment::Column::Status,
                AppointmentStatus::Done.as_str().into(),
            )
            .col_expr(appointment::Column::DoctorName, details.doctor_name.into())
            .col_expr(appointment::Column::Tooth, details.tooth.into())
            .col_expr(
                appointment::Column::PerformedWork,
                details.performed_work.into(),
            )
            .col_expr(appointment::Column::Price, details.price.into())
            .col_expr(
                appointment::Column::Recommendations,
                details.recommendations.into(),
            )
            .col_expr(appointment::Column::CompletedAt, Some(completed_at).into())
            .col_expr(appointment::Column::UpdatedAt, completed_at.into())
            .filter(appointment::Column::Id.eq(id))
            .filter(appointment::Column::Status.ne(AppointmentStatus::Done.as_str()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AppointmentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .filter(appointment::Column::PatientId.eq(patient_id))
            .order_by_desc(appointment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Appointment::from).collect())
    }

    async fn list_by_clinics(&self, clinic_ids: Vec<Uuid>) -> AppResult<Vec<Appointment>> {
        if clinic_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = AppointmentEntity::find()
            .filter(appointment::Column::ClinicId.is_in(clinic_ids))
            .order_by_desc(appointment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Appointment::from).collect())
    }

    async fn list(
        &self,
        status: Option<AppointmentStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Appointment>, u64)> {
        let mut cond = Condition::all();
        if let Some(status) = status {
            cond = cond.add(appointment::Column::Status.eq(status.as_str()));
        }

        let total = AppointmentEntity::find()
            .filter(cond.clone())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = AppointmentEntity::find()
            .filter(cond)
            .order_by_desc(appointment::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Appointment::from).collect(), total))
    }
}
