//! Appointment service - booking, lifecycle transitions and listings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    authorize, Action, Appointment, AppointmentResponse, AppointmentStatus, BookAppointment,
    Clinic, ClinicSummary, CompletionDetails, Identity, PatientRecordResponse, UserSummary,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewAppointment;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Admin-side appointment update request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AdminUpdateAppointment {
    /// New status; forward moves only
    #[schema(example = "processing")]
    pub status: Option<String>,
    /// New slot, RFC 3339
    pub date_time: Option<String>,
    pub note: Option<String>,
}

/// Admin-side appointment creation request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminCreateAppointment {
    pub clinic: Uuid,
    pub patient: Uuid,
    /// Slot, RFC 3339
    pub date_time: String,
    pub note: Option<String>,
    /// Initial status; defaults to pending
    #[schema(example = "pending")]
    pub status: Option<String>,
}

/// Appointment service trait for dependency injection.
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Book an appointment at a clinic for the calling patient.
    async fn book(
        &self,
        identity: &Identity,
        data: BookAppointment,
    ) -> AppResult<AppointmentResponse>;

    /// The caller's own appointments, newest first.
    async fn my_appointments(&self, identity: &Identity) -> AppResult<Vec<AppointmentResponse>>;

    async fn get_appointment(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> AppResult<AppointmentResponse>;

    /// Cancel an appointment, returning the patient's remaining ones.
    async fn cancel(&self, identity: &Identity, id: Uuid)
        -> AppResult<Vec<AppointmentResponse>>;

    /// Appointments across the caller's clinics (admins see all).
    async fn clinic_appointments(
        &self,
        identity: &Identity,
    ) -> AppResult<Vec<AppointmentResponse>>;

    /// Finalize: transition to done and attach completion details.
    ///
    /// Details are written exactly as supplied; a second finalize of
    /// the same appointment is an invalid transition, even when it
    /// loses a race with a concurrent one.
    async fn finalize(
        &self,
        identity: &Identity,
        id: Uuid,
        details: CompletionDetails,
    ) -> AppResult<AppointmentResponse>;

    /// A patient's procedure history, derived from finalized
    /// appointments.
    async fn patient_history(
        &self,
        identity: &Identity,
        patient_id: Uuid,
    ) -> AppResult<Vec<PatientRecordResponse>>;

    /// Paginated admin listing with optional status filter.
    async fn list_admin(
        &self,
        status: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<AppointmentResponse>>;

    /// Admin creation of an appointment for any patient at any clinic.
    async fn create_admin(&self, data: AdminCreateAppointment) -> AppResult<AppointmentResponse>;

    /// Admin update of slot, note or status.
    async fn update_admin(
        &self,
        id: Uuid,
        data: AdminUpdateAppointment,
    ) -> AppResult<AppointmentResponse>;

    async fn delete_admin(&self, id: Uuid) -> AppResult<()>;
}

fn parse_date_time(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation("date_time must be an RFC 3339 timestamp"))
}

fn parse_status(value: &str) -> AppResult<AppointmentStatus> {
    AppointmentStatus::parse(value)
        .ok_or_else(|| AppError::validation(format!("Unknown status: {value}")))
}

/// Concrete implementation of AppointmentService using Unit of Work.
pub struct AppointmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AppointmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, id: Uuid) -> AppResult<Appointment> {
        self.uow
            .appointments()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Batch-resolve clinic and patient summaries for a listing.
    async fn with_summaries(
        &self,
        appointments: Vec<Appointment>,
    ) -> AppResult<Vec<AppointmentResponse>> {
        let mut clinic_ids: Vec<Uuid> = appointments.iter().map(|a| a.clinic_id).collect();
        clinic_ids.sort_unstable();
        clinic_ids.dedup();
        let mut patient_ids: Vec<Uuid> = appointments.iter().map(|a| a.patient_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        let clinics: HashMap<Uuid, ClinicSummary> = self
            .uow
            .clinics()
            .find_many_by_ids(clinic_ids)
            .await?
            .iter()
            .map(|c| (c.id, ClinicSummary::from(c)))
            .collect();
        let patients: HashMap<Uuid, UserSummary> = self
            .uow
            .users()
            .find_many_by_ids(patient_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(appointments
            .into_iter()
            .map(|a| {
                let clinic = clinics.get(&a.clinic_id).cloned();
                let patient = patients.get(&a.patient_id).cloned();
                AppointmentResponse::new(a, clinic, patient)
            })
            .collect())
    }

    async fn respond_one(&self, appointment: Appointment) -> AppResult<AppointmentResponse> {
        let clinic = self
            .uow
            .clinics()
            .find_by_id(appointment.clinic_id)
            .await?
            .as_ref()
            .map(ClinicSummary::from);
        let patient = self
            .uow
            .users()
            .find_by_id(appointment.patient_id)
            .await?
            .as_ref()
            .map(UserSummary::from);
        Ok(AppointmentResponse::new(appointment, clinic, patient))
    }

    async fn owner_clinics(&self, identity: &Identity) -> AppResult<Vec<Clinic>> {
        if identity.is_admin() {
            self.uow.clinics().list_all().await
        } else {
            self.uow.clinics().list_by_owner(identity.id).await
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AppointmentService for AppointmentManager<U> {
    async fn book(
        &self,
        identity: &Identity,
        data: BookAppointment,
    ) -> AppResult<AppointmentResponse> {
        let date_time = parse_date_time(&data.date_time)?;

        // The clinic must exist before any booking is recorded.
        let clinic = self
            .uow
            .clinics()
            .find_by_id(data.clinic)
            .await?
            .ok_or(AppError::NotFound)?;

        let appointment = self
            .uow
            .appointments()
            .create(NewAppointment {
                clinic_id: clinic.id,
                patient_id: identity.id,
                date_time,
                note: data.note.unwrap_or_default(),
                status: AppointmentStatus::Pending,
            })
            .await?;

        let clinic_summary = ClinicSummary::from(&clinic);
        Ok(AppointmentResponse::new(
            appointment,
            Some(clinic_summary),
            None,
        ))
    }

    async fn my_appointments(&self, identity: &Identity) -> AppResult<Vec<AppointmentResponse>> {
        let appointments = self.uow.appointments().list_by_patient(identity.id).await?;
        self.with_summaries(appointments).await
    }

    async fn get_appointment(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> AppResult<AppointmentResponse> {
        let appointment = self.load(id).await?;
        authorize(
            identity,
            &Action::ViewAppointment {
                patient_id: appointment.patient_id,
            },
        )?;
        self.respond_one(appointment).await
    }

    async fn cancel(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> AppResult<Vec<AppointmentResponse>> {
        let appointment = self.load(id).await?;
        authorize(
            identity,
            &Action::CancelAppointment {
                patient_id: appointment.patient_id,
            },
        )?;

        self.uow.appointments().delete(id).await?;

        let remaining = self
            .uow
            .appointments()
            .list_by_patient(appointment.patient_id)
            .await?;
        self.with_summaries(remaining).await
    }

    async fn clinic_appointments(
        &self,
        identity: &Identity,
    ) -> AppResult<Vec<AppointmentResponse>> {
        let clinics = self.owner_clinics(identity).await?;
        let clinic_ids = clinics.iter().map(|c| c.id).collect();
        let appointments = self.uow.appointments().list_by_clinics(clinic_ids).await?;
        self.with_summaries(appointments).await
    }

    async fn finalize(
        &self,
        identity: &Identity,
        id: Uuid,
        details: CompletionDetails,
    ) -> AppResult<AppointmentResponse> {
        let mut appointment = self.load(id).await?;

        let clinic = self
            .uow
            .clinics()
            .find_by_id(appointment.clinic_id)
            .await?;
        authorize(
            identity,
            &Action::FinalizeAppointment {
                clinic_owner_id: clinic.as_ref().and_then(|c| c.owner_id),
            },
        )?;

        let now = Utc::now();
        // Domain check first so an already-done appointment is rejected
        // before touching storage.
        appointment.finalize(details.clone(), now)?;

        // Conditional write: the row is only updated while still
        // non-terminal, so a concurrent finalize cannot be overwritten.
        let won = self
            .uow
            .appointments()
            .finalize(id, details.clone(), now)
            .await?;
        if !won {
            return Err(AppError::invalid_transition(
                "Appointment is already completed",
            ));
        }

        // Finalizing with performed work appends to the patient's
        // procedure history.
        if let Some(procedure) = details.performed_work.as_deref() {
            if !procedure.is_empty() {
                self.uow
                    .records()
                    .create(
                        appointment.patient_id,
                        appointment.clinic_id,
                        procedure.to_string(),
                    )
                    .await?;
            }
        }

        self.respond_one(appointment).await
    }

    async fn patient_history(
        &self,
        identity: &Identity,
        patient_id: Uuid,
    ) -> AppResult<Vec<PatientRecordResponse>> {
        // The patient must exist before ownership is examined.
        self.uow
            .users()
            .find_by_id(patient_id)
            .await?
            .ok_or(AppError::NotFound)?;

        authorize(identity, &Action::ViewPatientHistory { patient_id })?;

        let records = self.uow.records().list_by_patient(patient_id).await?;

        let mut clinic_ids: Vec<Uuid> = records.iter().map(|r| r.clinic_id).collect();
        clinic_ids.sort_unstable();
        clinic_ids.dedup();
        let clinics: HashMap<Uuid, String> = self
            .uow
            .clinics()
            .find_many_by_ids(clinic_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| PatientRecordResponse {
                clinic_name: clinics.get(&r.clinic_id).cloned().unwrap_or_default(),
                procedure: r.procedure,
                date: r.created_at,
            })
            .collect())
    }

    async fn list_admin(
        &self,
        status: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<AppointmentResponse>> {
        let status = status.as_deref().map(parse_status).transpose()?;
        let (appointments, total) = self.uow.appointments().list(status, params).await?;
        let items = self.with_summaries(appointments).await?;
        Ok(Paginated::new(items, params.page(), params.limit(), total))
    }

    async fn create_admin(&self, data: AdminCreateAppointment) -> AppResult<AppointmentResponse> {
        let date_time = parse_date_time(&data.date_time)?;
        let status = data
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or(AppointmentStatus::Pending);

        // Both referenced records must exist before anything is created.
        let clinic = self
            .uow
            .clinics()
            .find_by_id(data.clinic)
            .await?
            .ok_or(AppError::NotFound)?;
        let patient = self
            .uow
            .users()
            .find_by_id(data.patient)
            .await?
            .ok_or(AppError::NotFound)?;

        let appointment = self
            .uow
            .appointments()
            .create(NewAppointment {
                clinic_id: clinic.id,
                patient_id: patient.id,
                date_time,
                note: data.note.unwrap_or_default(),
                status,
            })
            .await?;

        Ok(AppointmentResponse::new(
            appointment,
            Some(ClinicSummary::from(&clinic)),
            Some(UserSummary::from(&patient)),
        ))
    }

    async fn update_admin(
        &self,
        id: Uuid,
        data: AdminUpdateAppointment,
    ) -> AppResult<AppointmentResponse> {
        let mut appointment = self.load(id).await?;
        let now = Utc::now();

        if let Some(date_time) = data.date_time.as_deref() {
            appointment.date_time = parse_date_time(date_time)?;
        }
        if let Some(note) = data.note {
            appointment.note = note;
        }
        if let Some(status) = data.status.as_deref() {
            let next = parse_status(status)?;
            appointment.set_status(next, now)?;
        }

        let saved = self.uow.appointments().save(appointment).await?;
        self.respond_one(saved).await
    }

    async fn delete_admin(&self, id: Uuid) -> AppResult<()> {
        self.uow.appointments().delete(id).await
    }
}
