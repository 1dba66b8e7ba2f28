//! Appointment entity and its lifecycle state machine.
//!
//! Status moves forward only: pending -> processing -> done, with
//! pending -> done allowed (owner finalization skips processing).
//! `done` is terminal. Completion fields are written only on the
//! transition into `done`, and they are written wholesale: absent
//! fields become absent, never merged from a prior edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::clinic::ClinicSummary;
use super::user::UserSummary;
use crate::errors::{AppError, AppResult};

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Processing,
    Done,
}

impl AppointmentStatus {
    /// Whether the machine may move from `self` to `next`.
    ///
    /// Self-transitions are not moves and are rejected; deletion is not
    /// a transition and bypasses this check entirely.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Pending, Done) | (Processing, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Done)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "processing" => Some(AppointmentStatus::Processing),
            "done" => Some(AppointmentStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Processing => "processing",
            AppointmentStatus::Done => "done",
        }
    }
}

// Stored status strings come from our own writes.
impl From<&str> for AppointmentStatus {
    fn from(s: &str) -> Self {
        AppointmentStatus::parse(s).unwrap_or(AppointmentStatus::Pending)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields attached when an appointment is finalized.
///
/// Written exactly as supplied; `None` clears any previous value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct CompletionDetails {
    pub doctor_name: Option<String>,
    pub tooth: Option<String>,
    pub performed_work: Option<String>,
    pub price: Option<f64>,
    pub recommendations: Option<String>,
}

/// Appointment domain entity.
///
/// `patient_id` anchors patient-side authorization; the owning clinic's
/// `owner_id` anchors the finalize transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub patient_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub note: String,
    pub status: AppointmentStatus,
    pub details: CompletionDetails,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Apply the finalize transition: status becomes done, completion
    /// fields are overwritten with `details`, `completed_at` is stamped.
    ///
    /// # Errors
    /// `InvalidTransition` when the appointment is already done.
    pub fn finalize(&mut self, details: CompletionDetails, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.can_transition_to(AppointmentStatus::Done) {
            return Err(AppError::invalid_transition(
                "Appointment is already completed",
            ));
        }
        self.status = AppointmentStatus::Done;
        self.details = details;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Apply an explicit status change (admin path). Forward moves only.
    pub fn set_status(&mut self, next: AppointmentStatus, now: DateTime<Utc>) -> AppResult<()> {
        if next == self.status {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(AppError::invalid_transition(format!(
                "Cannot move appointment from {} to {}",
                self.status, next
            )));
        }
        if next == AppointmentStatus::Done {
            self.completed_at = Some(now);
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

/// Booking request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookAppointment {
    /// Target clinic id
    pub clinic: Uuid,
    /// Requested slot, RFC 3339
    #[schema(example = "2025-06-01T10:00:00Z")]
    pub date_time: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Appointment response with related summaries embedded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<ClinicSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserSummary>,
    pub date_time: DateTime<Utc>,
    pub note: String,
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub details: CompletionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AppointmentResponse {
    pub fn new(
        appointment: Appointment,
        clinic: Option<ClinicSummary>,
        patient: Option<UserSummary>,
    ) -> Self {
        Self {
            id: appointment.id,
            clinic,
            patient,
            date_time: appointment.date_time,
            note: appointment.note,
            status: appointment.status,
            details: appointment.details,
            completed_at: appointment.completed_at,
            created_at: appointment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_appointment() -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            clinic_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            date_time: now,
            note: String::new(),
            status: AppointmentStatus::Pending,
            details: CompletionDetails::default(),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transitions_are_forward_only() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Done));
        assert!(Processing.can_transition_to(Done));

        assert!(!Processing.can_transition_to(Pending));
        assert!(!Done.can_transition_to(Pending));
        assert!(!Done.can_transition_to(Processing));
        assert!(!Done.can_transition_to(Done));
    }

    #[test]
    fn finalize_sets_done_and_stamps_completion() {
        let mut appt = pending_appointment();
        let now = Utc::now();
        let details = CompletionDetails {
            doctor_name: Some("Dr. X".into()),
            price: Some(5000.0),
            ..Default::default()
        };

        appt.finalize(details.clone(), now).unwrap();

        assert_eq!(appt.status, AppointmentStatus::Done);
        assert_eq!(appt.completed_at, Some(now));
        assert_eq!(appt.details, details);
    }

    #[test]
    fn finalize_overwrites_previous_details_without_merge() {
        let mut appt = pending_appointment();
        appt.details = CompletionDetails {
            doctor_name: Some("Dr. Old".into()),
            tooth: Some("36".into()),
            performed_work: Some("filling".into()),
            price: Some(100.0),
            recommendations: Some("floss".into()),
        };

        let supplied = CompletionDetails {
            doctor_name: Some("Dr. New".into()),
            ..Default::default()
        };
        appt.finalize(supplied.clone(), Utc::now()).unwrap();

        // Absent fields become absent, not preserved.
        assert_eq!(appt.details, supplied);
        assert_eq!(appt.details.tooth, None);
        assert_eq!(appt.details.price, None);
    }

    #[test]
    fn finalize_twice_is_rejected() {
        let mut appt = pending_appointment();
        appt.finalize(CompletionDetails::default(), Utc::now()).unwrap();

        let err = appt
            .finalize(CompletionDetails::default(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn admin_status_change_rejects_backward_moves() {
        let mut appt = pending_appointment();
        appt.set_status(AppointmentStatus::Processing, Utc::now())
            .unwrap();

        let err = appt
            .set_status(AppointmentStatus::Pending, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn same_status_is_a_no_op() {
        let mut appt = pending_appointment();
        appt.set_status(AppointmentStatus::Pending, Utc::now())
            .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert!(appt.completed_at.is_none());
    }
}
