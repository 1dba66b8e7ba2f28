//! Patient procedure history records.
//!
//! Append-only: created by clinic-side workflow, read by the patient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single performed-procedure entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub procedure: String,
    pub created_at: DateTime<Utc>,
}

/// Record as shown to the patient, with the clinic name resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PatientRecordResponse {
    pub clinic_name: String,
    pub procedure: String,
    pub date: DateTime<Utc>,
}
