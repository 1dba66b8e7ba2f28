//! X-ray record entity.
//!
//! An X-ray is exclusively tied to one patient (`patient_user_id`);
//! there is no sharing model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserSummary;

/// Metadata captured at upload time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct XrayMeta {
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
}

/// X-ray record domain entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrayRecord {
    pub id: Uuid,
    pub patient_user_id: Uuid,
    /// Public URL path of the stored file, e.g. `/uploads/xrays/...`
    pub url: String,
    pub meta: XrayMeta,
    pub created_at: DateTime<Utc>,
}

impl XrayRecord {
    /// File name component of the stored URL.
    pub fn filename(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

/// X-ray response for admin listings, with owner summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct XrayResponse {
    pub id: Uuid,
    pub url: String,
    pub meta: XrayMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

impl XrayResponse {
    pub fn new(record: XrayRecord, patient: Option<UserSummary>) -> Self {
        Self {
            id: record.id,
            url: record.url,
            meta: record.meta,
            patient,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_extracts_last_path_segment() {
        let record = XrayRecord {
            id: Uuid::new_v4(),
            patient_user_id: Uuid::new_v4(),
            url: "/uploads/xrays/1717000000-scan.png".into(),
            meta: XrayMeta::default(),
            created_at: Utc::now(),
        };
        assert_eq!(record.filename(), "1717000000-scan.png");
    }
}
