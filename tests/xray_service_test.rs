//! X-ray service unit tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use dentalchain_api::domain::{Identity, UserRole, XrayMeta, XrayRecord};
use dentalchain_api::errors::AppError;
use dentalchain_api::infra::repositories::{
    MockAppointmentRepository, MockClinicRepository, MockPatientRecordRepository,
    MockUserRepository, MockXrayRepository,
};
use dentalchain_api::infra::{
    AppointmentRepository, ClinicRepository, PatientRecordRepository, UnitOfWork, UserRepository,
    XrayRepository, XrayStorage,
};
use dentalchain_api::services::{XrayManager, XrayService};

/// Test mock for UnitOfWork wrapping mock repositories
#[derive(Default)]
struct TestUnitOfWork {
    users: MockUserRepository,
    clinics: MockClinicRepository,
    appointments: MockAppointmentRepository,
    xrays: MockXrayRepository,
    records: MockPatientRecordRepository,
}

struct TestUow {
    users: Arc<MockUserRepository>,
    clinics: Arc<MockClinicRepository>,
    appointments: Arc<MockAppointmentRepository>,
    xrays: Arc<MockXrayRepository>,
    records: Arc<MockPatientRecordRepository>,
}

impl TestUnitOfWork {
    fn build(self) -> Arc<TestUow> {
        Arc::new(TestUow {
            users: Arc::new(self.users),
            clinics: Arc::new(self.clinics),
            appointments: Arc::new(self.appointments),
            xrays: Arc::new(self.xrays),
            records: Arc::new(self.records),
        })
    }
}

impl UnitOfWork for TestUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn clinics(&self) -> Arc<dyn ClinicRepository> {
        self.clinics.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }

    fn xrays(&self) -> Arc<dyn XrayRepository> {
        self.xrays.clone()
    }

    fn records(&self) -> Arc<dyn PatientRecordRepository> {
        self.records.clone()
    }
}

fn patient_identity(id: Uuid) -> Identity {
    Identity {
        id,
        role: UserRole::Patient,
        email: "patient@example.com".to_string(),
        full_name: "Test Patient".to_string(),
    }
}

fn owner_identity(id: Uuid) -> Identity {
    Identity {
        id,
        role: UserRole::Owner,
        email: "owner@example.com".to_string(),
        full_name: "Test Owner".to_string(),
    }
}

fn test_record(patient_user_id: Uuid, filename: &str) -> XrayRecord {
    XrayRecord {
        id: Uuid::new_v4(),
        patient_user_id,
        url: format!("/uploads/xrays/{filename}"),
        meta: XrayMeta {
            original_name: "panoramic.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 4,
        },
        created_at: Utc::now(),
    }
}

fn test_storage() -> XrayStorage {
    XrayStorage::new(std::env::temp_dir().join("dentalchain-xray-tests"))
}

#[tokio::test]
async fn test_upload_rejects_non_image_mime() {
    let uow = TestUnitOfWork::default();
    let service = XrayManager::new(uow.build(), test_storage());

    let result = service
        .upload(
            &patient_identity(Uuid::new_v4()),
            "notes.pdf".to_string(),
            "application/pdf".to_string(),
            vec![1, 2, 3],
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let uow = TestUnitOfWork::default();
    let service = XrayManager::new(uow.build(), test_storage());

    let result = service
        .upload(
            &patient_identity(Uuid::new_v4()),
            "empty.png".to_string(),
            "image/png".to_string(),
            Vec::new(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    use dentalchain_api::config::MAX_XRAY_SIZE_BYTES;

    let uow = TestUnitOfWork::default();
    let service = XrayManager::new(uow.build(), test_storage());

    let result = service
        .upload(
            &patient_identity(Uuid::new_v4()),
            "fullmouth.png".to_string(),
            "image/png".to_string(),
            vec![0; MAX_XRAY_SIZE_BYTES + 1],
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_upload_by_owner_is_forbidden() {
    // Only patients carry imaging; owners go through the listing
    // endpoints instead.
    let uow = TestUnitOfWork::default();
    let service = XrayManager::new(uow.build(), test_storage());

    let result = service
        .upload(
            &owner_identity(Uuid::new_v4()),
            "panoramic.png".to_string(),
            "image/png".to_string(),
            vec![1, 2, 3],
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_delete_by_filename_foreign_record_is_not_found() {
    let caller = Uuid::new_v4();

    let mut uow = TestUnitOfWork::default();
    // The caller's own records do not contain the requested filename.
    uow.xrays
        .expect_list_by_patient()
        .returning(move |pid| Ok(vec![test_record(pid, "mine.png")]));

    let service = XrayManager::new(uow.build(), test_storage());
    let result = service
        .delete_by_filename(&patient_identity(caller), "someone-elses.png")
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_list_for_foreign_patient_is_forbidden() {
    let other_patient = Uuid::new_v4();

    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_id().returning(|id| {
        Ok(Some(dentalchain_api::domain::User {
            id,
            email: "other@example.com".to_string(),
            password_hash: "hashed".to_string(),
            full_name: "Other Patient".to_string(),
            role: UserRole::Patient,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    });

    let service = XrayManager::new(uow.build(), test_storage());
    let result = service
        .list_for_patient(&patient_identity(Uuid::new_v4()), other_patient)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_admin_listing_unknown_email_is_empty() {
    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(|_| Ok(None));

    let service = XrayManager::new(uow.build(), test_storage());
    let xrays = service
        .list_admin(None, Some("nobody@example.com".to_string()))
        .await
        .unwrap();

    assert!(xrays.is_empty());
}
