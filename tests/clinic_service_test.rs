//! Clinic service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use dentalchain_api::domain::{Clinic, CreateClinic, Identity, UpdateClinic, User, UserRole};
use dentalchain_api::errors::AppError;
use dentalchain_api::infra::repositories::{
    MockAppointmentRepository, MockClinicRepository, MockPatientRecordRepository,
    MockUserRepository, MockXrayRepository,
};
use dentalchain_api::infra::{
    AppointmentRepository, ClinicRepository, PatientRecordRepository, UnitOfWork, UserRepository,
    XrayRepository,
};
use dentalchain_api::services::{ClinicManager, ClinicService};
use dentalchain_api::types::PaginationParams;

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

fn test_clinic(id: Uuid, owner_id: Option<Uuid>) -> Clinic {
    Clinic {
        id,
        name: "Smile Clinic".to_string(),
        email: "clinic@example.com".to_string(),
        address: "1 Main St".to_string(),
        phone: "555-0100".to_string(),
        description: "General dentistry".to_string(),
        image: String::new(),
        owner_id,
        location: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_user(id: Uuid, role: UserRole) -> User {
    User {
        id,
        email: "owner@example.com".to_string(),
        password_hash: "hashed".to_string(),
        full_name: "Clinic Owner".to_string(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_clinic_data(owner_email: &str) -> CreateClinic {
    CreateClinic {
        name: "Smile Clinic".to_string(),
        email: "clinic@example.com".to_string(),
        address: None,
        phone: None,
        description: None,
        image: None,
        owner_email: owner_email.to_string(),
        owner_full_name: Some("Clinic Owner".to_string()),
        location: None,
    }
}

#[tokio::test]
async fn test_create_clinic_provisions_unknown_owner() {
    let mut uow = TestUnitOfWork::default();
    uow.clinics.expect_find_by_email().returning(|_| Ok(None));
    uow.users
        .expect_find_by_email()
        .with(eq("fresh@example.com"))
        .returning(|_| Ok(None));
    uow.users
        .expect_create()
        .returning(|email, _, full_name, role| {
            assert_eq!(role, UserRole::Owner);
            let mut user = test_user(Uuid::new_v4(), role);
            user.email = email;
            user.full_name = full_name;
            Ok(user)
        });
    uow.clinics.expect_create().returning(|data| {
        assert!(data.owner_id.is_some());
        Ok(test_clinic(Uuid::new_v4(), data.owner_id))
    });
    uow.users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::Owner))));

    let service = ClinicManager::new(uow.build());
    let created = service
        .create_clinic(create_clinic_data("fresh@example.com"))
        .await
        .unwrap();

    // Temporary credentials are surfaced exactly once, at creation.
    let credentials = created.owner_credentials.unwrap();
    assert_eq!(credentials.email, "fresh@example.com");
    assert_eq!(credentials.temp_password.len(), 12);
    assert!(created.clinic.owner.is_some());
}

#[tokio::test]
async fn test_create_clinic_promotes_existing_patient() {
    let patient_id = Uuid::new_v4();

    let mut uow = TestUnitOfWork::default();
    uow.clinics.expect_find_by_email().returning(|_| Ok(None));
    uow.users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(test_user(patient_id, UserRole::Patient))));
    uow.users
        .expect_update()
        .withf(move |id, patch| *id == patient_id && patch.role == Some(UserRole::Owner))
        .returning(|id, _| Ok(test_user(id, UserRole::Owner)));
    uow.clinics
        .expect_create()
        .returning(|data| Ok(test_clinic(Uuid::new_v4(), data.owner_id)));
    uow.users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::Owner))));

    let service = ClinicManager::new(uow.build());
    let created = service
        .create_clinic(create_clinic_data("owner@example.com"))
        .await
        .unwrap();

    // Existing accounts keep their password; no credentials to hand out.
    assert!(created.owner_credentials.is_none());
}

#[tokio::test]
async fn test_create_clinic_duplicate_email_is_conflict() {
    let mut uow = TestUnitOfWork::default();
    uow.clinics
        .expect_find_by_email()
        .returning(|_| Ok(Some(test_clinic(Uuid::new_v4(), None))));

    let service = ClinicManager::new(uow.build());
    let result = service
        .create_clinic(create_clinic_data("owner@example.com"))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_update_clinic_by_other_owner_is_forbidden() {
    let clinic_owner = Uuid::new_v4();

    let mut uow = TestUnitOfWork::default();
    uow.clinics
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_clinic(id, Some(clinic_owner)))));

    let identity = Identity {
        id: Uuid::new_v4(),
        role: UserRole::Owner,
        email: "other@example.com".to_string(),
        full_name: "Other Owner".to_string(),
    };

    let service = ClinicManager::new(uow.build());
    let result = service
        .update_clinic(&identity, Uuid::new_v4(), UpdateClinic::default())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_update_missing_clinic_is_not_found() {
    let mut uow = TestUnitOfWork::default();
    uow.clinics.expect_find_by_id().returning(|_| Ok(None));

    let identity = Identity {
        id: Uuid::new_v4(),
        role: UserRole::Owner,
        email: "owner@example.com".to_string(),
        full_name: "Clinic Owner".to_string(),
    };

    let service = ClinicManager::new(uow.build());
    let result = service
        .update_clinic(&identity, Uuid::new_v4(), UpdateClinic::default())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_admin_listing_unknown_owner_email_is_empty_page() {
    let mut uow = TestUnitOfWork::default();
    uow.users
        .expect_find_by_email()
        .with(eq("nobody@example.com"))
        .returning(|_| Ok(None));

    let service = ClinicManager::new(uow.build());
    let page = service
        .list_clinics_admin(
            None,
            Some("nobody@example.com".to_string()),
            PaginationParams::default(),
        )
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}
