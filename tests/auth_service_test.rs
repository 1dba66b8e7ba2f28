//! Authentication service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use dentalchain_api::config::Config;
use dentalchain_api::domain::{Password, User, UserRole};
use dentalchain_api::errors::AppError;
use dentalchain_api::infra::repositories::{
    MockAppointmentRepository, MockClinicRepository, MockPatientRecordRepository,
    MockUserRepository, MockXrayRepository,
};
use dentalchain_api::infra::{
    AppointmentRepository, ClinicRepository, PatientRecordRepository, UnitOfWork, UserRepository,
    XrayRepository,
};
use dentalchain_api::services::{AuthService, Authenticator};

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

fn test_user(id: Uuid, role: UserRole) -> User {
    User {
        id,
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        full_name: "Test User".to_string(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_register_defaults_to_patient_role() {
    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(|_| Ok(None));
    uow.users
        .expect_create()
        .returning(|email, password_hash, full_name, role| {
            assert_eq!(role, UserRole::Patient);
            let mut user = test_user(Uuid::new_v4(), role);
            user.email = email;
            user.password_hash = password_hash;
            user.full_name = full_name;
            Ok(user)
        });

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let response = service
        .register(
            "new@example.com".to_string(),
            "password123".to_string(),
            "New Patient".to_string(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(response.user.role, "patient");
    assert!(!response.token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_is_conflict() {
    let mut uow = TestUnitOfWork::default();
    uow.users
        .expect_find_by_email()
        .with(eq("taken@example.com"))
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), UserRole::Patient))));

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let result = service
        .register(
            "taken@example.com".to_string(),
            "password123".to_string(),
            "Someone".to_string(),
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_register_unknown_role_is_validation_error() {
    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(|_| Ok(None));

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let result = service
        .register(
            "new@example.com".to_string(),
            "password123".to_string(),
            "Someone".to_string(),
            Some("superuser".to_string()),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_login_wrong_password_is_invalid_credentials() {
    let hash = Password::new("correct-password").unwrap().into_string();

    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(move |_| {
        let mut user = test_user(Uuid::new_v4(), UserRole::Patient);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let result = service
        .login("test@example.com".to_string(), "wrong-password".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    // Unknown emails read exactly like wrong passwords.
    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(|_| Ok(None));

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let result = service
        .login("ghost@example.com".to_string(), "password123".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let user_id = Uuid::new_v4();
    let hash = Password::new("password123").unwrap().into_string();

    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(move |_| {
        let mut user = test_user(user_id, UserRole::Owner);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let response = service
        .login("test@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let claims = service.verify_token(&response.token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "owner");
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_resolve_identity_rejects_deleted_subject() {
    let user_id = Uuid::new_v4();
    let hash = Password::new("password123").unwrap().into_string();

    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(move |_| {
        let mut user = test_user(user_id, UserRole::Patient);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });
    // The subject has since been deleted.
    uow.users.expect_find_by_id().returning(|_| Ok(None));

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let response = service
        .login("test@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let result = service.resolve_identity(&response.token).await;
    assert!(matches!(result.unwrap_err(), AppError::Unauthorized));
}

#[tokio::test]
async fn test_resolve_identity_uses_stored_role() {
    let user_id = Uuid::new_v4();
    let hash = Password::new("password123").unwrap().into_string();

    let mut uow = TestUnitOfWork::default();
    uow.users.expect_find_by_email().returning(move |_| {
        let mut user = test_user(user_id, UserRole::Patient);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });
    // The role changed after the token was issued; the stored one wins.
    uow.users
        .expect_find_by_id()
        .with(eq(user_id))
        .returning(|id| Ok(Some(test_user(id, UserRole::Owner))));

    let service = Authenticator::new(uow.build(), Config::for_tests());
    let response = service
        .login("test@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let identity = service.resolve_identity(&response.token).await.unwrap();
    assert_eq!(identity.role, UserRole::Owner);
}

/// Register, then log in with the same password against the stored
/// hash, then resolve the issued token back to the account.
#[tokio::test]
async fn test_register_login_roundtrip() {
    use std::sync::Mutex;

    let store: Arc<Mutex<Option<User>>> = Arc::new(Mutex::new(None));

    let mut uow = TestUnitOfWork::default();
    let lookup = store.clone();
    uow.users
        .expect_find_by_email()
        .with(eq("round@example.com"))
        .returning(move |_| Ok(lookup.lock().unwrap().clone()));
    let created = store.clone();
    uow.users
        .expect_create()
        .returning(move |email, password_hash, full_name, role| {
            let mut user = test_user(Uuid::new_v4(), role);
            user.email = email;
            user.password_hash = password_hash;
            user.full_name = full_name;
            *created.lock().unwrap() = Some(user.clone());
            Ok(user)
        });
    let by_id = store.clone();
    uow.users
        .expect_find_by_id()
        .returning(move |_| Ok(by_id.lock().unwrap().clone()));

    let service = Authenticator::new(uow.build(), Config::for_tests());

    let registered = service
        .register(
            "round@example.com".to_string(),
            "password123".to_string(),
            "Round Trip".to_string(),
            None,
        )
        .await
        .unwrap();

    let login = service
        .login("round@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();
    assert_eq!(login.user.id, registered.user.id);

    let identity = service.resolve_identity(&login.token).await.unwrap();
    assert_eq!(identity.email, "round@example.com");
    assert_eq!(identity.role, UserRole::Patient);
}
