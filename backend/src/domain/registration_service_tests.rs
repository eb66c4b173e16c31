//! Tests for the account registration service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    CredentialHashError, IdentityField, MockCredentialHasher, MockUserRepository,
};
use crate::domain::{
    ErrorCode, Profile, ProfileDraft, RegistrationParts, Role, RoleFields, StudentProfile,
    TeacherProfile, User, UserId,
};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

const STORED_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

fn account_for(new_account: &NewAccount, id: i64) -> Account {
    let user_id = UserId::new(id).expect("positive id");
    let user = User::new(
        user_id,
        new_account.username.clone(),
        new_account.email.clone(),
        new_account.role,
    )
    .with_names(new_account.names.clone());
    let profile = new_account.profile.clone().map(|draft| match draft {
        ProfileDraft::Student {
            student_id,
            programme,
        } => Profile::Student(StudentProfile {
            user_id,
            student_id: student_id.unwrap_or(1),
            programme,
        }),
        ProfileDraft::Teacher {
            teacher_id,
            department,
        } => Profile::Teacher(TeacherProfile {
            user_id,
            teacher_id: teacher_id.unwrap_or(1),
            department,
        }),
    });
    Account::new(user, profile).expect("consistent account")
}

fn request(role: &str, password: &str) -> RegistrationRequest {
    RegistrationRequest::try_from_parts(
        RegistrationParts {
            role,
            username: "alice",
            email: "a@x.com",
            password,
            first_name: None,
            last_name: None,
        },
        RoleFields::default(),
    )
    .expect("valid request")
}

#[fixture]
fn student_request() -> RegistrationRequest {
    request("student", "Str0ng!Pass")
}

fn hashing_hasher() -> MockCredentialHasher {
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .withf(|secret| secret == "Str0ng!Pass")
        .times(1)
        .returning(|_| Ok(STORED_HASH.to_owned()));
    hasher
}

fn make_service(
    users: MockUserRepository,
    hasher: MockCredentialHasher,
) -> AccountRegistrationService<MockUserRepository, MockCredentialHasher> {
    AccountRegistrationService::new(Arc::new(users), Arc::new(hasher))
}

fn failing_store(error: UserPersistenceError) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_register()
        .times(1)
        .return_once(move |_| Err(error));
    users
}

#[rstest]
#[tokio::test]
async fn register_stores_hash_and_profile_draft(student_request: RegistrationRequest) {
    let mut users = MockUserRepository::new();
    users
        .expect_register()
        .withf(|account| {
            account.password_hash == STORED_HASH
                && account.role == Role::Student
                && matches!(account.profile, Some(ProfileDraft::Student { .. }))
        })
        .times(1)
        .returning(|account| Ok(account_for(account, 1)));

    let service = make_service(users, hashing_hasher());
    let account = service
        .register(student_request)
        .await
        .expect("registration succeeds");

    assert_eq!(account.user().role(), Role::Student);
    assert!(matches!(account.profile(), Some(Profile::Student(_))));
}

#[rstest]
#[tokio::test]
async fn weak_password_is_rejected_before_hashing() {
    let mut users = MockUserRepository::new();
    users.expect_register().times(0);
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().times(0);

    let service = make_service(users, hasher);
    let error = service
        .register(request("teacher", "12345678"))
        .await
        .expect_err("weak password");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details present");
    assert_eq!(details["code"], "weak_password");
    assert_eq!(details["field"], "password");
    assert_eq!(
        details["reasons"],
        serde_json::json!(["entirely_numeric", "too_common"])
    );
}

#[rstest]
#[case(IdentityField::Username, "username")]
#[case(IdentityField::Email, "email")]
#[tokio::test]
async fn duplicate_identity_names_the_field(
    student_request: RegistrationRequest,
    #[case] field: IdentityField,
    #[case] expected: &str,
) {
    let users = failing_store(UserPersistenceError::duplicate_identity(field));
    let service = make_service(users, hashing_hasher());

    let error = service
        .register(student_request)
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details present");
    assert_eq!(details["code"], "duplicate_identity");
    assert_eq!(details["field"], expected);
}

#[rstest]
#[case(UserPersistenceError::provisioning("student_id taken"), ErrorCode::InternalError)]
#[case(UserPersistenceError::connection("pool exhausted"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_map_to_error_codes(
    student_request: RegistrationRequest,
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let service = make_service(failing_store(failure), hashing_hasher());
    let error = service
        .register(student_request)
        .await
        .expect_err("store failure");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn hashing_failure_skips_store(student_request: RegistrationRequest) {
    let mut users = MockUserRepository::new();
    users.expect_register().times(0);
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Err(CredentialHashError::hashing("out of memory")));

    let error = make_service(users, hasher)
        .register(student_request)
        .await
        .expect_err("hashing failure");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

#[given("a teacher registration with a strong password")]
fn a_teacher_registration_with_a_strong_password() -> RegistrationRequest {
    request("TEACHER", "Str0ng!Pass")
}

#[when("the registration service handles it")]
fn the_registration_service_handles_it(
    request: RegistrationRequest,
) -> Result<Account, Error> {
    let mut users = MockUserRepository::new();
    users
        .expect_register()
        .times(1)
        .returning(|account| Ok(account_for(account, 42)));
    let service = make_service(users, hashing_hasher());
    block_on(service.register(request))
}

#[then("a teacher account with a teacher profile is returned")]
fn a_teacher_account_with_a_teacher_profile_is_returned(result: Result<Account, Error>) {
    let account = result.expect("registration succeeds");
    assert_eq!(account.user().role(), Role::Teacher);
    match account.profile() {
        Some(Profile::Teacher(profile)) => assert_eq!(profile.user_id, account.user().id()),
        other => panic!("expected teacher profile, got {other:?}"),
    }
}

#[rstest]
fn registering_a_teacher_provisions_a_teacher_profile() {
    let request = a_teacher_registration_with_a_strong_password();
    let result = the_registration_service_handles_it(request);
    a_teacher_account_with_a_teacher_profile_is_returned(result);
}
