//! Tests for the account service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    FixturePasswordHasher, MockPasswordHasher, MockUserRepository, UserPersistenceError,
};
use crate::domain::{ErrorCode, PasswordHash, UserCredentials, UserId};

fn registration(email: &str) -> Registration {
    Registration::try_from_parts(Some("Ada"), email, "hunter22").expect("valid registration")
}

fn stored_user(email: &str, hash: &str) -> UserCredentials {
    UserCredentials {
        user: User::new(
            UserId::random(),
            EmailAddress::parse(email).expect("valid email"),
            None,
            Utc::now(),
        ),
        password_hash: PasswordHash::new(hash),
    }
}

fn echo_create(user: &NewUser) -> Result<User, UserPersistenceError> {
    Ok(User::new(
        UserId::random(),
        user.email.clone(),
        user.display_name.clone(),
        Utc::now(),
    ))
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_stores_normalised_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|user| {
            user.email.as_ref() == "ada@example.com"
                && user.password_hash.as_str() == "fixture$hunter22"
        })
        .times(1)
        .returning(echo_create);

    let service = AccountService::new(Arc::new(users), Arc::new(FixturePasswordHasher));
    let user = service
        .register(&registration("  ADA@example.com "))
        .await
        .expect("registered");

    assert_eq!(user.email().as_ref(), "ada@example.com");
    assert_eq!(user.display_name().map(|name| name.as_ref()), Some("Ada"));
}

#[rstest]
#[tokio::test]
async fn register_rejects_existing_email_before_hashing() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user("ada@example.com", "fixture$x"))));
    users.expect_create().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let service = AccountService::new(Arc::new(users), Arc::new(hasher));
    let err = service
        .register(&registration("ada@example.com"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn register_maps_unique_violation_to_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_create()
        .return_once(|_| Err(UserPersistenceError::duplicate_email("ada@example.com")));

    let service = AccountService::new(Arc::new(users), Arc::new(FixturePasswordHasher));
    let err = service
        .register(&registration("ada@example.com"))
        .await
        .expect_err("lost race");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn register_maps_hasher_failure_to_internal() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_create().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Err(PasswordHasherError::hashing("out of memory")));

    let service = AccountService::new(Arc::new(users), Arc::new(hasher));
    let err = service
        .register(&registration("ada@example.com"))
        .await
        .expect_err("hasher failed");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn authenticate_accepts_matching_password() {
    let record = stored_user("ada@example.com", "fixture$hunter22");
    let expected = record.user.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(record)));

    let service = AccountService::new(Arc::new(users), Arc::new(FixturePasswordHasher));
    let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "hunter22").expect("creds");
    let user = service.authenticate(&creds).await.expect("authenticated");

    assert_eq!(user, expected);
}

#[rstest]
#[tokio::test]
async fn unknown_email_and_wrong_password_fail_identically() {
    let mut unknown_users = MockUserRepository::new();
    unknown_users
        .expect_find_by_email()
        .return_once(|_| Ok(None));
    let unknown = AccountService::new(Arc::new(unknown_users), Arc::new(FixturePasswordHasher));

    let mut known_users = MockUserRepository::new();
    known_users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user("ada@example.com", "fixture$hunter22"))));
    let known = AccountService::new(Arc::new(known_users), Arc::new(FixturePasswordHasher));

    let ghost = LoginCredentials::try_from_parts("ghost@example.com", "hunter22").expect("creds");
    let unknown_err = unknown.authenticate(&ghost).await.expect_err("unknown email");
    let ada = LoginCredentials::try_from_parts("ada@example.com", "wrong-pw").expect("creds");
    let wrong_err = known.authenticate(&ada).await.expect_err("wrong password");

    assert_eq!(unknown_err.code(), ErrorCode::Unauthorized);
    assert_eq!(unknown_err.code(), wrong_err.code());
    assert_eq!(unknown_err.message(), wrong_err.message());
}

#[rstest]
#[tokio::test]
async fn malformed_login_email_is_invalid_credentials() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(0);

    let service = AccountService::new(Arc::new(users), Arc::new(FixturePasswordHasher));
    let err = service
        .authenticate(&LoginCredentials::try_from_parts("not-an-email", "pw").expect("creds"))
        .await
        .expect_err("malformed");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn unknown_email_still_runs_one_verification() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|secret| Ok(PasswordHash::new(format!("decoy${secret}"))));
    hasher
        .expect_verify()
        .withf(|secret, _| secret == "hunter22")
        .times(2)
        .returning(|_, _| Ok(false));

    let service = AccountService::new(Arc::new(users), Arc::new(hasher));
    let creds = LoginCredentials::try_from_parts("ghost@example.com", "hunter22").expect("creds");
    for _ in 0..2 {
        let err = service.authenticate(&creds).await.expect_err("unknown email");
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }
}
