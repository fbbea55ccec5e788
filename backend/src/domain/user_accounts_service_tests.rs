//! Tests for registration and profile updates.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{ErrorCode, Username};
use crate::test_support::{InMemoryUserRepository, MutableClock, cheap_hashing_cost};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 6, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn users() -> Arc<InMemoryUserRepository> {
    Arc::new(InMemoryUserRepository::new())
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(start()))
}

fn registration(username: &str, email: &str) -> Registration {
    Registration::try_from_parts(username, email, "pa55word", "lifts things")
        .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn register_stores_a_verifiable_credential(
    users: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
) {
    let service = UserAccountsService::new(users.clone(), clock, cheap_hashing_cost());

    let user = service
        .register(registration("alice", "alice@example.com"))
        .await
        .expect("registered");

    assert_eq!(user.username.as_ref(), "alice");
    assert_eq!(user.bio, "lifts things");
    assert_eq!(user.created_at, start());
    let account = users
        .find_by_username("alice")
        .await
        .expect("lookup")
        .expect("account exists");
    assert!(account.credential.matches("pa55word").expect("verify"));
    assert!(!account.credential.matches("password").expect("verify"));
}

#[rstest]
#[case("alice", "other@example.com", "username")]
#[case("alicia", "alice@example.com", "email")]
#[tokio::test]
async fn duplicate_fields_conflict(
    users: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
    #[case] username: &str,
    #[case] email: &str,
    #[case] field: &str,
) {
    let service = UserAccountsService::new(users, clock, cheap_hashing_cost());
    service
        .register(registration("alice", "alice@example.com"))
        .await
        .expect("first registration");

    let err = service
        .register(registration(username, email))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.details(), Some(&json!({ "field": field })));
}

#[rstest]
#[tokio::test]
async fn update_profile_changes_username_and_bio(
    users: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
) {
    let service = UserAccountsService::new(users, clock.clone(), cheap_hashing_cost());
    let alice = service
        .register(registration("alice", "alice@example.com"))
        .await
        .expect("registered");
    clock.advance_seconds(60);

    let updated = service
        .update_profile(
            &alice,
            ProfileUpdate {
                username: Username::new("alice2").expect("valid"),
                bio: "now runs".to_owned(),
            },
        )
        .await
        .expect("updated");

    assert_eq!(updated.username.as_ref(), "alice2");
    assert_eq!(updated.bio, "now runs");
    assert_eq!(updated.email, alice.email);
    assert_eq!(updated.updated_at, start() + chrono::Duration::seconds(60));
}

#[rstest]
#[tokio::test]
async fn update_profile_to_taken_username_conflicts(
    users: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
) {
    let service = UserAccountsService::new(users, clock, cheap_hashing_cost());
    let alice = service
        .register(registration("alice", "alice@example.com"))
        .await
        .expect("registered");
    service
        .register(registration("bobby", "bob@example.com"))
        .await
        .expect("registered");

    let err = service
        .update_profile(
            &alice,
            ProfileUpdate {
                username: Username::new("bobby").expect("valid"),
                bio: String::new(),
            },
        )
        .await
        .expect_err("taken");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_map_to_error_codes(
    clock: Arc<MutableClock>,
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .times(1)
        .returning(move |_, _| Err(failure.clone()));
    let service = UserAccountsService::new(Arc::new(users), clock, cheap_hashing_cost());

    let err = service
        .register(registration("alice", "alice@example.com"))
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), expected);
}
