//! Tests for token-backed identity resolution.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockTokenRepository, MockUserRepository, TokenRepositoryError, UserPersistenceError,
};
use crate::domain::{Email, NewUser, PasswordCredential, Token, User, UserId, Username};
use crate::test_support::{InMemoryTokenRepository, InMemoryUserRepository, MutableClock};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

struct Harness {
    tokens: Arc<InMemoryTokenRepository>,
    users: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
    resolver: TokenIdentityResolver<InMemoryTokenRepository, InMemoryUserRepository>,
}

impl Harness {
    async fn register(&self, username: &str) -> User {
        let new_user = NewUser {
            username: Username::new(username).expect("valid username"),
            email: Email::new(format!("{username}@example.com")).expect("valid email"),
            bio: String::new(),
            credential: PasswordCredential::from_stored(b"unused".to_vec()),
        };
        self.users
            .create(&new_user, self.clock.utc())
            .await
            .expect("user stored")
    }

    async fn issue(&self, user_id: UserId) -> String {
        let token = Token::generate(
            user_id,
            Duration::hours(24),
            TokenScope::Authentication,
            self.clock.utc(),
        )
        .expect("entropy");
        self.tokens.insert(token.record()).await.expect("token stored");
        token.plaintext().to_owned()
    }
}

#[fixture]
fn harness() -> Harness {
    let tokens = Arc::new(InMemoryTokenRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(MutableClock::new(start()));
    let resolver = TokenIdentityResolver::new(tokens.clone(), users.clone(), clock.clone());
    Harness {
        tokens,
        users,
        clock,
        resolver,
    }
}

#[rstest]
#[tokio::test]
async fn absent_header_is_anonymous(harness: Harness) {
    let identity = harness.resolver.resolve(None).await.expect("no error");
    assert_eq!(identity, Identity::Anonymous);
}

#[rstest]
#[case("Bearer not-two-parts extra")]
#[case("Token abc")]
#[case("Bearer")]
#[tokio::test]
async fn malformed_header_is_rejected_without_lookup(#[case] header: &str) {
    let mut tokens = MockTokenRepository::new();
    tokens.expect_find_by_hash_scope_not_expired().never();
    let resolver = TokenIdentityResolver::new(
        Arc::new(tokens),
        Arc::new(MockUserRepository::new()),
        Arc::new(MutableClock::new(start())),
    );

    let result = resolver.resolve(Some(header)).await;

    assert_eq!(result, Err(IdentityRejection::MalformedHeader));
}

#[rstest]
#[tokio::test]
async fn live_token_resolves_to_its_owner(harness: Harness) {
    let alice = harness.register("alice").await;
    let token = harness.issue(alice.id).await;

    let identity = harness
        .resolver
        .resolve(Some(format!("Bearer {token}").as_str()))
        .await
        .expect("token is live");

    assert_eq!(identity, Identity::Authenticated(alice));
}

#[rstest]
#[case(Duration::hours(24) - Duration::seconds(1), true)]
#[case(Duration::hours(24), false)]
#[case(Duration::hours(24) + Duration::seconds(1), false)]
#[tokio::test]
async fn token_stops_resolving_at_expiry(
    harness: Harness,
    #[case] elapsed: Duration,
    #[case] still_valid: bool,
) {
    let alice = harness.register("alice").await;
    let token = harness.issue(alice.id).await;
    harness.clock.advance(elapsed);

    let result = harness.resolver.resolve(Some(format!("Bearer {token}").as_str())).await;

    if still_valid {
        assert!(matches!(result, Ok(Identity::Authenticated(_))));
    } else {
        assert_eq!(result, Err(IdentityRejection::InvalidOrExpiredToken));
    }
}

#[rstest]
#[tokio::test]
async fn unknown_token_is_rejected(harness: Harness) {
    let result = harness.resolver.resolve(Some("Bearer deadbeef")).await;
    assert_eq!(result, Err(IdentityRejection::InvalidOrExpiredToken));
}

#[rstest]
#[tokio::test]
async fn token_of_missing_user_is_rejected(harness: Harness) {
    let token = harness.issue(UserId::new(404)).await;
    let result = harness.resolver.resolve(Some(format!("Bearer {token}").as_str())).await;
    assert_eq!(result, Err(IdentityRejection::InvalidOrExpiredToken));
}

#[rstest]
#[tokio::test]
async fn token_lookup_failure_is_an_invalid_token() {
    let mut tokens = MockTokenRepository::new();
    tokens
        .expect_find_by_hash_scope_not_expired()
        .times(1)
        .returning(|_, _, _| Err(TokenRepositoryError::connection("database down")));
    let resolver = TokenIdentityResolver::new(
        Arc::new(tokens),
        Arc::new(MockUserRepository::new()),
        Arc::new(MutableClock::new(start())),
    );

    let result = resolver.resolve(Some("Bearer abc")).await;

    assert_eq!(result, Err(IdentityRejection::InvalidOrExpiredToken));
}

#[rstest]
#[tokio::test]
async fn user_lookup_failure_is_an_invalid_token() {
    let now = start();
    let mut tokens = MockTokenRepository::new();
    tokens
        .expect_find_by_hash_scope_not_expired()
        .times(1)
        .returning(move |hash, scope, _| {
            Ok(Some(crate::domain::TokenRecord {
                hash: *hash,
                user_id: UserId::new(1),
                expiry: now + Duration::hours(1),
                scope,
            }))
        });
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .returning(|_| Err(UserPersistenceError::query("statement timeout")));
    let resolver = TokenIdentityResolver::new(
        Arc::new(tokens),
        Arc::new(users),
        Arc::new(MutableClock::new(now)),
    );

    let result = resolver.resolve(Some("Bearer abc")).await;

    assert_eq!(result, Err(IdentityRejection::InvalidOrExpiredToken));
}
