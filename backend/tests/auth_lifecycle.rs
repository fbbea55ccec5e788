//! End-to-end token lifecycle over the full HTTP stack.

#[path = "common/api.rs"]
mod api;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use chrono::Duration;
use rstest::rstest;
use workout_backend::domain::OwnershipDisclosure;
use workout_backend::test_support::{InMemoryBackend, test_app};

use api::{authorized, bearer, register, scenario_start, send};

#[actix_web::test]
async fn token_stops_working_after_its_lifetime() {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.default_state(OwnershipDisclosure::default()),
    ))
    .await;
    register(&app, "alice", "alice@example.com", "wonderland").await;
    let alice = bearer(&app, "alice", "wonderland").await;

    backend.clock.advance(Duration::hours(23));
    let reply = send(
        &app,
        authorized(TestRequest::get().uri("/api/v1/users/me"), Some(&alice)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["username"], "alice");

    backend.clock.advance(Duration::hours(1) + Duration::seconds(1));
    let reply = send(
        &app,
        authorized(TestRequest::get().uri("/api/v1/users/me"), Some(&alice)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["message"], "invalid or expired token");
    assert_eq!(reply.challenge.as_deref(), Some("Bearer"));
}

#[actix_web::test]
async fn configured_lifetime_is_honoured() {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.http_state(OwnershipDisclosure::default(), Duration::minutes(30)),
    ))
    .await;
    register(&app, "alice", "alice@example.com", "wonderland").await;
    let alice = bearer(&app, "alice", "wonderland").await;

    backend.clock.advance(Duration::minutes(31));
    let reply = send(
        &app,
        authorized(TestRequest::get().uri("/api/v1/workouts"), Some(&alice)),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn revocation_is_scoped_to_the_caller() {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.default_state(OwnershipDisclosure::default()),
    ))
    .await;
    register(&app, "alice", "alice@example.com", "wonderland").await;
    register(&app, "bobby", "bob@example.com", "builder").await;
    let alice_phone = bearer(&app, "alice", "wonderland").await;
    let alice_laptop = bearer(&app, "alice", "wonderland").await;
    let bob = bearer(&app, "bobby", "builder").await;

    let reply = send(
        &app,
        authorized(
            TestRequest::delete().uri("/api/v1/tokens/authentication"),
            Some(&alice_phone),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    for token in [&alice_phone, &alice_laptop] {
        let reply = send(
            &app,
            authorized(TestRequest::get().uri("/api/v1/users/me"), Some(token)),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }
    let reply = send(
        &app,
        authorized(TestRequest::get().uri("/api/v1/users/me"), Some(&bob)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    // A fresh login after revocation works again.
    let again = bearer(&app, "alice", "wonderland").await;
    let reply = send(
        &app,
        authorized(TestRequest::get().uri("/api/v1/users/me"), Some(&again)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[rstest]
#[case("Basic YWxpY2U6d29uZGVybGFuZA==")]
#[case("Bearer")]
#[case("Bearer ")]
#[case("Bearer a b")]
#[case("bearer-token")]
#[actix_web::test]
async fn malformed_header_is_rejected_even_on_public_routes(#[case] header: &str) {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.default_state(OwnershipDisclosure::default()),
    ))
    .await;

    // Registration needs no identity, yet a malformed header still fails.
    let req = TestRequest::post().uri("/api/v1/users").set_json(serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "wonderland",
    }));
    let reply = send(&app, authorized(req, Some(header))).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["code"], "unauthorized");
    assert!(backend.users.is_empty(), "handler must not run");
}

#[actix_web::test]
async fn unknown_token_is_unauthorized() {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.default_state(OwnershipDisclosure::default()),
    ))
    .await;
    let forged = format!("Bearer {}", "ab".repeat(32));

    let reply = send(
        &app,
        authorized(TestRequest::get().uri("/api/v1/workouts"), Some(&forged)),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["message"], "invalid or expired token");
}

#[rstest]
#[case(TestRequest::get().uri("/api/v1/users/me"))]
#[case(TestRequest::put().uri("/api/v1/users/me"))]
#[case(TestRequest::delete().uri("/api/v1/tokens/authentication"))]
#[case(TestRequest::get().uri("/api/v1/workouts"))]
#[case(TestRequest::post().uri("/api/v1/workouts"))]
#[case(TestRequest::get().uri("/api/v1/workouts/1"))]
#[case(TestRequest::put().uri("/api/v1/workouts/1"))]
#[case(TestRequest::delete().uri("/api/v1/workouts/1"))]
#[actix_web::test]
async fn anonymous_callers_are_challenged(#[case] req: TestRequest) {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.default_state(OwnershipDisclosure::default()),
    ))
    .await;

    let reply = send(&app, req.to_request()).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.challenge.as_deref(), Some("Bearer"));
}

#[actix_web::test]
async fn every_api_response_varies_on_authorization() {
    let backend = InMemoryBackend::new(scenario_start());
    let app = test::init_service(test_app(
        backend.default_state(OwnershipDisclosure::default()),
    ))
    .await;

    let created = register(&app, "alice", "alice@example.com", "wonderland").await;
    let duplicate = register(&app, "alice", "alice@example.com", "wonderland").await;
    let anonymous = send(
        &app,
        TestRequest::get().uri("/api/v1/workouts").to_request(),
    )
    .await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    for reply in [&created, &duplicate, &anonymous] {
        let vary = reply.vary.as_deref().unwrap_or_default();
        assert!(vary.contains("Authorization"), "missing Vary: {vary:?}");
        assert!(reply.trace_id.is_some(), "missing trace id");
    }
    assert_eq!(anonymous.body["traceId"].as_str(), anonymous.trace_id.as_deref());
}
