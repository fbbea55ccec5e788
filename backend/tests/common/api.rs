//! HTTP helpers for end-to-end scenarios over the in-memory backend.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

/// Instant every scenario starts from.
pub fn scenario_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 6, 7, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Status and decoded body of a response. Empty bodies decode to `Null`.
pub struct Reply {
    pub status: StatusCode,
    pub vary: Option<String>,
    pub challenge: Option<String>,
    pub trace_id: Option<String>,
    pub body: Value,
}

pub async fn send<S>(app: &S, req: Request) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let header_text = |name: &str| {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let status = res.status();
    let vary = header_text(header::VARY.as_str());
    let challenge = header_text(header::WWW_AUTHENTICATE.as_str());
    let trace_id = header_text("trace-id");
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        vary,
        challenge,
        trace_id,
        body,
    }
}

pub fn authorized(req: TestRequest, bearer: Option<&str>) -> Request {
    match bearer {
        Some(value) => req
            .insert_header((header::AUTHORIZATION, value.to_owned()))
            .to_request(),
        None => req.to_request(),
    }
}

pub async fn register<S>(app: &S, username: &str, email: &str, password: &str) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({ "username": username, "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn login<S>(app: &S, username: &str, password: &str) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/v1/tokens/authentication")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    send(app, req).await
}

/// Log in and return the `Authorization` header value.
pub async fn bearer<S>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = login(app, username, password).await;
    assert_eq!(reply.status, StatusCode::CREATED, "login of {username}");
    let token = reply.body["authToken"]["token"]
        .as_str()
        .expect("token in body");
    format!("Bearer {token}")
}

pub fn leg_day() -> Value {
    json!({
        "title": "Leg day",
        "description": "Heavy squats",
        "durationMinutes": 60,
        "caloriesBurned": 450,
        "entries": [
            {"exerciseName": "Squat", "sets": 5, "reps": 5, "weight": 100.0, "orderIndex": 0},
            {"exerciseName": "Wall sit", "sets": 3, "durationSeconds": 45, "orderIndex": 1}
        ]
    })
}
