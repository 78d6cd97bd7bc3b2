//! End-to-end HTTP tests over the real services and in-memory storage.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::{Value, json};

use authgate::Trace;
use authgate::domain::TRACE_ID_HEADER;
use authgate::inbound::http::configure;
use authgate::test_support::InMemoryStack;

const PASSWORD: &str = "correct horse";

macro_rules! init_app {
    ($stack:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($stack.http_state()))
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

fn register_body(email: &str) -> Value {
    json!({
        "email": email,
        "name": "Ada Lovelace",
        "password": PASSWORD,
        "passwordConfirm": PASSWORD,
    })
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn registered_user_can_fetch_their_profile() {
    let stack = InMemoryStack::new(TimeDelta::hours(6));
    let app = init_app!(stack);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(register_body("Ada@Example.com"))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    let token = session["token"].as_str().expect("token").to_owned();
    assert_eq!(session["user"]["email"], "ada@example.com");
    assert!(session["user"].get("passwordHash").is_none());

    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(bearer(&token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["id"], session["user"]["id"]);
    assert_eq!(me["isActive"], true);
}

#[actix_web::test]
async fn login_then_list_users_without_hashes() {
    let stack = InMemoryStack::new(TimeDelta::hours(6));
    let app = init_app!(stack);

    for email in ["ada@example.com", "grace@example.com"] {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(register_body(email))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email": "GRACE@example.com", "password": PASSWORD}))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    let token = session["token"].as_str().expect("token").to_owned();

    let req = test::TestRequest::get()
        .uri("/users")
        .insert_header(bearer(&token))
        .to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    let users = users.as_array().expect("array");
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let stack = InMemoryStack::new(TimeDelta::hours(6));
    let app = init_app!(stack);

    for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(register_body("ada@example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), expected);
    }
    assert_eq!(stack.repo.len(), 1);
}

#[actix_web::test]
async fn check_token_renews_and_expiry_locks_out() {
    let stack = InMemoryStack::new(TimeDelta::hours(6));
    let app = init_app!(stack);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(register_body("ada@example.com"))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    let first = session["token"].as_str().expect("token").to_owned();

    stack.clock.advance_seconds(3_600);
    let req = test::TestRequest::get()
        .uri("/check-token")
        .insert_header(bearer(&first))
        .to_request();
    let renewed: Value = test::call_and_read_body_json(&app, req).await;
    let second = renewed["token"].as_str().expect("token").to_owned();
    assert_ne!(first, second);

    // Past the first token's expiry but inside the renewed one's.
    stack.clock.advance_seconds(6 * 3_600 - 1_800);
    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(bearer(&first))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(bearer(&second))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case::missing(None)]
#[case::basic(Some("Basic YWRhOnNlY3JldA=="))]
#[case::empty_bearer(Some("Bearer "))]
#[case::garbage(Some("Bearer not-a-token"))]
#[actix_web::test]
async fn protected_routes_reject_bad_credentials(#[case] header: Option<&str>) {
    let stack = InMemoryStack::new(TimeDelta::hours(6));
    let app = init_app!(stack);

    let mut req = test::TestRequest::get().uri("/users");
    if let Some(value) = header {
        req = req.insert_header((AUTHORIZATION, value));
    }
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "unauthorized");
}

#[actix_web::test]
async fn error_bodies_echo_the_trace_header() {
    let stack = InMemoryStack::new(TimeDelta::hours(6));
    let app = init_app!(stack);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email": "nobody@example.com", "password": PASSWORD}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["traceId"], header);
}
