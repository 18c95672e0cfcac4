//! Tests for account handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{TestApi, init_api};

fn register_request(email: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "Ada",
            "email": email,
            "password": "correct horse"
        }))
}

#[rstest]
#[actix_web::test]
async fn register_then_login_issue_usable_tokens() {
    let api = TestApi::new();
    let business = api.seed("Joe's Cafe", "Cafe", "12 Harbour Road").await;
    let app = init_api!(api);

    let response =
        actix_test::call_service(&app, register_request("ada@example.com").to_request()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered: AuthResponse = actix_test::read_body_json(response).await;
    assert_eq!(registered.user.username, "Ada");
    assert_eq!(registered.user.email, "ada@example.com");

    let login_request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "ADA@example.com", "password": "correct horse"}))
        .to_request();
    let session: AuthResponse = actix_test::call_and_read_body_json(&app, login_request).await;
    assert_eq!(session.user.id, registered.user.id);

    let review = actix_test::TestRequest::post()
        .uri(&format!("/api/businesses/{}/reviews", business.id))
        .insert_header(("Authorization", format!("Bearer {}", session.token)))
        .set_json(json!({"rating": 4}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, review).await;
    assert_eq!(body["username"], "Ada");
    assert_eq!(body["userId"], json!(registered.user.id));
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_conflicts() {
    let api = TestApi::new();
    let app = init_api!(api);

    actix_test::call_service(&app, register_request("ada@example.com").to_request()).await;
    let response =
        actix_test::call_service(&app, register_request("Ada@Example.com").to_request()).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case(json!({"email": "ada@example.com", "password": "correct horse"}), "username", "missing_field")]
#[case(json!({"username": "Ada", "email": "not-an-email", "password": "correct horse"}), "email", "invalid_value")]
#[case(json!({"username": "Ada", "email": "ada@example.com", "password": "short"}), "password", "too_short")]
#[actix_web::test]
async fn register_validates_fields(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let api = TestApi::new();
    let app = init_api!(api);

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case("ada@example.com", "wrong password")]
#[case("nobody@example.com", "correct horse")]
#[actix_web::test]
async fn login_rejects_bad_credentials(#[case] email: &str, #[case] password: &str) {
    let api = TestApi::new();
    let app = init_api!(api);
    actix_test::call_service(&app, register_request("ada@example.com").to_request()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": email, "password": password}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");
}
