// Integration tests for `AuthClient` using wiremock.
#![allow(clippy::unwrap_used)]

use chrono::Utc;
use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use estatelist_api::{AuthClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AuthClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::new(SecretString::from("test-anon-key"));
    let base = server.uri().parse().unwrap();
    let client = AuthClient::new(base, &transport).unwrap();
    (server, client)
}

fn token_body(user_id: Uuid) -> serde_json::Value {
    json!({
        "access_token": "jwt-access",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "jwt-refresh",
        "user": {
            "id": user_id,
            "email": "buyer@example.com",
            "created_at": "2024-01-15T09:30:00Z"
        }
    })
}

// ── Flows ───────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_in_uses_password_grant() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({
            "email": "buyer@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(user_id)))
        .mount(&server)
        .await;

    let pair = client.sign_in("buyer@example.com", "hunter2").await.unwrap();
    assert_eq!(pair.access_token, "jwt-access");
    assert_eq!(pair.refresh_token, "jwt-refresh");
    assert_eq!(pair.user.id, user_id);
    assert!(pair.expires_at > Utc::now());
}

#[tokio::test]
async fn sign_up_returns_token_pair() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(user_id)))
        .mount(&server)
        .await;

    let pair = client.sign_up("buyer@example.com", "hunter2").await.unwrap();
    assert_eq!(pair.user.email.as_deref(), Some("buyer@example.com"));
}

#[tokio::test]
async fn refresh_exchanges_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "jwt-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(Uuid::new_v4())))
        .mount(&server)
        .await;

    let pair = client.refresh("jwt-refresh").await.unwrap();
    assert_eq!(pair.access_token, "jwt-access");
}

#[tokio::test]
async fn sign_out_sends_bearer() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer jwt-access"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.sign_out("jwt-access").await.unwrap();
}

#[tokio::test]
async fn get_user_maps_401_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_user("stale").await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
}

// ── Error bodies ────────────────────────────────────────────────────

#[tokio::test]
async fn bad_credentials_surface_description() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let err = client.sign_in("buyer@example.com", "wrong").await.unwrap_err();
    match err {
        Error::Auth { message } => assert_eq!(message, "Invalid login credentials"),
        other => panic!("expected Auth error, got {other}"),
    }
}

#[tokio::test]
async fn legacy_msg_body_is_understood() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "msg": "User already registered"
        })))
        .mount(&server)
        .await;

    let err = client.sign_up("buyer@example.com", "hunter2").await.unwrap_err();
    match err {
        Error::Auth { message } => assert_eq!(message, "User already registered"),
        other => panic!("expected Auth error, got {other}"),
    }
}
