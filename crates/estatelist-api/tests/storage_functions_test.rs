// Integration tests for `StorageClient` and `FunctionsClient`.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use estatelist_api::{
    ContactMessage, CreatePaymentIntent, Error, FunctionsClient, StorageClient, TransportConfig,
};

const BUCKET: &str = "listing-images";

async fn storage() -> (MockServer, StorageClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::new(SecretString::from("test-anon-key"));
    let client = StorageClient::new(server.uri().parse().unwrap(), &transport).unwrap();
    (server, client)
}

async fn functions() -> (MockServer, FunctionsClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::new(SecretString::from("test-anon-key"));
    let client = FunctionsClient::new(server.uri().parse().unwrap(), &transport).unwrap();
    (server, client)
}

// ── Storage ─────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_sets_cache_control_and_no_upsert() {
    let (server, client) = storage().await;

    Mock::given(method("POST"))
        .and(path(format!("/storage/v1/object/{BUCKET}/17-abc.jpg")))
        .and(header("cache-control", "3600"))
        .and(header("x-upsert", "false"))
        .and(header("content-type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Key": "listing-images/17-abc.jpg"
        })))
        .mount(&server)
        .await;

    client
        .upload(BUCKET, "17-abc.jpg", vec![0xff, 0xd8], "image/jpeg", Some("tok"))
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_name_collision_is_storage_error() {
    let (server, client) = storage().await;

    Mock::given(method("POST"))
        .and(path(format!("/storage/v1/object/{BUCKET}/dup.jpg")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "The resource already exists"
        })))
        .mount(&server)
        .await;

    let err = client
        .upload(BUCKET, "dup.jpg", vec![1], "image/jpeg", None)
        .await
        .unwrap_err();
    match err {
        Error::Storage { status, message } => {
            assert_eq!(status, 409);
            assert!(message.contains("already exists"));
        }
        other => panic!("expected Storage error, got {other}"),
    }
}

#[tokio::test]
async fn public_url_is_deterministic_and_offline() {
    let (_server, client) = storage().await;
    // No mock mounted: this must not touch the network.
    let url = client.public_url(BUCKET, "17-abc.jpg");
    assert!(url.ends_with("/storage/v1/object/public/listing-images/17-abc.jpg"));
}

#[tokio::test]
async fn remove_posts_prefix_list() {
    let (server, client) = storage().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/storage/v1/object/{BUCKET}")))
        .and(body_json(json!({ "prefixes": ["17-abc.jpg"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.remove(BUCKET, "17-abc.jpg", Some("tok")).await.unwrap();
}

// ── Functions ───────────────────────────────────────────────────────

#[tokio::test]
async fn payment_intent_round_trip() {
    let (server, client) = functions().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-payment-intent"))
        .and(body_json(json!({
            "amount": 25_000_000,
            "currency": "usd",
            "listingId": "listing-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_secret": "pi_123_secret_456"
        })))
        .mount(&server)
        .await;

    let intent = client
        .create_payment_intent(
            &CreatePaymentIntent {
                amount: 25_000_000,
                currency: "usd".into(),
                listing_id: "listing-1".into(),
            },
            Some("tok"),
        )
        .await
        .unwrap();
    assert_eq!(intent.client_secret, "pi_123_secret_456");
}

#[tokio::test]
async fn payment_intent_4xx_error_body() {
    let (server, client) = functions().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-payment-intent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Invalid amount"
        })))
        .mount(&server)
        .await;

    let err = client
        .create_payment_intent(
            &CreatePaymentIntent {
                amount: 0,
                currency: "usd".into(),
                listing_id: "listing-1".into(),
            },
            None,
        )
        .await
        .unwrap_err();
    match err {
        Error::Function { name, message, status } => {
            assert_eq!(name, "create-payment-intent");
            assert_eq!(message, "Invalid amount");
            assert_eq!(status, 400);
        }
        other => panic!("expected Function error, got {other}"),
    }
}

#[tokio::test]
async fn contact_relay_skips_absent_phone() {
    let (server, client) = functions().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/contact-email"))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Viewing",
            "message": "Is Saturday possible?"
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .send_contact(
            &ContactMessage {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: None,
                subject: "Viewing".into(),
                message: "Is Saturday possible?".into(),
            },
            None,
        )
        .await
        .unwrap();
}
