// End-to-end portal flow tests against a mocked backend.
//
// These exercise the two-phase image/record mutations and the session
// lifecycle through the real api-crate clients, with wiremock standing
// in for the hosted services.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use estatelist_core::{
    CoreError, GateDecision, ImageUpload, ListingDraft, ListingFilter, Portal, PortalConfig,
    PropertyType, RouteId, SessionState,
};

const USER_ID: &str = "6a8f2f64-1111-2222-3333-444455556666";

// ── Helpers ─────────────────────────────────────────────────────────

async fn portal(server: &MockServer) -> Portal {
    let config = PortalConfig::new(
        server.uri().parse().unwrap(),
        SecretString::from("test-anon-key"),
    );
    Portal::new(config).unwrap()
}

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "jwt-access",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "jwt-refresh",
        "user": {
            "id": USER_ID,
            "email": "owner@example.com",
            "created_at": "2024-01-15T09:30:00Z"
        }
    })
}

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(server)
        .await;
}

fn draft() -> ListingDraft {
    ListingDraft {
        title: "Sunny cottage".into(),
        description: "Two floors, big garden".into(),
        property_type: PropertyType::House,
        price: 250_000.0,
        location: "Austin, TX".into(),
        bedrooms: 3,
        bathrooms: 2,
        area_sqft: 1500,
    }
}

fn stored_listing(id: Uuid, image_url: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Sunny cottage",
        "description": "Two floors, big garden",
        "type": "house",
        "price": 250_000.0,
        "location": "Austin, TX",
        "bedrooms": 3,
        "bathrooms": 2,
        "area": 1500,
        "image_url": image_url,
        "user_id": USER_ID,
        "created_at": "2024-05-01T12:00:00Z"
    })
}

fn image() -> ImageUpload {
    ImageUpload {
        file_name: "garden.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![0xff, 0xd8, 0xff],
    }
}

// ── Create (two-phase) ──────────────────────────────────────────────

#[tokio::test]
async fn create_uploads_image_then_inserts_record() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    Mock::given(method("POST"))
        .and(wiremock::matchers::path_regex(
            r"^/storage/v1/object/listing-images/\d+-\w+\.jpg$",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/rest/v1/listings"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([stored_listing(id, Some("https://cdn/x.jpg"))])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    let listing = portal.create_listing(&draft(), Some(image())).await.unwrap();
    assert_eq!(listing.id.to_string(), id.to_string());
    assert_eq!(listing.property_type, PropertyType::House);
    assert_eq!(listing.owner_id.to_string(), USER_ID);
}

#[tokio::test]
async fn failed_insert_after_upload_orphans_the_image() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    // Upload succeeds once; no storage DELETE must ever arrive.
    Mock::given(method("POST"))
        .and(wiremock::matchers::path_regex(r"^/storage/v1/object/listing-images/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/listing-images"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/listings"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "insert failed"
        })))
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    let err = portal.create_listing(&draft(), Some(image())).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));
}

#[tokio::test]
async fn create_without_session_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let portal = portal(&server).await;
    portal.connect().await;

    let err = portal.create_listing(&draft(), Some(image())).await.unwrap_err();
    assert!(matches!(err, CoreError::NotSignedIn));
    // Nothing was mounted; reaching the network would have errored
    // differently, so NotSignedIn proves the early check fired.
}

// ── Delete (best-effort image removal) ──────────────────────────────

#[tokio::test]
async fn delete_proceeds_when_image_removal_fails() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/listing-images"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "storage down"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = Uuid::new_v4();
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/listings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_listing(id, None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    let listing: estatelist_core::Listing =
        serde_json::from_value::<estatelist_api::ListingRecord>(stored_listing(
            id,
            Some("https://proj.supabase.co/storage/v1/object/public/listing-images/17-ab.jpg"),
        ))
        .unwrap()
        .into();

    portal.delete_listing(&listing).await.unwrap();
}

#[tokio::test]
async fn deleting_vanished_listing_reports_not_found() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    let listing: estatelist_core::Listing =
        serde_json::from_value::<estatelist_api::ListingRecord>(stored_listing(
            Uuid::new_v4(),
            None,
        ))
        .unwrap()
        .into();

    let err = portal.delete_listing(&listing).await.unwrap_err();
    assert!(matches!(err, CoreError::ListingNotFound { .. }));
}

#[tokio::test]
async fn delete_by_non_owner_is_rejected_locally() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    let mut foreign = stored_listing(Uuid::new_v4(), None);
    foreign["user_id"] = json!(Uuid::new_v4());
    let listing: estatelist_core::Listing =
        serde_json::from_value::<estatelist_api::ListingRecord>(foreign)
            .unwrap()
            .into();

    let err = portal.delete_listing(&listing).await.unwrap_err();
    assert!(matches!(err, CoreError::NotOwner));
}

// ── Round trip ──────────────────────────────────────────────────────

#[tokio::test]
async fn created_listing_round_trips_through_get() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/rest/v1/listings"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([stored_listing(id, None)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_listing(id, None)))
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    let d = draft();
    let created = portal.create_listing(&d, None).await.unwrap();
    let fetched = portal.listing(created.id).await.unwrap();

    assert_eq!(fetched.title, d.title);
    assert_eq!(fetched.description, d.description);
    assert_eq!(fetched.property_type, d.property_type);
    assert!((fetched.price - d.price).abs() < f64::EPSILON);
    assert_eq!(fetched.location, d.location);
    assert_eq!(fetched.bedrooms, d.bedrooms);
    assert_eq!(fetched.bathrooms, d.bathrooms);
    assert_eq!(fetched.area_sqft, d.area_sqft);
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn connect_without_restore_token_resolves_signed_out() {
    let server = MockServer::start().await;
    let portal = portal(&server).await;

    assert!(portal.session().current().is_unknown());
    portal.connect().await;
    assert!(matches!(portal.session().current(), SessionState::SignedOut));
    portal.shutdown().await;
}

#[tokio::test]
async fn connect_with_restore_token_restores_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;

    let config = PortalConfig::new(
        server.uri().parse().unwrap(),
        SecretString::from("test-anon-key"),
    )
    .with_restore_token(Some(SecretString::from("jwt-refresh")));
    let portal = Portal::new(config).unwrap();

    portal.connect().await;
    assert!(portal.session().current().is_signed_in());
    assert_eq!(
        portal.session().user().unwrap().email.as_deref(),
        Some("owner@example.com")
    );
    portal.shutdown().await;
}

// ── Guard wiring ────────────────────────────────────────────────────

#[tokio::test]
async fn guarded_view_waits_then_redirects_once() {
    let server = MockServer::start().await;
    let portal = portal(&server).await;
    let mut guard = portal.guard(RouteId::CreateListing);

    // Session unknown: placeholder, not a decision.
    assert_eq!(guard.decision(), GateDecision::Pending);

    portal.connect().await;
    assert_eq!(guard.changed().await, Some(GateDecision::RedirectToLogin));
    portal.shutdown().await;
}

#[tokio::test]
async fn admin_decision_denies_without_role() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "role": "agent"
        })))
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    portal.sign_in("owner@example.com", "pw").await.unwrap();

    assert!(matches!(
        portal.admin_decision().await,
        GateDecision::Denied { .. }
    ));
}

// ── Filter pass-through ─────────────────────────────────────────────

#[tokio::test]
async fn gateway_list_renders_filter_predicates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .and(query_param("type", "eq.townhouse"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let portal = portal(&server).await;
    let filter = ListingFilter {
        property_type: Some(PropertyType::Townhouse),
        ..ListingFilter::default()
    };
    use estatelist_core::ListingGateway;
    let rows = portal.gateway().list(&filter).await.unwrap();
    assert!(rows.is_empty());
}
