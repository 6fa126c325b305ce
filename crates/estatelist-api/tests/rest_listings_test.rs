// Integration tests for the listings endpoints using wiremock.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use estatelist_api::{
    Error, ListingChanges, ListingQuery, NewListingRecord, RestClient, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::new(SecretString::from("test-anon-key"));
    let base = server.uri().parse().unwrap();
    let client = RestClient::new(base, &transport).unwrap();
    (server, client)
}

fn listing_json(id: Uuid, title: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "Charming three-bed near the river",
        "type": "house",
        "price": price,
        "location": "Austin, TX",
        "bedrooms": 3,
        "bathrooms": 2,
        "area": 1500,
        "image_url": "https://cdn.example/listing-images/1.jpg",
        "user_id": Uuid::new_v4(),
        "created_at": "2024-05-01T12:00:00Z"
    })
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_unfiltered_orders_newest_first() {
    let (server, client) = setup().await;

    let body = json!([listing_json(Uuid::new_v4(), "Newest", 450_000.0)]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let rows = client
        .list_listings(&ListingQuery::default(), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Newest");
}

#[tokio::test]
async fn list_applies_every_present_predicate() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .and(query_param("type", "eq.condo"))
        .and(query_param("price", "gte.100000"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("location", "ilike.*lake*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let filter = ListingQuery {
        property_type: Some("condo".into()),
        min_price: Some(100_000.0),
        max_price: None,
        location: Some("lake".into()),
    };
    let rows = client.list_listings(&filter, None).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn absent_filter_fields_add_no_predicates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param_is_missing("type"))
        .and(query_param_is_missing("price"))
        .and(query_param_is_missing("location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client
        .list_listings(&ListingQuery::default(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn get_by_id_uses_single_object_accept() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .and(query_param("id", format!("eq.{id}")))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(id, "One", 99_000.0)))
        .mount(&server)
        .await;

    let row = client.get_listing(&id, None).await.unwrap();
    assert_eq!(row.id, id);
    assert_eq!(row.bedrooms, 3);
}

#[tokio::test]
async fn get_by_id_maps_406_to_not_found() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .respond_with(ResponseTemplate::new(406))
        .mount(&server)
        .await;

    let err = client.get_listing(&id, None).await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got {err}");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn insert_sends_array_body_and_returns_row() {
    let (server, client) = setup().await;
    let owner = Uuid::new_v4();
    let stored = listing_json(Uuid::new_v4(), "New home", 250_000.0);

    let new = NewListingRecord {
        title: "New home".into(),
        description: "Charming three-bed near the river".into(),
        property_type: "house".into(),
        price: 250_000.0,
        location: "Austin, TX".into(),
        bedrooms: 3,
        bathrooms: 2,
        area: 1500,
        image_url: None,
        user_id: owner,
    };

    Mock::given(method("POST"))
        .and(path("/rest/v1/listings"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([{
            "title": "New home",
            "description": "Charming three-bed near the river",
            "type": "house",
            "price": 250000.0,
            "location": "Austin, TX",
            "bedrooms": 3,
            "bathrooms": 2,
            "area": 1500,
            "image_url": null,
            "user_id": owner,
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored])))
        .mount(&server)
        .await;

    let row = client.insert_listing(&new, Some("user-token")).await.unwrap();
    assert_eq!(row.title, "New home");
    // Numeric fields arrive as numbers, not strings.
    assert!((row.price - 250_000.0).abs() < f64::EPSILON);
    assert_eq!(row.area, 1500);
}

#[tokio::test]
async fn update_patches_by_id() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();
    let mut stored = listing_json(id, "Renamed", 260_000.0);
    stored["price"] = json!(260_000.0);

    let changes = ListingChanges {
        title: Some("Renamed".into()),
        price: Some(260_000.0),
        ..ListingChanges::default()
    };

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/listings"))
        .and(query_param("id", format!("eq.{id}")))
        .and(body_json(json!({ "title": "Renamed", "price": 260000.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored])))
        .mount(&server)
        .await;

    let row = client
        .update_listing(&id, &changes, Some("user-token"))
        .await
        .unwrap();
    assert_eq!(row.title, "Renamed");
}

#[tokio::test]
async fn delete_reports_vanished_id() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    // Representation of the deleted rows: empty array = nothing matched.
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/listings"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client.delete_listing(&id, Some("user-token")).await.unwrap_err();
    assert!(matches!(err, Error::RowNotFound { .. }));
}

#[tokio::test]
async fn delete_succeeds_when_row_existed() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/listings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([listing_json(id, "Gone", 1.0)])),
        )
        .mount(&server)
        .await;

    client.delete_listing(&id, Some("user-token")).await.unwrap();
}

// ── Error envelope ──────────────────────────────────────────────────

#[tokio::test]
async fn rest_error_body_is_parsed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "invalid input syntax for type numeric",
            "code": "22P02"
        })))
        .mount(&server)
        .await;

    let err = client
        .list_listings(&ListingQuery::default(), None)
        .await
        .unwrap_err();
    match err {
        Error::Rest { message, code, status } => {
            assert_eq!(status, 400);
            assert_eq!(code.as_deref(), Some("22P02"));
            assert!(message.contains("numeric"));
        }
        other => panic!("expected Rest error, got {other}"),
    }
}

#[tokio::test]
async fn unauthorized_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/listings"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .list_listings(&ListingQuery::default(), Some("stale-token"))
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
}
