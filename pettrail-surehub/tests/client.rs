use std::time::Duration;

use chrono::NaiveDate;
use httpmock::{Method, MockServer};
use serde_json::{json, Value};

use pettrail_surehub::{alerts, HarvestOptions, SurehubClient, SurehubError};

const TOKEN: &str = "tok-123";

fn notification_batch(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "type": 34,
                "text": format!("{}ml from Fountain 1", i + 1),
                "created_at": "2025-05-30T06:12:00+00:00",
            })
        })
        .collect()
}

async fn logged_in_client(server: &MockServer) -> SurehubClient {
    server.mock(|when, then| {
        when.method(Method::POST).path("/api/auth/login");
        then.status(200).json_body(json!({ "data": { "token": TOKEN } }));
    });

    let mut client = SurehubClient::builder()
        .endpoint(server.base_url())
        .credentials("me@example.com", "secret")
        .build();
    client.login().await.unwrap();
    client
}

fn quick_harvest(page_size: u32, max_pages: u32) -> HarvestOptions {
    HarvestOptions {
        page_size,
        max_pages,
        cooldown: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_login_sends_credentials_and_stores_token() {
    let server = MockServer::start();

    let login = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/api/auth/login")
            .json_body(json!({
                "email_address": "me@example.com",
                "password": "secret",
                "device_id": "0123456789",
            }));
        then.status(200).json_body(json!({ "data": { "token": TOKEN } }));
    });

    let pets = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/pet")
            .header("authorization", format!("Bearer {TOKEN}"));
        then.status(200).json_body(json!({ "data": [
            { "id": 7, "name": "Miso", "household_id": 42 },
            { "id": 8, "household_id": 42 },
        ]}));
    });

    let mut client = SurehubClient::builder()
        .endpoint(server.base_url())
        .credentials("me@example.com", "secret")
        .build();
    client.login().await.unwrap();

    let listed = client.pets().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, 7);
    assert_eq!(listed[0].name.as_deref(), Some("Miso"));
    assert_eq!(listed[0].household_id, 42);
    assert_eq!(listed[1].name, None);

    login.assert_hits(1);
    pets.assert_hits(1);
}

#[tokio::test]
async fn test_login_rejection_is_an_auth_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(Method::POST).path("/api/auth/login");
        then.status(401);
    });

    let mut client = SurehubClient::builder()
        .endpoint(server.base_url())
        .credentials("me@example.com", "wrong")
        .build();

    let err = client.login().await.unwrap_err();
    assert!(matches!(err, SurehubError::Auth(_)));
}

#[tokio::test]
async fn test_aggregate_report_passes_date_range() {
    let server = MockServer::start();
    let client = logged_in_client(&server).await;

    let report = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/report/household/42/pet/7/aggregate")
            .query_param("from", "2025-01-01")
            .query_param("to", "2025-06-01");
        then.status(200).json_body(json!({ "data": {
            "feeding": { "datapoints": [ { "to": "2025-05-30T08:00:00+00:00" } ] },
        }}));
    });

    let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let raw = client.aggregate_report(42, 7, from, to).await.unwrap();

    assert!(raw.contains_key("feeding"));
    report.assert_hits(1);
}

#[tokio::test]
async fn test_harvest_stops_on_empty_page() {
    let server = MockServer::start();
    let client = logged_in_client(&server).await;

    let page1 = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/notification")
            .query_param("page", "1")
            .query_param("page_size", "25");
        then.status(200).json_body(json!({ "data": notification_batch(25) }));
    });
    let page2 = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/notification")
            .query_param("page", "2");
        then.status(200).json_body(json!({ "data": notification_batch(25) }));
    });
    let page3 = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/notification")
            .query_param("page", "3");
        then.status(200).json_body(json!({ "data": [] }));
    });

    let collected = alerts::harvest(&client, &quick_harvest(25, 40)).await.unwrap();

    assert_eq!(collected.len(), 50);
    // Provider order is preserved across page boundaries.
    assert_eq!(collected[0].text, "1ml from Fountain 1");
    assert_eq!(collected[25].text, "1ml from Fountain 1");
    page1.assert_hits(1);
    page2.assert_hits(1);
    page3.assert_hits(1);
}

#[tokio::test]
async fn test_harvest_stops_at_page_ceiling() {
    let server = MockServer::start();
    let client = logged_in_client(&server).await;

    for page in 1..=3 {
        server.mock(|when, then| {
            when.method(Method::GET)
                .path("/api/notification")
                .query_param("page", page.to_string());
            then.status(200).json_body(json!({ "data": notification_batch(25) }));
        });
    }

    let collected = alerts::harvest(&client, &quick_harvest(25, 2)).await.unwrap();

    // Ceiling of 2 pages caps the harvest even though page 3 had records.
    assert_eq!(collected.len(), 50);
}

#[tokio::test]
async fn test_harvest_propagates_transport_failure() {
    let server = MockServer::start();
    let client = logged_in_client(&server).await;

    server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/notification")
            .query_param("page", "1");
        then.status(200).json_body(json!({ "data": notification_batch(25) }));
    });
    server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/notification")
            .query_param("page", "2");
        then.status(500);
    });

    let err = alerts::harvest(&client, &quick_harvest(25, 40)).await.unwrap_err();
    assert!(matches!(err, SurehubError::Http(_)));
}

#[tokio::test]
async fn test_expired_token_is_an_auth_error() {
    let server = MockServer::start();
    let client = logged_in_client(&server).await;

    server.mock(|when, then| {
        when.method(Method::GET).path("/api/pet");
        then.status(401);
    });

    let err = client.pets().await.unwrap_err();
    assert!(matches!(err, SurehubError::Auth(_)));
}
