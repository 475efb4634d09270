// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP behaviour of the Iconify client against a mock API.

use serde_json::json;
use templ_iconify::catalog::{CatalogClient, IconifyClient};
use templ_iconify::error::CatalogError;
use templ_iconify::icon::IconIdentity;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1em" height="1em" viewBox="0 0 24 24"><path fill="currentColor" d="M10 20v-6h4v6"/></svg>"#;

// =============================================================================
// Collections
// =============================================================================

#[tokio::test]
async fn test_list_collections_returns_sorted_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "solar": { "name": "Solar", "total": 7000 },
            "mdi": { "name": "Material Design Icons", "total": 7400 },
            "mdi-light": { "name": "Material Design Light" }
        })))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    let collections = client.list_collections().await.unwrap();
    assert_eq!(collections, vec!["mdi", "mdi-light", "solar"]);
}

#[tokio::test]
async fn test_list_collections_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    let err = client.list_collections().await.unwrap_err();
    match err {
        CatalogError::Unavailable { reason, .. } => assert!(reason.contains("500")),
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_collections_payload_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    assert!(matches!(
        client.list_collections().await,
        Err(CatalogError::Unavailable { .. })
    ));
}

// =============================================================================
// Icon listing
// =============================================================================

#[tokio::test]
async fn test_list_icons_unions_all_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collection"))
        .and(query_param("prefix", "mdi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prefix": "mdi",
            "uncategorized": ["home"],
            "hidden": ["home-old"],
            "categories": {
                "Account": ["account", "home"],
                "Nature": ["leaf"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    let mut icons = client.list_icons("mdi").await.unwrap();
    icons.sort();
    assert_eq!(icons, vec!["account", "home", "home-old", "leaf"]);
}

#[tokio::test]
async fn test_list_icons_unknown_collection_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collection"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    assert!(matches!(
        client.list_icons("nope").await,
        Err(CatalogError::Unavailable { .. })
    ));
}

// =============================================================================
// Icon bodies
// =============================================================================

#[tokio::test]
async fn test_fetch_icon_returns_raw_svg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mdi/home.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_SVG))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    let body = client.fetch_icon(&IconIdentity::new("mdi", "home")).await.unwrap();
    assert_eq!(body, HOME_SVG);
}

#[tokio::test]
async fn test_fetch_icon_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mdi/ghost.svg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    let err = client
        .fetch_icon(&IconIdentity::new("mdi", "ghost"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CatalogError::IconNotFound {
            collection: "mdi".to_string(),
            name: "ghost".to_string(),
        }
    );
}

#[tokio::test]
async fn test_fetch_icon_503_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mdi/home.svg"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = IconifyClient::with_url(server.uri()).unwrap();
    let err = client
        .fetch_icon(&IconIdentity::new("mdi", "home"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Unavailable { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_unavailable() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = IconifyClient::with_url(uri).unwrap();
    assert!(matches!(
        client.list_collections().await,
        Err(CatalogError::Unavailable { .. })
    ));
}
