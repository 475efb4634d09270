// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Resolve and download end to end against a mock Iconify API.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;
use templ_iconify::catalog::{CatalogClient, IconifyClient};
use templ_iconify::config::IconifyConfig;
use templ_iconify::download::{self, DownloadCoordinator, ProgressEvent, ProgressReceiver, RunState};
use templ_iconify::error::IconifyError;
use templ_iconify::icon::IconIdentity;
use templ_iconify::resolver::Resolver;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1em" height="1em" viewBox="0 0 24 24"><path fill="currentColor" d="M0 0h24v24H0z"/></svg>"#;

async fn mock_iconify() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mdi": { "name": "Material Design Icons" },
            "solar": { "name": "Solar" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collection"))
        .and(query_param("prefix", "mdi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uncategorized": ["home", "account"],
            "categories": { "Buildings": ["home-outline"] }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collection"))
        .and(query_param("prefix", "solar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hidden": ["home"]
        })))
        .mount(&server)
        .await;

    for svg_path in ["/mdi/home.svg", "/mdi/home-outline.svg", "/mdi/account.svg", "/solar/home.svg"] {
        Mock::given(method("GET"))
            .and(path(svg_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(SVG))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/mdi/ghost.svg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mdi/broken.svg"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    server
}

fn config_for(server: &MockServer, dir: &TempDir, workers: usize) -> IconifyConfig {
    IconifyConfig {
        api_url: server.uri(),
        save_dir: dir.path().to_path_buf(),
        worker_count: workers,
        ..IconifyConfig::default()
    }
}

/// Start the receiver and collect events up to and including Terminate.
async fn drain(mut receiver: ProgressReceiver) -> Vec<ProgressEvent> {
    receiver.start();
    let mut events = Vec::new();
    while let Some(event) = receiver.recv().await {
        let done = event == ProgressEvent::Terminate;
        events.push(event);
        if done {
            break;
        }
    }
    events
}

#[tokio::test]
async fn test_resolve_wildcards_against_api() {
    let server = mock_iconify().await;
    let catalog: Arc<dyn CatalogClient> = Arc::new(IconifyClient::with_url(server.uri()).unwrap());
    let resolver = Resolver::new(catalog);

    let icons = resolver.resolve(&["*:home", "mdi:home*"]).await.unwrap();
    let keys: Vec<String> = icons.iter().map(IconIdentity::key).collect();
    assert_eq!(keys, vec!["mdi:home", "mdi:home-outline", "solar:home"]);
}

#[tokio::test]
async fn test_resolve_without_matches() {
    let server = mock_iconify().await;
    let catalog: Arc<dyn CatalogClient> = Arc::new(IconifyClient::with_url(server.uri()).unwrap());

    let err = Resolver::new(catalog).resolve(&["mdi:zzz*"]).await.unwrap_err();
    assert!(matches!(err, IconifyError::NoIconsFound));
}

#[tokio::test]
async fn test_download_two_icons_with_two_workers() {
    let server = mock_iconify().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir, 2);
    let catalog: Arc<dyn CatalogClient> = Arc::new(IconifyClient::from_config(&config).unwrap());

    let icons = Resolver::new(catalog.clone())
        .resolve(&["mdi:home", "mdi:account"])
        .await
        .unwrap();
    assert_eq!(icons.len(), 2);

    let coordinator = DownloadCoordinator::new(catalog, &config);
    let (sink, receiver) = download::channel();
    let observer = tokio::spawn(drain(receiver));

    let summary = coordinator.run(icons, Arc::new(sink)).await.unwrap();
    assert_eq!(summary.saved, 2);
    assert_eq!(coordinator.state(), RunState::Done);

    let events = observer.await.unwrap();
    let saved = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Saved(_)))
        .count();
    assert_eq!(saved, 2);
    assert_eq!(events.last(), Some(&ProgressEvent::Terminate));

    let home = std::fs::read_to_string(dir.path().join("mdi").join("home.templ")).unwrap();
    assert!(home.starts_with("package mdi\n"));
    assert!(home.contains("templ Home(props HomeProps) {"));
    assert!(home.contains("width={ props.Width }"));
    assert!(home.contains("fill={ props.Color }"));
    assert!(!home.contains(r#"width="1em""#));
    assert!(dir.path().join("mdi").join("account.templ").exists());
}

#[tokio::test]
async fn test_missing_icon_fails_the_run() {
    let server = mock_iconify().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir, 1);
    let catalog: Arc<dyn CatalogClient> = Arc::new(IconifyClient::from_config(&config).unwrap());

    let coordinator = DownloadCoordinator::new(catalog, &config);
    let (sink, receiver) = download::channel();
    let observer = tokio::spawn(drain(receiver));

    let icons = vec![IconIdentity::new("mdi", "ghost"), IconIdentity::new("mdi", "home")];
    let err = coordinator.run(icons, Arc::new(sink)).await.unwrap_err();
    assert!(err.is_icon_not_found());
    assert_eq!(coordinator.state(), RunState::Failed);

    let events = observer.await.unwrap();
    let terminations = events
        .iter()
        .filter(|e| **e == ProgressEvent::Terminate)
        .count();
    assert_eq!(terminations, 1);
    assert!(!events.contains(&ProgressEvent::Saved(IconIdentity::new("mdi", "ghost"))));
}

/// In-memory log sink for a scoped subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_run_logs_nothing_at_default_level() {
    let server = mock_iconify().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir, 2);
    let catalog: Arc<dyn CatalogClient> = Arc::new(IconifyClient::from_config(&config).unwrap());

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("templ_iconify=warn"))
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let coordinator = DownloadCoordinator::new(catalog, &config);
    let (sink, receiver) = download::channel();
    let observer = tokio::spawn(drain(receiver));

    let icons = vec![IconIdentity::new("mdi", "broken"), IconIdentity::new("mdi", "ghost")];
    let err = coordinator.run(icons, Arc::new(sink)).await.unwrap_err();
    assert!(matches!(err, IconifyError::Fetch { .. }));
    observer.await.unwrap();

    let captured = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(captured.is_empty(), "unexpected log output: {captured}");
}
