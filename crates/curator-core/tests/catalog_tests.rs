use std::sync::{Arc, Mutex};
use std::time::Duration;

use curator_core::{
    CatalogClient, CatalogEntry, Component, CurationObserver, CuratorError, ErrorKind, Slug,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INFO_PATH: &str = "/plugins/info/1.2/";

#[derive(Default)]
struct RecordingObserver {
    errors: Mutex<Vec<(ErrorKind, Component)>>,
    fetched: Mutex<Vec<(usize, Vec<Slug>)>>,
}

impl CurationObserver for RecordingObserver {
    fn on_error(&self, kind: ErrorKind, _message: &str, component: Component) {
        self.errors.lock().unwrap().push((kind, component));
    }

    fn on_fetched(&self, entries: &[CatalogEntry], failed: &[Slug]) {
        self.fetched
            .lock()
            .unwrap()
            .push((entries.len(), failed.to_vec()));
    }
}

fn slug(raw: &str) -> Slug {
    Slug::parse(raw).unwrap()
}

fn plugin_json(slug: &str) -> serde_json::Value {
    serde_json::json!({
        "slug": slug,
        "name": format!("Plugin {}", slug),
        "version": "1.0.0",
        "rating": 92,
        "active_installs": 10000
    })
}

async fn mount_plugin(server: &MockServer, slug: &str) {
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .and(query_param("action", "plugin_information"))
        .and(query_param("request[slug]", slug))
        .respond_with(ResponseTemplate::new(200).set_body_json(plugin_json(slug)))
        .mount(server)
        .await;
}

fn client(server: &MockServer, observer: Arc<RecordingObserver>) -> CatalogClient {
    CatalogClient::new(observer)
        .unwrap()
        .with_base_url(server.uri())
        .with_request_delay(Duration::ZERO)
}

// ── fetch_one ───────────────────────────────────────────────────

#[tokio::test]
async fn fetch_one_requests_extended_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .and(query_param("request[slug]", "akismet"))
        .and(query_param("request[fields][active_installs]", "1"))
        .and(query_param("request[fields][icons]", "1"))
        .and(query_param("request[fields][short_description]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plugin_json("akismet")))
        .expect(1)
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::default());
    let entry = client(&server, observer.clone())
        .fetch_one(&slug("akismet"))
        .await
        .unwrap();

    assert_eq!(entry.slug, "akismet");
    assert_eq!(entry.name(), Some("Plugin akismet"));
    assert_eq!(entry.field("active_installs"), Some(&serde_json::json!(10000)));
    assert!(observer.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_one_maps_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("request[slug]", "server-error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("request[slug]", "no-identity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Plugin not found."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("request[slug]", "not-json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
        .mount(&server)
        .await;
    // Anything unmatched is a 404 from the mock server.

    let observer = Arc::new(RecordingObserver::default());
    let client = client(&server, observer.clone());

    assert!(matches!(
        client.fetch_one(&slug("missing")).await,
        Err(CuratorError::NotFound { .. })
    ));
    assert!(matches!(
        client.fetch_one(&slug("server-error")).await,
        Err(CuratorError::Network {
            status_code: Some(500),
            ..
        })
    ));
    assert!(matches!(
        client.fetch_one(&slug("no-identity")).await,
        Err(CuratorError::InvalidResponse { .. })
    ));
    assert!(matches!(
        client.fetch_one(&slug("not-json")).await,
        Err(CuratorError::InvalidResponse { .. })
    ));

    let errors = observer.errors.lock().unwrap();
    assert_eq!(errors.len(), 4);
    assert!(errors
        .iter()
        .all(|(_, component)| *component == Component::CatalogClient));
    assert_eq!(errors[0].0, ErrorKind::NotFound);
}

// ── fetch_many / verify_many ────────────────────────────────────

#[tokio::test]
async fn fetch_many_continues_past_failures() {
    let server = MockServer::start().await;
    mount_plugin(&server, "akismet").await;
    mount_plugin(&server, "jetpack").await;

    let observer = Arc::new(RecordingObserver::default());
    let requested = vec![slug("akismet"), slug("gone"), slug("jetpack"), slug("also-gone")];
    let outcome = client(&server, observer.clone()).fetch_many(&requested).await;

    let fetched: Vec<&str> = outcome.entries.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(fetched, vec!["akismet", "jetpack"]);
    assert_eq!(outcome.failed, vec![slug("gone"), slug("also-gone")]);
    assert_eq!(outcome.requested(), 4);

    let notified = observer.fetched.lock().unwrap();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].0, 2);
    assert_eq!(notified[0].1, outcome.failed);
}

#[tokio::test]
async fn fetch_many_of_nothing_is_empty() {
    let server = MockServer::start().await;
    let outcome = client(&server, Arc::new(RecordingObserver::default()))
        .fetch_many(&[])
        .await;
    assert!(outcome.entries.is_empty());
    assert!(outcome.is_complete());
}

#[tokio::test]
async fn fetch_many_waits_between_requests() {
    let server = MockServer::start().await;
    mount_plugin(&server, "a").await;
    mount_plugin(&server, "b").await;
    mount_plugin(&server, "c").await;

    let client = CatalogClient::new(Arc::new(RecordingObserver::default()))
        .unwrap()
        .with_base_url(server.uri())
        .with_request_delay(Duration::from_millis(50));

    let start = std::time::Instant::now();
    let outcome = client.fetch_many(&[slug("a"), slug("b"), slug("c")]).await;
    assert_eq!(outcome.entries.len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn verify_many_splits_valid_and_invalid() {
    let server = MockServer::start().await;
    mount_plugin(&server, "akismet").await;

    let report = client(&server, Arc::new(RecordingObserver::default()))
        .verify_many(&[slug("akismet"), slug("does-not-exist")])
        .await;

    assert_eq!(report.valid, vec![slug("akismet")]);
    assert_eq!(report.invalid, vec![slug("does-not-exist")]);
}
