use std::sync::Arc;
use std::time::Duration;

use curator_core::{
    CacheKey, CacheStore, CuratorConfig, CuratorError, MemoryCache, NoopObserver, RemoteSource,
    Slug, SlugCounts,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store() -> CacheStore {
    CacheStore::new(Arc::new(MemoryCache::new()), Duration::from_secs(3600))
}

fn source(server: &MockServer, cache: &CacheStore) -> RemoteSource {
    let config = CuratorConfig::new(format!("{}/featured.json", server.uri()));
    RemoteSource::new(config, cache.clone(), Arc::new(NoopObserver)).unwrap()
}

fn slugs(raw: &[&str]) -> Vec<Slug> {
    raw.iter().map(|s| Slug::parse(s).unwrap()).collect()
}

// ── get_slugs ───────────────────────────────────────────────────

#[tokio::test]
async fn validated_slugs_are_deduplicated_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .and(header("Accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["A", "a", "A-1", "bad slug!"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = store();
    let source = source(&server, &cache);

    let fetched = source.get_slugs(false).await.unwrap();
    assert_eq!(fetched, slugs(&["a", "a-1"]));
    assert_eq!(cache.get::<Vec<Slug>>(CacheKey::Slugs), Some(fetched.clone()));

    // Served from cache; the mock expects a single request.
    assert_eq!(source.get_slugs(false).await.unwrap(), fetched);
}

#[tokio::test]
async fn force_refresh_bypasses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["jetpack"])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = store();
    cache.set(CacheKey::Slugs, &slugs(&["akismet"])).unwrap();

    let source = source(&server, &cache);
    assert_eq!(source.get_slugs(true).await.unwrap(), slugs(&["jetpack"]));
    assert_eq!(
        cache.get::<Vec<Slug>>(CacheKey::Slugs),
        Some(slugs(&["jetpack"]))
    );
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["akismet"])))
        .expect(1)
        .mount(&server)
        .await;

    let config =
        CuratorConfig::new(format!("{}/featured.json", server.uri())).with_api_key("s3cret");
    let source = RemoteSource::new(config, store(), Arc::new(NoopObserver)).unwrap();

    assert_eq!(source.get_slugs(false).await.unwrap(), slugs(&["akismet"]));
}

#[tokio::test]
async fn envelope_document_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "plugins": ["Akismet", "classic-editor", 42, null]
        })))
        .mount(&server)
        .await;

    let source = source(&server, &store());
    assert_eq!(
        source.get_slugs(false).await.unwrap(),
        slugs(&["akismet", "classic-editor"])
    );
}

#[tokio::test]
async fn non_200_status_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let cache = store();
    let err = source(&server, &cache).get_slugs(false).await.unwrap_err();
    assert!(matches!(
        err,
        CuratorError::Network {
            status_code: Some(503),
            ..
        }
    ));
    assert!(!cache.exists(CacheKey::Slugs));
}

#[tokio::test]
async fn success_codes_other_than_200_are_rejected() {
    for status in [201u16, 204] {
        let server = MockServer::start().await;
        let mut template = ResponseTemplate::new(status);
        if status != 204 {
            template = template.set_body_json(serde_json::json!(["akismet"]));
        }
        Mock::given(method("GET"))
            .and(path("/featured.json"))
            .respond_with(template)
            .mount(&server)
            .await;

        let cache = store();
        let err = source(&server, &cache).get_slugs(false).await.unwrap_err();
        match err {
            CuratorError::Network { status_code, .. } => assert_eq!(status_code, Some(status)),
            other => panic!("HTTP {} should be a network error, got {:?}", status, other),
        }
        assert!(!cache.exists(CacheKey::Slugs));
    }
}

#[tokio::test]
async fn invalid_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = source(&server, &store()).get_slugs(false).await.unwrap_err();
    assert!(matches!(err, CuratorError::Parse { .. }));
}

#[tokio::test]
async fn empty_documents_yield_no_valid_data() {
    for body in [
        serde_json::json!([]),
        serde_json::json!({"plugins": []}),
        serde_json::json!({"unexpected": ["akismet"]}),
        serde_json::json!(["!!!", ""]),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/featured.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let cache = store();
        let err = source(&server, &cache).get_slugs(false).await.unwrap_err();
        assert!(matches!(err, CuratorError::NoValidData));
        assert!(!cache.exists(CacheKey::Slugs));
    }
}

// ── test_connection ─────────────────────────────────────────────

#[tokio::test]
async fn connection_test_reports_counts_without_touching_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!(["akismet", "jetpack", "classic-editor"])),
        )
        .mount(&server)
        .await;

    let cache = store();
    let previous = slugs(&["stale-plugin"]);
    cache.set(CacheKey::Slugs, &previous).unwrap();

    let report = source(&server, &cache).test_connection().await;
    assert!(report.success);
    assert_eq!(
        report.counts,
        SlugCounts {
            total: 3,
            valid: 3,
            invalid: 0
        }
    );
    assert_eq!(report.slugs, slugs(&["akismet", "jetpack", "classic-editor"]));
    assert_eq!(report.message, "Successfully fetched 3 plugin slugs");

    // Bypassed and left untouched.
    assert_eq!(cache.get::<Vec<Slug>>(CacheKey::Slugs), Some(previous));
    assert!(!cache.exists(CacheKey::Plugins));
    assert!(!cache.exists(CacheKey::Partial));
}

#[tokio::test]
async fn connection_test_counts_invalid_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["akismet", "Akismet", "no way"])),
        )
        .mount(&server)
        .await;

    let report = source(&server, &store()).test_connection().await;
    assert!(report.success);
    assert_eq!(
        report.counts,
        SlugCounts {
            total: 3,
            valid: 1,
            invalid: 2
        }
    );
}

#[tokio::test]
async fn connection_test_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/featured.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let report = source(&server, &store()).test_connection().await;
    assert!(!report.success);
    assert!(report.message.contains("401"));
    assert!(report.slugs.is_empty());
}
