//! End-to-end pipeline tests against mock upstream and publish servers.
//!
//! Run with: cargo test --test pipeline_test

use matchfeed::error::PipelineError;
use matchfeed::{pipeline, Config, FeedSource, Sealer, Secrets};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEAL_KEY: &str = "0123456789abcdef0123456789abcdef";

fn test_config(feed: &MockServer, store: &MockServer) -> Config {
    let mut config = Config::default();
    config.pacing.lookup_interval_ms = 5;
    config.publish.api_base = store.uri();
    config.sources.viet.base_url = feed.uri();
    config.sources.viet.category = "1".to_string();
    config.sources.viet.gist_id = "g123".to_string();
    config.sources.viet.description = "test feed".to_string();
    config
}

fn test_secrets() -> Secrets {
    Secrets {
        gist_token: "t0ken".to_string(),
        seal_key: SEAL_KEY.to_string(),
    }
}

fn listing_body(rooms: &[&str]) -> String {
    let anchors: Vec<_> = rooms
        .iter()
        .map(|room| json!({"anchor": {"roomNum": room}}))
        .collect();
    format!(
        "matches({})",
        json!({"data": {"1": [{
            "subCateName": "X", "hostName": "A", "hostIcon": "",
            "guestName": "B", "guestIcon": "", "matchTime": 1000,
            "anchors": anchors,
        }]}})
    )
}

async fn published_list(store: &MockServer) -> serde_json::Value {
    let requests = store.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let sealed = body["files"]["data.json"]["content"].as_str().unwrap();
    let opened = Sealer::new(SEAL_KEY.as_bytes()).unwrap().open(sealed).unwrap();
    serde_json::from_str(&opened).unwrap()
}

#[tokio::test]
async fn publishes_single_enriched_match() {
    let feed = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/matches.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body(&["42"])))
        .expect(1)
        .mount(&feed)
        .await;
    Mock::given(method("GET"))
        .and(path("/room/42/detail.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"detail({"data":{"stream":{"m3u8":"u1"}}})"#),
        )
        .expect(1)
        .mount(&feed)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/gists/g123"))
        .and(header("Authorization", "Bearer t0ken"))
        .and(header("Accept", "application/vnd.github+json"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&store)
        .await;

    let config = test_config(&feed, &store);
    let report = pipeline::run(&config, &test_secrets(), FeedSource::Viet)
        .await
        .unwrap();
    assert_eq!(report.matches, 1);
    assert_eq!(report.stream_links, 1);

    let list = published_list(&store).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["subCateName"], "X");
    assert_eq!(list[0]["roomNumbers"], json!(["42"]));
    assert_eq!(list[0]["streamLinks"], json!(["u1"]));

    let requests = store.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["description"], "test feed");
}

#[tokio::test]
async fn listing_fetch_failure_skips_publish() {
    let feed = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/matches.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&feed)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&store)
        .await;

    let config = test_config(&feed, &store);
    let err = pipeline::run(&config, &test_secrets(), FeedSource::Viet)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(_)));
    assert!(store.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_lookups_still_publish_the_full_list() {
    let feed = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/matches.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body(&["7", "8"])))
        .mount(&feed)
        .await;
    Mock::given(method("GET"))
        .and(path("/room/7/detail.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&feed)
        .await;
    Mock::given(method("GET"))
        .and(path("/room/8/detail.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not an envelope"))
        .mount(&feed)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/gists/g123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&store)
        .await;

    let config = test_config(&feed, &store);
    let report = pipeline::run(&config, &test_secrets(), FeedSource::Viet)
        .await
        .unwrap();
    assert_eq!(report.matches, 1);
    assert_eq!(report.stream_links, 0);

    let list = published_list(&store).await;
    assert_eq!(list[0]["roomNumbers"], json!(["7", "8"]));
    assert_eq!(list[0]["streamLinks"], json!([]));
}

#[tokio::test]
async fn missing_category_aborts_without_publish() {
    let feed = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/matches.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"matches({"data":{}})"#))
        .mount(&feed)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&store)
        .await;

    let config = test_config(&feed, &store);
    let err = pipeline::run(&config, &test_secrets(), FeedSource::Viet)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Decode(_)));
}

#[tokio::test]
async fn publish_failure_aborts_the_run() {
    let feed = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/matches.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body(&["42"])))
        .mount(&feed)
        .await;
    Mock::given(method("GET"))
        .and(path("/room/42/detail.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"detail({"data":{"stream":{"m3u8":"u1"}}})"#),
        )
        .mount(&feed)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/gists/g123"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&store)
        .await;

    let config = test_config(&feed, &store);
    let err = pipeline::run(&config, &test_secrets(), FeedSource::Viet)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Publish(_)));
}

#[tokio::test]
async fn wrong_seal_key_length_aborts_before_publish() {
    let feed = MockServer::start().await;
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/matches.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body(&[])))
        .mount(&feed)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&store)
        .await;

    let config = test_config(&feed, &store);
    let secrets = Secrets {
        gist_token: "t0ken".to_string(),
        seal_key: "too short".to_string(),
    };
    let err = pipeline::run(&config, &secrets, FeedSource::Viet)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Seal(_)));
}
