//! End-to-end search tests against a mocked upstream catalog.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{mount_detail, mount_search, search_body, test_config, work_key, TestProxy};

fn keys(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|item| item["key"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_first_page_of_three() {
    let upstream = MockServer::start().await;
    mount_search(&upstream, 25).await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let res = proxy.get("/api/catalog/search?text=tolkien&page=1&limit=10").await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();

    assert_eq!(keys(&body), (1..=10).map(work_key).collect::<Vec<_>>());
    assert_eq!(
        body["pagination"],
        serde_json::json!({
            "currentPage": 1,
            "limit": 10,
            "totalResults": 25,
            "totalPages": 3,
            "hasMore": true,
            "hasPrevious": false
        })
    );
    assert!(body["results"][0].get("details").is_none());
}

#[tokio::test]
async fn test_last_partial_page() {
    let upstream = MockServer::start().await;
    mount_search(&upstream, 25).await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let body: Value = proxy
        .get("/api/catalog/search?text=tolkien&page=3&limit=10")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(keys(&body), (21..=25).map(work_key).collect::<Vec<_>>());
    assert_eq!(body["pagination"]["hasMore"], false);
    assert_eq!(body["pagination"]["hasPrevious"], true);
}

#[tokio::test]
async fn test_page_beyond_last_is_empty() {
    let upstream = MockServer::start().await;
    mount_search(&upstream, 25).await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let res = proxy.get("/api/catalog/search?page=9&limit=10").await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();

    assert!(keys(&body).is_empty());
    assert_eq!(body["pagination"]["hasMore"], false);
    assert_eq!(body["pagination"]["totalPages"], 3);
}

#[tokio::test]
async fn test_defaults_without_params() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "the lord of the rings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(12)))
        .expect(1)
        .mount(&upstream)
        .await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let body: Value = proxy.get("/api/catalog/search").await.json().await.unwrap();

    assert_eq!(keys(&body).len(), 10);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
}

#[tokio::test]
async fn test_invalid_params_fall_back_to_defaults() {
    let upstream = MockServer::start().await;
    mount_search(&upstream, 30).await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let body: Value = proxy
        .get("/api/catalog/search?page=-4&limit=abc")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(keys(&body).len(), 10);
}

#[tokio::test]
async fn test_expand_enriches_only_visible_page() {
    let upstream = MockServer::start().await;
    mount_search(&upstream, 25).await;
    for n in 1..=25 {
        mount_detail(&upstream, n, Duration::ZERO).await;
    }
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let body: Value = proxy
        .get("/api/catalog/search?text=tolkien&page=2&limit=7&expand=true")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(keys(&body), (8..=14).map(work_key).collect::<Vec<_>>());
    for (offset, item) in body["results"].as_array().unwrap().iter().enumerate() {
        let n = offset + 8;
        assert_eq!(item["title"], format!("Book {n}"));
        assert_eq!(item["details"]["description"], format!("Details of book {n}"));
    }

    let requests = upstream.received_requests().await.unwrap();
    let detail_calls = requests
        .iter()
        .filter(|r| r.url.path() != "/search.json")
        .count();
    assert_eq!(detail_calls, 7);
}

#[tokio::test]
async fn test_upstream_details_field_survives_enrichment() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"key": work_key(1), "details": "first edition"}]
        })))
        .mount(&upstream)
        .await;
    mount_detail(&upstream, 1, Duration::ZERO).await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let res = proxy.get("/api/catalog/search?expand=true").await;
    let text = res.text().await.unwrap();
    let body: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(text.matches("\"details\"").count(), 1);
    let item = &body["results"][0];
    assert_eq!(item["details"], "first edition");
    assert_eq!(item["_details"]["description"], "Details of book 1");
}

#[tokio::test]
async fn test_request_id_is_assigned_and_echoed() {
    let upstream = MockServer::start().await;
    mount_search(&upstream, 1).await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let res = proxy.get("/api/catalog/search").await;
    let generated = res.headers().get("x-request-id").expect("generated request id");
    assert_eq!(generated.to_str().unwrap().len(), 36);

    let res = proxy
        .client
        .get(proxy.url("/api/catalog/search"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let proxy = TestProxy::start(test_config(&upstream)).await;

    let res = proxy.get("/health").await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
