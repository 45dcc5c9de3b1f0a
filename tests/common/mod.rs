//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use catalog_proxy::config::ProxyConfig;
use catalog_proxy::http::HttpServer;
use catalog_proxy::lifecycle::Shutdown;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Upstream key of the `n`th (1-based) work.
pub fn work_key(n: usize) -> String {
    format!("/works/OL{n}W")
}

/// Search response body listing `count` works.
pub fn search_body(count: usize) -> Value {
    let docs: Vec<Value> = (1..=count)
        .map(|n| json!({"key": work_key(n), "title": format!("Book {n}"), "position": n}))
        .collect();
    json!({"numFound": count, "start": 0, "docs": docs})
}

/// Mount a search endpoint returning `count` works for any query.
pub async fn mount_search(server: &MockServer, count: usize) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(count)))
        .mount(server)
        .await;
}

/// Mount a detail endpoint for work `n`, answering after `delay`.
pub async fn mount_detail(server: &MockServer, n: usize, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(format!("{}.json", work_key(n))))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"key": work_key(n), "description": format!("Details of book {n}")}))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Config pointing at `upstream` with short test timeouts.
pub fn test_config(upstream: &MockServer) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream.uri();
    config.timeouts.list_ms = 1_000;
    config.timeouts.detail_ms = 300;
    config.timeouts.request_secs = 10;
    config
}

/// A running proxy instance.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestProxy {
    /// Start the proxy on an ephemeral port.
    pub async fn start(config: ProxyConfig) -> Self {
        let server = HttpServer::new(config).expect("server config");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Self { addr, client, shutdown }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(self.url(path_and_query))
            .send()
            .await
            .expect("proxy unreachable")
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
