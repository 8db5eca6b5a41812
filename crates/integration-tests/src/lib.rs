//! Integration tests for the Alforja Café storefront.
//!
//! Tests drive the real router in-process: every request goes through the
//! full middleware stack (session, request id, security headers) without
//! binding a socket. [`TestClient`] carries the session cookie between
//! requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p alforja-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Catalog and cart endpoints
//! - `storefront_checkout` - Snapshot, checkout page, and order hand-off

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use alforja_core::Catalog;
use alforja_storefront::{
    config::{HandoffConfig, SentryConfig, StorefrontConfig},
    content::load_catalog,
    state::AppState,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

/// Recipient configured for test stores.
pub const TEST_RECIPIENT: &str = "573234923424";

/// Upper bound on response bodies read by tests.
const BODY_LIMIT: usize = 1024 * 1024;

/// Path of the catalog shipped with the storefront.
#[must_use]
pub fn shipped_catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/content/catalog.json")
}

/// Configuration for a local, plain-HTTP test store.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        catalog_path: shipped_catalog_path(),
        handoff: HandoffConfig {
            endpoint: "https://wa.me/".to_string(),
            recipient: TEST_RECIPIENT.to_string(),
        },
        sentry: SentryConfig::default(),
    }
}

/// Build the storefront router over the shipped catalog.
#[must_use]
pub fn test_app() -> Router {
    let config = test_config();
    let catalog = load_catalog(&config.catalog_path).unwrap();
    test_app_with(config, catalog)
}

/// Build the storefront router over a given catalog.
#[must_use]
pub fn test_app_with(config: StorefrontConfig, catalog: Catalog) -> Router {
    alforja_storefront::app(AppState::new(config, catalog))
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Body as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }
}

/// A browser-like client: one visitor with one session cookie.
///
/// Clones share the visitor's cookie, like parallel requests from one tab.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Client for a fresh visitor.
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// Another visitor on the same store, with no cookie.
    #[must_use]
    pub fn stranger(&self) -> Self {
        Self::new(self.app.clone())
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with an empty body.
    pub async fn post_empty(&mut self, uri: &str) -> TestResponse {
        let request = self.request("POST", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a POST request with a urlencoded form body.
    pub async fn post_form<T: Serialize + ?Sized>(&mut self, uri: &str, form: &T) -> TestResponse {
        let body = serde_json::to_value(form).unwrap();
        let mut encoded = url::form_urlencoded::Serializer::new(String::new());
        if let Value::Object(fields) = body {
            for (key, value) in fields {
                match value {
                    Value::String(text) => encoded.append_pair(&key, &text),
                    other => encoded.append_pair(&key, &other.to_string()),
                };
            }
        }
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encoded.finish()))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        // Keep only the `name=value` pair, as a browser sends it back
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Decode the `text` query parameter of a hand-off link.
#[must_use]
pub fn handoff_message(link: &str) -> String {
    let url = url::Url::parse(link).unwrap();
    url.query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
        .unwrap()
}
