//! Security and caching headers.
//!
//! The storefront only answers with JSON and redirects, so the policy is
//! locked down completely. Cart and checkout responses carry per-visitor state
//! and must never be cached; the catalog is the same for everyone and may be
//! cached briefly by browsers.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Browser cache lifetime for catalog responses.
const CATALOG_CACHE: &str = "public, max-age=300";

/// Paths whose responses may be cached.
fn is_cacheable(path: &str) -> bool {
    path == "/products" || path.starts_with("/products/")
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Content-Security-Policy: default-src 'none'; frame-ancestors 'none'`
/// - `Cross-Origin-Resource-Policy: same-origin`
/// - `Cache-Control`: short public caching for the catalog, `no-store` elsewhere
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let cacheable = is_cacheable(request.uri().path());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    // No documents are served, so nothing needs to load
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    // Handlers may set their own policy
    if !headers.contains_key(CACHE_CONTROL) {
        let policy = if cacheable && response.status().is_success() {
            CATALOG_CACHE
        } else {
            "no-store, max-age=0"
        };
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(policy));
    }

    response
}
