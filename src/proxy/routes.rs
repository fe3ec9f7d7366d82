//! Proxy route table and the forwarding handler

use crate::error::{PaneError, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use log::{info, warn};
use std::sync::Arc;
use url::Url;

/// Largest request body forwarded upstream
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Response header change applied before handing the response back
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderRewrite {
    /// Force the header to an empty value
    Blank(HeaderName),
    /// Drop the header entirely
    Remove(HeaderName),
}

impl HeaderRewrite {
    pub fn apply(&self, headers: &mut HeaderMap) {
        match self {
            HeaderRewrite::Blank(name) => {
                headers.insert(name.clone(), HeaderValue::from_static(""));
            }
            HeaderRewrite::Remove(name) => {
                headers.remove(name);
            }
        }
    }
}

/// One path prefix forwarded to one upstream
#[derive(Debug, Clone)]
pub struct ProxyRoute {
    /// Path prefix without a trailing slash, e.g. `/api/baidu`
    pub prefix: String,
    pub upstream: Url,
    pub rewrites: Vec<HeaderRewrite>,
}

impl ProxyRoute {
    pub fn new(prefix: &str, upstream: Url, rewrites: Vec<HeaderRewrite>) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            upstream,
            rewrites,
        }
    }

    /// `/api/baidu/**` to `https://www.baidu.com/**`, blanking the CSP header
    pub fn baidu() -> Self {
        Self::new(
            "/api/baidu",
            Url::parse("https://www.baidu.com").expect("static upstream URL"),
            vec![HeaderRewrite::Blank(header::CONTENT_SECURITY_POLICY)],
        )
    }

    /// `/api/duckduckgo/**` to `https://duckduckgo.com/**`, dropping CSP and X-Frame-Options
    pub fn duckduckgo() -> Self {
        Self::new(
            "/api/duckduckgo",
            Url::parse("https://duckduckgo.com").expect("static upstream URL"),
            vec![
                HeaderRewrite::Remove(header::CONTENT_SECURITY_POLICY),
                HeaderRewrite::Remove(header::X_FRAME_OPTIONS),
            ],
        )
    }

    /// Whether `path` is the prefix itself or lies below it
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Upstream URL for an inbound path and query, with the prefix stripped
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> Result<Url> {
        let rest = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);
        let rest = if rest.is_empty() { "/" } else { rest };
        let base = self.upstream.as_str().trim_end_matches('/');

        let target = match query {
            Some(query) => format!("{base}{rest}?{query}"),
            None => format!("{base}{rest}"),
        };
        Ok(Url::parse(&target)?)
    }

    pub fn rewrite(&self, headers: &mut HeaderMap) {
        for rewrite in &self.rewrites {
            rewrite.apply(headers);
        }
    }
}

/// Shared, read-only state of the running proxy
#[derive(Debug)]
pub struct ProxyState {
    pub client: reqwest::Client,
    pub routes: Vec<ProxyRoute>,
}

impl ProxyState {
    pub fn route_for(&self, path: &str) -> Option<&ProxyRoute> {
        self.routes.iter().find(|route| route.matches(path))
    }

    async fn send(&self, route: &ProxyRoute, request: Request, target: Url) -> Result<Response> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| PaneError::HttpError {
                message: format!("Failed to read request body: {e}"),
                status_code: None,
            })?;

        let mut request_headers = parts.headers;
        strip_hop_by_hop(&mut request_headers);
        request_headers.remove(header::HOST);
        request_headers.remove(header::CONTENT_LENGTH);

        let upstream = self
            .client
            .request(parts.method, target)
            .headers(request_headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);
        route.rewrite(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Forward any request under a known prefix; everything else is a 404
pub async fn forward(State(state): State<Arc<ProxyState>>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let Some(route) = state.route_for(&path) else {
        return (StatusCode::NOT_FOUND, "No proxy route for this path").into_response();
    };

    let target = match route.upstream_url(&path, request.uri().query()) {
        Ok(target) => target,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    info!("{} {path} -> {target}", request.method());

    match state.send(route, request, target).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Upstream request for {path} failed: {e}");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    const HOP_BY_HOP: [HeaderName; 7] = [
        header::CONNECTION,
        header::PROXY_AUTHENTICATE,
        header::PROXY_AUTHORIZATION,
        header::TE,
        header::TRAILER,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
    ];

    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let route = ProxyRoute::baidu();
        assert!(route.matches("/api/baidu"));
        assert!(route.matches("/api/baidu/"));
        assert!(route.matches("/api/baidu/s"));
        assert!(!route.matches("/api/baiduxyz"));
        assert!(!route.matches("/api/duckduckgo/"));
    }

    #[test]
    fn test_upstream_url_strips_prefix() {
        let route = ProxyRoute::baidu();
        assert_eq!(
            route.upstream_url("/api/baidu/s", Some("wd=cats")).unwrap().as_str(),
            "https://www.baidu.com/s?wd=cats"
        );

        let route = ProxyRoute::duckduckgo();
        assert_eq!(
            route.upstream_url("/api/duckduckgo", None).unwrap().as_str(),
            "https://duckduckgo.com/"
        );
        assert_eq!(
            route.upstream_url("/api/duckduckgo/", Some("q=cats")).unwrap().as_str(),
            "https://duckduckgo.com/?q=cats"
        );
    }

    #[test]
    fn test_upstream_with_base_path() {
        let route = ProxyRoute::new(
            "/api/baidu/",
            Url::parse("http://127.0.0.1:9000/mock/").unwrap(),
            vec![],
        );
        assert_eq!(route.prefix, "/api/baidu");
        assert_eq!(
            route.upstream_url("/api/baidu/s", None).unwrap().as_str(),
            "http://127.0.0.1:9000/mock/s"
        );
    }

    #[test]
    fn test_baidu_rewrite_blanks_csp() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("frame-ancestors 'self'"),
        );
        ProxyRoute::baidu().rewrite(&mut headers);
        assert_eq!(headers.get(header::CONTENT_SECURITY_POLICY).unwrap(), "");
    }

    #[test]
    fn test_duckduckgo_rewrite_removes_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("x"));
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));

        ProxyRoute::duckduckgo().rewrite(&mut headers);
        assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_none());
        assert!(headers.get(header::X_FRAME_OPTIONS).is_none());
        assert!(headers.get(header::CONTENT_TYPE).is_some());
    }

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        strip_hop_by_hop(&mut headers);
        assert_eq!(headers.len(), 1);
    }
}
