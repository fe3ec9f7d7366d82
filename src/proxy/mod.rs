//! Reverse proxy that lets Baidu and DuckDuckGo render inside iframes.
//!
//! Requests under `/api/baidu` and `/api/duckduckgo` are forwarded with the
//! prefix stripped. Responses pass through verbatim apart from the headers
//! that block framing.

pub mod routes;

pub use routes::{HeaderRewrite, ProxyRoute, ProxyState};

use crate::error::{PaneError, Result};
use axum::Router;
use log::{info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

/// Port the proxy listens on
pub const DEFAULT_PORT: u16 = 3002;

/// Proxy settings; the defaults are the fixed production values
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub routes: Vec<ProxyRoute>,
    /// Upper bound for one upstream exchange
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            routes: vec![ProxyRoute::baidu(), ProxyRoute::duckduckgo()],
            timeout: Duration::from_millis(15000),
        }
    }
}

impl ProxyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Point the route with `prefix` at a different upstream
    pub fn with_upstream(mut self, prefix: &str, upstream: Url) -> Self {
        let prefix = prefix.trim_end_matches('/');
        for route in self.routes.iter_mut().filter(|r| r.prefix == prefix) {
            route.upstream = upstream.clone();
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that prefixes are distinct absolute paths and upstreams are HTTP(S)
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(PaneError::ConfigError("No proxy routes configured".to_string()));
        }

        for (i, route) in self.routes.iter().enumerate() {
            if !route.prefix.starts_with('/') || route.prefix.len() < 2 {
                return Err(PaneError::ConfigError(format!(
                    "Route prefix '{}' must be an absolute path below '/'",
                    route.prefix
                )));
            }
            if !matches!(route.upstream.scheme(), "http" | "https") {
                return Err(PaneError::ConfigError(format!(
                    "Upstream '{}' must use http or https",
                    route.upstream
                )));
            }
            if self.routes[..i].iter().any(|r| r.prefix == route.prefix) {
                return Err(PaneError::ConfigError(format!(
                    "Duplicate route prefix '{}'",
                    route.prefix
                )));
            }
        }
        Ok(())
    }
}

/// Build the proxy router.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the HTTP client
/// cannot be built.
pub fn router(config: &ProxyConfig) -> Result<Router> {
    config.validate()?;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.timeout)
        .build()?;

    let state = Arc::new(ProxyState {
        client,
        routes: config.routes.clone(),
    });

    Ok(Router::new().fallback(routes::forward).with_state(state))
}

/// Serve on an already bound listener until `shutdown_signal` completes
pub async fn serve_with_shutdown<F>(listener: TcpListener, config: ProxyConfig, shutdown_signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(&config)?;
    for route in &config.routes {
        info!("Proxying {}/** -> {}", route.prefix, route.upstream);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;
    Ok(())
}

/// Serve on an already bound listener until the process exits
pub async fn serve(listener: TcpListener, config: ProxyConfig) -> Result<()> {
    serve_with_shutdown(listener, config, std::future::pending()).await
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl-C
pub async fn run_proxy(config: ProxyConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Proxy server listening on http://{addr}");

    serve_with_shutdown(listener, config, shutdown_signal()).await
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down proxy"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, shutdown disabled: {e}");
            std::future::pending::<()>().await;
        }
    }
}
