// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS system.
//
// ## Architecture
//
// Asks an external "what is my IP" service (ipinfo.io by default) for the
// public address of this connection. The service must answer with a bare
// IPv4 literal in the body.
//
// Each call to `current()` is exactly one request: no caching and no
// retries. The engine decides when to poll and what to do on failure.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP lookup service, returns a plain text IPv4 address
pub const DEFAULT_IP_SERVICE: &str = "https://ipinfo.io/ip";

/// HTTP timeout for the lookup request
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IPv4 source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,

    /// Request timeout
    timeout: Duration,
}

impl HttpIpSource {
    /// Create a source backed by [`DEFAULT_IP_SERVICE`]
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_IP_SERVICE)
    }

    /// Create a source backed by a custom lookup URL
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: http_client(HTTP_TIMEOUT)?,
            timeout: HTTP_TIMEOUT,
        })
    }

    /// Replace the request timeout (10 seconds by default)
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = http_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// The request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                Error::network(format!(
                    "Request to {} failed: {}",
                    self.url,
                    describe_request_error(&e)
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(format!(
                "IP lookup returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        parse_ipv4(&body)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("{} reported {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

/// Describe a failed request, including its cause chain
fn describe_request_error(e: &reqwest::Error) -> String {
    let mut message = if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    };

    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

/// Parse a lookup response body as a dotted-quad IPv4 address
///
/// Surrounding whitespace (a trailing newline) is tolerated, anything else
/// is not: IPv6 literals, hostnames and HTML error pages are rejected.
fn parse_ipv4(body: &str) -> Result<Ipv4Addr> {
    let text = body.trim();
    text.parse::<Ipv4Addr>().map_err(|_| {
        let shown: String = text.chars().take(64).collect();
        Error::network(format!("Invalid IPv4 address in response: {:?}", shown))
    })
}
