//! A record updates against `PATCH /domains/{domain}/dns`
//!
//! ```http
//! PATCH /v6/domains/example.com/dns
//! Authorization: Bearer <token>
//!
//! {"dnsEntry":{"name":"www","expire":86400,"type":"A","content":"203.0.113.7"}}
//! ```
//!
//! A successful response is `204 No Content`.

use async_trait::async_trait;
use ddns_core::config::record_name;
use ddns_core::traits::{AuthToken, DnsProvider};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::{API_BASE_URL, HTTP_TIMEOUT, describe_request_error, http_client};

/// TTL written to every updated record (in seconds)
pub const RECORD_EXPIRE_SECS: u32 = 86400;

#[derive(Debug, Serialize)]
struct DnsEntryRequest<'a> {
    #[serde(rename = "dnsEntry")]
    dns_entry: DnsEntry<'a>,
}

#[derive(Debug, Serialize)]
struct DnsEntry<'a> {
    name: &'a str,
    expire: u32,
    #[serde(rename = "type")]
    record_type: &'static str,
    content: String,
}

impl<'a> DnsEntryRequest<'a> {
    fn a_record(name: &'a str, address: Ipv4Addr) -> Self {
        Self {
            dns_entry: DnsEntry {
                name,
                expire: RECORD_EXPIRE_SECS,
                record_type: "A",
                content: address.to_string(),
            },
        }
    }
}

/// TransIP DNS provider
///
/// # Trust Level: Untrusted
///
/// One PATCH per call, no retries, no caching.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider logs the PATCH it would send and
/// reports success without contacting the API.
#[derive(Debug, Clone)]
pub struct TransipDnsProvider {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    dry_run: bool,
}

impl TransipDnsProvider {
    /// Create a provider for the production API
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a provider for a custom API base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(HTTP_TIMEOUT)?,
            timeout: HTTP_TIMEOUT,
            dry_run: false,
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

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether updates are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsProvider for TransipDnsProvider {
    async fn update_record(
        &self,
        subdomain: &str,
        domain: &str,
        address: Ipv4Addr,
        token: &AuthToken,
    ) -> Result<()> {
        let record = record_name(subdomain, domain);
        let url = format!("{}/domains/{}/dns", self.base_url, domain);
        let payload = DnsEntryRequest::a_record(subdomain, address);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        let response = self
            .client
            .patch(&url)
            .bearer_auth(token.expose())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                Error::dns_update(
                    &record,
                    format!("HTTP request failed: {}", describe_request_error(&e)),
                )
            })?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Update DNS for {} failed: {}/{}", record, status, error_text);
            return Err(Error::dns_update(record, format!("unexpected status {}", status)));
        }

        tracing::debug!("DNS record updated: {} -> {}", record, address);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "transip"
    }
}
