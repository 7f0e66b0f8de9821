// # TransIP DNS Provider
//
// This crate talks to the TransIP REST API v6 on behalf of the DDNS engine.
//
// - `signer`: RSA-SHA512 signatures over the auth request body
// - `auth`: `TokenIssuer` implementation (`POST /auth`)
// - `dns`: `DnsProvider` implementation (`PATCH /domains/{domain}/dns`)
//
// ## Architectural Constraints
//
// - ✅ One HTTP request per call, 10 second timeout
// - ✅ Full error propagation to the engine
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (owned by DdnsEngine)
// - ❌ NO token caching (a token lives for one engine cycle)
// - ❌ NO key caching (the key file is read on every signature)
//
// ## Security Requirements
//
// - Bearer token and signature NEVER appear in logs
// - The private key is only read from disk, never copied elsewhere
//
// ## API Reference
//
// - Authentication: POST `/auth`
// - Update DNS entry: PATCH `/domains/:domain/dns`

use ddns_core::{Error, Result};
use std::time::Duration;

pub mod auth;
pub mod dns;
pub mod signer;

pub use auth::TransipAuthClient;
pub use dns::TransipDnsProvider;
pub use signer::{DEFAULT_KEY_PATH, PemKeySigner, Signer};

/// TransIP API base URL
pub const API_BASE_URL: &str = "https://api.transip.nl/v6";

/// HTTP timeout for API requests
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by the auth and DNS endpoints
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

/// Describe a failed request, including its cause chain
///
/// Timeouts and failed connections are named explicitly.
pub(crate) fn describe_request_error(e: &reqwest::Error) -> String {
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
