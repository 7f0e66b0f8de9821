//! Token requests against `POST /auth`
//!
//! ```http
//! POST /v6/auth
//! Content-Type: application/json
//! Signature: <base64 RSA-SHA512 signature of the body>
//!
//! {"login":"alice","nonce":"…","read_only":false,
//!  "expiration_time":"50 seconds","label":"DynDNS","global_key":true}
//! ```
//!
//! A successful response is `201 Created` with `{"token": "..."}`.

use async_trait::async_trait;
use ddns_core::traits::{AuthToken, TokenIssuer};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::signer::Signer;
use crate::{API_BASE_URL, HTTP_TIMEOUT, describe_request_error, http_client};

/// Label attached to every token the updater creates
pub const TOKEN_LABEL: &str = "DynDNS";

/// Body of an authentication request
#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    login: &'a str,
    nonce: String,
    read_only: bool,
    expiration_time: String,
    label: &'a str,
    global_key: bool,
}

impl<'a> AuthRequest<'a> {
    fn new(login: &'a str, ttl_secs: u64) -> Self {
        Self {
            login,
            // 128 random bits, 32 hex digits
            nonce: Uuid::new_v4().simple().to_string(),
            read_only: false,
            expiration_time: format!("{} seconds", ttl_secs),
            label: TOKEN_LABEL,
            global_key: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
}

/// Issues bearer tokens from the TransIP auth endpoint
///
/// # Security
///
/// Neither the signature nor the returned token is ever logged.
pub struct TransipAuthClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    signer: Box<dyn Signer>,
}

impl std::fmt::Debug for TransipAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransipAuthClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TransipAuthClient {
    /// Create a client for the production API
    pub fn new(signer: impl Signer + 'static) -> Result<Self> {
        Self::with_base_url(API_BASE_URL, signer)
    }

    /// Create a client for a custom API base URL
    pub fn with_base_url(base_url: impl Into<String>, signer: impl Signer + 'static) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(HTTP_TIMEOUT)?,
            timeout: HTTP_TIMEOUT,
            signer: Box::new(signer),
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
}

#[async_trait]
impl TokenIssuer for TransipAuthClient {
    async fn issue_token(&self, login: &str, ttl_secs: u64) -> Result<AuthToken> {
        // The signature covers these exact bytes, so send them verbatim
        let body = serde_json::to_vec(&AuthRequest::new(login, ttl_secs))?;
        let signature = self.signer.sign(&body)?;

        tracing::debug!("Requesting token for {} valid for {}s", login, ttl_secs);

        let response = self
            .client
            .post(format!("{}/auth", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .header("Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                Error::auth(format!("HTTP request failed: {}", describe_request_error(&e)))
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("get token failed: {}/{}", status, error_text);
            return Err(Error::auth(format!("unexpected status {}", status)));
        }

        let parsed: AuthResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("Failed to parse response: {}", e)))?;

        parsed
            .token
            .filter(|token| !token.is_empty())
            .map(AuthToken::new)
            .ok_or_else(|| Error::auth("response did not contain a token"))
    }
}
