// # Token Issuer Trait
//
// Defines the interface for obtaining a short-lived bearer token from the
// registrar API. A token is requested once per reconciliation cycle and
// dropped when the cycle ends.

use async_trait::async_trait;
use std::fmt;

/// Opaque bearer credential
///
/// The Debug implementation intentionally does NOT expose the token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token string returned by the API
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the Authorization header only
    /// ⚠️ NEVER log this value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&"<REDACTED>").finish()
    }
}

/// Trait for token issuer implementations
///
/// Implementations perform exactly one authentication request per call and
/// never retry; a failure is returned to the engine, which retries the whole
/// cycle after the poll interval.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Request a token valid for `ttl_secs` seconds
    ///
    /// # Parameters
    ///
    /// - `login`: The account login name
    /// - `ttl_secs`: Requested token lifetime
    ///
    /// # Returns
    ///
    /// - `Ok(AuthToken)`: A fresh token
    /// - `Err(Error::Auth)`: Transport failure, unexpected status or missing token
    /// - `Err(Error::KeyLoad | Error::Signing)`: The request could not be signed
    async fn issue_token(&self, login: &str, ttl_secs: u64) -> Result<AuthToken, crate::Error>;
}
