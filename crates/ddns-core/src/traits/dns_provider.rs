// # DNS Provider Trait
//
// Defines the interface for updating a single A record via a provider API.
//
// ## Implementations
//
// - TransIP: `ddns-provider-transip` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// provider.update_record(
//     "www",
//     "example.com",
//     std::net::Ipv4Addr::new(203, 0, 113, 7),
//     &token,
// ).await?;
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

use super::AuthToken;

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// DNS providers are **untrusted** components with strict limitations:
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure (engine handles retry)
///
/// ## Forbidden Capabilities
/// - ❌ Spawn tasks or threads
/// - ❌ Implement retry logic or backoff (owned by `DdnsEngine`)
/// - ❌ Track which records were already updated (owned by `DdnsEngine`)
/// - ❌ Request tokens (the engine hands one in)
///
/// **Correct approach**: Return an error. The `DdnsEngine` aborts the cycle and
/// retries every subdomain after the poll interval.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Point one subdomain's A record at `address`
    ///
    /// Each call mutates exactly one record and is independently fallible.
    ///
    /// # Parameters
    ///
    /// - `subdomain`: Record name relative to the domain (e.g., "www")
    /// - `domain`: The domain (e.g., "example.com")
    /// - `address`: The new IPv4 address
    /// - `token`: Bearer token for this cycle
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The record was updated
    /// - `Err(Error::DnsUpdate)`: Transport failure or unexpected status
    async fn update_record(
        &self,
        subdomain: &str,
        domain: &str,
        address: Ipv4Addr,
        token: &AuthToken,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
