// # IP Source Trait
//
// Defines the interface for looking up the machine's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP lookup service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Current IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// # Trust Level: Semi-Trusted
///
/// ## Allowed Capabilities
/// - ✅ Perform one lookup request per call
/// - ✅ Parse and validate the response
///
/// ## Forbidden Capabilities
/// - ❌ Retry or sleep (owned by `DdnsEngine`)
/// - ❌ Cache the previous answer (the engine owns `last_known_ip`)
/// - ❌ Decide whether DNS needs updating
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The current address
    /// - `Err(Error::Network)`: Timeout, non-success status, or a non-IPv4 body
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Name of the source (for logging)
    fn source_name(&self) -> &'static str;
}
