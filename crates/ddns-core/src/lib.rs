// # ddns-core
//
// Core library for the TransIP dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the pieces that do not talk to the network directly:
// - **IpSource**: Trait for looking up the current public IPv4 address
// - **TokenIssuer**: Trait for obtaining a short-lived bearer token
// - **DnsProvider**: Trait for updating one A record via a provider API
// - **DdnsEngine**: The poll loop that ties them together
// - **DdnsConfig**: Login, domain, subdomains and poll interval
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Loop policy is separate from HTTP integrations
// 2. **Engine-Owned Retry**: Integrations make one attempt; the engine retries the cycle
// 3. **Single Writer**: Only the engine reads and writes `last_known_ip`
// 4. **Library-First**: The loop can be driven and tested without a daemon

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{AuthToken, DnsProvider, IpSource, TokenIssuer};
pub use engine::{CycleOutcome, DdnsEngine, EngineEvent};
pub use config::DdnsConfig;
pub use error::{Error, Result};
