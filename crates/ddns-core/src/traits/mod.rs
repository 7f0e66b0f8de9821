//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces the engine drives.
//!
//! - [`IpSource`]: Look up the current public IPv4 address
//! - [`TokenIssuer`]: Obtain a short-lived bearer token
//! - [`DnsProvider`]: Update one A record via a provider API

pub mod ip_source;
pub mod token_issuer;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use token_issuer::{AuthToken, TokenIssuer};
pub use dns_provider::DnsProvider;
