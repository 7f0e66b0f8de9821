//! Configuration types for the DDNS system
//!
//! The configuration is fixed for the lifetime of the process: one login,
//! one domain, an ordered list of subdomains and a poll interval.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest accepted poll interval (in seconds)
pub const MIN_INTERVAL_SECS: u64 = 60;

/// Poll interval used when none is given (in seconds)
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Tokens are requested this many seconds shorter than the poll interval
pub const TOKEN_SAFETY_MARGIN_SECS: u64 = 10;

/// Main DDNS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Login name at the registrar
    pub login: String,

    /// Domain whose records are managed (e.g., "example.com")
    pub domain: String,

    /// Subdomains to keep updated, in update order
    pub subdomains: Vec<String>,

    /// Poll interval in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl DdnsConfig {
    /// Create a new configuration with the default interval
    pub fn new(
        login: impl Into<String>,
        domain: impl Into<String>,
        subdomains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            login: login.into(),
            domain: domain.into(),
            subdomains: subdomains.into_iter().map(Into::into).collect(),
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }

    /// Set the poll interval
    pub fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs < MIN_INTERVAL_SECS {
            return Err(crate::Error::config(format!(
                "Interval may not be less than {} seconds (got {})",
                MIN_INTERVAL_SECS, self.interval_secs
            )));
        }

        if self.login.trim().is_empty() {
            return Err(crate::Error::config("Login name cannot be empty"));
        }

        validate_domain_name(&self.domain)?;

        if self.subdomains.is_empty() {
            return Err(crate::Error::config("At least one subdomain is required"));
        }

        for subdomain in &self.subdomains {
            validate_subdomain(subdomain)?;
        }

        Ok(())
    }

    /// Poll interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Lifetime to request for the authentication token
    pub fn token_ttl_secs(&self) -> u64 {
        self.interval_secs.saturating_sub(TOKEN_SAFETY_MARGIN_SECS)
    }

    /// Fully qualified name of a subdomain's record
    pub fn record_name(&self, subdomain: &str) -> String {
        record_name(subdomain, &self.domain)
    }
}

/// Fully qualified name of `subdomain` under `domain`
///
/// `@` is the zone apex and names the domain itself.
pub fn record_name(subdomain: &str, domain: &str) -> String {
    if subdomain == "@" {
        domain.to_string()
    } else {
        format!("{}.{}", subdomain, domain)
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// Validate that a string is a valid domain name (RFC 1035 label rules)
fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        validate_label(label, domain)?;
    }

    Ok(())
}

/// Subdomains follow the label rules, plus `@` (apex) and `*` (wildcard)
fn validate_subdomain(subdomain: &str) -> Result<(), crate::Error> {
    if subdomain.is_empty() {
        return Err(crate::Error::config("Subdomain cannot be empty"));
    }

    if subdomain == "@" {
        return Ok(());
    }

    for (i, label) in subdomain.split('.').enumerate() {
        if i == 0 && label == "*" {
            continue;
        }
        validate_label(label, subdomain)?;
    }

    Ok(())
}

fn validate_label(label: &str, name: &str) -> Result<(), crate::Error> {
    if label.is_empty() {
        return Err(crate::Error::config(format!(
            "Name has empty label: '{}'",
            name
        )));
    }

    if label.len() > 63 {
        return Err(crate::Error::config(format!(
            "Label too long: {} chars (max 63). Label: '{}'",
            label.len(),
            label
        )));
    }

    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(crate::Error::config(format!(
            "Label contains invalid characters. Label: '{}'",
            label
        )));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(crate::Error::config(format!(
            "Label cannot start or end with hyphen. Label: '{}'",
            label
        )));
    }

    Ok(())
}
