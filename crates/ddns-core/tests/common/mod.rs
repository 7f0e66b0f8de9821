//! Test doubles and common utilities for engine contract tests
//!
//! The doubles record every collaborator call into one shared log so tests
//! can assert on ordering across the IP source, token issuer and provider.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{AuthToken, DnsProvider, IpSource, TokenIssuer};
use ddns_core::DdnsConfig;
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

/// A collaborator call observed by the doubles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup,
    Token {
        login: String,
        ttl_secs: u64,
    },
    Update {
        subdomain: String,
        domain: String,
        address: Ipv4Addr,
        token: String,
    },
}

/// Shared, ordered record of collaborator calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Lookup)).count()
    }

    pub fn token_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Token { .. }))
            .collect()
    }

    pub fn token_count(&self) -> usize {
        self.token_calls().len()
    }

    /// Subdomains passed to `update_record`, in call order
    pub fn updated_subdomains(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update { subdomain, .. } => Some(subdomain),
                _ => None,
            })
            .collect()
    }

    pub fn update_count(&self) -> usize {
        self.updated_subdomains().len()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// An IpSource that plays back a script of lookups
///
/// `None` entries fail with a network error. Once the script is exhausted
/// the last entry repeats.
pub struct ScriptedIpSource {
    script: Mutex<VecDeque<Option<Ipv4Addr>>>,
    last: Mutex<Option<Ipv4Addr>>,
    log: CallLog,
}

impl ScriptedIpSource {
    pub fn new(script: impl IntoIterator<Item = Option<Ipv4Addr>>, log: &CallLog) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            log: log.clone(),
        }
    }

    /// A source that always returns `ip`
    pub fn fixed(ip: Ipv4Addr, log: &CallLog) -> Self {
        Self::new([Some(ip)], log)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.log.push(Call::Lookup);

        let next = self.script.lock().unwrap().pop_front();
        let answer = match next {
            Some(answer) => {
                *self.last.lock().unwrap() = answer;
                answer
            }
            None => *self.last.lock().unwrap(),
        };

        answer.ok_or_else(|| Error::network("lookup timed out"))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A TokenIssuer that hands out numbered tokens or fails
pub struct MockTokenIssuer {
    fail: bool,
    log: CallLog,
    issued: Mutex<usize>,
}

impl MockTokenIssuer {
    pub fn new(log: &CallLog) -> Self {
        Self {
            fail: false,
            log: log.clone(),
            issued: Mutex::new(0),
        }
    }

    /// An issuer whose every request fails like an HTTP 500
    pub fn failing(log: &CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }
}

#[async_trait::async_trait]
impl TokenIssuer for MockTokenIssuer {
    async fn issue_token(&self, login: &str, ttl_secs: u64) -> Result<AuthToken> {
        self.log.push(Call::Token {
            login: login.to_string(),
            ttl_secs,
        });

        if self.fail {
            return Err(Error::auth("unexpected status 500 Internal Server Error"));
        }

        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        Ok(AuthToken::new(format!("token-{}", *issued)))
    }
}

/// A DnsProvider that records updates and fails for chosen subdomains
pub struct MockDnsProvider {
    failing: Vec<String>,
    log: CallLog,
}

impl MockDnsProvider {
    pub fn new(log: &CallLog) -> Self {
        Self {
            failing: Vec::new(),
            log: log.clone(),
        }
    }

    /// A provider whose update of `subdomain` fails like an HTTP 500
    pub fn failing_for(subdomain: &str, log: &CallLog) -> Self {
        Self {
            failing: vec![subdomain.to_string()],
            log: log.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(
        &self,
        subdomain: &str,
        domain: &str,
        address: Ipv4Addr,
        token: &AuthToken,
    ) -> Result<()> {
        self.log.push(Call::Update {
            subdomain: subdomain.to_string(),
            domain: domain.to_string(),
            address,
            token: token.expose().to_string(),
        });

        if self.failing.iter().any(|s| s == subdomain) {
            return Err(Error::dns_update(
                format!("{}.{}", subdomain, domain),
                "unexpected status 500 Internal Server Error",
            ));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Address used by the scenarios
pub fn test_ip() -> Ipv4Addr {
    Ipv4Addr::new(203, 0, 113, 7)
}

/// Configuration used by most tests: two subdomains on example.com, 60s interval
pub fn minimal_config() -> DdnsConfig {
    DdnsConfig::new("alice", "example.com", ["www", "api"])
}
