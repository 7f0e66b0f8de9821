//! Contract Test: Token Lifetime Policy
//!
//! Constraints verified:
//! - The requested token lifetime is exactly `interval - 10` seconds
//! - The configured login is passed through unchanged
//! - One token serves every subdomain of a cycle

mod common;

use common::*;
use ddns_core::DdnsEngine;

async fn requested_ttl(interval_secs: u64) -> u64 {
    let log = CallLog::new();

    let (mut engine, _event_rx) = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(MockDnsProvider::new(&log)),
        minimal_config().with_interval_secs(interval_secs),
    )
    .expect("engine construction succeeds");

    engine.run_cycle().await.expect("cycle succeeds");

    match log.token_calls().as_slice() {
        [Call::Token { login, ttl_secs }] => {
            assert_eq!(login, "alice");
            *ttl_secs
        }
        other => panic!("expected exactly one token request, got {:?}", other),
    }
}

#[tokio::test]
async fn token_ttl_is_interval_minus_ten() {
    assert_eq!(requested_ttl(60).await, 50);
    assert_eq!(requested_ttl(61).await, 51);
    assert_eq!(requested_ttl(300).await, 290);
    assert_eq!(requested_ttl(3600).await, 3590);
}

#[tokio::test]
async fn one_token_serves_all_subdomains() {
    let log = CallLog::new();
    let config = ddns_core::DdnsConfig::new("alice", "example.com", ["a", "b", "c", "d"]);

    let (mut engine, _event_rx) = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(MockDnsProvider::new(&log)),
        config,
    )
    .expect("engine construction succeeds");

    engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(log.token_count(), 1);
    let tokens: Vec<String> = log
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Update { token, .. } => Some(token),
            _ => None,
        })
        .collect();
    assert_eq!(tokens, vec!["token-1"; 4]);
}
