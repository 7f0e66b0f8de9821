//! Contract Test: Shutdown Determinism
//!
//! Constraints verified:
//! - The engine returns as soon as the shutdown future completes
//! - An in-flight update is abandoned, not awaited
//! - A Stopped event carries the shutdown reason
//! - An invalid interval is rejected before any collaborator is called

mod common;

use common::*;
use ddns_core::error::Result;
use ddns_core::traits::{AuthToken, DnsProvider};
use ddns_core::{DdnsEngine, EngineEvent, Error};
use std::net::Ipv4Addr;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn shutdown_signal_terminates_engine() {
    let log = CallLog::new();

    let (mut engine, mut event_rx) = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(MockDnsProvider::new(&log)),
        minimal_config(),
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<&'static str>();

    let run = engine.run_until_shutdown(async move { shutdown_rx.await.unwrap_or("dropped") });
    let signal = async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        shutdown_tx.send("SIGTERM").expect("engine is listening");
    };

    let (reason, ()) = tokio::join!(run, signal);

    assert_eq!(reason, "SIGTERM");

    let mut last = None;
    while let Ok(event) = event_rx.try_recv() {
        last = Some(event);
    }
    assert_eq!(
        last,
        Some(EngineEvent::Stopped {
            reason: "SIGTERM".to_string(),
        })
    );
}

/// A provider whose updates never complete
struct HangingProvider;

#[async_trait::async_trait]
impl DnsProvider for HangingProvider {
    async fn update_record(
        &self,
        _subdomain: &str,
        _domain: &str,
        _address: Ipv4Addr,
        _token: &AuthToken,
    ) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "hanging"
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_update_abandons_request() {
    let log = CallLog::new();

    let (mut engine, _event_rx) = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(HangingProvider),
        minimal_config(),
    )
    .expect("engine construction succeeds");

    let result = tokio::time::timeout(
        Duration::from_secs(60),
        engine.run_until_shutdown(async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            "SIGINT"
        }),
    )
    .await;

    assert_eq!(result.ok(), Some("SIGINT"));
    assert_eq!(log.token_count(), 1);
    assert_eq!(engine.last_known_ip(), None);
}

#[tokio::test]
async fn interval_below_minimum_is_rejected_before_any_call() {
    let log = CallLog::new();

    let result = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(MockDnsProvider::new(&log)),
        minimal_config().with_interval_secs(59),
    );

    assert!(matches!(result, Err(Error::Config(_))));
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn minimum_interval_is_accepted() {
    let log = CallLog::new();

    let result = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(MockDnsProvider::new(&log)),
        minimal_config().with_interval_secs(60),
    );

    assert!(result.is_ok());
}
