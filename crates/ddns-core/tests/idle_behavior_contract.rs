//! Contract Test: Idle Behavior
//!
//! Constraints verified:
//! - With a stable address the engine only performs lookups
//! - Lookups happen once per interval, never more often
//! - The event stream shows one reconciliation followed by skips

mod common;

use common::*;
use ddns_core::{DdnsEngine, EngineEvent};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn stable_address_only_polls() {
    let log = CallLog::new();

    let (mut engine, mut event_rx) = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed(test_ip(), &log)),
        Box::new(MockTokenIssuer::new(&log)),
        Box::new(MockDnsProvider::new(&log)),
        minimal_config(),
    )
    .expect("engine construction succeeds");

    // Ten minutes and change: cycles at t=0, 60, ..., 600
    engine
        .run_until_shutdown(async {
            tokio::time::sleep(Duration::from_secs(630)).await;
            "test"
        })
        .await;

    assert_eq!(log.lookup_count(), 11);
    assert_eq!(log.token_count(), 1);
    assert_eq!(log.update_count(), 2);

    let mut completed = 0;
    let mut skipped = 0;
    while let Ok(event) = event_rx.try_recv() {
        match event {
            EngineEvent::CycleCompleted { previous_ip, new_ip } => {
                assert_eq!(previous_ip, None);
                assert_eq!(new_ip, test_ip());
                completed += 1;
            }
            EngineEvent::UpdateSkipped { current_ip } => {
                assert_eq!(current_ip, test_ip());
                skipped += 1;
            }
            _ => {}
        }
    }

    assert_eq!(completed, 1);
    assert_eq!(skipped, 10);
}
