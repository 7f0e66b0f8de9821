//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Polling the current public address via IpSource
//! - Comparing it with the last address applied to every record
//! - Requesting a token via TokenIssuer when the address changed
//! - Updating each configured subdomain via DnsProvider, in order
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────┐
//!        ┌─────────────│ DdnsEngine   │──────────────┐
//!        │             └──────────────┘              │
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//! ┌─────────────┐      ┌──────────────┐      ┌─────────────┐
//! │  IpSource   │      │ TokenIssuer  │      │ DnsProvider │
//! │  (poll)     │      │ (on change)  │      │ (per sub)   │
//! └─────────────┘      └──────────────┘      └─────────────┘
//! ```
//!
//! ## Poll Cycle
//!
//! 1. Resolve the current address
//! 2. If it equals `last_known_ip`, skip
//! 3. Otherwise request a token valid for `interval - 10` seconds
//! 4. Update every subdomain in configured order; the first failure aborts the cycle
//! 5. Only when all updates succeeded, remember the new address
//! 6. Sleep for the interval and start over
//!
//! A subdomain updated before a mid-cycle failure is not tracked separately:
//! the next cycle sees the address still differs and reapplies the whole set.

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource, TokenIssuer};
use std::future::Future;
use std::net::Ipv4Addr;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

/// Capacity of the engine event channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Events emitted by the DdnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        records_count: usize,
        interval_secs: u64,
    },

    /// Current address resolved
    IpResolved {
        ip: Ipv4Addr,
    },

    /// Address unchanged, no updates needed
    UpdateSkipped {
        current_ip: Ipv4Addr,
    },

    /// Token obtained for this cycle
    TokenIssued {
        ttl_secs: u64,
    },

    /// DNS update started
    UpdateStarted {
        record_name: String,
        new_ip: Ipv4Addr,
    },

    /// DNS update succeeded
    UpdateSucceeded {
        record_name: String,
        new_ip: Ipv4Addr,
    },

    /// Every record now points at `new_ip`
    CycleCompleted {
        previous_ip: Option<Ipv4Addr>,
        new_ip: Ipv4Addr,
    },

    /// Cycle aborted; retried after the interval
    CycleFailed {
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Result of a single successful poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Address matched `last_known_ip`; nothing was sent
    Unchanged(Ipv4Addr),

    /// All records were updated to `new_ip`
    Reconciled {
        previous_ip: Option<Ipv4Addr>,
        new_ip: Ipv4Addr,
    },
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Run with [`DdnsEngine::run_until_shutdown()`]
/// 3. Engine polls until the shutdown future completes
///
/// ## Threading
///
/// Everything runs sequentially on the caller's task. The engine is the
/// only writer of `last_known_ip`.
pub struct DdnsEngine {
    /// IP source for the current public address
    ip_source: Box<dyn IpSource>,

    /// Issuer of per-cycle bearer tokens
    token_issuer: Box<dyn TokenIssuer>,

    /// DNS provider for updating records
    provider: Box<dyn DnsProvider>,

    /// Validated configuration
    config: DdnsConfig,

    /// Address most recently applied to all subdomains
    last_known_ip: Option<Ipv4Addr>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// The configuration is validated here, so an invalid interval is
    /// rejected before any network call.
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        token_issuer: Box<dyn TokenIssuer>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let engine = Self {
            ip_source,
            token_issuer,
            provider,
            config,
            last_known_ip: None,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Address most recently applied to every subdomain
    pub fn last_known_ip(&self) -> Option<Ipv4Addr> {
        self.last_known_ip
    }

    /// The engine configuration
    pub fn config(&self) -> &DdnsConfig {
        &self.config
    }

    /// Run poll cycles until `shutdown` completes
    ///
    /// Failed cycles are logged and retried after the full interval. When
    /// `shutdown` resolves, any in-flight request or sleep is dropped.
    ///
    /// # Returns
    ///
    /// The reason produced by `shutdown` (e.g. the signal name)
    pub async fn run_until_shutdown<F>(&mut self, shutdown: F) -> &'static str
    where
        F: Future<Output = &'static str>,
    {
        self.emit_event(EngineEvent::Started {
            records_count: self.config.subdomains.len(),
            interval_secs: self.config.interval_secs,
        });

        tokio::pin!(shutdown);

        let reason = loop {
            tokio::select! {
                reason = &mut shutdown => break reason,
                () = self.tick() => {}
            }
        };

        info!("Shutdown requested: {}", reason);
        self.emit_event(EngineEvent::Stopped {
            reason: reason.to_string(),
        });

        reason
    }

    /// One cycle followed by the interval sleep
    async fn tick(&mut self) {
        if let Err(e) = self.run_cycle().await {
            if e.is_key_material() {
                error!("Poll cycle failed, check the private key: {}", e);
            } else {
                error!("Poll cycle failed: {}", e);
            }
            self.emit_event(EngineEvent::CycleFailed {
                error: e.to_string(),
            });
        }

        debug!("Sleeping {}s until next poll", self.config.interval_secs);
        tokio::time::sleep(self.config.interval()).await;
    }

    /// Perform exactly one poll cycle without sleeping
    ///
    /// # Returns
    ///
    /// - `Ok(CycleOutcome)`: Nothing to do, or every record was updated
    /// - `Err(Error)`: The first failure; `last_known_ip` is left untouched
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let current_ip = self.ip_source.current().await?;
        info!("Current ip is {}", current_ip);
        self.emit_event(EngineEvent::IpResolved { ip: current_ip });

        if self.last_known_ip == Some(current_ip) {
            info!("No need to update DNS since ip is still {}", current_ip);
            self.emit_event(EngineEvent::UpdateSkipped { current_ip });
            return Ok(CycleOutcome::Unchanged(current_ip));
        }

        let ttl_secs = self.config.token_ttl_secs();
        let token = self
            .token_issuer
            .issue_token(&self.config.login, ttl_secs)
            .await?;
        debug!("Obtained token valid for {}s", ttl_secs);
        self.emit_event(EngineEvent::TokenIssued { ttl_secs });

        for subdomain in &self.config.subdomains {
            let record_name = self.config.record_name(subdomain);
            info!("Set DNS for {} to {}", record_name, current_ip);
            self.emit_event(EngineEvent::UpdateStarted {
                record_name: record_name.clone(),
                new_ip: current_ip,
            });

            self.provider
                .update_record(subdomain, &self.config.domain, current_ip, &token)
                .await?;

            self.emit_event(EngineEvent::UpdateSucceeded {
                record_name,
                new_ip: current_ip,
            });
        }

        let previous_ip = self.last_known_ip.replace(current_ip);
        info!(
            "Updated {} record(s) via {} to {}",
            self.config.subdomains.len(),
            self.provider.provider_name(),
            current_ip
        );
        self.emit_event(EngineEvent::CycleCompleted {
            previous_ip,
            new_ip: current_ip,
        });

        Ok(CycleOutcome::Reconciled {
            previous_ip,
            new_ip: current_ip,
        })
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event");
            }
            // Nobody is listening
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_event_clone() {
        let event = EngineEvent::UpdateStarted {
            record_name: "www.example.com".to_string(),
            new_ip: Ipv4Addr::new(203, 0, 113, 7),
        };

        assert_eq!(event.clone(), event);
    }
}
