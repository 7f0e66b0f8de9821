// # ddnsd - DDNS Daemon
//
// Keeps the A records of one or more subdomains of a TransIP domain pointed
// at this machine's public IPv4 address.
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from the command line (or environment variables)
// 2. Initializing logging and the runtime
// 3. Wiring the HTTP IP source and the TransIP provider into the engine
// 4. Stopping cleanly on SIGINT/SIGTERM
//
// All polling, comparison and retry logic lives in ddns-core.
//
// ## Configuration
//
// | Flag | Environment | Meaning |
// |---|---|---|
// | `-l, --loginname` | `DDNS_LOGIN` | Login name used at TransIP |
// | `-d, --domain` | `DDNS_DOMAIN` | Domain name, e.g. example.com |
// | `-s, --subdomains` | `DDNS_SUBDOMAINS` | One or more subdomains |
// | `-i, --interval` | `DDNS_INTERVAL` | Poll interval, default and minimum 60s |
// | `--log-level` | `DDNS_LOG_LEVEL` | trace, debug, info, warn, error |
// | `--dry-run` | `DDNS_DRY_RUN` | Log DNS updates instead of sending them |
//
// The private key is always read from `key` in the working directory.
//
// ## Example
//
// ```bash
// ddnsd -l alice -d example.com -s www api -i 300
// ```

use anyhow::Result;
use clap::Parser;
use ddns_core::config::DEFAULT_INTERVAL_SECS;
use ddns_core::{DdnsConfig, DdnsEngine};
use ddns_ip_http::HttpIpSource;
use ddns_provider_transip::{DEFAULT_KEY_PATH, PemKeySigner, TransipAuthClient, TransipDnsProvider};
use std::future::Future;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Update DNS A records for one or more sub domains of a single domain.
#[derive(Debug, Parser)]
#[command(name = "ddnsd", version, about)]
struct Cli {
    /// Login name used at TransIP
    #[arg(short = 'l', long = "loginname", env = "DDNS_LOGIN")]
    loginname: String,

    /// Domain name. E.g. example.com
    #[arg(short, long, env = "DDNS_DOMAIN")]
    domain: String,

    /// Sub domains separated by a space
    #[arg(
        short,
        long,
        required = true,
        num_args = 1..,
        value_delimiter = ',',
        env = "DDNS_SUBDOMAINS"
    )]
    subdomains: Vec<String>,

    /// Check every x seconds. Default and minimum value is 60 seconds
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECS, env = "DDNS_INTERVAL")]
    interval: u64,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        env = "DDNS_LOG_LEVEL"
    )]
    log_level: String,

    /// Log DNS updates instead of sending them
    #[arg(long, env = "DDNS_DRY_RUN")]
    dry_run: bool,
}

impl Cli {
    /// Build and validate the engine configuration
    fn config(&self) -> ddns_core::Result<DdnsConfig> {
        let config = DdnsConfig::new(&self.loginname, &self.domain, &self.subdomains)
            .with_interval_secs(self.interval);
        config.validate()?;
        Ok(config)
    }

    fn level(&self) -> Level {
        match self.log_level.as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::CleanShutdown.into()
            };
        }
    };

    // Validate configuration before anything touches the network
    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(cli.level()).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Start");
    info!("Interval: {} seconds", config.interval_secs);
    info!(
        "Managing {} record(s) of {}: {}",
        config.subdomains.len(),
        config.domain,
        config.subdomains.join(", ")
    );

    // One logical worker: a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(config, cli.dry_run).await {
            Ok(signal) => {
                info!("Stopping after handling signal: {}", signal);
                DdnsExitCode::CleanShutdown
            }
            Err(e) => {
                error!("Daemon error: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Run the daemon until a shutdown signal arrives
///
/// Returns the name of the signal that stopped it.
async fn run_daemon(config: DdnsConfig, dry_run: bool) -> Result<&'static str> {
    // Install handlers before the first poll so an early signal is not lost
    let shutdown = shutdown_signal()?;

    if !std::path::Path::new(DEFAULT_KEY_PATH).is_file() {
        warn!(
            "Private key '{}' not found; token requests will fail until it exists",
            DEFAULT_KEY_PATH
        );
    }

    let ip_source = HttpIpSource::new()?;
    let token_issuer = TransipAuthClient::new(PemKeySigner::default())?;
    let provider = TransipDnsProvider::new()?.with_dry_run(dry_run);

    if dry_run {
        warn!("TransIP provider running in DRY-RUN mode - no changes will be made");
    }

    let (mut engine, event_rx) = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(token_issuer),
        Box::new(provider),
        config,
    )?;

    // The engine logs everything itself
    drop(event_rx);

    Ok(engine.run_until_shutdown(shutdown).await)
}

/// Set up handlers for SIGTERM and SIGINT
///
/// The returned future resolves with the name of the first signal received.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Set up a handler for Ctrl-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to wait for CTRL-C: {}", e);
            std::future::pending::<()>().await;
        }
        "SIGINT"
    })
}
