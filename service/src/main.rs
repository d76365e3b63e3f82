use std::time::{Duration, SystemTime, UNIX_EPOCH};

use near_jsonrpc_client::JsonRpcClient;
use near_primitives::types::AccountId;
use tokio::time;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::{
    contract_interaction::pending_requests,
    error::MonitorError,
    monitor::{Monitor, MonitorEvent},
};

mod contract_interaction;
mod env;
mod error;
mod monitor;
mod network_config;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

fn required_env(name: &'static str) -> Result<String, MonitorError> {
    std::env::var(name).map_err(|_| MonitorError::MissingEnv(name))
}

fn poll_interval() -> Result<Duration, MonitorError> {
    match std::env::var(env::POLL_INTERVAL_SECS) {
        Err(_) => Ok(Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)),
        Ok(s) => s
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| MonitorError::InvalidEnv {
                name: env::POLL_INTERVAL_SECS,
                reason: format!("expected a positive number of seconds, got {:?}", s),
            }),
    }
}

/// Wall clock in nanoseconds, comparable with block timestamps.
fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

async fn run() -> Result<(), MonitorError> {
    let network_config = network_config::load(&required_env(env::NETWORK_CONFIG)?)?;
    let contract_id = required_env(env::CONTRACT_ID)?
        .parse::<AccountId>()
        .map_err(|e| MonitorError::InvalidEnv {
            name: env::CONTRACT_ID,
            reason: format!("{}", e),
        })?;
    let interval = poll_interval()?;

    info!(
        network_id = %network_config.network_id,
        node_url = %network_config.node_url,
        contract_id = %contract_id,
        "Watching verification requests"
    );

    let client = JsonRpcClient::connect(&network_config.node_url);
    let mut monitor = Monitor::default();
    let mut ticker = time::interval(interval);

    loop {
        ticker.tick().await;

        let pending = match pending_requests(&client, &contract_id).await {
            Ok(pending) => pending,
            Err(e) => {
                warn!(error = %e, "Could not fetch pending requests");
                continue;
            }
        };

        for event in monitor.observe(pending, now_nanos()) {
            match event {
                MonitorEvent::New(r) => info!(
                    nonce = r.nonce,
                    request_id = %r.id,
                    subject = %r.subject,
                    requester = %r.requester,
                    expires_at = r.expires_at.0,
                    "New verification request"
                ),
                MonitorEvent::Expired(r) => warn!(
                    nonce = r.nonce,
                    request_id = %r.id,
                    requester = %r.requester,
                    "Request expired without fulfillment; requester may cancel for a refund"
                ),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    if dotenv::dotenv().is_err() {
        println!("No .env file found.");
    }

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "kyc_consumer_monitor=info".to_owned());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
