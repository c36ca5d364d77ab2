//! Expiry service — background sweep of idle conversations.
//!
//! DESIGN
//! ======
//! A background task prunes expired conversations on a fixed interval and
//! drops their rate-limit bookkeeping. Lookups already treat expired
//! conversations as missing, so the sweep only reclaims memory.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::env_parse;
use crate::state::AppState;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Spawn the background expiry task. Returns a handle for shutdown.
pub fn spawn_expiry_task(state: AppState) -> JoinHandle<()> {
    let interval_secs = env_parse("CHAT_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS).max(1);
    info!(interval_secs, ttl_secs = state.sessions.config().ttl.as_secs(), "conversation expiry configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep(&state, Instant::now()).await;
        }
    })
}

/// Remove expired conversations. Returns how many were dropped.
pub(crate) async fn sweep(state: &AppState, now: Instant) -> usize {
    let expired = state.sessions.prune_expired(now).await;
    for id in &expired {
        state.rate_limiter.forget(*id);
    }
    if expired.is_empty() {
        debug!("expiry: nothing to sweep");
    } else {
        let remaining = state.sessions.len().await;
        info!(count = expired.len(), remaining, "expiry: swept idle conversations");
    }
    expired.len()
}
