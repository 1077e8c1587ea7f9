//! Session expiry loop.
//!
//! Resets dialogues nobody has touched for longer than the session TTL and
//! drops idle entries so the map does not grow without bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;

use crate::state::AppState;

const LOOP_INTERVAL_SECS: u64 = 30;
// A year; longer TTLs behave the same.
const MAX_TTL_SECS: u64 = 365 * 24 * 3600;

pub async fn run_session_expiry_loop(state: Arc<AppState>, mut shutdown: broadcast::Receiver<()>) {
    let ttl_secs = state.config().session_ttl_secs.min(MAX_TTL_SECS);
    let ttl = chrono::Duration::seconds(ttl_secs as i64);
    let mut ticker = interval(Duration::from_secs(LOOP_INTERVAL_SECS));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Session expiry loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let reset = state.expire_sessions(ttl);
                if reset > 0 {
                    tracing::info!(
                        "Reset {} abandoned sessions ({} tracked)",
                        reset,
                        state.session_count()
                    );
                }
            }
        }
    }
}
