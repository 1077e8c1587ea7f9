//! In-memory session store using DashMap.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};
use wpgen_core::{CalculationRecord, CalculationRequest, DialogueLimits, Session, Step};

use crate::config::Config;
use crate::persistence::Database;

/// One user's dialogue plus bookkeeping for expiry.
#[derive(Debug)]
pub struct SessionSlot {
    pub session: Session,
    pub last_activity: Option<DateTime<Utc>>,
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self {
            session: Session::new(),
            last_activity: Some(Utc::now()),
        }
    }
}

impl SessionSlot {
    pub fn touch(&mut self) {
        self.last_activity = Some(Utc::now());
    }

    fn inactive_for(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_activity.map(|at| now - at)
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub user_id: i64,
    pub state: Step,
    pub request: CalculationRequest,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Application state: per-user sessions, database and the history queue.
pub struct AppState {
    sessions: DashMap<i64, Arc<Mutex<SessionSlot>>>,
    config: Config,
    limits: DialogueLimits,
    db: Database,
    history_tx: mpsc::Sender<CalculationRecord>,
}

impl AppState {
    pub fn new(config: Config, db: Database, history_tx: mpsc::Sender<CalculationRecord>) -> Self {
        let limits = config.dialogue_limits();
        Self {
            sessions: DashMap::new(),
            config,
            limits,
            db,
            history_tx,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn limits(&self) -> &DialogueLimits {
        &self.limits
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Lock a user's session, creating it on first use.
    ///
    /// The guard serializes events for that user only; other users never
    /// contend on it. The clone taken here keeps the slot out of expiry until
    /// the guard is dropped.
    pub async fn lock_session(&self, user_id: i64) -> OwnedMutexGuard<SessionSlot> {
        let slot = self
            .sessions
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(SessionSlot::default())))
            .clone();
        slot.lock_owned().await
    }

    pub async fn snapshot(&self, user_id: i64) -> Option<SessionSnapshot> {
        let slot = self.sessions.get(&user_id)?.value().clone();
        let guard = slot.lock().await;
        Some(SessionSnapshot {
            user_id,
            state: guard.session.step(),
            request: guard.session.request().clone(),
            last_activity: guard.last_activity,
        })
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Queue a completed calculation for the history writer.
    pub fn queue_history(&self, record: CalculationRecord) {
        if let Err(err) = self.history_tx.try_send(record) {
            tracing::warn!("History queue rejected record: {}", err);
        }
    }

    /// Reset abandoned dialogues and drop idle entries older than `ttl`.
    ///
    /// Sessions that are locked, or about to be locked by a request, are
    /// skipped. Returns the number of dialogues that were reset.
    pub fn expire_sessions(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let mut reset = 0;
        let mut stale = Vec::new();

        for entry in self.sessions.iter() {
            if Arc::strong_count(entry.value()) > 1 {
                continue;
            }
            let Ok(mut slot) = entry.value().try_lock() else {
                continue;
            };
            let Some(inactive) = slot.inactive_for(now) else {
                continue;
            };
            if inactive <= ttl {
                continue;
            }
            if !slot.session.is_idle() {
                slot.session.reset();
                reset += 1;
                tracing::info!(
                    "Session for user {} abandoned after {}s",
                    entry.key(),
                    inactive.num_seconds()
                );
            }
            stale.push(*entry.key());
        }

        for user_id in stale {
            // Only the map may hold the slot, otherwise a request has
            // already cloned it and would keep working on an orphan.
            self.sessions.remove_if(&user_id, |_, slot| {
                Arc::strong_count(slot) == 1
                    && slot
                        .try_lock()
                        .map(|slot| slot.session.is_idle())
                        .unwrap_or(false)
            });
        }

        reset
    }
}
