//! Session store & engagement state machine
//!
//! Owns all per-conversation state. Each session is guarded by its own
//! mutex; a full turn (count increment, log append, keyword union, and the
//! check-and-set deciding whether to report) executes under that single
//! lock, which is what makes the callback at-most-once under concurrent
//! requests for the same session key.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::models::{Detection, SessionPhase, SessionSnapshot, TurnRecord};

/// Trait for session state persistence
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Apply one inbound message to the session, creating it if unseen.
    ///
    /// The returned record carries a snapshot exactly once per session:
    /// on the turn the session transitions into `Reported`.
    async fn apply_turn(
        &self,
        session_id: &str,
        text: &str,
        detection: &Detection,
        report_threshold: u32,
    ) -> TurnRecord;

    /// Number of live sessions.
    async fn session_count(&self) -> usize;

    /// Drop sessions idle longer than `ttl`. Returns how many were evicted.
    async fn prune_idle(&self, ttl: Duration) -> usize;
}

/// Mutable per-session state. All flags are sticky.
#[derive(Debug)]
struct SessionRecord {
    turn_count: u32,
    messages: Vec<String>,
    /// Unique, insertion-ordered — the report truncates from the front.
    keywords: Vec<String>,
    scam_detected: bool,
    callback_sent: bool,
    last_activity: DateTime<Utc>,
}

impl SessionRecord {
    fn new() -> Self {
        Self {
            turn_count: 0,
            messages: Vec::new(),
            keywords: Vec::new(),
            scam_detected: false,
            callback_sent: false,
            last_activity: Utc::now(),
        }
    }

    fn phase(&self) -> SessionPhase {
        if self.callback_sent {
            SessionPhase::Reported
        } else if self.scam_detected {
            SessionPhase::ScamFlagged
        } else {
            SessionPhase::Engaging
        }
    }
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionRecord>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<SessionRecord>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(record) = sessions.get(session_id) {
                return Arc::clone(record);
            }
        }

        let mut sessions = self.sessions.write().await;
        let record = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!("Creating session {}", session_id);
                Arc::new(Mutex::new(SessionRecord::new()))
            });
        Arc::clone(record)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {

    async fn apply_turn(
        &self,
        session_id: &str,
        text: &str,
        detection: &Detection,
        report_threshold: u32,
    ) -> TurnRecord {
        let record = self.get_or_create(session_id).await;
        let mut session = record.lock().await;

        session.turn_count += 1;
        session.messages.push(text.to_string());
        session.last_activity = Utc::now();

        if detection.is_scam {
            session.scam_detected = true;
            for kw in &detection.keywords {
                if !session.keywords.iter().any(|k| k == kw) {
                    session.keywords.push(kw.to_string());
                }
            }
        }

        // Atomic with respect to other turns on this session: the flag flips
        // under the same lock as the threshold check.
        let report = if session.scam_detected
            && session.turn_count >= report_threshold
            && !session.callback_sent
        {
            session.callback_sent = true;
            info!(
                "Session {} reached reporting threshold at turn {}",
                session_id, session.turn_count
            );
            Some(SessionSnapshot {
                session_id: session_id.to_string(),
                messages: session.messages.clone(),
                turn_count: session.turn_count,
                keywords: session.keywords.clone(),
            })
        } else {
            None
        };

        TurnRecord {
            turn_count: session.turn_count,
            scam_detected: session.scam_detected,
            phase: session.phase(),
            report,
        }
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn prune_idle(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(0));

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let mut stale = Vec::new();

        for (id, record) in sessions.iter() {
            // Skip sessions mid-turn rather than block the sweep on them.
            if let Ok(session) = record.try_lock() {
                if session.last_activity < cutoff {
                    stale.push(id.clone());
                }
            }
        }

        for id in &stale {
            sessions.remove(id);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle session(s)", evicted);
        }
        evicted
    }
}
