//! Callback Dispatcher
//!
//! Packages a reported session's accumulated intelligence and delivers it
//! to the external intake endpoint, off the request path. A bounded worker
//! pool drains a bounded queue so a flood of qualifying sessions cannot
//! spawn unbounded outbound connections. Delivery failures are logged and
//! swallowed — at most one attempt per session, never retried, never
//! surfaced to the caller.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::{HoneypotError, Result};
use crate::extractor;
use crate::models::{CallbackPayload, SessionSnapshot};

/// Destination for finished intelligence reports.
#[async_trait::async_trait]
pub trait IntakeSink: Send + Sync {
    async fn deliver(&self, payload: &CallbackPayload) -> Result<()>;
}

/// HTTP intake sink (connection-pooled, hard request timeout)
pub struct HttpIntakeSink {
    client: Client,
    intake_url: String,
}

impl HttpIntakeSink {
    pub fn new(intake_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, intake_url }
    }
}

#[async_trait::async_trait]
impl IntakeSink for HttpIntakeSink {
    async fn deliver(&self, payload: &CallbackPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.intake_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HoneypotError::IntakeStatus(status.as_u16()));
        }
        Ok(())
    }
}

/// Handle used by the engine to enqueue a report without blocking.
#[derive(Clone)]
pub struct CallbackDispatcher {
    tx: mpsc::Sender<SessionSnapshot>,
}

impl CallbackDispatcher {
    /// Spawn `workers` consumer tasks over a queue of `queue_depth` slots.
    pub fn start(
        sink: Arc<dyn IntakeSink>,
        workers: usize,
        queue_depth: usize,
        max_keywords: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<SessionSnapshot>(queue_depth);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        for worker_id in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let sink = Arc::clone(&sink);

            tokio::spawn(async move {
                loop {
                    let snapshot = {
                        let mut guard = rx.lock().await;
                        guard.recv().await
                    };
                    let Some(snapshot) = snapshot else {
                        break; // dispatcher dropped
                    };

                    let session_id = snapshot.session_id.clone();
                    let payload = build_payload(snapshot, max_keywords);

                    match sink.deliver(&payload).await {
                        Ok(()) => info!(
                            "Intake callback delivered for session {} (worker {})",
                            session_id, worker_id
                        ),
                        Err(e) => {
                            // Swallowed: the reply already went out.
                            error!("Intake callback failed for session {}: {}", session_id, e)
                        }
                    }
                }
            });
        }

        Self { tx }
    }

    /// Fire-and-forget enqueue. A full queue drops the report with a log
    /// line; the session keeps its reported flag either way.
    pub fn dispatch(&self, snapshot: SessionSnapshot) {
        let session_id = snapshot.session_id.clone();
        if let Err(e) = self.tx.try_send(snapshot) {
            let err = HoneypotError::CallbackError(format!(
                "queue rejected report for session {}: {}",
                session_id, e
            ));
            warn!("Dropping intelligence report: {}", err);
        }
    }
}

/// Recompute intelligence over the whole conversation and shape the wire
/// payload.
pub fn build_payload(snapshot: SessionSnapshot, max_keywords: usize) -> CallbackPayload {
    let all_text = snapshot.messages.join(" ");
    let mut intel = extractor::extract(&all_text);

    intel.suspicious_keywords = snapshot
        .keywords
        .iter()
        .take(max_keywords)
        .cloned()
        .collect();

    let agent_notes = compose_notes(&intel);

    CallbackPayload {
        session_id: snapshot.session_id,
        scam_detected: true,
        total_messages_exchanged: snapshot.turn_count,
        extracted_intelligence: intel,
        agent_notes,
    }
}

/// Human-readable summary of what was captured.
fn compose_notes(intel: &crate::models::IntelligenceRecord) -> String {
    if intel.is_empty() {
        let sample = intel
            .suspicious_keywords
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        return if sample.is_empty() {
            "Engagement ongoing; no payment artifacts shared yet.".to_string()
        } else {
            format!(
                "Engagement ongoing; no payment artifacts yet, pressure tactics observed: {}",
                sample
            )
        };
    }

    let mut found = Vec::new();
    if !intel.bank_accounts.is_empty() {
        found.push(format!("{} bank account(s)", intel.bank_accounts.len()));
    }
    if !intel.upi_ids.is_empty() {
        found.push(format!("{} UPI id(s)", intel.upi_ids.len()));
    }
    if !intel.phone_numbers.is_empty() {
        found.push(format!("{} phone number(s)", intel.phone_numbers.len()));
    }
    if !intel.phishing_links.is_empty() {
        found.push(format!("{} phishing link(s)", intel.phishing_links.len()));
    }

    format!("Scammer engaged; captured {}.", found.join(", "))
}
