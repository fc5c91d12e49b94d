//! Conversation engagement engine
//!
//! One call per inbound turn: detect scam signals, fold the turn into the
//! session, pick a persona reply, and — on the turn a session first
//! qualifies — hand the accumulated intelligence to the dispatcher. The
//! reply always returns synchronously; the callback rides the dispatcher's
//! worker pool and can never delay it.

use tracing::{debug, info};

use crate::callback::CallbackDispatcher;
use crate::detector::SignalDetector;
use crate::models::TurnOutcome;
use crate::responder::PersonaResponder;
use crate::session::SessionStore;

pub struct HoneypotEngine {
    store: Box<dyn SessionStore>,
    responder: PersonaResponder,
    dispatcher: CallbackDispatcher,
    report_threshold: u32,
}

impl HoneypotEngine {
    pub fn new(
        store: Box<dyn SessionStore>,
        responder: PersonaResponder,
        dispatcher: CallbackDispatcher,
        report_threshold: u32,
    ) -> Self {
        Self {
            store,
            responder,
            dispatcher,
            report_threshold,
        }
    }

    /// Process one turn for a session. `text` must be non-blank; the
    /// transport filters degenerate input before it reaches here.
    pub async fn process_message(&self, session_id: &str, text: &str) -> TurnOutcome {
        let detection = SignalDetector::detect(text);
        if detection.is_scam {
            debug!(
                "Session {}: matched {} scam keyword(s)",
                session_id,
                detection.keywords.len()
            );
        }

        let record = self
            .store
            .apply_turn(session_id, text, &detection, self.report_threshold)
            .await;

        let reply = self.responder.reply(text, record.turn_count);

        let reported = if let Some(snapshot) = record.report {
            info!(
                "Session {}: dispatching intelligence report ({} turn(s), {} keyword(s))",
                session_id,
                snapshot.turn_count,
                snapshot.keywords.len()
            );
            self.dispatcher.dispatch(snapshot);
            true
        } else {
            false
        };

        TurnOutcome {
            reply: reply.to_string(),
            turn_count: record.turn_count,
            scam_detected: record.scam_detected,
            reported,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.store.session_count().await
    }

    pub async fn prune_idle(&self, ttl: std::time::Duration) -> usize {
        self.store.prune_idle(ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{CallbackDispatcher, IntakeSink};
    use crate::error::Result;
    use crate::models::{CallbackPayload, ResponseCategory};
    use crate::responder::phrases;
    use crate::session::InMemorySessionStore;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    struct RecordingSink {
        delivered: Mutex<Vec<CallbackPayload>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl IntakeSink for RecordingSink {
        async fn deliver(&self, payload: &CallbackPayload) -> Result<()> {
            self.delivered.lock().await.push(payload.clone());
            Ok(())
        }
    }

    fn test_engine(sink: Arc<RecordingSink>) -> HoneypotEngine {
        HoneypotEngine::new(
            Box::new(InMemorySessionStore::new()),
            PersonaResponder::with_seed(1),
            CallbackDispatcher::start(sink, 2, 16, 10),
            3,
        )
    }

    async fn wait_for_delivery(sink: &RecordingSink, count: usize) {
        for _ in 0..100 {
            if sink.delivered.lock().await.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_end_to_end_three_turn_scenario() {
        let sink = Arc::new(RecordingSink::new());
        let engine = test_engine(sink.clone());

        let turn1 = engine
            .process_message("S1", "Your bank account will be blocked, verify immediately")
            .await;
        assert_eq!(turn1.turn_count, 1);
        assert!(turn1.scam_detected);
        assert!(!turn1.reported);
        assert!(phrases(ResponseCategory::Initial).contains(&turn1.reply.as_str()));

        let turn2 = engine
            .process_message("S1", "Please share your UPI ID: john@paytm")
            .await;
        assert_eq!(turn2.turn_count, 2);
        assert!(!turn2.reported);
        assert!(phrases(ResponseCategory::Financial).contains(&turn2.reply.as_str()));

        let turn3 = engine
            .process_message("S1", "Hurry, this is urgent!")
            .await;
        assert_eq!(turn3.turn_count, 3);
        assert!(turn3.reported);

        wait_for_delivery(&sink, 1).await;
        let delivered = sink.delivered.lock().await;
        assert_eq!(delivered.len(), 1);
        let payload = &delivered[0];
        assert_eq!(payload.session_id, "S1");
        assert_eq!(payload.total_messages_exchanged, 3);
        assert!(payload.extracted_intelligence.upi_ids.contains(&"john@paytm".to_string()));
        assert!(payload
            .extracted_intelligence
            .suspicious_keywords
            .contains(&"bank".to_string()));
    }

    #[tokio::test]
    async fn test_no_report_without_scam_signals() {
        let sink = Arc::new(RecordingSink::new());
        let engine = test_engine(sink.clone());

        for _ in 0..5 {
            let outcome = engine.process_message("S2", "nice weather today").await;
            assert!(!outcome.scam_detected);
            assert!(!outcome.reported);
        }

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_report_never_refires() {
        let sink = Arc::new(RecordingSink::new());
        let engine = test_engine(sink.clone());

        let mut reports = 0;
        for _ in 0..8 {
            let outcome = engine
                .process_message("S3", "urgent: verify your otp and bank account")
                .await;
            if outcome.reported {
                reports += 1;
            }
        }
        assert_eq!(reports, 1);

        wait_for_delivery(&sink, 1).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(sink.delivered.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_same_session_dispatches_once() {
        let sink = Arc::new(RecordingSink::new());
        let engine = Arc::new(test_engine(sink.clone()));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine
                    .process_message("S4", "your account is blocked, pay the fine now")
                    .await
            }));
        }

        let mut reported = 0;
        let mut max_turn = 0;
        for handle in handles {
            let outcome = handle.await.expect("task");
            if outcome.reported {
                reported += 1;
            }
            max_turn = max_turn.max(outcome.turn_count);
        }
        assert_eq!(reported, 1);
        assert_eq!(max_turn, 12);

        wait_for_delivery(&sink, 1).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(sink.delivered.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_engaged_replies_after_turn_five() {
        let sink = Arc::new(RecordingSink::new());
        let engine = test_engine(sink);

        for _ in 0..6 {
            engine.process_message("S5", "checking in").await;
        }
        let outcome = engine.process_message("S5", "checking in").await;
        assert!(phrases(ResponseCategory::Engaged).contains(&outcome.reply.as_str()));
    }
}
