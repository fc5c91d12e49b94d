//! Core data models for the scam honeypot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Response Categories =================
//

/// Persona reply categories, in the priority order the responder checks them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseCategory {
    Initial,
    Prize,
    Verification,
    Financial,
    Threat,
    Engaged,
    Default,
}

impl fmt::Display for ResponseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResponseCategory::Initial => "initial",
            ResponseCategory::Prize => "prize",
            ResponseCategory::Verification => "verification",
            ResponseCategory::Financial => "financial",
            ResponseCategory::Threat => "threat",
            ResponseCategory::Engaged => "engaged",
            ResponseCategory::Default => "default",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Extracted Intelligence =================
//

/// Structured artifacts pulled from conversation text.
///
/// Field names mirror the intake sink's wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceRecord {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub phishing_links: Vec<String>,
    pub suspicious_keywords: Vec<String>,
}

impl IntelligenceRecord {
    /// True when no artifact category matched (keywords excluded; those are
    /// aggregated by the session, not the extractor).
    pub fn is_empty(&self) -> bool {
        self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phone_numbers.is_empty()
            && self.phishing_links.is_empty()
    }
}

//
// ================= Detection =================
//

/// Result of scanning one message for scam signals.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub is_scam: bool,
    pub keywords: Vec<&'static str>,
}

//
// ================= Session =================
//

/// Engagement phase of a tracked conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Engaging,
    ScamFlagged,
    Reported,
}

/// Immutable copy of a session handed to the callback dispatcher on the
/// turn it transitions into `Reported`.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub messages: Vec<String>,
    pub turn_count: u32,
    pub keywords: Vec<String>,
}

/// What the store reports back for one applied turn.
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub turn_count: u32,
    pub scam_detected: bool,
    pub phase: SessionPhase,
    /// Present exactly once per session, on the reporting turn.
    pub report: Option<SessionSnapshot>,
}

//
// ================= Engine Output =================
//

/// Synchronous result of processing one inbound message.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub turn_count: u32,
    pub scam_detected: bool,
    pub reported: bool,
}

//
// ================= Callback Payload =================
//

/// JSON body POSTed to the external intake endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: u32,
    pub extracted_intelligence: IntelligenceRecord,
    pub agent_notes: String,
}

//
// ================= Inbound Message =================
//

/// What the adapter recovers from an arbitrary request body.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub session_id: String,
    pub text: Option<String>,
    /// Earlier turns when the body carried a conversation transcript.
    pub prior_turns: Vec<String>,
    pub received_at: DateTime<Utc>,
}
