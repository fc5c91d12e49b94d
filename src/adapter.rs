//! Inbound message adapter
//!
//! Scam-reporting integrations POST wildly different body shapes. This
//! adapter digs a session identifier and a message text out of whatever
//! JSON arrives; it never errors — the worst case is "no text found",
//! which the transport turns into a greeting.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::models::InboundMessage;

/// Conventional keys carrying the message text, checked in order.
const TEXT_KEYS: &[&str] = &["text", "message", "content", "query", "body", "msg", "data"];

/// Conventional keys carrying the session identifier, checked in order.
const SESSION_KEYS: &[&str] = &["sessionId", "session_id", "session"];

/// Recover `(session id, text, prior turns)` from an arbitrary JSON body.
///
/// A missing session id gets a fresh UUID so the conversation can still be
/// tracked across later turns that echo it back.
pub fn extract_message(body: &Value) -> InboundMessage {
    let session_id = find_session_id(body)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let (text, prior_turns) = match transcript_turns(body) {
        Some(mut turns) if !turns.is_empty() => {
            let last = turns.pop();
            (last, turns)
        }
        _ => (find_text(body, 0), Vec::new()),
    };

    InboundMessage {
        session_id,
        text: text.filter(|t| !t.trim().is_empty()),
        prior_turns,
        received_at: Utc::now(),
    }
}

fn find_session_id(body: &Value) -> Option<String> {
    let obj = body.as_object()?;
    for key in SESSION_KEYS {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// `messages`-style transcript: an array of strings or role/content objects.
fn transcript_turns(body: &Value) -> Option<Vec<String>> {
    let entries = body.as_object()?.get("messages")?.as_array()?;
    let turns = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => find_text(entry, 1),
            _ => None,
        })
        .collect();
    Some(turns)
}

/// Depth-limited search for message text.
fn find_text(value: &Value, depth: u8) -> Option<String> {
    if depth > 2 {
        return None;
    }

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            for key in TEXT_KEYS {
                match map.get(*key) {
                    Some(Value::String(s)) => return Some(s.clone()),
                    Some(nested @ Value::Object(_)) => {
                        if let Some(inner) = find_text(nested, depth + 1) {
                            return Some(inner);
                        }
                    }
                    _ => {}
                }
            }
            // Last resort: any string value long enough to be a message.
            map.values().find_map(|v| match v {
                Value::String(s) if s.len() > 5 => Some(s.clone()),
                _ => None,
            })
        }
        _ => None,
    }
}
