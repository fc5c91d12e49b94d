//! Scam Honeypot Agent
//!
//! A conversational honeypot that:
//! - Impersonates a naive victim in suspected scam conversations
//! - Classifies inbound messages against a fixed scam lexicon
//! - Extracts actionable intelligence (accounts, UPI ids, phones, URLs)
//! - Tracks per-session engagement state with sticky flags
//! - Reports accumulated intelligence to an intake endpoint, at most once
//!   per session, off the request path
//!
//! TURN FLOW:
//! INBOUND → DETECT → SESSION UPDATE → PERSONA REPLY → (REPORT?) → RESPOND

pub mod adapter;
pub mod api;
pub mod callback;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod models;
pub mod responder;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use detector::SignalDetector;
