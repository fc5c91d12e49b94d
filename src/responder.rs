//! Persona Responder
//!
//! Plays the naive victim. Picks a response category from the message text
//! and turn number, then one phrase at random within the category so
//! repeated sessions do not sound scripted. The RNG is seedable so tests
//! can pin the choice down.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::models::ResponseCategory;

const INITIAL_REPLIES: &[&str] = &[
    "Oh no! What happened to my account? Please tell me more.",
    "This is alarming! How can I fix this immediately?",
    "I am really worried now. What do I need to do?",
    "Please help me! I do not want my account blocked.",
];

const PRIZE_REPLIES: &[&str] = &[
    "Wow, I won something? That is amazing! What do I need to do to claim it?",
    "I never win anything! How can I receive my prize?",
    "This is so exciting! Do you need my bank details for the transfer?",
];

const VERIFICATION_REPLIES: &[&str] = &[
    "Of course, I will verify right away! What information do you need?",
    "I do not want any problems. Should I share my OTP with you?",
    "Yes, I will do the verification. Do you need my Aadhar number?",
];

const FINANCIAL_REPLIES: &[&str] = &[
    "I can share my account details. Which bank do you need?",
    "Should I give you my UPI ID? I use PhonePe.",
    "I have accounts in SBI and HDFC. Which one do you want?",
];

const THREAT_REPLIES: &[&str] = &[
    "Please do not arrest me! I will do whatever you say.",
    "I am scared of legal action. How much do I need to pay?",
    "I will cooperate fully. What information do you need from me?",
];

const ENGAGED_REPLIES: &[&str] = &[
    "I am ready to proceed. What is the next step?",
    "I trust you. Please guide me through this process.",
    "I will share everything you need. Just tell me what to send.",
    "Should I transfer the money now? How much exactly?",
];

const DEFAULT_REPLIES: &[&str] = &[
    "I see. Can you explain more about this?",
    "This sounds important. What should I do next?",
    "I want to resolve this. Please tell me more.",
    "How can I help you with this matter?",
];

const PRIZE_TERMS: &[&str] = &["won", "winner", "prize", "lottery", "reward", "lucky"];
const VERIFICATION_TERMS: &[&str] = &["verify", "otp", "kyc", "aadhar", "pin", "password"];
const FINANCIAL_TERMS: &[&str] = &["account", "bank", "upi", "transfer", "payment"];
const THREAT_TERMS: &[&str] = &["arrest", "police", "legal", "court", "fine"];

/// Select the response category for one turn.
///
/// Priority order, first match wins: early turns always open naive,
/// long-running conversations always signal full engagement, everything in
/// between keys off the message content.
pub fn select_category(text: &str, turn: u32) -> ResponseCategory {
    if turn <= 1 {
        return ResponseCategory::Initial;
    }
    if turn > 5 {
        return ResponseCategory::Engaged;
    }

    let lower = text.to_lowercase();
    if PRIZE_TERMS.iter().any(|t| lower.contains(t)) {
        ResponseCategory::Prize
    } else if VERIFICATION_TERMS.iter().any(|t| lower.contains(t)) {
        ResponseCategory::Verification
    } else if FINANCIAL_TERMS.iter().any(|t| lower.contains(t)) {
        ResponseCategory::Financial
    } else if THREAT_TERMS.iter().any(|t| lower.contains(t)) {
        ResponseCategory::Threat
    } else {
        ResponseCategory::Default
    }
}

/// Fixed phrase set for a category.
pub fn phrases(category: ResponseCategory) -> &'static [&'static str] {
    match category {
        ResponseCategory::Initial => INITIAL_REPLIES,
        ResponseCategory::Prize => PRIZE_REPLIES,
        ResponseCategory::Verification => VERIFICATION_REPLIES,
        ResponseCategory::Financial => FINANCIAL_REPLIES,
        ResponseCategory::Threat => THREAT_REPLIES,
        ResponseCategory::Engaged => ENGAGED_REPLIES,
        ResponseCategory::Default => DEFAULT_REPLIES,
    }
}

/// Victim-persona reply generator with injectable randomness.
pub struct PersonaResponder {
    rng: Mutex<StdRng>,
}

impl PersonaResponder {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic responder for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick a reply for this turn: category by priority rules, phrase
    /// uniformly at random within the category.
    pub fn reply(&self, text: &str, turn: u32) -> &'static str {
        let category = select_category(text, turn);
        let set = phrases(category);
        let idx = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..set.len())
        };
        set[idx]
    }
}

impl Default for PersonaResponder {
    fn default() -> Self {
        Self::new()
    }
}
