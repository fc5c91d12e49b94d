//! Signal Detector
//!
//! Classifies message text as scam-indicative by scanning for a fixed
//! lexicon of suspicious terms. Deliberately shallow: case-insensitive
//! substring containment, no NLP, no state.

use crate::models::Detection;

/// Static scam lexicon — zero allocation
///
/// Spans urgency, financial instruments, authority/threat language, and
/// phishing-action vocabulary.
const SCAM_KEYWORDS: &[&str] = &[
    // Urgency
    "urgent", "immediately", "expire", "last chance", "hurry", "now",
    // Banking / financial instruments
    "bank", "block", "blocked", "account", "upi", "otp", "pin", "password",
    "kyc", "aadhar", "credit card", "debit card", "paytm", "gpay", "phonepe",
    "ifsc",
    // Prize bait
    "prize", "won", "winner", "lottery", "lucky", "selected",
    "congratulations", "reward",
    // Authority / threat
    "suspended", "legal", "arrest", "police", "court", "fine",
    // Phishing actions
    "verify", "verification", "click here", "link", "download", "install",
    "confirm", "update",
];

/// Scam signal detector
pub struct SignalDetector;

impl SignalDetector {
    /// Scan `text` for lexicon terms.
    ///
    /// Returns `is_scam = true` iff at least one term matched; matched
    /// keywords come back in lexicon order.
    pub fn detect(text: &str) -> Detection {
        if text.is_empty() {
            return Detection::default();
        }

        let lower = text.to_lowercase();
        let keywords: Vec<&'static str> = SCAM_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(**kw))
            .copied()
            .collect();

        Detection {
            is_scam: !keywords.is_empty(),
            keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_lexicon_terms() {
        let cases = vec![
            ("Your bank account will be blocked", vec!["bank", "block", "blocked", "account"]),
            ("URGENT: verify your KYC immediately", vec!["urgent", "immediately", "kyc", "verify"]),
            ("Congratulations! You are a lottery winner", vec!["winner", "lottery", "congratulations"]),
        ];

        for (text, expected) in cases {
            let detection = SignalDetector::detect(text);
            assert!(detection.is_scam, "expected scam for {:?}", text);
            for term in expected {
                assert!(
                    detection.keywords.contains(&term),
                    "expected {:?} in matches for {:?}",
                    term,
                    text
                );
            }
        }
    }

    #[test]
    fn test_case_insensitive() {
        let detection = SignalDetector::detect("PLEASE VERIFY YOUR OTP");
        assert!(detection.is_scam);
        assert!(detection.keywords.contains(&"verify"));
        assert!(detection.keywords.contains(&"otp"));
    }

    #[test]
    fn test_clean_text() {
        let detection = SignalDetector::detect("Lovely weather today, shall we meet for lunch?");
        assert!(!detection.is_scam);
        assert!(detection.keywords.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let detection = SignalDetector::detect("");
        assert!(!detection.is_scam);
        assert!(detection.keywords.is_empty());
    }
}
