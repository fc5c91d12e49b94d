//! Intelligence Extractor
//!
//! Pulls structured artifacts out of free text: candidate bank account
//! numbers, UPI handles, Indian mobile numbers, and phishing URLs.
//! Patterns are permissive by design — a phone number doubling as an
//! account-number candidate is acceptable, the intake side tolerates
//! overlap.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::IntelligenceRecord;

lazy_static! {
    /// Word-bounded 9–18 digit runs.
    static ref ACCOUNT_RE: Regex =
        Regex::new(r"\b\d{9,18}\b").expect("valid account pattern");

    /// `local@domain` shape, no TLD requirement.
    static ref UPI_RE: Regex =
        Regex::new(r"[A-Za-z0-9._-]+@[A-Za-z0-9]+").expect("valid upi pattern");

    /// Indian mobile: optional +91 prefix, first digit 6–9.
    static ref PHONE_RE: Regex =
        Regex::new(r"(?:\+91[\s-]?)?[6-9]\d{9}").expect("valid phone pattern");

    /// http(s) URL up to whitespace or an unsafe terminator.
    static ref URL_RE: Regex =
        Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("valid url pattern");
}

/// Extract all artifact categories from `text`.
///
/// Empty input yields an all-empty record; this never errors. Each list is
/// deduplicated preserving first-seen order. `suspicious_keywords` is left
/// empty here — the session aggregates keywords across turns.
pub fn extract(text: &str) -> IntelligenceRecord {
    if text.is_empty() {
        return IntelligenceRecord::default();
    }

    IntelligenceRecord {
        bank_accounts: find_unique(&ACCOUNT_RE, text),
        upi_ids: find_unique(&UPI_RE, text),
        phone_numbers: find_unique(&PHONE_RE, text),
        phishing_links: find_unique(&URL_RE, text),
        suspicious_keywords: Vec::new(),
    }
}

fn find_unique(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in re.find_iter(text) {
        let s = m.as_str().to_string();
        if !seen.contains(&s) {
            seen.push(s);
        }
    }
    seen
}
