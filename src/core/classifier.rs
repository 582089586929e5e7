//! Scam Category Classifier
//!
//! Maps a verdict and its findings to a [`ScamCategory`] using an ordered
//! keyword table. Categories overlap in real verdicts ("call your bank"),
//! so the table order decides: the first rule with a keyword present wins.

use crate::models::types::{ScamCategory, ScanResult, ThreatLevel};

/// Keyword rules in priority order. `Other` is the implicit fallback.
pub const CATEGORY_RULES: [(ScamCategory, &[&str]); 5] = [
    (ScamCategory::Smishing, &["sms", "text message", "delivery"]),
    (ScamCategory::Vishing, &["call", "voice", "helpline", "toll-free"]),
    (ScamCategory::TechSupport, &["support", "microsoft", "virus", "infected"]),
    (ScamCategory::Investment, &["crypto", "bitcoin", "invest", "profit"]),
    (ScamCategory::Phishing, &["login", "bank", "account", "verify", "credential"]),
];

/// Classify verdict text plus findings. Pure and deterministic.
pub fn classify<S: AsRef<str>>(verdict: &str, findings: &[S]) -> ScamCategory {
    let mut text = verdict.to_string();
    for finding in findings {
        text.push(' ');
        text.push_str(finding.as_ref());
    }
    classify_text(&text)
}

/// Classify already-joined text (case-insensitive)
pub fn classify_text(text: &str) -> ScamCategory {
    let text = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(ScamCategory::Other)
}

/// Category to show next to a result, `None` for safe results
pub fn display_category(result: &ScanResult) -> Option<ScamCategory> {
    match result.threat_level {
        ThreatLevel::Safe => None,
        _ => Some(result.category()),
    }
}
