//! URL Extraction
//!
//! Pulls `http(s)://` links out of pasted text (emails, chat logs, SMS dumps)
//! for the Wiretap screen. A link runs until the next whitespace.

use regex::Regex;
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"https?://\S+").unwrap();
}

/// Unique links in first-seen order. Empty input or no match → empty vec.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_first_seen_order() {
        let urls = extract_urls("Visit http://a.co and http://a.co again, also http://b.co");
        assert_eq!(urls, vec!["http://a.co", "http://b.co"]);
    }

    #[test]
    fn test_trailing_punctuation_is_kept() {
        // Everything up to whitespace belongs to the token
        let urls = extract_urls("see https://x.io/path?q=1, then stop");
        assert_eq!(urls, vec!["https://x.io/path?q=1,"]);
    }

    #[test]
    fn test_no_scheme_no_match() {
        assert!(extract_urls("www.example.com and ftp://files.example").is_empty());
        assert!(extract_urls("").is_empty());
        assert!(extract_urls("   \n\t").is_empty());
    }

    #[test]
    fn test_case_sensitive_equality() {
        let urls = extract_urls("http://A.co http://a.co");
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_multiline_input() {
        let text = "From: bank@secure-alerts.example\nClick https://secure-alerts.example/login\r\nor https://bit.ly/3xYz";
        assert_eq!(
            extract_urls(text),
            vec!["https://secure-alerts.example/login", "https://bit.ly/3xYz"]
        );
    }
}
