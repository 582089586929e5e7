//! Type definitions for Scam Sherlock
//! Scan records, threat levels, scam categories and agent statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Threat level reported by the scan service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    /// Page appears legitimate
    Safe,
    /// Some concerning characteristics
    Suspicious,
    /// Multiple phishing indicators
    Dangerous,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Safe => "SAFE",
            ThreatLevel::Suspicious => "SUSPICIOUS",
            ThreatLevel::Dangerous => "DANGEROUS",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ThreatLevel::Safe => "✅",
            ThreatLevel::Suspicious => "🟠",
            ThreatLevel::Dangerous => "🔴",
        }
    }
}

/// Scam technique implied by a verdict's text.
///
/// Never stored. Derived from `verdict` + `findings` on every read,
/// see [`crate::core::classifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScamCategory {
    Smishing,
    Vishing,
    TechSupport,
    Investment,
    Phishing,
    Other,
}

impl ScamCategory {
    /// Stable identifier (`TECH_SUPPORT`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamCategory::Smishing => "SMISHING",
            ScamCategory::Vishing => "VISHING",
            ScamCategory::TechSupport => "TECH_SUPPORT",
            ScamCategory::Investment => "INVESTMENT",
            ScamCategory::Phishing => "PHISHING",
            ScamCategory::Other => "OTHER",
        }
    }

    /// Label shown in the ledger table (`TECH SUPPORT`)
    pub fn label(&self) -> &'static str {
        match self {
            ScamCategory::TechSupport => "TECH SUPPORT",
            other => other.as_str(),
        }
    }

    /// One-line explanation shown under the label
    pub fn reason(&self) -> &'static str {
        match self {
            ScamCategory::Smishing => "SMS-based lure detected",
            ScamCategory::Vishing => "Voice/Phone scam indicators found",
            ScamCategory::TechSupport => "Suspicious remote access patterns detected",
            ScamCategory::Investment => "Unrealistic financial promises identified",
            ScamCategory::Phishing => "Credential harvesting attempt detected",
            ScamCategory::Other => "General malicious activity detected",
        }
    }
}

impl fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a single URL scan, produced by the external scan service.
///
/// The core treats it as immutable: `threat_level` and `risk_score`
/// arrive together and are never recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Opaque identifier assigned by the scan service
    pub id: String,
    /// Scanned target
    pub url: String,
    /// Completion time of the scan
    pub timestamp: DateTime<Utc>,
    /// Base64 PNG of the page. `None` when the site was unreachable.
    #[serde(
        rename = "screenshot_base64",
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub screenshot: Option<String>,
    pub threat_level: ThreatLevel,
    /// 0-100
    pub risk_score: u8,
    /// 1-2 sentence summary
    pub verdict: String,
    #[serde(default)]
    pub findings: Vec<String>,
}

impl ScanResult {
    /// Build a result stamped with a fresh id and the current time.
    pub fn new(
        url: impl Into<String>,
        threat_level: ThreatLevel,
        risk_score: u8,
        verdict: impl Into<String>,
        findings: Vec<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            timestamp: Utc::now(),
            screenshot: None,
            threat_level,
            risk_score: risk_score.min(100),
            verdict: verdict.into(),
            findings,
        }
    }

    /// Attach a screenshot
    pub fn with_screenshot(mut self, screenshot_base64: impl Into<String>) -> Self {
        let shot = screenshot_base64.into();
        self.screenshot = if shot.is_empty() { None } else { Some(shot) };
        self
    }

    /// Whether the scanner managed to reach the page at all
    pub fn is_reachable(&self) -> bool {
        self.screenshot.is_some()
    }

    /// Scam category, recomputed from verdict + findings
    pub fn category(&self) -> ScamCategory {
        crate::core::classifier::classify(&self.verdict, &self.findings)
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} {} | {} | risk {} | {}",
            self.threat_level.emoji(),
            self.threat_level.as_str(),
            self.url,
            self.risk_score,
            self.category().label()
        )
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

/// Counter tracked in [`AgentStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKey {
    TotalScans,
    TotalCharsProcessed,
    ReportsSent,
}

impl StatKey {
    pub const ALL: [StatKey; 3] = [
        StatKey::TotalScans,
        StatKey::TotalCharsProcessed,
        StatKey::ReportsSent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::TotalScans => "totalScans",
            StatKey::TotalCharsProcessed => "totalCharsProcessed",
            StatKey::ReportsSent => "reportsSent",
        }
    }
}

/// Cumulative agent counters. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentStats {
    pub total_scans: u64,
    pub total_chars_processed: u64,
    pub reports_sent: u64,
}

impl AgentStats {
    pub fn get(&self, key: StatKey) -> u64 {
        match key {
            StatKey::TotalScans => self.total_scans,
            StatKey::TotalCharsProcessed => self.total_chars_processed,
            StatKey::ReportsSent => self.reports_sent,
        }
    }

    /// Add `amount` to one counter, saturating at `u64::MAX`
    pub fn bump(&mut self, key: StatKey, amount: u64) -> u64 {
        let slot = match key {
            StatKey::TotalScans => &mut self.total_scans,
            StatKey::TotalCharsProcessed => &mut self.total_chars_processed,
            StatKey::ReportsSent => &mut self.reports_sent,
        };
        *slot = slot.saturating_add(amount);
        *slot
    }
}

/// Aggregate view over the ledger, used by the analytics screen
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total: usize,
    pub safe: usize,
    pub suspicious: usize,
    pub dangerous: usize,
    /// Mean risk score, 0.0 for an empty ledger
    pub average_risk: f64,
    /// Category counts over non-safe entries only
    pub by_category: BTreeMap<ScamCategory, usize>,
}
