//! Constants Module - Single Source of Truth
//!
//! Storage keys, XP rewards, the rank ladder and the badge catalogue.
//! Other modules read these instead of hardcoding values.

use crate::models::types::StatKey;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// User-Agent for scan requests
pub const USER_AGENT: &str = concat!("ScamSherlock/", env!("CARGO_PKG_VERSION"));

// ============================================
// CONFIG DEFAULTS
// ============================================

pub const DEFAULT_SCAN_ENDPOINT: &str = "http://127.0.0.1:8000/api/scan";

pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 90;

pub const DEFAULT_STORE_PATH: &str = "./sherlock_store.json";

/// Ledger rows revealed per "load more"
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

// ============================================
// STORAGE KEYS
// ============================================

/// Ledger snapshot (JSON array, newest first)
pub const KEY_SCAN_HISTORY: &str = "scan_history";
/// Wiretap draft text (raw string)
pub const KEY_WIRETAP_TEXT: &str = "wiretap_text";
/// Last wiretap extraction (JSON array of URLs)
pub const KEY_WIRETAP_URLS: &str = "wiretap_urls";
/// Agent XP (decimal integer)
pub const KEY_AGENT_XP: &str = "agent_xp";
/// Agent stats (JSON object)
pub const KEY_AGENT_STATS: &str = "agent_stats";

// ============================================
// XP REWARDS
// ============================================

/// Awarded for every completed scan
pub const XP_PER_SCAN: u64 = 50;

/// Awarded for a wiretap extraction that found at least one link
pub const XP_PER_INTERCEPT: u64 = 50;

// ============================================
// RANKS
// ============================================

/// A named tier on the XP ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Rank {
    pub name: &'static str,
    pub min_xp: u64,
}

/// Rank ladder, ascending by threshold. The first entry must start at 0.
pub static RANKS: [Rank; 4] = [
    Rank { name: "Rookie Informant", min_xp: 0 },
    Rank { name: "Field Agent", min_xp: 500 },
    Rank { name: "Senior Detective", min_xp: 1000 },
    Rank { name: "Director of Intelligence", min_xp: 2500 },
];

// ============================================
// BADGES
// ============================================

/// Stat threshold that unlocks a badge, plus the follow-on tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockRule {
    pub stat: StatKey,
    pub target: u64,
    pub next_target: u64,
    pub next_title: &'static str,
}

/// Achievement shown on the agent profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: UnlockRule,
}

pub static BADGES: [Badge; 3] = [
    Badge {
        id: "first_intercept",
        title: "First Interception",
        description: "Used the Scanner for the first time.",
        icon: "🕵️",
        rule: UnlockRule {
            stat: StatKey::TotalScans,
            target: 1,
            next_target: 10,
            next_title: "Elite Interceptor",
        },
    },
    Badge {
        id: "bulk_extractor",
        title: "Bulk Extractor",
        description: "Analyzed over 500 characters in Wiretap.",
        icon: "📂",
        rule: UnlockRule {
            stat: StatKey::TotalCharsProcessed,
            target: 500,
            next_target: 5000,
            next_title: "Data Hoarder",
        },
    },
    Badge {
        id: "report_specialist",
        title: "Report Specialist",
        description: "Dispatched 3+ reports to authorities.",
        icon: "🚨",
        rule: UnlockRule {
            stat: StatKey::ReportsSent,
            target: 3,
            next_target: 15,
            next_title: "Justice Bringer",
        },
    },
];

/// Look up a badge by id
pub fn get_badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}
