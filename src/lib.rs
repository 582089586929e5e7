//! Scam Sherlock Library
//!
//! Client-side triage and progression for the Scam Sherlock URL scanner:
//! - Scam category classification of scan verdicts
//! - Threat ledger with persistence and pagination
//! - Agent progression (XP, ranks, badges)
//! - Wiretap link extraction
//!
//! Persistence goes through the [`KeyValueStore`] port and change
//! notifications through the [`EventBus`].

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{
    badge_status, classify, current_rank, display_category, extract_urls, progress_to_next_rank,
    AgentProfile, BadgeStatus, Interception, Ledger, ProgressionEngine, RankProgress, Scanner,
    Wiretap,
};
pub use models::{
    AgentStats, AppError, AppResult, ErrorCode, LedgerSummary, ScamCategory, ScanResult,
    SherlockConfig, StatKey, ThreatLevel,
};
pub use providers::ScanClient;
pub use utils::{
    init_tracing, AgentEvent, Badge, EventBus, FileStore, KeyValueStore, MemoryStore, Rank,
    SharedStore, BADGES, RANKS,
};
