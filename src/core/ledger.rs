//! Threat Ledger
//!
//! Newest-first history of scan results, persisted as one JSON snapshot
//! under `scan_history`. The ledger is a convenience cache, not a system of
//! record: a corrupt snapshot loads as empty and failed writes are only
//! logged.
//!
//! Several handles may share one store (the scanner's ledger and a history
//! view). `append` re-reads the persisted snapshot before prepending so no
//! handle overwrites another's records; views call `reload` on
//! `LedgerAppended`.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::core::classifier::display_category;
use crate::models::config::SherlockConfig;
use crate::models::types::{LedgerSummary, ScanResult, ThreatLevel};
use crate::utils::constants::{DEFAULT_PAGE_SIZE, KEY_SCAN_HISTORY};
use crate::utils::events::{AgentEvent, EventBus};
use crate::utils::store::{read_json_records, write_json, SharedStore};

pub struct Ledger {
    store: SharedStore,
    events: Option<EventBus>,
    entries: Vec<ScanResult>,
    /// Rows currently revealed by the view
    visible_count: usize,
}

impl Ledger {
    /// Load the persisted snapshot. Missing or malformed → empty ledger.
    pub fn load(store: SharedStore) -> Self {
        let entries: Vec<ScanResult> =
            read_json_records(store.as_ref(), KEY_SCAN_HISTORY).unwrap_or_default();

        info!("📒 LEDGER LOAD: {} records", entries.len());

        Self {
            store,
            events: None,
            entries,
            visible_count: DEFAULT_PAGE_SIZE,
        }
    }

    /// Load with the configured page size
    pub fn from_config(store: SharedStore, config: &SherlockConfig) -> Self {
        Self::load(store).with_page_size(config.page_size)
    }

    /// Publish `LedgerAppended` on this bus after every append
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Initial number of visible rows
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.visible_count = page_size;
        self
    }

    /// Pick up records appended through other handles.
    ///
    /// A missing or malformed snapshot keeps the in-memory copy, which may
    /// hold records whose write failed.
    pub fn reload(&mut self) -> &[ScanResult] {
        if let Some(entries) = read_json_records(self.store.as_ref(), KEY_SCAN_HISTORY) {
            self.entries = entries;
        }
        &self.entries
    }

    /// Prepend a result to the latest persisted snapshot and persist it.
    ///
    /// No dedup: appending the same result twice records it twice.
    pub fn append(&mut self, result: ScanResult) {
        debug!("📝 LEDGER APPEND: {}", result.summary());
        let id = result.id.clone();
        self.reload();
        self.entries.insert(0, result);

        if !write_json(self.store.as_ref(), KEY_SCAN_HISTORY, &self.entries) {
            warn!("⚠️ LEDGER: snapshot not persisted, keeping in memory only");
        }

        if let Some(events) = &self.events {
            events.publish(AgentEvent::LedgerAppended {
                id,
                total: self.entries.len(),
            });
        }
    }

    /// All records, newest first
    pub fn entries(&self) -> &[ScanResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ScanResult> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// First `visible_count` records (fewer if the ledger is shorter)
    pub fn paginate(&self, visible_count: usize) -> &[ScanResult] {
        &self.entries[..visible_count.min(self.entries.len())]
    }

    /// Records revealed so far
    pub fn visible(&self) -> &[ScanResult] {
        self.paginate(self.visible_count)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Reveal `step` more rows. The window grows up to the ledger length
    /// and never shrinks below its current size.
    pub fn load_more(&mut self, step: usize) -> &[ScanResult] {
        let grown = self.visible_count.saturating_add(step).min(self.entries.len());
        self.visible_count = self.visible_count.max(grown);
        self.visible()
    }

    /// Whether a "load more" control should be offered
    pub fn has_more(&self) -> bool {
        self.visible_count < self.entries.len()
    }

    /// Counts per threat level and per category
    pub fn summary(&self) -> LedgerSummary {
        let mut summary = LedgerSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        let mut by_category = BTreeMap::new();
        let mut risk_sum: u64 = 0;

        for entry in &self.entries {
            risk_sum += u64::from(entry.risk_score);
            match entry.threat_level {
                ThreatLevel::Safe => summary.safe += 1,
                ThreatLevel::Suspicious => summary.suspicious += 1,
                ThreatLevel::Dangerous => summary.dangerous += 1,
            }
            if let Some(category) = display_category(entry) {
                *by_category.entry(category).or_insert(0) += 1;
            }
        }

        if summary.total > 0 {
            summary.average_risk = risk_sum as f64 / summary.total as f64;
        }
        summary.by_category = by_category;
        summary
    }
}
