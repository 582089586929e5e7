//! Scanner workflow
//!
//! One scan end to end: ask the scan service, record the result in the
//! ledger, then award XP and bump `totalScans`. A failed scan leaves the
//! ledger and progression untouched.

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::ledger::Ledger;
use crate::core::progression::ProgressionEngine;
use crate::models::config::SherlockConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ScanResult, StatKey};
use crate::providers::scan_client::ScanClient;
use crate::utils::constants::XP_PER_SCAN;
use crate::utils::events::EventBus;
use crate::utils::store::{FileStore, SharedStore};

pub struct Scanner {
    client: ScanClient,
    ledger: Ledger,
    progression: ProgressionEngine,
}

impl Scanner {
    pub fn new(client: ScanClient, ledger: Ledger, progression: ProgressionEngine) -> Self {
        Self {
            client,
            ledger,
            progression,
        }
    }

    /// Wire a scanner from config: file store at `store_path`, one event
    /// bus shared by the ledger and progression, `page_size` rows per page.
    pub fn from_config(config: &SherlockConfig) -> Self {
        let store: SharedStore = Arc::new(FileStore::open(config.store_path.clone()));
        let events = EventBus::new(config.event_capacity);

        let ledger = Ledger::from_config(store.clone(), config).with_events(events.clone());
        let progression = ProgressionEngine::new(store, events);

        info!("🕵️ Scanner ready: {}", config.scan_endpoint);
        Self::new(ScanClient::from_config(config), ledger, progression)
    }

    /// Scan `url` and record the outcome. The error's
    /// [`AppError::user_message`] is what the user should see.
    pub async fn scan(&mut self, url: &str) -> AppResult<ScanResult> {
        let target = url.trim();
        if target.is_empty() {
            return Err(AppError::bad_request("URL is empty"));
        }

        let result = match self.client.scan(target).await {
            Ok(result) => result,
            Err(e) => {
                warn!("❌ Scan of {} failed: {}", target, e);
                return Err(e);
            }
        };

        self.ledger.append(result.clone());
        self.progression.add_xp(XP_PER_SCAN);
        self.progression.increment_stat(StatKey::TotalScans, 1);

        Ok(result)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn progression(&self) -> &ProgressionEngine {
        &self.progression
    }

    pub fn client(&self) -> &ScanClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::models::types::ThreatLevel;
    use crate::utils::events::AgentEvent;
    use crate::utils::store::MemoryStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_blank_url_rejected_locally() {
        let store = MemoryStore::shared();
        let progression = ProgressionEngine::new(store.clone(), EventBus::default());
        // Port 9 (discard) is never contacted: the request is refused first
        let client = ScanClient::new("http://127.0.0.1:9/api/scan", Duration::from_millis(50));
        let mut scanner = Scanner::new(client, Ledger::load(store), progression);

        let err = scanner.scan("   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ScanBadRequest);
        assert!(scanner.ledger().is_empty());
        assert_eq!(scanner.progression().xp(), 0);
    }

    #[test]
    fn test_from_config_wires_store_bus_and_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = SherlockConfig {
            scan_endpoint: "http://127.0.0.1:9/api/scan".to_string(),
            store_path: dir.path().join("agent.json"),
            page_size: 2,
            event_capacity: 4,
            ..Default::default()
        };

        let mut scanner = Scanner::from_config(&config);
        assert_eq!(scanner.client().endpoint(), "http://127.0.0.1:9/api/scan");
        assert_eq!(scanner.ledger().visible_count(), 2);

        let mut rx = scanner.progression().events().subscribe();
        let result = ScanResult::new("http://a.test", ThreatLevel::Safe, 3, "fine", vec![]);
        let id = result.id.clone();
        scanner.ledger_mut().append(result);
        scanner.progression().add_xp(50);

        // Ledger and progression publish on the same bus
        assert_eq!(rx.try_recv().unwrap(), AgentEvent::LedgerAppended { id, total: 1 });
        assert_eq!(rx.try_recv().unwrap(), AgentEvent::XpChanged { xp: 50 });

        // Both write through to the configured file
        let reopened = Scanner::from_config(&config);
        assert_eq!(reopened.ledger().len(), 1);
        assert_eq!(reopened.progression().xp(), 50);
    }
}
