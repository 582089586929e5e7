//! In-process agent event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Every mutation of persisted agent state publishes an [`AgentEvent`]
//! carrying the changed key and its new value, so observers can update
//! without re-reading the store.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::types::StatKey;
use crate::utils::constants::DEFAULT_EVENT_CAPACITY;

/// Change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// XP total changed
    XpChanged { xp: u64 },
    /// One stat counter changed
    StatChanged { key: StatKey, value: u64 },
    /// A scan result was prepended to the ledger
    LedgerAppended { id: String, total: usize },
    /// Wiretap extraction was replaced (empty after a clear)
    WiretapUpdated { urls: Vec<String> },
}

impl AgentEvent {
    /// Storage key the event refers to
    pub fn key(&self) -> &'static str {
        use crate::utils::constants::*;
        match self {
            AgentEvent::XpChanged { .. } => KEY_AGENT_XP,
            AgentEvent::StatChanged { .. } => KEY_AGENT_STATS,
            AgentEvent::LedgerAppended { .. } => KEY_SCAN_HISTORY,
            AgentEvent::WiretapUpdated { .. } => KEY_WIRETAP_URLS,
        }
    }
}

/// Fan-out bus. Cloning yields another handle onto the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AgentEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers that fall more than `capacity` events behind observe
    /// `RecvError::Lagged` and should re-read the store.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped silently when nobody listens.
    pub fn publish(&self, event: AgentEvent) {
        debug!("📣 EVENT: {:?}", event);
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
