//! Wiretap: link interceptor session
//!
//! Keeps the pasted draft (`wiretap_text`) and the last extraction
//! (`wiretap_urls`) in the store so the screen survives a reload.
//! A successful interception feeds the progression engine.

use serde::Serialize;
use tracing::info;

use crate::core::extraction::extract_urls;
use crate::core::progression::ProgressionEngine;
use crate::models::types::StatKey;
use crate::utils::constants::{KEY_WIRETAP_TEXT, KEY_WIRETAP_URLS, XP_PER_INTERCEPT};
use crate::utils::events::AgentEvent;
use crate::utils::store::{read_json, remove_soft, write_json, write_raw, SharedStore};

/// Outcome of one interception
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interception {
    pub urls: Vec<String>,
    /// 0 when nothing was found
    pub xp_awarded: u64,
}

impl Interception {
    /// Toast text shown after a successful interception
    pub fn notification(&self) -> Option<String> {
        (self.xp_awarded > 0)
            .then(|| format!("+{} XP: {} Links Found", self.xp_awarded, self.urls.len()))
    }
}

pub struct Wiretap {
    store: SharedStore,
    progression: ProgressionEngine,
}

impl Wiretap {
    pub fn new(store: SharedStore, progression: ProgressionEngine) -> Self {
        Self { store, progression }
    }

    /// Persisted draft, empty if none
    pub fn draft(&self) -> String {
        self.store.get(KEY_WIRETAP_TEXT).unwrap_or_default()
    }

    pub fn set_draft(&self, text: &str) {
        write_raw(self.store.as_ref(), KEY_WIRETAP_TEXT, text);
    }

    /// Links from the last interception. Malformed → empty.
    pub fn last_extraction(&self) -> Vec<String> {
        read_json(self.store.as_ref(), KEY_WIRETAP_URLS).unwrap_or_default()
    }

    /// Extract links from the current draft.
    ///
    /// A blank draft clears the last extraction. A non-empty result awards
    /// XP and adds the draft's character count to `totalCharsProcessed`.
    pub fn intercept(&self) -> Interception {
        let text = self.draft();
        let urls = if text.trim().is_empty() {
            Vec::new()
        } else {
            extract_urls(&text)
        };

        write_json(self.store.as_ref(), KEY_WIRETAP_URLS, &urls);
        self.progression
            .events()
            .publish(AgentEvent::WiretapUpdated { urls: urls.clone() });

        if urls.is_empty() {
            return Interception {
                urls,
                xp_awarded: 0,
            };
        }

        info!("📡 WIRETAP: {} links intercepted", urls.len());
        self.progression.add_xp(XP_PER_INTERCEPT);
        self.progression
            .increment_stat(StatKey::TotalCharsProcessed, text.chars().count() as u64);

        Interception {
            urls,
            xp_awarded: XP_PER_INTERCEPT,
        }
    }

    /// Store `text` as the draft, then intercept
    pub fn intercept_text(&self, text: &str) -> Interception {
        self.set_draft(text);
        self.intercept()
    }

    /// Drop the draft and the last extraction
    pub fn clear(&self) {
        remove_soft(self.store.as_ref(), KEY_WIRETAP_TEXT);
        remove_soft(self.store.as_ref(), KEY_WIRETAP_URLS);
        self.progression
            .events()
            .publish(AgentEvent::WiretapUpdated { urls: Vec::new() });
    }
}
