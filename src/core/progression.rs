//! Agent Progression Engine
//!
//! XP, ranks and badges. XP and stats live in the store (`agent_xp`,
//! `agent_stats`); every mutation re-reads the latest persisted value,
//! applies the increment, writes it back and publishes an [`AgentEvent`].
//!
//! Rank, rank progress and badge status are pure functions of XP/stats and
//! are never cached.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::types::{AgentStats, StatKey};
use crate::utils::constants::{get_badge, Rank, BADGES, KEY_AGENT_STATS, KEY_AGENT_XP, RANKS};
use crate::utils::events::{AgentEvent, EventBus};
use crate::utils::store::{read_json_object, remove_soft, write_json, write_raw, SharedStore};

// ============================================
// Pure derivations
// ============================================

/// Progress between the current rank and the next one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankProgress {
    /// 0.0..=100.0, exactly 100.0 at the top rank
    pub percent: f64,
    /// `None` at the top rank
    pub next_rank: Option<&'static Rank>,
}

/// Highest rank whose threshold is at or below `xp`
pub fn current_rank(xp: u64) -> &'static Rank {
    RANKS
        .iter()
        .rev()
        .find(|rank| xp >= rank.min_xp)
        .unwrap_or(&RANKS[0])
}

/// Linear progress toward the next rank
pub fn progress_to_next_rank(xp: u64) -> RankProgress {
    let current = current_rank(xp);
    let next = RANKS.iter().find(|rank| rank.min_xp > current.min_xp);

    match next {
        None => RankProgress {
            percent: 100.0,
            next_rank: None,
        },
        Some(next) => {
            let range = (next.min_xp - current.min_xp) as f64;
            let progress = xp.saturating_sub(current.min_xp) as f64;
            RankProgress {
                percent: (progress / range * 100.0).clamp(0.0, 100.0),
                next_rank: Some(next),
            }
        }
    }
}

/// Follow-on tier of an unlocked badge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NextTier {
    pub title: &'static str,
    pub target: u64,
    pub percent: f64,
}

/// Unlock state of one badge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeStatus {
    pub unlocked: bool,
    /// 0.0..=100.0
    pub progress: f64,
    pub current: u64,
    pub target: u64,
    /// Only present once the badge is unlocked
    pub next_tier: Option<NextTier>,
}

impl BadgeStatus {
    /// Result for an id that is not in the catalogue
    pub fn locked() -> Self {
        Self {
            unlocked: false,
            progress: 0.0,
            current: 0,
            target: 100,
            next_tier: None,
        }
    }
}

fn percent_of(current: u64, target: u64) -> f64 {
    if target == 0 {
        return 100.0;
    }
    current.min(target) as f64 / target as f64 * 100.0
}

/// Badge unlock state for `stats`. Unknown ids resolve to [`BadgeStatus::locked`].
pub fn badge_status(badge_id: &str, stats: &AgentStats) -> BadgeStatus {
    let Some(badge) = get_badge(badge_id) else {
        return BadgeStatus::locked();
    };

    let rule = badge.rule;
    let current = stats.get(rule.stat);
    let unlocked = current >= rule.target;

    BadgeStatus {
        unlocked,
        progress: percent_of(current, rule.target),
        current,
        target: rule.target,
        next_tier: unlocked.then(|| NextTier {
            title: rule.next_title,
            target: rule.next_target,
            percent: percent_of(current, rule.next_target),
        }),
    }
}

// ============================================
// Profile snapshot
// ============================================

/// Badge as shown on the profile screen
#[derive(Debug, Clone, Serialize)]
pub struct BadgeCard {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub status: BadgeStatus,
}

/// Everything the profile screen shows, derived from one read of the store
#[derive(Debug, Clone, Serialize)]
pub struct AgentProfile {
    pub xp: u64,
    pub rank: &'static Rank,
    pub progress: RankProgress,
    pub stats: AgentStats,
    pub badges: Vec<BadgeCard>,
}

impl AgentProfile {
    pub fn derive(xp: u64, stats: AgentStats) -> Self {
        let badges = BADGES
            .iter()
            .map(|badge| BadgeCard {
                id: badge.id,
                title: badge.title,
                description: badge.description,
                icon: badge.icon,
                status: badge_status(badge.id, &stats),
            })
            .collect();

        Self {
            xp,
            rank: current_rank(xp),
            progress: progress_to_next_rank(xp),
            stats,
            badges,
        }
    }
}

// ============================================
// Stateful engine
// ============================================

/// XP and stat mutations over the injected store
#[derive(Clone)]
pub struct ProgressionEngine {
    store: SharedStore,
    events: EventBus,
}

impl ProgressionEngine {
    pub fn new(store: SharedStore, events: EventBus) -> Self {
        Self { store, events }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Latest persisted XP. Missing or malformed → 0.
    pub fn xp(&self) -> u64 {
        let Some(raw) = self.store.get(KEY_AGENT_XP) else {
            return 0;
        };
        match raw.trim().parse::<u64>() {
            Ok(xp) => xp,
            Err(_) => {
                warn!("⚠️ PROGRESSION: malformed {} {:?}, treating as 0", KEY_AGENT_XP, raw);
                0
            }
        }
    }

    /// Latest persisted stats. Missing or malformed → zeroes.
    pub fn stats(&self) -> AgentStats {
        read_json_object(self.store.as_ref(), KEY_AGENT_STATS).unwrap_or_default()
    }

    /// Add XP, persist, publish `XpChanged`. Returns the new total.
    ///
    /// A zero amount changes nothing and publishes nothing.
    pub fn add_xp(&self, amount: u64) -> u64 {
        let before = self.xp();
        if amount == 0 {
            return before;
        }

        let xp = before.saturating_add(amount);
        write_raw(self.store.as_ref(), KEY_AGENT_XP, &xp.to_string());

        let (old_rank, new_rank) = (current_rank(before), current_rank(xp));
        if old_rank != new_rank {
            info!("🎖️ PROMOTION: {} → {} ({} XP)", old_rank.name, new_rank.name, xp);
        } else {
            info!("✨ +{} XP ({} total)", amount, xp);
        }

        self.events.publish(AgentEvent::XpChanged { xp });
        xp
    }

    /// Add to one stat counter, persist, publish `StatChanged`.
    /// Returns the counter's new value.
    pub fn increment_stat(&self, key: StatKey, amount: u64) -> u64 {
        let mut stats = self.stats();
        if amount == 0 {
            return stats.get(key);
        }

        let value = stats.bump(key, amount);
        write_json(self.store.as_ref(), KEY_AGENT_STATS, &stats);
        info!("📈 STAT {} +{} = {}", key.as_str(), amount, value);

        self.events.publish(AgentEvent::StatChanged { key, value });
        value
    }

    /// Count one report dispatched to the authorities
    pub fn record_report_sent(&self) -> u64 {
        self.increment_stat(StatKey::ReportsSent, 1)
    }

    pub fn rank(&self) -> &'static Rank {
        current_rank(self.xp())
    }

    pub fn progress(&self) -> RankProgress {
        progress_to_next_rank(self.xp())
    }

    pub fn badge(&self, badge_id: &str) -> BadgeStatus {
        badge_status(badge_id, &self.stats())
    }

    /// Profile derived from the latest persisted XP and stats
    pub fn snapshot(&self) -> AgentProfile {
        AgentProfile::derive(self.xp(), self.stats())
    }

    /// Wipe XP and stats, publishing the zeroed values
    pub fn reset(&self) {
        remove_soft(self.store.as_ref(), KEY_AGENT_XP);
        remove_soft(self.store.as_ref(), KEY_AGENT_STATS);
        info!("🧹 PROGRESSION RESET");

        self.events.publish(AgentEvent::XpChanged { xp: 0 });
        for key in StatKey::ALL {
            self.events.publish(AgentEvent::StatChanged { key, value: 0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::store::MemoryStore;

    fn engine() -> ProgressionEngine {
        ProgressionEngine::new(MemoryStore::shared(), EventBus::default())
    }

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(current_rank(0).name, "Rookie Informant");
        assert_eq!(current_rank(499).name, "Rookie Informant");
        assert_eq!(current_rank(500).name, "Field Agent");
        assert_eq!(current_rank(1000).name, "Senior Detective");
        assert_eq!(current_rank(2499).name, "Senior Detective");
        assert_eq!(current_rank(2500).name, "Director of Intelligence");
        assert_eq!(current_rank(u64::MAX).name, "Director of Intelligence");
    }

    #[test]
    fn test_progress_interpolation() {
        let p = progress_to_next_rank(50);
        assert!((p.percent - 10.0).abs() < 1e-9);
        assert_eq!(p.next_rank.map(|r| r.name), Some("Field Agent"));

        // 1000..2500 band, 1750 is halfway
        let p = progress_to_next_rank(1750);
        assert!((p.percent - 50.0).abs() < 1e-9);
        assert_eq!(p.next_rank.map(|r| r.min_xp), Some(2500));
    }

    #[test]
    fn test_progress_saturates_at_top() {
        let p = progress_to_next_rank(2500);
        assert_eq!(p.percent, 100.0);
        assert!(p.next_rank.is_none());
        assert_eq!(progress_to_next_rank(99_999).percent, 100.0);
    }

    #[test]
    fn test_badge_status_progress() {
        let stats = AgentStats {
            total_chars_processed: 250,
            ..Default::default()
        };
        let status = badge_status("bulk_extractor", &stats);
        assert!(!status.unlocked);
        assert!((status.progress - 50.0).abs() < 1e-9);
        assert_eq!((status.current, status.target), (250, 500));
        assert!(status.next_tier.is_none());
    }

    #[test]
    fn test_unlocked_badge_reports_next_tier() {
        let stats = AgentStats {
            reports_sent: 6,
            ..Default::default()
        };
        let status = badge_status("report_specialist", &stats);
        assert!(status.unlocked);
        assert_eq!(status.progress, 100.0);

        let tier = status.next_tier.unwrap();
        assert_eq!(tier.title, "Justice Bringer");
        assert_eq!(tier.target, 15);
        assert!((tier.percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_badge_is_locked() {
        let stats = AgentStats {
            total_scans: 1000,
            ..Default::default()
        };
        assert_eq!(badge_status("mystery", &stats), BadgeStatus::locked());
    }

    #[test]
    fn test_add_xp_persists() {
        let engine = engine();
        assert_eq!(engine.add_xp(50), 50);
        assert_eq!(engine.add_xp(25), 75);
        assert_eq!(engine.xp(), 75);
        assert_eq!(engine.rank().name, "Rookie Informant");
    }

    #[test]
    fn test_zero_xp_is_noop() {
        let engine = engine();
        let mut rx = engine.events().subscribe();
        assert_eq!(engine.add_xp(0), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_malformed_xp_reads_as_zero() {
        let store = MemoryStore::shared();
        store.set(KEY_AGENT_XP, "lots").unwrap();
        let engine = ProgressionEngine::new(store, EventBus::default());
        assert_eq!(engine.xp(), 0);
        assert_eq!(engine.add_xp(10), 10);
    }

    #[test]
    fn test_increment_stat_reads_latest_persisted() {
        let store = MemoryStore::shared();
        let a = ProgressionEngine::new(store.clone(), EventBus::default());
        let b = ProgressionEngine::new(store, EventBus::default());

        a.increment_stat(StatKey::TotalScans, 2);
        b.increment_stat(StatKey::TotalScans, 3);

        assert_eq!(a.stats().total_scans, 5);
    }

    #[test]
    fn test_malformed_stats_reads_as_default() {
        let store = MemoryStore::shared();
        store.set(KEY_AGENT_STATS, "[1,2,3]").unwrap();
        let engine = ProgressionEngine::new(store, EventBus::default());
        assert_eq!(engine.stats(), AgentStats::default());
        assert_eq!(engine.increment_stat(StatKey::ReportsSent, 1), 1);
        assert_eq!(engine.stats().total_scans, 0);
    }

    #[test]
    fn test_non_object_stats_read_as_default() {
        let store = MemoryStore::shared();
        let engine = ProgressionEngine::new(store.clone(), EventBus::default());
        for raw in ["7", "\"totalScans\"", "null", "[]"] {
            store.set(KEY_AGENT_STATS, raw).unwrap();
            assert_eq!(engine.stats(), AgentStats::default(), "raw value {}", raw);
        }
    }

    #[test]
    fn test_events_carry_new_values() {
        let engine = engine();
        let mut rx = engine.events().subscribe();

        engine.add_xp(50);
        engine.increment_stat(StatKey::TotalCharsProcessed, 120);

        assert_eq!(rx.try_recv().unwrap(), AgentEvent::XpChanged { xp: 50 });
        assert_eq!(
            rx.try_recv().unwrap(),
            AgentEvent::StatChanged {
                key: StatKey::TotalCharsProcessed,
                value: 120
            }
        );
    }

    #[test]
    fn test_snapshot_and_reset() {
        let engine = engine();
        engine.add_xp(600);
        engine.increment_stat(StatKey::TotalScans, 1);
        engine.record_report_sent();

        let profile = engine.snapshot();
        assert_eq!(profile.rank.name, "Field Agent");
        assert_eq!(profile.badges.len(), 3);
        assert!(profile.badges[0].status.unlocked);
        assert!(!profile.badges[2].status.unlocked);

        let mut rx = engine.events().subscribe();
        engine.reset();
        assert_eq!(engine.xp(), 0);
        assert_eq!(engine.stats(), AgentStats::default());
        assert_eq!(rx.try_recv().unwrap(), AgentEvent::XpChanged { xp: 0 });
    }
}
