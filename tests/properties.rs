//! Property tests for the pure triage and progression functions

use proptest::prelude::*;
use scam_sherlock::{
    classify, current_rank, extract_urls, progress_to_next_rank, AgentStats, EventBus, Ledger,
    MemoryStore, ProgressionEngine, ScanResult, StatKey, ThreatLevel, RANKS,
};

fn threat_level() -> impl Strategy<Value = ThreatLevel> {
    prop_oneof![
        Just(ThreatLevel::Safe),
        Just(ThreatLevel::Suspicious),
        Just(ThreatLevel::Dangerous),
    ]
}

fn stat_key() -> impl Strategy<Value = StatKey> {
    prop_oneof![
        Just(StatKey::TotalScans),
        Just(StatKey::TotalCharsProcessed),
        Just(StatKey::ReportsSent),
    ]
}

proptest! {
    #[test]
    fn prop_classify_is_deterministic(verdict in ".{0,80}", findings in prop::collection::vec(".{0,40}", 0..4)) {
        prop_assert_eq!(classify(&verdict, &findings), classify(&verdict, &findings));
    }

    #[test]
    fn prop_classify_ignores_case(verdict in "[a-zA-Z ]{0,60}") {
        let none: [&str; 0] = [];
        prop_assert_eq!(
            classify(&verdict.to_uppercase(), &none),
            classify(&verdict.to_lowercase(), &none)
        );
    }

    #[test]
    fn prop_rank_is_monotone(a in 0u64..10_000, b in 0u64..10_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(current_rank(lo).min_xp <= current_rank(hi).min_xp);
        prop_assert!(current_rank(hi).min_xp <= hi);
    }

    #[test]
    fn prop_progress_is_bounded(xp in any::<u64>()) {
        let progress = progress_to_next_rank(xp);
        prop_assert!((0.0..=100.0).contains(&progress.percent));
        if xp >= RANKS[RANKS.len() - 1].min_xp {
            prop_assert!(progress.next_rank.is_none());
            prop_assert_eq!(progress.percent, 100.0);
        }
    }

    #[test]
    fn prop_increment_stat_is_additive(key in stat_key(), a in 0u64..1_000, b in 0u64..1_000) {
        let engine = ProgressionEngine::new(MemoryStore::shared(), EventBus::default());
        engine.increment_stat(key, a);
        engine.increment_stat(key, b);
        prop_assert_eq!(engine.stats().get(key), a + b);

        let untouched: u64 = StatKey::ALL
            .iter()
            .filter(|k| **k != key)
            .map(|k| engine.stats().get(*k))
            .sum();
        prop_assert_eq!(untouched, 0);
    }

    #[test]
    fn prop_extract_urls_is_idempotent(words in prop::collection::vec("(https?://[a-z]{1,8}\\.test|[a-z]{1,8})", 0..12)) {
        let text = words.join(" ");
        let first = extract_urls(&text);
        let second = extract_urls(&first.join(" "));
        prop_assert_eq!(&first, &second);

        let mut seen = std::collections::HashSet::new();
        prop_assert!(first.iter().all(|u| seen.insert(u.clone())));
    }

    #[test]
    fn prop_ledger_round_trips(levels in prop::collection::vec((threat_level(), 0u8..=100), 0..8)) {
        let store = MemoryStore::shared();
        let mut ledger = Ledger::load(store.clone());
        for (i, (level, score)) in levels.iter().enumerate() {
            ledger.append(ScanResult::new(
                format!("https://site{}.test", i),
                *level,
                *score,
                "verdict",
                vec![],
            ));
        }

        let reloaded = Ledger::load(store);
        prop_assert_eq!(reloaded.entries(), ledger.entries());
        prop_assert_eq!(reloaded.summary().total, levels.len());
    }
}

#[test]
fn test_default_stats_are_zero() {
    let stats = AgentStats::default();
    for key in StatKey::ALL {
        assert_eq!(stats.get(key), 0);
    }
}
