//! Folding of typed events into an [`EventSummary`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use insights_core::models::{EventSummary, UserEvent};

// ── FeatureTally ──────────────────────────────────────────────────────────────

/// Running per-feature occurrence counts.
#[derive(Debug, Clone, Default)]
pub struct FeatureTally {
    counts: BTreeMap<String, usize>,
}

impl FeatureTally {
    pub fn add(&mut self, feature: &str) {
        *self.counts.entry(feature.to_string()).or_default() += 1;
    }

    /// The feature with the highest count.
    ///
    /// Ties resolve to the lexicographically smallest name, so the result
    /// does not depend on event order.
    pub fn most_used(&self) -> Option<&str> {
        self.counts
            .iter()
            .max_by(|(a_name, a_count), (b_name, b_count)| {
                a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
            })
            .map(|(name, _)| name.as_str())
    }

    pub fn into_counts(self) -> BTreeMap<String, usize> {
        self.counts
    }
}

// ── EventAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that summarises a sequence of events.
pub struct EventAggregator;

impl EventAggregator {
    /// Build the [`EventSummary`] for `events`.
    ///
    /// Never fails; an empty slice yields zero counts and empty collections.
    pub fn summarize(events: &[UserEvent]) -> EventSummary {
        let mut users: HashSet<i64> = HashSet::new();
        let mut sessions: HashSet<i64> = HashSet::new();
        let mut features = FeatureTally::default();
        let mut churned_user_ids: BTreeSet<i64> = BTreeSet::new();

        for event in events {
            users.insert(event.user_id);
            sessions.insert(event.session_id);
            if let Some(feature) = &event.feature_name {
                features.add(feature);
            }
            // Any inactive event counts, not just the latest one.
            if !event.is_active {
                churned_user_ids.insert(event.user_id);
            }
        }

        let most_used_feature = features.most_used().map(str::to_string);

        EventSummary {
            total_users: users.len(),
            total_sessions: sessions.len(),
            feature_usage_counts: features.into_counts(),
            most_used_feature,
            churned_user_ids,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
