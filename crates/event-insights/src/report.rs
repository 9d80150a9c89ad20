//! Plain-text rendering of an [`EventSummary`].

use std::collections::{BTreeMap, BTreeSet};

use insights_core::models::EventSummary;

pub const REPORT_BANNER: &str = "===== SUMMARY REPORT =====";

/// Render the banner followed by one `label: value` line per summary field.
///
/// Field order is fixed: total_users, total_sessions, feature_usage_counts,
/// most_used_feature, churned_user_ids.
pub fn render_summary(summary: &EventSummary) -> String {
    let lines = [
        format!("total_users: {}", summary.total_users),
        format!("total_sessions: {}", summary.total_sessions),
        format!(
            "feature_usage_counts: {}",
            format_feature_counts(&summary.feature_usage_counts)
        ),
        format!(
            "most_used_feature: {}",
            summary.most_used_feature.as_deref().unwrap_or("None")
        ),
        format!(
            "churned_user_ids: {}",
            format_user_ids(&summary.churned_user_ids)
        ),
    ];

    let mut out = format!("{REPORT_BANNER}\n\n");
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// `{"export": 2, "search": 1}`, ordered by feature name.
pub fn format_feature_counts(counts: &BTreeMap<String, usize>) -> String {
    let body: Vec<String> = counts
        .iter()
        .map(|(name, count)| format!("{name:?}: {count}"))
        .collect();
    format!("{{{}}}", body.join(", "))
}

/// `{1, 4, 9}`, ascending.
pub fn format_user_ids(ids: &BTreeSet<i64>) -> String {
    let body: Vec<String> = ids.iter().map(i64::to_string).collect();
    format!("{{{}}}", body.join(", "))
}
