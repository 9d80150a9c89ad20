use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{InsightsError, Result};

/// The only accepted layout for `event_timestamp` cells.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names expected in the header of a raw events file.
pub mod columns {
    pub const USER_ID: &str = "user_id";
    pub const SESSION_ID: &str = "session_id";
    pub const EVENT_TIMESTAMP: &str = "event_timestamp";
    pub const EVENT_TYPE: &str = "event_type";
    pub const FEATURE_NAME: &str = "feature_name";
    pub const PLAN_TYPE: &str = "plan_type";
    pub const IS_ACTIVE: &str = "is_active";

    /// All columns, in file order.
    pub const ALL: [&str; 7] = [
        USER_ID,
        SESSION_ID,
        EVENT_TIMESTAMP,
        EVENT_TYPE,
        FEATURE_NAME,
        PLAN_TYPE,
        IS_ACTIVE,
    ];
}

/// Untyped cell values for one event, borrowed from a raw row.
///
/// `None` means the cell was empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawEventFields<'a> {
    pub user_id: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub event_timestamp: Option<&'a str>,
    pub event_type: Option<&'a str>,
    pub feature_name: Option<&'a str>,
    pub plan_type: Option<&'a str>,
    pub is_active: Option<&'a str>,
}

/// A single user interaction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    pub user_id: i64,
    pub session_id: i64,
    /// Wall-clock time of the event as written in the source (no zone).
    pub event_timestamp: NaiveDateTime,
    /// Open-ended tag such as `"login"`, `"feature_use"` or `"error"`.
    pub event_type: String,
    /// Feature touched by the event; never `Some("")`.
    pub feature_name: Option<String>,
    /// Open-ended tag such as `"basic"`, `"pro"` or `"trial"`.
    pub plan_type: String,
    pub is_active: bool,
}

impl UserEvent {
    /// Build a validated event from raw cell text.
    ///
    /// `line` is the 1-based source line, used only for error reporting.
    /// Fails when an identifier is not an integer or the timestamp does not
    /// match [`TIMESTAMP_FORMAT`].
    pub fn from_raw_fields(line: usize, fields: &RawEventFields<'_>) -> Result<Self> {
        Ok(Self {
            user_id: parse_id(line, columns::USER_ID, fields.user_id)?,
            session_id: parse_id(line, columns::SESSION_ID, fields.session_id)?,
            event_timestamp: parse_timestamp(line, fields.event_timestamp)?,
            event_type: fields.event_type.unwrap_or_default().to_string(),
            feature_name: normalize_feature_name(fields.feature_name),
            plan_type: fields.plan_type.unwrap_or_default().to_string(),
            is_active: parse_is_active(fields.is_active),
        })
    }
}

/// Parse an identifier cell as a signed integer, tolerating surrounding
/// whitespace.
pub fn parse_id(line: usize, column: &str, raw: Option<&str>) -> Result<i64> {
    let text = raw.unwrap_or_default();
    text.trim()
        .parse::<i64>()
        .map_err(|_| InsightsError::InvalidInteger {
            line,
            column: column.to_string(),
            value: text.to_string(),
        })
}

/// Parse a timestamp cell against [`TIMESTAMP_FORMAT`]. No fallback formats.
pub fn parse_timestamp(line: usize, raw: Option<&str>) -> Result<NaiveDateTime> {
    let text = raw.unwrap_or_default();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| {
        InsightsError::TimestampParse {
            line,
            value: text.to_string(),
        }
    })
}

/// `true` only when the lower-cased cell text is exactly `"true"`.
pub fn parse_is_active(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| s.to_lowercase() == "true")
}

/// Map an empty or missing feature cell to `None`.
pub fn normalize_feature_name(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Aggregate statistics for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSummary {
    /// Distinct `user_id` values.
    pub total_users: usize,
    /// Distinct `session_id` values.
    pub total_sessions: usize,
    /// Occurrences per feature, over events that name a feature.
    pub feature_usage_counts: BTreeMap<String, usize>,
    /// Highest-count feature; ties go to the lexicographically smallest name.
    pub most_used_feature: Option<String>,
    /// Users with at least one inactive event.
    pub churned_user_ids: BTreeSet<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn fields<'a>(is_active: &'a str, feature: Option<&'a str>) -> RawEventFields<'a> {
        RawEventFields {
            user_id: Some("1"),
            session_id: Some("10"),
            event_timestamp: Some("2024-01-15 10:30:00"),
            event_type: Some("feature_use"),
            feature_name: feature,
            plan_type: Some("pro"),
            is_active: Some(is_active),
        }
    }

    // ── from_raw_fields ───────────────────────────────────────────────────────

    #[test]
    fn test_from_raw_fields_builds_event() {
        let event = UserEvent::from_raw_fields(2, &fields("true", Some("export"))).unwrap();

        assert_eq!(event.user_id, 1);
        assert_eq!(event.session_id, 10);
        assert_eq!(
            event.event_timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
        assert_eq!(event.event_type, "feature_use");
        assert_eq!(event.feature_name.as_deref(), Some("export"));
        assert_eq!(event.plan_type, "pro");
        assert!(event.is_active);
    }

    #[test]
    fn test_from_raw_fields_rejects_non_integer_user() {
        let mut raw = fields("true", None);
        raw.user_id = Some("abc");

        let err = UserEvent::from_raw_fields(5, &raw).unwrap_err();
        match err {
            InsightsError::InvalidInteger { line, column, value } => {
                assert_eq!(line, 5);
                assert_eq!(column, "user_id");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_raw_fields_rejects_missing_session() {
        let mut raw = fields("true", None);
        raw.session_id = None;

        let err = UserEvent::from_raw_fields(3, &raw).unwrap_err();
        assert!(matches!(
            err,
            InsightsError::InvalidInteger { ref column, .. } if column == "session_id"
        ));
    }

    #[test]
    fn test_from_raw_fields_equality_is_structural() {
        let a = UserEvent::from_raw_fields(2, &fields("true", Some("export"))).unwrap();
        let b = UserEvent::from_raw_fields(9, &fields("TRUE", Some("export"))).unwrap();
        assert_eq!(a, b);
    }

    // ── parse_id ──────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_id_trims_whitespace() {
        assert_eq!(parse_id(1, "user_id", Some(" 42 ")).unwrap(), 42);
    }

    #[test]
    fn test_parse_id_rejects_decimal() {
        assert!(parse_id(1, "user_id", Some("4.5")).is_err());
    }

    // ── parse_timestamp ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_timestamp_fixed_format() {
        let ts = parse_timestamp(1, Some("2024-01-15 10:30:00")).unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.second(), 0);
    }

    #[test]
    fn test_parse_timestamp_date_only_fails() {
        let err = parse_timestamp(7, Some("2024-01-15")).unwrap_err();
        assert!(err.is_format_error());
        assert!(matches!(err, InsightsError::TimestampParse { line: 7, .. }));
    }

    #[test]
    fn test_parse_timestamp_rejects_iso_t_separator() {
        assert!(parse_timestamp(1, Some("2024-01-15T10:30:00")).is_err());
    }

    #[test]
    fn test_parse_timestamp_empty_fails() {
        assert!(parse_timestamp(1, None).is_err());
    }

    // ── parse_is_active ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_is_active_case_insensitive_true() {
        for text in ["true", "True", "TRUE", "tRuE"] {
            assert!(parse_is_active(Some(text)), "{text} should be active");
        }
    }

    #[test]
    fn test_parse_is_active_everything_else_false() {
        for text in ["false", "False", "1", "yes", "", " true"] {
            assert!(!parse_is_active(Some(text)), "{text:?} should be inactive");
        }
        assert!(!parse_is_active(None));
    }

    // ── normalize_feature_name ────────────────────────────────────────────────

    #[test]
    fn test_normalize_feature_name() {
        assert_eq!(normalize_feature_name(None), None);
        assert_eq!(normalize_feature_name(Some("")), None);
        assert_eq!(
            normalize_feature_name(Some("reports")),
            Some("reports".to_string())
        );
    }

    #[test]
    fn test_summary_default_is_empty() {
        let summary = EventSummary::default();
        assert_eq!(summary.total_users, 0);
        assert_eq!(summary.total_sessions, 0);
        assert!(summary.feature_usage_counts.is_empty());
        assert!(summary.most_used_feature.is_none());
        assert!(summary.churned_user_ids.is_empty());
    }
}
