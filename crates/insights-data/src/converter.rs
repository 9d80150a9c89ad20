//! Conversion of raw CSV rows into typed [`UserEvent`]s.

use insights_core::error::{InsightsError, Result};
use insights_core::models::{columns, RawEventFields, UserEvent};
use tracing::{debug, warn};

use crate::reader::{RawRow, RawTable};

/// What to do when a row cannot be converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversionPolicy {
    /// Stop at the first bad row and return its error.
    #[default]
    Abort,
    /// Log and drop bad rows, keep converting.
    SkipInvalid,
}

/// Events produced from a table, plus how many rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub events: Vec<UserEvent>,
    pub skipped_rows: usize,
}

/// Convert every row of `table`, aborting on the first failure.
pub fn rows_to_events(table: &RawTable) -> Result<Vec<UserEvent>> {
    convert_rows(table, ConversionPolicy::Abort).map(|c| c.events)
}

/// Convert every row of `table` under the given `policy`.
///
/// Output order follows the input rows.
pub fn convert_rows(table: &RawTable, policy: ConversionPolicy) -> Result<Conversion> {
    let mut conversion = Conversion {
        events: Vec::with_capacity(table.rows.len()),
        skipped_rows: 0,
    };

    for row in &table.rows {
        match convert_row(table, row) {
            Ok(event) => conversion.events.push(event),
            Err(e) if policy == ConversionPolicy::SkipInvalid => {
                warn!("Skipping row: {}", e);
                conversion.skipped_rows += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Converted {} rows into {} events ({} skipped)",
        table.rows.len(),
        conversion.events.len(),
        conversion.skipped_rows
    );

    Ok(conversion)
}

/// Convert a single row of `table` into a [`UserEvent`].
pub fn convert_row(table: &RawTable, row: &RawRow) -> Result<UserEvent> {
    if row.field_count != table.headers.len() {
        return Err(InsightsError::FieldCount {
            line: row.line,
            found: row.field_count,
            expected: table.headers.len(),
        });
    }
    if let Some(missing) = columns::ALL.iter().find(|c| !table.has_column(c)) {
        return Err(InsightsError::MissingColumn {
            line: row.line,
            column: missing.to_string(),
        });
    }

    let fields = RawEventFields {
        user_id: row.get(columns::USER_ID),
        session_id: row.get(columns::SESSION_ID),
        event_timestamp: row.get(columns::EVENT_TIMESTAMP),
        event_type: row.get(columns::EVENT_TYPE),
        feature_name: row.get(columns::FEATURE_NAME),
        plan_type: row.get(columns::PLAN_TYPE),
        is_active: row.get(columns::IS_ACTIVE),
    };

    UserEvent::from_raw_fields(row.line, &fields)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
