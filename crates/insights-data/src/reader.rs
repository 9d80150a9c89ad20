//! CSV loading for Event Insights.
//!
//! Reads a comma-delimited export from disk into a [`RawTable`] of untyped
//! rows. Cell contents are not interpreted here; that is the converter's job.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use insights_core::error::{InsightsError, Result};
use tracing::debug;

// ── Public types ──────────────────────────────────────────────────────────────

/// One data line from the source, keyed by header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file where the row starts.
    pub line: usize,
    /// Number of cells found on the line, which may differ from the header.
    pub field_count: usize,
    cells: HashMap<String, Option<String>>,
}

impl RawRow {
    /// Cell text for `column`, or `None` when the cell is empty or absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }
}

/// Header plus rows, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the CSV file at `path` into a [`RawTable`].
///
/// The file is read completely and closed before parsing starts.
pub fn load_raw_events(path: &Path) -> Result<RawTable> {
    let content = read_source(path)?;
    let table = parse_raw_events(&content, path)?;

    debug!(
        "Loaded {} rows with {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );

    Ok(table)
}

/// Parse CSV text whose first non-blank record is the header.
///
/// `source` is only used in error messages.
pub fn parse_raw_events(content: &str, source: &Path) -> Result<RawTable> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = parse_records(content)?.into_iter();

    let Some((header_line, header_fields)) = records.next() else {
        return Err(InsightsError::MissingHeader(source.to_path_buf()));
    };
    let headers = validate_header(header_line, header_fields)?;

    let rows = records
        .map(|(line, fields)| {
            let field_count = fields.len();
            let cells = headers
                .iter()
                .cloned()
                .zip(fields.into_iter().map(|f| Some(f).filter(|s| !s.is_empty())))
                .collect();
            RawRow {
                line,
                field_count,
                cells,
            }
        })
        .collect();

    Ok(RawTable { headers, rows })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read the whole file as UTF-8. The handle is dropped on every return path.
fn read_source(path: &Path) -> Result<String> {
    let file_read = |source| InsightsError::FileRead {
        path: PathBuf::from(path),
        source,
    };

    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(file_read)?;

    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        InsightsError::MalformedCsv {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: "invalid UTF-8".to_string(),
        }
    })
}

fn validate_header(line: usize, fields: Vec<String>) -> Result<Vec<String>> {
    let headers: Vec<String> = fields.into_iter().map(|h| h.trim().to_string()).collect();

    if headers.iter().any(String::is_empty) {
        return Err(InsightsError::InvalidHeader(format!(
            "empty column name at line {line}"
        )));
    }
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(InsightsError::InvalidHeader(format!(
                "duplicate column {name:?} at line {line}"
            )));
        }
    }

    Ok(headers)
}

/// Split CSV text into records of fields, each tagged with its starting line.
///
/// Fields may be double-quoted to carry commas, line breaks or `""`-escaped
/// quotes. Blank lines are skipped.
fn parse_records(content: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_quoted = false;
    let mut line = 1usize;
    let mut record_line = 1usize;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !field_quoted => {
                in_quotes = true;
                field_quoted = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                field_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                let is_blank = fields.is_empty() && field.is_empty() && !field_quoted;
                if !is_blank {
                    fields.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                field_quoted = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(InsightsError::MalformedCsv {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !fields.is_empty() || !field.is_empty() || field_quoted {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
