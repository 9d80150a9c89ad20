//! Main analysis pipeline for Event Insights.
//!
//! Runs loading, conversion and aggregation in strict sequence and returns an
//! [`AnalysisResult`] ready for rendering.

use std::path::Path;
use std::time::Instant;

use insights_core::error::Result;
use insights_core::models::EventSummary;
use tracing::{debug, info};

use crate::aggregator::EventAggregator;
use crate::converter::{convert_rows, ConversionPolicy};
use crate::reader::load_raw_events;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters and timings recorded during one run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisMetadata {
    /// Data rows read from the source (header excluded).
    pub rows_loaded: usize,
    /// Rows that became events.
    pub events_converted: usize,
    /// Rows dropped under [`ConversionPolicy::SkipInvalid`].
    pub rows_skipped: usize,
    /// Wall-clock seconds spent reading and parsing the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent converting rows to events.
    pub convert_time_seconds: f64,
}

/// The complete output of [`analyze_events_file`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub summary: EventSummary,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline over the CSV file at `path`.
///
/// 1. Load raw rows.
/// 2. Convert rows to events under `policy`.
/// 3. Aggregate events into an [`EventSummary`].
///
/// Any load or conversion error aborts the run; no partial summary is built.
pub fn analyze_events_file(path: &Path, policy: ConversionPolicy) -> Result<AnalysisResult> {
    // ── Step 1: Load rows ─────────────────────────────────────────────────────
    info!("Loading raw events from {}...", path.display());
    let load_start = Instant::now();
    let table = load_raw_events(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Convert ───────────────────────────────────────────────────────
    info!("Converting rows to domain objects...");
    let convert_start = Instant::now();
    let conversion = convert_rows(&table, policy)?;
    let convert_time = convert_start.elapsed().as_secs_f64();

    // ── Step 3: Aggregate ─────────────────────────────────────────────────────
    info!("Running analysis...");
    let summary = EventAggregator::summarize(&conversion.events);

    let metadata = AnalysisMetadata {
        rows_loaded: table.rows.len(),
        events_converted: conversion.events.len(),
        rows_skipped: conversion.skipped_rows,
        load_time_seconds: load_time,
        convert_time_seconds: convert_time,
    };
    debug!(
        "Analysis complete: {} rows, {} events, {} skipped",
        metadata.rows_loaded, metadata.events_converted, metadata.rows_skipped
    );

    Ok(AnalysisResult { summary, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
